mod support;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::time::timeout;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect() -> Socket {
    let (socket, _) = connect_async(support::ws_url())
        .await
        .expect("websocket connects");
    socket
}

// Reads JSON messages until one matches, failing after a few seconds.
async fn next_matching(socket: &mut Socket, pred: impl Fn(&Value) -> bool) -> Value {
    timeout(Duration::from_secs(5), async {
        loop {
            let msg = socket
                .next()
                .await
                .expect("socket open")
                .expect("valid frame");
            if let Message::Text(text) = msg {
                let value: Value = serde_json::from_str(&text).expect("server sends json");
                if pred(&value) {
                    return value;
                }
            }
        }
    })
    .await
    .expect("expected message in time")
}

#[tokio::test]
async fn when_client_connects_then_session_and_splash_are_announced() {
    let mut socket = connect().await;

    let session = next_matching(&mut socket, |v| v["type"] == "Session").await;
    assert!(session["data"]["width"].as_f64().expect("width") > 0.0);
    assert!(session["data"]["session_id"].is_string());

    let phase = next_matching(&mut socket, |v| v["type"] == "Phase").await;
    assert_eq!(phase["data"], "Splash");
}

#[tokio::test]
async fn when_game_starts_then_world_updates_show_a_fresh_run() {
    let mut socket = connect().await;
    next_matching(&mut socket, |v| v["type"] == "Session").await;

    let start = json!({"type": "Action", "data": {"kind": "StartGame"}});
    socket
        .send(Message::text(start.to_string()))
        .await
        .expect("send start");

    let update = next_matching(&mut socket, |v| {
        v["type"] == "WorldUpdate" && v["data"]["phase"] == "Playing"
    })
    .await;
    let data = &update["data"];
    assert_eq!(data["ledger"]["score"], 0);
    assert_eq!(data["ledger"]["health"], data["ledger"]["max_health"]);
    assert!(!data["targets"].as_array().expect("targets").is_empty());
}

#[tokio::test]
async fn when_client_keeps_sending_garbage_then_connection_is_closed() {
    let mut socket = connect().await;
    next_matching(&mut socket, |v| v["type"] == "Session").await;

    for _ in 0..11 {
        socket
            .send(Message::text("not json"))
            .await
            .expect("send garbage");
    }

    let closed = timeout(Duration::from_secs(5), async {
        while let Some(frame) = socket.next().await {
            match frame {
                Ok(Message::Close(frame)) => return frame.map(|f| u16::from(f.code)),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
        None
    })
    .await
    .expect("connection closes in time");
    assert_eq!(closed, Some(1008));
}
