// Boots one strike server per test binary and hands out its URLs.
#![allow(dead_code)]

use std::{net::SocketAddr, sync::OnceLock, time::Duration};

static SERVER_ADDR: OnceLock<SocketAddr> = OnceLock::new();

// Start the server on first use; later calls reuse it.
fn server_addr() -> SocketAddr {
    *SERVER_ADDR.get_or_init(|| {
        let (addr_tx, addr_rx) = std::sync::mpsc::channel();

        // A dedicated thread and runtime keep the server alive across `#[tokio::test]` runtimes.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral port");
                let addr = listener.local_addr().expect("bound address");
                addr_tx.send(addr).expect("publish server address");
                strike_server::run(listener).await.expect("server failed");
            });
        });

        let addr = addr_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("server published its address");
        wait_until_accepting(addr);
        addr
    })
}

fn wait_until_accepting(addr: SocketAddr) {
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("server did not start accepting connections in time");
}

/// Base URL for plain HTTP routes, e.g. `/scores`.
pub fn http_url() -> String {
    format!("http://{}", server_addr())
}

/// URL of the game websocket.
pub fn ws_url() -> String {
    format!("ws://{}/ws", server_addr())
}
