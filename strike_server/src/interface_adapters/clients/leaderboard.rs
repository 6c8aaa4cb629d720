use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::errors::LeaderboardError;
use crate::domain::ports::{LeaderboardStore, ScoreEntry};

// Row shape of the external `high_scores` table.
#[derive(Debug, Clone, Deserialize)]
struct HighScoreRow {
    player_name: String,
    score: u32,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewHighScore<'a> {
    player_name: &'a str,
    score: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

// Thin reqwest client for a REST-style `high_scores` table.
#[derive(Clone)]
pub struct HttpLeaderboardStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpLeaderboardStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, LeaderboardError> {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            let invalid = |_| LeaderboardError::Unavailable("invalid api key".to_string());
            headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?,
            );
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| LeaderboardError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn rejection(response: reqwest::Response) -> LeaderboardError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .map(|body| body.message);
        LeaderboardError::Rejected { status, message }
    }
}

#[async_trait]
impl LeaderboardStore for HttpLeaderboardStore {
    async fn fetch_top(&self, limit: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let url = format!(
            "{}/high_scores?select=player_name,score,created_at&order=score.desc,created_at.asc&limit={limit}",
            self.base_url
        );
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LeaderboardError::Unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let rows = response
            .json::<Vec<HighScoreRow>>()
            .await
            .map_err(|e| LeaderboardError::Decode(e.to_string()))?;
        Ok(rows
            .into_iter()
            .map(|row| ScoreEntry {
                name: row.player_name,
                score: row.score,
                recorded_at: row.created_at,
            })
            .collect())
    }

    async fn submit(&self, name: &str, score: u32) -> Result<(), LeaderboardError> {
        let url = format!("{}/high_scores", self.base_url);
        let response = self
            .http
            .post(url)
            .json(&NewHighScore {
                player_name: name,
                score,
            })
            .send()
            .await
            .map_err(|e| LeaderboardError::Unavailable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::rejection(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Json, Router, extract::RawQuery, http::StatusCode, routing::get};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub");
        let address = listener.local_addr().expect("stub address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{address}")
    }

    fn client(base: &str) -> HttpLeaderboardStore {
        HttpLeaderboardStore::new(base, Some("anon-key"), Duration::from_secs(2))
            .expect("client builds")
    }

    #[tokio::test]
    async fn when_store_answers_then_rows_become_entries() {
        let app = Router::new().route(
            "/high_scores",
            get(|| async {
                Json(json!([
                    {"player_name": "Ace", "score": 40, "created_at": "2024-05-01T10:00:00Z"},
                    {"player_name": "Bee", "score": 12}
                ]))
            }),
        );
        let base = serve(app).await;

        let entries = client(&base).fetch_top(3).await.expect("fetch succeeds");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "Ace");
        assert_eq!(entries[0].recorded_at.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(entries[1].recorded_at, None);
    }

    #[tokio::test]
    async fn when_fetching_then_ties_are_ordered_by_arrival() {
        let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let sink = seen.clone();
        let app = Router::new().route(
            "/high_scores",
            get(move |RawQuery(query): RawQuery| {
                let sink = sink.clone();
                async move {
                    *sink.lock().expect("sink mutex poisoned") = query;
                    Json(json!([]))
                }
            }),
        );
        let base = serve(app).await;

        client(&base).fetch_top(3).await.expect("fetch succeeds");
        let query = seen
            .lock()
            .expect("sink mutex poisoned")
            .clone()
            .expect("query recorded");
        assert!(query.contains("order=score.desc,created_at.asc"), "{query}");
        assert!(query.contains("limit=3"), "{query}");
    }

    #[tokio::test]
    async fn when_submitting_then_row_is_posted() {
        let received: Arc<Mutex<Option<Value>>> = Arc::new(Mutex::new(None));
        let sink = received.clone();
        let app = Router::new().route(
            "/high_scores",
            axum::routing::post(move |Json(body): Json<Value>| {
                let sink = sink.clone();
                async move {
                    *sink.lock().expect("sink mutex poisoned") = Some(body);
                    StatusCode::CREATED
                }
            }),
        );
        let base = serve(app).await;

        client(&base).submit("Ace", 21).await.expect("submit succeeds");
        let body = received
            .lock()
            .expect("sink mutex poisoned")
            .clone()
            .expect("body recorded");
        assert_eq!(body, json!({"player_name": "Ace", "score": 21}));
    }

    #[tokio::test]
    async fn when_store_rejects_then_status_is_reported() {
        let app = Router::new().route(
            "/high_scores",
            get(|| async {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"message": "invalid api key"})),
                )
            }),
        );
        let base = serve(app).await;

        let err = client(&base).fetch_top(3).await.expect_err("rejected");
        assert!(matches!(
            err,
            LeaderboardError::Rejected { status: 401, message: Some(ref m) } if m == "invalid api key"
        ));
    }

    #[tokio::test]
    async fn when_store_sends_garbage_then_decode_fails() {
        let app = Router::new().route("/high_scores", get(|| async { "not json" }));
        let base = serve(app).await;

        let err = client(&base).fetch_top(3).await.expect_err("garbage");
        assert!(matches!(err, LeaderboardError::Decode(_)));
    }
}
