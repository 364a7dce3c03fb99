//! Ping handler for health checks

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Serialize, Deserialize)]
struct PingRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PongResponse {
    message: String,
    timestamp: String,
    rules_version: String,
}

/// Handle ping messages
pub async fn handle_ping(client: Client, mut subscriber: Subscriber, rules_version: String) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received ping message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                error!("Ping message without reply subject");
                continue;
            }
        };

        let response = match pong(&msg.payload, &rules_version) {
            Ok(pong) => serde_json::to_vec(&pong)?,
            Err(e) => {
                error!("Failed to parse ping request: {}", e);
                let error_response = serde_json::json!({
                    "error": {
                        "code": "INVALID_REQUEST",
                        "message": format!("Failed to parse request: {}", e)
                    }
                });
                serde_json::to_vec(&error_response)?
            }
        };

        client.publish(reply, response.into()).await?;
        debug!("Sent pong response");
    }

    Ok(())
}

fn pong(payload: &[u8], rules_version: &str) -> serde_json::Result<PongResponse> {
    // An empty body is a bare ping
    let request: PingRequest = if payload.is_empty() {
        PingRequest { message: None }
    } else {
        serde_json::from_slice(payload)?
    };

    Ok(PongResponse {
        message: request.message.map(|m| format!("Pong: {}", m)).unwrap_or_else(|| "Pong".to_string()),
        timestamp: chrono::Utc::now().to_rfc3339(),
        rules_version: rules_version.to_string(),
    })
}
