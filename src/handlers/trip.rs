//! Trip planning handler

use std::sync::Arc;

use anyhow::Result;
use async_nats::{Client, Subscriber};
use futures::StreamExt;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::services::trip_planner::TripPlanner;
use crate::types::{ErrorResponse, Request, SuccessResponse, TripRequest};

/// Handle eld.trip.plan requests
pub async fn handle_plan(
    client: Client,
    mut subscriber: Subscriber,
    planner: Arc<TripPlanner>,
) -> Result<()> {
    while let Some(msg) = subscriber.next().await {
        debug!("Received trip plan message");

        let reply = match msg.reply {
            Some(ref reply) => reply.clone(),
            None => {
                error!("Trip plan message without reply subject");
                continue;
            }
        };

        let response = process_plan(&planner, &msg.payload).await?;
        client.publish(reply, response.into()).await?;
    }

    Ok(())
}

/// Plan the trip in `payload` and serialize the reply envelope
pub async fn process_plan(planner: &TripPlanner, payload: &[u8]) -> Result<Vec<u8>> {
    let request: Request<TripRequest> = match serde_json::from_slice(payload) {
        Ok(req) => req,
        Err(e) => {
            warn!("Failed to parse trip plan request: {}", e);
            let error = ErrorResponse::new(Uuid::nil(), "INVALID_REQUEST", e.to_string());
            return Ok(serde_json::to_vec(&error)?);
        }
    };

    match planner.plan(&request.payload).await {
        Ok(plan) => {
            let success = SuccessResponse::new(request.id, plan);
            Ok(serde_json::to_vec(&success)?)
        }
        Err(e) => {
            if e.is_input_error() {
                warn!("Rejected trip plan {}: {}", request.id, e);
            } else {
                error!("Trip plan {} failed: {}", request.id, e);
            }
            let error = ErrorResponse::new(request.id, e.code(), e.to_string());
            Ok(serde_json::to_vec(&error)?)
        }
    }
}
