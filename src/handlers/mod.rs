//! NATS message handlers

pub mod ping;
pub mod trip;

use std::sync::Arc;
use anyhow::Result;
use async_nats::Client;
use tracing::{info, error};
use tokio::select;

use crate::services::trip_planner::TripPlanner;

/// Subject for health checks
pub const SUBJECT_PING: &str = "eld.ping";
/// Subject for trip planning requests
pub const SUBJECT_TRIP_PLAN: &str = "eld.trip.plan";

/// Start all message handlers
pub async fn start_handlers(client: Client, planner: TripPlanner) -> Result<()> {
    info!("Starting message handlers...");

    let planner = Arc::new(planner);
    let rules_version = planner.rules().version.clone();

    let ping_sub = client.subscribe(SUBJECT_PING).await?;
    let trip_plan_sub = client.subscribe(SUBJECT_TRIP_PLAN).await?;

    info!("Subscribed to {} and {}", SUBJECT_PING, SUBJECT_TRIP_PLAN);

    let ping_handle = tokio::spawn(ping::handle_ping(client.clone(), ping_sub, rules_version));
    let trip_plan_handle = tokio::spawn(trip::handle_plan(client.clone(), trip_plan_sub, planner));

    info!("All handlers started, waiting for messages...");

    select! {
        result = ping_handle => {
            error!("Ping handler finished: {:?}", result);
        }
        result = trip_plan_handle => {
            error!("Trip plan handler finished: {:?}", result);
        }
    }

    Ok(())
}
