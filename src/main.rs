//! ELD Planner Worker - trip planning and Hours-of-Service log generation
//!
//! This worker connects to NATS and answers trip planning requests, or plans
//! a single trip from the command line.

mod cli;
mod config;
mod handlers;
mod services;
mod types;

use anyhow::Result;
use clap::Parser;
use tracing::{info, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use cli::{Cli, Command};
use services::hos::HosRules;
use services::trip_planner::TripPlanner;
use types::TripRequest;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs directory - use LOGS_DIR env var or default to ./logs
    let logs_dir = std::env::var("LOGS_DIR")
        .unwrap_or_else(|_| "logs".to_string());
    std::fs::create_dir_all(&logs_dir).ok();

    // File appender for persistent logs (daily rotation)
    let file_appender = RollingFileAppender::new(
        Rotation::DAILY,
        &logs_dir,
        "eld-planner-worker.log",
    );
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Console logs go to stderr so `plan` output stays pipeable
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,eld_planner_worker=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    let config = config::Config::from_env()?;
    let rules = HosRules::from_env()?;
    info!("Configuration loaded (HOS rules {})", rules.version);

    let planner = TripPlanner::from_config(&config, rules).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config, planner).await,
        Command::Plan { current, pickup, dropoff, cycle_used, pretty } => {
            let request = TripRequest {
                current_location: current,
                pickup_location: pickup,
                dropoff_location: dropoff,
                current_cycle_hours: cycle_used,
            };
            plan_once(&planner, &request, pretty).await
        }
    }
}

async fn serve(config: &config::Config, planner: TripPlanner) -> Result<()> {
    info!("Starting ELD Planner Worker...");

    // Connect to NATS (supports optional NATS_USER/NATS_PASSWORD auth).
    let nats_client = match (std::env::var("NATS_USER"), std::env::var("NATS_PASSWORD")) {
        (Ok(user), Ok(password)) if !user.is_empty() => {
            async_nats::ConnectOptions::new()
                .user_and_password(user, password)
                .connect(&config.nats_url)
                .await?
        }
        _ => async_nats::connect(&config.nats_url).await?,
    };
    info!("Connected to NATS at {}", config.nats_url);

    if let Err(e) = handlers::start_handlers(nats_client, planner).await {
        error!("Handler error: {}", e);
        return Err(e);
    }

    Ok(())
}

async fn plan_once(planner: &TripPlanner, request: &TripRequest, pretty: bool) -> Result<()> {
    let plan = planner.plan(request).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&plan)?
    } else {
        serde_json::to_string(&plan)?
    };
    println!("{}", json);

    Ok(())
}
