// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Host simulation of the monitor.
//!
//! A random-walk sensor feeds the pipeline, the display and LED print to the
//! log, and pressing Enter acts as the button. Deep sleep exits the process.

use anyhow::Context;
use clap::Parser;
use pulsewatch::config::MonitorConfig;
use pulsewatch::http::ReqwestClient;
use pulsewatch::input::ButtonInterrupt;
use pulsewatch::sim::{
    ConsoleDisplay, ConsoleLed, DryRunClient, ProcessSleeper, RandomWalkSensor, SimulatedButton,
    SimulatedWifi,
};
use pulsewatch::{Devices, HttpClient, TokioMonitor};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const ASSOCIATION_DELAY: Duration = Duration::from_millis(500);
const BUTTON_HOLD: Duration = Duration::from_millis(150);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Parser)]
#[command(name = "pulsewatch", version, about = "Vital-signs monitor host simulation")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log dashboard requests instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Seed for the simulated sensor
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Sensor reads per detected beat
    #[arg(long, default_value_t = 10)]
    beat_every: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };

    if args.dry_run {
        run(args, config, DryRunClient).await
    } else {
        let http = ReqwestClient::new(REQUEST_TIMEOUT).context("creating HTTP client")?;
        run(args, config, http).await
    }
}

async fn run<H: HttpClient>(args: Args, config: MonitorConfig, http: H) -> anyhow::Result<()> {
    let button_pin = config.pins.button;
    let (wifi, link_events) = SimulatedWifi::new(ASSOCIATION_DELAY);
    let button = SimulatedButton::default();

    let devices = Devices {
        sensor: RandomWalkSensor::new(args.seed, args.beat_every),
        display: ConsoleDisplay::default(),
        http,
        wifi: wifi.clone(),
        led: ConsoleLed::new(config.pins.led),
        button: button.clone(),
        sleeper: ProcessSleeper,
    };

    let handle = TokioMonitor::new(config)?.start(devices, link_events)?;
    wifi.start();
    tokio::spawn(watch_keyboard(handle.button_interrupt(), button, button_pin));

    let cancel_token = handle.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, shutting down");
            cancel_token.cancel();
        }
    });

    tracing::info!("Press Enter to simulate the button, Ctrl-C to quit");
    handle.join().await?;
    Ok(())
}

async fn watch_keyboard(interrupt: ButtonInterrupt, button: SimulatedButton, pin: u8) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(_)) = lines.next_line().await {
        button.press();
        interrupt.on_falling_edge(pin);
        tokio::time::sleep(BUTTON_HOLD).await;
        button.release();
    }
}
