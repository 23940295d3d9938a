//! philo-clock-rs: talking analog clock with twelve philosophers at the
//! hour marks. Every second the philosopher for the current hour says the
//! time in 24-hour format.

mod announcer;
mod config;
mod controls;
mod phrases;
mod service;
mod speech;
mod surface;
mod ticker;

use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "philo-clock-rs", about = "Talking analog clock")]
struct Args {
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start with speech disabled
    #[arg(long)]
    no_speech: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("philo-clock-rs starting");

    let config = config::Config::load(args.config.as_deref());

    // No speech capability, no clock: surface this before the loop starts.
    let backend = speech::TtsBackend::new(&config.speech)?;

    let speech_enabled = config.speech.enabled && !args.no_speech;
    let announcer = announcer::Announcer::spawn(
        config.queue.capacity,
        speech_enabled,
        Box::new(backend),
    );

    let (control_tx, control_rx) = mpsc::channel(16);
    tokio::spawn(controls::run(control_tx));

    let mut service = service::ClockService::new(config, announcer);
    service.run(control_rx).await?;

    info!("Goodbye");
    Ok(())
}
