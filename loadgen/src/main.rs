//! Fluxgate Load Generator
//!
//! Floods a Fluxgate ingestion service with randomly generated log entries
//! to exercise the write path end to end. Every entry is sent from its own
//! task, and the run only reports once all submissions have finished.
//!
//! # Usage
//!
//! ```bash
//! fluxgate-loadgen --count 500 --url http://localhost:8080
//! fluxgate-loadgen -n 10
//! ```

#![deny(unsafe_code)]

use clap::Parser;
use tokio::task::JoinSet;

mod submit;
mod synth;

/// Fluxgate load generator - sends synthetic log entries to the ingestion service
#[derive(Parser)]
#[command(name = "fluxgate-loadgen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Number of log entries to generate
    #[arg(short = 'n', long, default_value_t = 100)]
    count: usize,

    /// Ingestion service URL
    #[arg(long, env = "FLUXGATE_URL", default_value = "http://app:80")]
    url: String,
}

/// Outcome of one generator run.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    /// Entries answered with 204 No Content.
    succeeded: usize,
    /// Entries that failed in transport or came back with any other status.
    failed: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    tracing::info!(count = cli.count, url = %cli.url, "Starting load generation");
    let summary = run(cli.count, &cli.url).await;
    tracing::info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "Load generation complete"
    );

    Ok(())
}

/// Sends `count` random entries to `url`, one concurrent task per entry,
/// and waits for every submission to finish.
async fn run(count: usize, url: &str) -> Summary {
    let client = reqwest::Client::new();
    let mut tasks = JoinSet::new();

    for _ in 0..count {
        let client = client.clone();
        let url = url.to_string();
        tasks.spawn(async move {
            let entry = synth::random_entry();
            submit::send_entry(&client, &url, &entry).await
        });
    }

    let mut summary = Summary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {
                tracing::info!("Log entry sent successfully");
                summary.succeeded += 1;
            }
            Ok(Err(error)) => {
                tracing::error!(error = %error, "Error sending log entry");
                summary.failed += 1;
            }
            Err(error) => {
                tracing::error!(error = %error, "Sender task failed");
                summary.failed += 1;
            }
        }
    }

    summary
}
