//! Gateway replay entry point
//!
//! Run with:
//! ```bash
//! cargo run -p chat-client --bin chat-replay -- dispatches.jsonl
//! ```
//!
//! Reads one `{ "t": ..., "d": ... }` dispatch frame per line, applies each
//! to an offline client, and logs a registry summary at the end.
//! Configuration is loaded from environment variables.

use anyhow::Context;
use chat_client::{Client, OfflineCommands};
use chat_common::{try_init_tracing_with_config, SdkConfig};
use chat_model::DispatchFrame;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Debug, Default)]
struct ReplayStats {
    applied: usize,
    skipped: usize,
    failed: usize,
}

#[tokio::main]
async fn main() {
    let config = match SdkConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    if let Err(e) = try_init_tracing_with_config(config.tracing_config()) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(&config).await {
        error!(error = %e, "Replay failed");
        std::process::exit(1);
    }
}

async fn run(config: &SdkConfig) -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .context("usage: chat-replay <dispatches.jsonl>")?;

    info!(app = %config.app.name, env = ?config.app.env, path = %path, "Starting replay");

    let input = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading {path}"))?;

    let client = Client::from_config(config, Arc::new(OfflineCommands));
    let stats = replay(&client, &input);
    let summary = serde_json::to_string(&client.summary())?;

    info!(
        applied = stats.applied,
        skipped = stats.skipped,
        failed = stats.failed,
        summary = %summary,
        "Replay finished"
    );
    Ok(())
}

fn replay(client: &Client, input: &str) -> ReplayStats {
    let mut stats = ReplayStats::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let frame = match serde_json::from_str::<DispatchFrame>(line) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(line = line_no, error = %e, "Unreadable dispatch frame");
                stats.failed += 1;
                continue;
            }
        };

        match client.apply_dispatch(&frame.name, frame.data) {
            Ok(true) => stats.applied += 1,
            Ok(false) => stats.skipped += 1,
            Err(e) => {
                warn!(line = line_no, code = e.code(), error = %e, "Dispatch not applied");
                stats.failed += 1;
            }
        }
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_model::ChannelId;

    #[test]
    fn test_replay_counts_lines() {
        let input = [
            r#"{"t":"CHANNEL_CREATE","d":{"id":"10","type":0,"guild_id":"1"}}"#,
            r#"{"t":"GUILD_CREATE","d":{"id":"1","name":"guild"}}"#,
            "",
            r#"{"t":"TYPING_START","d":{}}"#,
            r#"{"t":"CHANNEL_UPDATE","d":{"id":"10"}}"#,
            "not json",
        ]
        .join("\n");

        let client = Client::new(Arc::new(OfflineCommands));
        let stats = replay(&client, &input);

        assert_eq!(stats.applied, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 2);
        assert!(client.channel(ChannelId::new(10)).is_some());
    }
}
