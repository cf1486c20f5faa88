//! Evaluation harness: runs a list of conversation IDs through the
//! orchestrator with bounded concurrency and prints one JSON line per
//! completed run. Not a CLI for operating the agent.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use support_orchestrator::config::load_config;
use support_orchestrator::orchestrator::Orchestrator;
use support_orchestrator::{init_tracing, Error, Result};
use tokio::sync::Semaphore;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "run-batch",
    about = "Run many conversations through the support orchestrator concurrently",
    long_about = None
)]
struct Args {
    /// Conversation IDs to run, e.g. `--conversation 123 --conversation 456`
    #[arg(long = "conversation")]
    conversations: Vec<String>,

    /// File with one conversation ID per line, read in addition to `--conversation`
    #[arg(long)]
    conversations_file: Option<PathBuf>,

    /// Maximum number of conversations run concurrently
    #[arg(long, env = "EVAL_CONCURRENCY", default_value_t = 3)]
    concurrency: usize,
}

#[derive(serde::Serialize)]
struct BatchLine<'a> {
    conversation_id: &'a str,
    status: Option<&'static str>,
    hops: Option<usize>,
    actions_taken: Option<u32>,
    duration_ms: Option<u64>,
    error: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut conversation_ids = args.conversations.clone();
    if let Some(path) = &args.conversations_file {
        let contents = tokio::fs::read_to_string(path).await?;
        conversation_ids.extend(
            contents
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        );
    }

    if conversation_ids.is_empty() {
        return Err(Error::InvalidInput(
            "no conversation ids supplied; pass --conversation or --conversations-file".to_string(),
        ));
    }

    let config = load_config()?;
    let orchestrator = Arc::new(Orchestrator::from_config(&config)?);
    let semaphore = Arc::new(Semaphore::new(args.concurrency.max(1)));

    let mut handles = Vec::with_capacity(conversation_ids.len());
    for conversation_id in conversation_ids {
        let orchestrator = Arc::clone(&orchestrator);
        let semaphore = Arc::clone(&semaphore);
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            let result = orchestrator.run_conversation(&conversation_id).await;
            (conversation_id, result)
        }));
    }

    let mut failures = 0usize;
    for handle in handles {
        let (conversation_id, result) = handle.await.map_err(|e| Error::Internal(e.to_string()))?;
        let line = match &result {
            Ok(outcome) => BatchLine {
                conversation_id: &conversation_id,
                status: Some(outcome.status.as_attribute_value()),
                hops: Some(outcome.hops),
                actions_taken: Some(outcome.actions_taken),
                duration_ms: Some(outcome.duration_ms),
                error: None,
            },
            Err(e) => {
                failures += 1;
                BatchLine {
                    conversation_id: &conversation_id,
                    status: None,
                    hops: None,
                    actions_taken: None,
                    duration_ms: None,
                    error: Some(e.to_string()),
                }
            }
        };
        println!("{}", serde_json::to_string(&line)?);
        if let Err(e) = &result {
            error!(conversation_id, error = %e, "conversation run failed");
        }
    }

    info!(failures, "batch run complete");
    Ok(())
}
