//! # Melvin
//!
//! A bounded, multi-hop customer-support agent orchestrator: a single
//! async state machine (Initialize -> Plan -> Gather -> Coverage ->
//! [Action] -> Draft -> Validate -> Response/Escalate -> Finalize) that
//! coordinates an LLM planner/drafter, a JSON-RPC tool server, a
//! messaging-platform client, a validation/policy service, and a prompt
//! registry under strict hop and action budgets.
//!
//! ## Architecture
//!
//! - **State** (`state`): the `RunState`/`Node` graph and per-hop records
//!   threaded through every stage.
//! - **Orchestrator** (`orchestrator`): the dispatch loop and one module per
//!   stage under `orchestrator::stages`.
//! - **Configuration** (`config`): modular configuration, one file per
//!   external collaborator.
//! - **Platform** (`platform`): the messaging-platform REST client.
//! - **Tool server** (`toolserver`): the JSON-RPC 2.0 tool client and action
//!   catalog.
//! - **Validation service** (`validation_service`): the policy-check client.
//! - **LLM** (`llm`): the planner/drafter provider profiles and structured
//!   (forced function-call) generation helper.
//! - **Prompts** (`prompts`): the prompt registry and `{key}` templating.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use support_orchestrator::config::load_config;
//! use support_orchestrator::orchestrator::Orchestrator;
//! use support_orchestrator::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = load_config()?;
//!     let orchestrator = Orchestrator::from_config(&config)?;
//!     let outcome = orchestrator.run_conversation("12345").await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

#[path = "config/mod.rs"]
pub mod config;

pub mod error;
pub mod llm;
pub mod orchestrator;
pub mod platform;
pub mod prompts;
pub mod state;
pub mod toolserver;
pub mod tracing_setup;
pub mod validation_service;

pub use error::{Error, Result};
pub use orchestrator::{Orchestrator, RunOutcome};
pub use tracing_setup::init_tracing;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const NAME: &str = env!("CARGO_PKG_NAME");
