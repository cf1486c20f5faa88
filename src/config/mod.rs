//! Configuration module - modular configuration management
//!
//! Split into focused modules, one per external collaborator, following this
//! codebase's existing pattern:
//! - types/mod.rs: top-level `Config` aggregate
//! - types/platform.rs, toolserver.rs, validation_service.rs, llm.rs, prompts.rs: per-collaborator settings
//! - types/orchestrator.rs: hop/action budgets and harness settings
//! - io.rs: loading and saving
//! - validation.rs: pre-flight validation
//! - paths.rs: config file paths

mod io;
mod paths;
mod types;
mod validation;

pub use types::{Config};
pub use types::llm::LlmConfig;
pub use types::orchestrator::OrchestratorConfig;
pub use types::platform::PlatformConfig;
pub use types::prompts::PromptsConfig;
pub use types::toolserver::ToolServerConfig;
pub use types::validation_service::ValidationServiceConfig;

pub use io::{apply_env_overrides, load_config, load_config_from_env, load_config_from_path, save_config, ConfigSnapshot};
pub use paths::{config_dir, config_path};
pub use validation::{validate_config, ConfigValidationResult, ValidationIssue};
