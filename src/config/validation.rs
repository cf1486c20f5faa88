//! Configuration validation
//!
//! Validates configuration and reports issues before a run starts.

use super::types::Config;

/// Result of configuration validation
#[derive(Debug, Clone)]
pub struct ConfigValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ConfigValidationResult {
    pub fn valid() -> Self {
        ConfigValidationResult {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_error(mut self, issue: ValidationIssue) -> Self {
        self.valid = false;
        self.errors.push(issue);
        self
    }

    pub fn with_warning(mut self, issue: ValidationIssue) -> Self {
        self.warnings.push(issue);
        self
    }
}

/// A validation issue
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationIssue {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Validate the configuration that a run is about to use. Missing secrets
/// are errors unless `llm.dry_run` is set, in which case they're warnings
/// (dry runs are expected to exercise the pipeline without live credentials).
pub fn validate_config(config: &Config) -> ConfigValidationResult {
    use secrecy::ExposeSecret;

    let mut result = ConfigValidationResult::valid();
    let severity = |result: ConfigValidationResult, issue: ValidationIssue| {
        if config.llm.dry_run {
            result.with_warning(issue)
        } else {
            result.with_error(issue)
        }
    };

    if config.platform.api_key.expose_secret().is_empty() {
        result = severity(
            result,
            ValidationIssue::new("platform.api_key", "INTERCOM_API_KEY is not set")
                .with_suggestion("Set the INTERCOM_API_KEY environment variable"),
        );
    }
    if config.platform.admin_id.is_empty() {
        result = severity(
            result,
            ValidationIssue::new("platform.admin_id", "MELVIN_ADMIN_ID is not set")
                .with_suggestion("Set the MELVIN_ADMIN_ID environment variable"),
        );
    }
    if config.toolserver.base_url.is_empty() {
        result = severity(
            result,
            ValidationIssue::new("toolserver.base_url", "MCP_BASE_URL is not set"),
        );
    }
    if config.validation_service.endpoint.is_empty() {
        result = severity(
            result,
            ValidationIssue::new("validation_service.endpoint", "VALIDATION_ENDPOINT is not set"),
        );
    }
    if config.llm.api_key.expose_secret().is_empty() {
        result = severity(
            result,
            ValidationIssue::new("llm.api_key", "OPENROUTER_API_KEY is not set"),
        );
    }

    if config.orchestrator.max_hops == 0 {
        result = result.with_error(ValidationIssue::new(
            "orchestrator.max_hops",
            "max_hops must be at least 1",
        ));
    }

    result
}
