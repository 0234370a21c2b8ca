use std::time::Duration;

/// Event store used when no `api_url` is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Prefix for environment overrides (`CALBOARD_API_URL`, ...).
pub const ENV_PREFIX: &str = "CALBOARD";

/// Prefilled times of a fresh add-event form.
pub const DEFAULT_START_TIME: &str = "09:00";
pub const DEFAULT_END_TIME: &str = "10:00";
