use std::time::Duration;

/// Standard date format used throughout the codebase: "2025-01-15"
pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Generation timestamp embedded in output file names: "20250115_093000"
pub(crate) const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Row cap the query service applies to a single call
pub(crate) const DEFAULT_MAX_RESULT_SIZE: usize = 10_000;

pub(crate) const LOGIN_TIMEOUT: Duration = Duration::from_secs(90);
pub(crate) const QUERY_TIMEOUT: Duration = Duration::from_secs(30);

pub(crate) const SERVICE_PATH: &str = "/mge/service.sbr";
pub(crate) const LOGIN_SERVICE: &str = "MobileLoginSP.login";
pub(crate) const LOGOUT_SERVICE: &str = "MobileLoginSP.logout";
pub(crate) const QUERY_SERVICE: &str = "DbExplorerSP.executeQuery";

pub(crate) const ENV_USER: &str = "SANKHYA_USER";
pub(crate) const ENV_PASSWORD: &str = "SANKHYA_PASSWORD";
pub(crate) const ENV_HOST: &str = "SANKHYA_HOST";
pub(crate) const ENV_PORT: &str = "SANKHYA_PORT";

pub(crate) const DEFAULT_JOB: &str = "items";
pub(crate) const DEFAULT_SINCE: &str = "2023-01-01";
pub(crate) const DEFAULT_UNTIL: &str = "2024-01-01";
pub(crate) const DEFAULT_OUTPUT_DIR: &str = "raw";
pub(crate) const DEFAULT_PATTERN: &str = "*.csv";
pub(crate) const DEFAULT_AGGREGATE_OUTPUT: &str = "files.csv";
