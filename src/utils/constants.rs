//! Shared constants and invariants

pub const DEFAULT_CONFIG_PATH: &str = "average-calculator.yaml";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 9876;

/// Window capacity, number of unique values retained
pub const DEFAULT_WINDOW_SIZE: usize = 10;
/// Response budget; also the client-side timeout of every upstream call
pub const DEFAULT_RESPONSE_BUDGET_MS: u64 = 500;

pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://20.244.56.144/test";
pub const DEFAULT_AUTH_URL: &str = "http://20.244.56.144/test/auth";

pub const DEFAULT_METRICS_PATH: &str = "/metrics";

// Upstream request headers
pub const HEADER_CLIENT_ID: &str = "x-client-id";
pub const HEADER_CLIENT_SECRET: &str = "x-client-secret";

// Response messages
pub const INVALID_NUMBER_ID_MSG: &str = "Invalid number ID";
pub const BUDGET_EXCEEDED_MSG: &str = "Response time exceeded limit";
