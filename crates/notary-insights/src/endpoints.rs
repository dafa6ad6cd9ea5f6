//! Route paths shared by the HTTP router, the dashboard client, and tests.

pub const HEALTH: &str = "/health";
pub const READY: &str = "/ready";
pub const METRICS: &str = "/metrics";
pub const STRATEGIC_INSIGHTS: &str = "/strategic-insights";
pub const OPERATING_MODE: &str = "/api/v1/mode";
