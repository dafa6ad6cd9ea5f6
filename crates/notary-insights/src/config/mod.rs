use chrono::NaiveTime;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Whether signing and verification flows run against live providers.
///
/// Read once at startup; nothing mutates it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatingMode {
    Real,
    Simulated,
}

impl OperatingMode {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "real" | "production" => Ok(Self::Real),
            "simulated" | "simulation" | "demo" => Ok(Self::Simulated),
            other => Err(ConfigError::InvalidMode {
                value: other.to_string(),
            }),
        }
    }

    pub fn strict_verification(self) -> bool {
        matches!(self, Self::Real)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub mode: OperatingMode,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub reports: ReportScheduleConfig,
    pub ledger_csv: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let mode = OperatingMode::parse(&env::var("APP_MODE").unwrap_or_else(|_| "real".into()))?;

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let report_time = env::var("APP_REPORT_TIME").unwrap_or_else(|_| "08:00".to_string());
        let run_at = NaiveTime::parse_from_str(report_time.trim(), "%H:%M").map_err(|_| {
            ConfigError::InvalidReportTime {
                value: report_time.clone(),
            }
        })?;
        let tick_secs = env::var("APP_REPORT_TICK_SECS")
            .unwrap_or_else(|_| "60".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| (1..=MAX_REPORT_TICK_SECS).contains(secs))
            .ok_or(ConfigError::InvalidReportTick)?;

        let ledger_csv = env::var("APP_LEDGER_CSV")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            mode,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            reports: ReportScheduleConfig {
                run_at,
                tick: Duration::from_secs(tick_secs),
            },
            ledger_csv,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Longest poll interval that still lands a tick inside every minute.
pub const MAX_REPORT_TICK_SECS: u64 = 60;

/// When the periodic activity digests fire, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportScheduleConfig {
    pub run_at: NaiveTime,
    pub tick: Duration,
}

impl Default for ReportScheduleConfig {
    fn default() -> Self {
        Self {
            run_at: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            tick: Duration::from_secs(60),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidMode { value: String },
    InvalidReportTime { value: String },
    InvalidReportTick,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidMode { value } => {
                write!(f, "APP_MODE must be 'real' or 'simulated', got '{value}'")
            }
            ConfigError::InvalidReportTime { value } => {
                write!(f, "APP_REPORT_TIME must be HH:MM, got '{value}'")
            }
            ConfigError::InvalidReportTick => {
                write!(
                    f,
                    "APP_REPORT_TICK_SECS must be between 1 and {MAX_REPORT_TICK_SECS}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMode { .. }
            | ConfigError::InvalidReportTime { .. }
            | ConfigError::InvalidReportTick => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_MODE");
        env::remove_var("APP_REPORT_TIME");
        env::remove_var("APP_REPORT_TICK_SECS");
        env::remove_var("APP_LEDGER_CSV");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.mode, OperatingMode::Real);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.reports, ReportScheduleConfig::default());
        assert!(config.ledger_csv.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn simulated_mode_disables_strict_verification() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MODE", "Simulated");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.mode, OperatingMode::Simulated);
        assert!(!config.mode.strict_verification());
    }

    #[test]
    fn rejects_unknown_mode_and_bad_report_time() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MODE", "sandbox");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidMode { .. })
        ));

        reset_env();
        env::set_var("APP_REPORT_TIME", "25:99");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidReportTime { .. })
        ));
    }

    #[test]
    fn rejects_report_ticks_that_can_skip_a_minute() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_REPORT_TICK_SECS", "90");
        let err = AppConfig::load().expect_err("tick over a minute is rejected");
        assert!(matches!(err, ConfigError::InvalidReportTick));
        assert!(err.to_string().contains("between 1 and 60"));

        reset_env();
        env::set_var("APP_REPORT_TICK_SECS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidReportTick)
        ));

        reset_env();
        env::set_var("APP_REPORT_TICK_SECS", "60");
        let config = AppConfig::load().expect("one-minute tick is accepted");
        assert_eq!(config.reports.tick, Duration::from_secs(60));
    }

    #[test]
    fn parses_custom_report_schedule() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_REPORT_TIME", "06:30");
        env::set_var("APP_REPORT_TICK_SECS", "15");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.reports.run_at,
            NaiveTime::from_hms_opt(6, 30, 0).expect("valid time")
        );
        assert_eq!(config.reports.tick, Duration::from_secs(15));
    }
}
