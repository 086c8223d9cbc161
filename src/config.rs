//! Environment-driven settings
//!
//! Read once per process:
//!
//! - `SPRIG_COMMIT_DATE`: fixed commit timestamp (`%Y-%m-%d %H:%M:%S %z`)
//! - `SPRIG_LOG`: tracing filter directive (default `warn`)
//! - `SPRIG_LOG_FORMAT`: `text` (default) or `json`
//! - `NO_PAGER`: disable the pager for history output
//! - `NO_COLOR`: disable coloured output (colour is only used on terminals anyway)

use crate::logging::LogFormat;
use anyhow::Context;
use chrono::{DateTime, FixedOffset};

pub const COMMIT_DATE_ENV: &str = "SPRIG_COMMIT_DATE";
pub const LOG_ENV: &str = "SPRIG_LOG";
pub const LOG_FORMAT_ENV: &str = "SPRIG_LOG_FORMAT";
pub const NO_PAGER_ENV: &str = "NO_PAGER";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub commit_date: Option<DateTime<FixedOffset>>,
    pub log_filter: String,
    pub log_format: LogFormat,
    pub no_pager: bool,
    /// Emit ANSI colours in command output
    pub color: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            commit_date: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_format: LogFormat::default(),
            no_pager: false,
            color: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        let mut settings = Self::from_lookup(|key| std::env::var(key).ok())?;
        settings.color = std::env::var_os(NO_COLOR_ENV).is_none()
            && is_terminal::is_terminal(std::io::stdout());

        Ok(settings)
    }

    /// Build settings from an arbitrary key lookup, so tests need not touch the process env
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let commit_date = lookup(COMMIT_DATE_ENV)
            .map(|date| parse_commit_date(&date))
            .transpose()?;

        let log_filter = lookup(LOG_ENV)
            .filter(|filter| !filter.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        let log_format = match lookup(LOG_FORMAT_ENV) {
            Some(format) => LogFormat::parse(&format)
                .with_context(|| format!("{LOG_FORMAT_ENV} must be 'text' or 'json'"))?,
            None => LogFormat::default(),
        };

        let no_pager = lookup(NO_PAGER_ENV).is_some();

        Ok(Settings {
            commit_date,
            log_filter,
            log_format,
            no_pager,
            color: false,
        })
    }
}

fn parse_commit_date(date: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(date, COMMIT_DATE_FORMAT)
        .or_else(|_| DateTime::parse_from_rfc2822(date))
        .with_context(|| format!("invalid {COMMIT_DATE_ENV}: {date}"))
}
