use std::fmt;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use filetime::FileTime;
use thiserror::Error;

/// Mode used to create paths when no `--mode` is given.
pub const DEFAULT_MODE: Mode = Mode(0o755);

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M";
const TIMESTAMP_LEN: usize = 12;

/// Failures while turning flag text into typed options. Both are fatal to the
/// whole invocation and happen before any path is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("invalid mode: `{value}` is not an octal permission value ({reason})")]
    InvalidMode { value: String, reason: String },
    #[error("invalid timestamp format: `{value}` does not match YYYYMMDDhhmm ({reason})")]
    InvalidTimestamp { value: String, reason: String },
}

/// Permission bits parsed from an octal string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Mode(u32);

impl Mode {
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Bits the host permission model understands (rwx plus setuid/setgid/sticky).
    pub fn permission_bits(self) -> u32 {
        self.0 & 0o7777
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

/// Absolute UTC instant with minute resolution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn to_file_time(self) -> FileTime {
        FileTime::from_unix_time(self.0.timestamp(), 0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M UTC"))
    }
}

/// Parse an octal permission string. Empty input means no mode was requested.
pub fn parse_mode(raw: &str) -> Result<Option<Mode>, OptionsError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let invalid = |reason: &str| OptionsError::InvalidMode {
        value: raw.to_owned(),
        reason: reason.to_owned(),
    };

    // from_str_radix tolerates a leading `+`; octal digits only here.
    if !raw.bytes().all(|b| (b'0'..=b'7').contains(&b)) {
        return Err(invalid("expected digits 0-7"));
    }

    u32::from_str_radix(raw, 8)
        .map(|bits| Some(Mode(bits)))
        .map_err(|err| invalid(&err.to_string()))
}

/// Parse a `YYYYMMDDhhmm` timestamp as UTC. Empty input means timestamps
/// are left alone.
pub fn parse_timestamp(raw: &str) -> Result<Option<Timestamp>, OptionsError> {
    if raw.is_empty() {
        return Ok(None);
    }

    let invalid = |reason: String| OptionsError::InvalidTimestamp {
        value: raw.to_owned(),
        reason,
    };

    if raw.len() != TIMESTAMP_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("expected {TIMESTAMP_LEN} digits")));
    }

    let naive = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|err| invalid(err.to_string()))?;
    Ok(Some(Timestamp(Utc.from_utc_datetime(&naive))))
}

/// Everything the materializer needs for one run, resolved up front.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MaterializeOptions {
    /// Explicit mode; also applied to paths that already exist.
    pub mode: Option<Mode>,
    pub timestamp: Option<Timestamp>,
    pub no_create: bool,
    pub verbose: bool,
}

impl MaterializeOptions {
    /// Parse raw flag values. Missing values are treated like empty strings.
    pub fn from_raw(
        mode: Option<&str>,
        timestamp: Option<&str>,
        no_create: bool,
        verbose: bool,
    ) -> Result<Self, OptionsError> {
        Ok(Self {
            mode: parse_mode(mode.unwrap_or_default())?,
            timestamp: parse_timestamp(timestamp.unwrap_or_default())?,
            no_create,
            verbose,
        })
    }

    /// Mode for newly created files and directories.
    pub fn creation_mode(&self) -> Mode {
        self.mode.unwrap_or(DEFAULT_MODE)
    }
}
