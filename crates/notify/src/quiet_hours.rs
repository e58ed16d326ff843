// SPDX-License-Identifier: MIT

//! Quiet-hours window check (§4.6 step 2), with wrap-around support.

use crate::config::QuietHoursConfig;
use crate::error::{NotifyError, Result};
use chrono::{DateTime, FixedOffset, NaiveTime, Utc};

/// `true` when `now` falls inside the configured quiet-hours window.
pub fn is_quiet(config: &QuietHoursConfig, now: DateTime<Utc>) -> Result<bool> {
    if !config.enabled {
        return Ok(false);
    }
    let offset = parse_offset(&config.timezone)?;
    let local = now.with_timezone(&offset);
    let start = parse_hhmm(&config.start)?;
    let end = parse_hhmm(&config.end)?;
    let current = local.time();

    Ok(if start <= end {
        current >= start && current < end
    } else {
        // Wraps past midnight, e.g. 22:00-08:00.
        current >= start || current < end
    })
}

fn parse_offset(spec: &str) -> Result<FixedOffset> {
    // Accept compact "+HHMM" as well as the canonical "+HH:MM".
    let normalized = if spec.len() == 5 && !spec.contains(':') {
        format!("{}:{}", &spec[..3], &spec[3..])
    } else {
        spec.to_string()
    };
    let with_seconds = format!("2000-01-01T00:00:00{normalized}");
    DateTime::parse_from_rfc3339(&with_seconds)
        .map(|dt| *dt.offset())
        .map_err(|e| NotifyError::Config(format!("invalid timezone {spec}: {e}")))
}

fn parse_hhmm(spec: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(spec, "%H:%M").map_err(|e| NotifyError::Config(format!("invalid time {spec}: {e}")))
}

#[cfg(test)]
#[path = "quiet_hours_tests.rs"]
mod tests;
