use chrono::{FixedOffset, NaiveTime};

use crate::domain::BidUpdate;
use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Running,
    Paused,
}

/// Daily recurring range during which a line item must not deliver.
///
/// `start` is inclusive and `end` exclusive. When `start >= end` the window
/// wraps past midnight, so `start == end` pauses for the whole day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseWindow {
    start: NaiveTime,
    end: NaiveTime,
    offset: FixedOffset,
}

impl PauseWindow {
    pub fn new(start: NaiveTime, end: NaiveTime, offset: FixedOffset) -> Self {
        Self { start, end, offset }
    }

    /// Builds a window from `HH:MM` bounds and a `+HH:MM` offset.
    pub fn parse(start: &str, end: &str, offset: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(
            parse_time_of_day(start)?,
            parse_time_of_day(end)?,
            parse_utc_offset(offset)?,
        ))
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    pub fn wraps_midnight(&self) -> bool {
        self.start >= self.end
    }

    pub fn state_at(&self, now: NaiveTime) -> WindowState {
        let paused = if self.wraps_midnight() {
            now >= self.start || now < self.end
        } else {
            self.start <= now && now < self.end
        };

        if paused {
            WindowState::Paused
        } else {
            WindowState::Running
        }
    }

    pub fn decide(&self, line_item_id: &str, now: NaiveTime) -> BidUpdate {
        match self.state_at(now) {
            WindowState::Paused => BidUpdate::pause(line_item_id),
            WindowState::Running => BidUpdate::resume(line_item_id),
        }
    }
}

impl std::fmt::Display for PauseWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}) {}",
            self.start.format("%H:%M"),
            self.end.format("%H:%M"),
            self.offset
        )
    }
}

pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ConfigError::InvalidTimeOfDay(value.to_string()))
}

pub fn parse_utc_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidUtcOffset(value.to_string());
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("z") || trimmed.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    // chrono stops at the offset and ignores trailing input, so pin the shape to ±HH:MM.
    if trimmed.len() != 6 || trimmed.as_bytes()[3] != b':' {
        return Err(invalid());
    }
    let offset: FixedOffset = trimmed.parse().map_err(|_| invalid())?;
    if offset.local_minus_utc().abs() > 14 * 3600 {
        return Err(invalid());
    }

    Ok(offset)
}
