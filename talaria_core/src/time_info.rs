use std::sync::LazyLock;

use jiff::civil;
use jiff::tz::TimeZone;
use jiff::{SignedDuration, Timestamp};

use crate::constants::{SECONDS_PER_DAY, SECONDS_PER_WEEK};

/// Transit schedules count days from this date.
const PIVOT_DATE: civil::Date = civil::date(2014, 1, 1);

const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Ordered registry of timezones referenced by node `timezone` indices.
/// Process-wide, initialised once, read-only thereafter.
pub struct TimeZoneDb {
    names: Vec<&'static str>,
    zones: Vec<TimeZone>,
}

static TZ_DB: LazyLock<TimeZoneDb> = LazyLock::new(|| {
    let names = vec![
        "UTC",
        "America/New_York",
        "America/Chicago",
        "America/Denver",
        "America/Los_Angeles",
        "America/Anchorage",
        "America/Toronto",
        "America/Mexico_City",
        "America/Sao_Paulo",
        "Europe/London",
        "Europe/Dublin",
        "Europe/Paris",
        "Europe/Berlin",
        "Europe/Madrid",
        "Europe/Rome",
        "Europe/Amsterdam",
        "Europe/Warsaw",
        "Europe/Kyiv",
        "Europe/Moscow",
        "Africa/Cairo",
        "Africa/Johannesburg",
        "Africa/Lagos",
        "Asia/Dubai",
        "Asia/Karachi",
        "Asia/Kolkata",
        "Asia/Dhaka",
        "Asia/Bangkok",
        "Asia/Shanghai",
        "Asia/Singapore",
        "Asia/Tokyo",
        "Asia/Seoul",
        "Australia/Perth",
        "Australia/Sydney",
        "Pacific/Auckland",
    ];
    let zones = names
        .iter()
        .map(|name| TimeZone::get(name).unwrap_or(TimeZone::UTC))
        .collect();
    TimeZoneDb { names, zones }
});

impl TimeZoneDb {
    pub fn global() -> &'static TimeZoneDb {
        &TZ_DB
    }

    pub fn from_index(&self, index: u32) -> Option<&TimeZone> {
        self.zones.get(index as usize)
    }

    pub fn name(&self, index: u32) -> Option<&'static str> {
        self.names.get(index as usize).copied()
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.names.iter().position(|n| *n == name).map(|i| i as u32)
    }
}

/// Tracks local time along the path. `local_time` is epoch seconds and does
/// not depend on the timezone; `second_of_week` is local (Monday 00:00) and
/// shifts when the path crosses a timezone boundary.
#[derive(Copy, Clone, Debug)]
pub struct TimeInfo {
    pub valid: bool,
    pub timezone_index: u32,
    pub local_time: u64,
    pub second_of_week: u32,
}

impl TimeInfo {
    /// Timeless routes behave as if they left Monday at noon.
    pub fn invalid() -> TimeInfo {
        TimeInfo {
            valid: false,
            timezone_index: 0,
            local_time: 0,
            second_of_week: 12 * 3_600,
        }
    }

    /// Parses a local date-time (`YYYY-MM-DDTHH:MM`) in the indexed timezone.
    pub fn from_date_time(date_time: &str, timezone_index: u32) -> TimeInfo {
        let db = TimeZoneDb::global();
        let Some(tz) = db.from_index(timezone_index) else {
            return TimeInfo::invalid();
        };
        let Ok(civil_dt) = civil::DateTime::strptime(DATE_TIME_FORMAT, date_time) else {
            return TimeInfo::invalid();
        };
        let Ok(zoned) = civil_dt.to_zoned(tz.clone()) else {
            return TimeInfo::invalid();
        };

        let dow = zoned.weekday().to_monday_zero_offset() as u32;
        let second_of_week = dow * SECONDS_PER_DAY
            + zoned.hour() as u32 * 3_600
            + zoned.minute() as u32 * 60
            + zoned.second() as u32;

        TimeInfo {
            valid: true,
            timezone_index,
            local_time: zoned.timestamp().as_second() as u64,
            second_of_week,
        }
    }

    /// Advances by `seconds` into the timezone at `next_timezone_index`,
    /// shifting `second_of_week` by the offset delta when the zone changes.
    pub fn forward(self, seconds: f64, next_timezone_index: u32) -> TimeInfo {
        if !self.valid {
            return self;
        }

        let seconds = seconds.round() as i64;
        let local_time = self.local_time.saturating_add_signed(seconds);
        let mut second_of_week = i64::from(self.second_of_week) + seconds;

        if next_timezone_index != self.timezone_index {
            let db = TimeZoneDb::global();
            if let (Some(current), Some(next), Ok(at)) = (
                db.from_index(self.timezone_index),
                db.from_index(next_timezone_index),
                Timestamp::from_second(local_time as i64),
            ) {
                let delta =
                    next.to_offset(at).seconds() as i64 - current.to_offset(at).seconds() as i64;
                second_of_week += delta;
            }
        }

        second_of_week = second_of_week.rem_euclid(i64::from(SECONDS_PER_WEEK));

        TimeInfo {
            valid: true,
            timezone_index: next_timezone_index,
            local_time,
            second_of_week: second_of_week as u32,
        }
    }

    pub fn second_of_day(&self) -> u32 {
        self.second_of_week % SECONDS_PER_DAY
    }
}

/// Days between the schedule pivot date and the date of a local date-time
/// string; `None` when the string does not parse or predates the pivot.
pub fn days_from_pivot_date(date_time: &str) -> Option<u32> {
    let date = civil::DateTime::strptime(DATE_TIME_FORMAT, date_time)
        .ok()?
        .date();
    let days = PIVOT_DATE.until(date).ok()?.get_days();
    u32::try_from(days).ok()
}

/// Formats `date_time + offset_secs` in the given timezone, with a trailing
/// timezone abbreviation, e.g. `2019-05-10T08:15-04:00 EDT`.
pub fn get_duration(date_time: &str, offset_secs: i64, tz: &TimeZone) -> Option<String> {
    let civil_dt = civil::DateTime::strptime(DATE_TIME_FORMAT, date_time).ok()?;
    let zoned = civil_dt.to_zoned(tz.clone()).ok()?;
    let shifted = zoned
        .checked_add(SignedDuration::from_secs(offset_secs))
        .ok()?;
    Some(shifted.strftime("%Y-%m-%dT%H:%M%:z %Z").to_string())
}
