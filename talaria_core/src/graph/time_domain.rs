use jiff::tz::TimeZone;
use jiff::Timestamp;

// Bit layout of the packed conditional descriptor:
//   0      type (0 = year/month/day, 1 = nth weekday of month)
//   1-7    day-of-week mask, Sunday = bit 1<<0
//   8-12   begin hour
//   13-18  begin minute
//   19-23  end hour
//   24-29  end minute
//   30-33  begin month (1-12, 0 = unset)
//   34-38  begin day-of-month / weekday
//   39-41  begin week of month
//   42-45  end month
//   46-50  end day-of-month / weekday
//   51-53  end week of month

/// Packed time-domain descriptor for conditional access restrictions
/// ("Mo-Fr 07:00-09:00" and friends).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TimeDomain {
    value: u64,
}

impl TimeDomain {
    pub fn from_value(value: u64) -> TimeDomain {
        TimeDomain { value }
    }

    /// Day-of-week window with a time-of-day range. `dow_mask` uses
    /// Sunday = bit 0; an empty mask means every day.
    pub fn with_dow(dow_mask: u8, begin_hrs: u8, begin_mins: u8, end_hrs: u8, end_mins: u8) -> Self {
        let value = ((dow_mask as u64 & 0x7f) << 1)
            | ((begin_hrs as u64 & 0x1f) << 8)
            | ((begin_mins as u64 & 0x3f) << 13)
            | ((end_hrs as u64 & 0x1f) << 19)
            | ((end_mins as u64 & 0x3f) << 24);
        TimeDomain { value }
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn domain_type(&self) -> u8 {
        (self.value & 0x1) as u8
    }

    pub fn dow(&self) -> u8 {
        ((self.value >> 1) & 0x7f) as u8
    }

    pub fn begin_hrs(&self) -> u8 {
        ((self.value >> 8) & 0x1f) as u8
    }

    pub fn begin_mins(&self) -> u8 {
        ((self.value >> 13) & 0x3f) as u8
    }

    pub fn end_hrs(&self) -> u8 {
        ((self.value >> 19) & 0x1f) as u8
    }

    pub fn end_mins(&self) -> u8 {
        ((self.value >> 24) & 0x3f) as u8
    }

    pub fn begin_month(&self) -> u8 {
        ((self.value >> 30) & 0xf) as u8
    }

    pub fn begin_day_dow(&self) -> u8 {
        ((self.value >> 34) & 0x1f) as u8
    }

    pub fn begin_week(&self) -> u8 {
        ((self.value >> 39) & 0x7) as u8
    }

    pub fn end_month(&self) -> u8 {
        ((self.value >> 42) & 0xf) as u8
    }

    pub fn end_day_dow(&self) -> u8 {
        ((self.value >> 46) & 0x1f) as u8
    }

    pub fn end_week(&self) -> u8 {
        ((self.value >> 51) & 0x7) as u8
    }

    /// Whether the condition is active at `local_time` (epoch seconds) in the
    /// given timezone.
    pub fn is_active(&self, local_time: u64, tz: &TimeZone) -> bool {
        let Ok(timestamp) = Timestamp::from_second(local_time as i64) else {
            return false;
        };
        let zoned = timestamp.to_zoned(tz.clone());

        // Day-of-week mask, Sunday = bit 0.
        if self.dow() != 0 {
            let dow_bit = 1u8 << zoned.weekday().to_sunday_zero_offset();
            if self.dow() & dow_bit == 0 {
                return false;
            }
        }

        // Month window; wraps across the new year when begin > end.
        let month = zoned.month() as u8;
        if self.begin_month() != 0 {
            let (begin, end) = (self.begin_month(), self.end_month().max(self.begin_month()));
            let in_months = if self.begin_month() <= self.end_month() || self.end_month() == 0 {
                (begin..=end).contains(&month)
            } else {
                month >= self.begin_month() || month <= self.end_month()
            };
            if !in_months {
                return false;
            }

            // Day-of-month bounds only apply in year/month/day form and only
            // when the window sits inside a single month pair.
            if self.domain_type() == 0 && self.begin_day_dow() != 0 && self.end_day_dow() != 0 {
                let day = zoned.day() as u8;
                if month == self.begin_month() && day < self.begin_day_dow() {
                    return false;
                }
                if month == self.end_month() && day > self.end_day_dow() {
                    return false;
                }
            }
        }

        // Time-of-day range; 00:00-00:00 means the whole day and an end
        // before the begin wraps past midnight.
        let begin = u32::from(self.begin_hrs()) * 60 + u32::from(self.begin_mins());
        let end = u32::from(self.end_hrs()) * 60 + u32::from(self.end_mins());
        if begin == 0 && end == 0 {
            return true;
        }
        let now = zoned.hour() as u32 * 60 + zoned.minute() as u32;
        if begin <= end {
            (begin..=end).contains(&now)
        } else {
            now >= begin || now <= end
        }
    }
}
