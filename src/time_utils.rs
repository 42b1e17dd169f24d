// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for wall-clock fields.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

/// Hour of day (0–23) in the timestamp's own zone.
pub fn hour_of_day<Tz: TimeZone>(date: &DateTime<Tz>) -> u32 {
    date.hour()
}

/// Day of week counted from Sunday = 0.
pub fn day_of_week<Tz: TimeZone>(date: &DateTime<Tz>) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Current local hour, as seen by the person holding the device.
pub fn current_local_hour() -> u32 {
    hour_of_day(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_hour_and_weekday_use_own_zone() {
        // 2024-01-14 is a Sunday
        let utc = Utc.with_ymd_and_hms(2024, 1, 14, 23, 30, 0).unwrap();
        assert_eq!(hour_of_day(&utc), 23);
        assert_eq!(day_of_week(&utc), 0);

        let tokyo = utc.with_timezone(&FixedOffset::east_opt(9 * 3600).unwrap());
        assert_eq!(hour_of_day(&tokyo), 8);
        assert_eq!(day_of_week(&tokyo), 1);
    }
}
