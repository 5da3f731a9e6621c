//! Time left until a player's daily arena payouts.

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::server::model::user::PayoutTimes;

/// Squad arena pays out at local 18:00, six hours before local midnight.
const CHAR_ARENA_HOURS_BEFORE_MIDNIGHT: i64 = 6;
/// Fleet arena pays out at local 19:00.
const FLEET_ARENA_HOURS_BEFORE_MIDNIGHT: i64 = 5;

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Formats the time left until both arena payouts for a player.
///
/// # Arguments
/// - `po_offset` - The player's payout offset in minutes, as stored by the bot
/// - `now` - Current time
///
/// # Returns
/// - `PayoutTimes` - Both countdowns, each less than 24 hours
pub fn format_payout_times(po_offset: i64, now: DateTime<Utc>) -> PayoutTimes {
    PayoutTimes {
        char: format_ms(time_left_ms(po_offset, CHAR_ARENA_HOURS_BEFORE_MIDNIGHT, now)),
        fleet: format_ms(time_left_ms(po_offset, FLEET_ARENA_HOURS_BEFORE_MIDNIGHT, now)),
    }
}

fn time_left_ms(po_offset: i64, hours_before_midnight: i64, now: DateTime<Utc>) -> i64 {
    let utc_midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    let payout = utc_midnight - Duration::minutes(po_offset) + Duration::days(1)
        - Duration::milliseconds(1)
        - Duration::hours(hours_before_midnight);

    (payout - now).num_milliseconds().rem_euclid(MS_PER_DAY)
}

fn format_ms(ms: i64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{}h {}m", hours, minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn counts_down_from_utc_midnight() {
        let times = format_payout_times(0, at(0, 0));
        assert_eq!(times.char, "17h 59m");
        assert_eq!(times.fleet, "18h 59m");
    }

    #[test]
    fn offset_shifts_payout() {
        let times = format_payout_times(60, at(0, 0));
        assert_eq!(times.char, "16h 59m");
        assert_eq!(times.fleet, "17h 59m");

        let times = format_payout_times(-300, at(12, 30));
        assert_eq!(times.char, "10h 29m");
        assert_eq!(times.fleet, "11h 29m");
    }

    #[test]
    fn passed_payout_rolls_to_next_day() {
        let times = format_payout_times(0, at(20, 0));
        assert_eq!(times.char, "21h 59m");
        assert_eq!(times.fleet, "22h 59m");
    }

    #[test]
    fn countdown_stays_under_a_day_for_far_west_offsets() {
        let times = format_payout_times(-720, at(1, 0));
        assert_eq!(times.char, "4h 59m");
        assert_eq!(times.fleet, "5h 59m");
    }
}
