/// Countdown to the date night.
///
/// The target is computed once from "now" and the configured occasion; the
/// breakdown is recomputed from absolute instants on every refresh, so a late
/// or skipped tick never skews the display.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone};

const MS_PER_SECOND: i64 = 1000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// How far a leap-day occasion may be pushed forward looking for a valid year.
const MAX_YEAR_SEARCH: i32 = 8;

/// Month/day/time of the yearly occasion, in local wall-clock terms.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Occasion {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl Occasion {
    /// February 13, 9:00 PM.
    pub const DATE_NIGHT: Occasion = Occasion { month: 2, day: 13, hour: 21, minute: 0 };

    /// Does this month/day/time exist in at least one year?
    pub fn is_valid(&self) -> bool {
        // 2024 is a leap year, so Feb 29 passes here.
        NaiveDate::from_ymd_opt(2024, self.month, self.day)
            .and_then(|d| d.and_hms_opt(self.hour, self.minute, 0))
            .is_some()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct TimeLeft {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeLeft {
    pub fn is_zero(&self) -> bool {
        *self == TimeLeft::default()
    }
}

/// Next occurrence of `occasion` as seen from `now`.
///
/// Compares month first, then day: anything after the occasion date rolls to
/// next year, the occasion day itself does not (even after the hour passed).
pub fn target_instant<Tz: TimeZone>(now: &DateTime<Tz>, occasion: Occasion) -> DateTime<Tz> {
    let (month, day) = (now.month(), now.day());
    let past = month > occasion.month || (month == occasion.month && day > occasion.day);
    let first_year = if past { now.year() + 1 } else { now.year() };

    let tz = now.timezone();
    for year in first_year..first_year + MAX_YEAR_SEARCH {
        let Some(naive) = NaiveDate::from_ymd_opt(year, occasion.month, occasion.day)
            .and_then(|d| d.and_hms_opt(occasion.hour, occasion.minute, 0))
        else {
            continue;
        };
        // A local time swallowed by a DST gap is taken as UTC wall time.
        return tz
            .from_local_datetime(&naive)
            .earliest()
            .unwrap_or_else(|| tz.from_utc_datetime(&naive));
    }
    now.clone()
}

/// Breakdown of `target - now`, floored at zero.
pub fn time_left<A: TimeZone, B: TimeZone>(target: &DateTime<A>, now: &DateTime<B>) -> TimeLeft {
    let diff = target.clone().signed_duration_since(now.clone()).num_milliseconds();
    if diff <= 0 {
        return TimeLeft::default();
    }
    TimeLeft {
        days: (diff / MS_PER_DAY) as u64,
        hours: ((diff / MS_PER_HOUR) % 24) as u64,
        minutes: ((diff / MS_PER_MINUTE) % 60) as u64,
        seconds: ((diff / MS_PER_SECOND) % 60) as u64,
    }
}

/// Live countdown state owned by the view.
#[derive(Clone, Debug)]
pub struct Countdown {
    target: DateTime<FixedOffset>,
    remaining: TimeLeft,
}

impl Countdown {
    pub fn new(target: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> Self {
        Countdown {
            target,
            remaining: time_left(&target, &now),
        }
    }

    pub fn refresh(&mut self, now: DateTime<FixedOffset>) -> TimeLeft {
        self.remaining = time_left(&self.target, &now);
        self.remaining
    }

    pub fn target(&self) -> DateTime<FixedOffset> {
        self.target
    }

    pub fn remaining(&self) -> TimeLeft {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    // ── target_instant ──

    #[test]
    fn early_february_targets_this_year() {
        let t = target_instant(&utc(2026, 2, 1, 12, 0, 0), Occasion::DATE_NIGHT);
        assert_eq!(t, utc(2026, 2, 13, 21, 0, 0));
    }

    #[test]
    fn day_after_rolls_to_next_year() {
        let t = target_instant(&utc(2026, 2, 14, 0, 0, 0), Occasion::DATE_NIGHT);
        assert_eq!(t.year(), 2027);
    }

    #[test]
    fn occasion_day_itself_never_rolls() {
        let t = target_instant(&utc(2026, 2, 13, 23, 30, 0), Occasion::DATE_NIGHT);
        assert_eq!(t, utc(2026, 2, 13, 21, 0, 0));
    }

    #[test]
    fn later_month_rolls_even_with_small_day() {
        let t = target_instant(&utc(2026, 3, 1, 0, 0, 0), Occasion::DATE_NIGHT);
        assert_eq!(t, utc(2027, 2, 13, 21, 0, 0));
    }

    #[test]
    fn january_with_large_day_stays() {
        let t = target_instant(&utc(2026, 1, 31, 0, 0, 0), Occasion::DATE_NIGHT);
        assert_eq!(t.year(), 2026);
    }

    #[test]
    fn leap_day_skips_to_next_leap_year() {
        let leap = Occasion { month: 2, day: 29, hour: 20, minute: 0 };
        let t = target_instant(&utc(2025, 1, 1, 0, 0, 0), leap);
        assert_eq!(t, utc(2028, 2, 29, 20, 0, 0));
    }

    #[test]
    fn keeps_caller_offset() {
        let tz = FixedOffset::east_opt(8 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap();
        let t = target_instant(&now, Occasion::DATE_NIGHT);
        assert_eq!(t, tz.with_ymd_and_hms(2026, 2, 13, 21, 0, 0).unwrap());
    }

    #[test]
    fn occasion_validity() {
        assert!(Occasion::DATE_NIGHT.is_valid());
        assert!(Occasion { month: 2, day: 29, hour: 0, minute: 0 }.is_valid());
        assert!(!Occasion { month: 2, day: 30, hour: 0, minute: 0 }.is_valid());
        assert!(!Occasion { month: 13, day: 1, hour: 0, minute: 0 }.is_valid());
        assert!(!Occasion { month: 2, day: 13, hour: 24, minute: 0 }.is_valid());
    }

    // ── time_left ──

    #[test]
    fn breakdown_of_mixed_duration() {
        let target = utc(2026, 2, 13, 21, 0, 0);
        let now = target.clone() - (Duration::days(3) + Duration::hours(4) + Duration::minutes(5) + Duration::seconds(6));
        assert_eq!(
            time_left(&target, &now),
            TimeLeft { days: 3, hours: 4, minutes: 5, seconds: 6 }
        );
    }

    #[test]
    fn sub_second_remainder_is_floored() {
        let target = utc(2026, 2, 13, 21, 0, 0);
        let now = target.clone() - Duration::milliseconds(1999);
        assert_eq!(time_left(&target, &now).seconds, 1);
    }

    #[test]
    fn past_target_floors_at_zero() {
        let target = utc(2026, 2, 13, 21, 0, 0);
        assert!(time_left(&target, &(target.clone() + Duration::days(40))).is_zero());
        assert!(time_left(&target, &target).is_zero());
    }

    #[test]
    fn same_instant_same_answer() {
        let target = utc(2026, 2, 13, 21, 0, 0);
        let now = utc(2025, 11, 2, 7, 31, 9);
        assert_eq!(time_left(&target, &now), time_left(&target, &now));
    }

    // ── Countdown ──

    #[test]
    fn countdown_refresh_tracks_wall_clock() {
        let target = utc(2026, 2, 13, 21, 0, 0).fixed_offset();
        let start = target - Duration::seconds(2);
        let mut c = Countdown::new(target, start);
        assert_eq!(c.remaining().seconds, 2);
        assert!(!c.is_finished());

        c.refresh(start + Duration::seconds(1));
        assert_eq!(c.remaining().seconds, 1);

        c.refresh(start + Duration::seconds(5));
        assert!(c.is_finished());
        assert_eq!(c.target(), target);
    }
}
