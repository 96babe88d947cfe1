//! Calendar helpers for booking slots.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use super::SalonSnapshot;

/// Returns the `[start, end)` instants covering a UTC calendar day.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

/// Returns true if `[start, end)` lies inside the salon's opening hours on
/// the day the booking starts.
///
/// Salons without hours, or with hours that wrap past midnight, accept any
/// interval.
pub fn within_opening_hours(salon: &SalonSnapshot, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    let (Some(open), Some(close)) = (salon.open_time, salon.close_time) else {
        return true;
    };
    if open >= close {
        return true;
    }

    let day = start.date_naive();
    let opens_at = day.and_time(open).and_utc();
    let closes_at = day.and_time(close).and_utc();
    opens_at <= start && end <= closes_at
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_store::SalonId;
    use chrono::{NaiveTime, TimeZone};

    fn salon(open: u32, close: u32) -> SalonSnapshot {
        SalonSnapshot::new(SalonId::new(), "Glow").with_hours(
            NaiveTime::from_hms_opt(open, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(close, 0, 0).unwrap(),
        )
    }

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn day_bounds_span_one_day() {
        let (start, end) = day_bounds(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(start, at(0, 0));
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn inside_hours_is_accepted() {
        let s = salon(9, 18);
        assert!(within_opening_hours(&s, at(9, 0), at(10, 0)));
        assert!(within_opening_hours(&s, at(17, 0), at(18, 0)));
    }

    #[test]
    fn before_opening_or_after_closing_is_rejected() {
        let s = salon(9, 18);
        assert!(!within_opening_hours(&s, at(8, 30), at(9, 30)));
        assert!(!within_opening_hours(&s, at(17, 30), at(18, 30)));
    }

    #[test]
    fn salon_without_hours_accepts_anything() {
        let s = SalonSnapshot::new(SalonId::new(), "Always Open");
        assert!(within_opening_hours(&s, at(2, 0), at(3, 0)));
    }

    #[test]
    fn overnight_hours_are_not_enforced() {
        let s = salon(20, 4);
        assert!(within_opening_hours(&s, at(12, 0), at(13, 0)));
    }
}
