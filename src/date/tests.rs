// Tests for canonical days and ISO weeks
//
// Year boundaries are where ISO weeks and calendar years disagree, so most
// cases sit around January 1.

use super::*;

#[test]
fn test_parse_valid_day() {
    let day = UnifiedDay::parse("2021-03-15").unwrap();
    assert_eq!(day.string(), "2021-03-15");
    assert!(day.is_week_start()); // 2021-03-15 is a Monday
}

#[test]
fn test_parse_rejects_malformed() {
    for raw in ["", "2021-3-15", "15.03.2021", "2021-02-30", "2021-13-01", "abcd-ef-gh"] {
        assert_eq!(
            UnifiedDay::parse(raw),
            Err(DateError::MalformedDate(raw.to_string())),
            "{raw} should be rejected"
        );
    }
}

#[test]
fn test_iso_week_across_year_boundary() {
    // 2021-01-01 is a Friday belonging to 2020-W53
    let day = UnifiedDay::parse("2021-01-01").unwrap();
    let week = day.iso_week();
    assert_eq!(week.year(), 2020);
    assert_eq!(week.week(), 53);
    assert_eq!(week.first_day().string(), "2020-12-28");

    // 2019-12-30 is a Monday belonging to 2020-W01
    let day = UnifiedDay::parse("2019-12-30").unwrap();
    assert_eq!(day.iso_week().to_string(), "2020-01");
}

#[test]
fn test_week_next_rolls_over_year() {
    let w52 = UnifiedIsoWeek::new(2021, 52).unwrap();
    let next = w52.next().unwrap();
    assert_eq!((next.year(), next.week()), (2022, 1));

    let w53 = UnifiedIsoWeek::new(2020, 53).unwrap();
    assert_eq!(w53.next().unwrap().to_string(), "2021-01");
}

#[test]
fn test_week_new_rejects_invalid() {
    assert!(UnifiedIsoWeek::new(2021, 0).is_err());
    assert!(UnifiedIsoWeek::new(2021, 53).is_err()); // 2021 has 52 ISO weeks
    assert!(UnifiedIsoWeek::new(2020, 53).is_ok());
}

#[test]
fn test_week_ordering_is_chronological() {
    let a = UnifiedIsoWeek::new(2020, 53).unwrap();
    let b = UnifiedIsoWeek::new(2021, 1).unwrap();
    let c = UnifiedIsoWeek::new(2021, 10).unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_week_from_str() {
    let week: UnifiedIsoWeek = "2022-03".parse().unwrap();
    assert_eq!(week.first_day().string(), "2022-01-17");
    assert!("2022".parse::<UnifiedIsoWeek>().is_err());
    assert!("2022-xx".parse::<UnifiedIsoWeek>().is_err());
}

#[test]
fn test_year_week_with_day_json() {
    let key = YearWeekWithDay::from_week(UnifiedIsoWeek::new(2022, 1).unwrap());
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, r#"{"yearWeek":"2022-01","firstDayInWeek":"2022-01-03"}"#);

    let decoded: YearWeekWithDay = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, key);
}

#[test]
fn test_year_week_from_day() {
    let day = UnifiedDay::parse("2022-01-06").unwrap(); // Thursday
    let key = YearWeekWithDay::from_day(day);
    assert_eq!(key.first_day_in_week.string(), "2022-01-03");
    assert_eq!(key.year_week.week(), 1);
}

#[test]
fn test_day_cache_parses_each_string_once() {
    let mut cache = DayCache::new();
    let a = cache.get_day("2021-05-01").unwrap();
    let b = cache.get_day("2021-05-01").unwrap();
    let c = cache.get_day("2021-05-02").unwrap();
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(cache.len(), 2);
    assert!(cache.get_day("not-a-date").is_err());
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_today_is_after_first_data_week() {
    assert!(UnifiedDay::today() > UnifiedDay::parse("2020-01-06").unwrap());
}
