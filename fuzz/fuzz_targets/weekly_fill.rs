#![no_main]

use chrono::{Days, NaiveDate};
use epifill::date::{UnifiedDay, YearWeekWithDay};
use epifill::fill::{fill_weekly, Observation};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some(base) = NaiveDate::from_ymd_opt(2019, 12, 30) else {
        return;
    };

    // Each byte pair is a day offset from a Monday. Offsets that are not a
    // multiple of 7 produce unaligned keys, duplicates produce repeated weeks.
    let input: Vec<_> = data
        .chunks_exact(2)
        .filter_map(|pair| {
            let offset = u64::from(u16::from_le_bytes([pair[0], pair[1]]) % 2048);
            let day = UnifiedDay::from_date(base.checked_add_days(Days::new(offset))?);
            Some(Observation::new(
                YearWeekWithDay {
                    year_week: day.iso_week(),
                    first_day_in_week: day,
                },
                offset,
            ))
        })
        .collect();

    // Must never panic; errors are typed
    if let Ok(filled) = fill_weekly(input.clone(), u64::MAX) {
        for window in filled.windows(2) {
            assert_eq!(window[0].x.year_week.next(), Some(window[1].x.year_week));
        }
        for original in &input {
            assert!(filled.iter().any(|entry| entry.x == original.x && entry.y == original.y));
        }
    }
});
