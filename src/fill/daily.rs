use super::{fill_missing, FillError, FillStep, Observation, RangeFiller, Result};
use crate::date::UnifiedDay;
use crate::selector::DateRange;

/// Cursor over consecutive calendar days in `[min, max]`
#[derive(Debug, Clone)]
pub struct DayFiller {
    current: Option<UnifiedDay>,
    max: UnifiedDay,
}

impl DayFiller {
    /// An inverted range (`min > max`) yields an empty domain
    pub fn new(min: UnifiedDay, max: UnifiedDay) -> Self {
        Self {
            current: (min <= max).then_some(min),
            max,
        }
    }

    fn step(&mut self) {
        self.current = self
            .current
            .and_then(|day| day.next())
            .filter(|day| *day <= self.max);
    }
}

impl RangeFiller<UnifiedDay> for DayFiller {
    fn advance(&mut self, next_original: Option<&UnifiedDay>) -> Result<FillStep<UnifiedDay>> {
        let Some(current) = self.current else {
            return match next_original {
                Some(key) => Err(FillError::DomainExhausted {
                    key: key.to_string(),
                }),
                None => Ok(FillStep::End),
            };
        };

        match next_original {
            Some(key) if *key < current => Err(FillError::ProtocolViolation(format!(
                "day {key} supplied after the cursor moved to {current}"
            ))),
            Some(key) if *key == current => {
                self.step();
                Ok(FillStep::UseOriginal)
            }
            _ => {
                self.step();
                Ok(FillStep::Fill(current))
            }
        }
    }
}

/// One entry per calendar day of `range`, originals where present
///
/// Open bounds fall back to the earliest/latest key of `entries`. Entries
/// outside the resolved range are dropped. With no entries and an open bound
/// the range is undefined and the result is empty.
///
/// # Example
/// ```
/// use epifill::date::UnifiedDay;
/// use epifill::fill::fill_and_filter_daily;
/// use epifill::selector::DateRange;
///
/// let day = |s| UnifiedDay::parse(s).unwrap();
/// let range = DateRange::closed(day("2021-03-01"), day("2021-03-04"));
/// let filled = fill_and_filter_daily(vec![(day("2021-03-02"), 7), (day("2021-03-09"), 1)], 0, &range)
///     .unwrap();
/// let values: Vec<_> = filled.iter().map(|o| o.y).collect();
/// assert_eq!(values, vec![0, 7, 0, 0]);
/// ```
pub fn fill_and_filter_daily<Y: Clone>(
    entries: impl IntoIterator<Item = (UnifiedDay, Y)>,
    filler_y: Y,
    range: &DateRange,
) -> Result<Vec<Observation<UnifiedDay, Y>>> {
    let entries: Vec<(UnifiedDay, Y)> = entries.into_iter().collect();

    let min = range
        .date_from
        .or_else(|| entries.iter().map(|(day, _)| *day).min());
    let max = range
        .date_to
        .or_else(|| entries.iter().map(|(day, _)| *day).max());
    let (Some(min), Some(max)) = (min, max) else {
        return Ok(Vec::new());
    };

    let total = entries.len();
    let in_range: Vec<Observation<UnifiedDay, Y>> = entries
        .into_iter()
        .filter(|(day, _)| min <= *day && *day <= max)
        .map(|(day, y)| Observation::new(day, y))
        .collect();
    if in_range.len() < total {
        tracing::debug!(
            dropped = total - in_range.len(),
            %min,
            %max,
            "dropped daily entries outside range"
        );
    }

    let by_day = |day: &UnifiedDay| *day;
    let sort_keys: [&dyn Fn(&UnifiedDay) -> UnifiedDay; 1] = [&by_day];

    fill_missing(
        in_range,
        |_| Ok(DayFiller::new(min, max)),
        |x: &UnifiedDay| *x,
        &sort_keys,
        |day| Observation::new(day, filler_y.clone()),
    )
}
