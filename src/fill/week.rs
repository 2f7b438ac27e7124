// Calendar-week filling
//
// Domain: every ISO week from the earliest to the latest observed week,
// inclusive. Filler keys are the Mondays opening each week.

use super::{fill_missing, map_groups, FillError, FillStep, NoopFiller, Observation};
use super::{RangeFiller, Result};
use crate::date::{UnifiedDay, YearWeekWithDay};
use serde::{Deserialize, Serialize};
use std::hash::Hash;

/// Cursor over consecutive ISO weeks in `[min, max]`
#[derive(Debug, Clone)]
pub struct IsoWeekFiller {
    /// Next week to emit, `None` once past `max`
    current: Option<UnifiedDay>,
    max: UnifiedDay,
}

impl IsoWeekFiller {
    /// Create a filler spanning the weeks opened by `min` and `max`
    ///
    /// # Errors
    /// `UnalignedKey` if either bound is not a Monday, `ProtocolViolation` if
    /// `min > max`.
    pub fn new(min: UnifiedDay, max: UnifiedDay) -> Result<Self> {
        ensure_week_start(&min)?;
        ensure_week_start(&max)?;
        if min > max {
            return Err(FillError::ProtocolViolation(format!(
                "week range is inverted: {min} > {max}"
            )));
        }
        Ok(Self {
            current: Some(min),
            max,
        })
    }

    fn step(&mut self) {
        self.current = self
            .current
            .and_then(|day| day.iso_week().next())
            .map(|week| week.first_day())
            .filter(|day| *day <= self.max);
    }
}

impl RangeFiller<UnifiedDay> for IsoWeekFiller {
    fn advance(&mut self, next_original: Option<&UnifiedDay>) -> Result<FillStep<UnifiedDay>> {
        if let Some(key) = next_original {
            ensure_week_start(key)?;
        }

        let Some(current) = self.current else {
            return match next_original {
                Some(key) if *key <= self.max => Err(FillError::ProtocolViolation(format!(
                    "week {key} supplied after the range ending {} was emitted",
                    self.max
                ))),
                Some(key) => Err(FillError::DomainExhausted {
                    key: key.to_string(),
                }),
                None => Ok(FillStep::End),
            };
        };

        match next_original {
            Some(key) if *key < current => Err(FillError::ProtocolViolation(format!(
                "week {key} supplied after the cursor moved to {current}"
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

/// Filler chosen for a weekly series
///
/// An empty input has no derivable domain and gets the no-op filler.
#[derive(Debug, Clone)]
pub enum WeeklyFiller {
    Noop(NoopFiller),
    Weeks(IsoWeekFiller),
}

impl WeeklyFiller {
    /// Build from the ascending filler keys of the original data
    pub fn for_sorted_keys(sorted_keys: &[UnifiedDay]) -> Result<Self> {
        match (sorted_keys.first(), sorted_keys.last()) {
            (Some(min), Some(max)) => Ok(Self::Weeks(IsoWeekFiller::new(*min, *max)?)),
            _ => Ok(Self::Noop(NoopFiller)),
        }
    }
}

impl RangeFiller<UnifiedDay> for WeeklyFiller {
    fn advance(&mut self, next_original: Option<&UnifiedDay>) -> Result<FillStep<UnifiedDay>> {
        match self {
            Self::Noop(filler) => filler.advance(next_original),
            Self::Weeks(filler) => filler.advance(next_original),
        }
    }
}

fn ensure_week_start(day: &UnifiedDay) -> Result<()> {
    if day.is_week_start() {
        Ok(())
    } else {
        Err(FillError::UnalignedKey {
            key: day.to_string(),
        })
    }
}

/// Fill every missing ISO week between the first and last observation
///
/// Synthesized weeks carry a clone of `filler_y`.
///
/// # Example
/// ```
/// use epifill::date::{UnifiedIsoWeek, YearWeekWithDay};
/// use epifill::fill::{fill_weekly, Observation};
///
/// let week = |w| YearWeekWithDay::from_week(UnifiedIsoWeek::new(2022, w).unwrap());
/// let filled = fill_weekly(
///     vec![Observation::new(week(3), 2), Observation::new(week(1), 5)],
///     0,
/// )
/// .unwrap();
/// let counts: Vec<_> = filled.iter().map(|o| o.y).collect();
/// assert_eq!(counts, vec![5, 0, 2]);
/// ```
pub fn fill_weekly<Y: Clone>(
    unsorted: Vec<Observation<YearWeekWithDay, Y>>,
    filler_y: Y,
) -> Result<Vec<Observation<YearWeekWithDay, Y>>> {
    let by_iso_year = |day: &UnifiedDay| i64::from(day.iso_week().year());
    let by_iso_week = |day: &UnifiedDay| i64::from(day.iso_week().week());
    let sort_keys: [&dyn Fn(&UnifiedDay) -> i64; 2] = [&by_iso_year, &by_iso_week];

    fill_missing(
        unsorted,
        WeeklyFiller::for_sorted_keys,
        |x: &YearWeekWithDay| x.first_day_in_week,
        &sort_keys,
        |day| Observation::new(YearWeekWithDay::from_day(day), filler_y.clone()),
    )
}

/// Key of a weekly series split by a categorical field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupedWeek<G> {
    pub week: YearWeekWithDay,
    pub group: G,
}

impl<G> GroupedWeek<G> {
    pub fn new(week: YearWeekWithDay, group: G) -> Self {
        Self { week, group }
    }
}

/// Fill each group's weekly series independently
///
/// Every group gets its own `[min, max]` week domain. Groups are emitted in
/// first-seen order and synthesized entries carry the group's value.
pub fn fill_grouped_weekly<G, Y>(
    unsorted: Vec<Observation<GroupedWeek<G>, Y>>,
    filler_y: Y,
) -> Result<Vec<Observation<GroupedWeek<G>, Y>>>
where
    G: Clone + Eq + Hash,
    Y: Clone,
{
    map_groups(
        unsorted,
        |x| x.group.clone(),
        |members, group| {
            let weekly = members
                .into_iter()
                .map(|entry| Observation::new(entry.x.week, entry.y))
                .collect();
            let filled = fill_weekly(weekly, filler_y.clone())?;
            Ok(filled
                .into_iter()
                .map(|entry| Observation::new(GroupedWeek::new(entry.x, group.clone()), entry.y))
                .collect())
        },
    )
}
