// Fixed-category filling
//
// Domain: a static, ordered list of labels. Output always has exactly one
// entry per label, in list order.

use super::{fill_missing, FillError, FillStep, Observation, RangeFiller, Result};
use std::collections::HashSet;
use std::fmt::Debug;

/// Age brackets reported by the surveillance API, in display order
pub const AGE_GROUPS: [&str; 9] = [
    "0-9", "10-19", "20-29", "30-39", "40-49", "50-59", "60-69", "70-79", "80+",
];

/// Cursor over a fixed list of values
///
/// Every `advance` consumes one list position, whether or not the supplied
/// key matches it.
#[derive(Debug, Clone)]
pub struct FixedValuesFiller<'a, T> {
    values: &'a [T],
    position: usize,
}

impl<'a, T> FixedValuesFiller<'a, T> {
    pub fn new(values: &'a [T]) -> Self {
        Self {
            values,
            position: 0,
        }
    }
}

impl<T> RangeFiller<T> for FixedValuesFiller<'_, T>
where
    T: Clone + PartialEq + Debug,
{
    fn advance(&mut self, next_original: Option<&T>) -> Result<FillStep<T>> {
        if let Some(key) = next_original {
            let index = self
                .values
                .iter()
                .position(|value| value == key)
                .ok_or_else(|| FillError::OutOfDomain {
                    key: format!("{key:?}"),
                })?;
            if index < self.position {
                return Err(FillError::ProtocolViolation(format!(
                    "category {key:?} supplied after its position was emitted"
                )));
            }
        }

        let Some(value) = self.values.get(self.position) else {
            return match next_original {
                Some(key) => Err(FillError::DomainExhausted {
                    key: format!("{key:?}"),
                }),
                None => Ok(FillStep::End),
            };
        };
        self.position += 1;

        if next_original == Some(value) {
            Ok(FillStep::UseOriginal)
        } else {
            Ok(FillStep::Fill(value.clone()))
        }
    }
}

/// Fill a category-keyed series against `categories`
///
/// Input is ordered by each label's position in `categories`. Labels not in
/// the list yield `OutOfDomain`. A label given twice, in the input or in
/// `categories`, yields `ProtocolViolation`.
pub fn fill_categories<Y: Clone>(
    unsorted: Vec<Observation<String, Y>>,
    categories: &[String],
    filler_y: Y,
) -> Result<Vec<Observation<String, Y>>> {
    let mut seen = HashSet::new();
    if let Some(duplicate) = categories.iter().find(|category| !seen.insert(*category)) {
        return Err(FillError::ProtocolViolation(format!(
            "category domain lists {duplicate:?} more than once"
        )));
    }

    let by_position = |label: &String| {
        categories
            .iter()
            .position(|category| category == label)
            .unwrap_or(usize::MAX)
    };
    let sort_keys: [&dyn Fn(&String) -> usize; 1] = [&by_position];

    fill_missing(
        unsorted,
        |_| Ok(FixedValuesFiller::new(categories)),
        |x: &String| x.clone(),
        &sort_keys,
        |label| Observation::new(label, filler_y.clone()),
    )
}

/// Fill an age-keyed series against the nine standard brackets
///
/// # Example
/// ```
/// use epifill::fill::{fill_age_keyed, Observation};
///
/// let filled = fill_age_keyed(vec![Observation::new("20-29".to_string(), 4)], 0).unwrap();
/// assert_eq!(filled.len(), 9);
/// assert_eq!(filled[2].y, 4);
/// ```
pub fn fill_age_keyed<Y: Clone>(
    unsorted: Vec<Observation<String, Y>>,
    filler_y: Y,
) -> Result<Vec<Observation<String, Y>>> {
    let brackets: Vec<String> = AGE_GROUPS.iter().map(|bracket| bracket.to_string()).collect();
    fill_categories(unsorted, &brackets, filler_y)
}
