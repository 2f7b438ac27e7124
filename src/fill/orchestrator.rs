// Generic gap-fill driver
//
// Sorts the sparse input by a composite key, hands the sorted filler keys to a
// filler factory, then interleaves originals and synthesized entries in one
// forward pass.

use super::{FillError, FillStep, Observation, RangeFiller, Result};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

/// Merge sparse observations with filler output into a gap-free series
///
/// # Arguments
/// * `unsorted` - Sparse observations in any order
/// * `make_filler` - Builds the filler from the sorted filler keys
/// * `filler_key` - Projects an observation key onto the filler's domain
/// * `sort_keys` - Tiebreak levels defining domain order, most significant first
/// * `make_filler_element` - Turns a synthesized domain value into an observation
///
/// # Errors
/// Propagates the filler's `FillError`s. Returns `DomainExhausted` if the
/// filler ends before every original was placed, and `ProtocolViolation` if
/// it asks to use an original after all originals were consumed.
///
/// # Example
/// ```
/// use epifill::fill::{fill_missing, NoopFiller, Observation};
///
/// let data = vec![Observation::new(3, "c"), Observation::new(1, "a")];
/// let by_value = |k: &i32| *k;
/// let sort_keys: [&dyn Fn(&i32) -> i32; 1] = [&by_value];
/// let out = fill_missing(data, |_| Ok(NoopFiller), |x| *x, &sort_keys, |k| Observation::new(k, "-"))
///     .unwrap();
/// assert_eq!(out.iter().map(|o| o.x).collect::<Vec<_>>(), vec![1, 3]);
/// ```
pub fn fill_missing<X, Y, K, S, F>(
    unsorted: Vec<Observation<X, Y>>,
    make_filler: impl FnOnce(&[K]) -> Result<F>,
    filler_key: impl Fn(&X) -> K,
    sort_keys: &[&dyn Fn(&K) -> S],
    make_filler_element: impl Fn(K) -> Observation<X, Y>,
) -> Result<Vec<Observation<X, Y>>>
where
    F: RangeFiller<K>,
    K: Clone + Debug,
    S: Ord,
{
    let mut keyed: Vec<(K, Observation<X, Y>)> = unsorted
        .into_iter()
        .map(|original| (filler_key(&original.x), original))
        .collect();
    // Stable, so equal composite keys keep their input order.
    keyed.sort_by(|(a, _), (b, _)| compare_composite(sort_keys, a, b));

    let sorted_keys: Vec<K> = keyed.iter().map(|(key, _)| key.clone()).collect();
    let mut filler = make_filler(&sorted_keys)?;

    let originals = keyed.len();
    let mut output = Vec::with_capacity(originals);

    for (key, original) in keyed {
        loop {
            match filler.advance(Some(&key))? {
                FillStep::UseOriginal => {
                    output.push(original);
                    break;
                }
                FillStep::Fill(fill) => output.push(make_filler_element(fill)),
                FillStep::End => {
                    return Err(FillError::DomainExhausted {
                        key: format!("{key:?}"),
                    });
                }
            }
        }
    }

    loop {
        match filler.advance(None)? {
            FillStep::End => break,
            FillStep::Fill(fill) => output.push(make_filler_element(fill)),
            FillStep::UseOriginal => {
                return Err(FillError::ProtocolViolation(
                    "filler asked to use an original after all originals were consumed"
                        .to_string(),
                ));
            }
        }
    }

    tracing::debug!(
        originals,
        filled = output.len() - originals,
        "filled missing keys"
    );

    Ok(output)
}

/// Partition by a group key, map each partition, concatenate in first-seen order
///
/// Groups appear in the output in the order their first member appears in
/// `data`; members keep their relative order within a group.
pub fn map_groups<X, Y, G, O>(
    data: Vec<Observation<X, Y>>,
    group_of: impl Fn(&X) -> G,
    mut map_group: impl FnMut(Vec<Observation<X, Y>>, &G) -> Result<Vec<O>>,
) -> Result<Vec<O>>
where
    G: Hash + Eq,
{
    let mut groups: IndexMap<G, Vec<Observation<X, Y>>> = IndexMap::new();
    for entry in data {
        groups.entry(group_of(&entry.x)).or_default().push(entry);
    }

    tracing::trace!(groups = groups.len(), "mapping grouped series");

    let mut output = Vec::new();
    for (group, members) in groups {
        output.extend(map_group(members, &group)?);
    }
    Ok(output)
}

fn compare_composite<K, S: Ord>(sort_keys: &[&dyn Fn(&K) -> S], a: &K, b: &K) -> Ordering {
    sort_keys
        .iter()
        .map(|key| key(a).cmp(&key(b)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}
