use super::Result;

/// Answer of a filler to one `advance` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillStep<K> {
    /// Emit the original observation whose key was supplied
    UseOriginal,
    /// Emit a synthesized entry for this domain position, then ask again
    Fill(K),
    /// The domain is exhausted
    End,
}

/// Pull-based enumerator over a key domain
///
/// The orchestrator calls `advance` with the filler key of the next original
/// observation (or `None` once all originals are consumed) until it receives
/// `UseOriginal` for that key, then moves to the next observation. After the
/// last original it drains with `None` until `End`.
///
/// The cursor only moves forward. Keys must arrive in ascending domain order;
/// a key behind the cursor is a `ProtocolViolation`, a key offered after the
/// domain has ended is `DomainExhausted`.
pub trait RangeFiller<K> {
    fn advance(&mut self, next_original: Option<&K>) -> Result<FillStep<K>>;
}

/// Filler with an empty domain
///
/// Passes every original through and ends as soon as no key is supplied.
/// Used when there is no data to derive domain bounds from.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFiller;

impl<K> RangeFiller<K> for NoopFiller {
    fn advance(&mut self, next_original: Option<&K>) -> Result<FillStep<K>> {
        Ok(match next_original {
            Some(_) => FillStep::UseOriginal,
            None => FillStep::End,
        })
    }
}
