//! # Cycle Detector
//!
//! Finds the shortest unit that, repeated back to back, makes up the tail of
//! a sequence.
//!
//! The search is intentionally simple and greedy:
//!
//! 1. Leading elements that never occur again are trimmed one by one. The
//!    number trimmed is the start offset. Trimming stops at the first element
//!    that does recur, without checking whether a different cut would give a
//!    cleaner cycle.
//! 2. Unit lengths `1..=len/2` of the remaining suffix are tried in order.
//!    The suffix is split into full blocks of that length (a partial last
//!    block is ignored) and the first length whose blocks are all equal wins.
//!
//! Worst case is cubic in the input length, which is fine for the 128 words
//! of a default sample.

use tracing::trace;

/// A repeating unit and where its first repetition starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleMatch<T>
{
    /// Index into the searched sequence where the first full repetition begins
    pub start_index: usize,
    /// The repeating unit, in order
    pub pattern: Vec<T>,
}

impl<T> CycleMatch<T>
{
    /// Offset in the `-1 = not found` convention debuggers print.
    pub fn offset(found: Option<&Self>) -> isize
    {
        found.map_or(-1, |found| isize::try_from(found.start_index).unwrap_or(isize::MAX))
    }
}

/// Find the shortest repeating pattern in `items`
///
/// Returns `None` when there is no clean repetition. A single element is
/// treated as a cycle of itself.
///
/// ```rust
/// use stackloop_core::cycle::detect;
///
/// let found = detect(&[1, 2, 3, 4, 5, 3, 4, 5, 3, 4, 5, 3, 4]).unwrap();
/// assert_eq!(found.start_index, 2);
/// assert_eq!(found.pattern, vec![3, 4, 5]);
///
/// assert!(detect::<u32>(&[]).is_none());
/// assert!(detect(&[1, 2, 3]).is_none());
/// ```
pub fn detect<T: PartialEq + Clone>(items: &[T]) -> Option<CycleMatch<T>>
{
    match items {
        [] => return None,
        [only] => {
            return Some(CycleMatch {
                start_index: 0,
                pattern: vec![only.clone()],
            });
        }
        _ => {}
    }

    let start_index = trim_offset(items)?;
    let suffix = &items[start_index..];
    trace!(start_index, remaining = suffix.len(), "Trimmed non-recurring prefix");

    for unit in 1..=suffix.len() / 2 {
        if tiles(suffix, unit) {
            trace!(unit, "Found repeating unit");
            return Some(CycleMatch {
                start_index,
                pattern: suffix[..unit].to_vec(),
            });
        }
    }

    None
}

/// Number of leading elements to skip, or `None` if nothing ever recurs
fn trim_offset<T: PartialEq>(items: &[T]) -> Option<usize>
{
    (0..items.len()).find(|&index| items[index + 1..].contains(&items[index]))
}

/// Whether every full block of `unit` elements in `items` is equal
fn tiles<T: PartialEq>(items: &[T], unit: usize) -> bool
{
    let mut blocks = items.chunks_exact(unit);
    match blocks.next() {
        Some(first) => blocks.all(|block| block == first),
        None => false,
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_trim_offset()
    {
        assert_eq!(trim_offset(&[1, 2, 3, 1]), Some(0));
        assert_eq!(trim_offset(&[9, 1, 2, 1]), Some(1));
        assert_eq!(trim_offset(&[1, 2, 3]), None);
    }

    #[test]
    fn test_tiles_ignores_partial_block()
    {
        assert!(tiles(&[1, 2, 1, 2, 1], 2));
        assert!(!tiles(&[1, 2, 1, 3], 2));
    }

    #[test]
    fn test_offset_convention()
    {
        assert_eq!(CycleMatch::<u8>::offset(None), -1);
        let found = CycleMatch {
            start_index: 3,
            pattern: vec![1u8],
        };
        assert_eq!(CycleMatch::offset(Some(&found)), 3);
    }
}
