//! # Reporter
//!
//! Plain-text rendering of a detection result.

use crate::cycle::CycleMatch;
use crate::sequence::SymbolicSequence;

/// Printed when no recurring pattern exists in the sample
pub const NOT_FOUND_MESSAGE: &str = "Unable to find recurring call pattern";

/// Render the pattern found in `sequence`
///
/// The header names the starting frame and is underlined with `=`. Each
/// pattern element is listed with the stack word it was resolved from in
/// the first repetition. `None` renders [`NOT_FOUND_MESSAGE`].
///
/// ```rust
/// use stackloop_core::cycle::CycleMatch;
/// use stackloop_core::report::render;
/// use stackloop_core::sequence::{SymbolicFrame, SymbolicSequence};
/// use stackloop_core::types::Address;
///
/// let sequence: SymbolicSequence = [("walk", 0x401136), ("walk", 0x401136)]
///     .into_iter()
///     .map(|(identifier, address)| SymbolicFrame {
///         identifier: identifier.to_string(),
///         address: Address::from(address),
///     })
///     .collect();
/// let found = CycleMatch {
///     start_index: 0,
///     pattern: vec!["walk".to_string()],
/// };
///
/// let text = render(Some(&found), &sequence);
/// assert!(text.starts_with("Recurring call pattern starting at frame 0\n"));
/// assert!(text.ends_with("walk @ 0x401136\n"));
/// ```
pub fn render(found: Option<&CycleMatch<String>>, sequence: &SymbolicSequence) -> String
{
    let Some(found) = found else {
        return NOT_FOUND_MESSAGE.to_string();
    };

    let title = format!("Recurring call pattern starting at frame {}", found.start_index);
    let mut output = String::new();
    output.push_str(&title);
    output.push('\n');
    output.push_str(&"=".repeat(title.len()));
    output.push('\n');

    for (position, identifier) in found.pattern.iter().enumerate() {
        let line = match sequence.get(found.start_index + position) {
            Some(frame) => format!("{identifier} @ {:#x}\n", frame.address),
            None => format!("{identifier}\n"),
        };
        output.push_str(&line);
    }

    output
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::sequence::SymbolicFrame;
    use crate::types::Address;

    fn sequence(frames: &[(&str, u64)]) -> SymbolicSequence
    {
        frames
            .iter()
            .map(|&(identifier, address)| SymbolicFrame {
                identifier: identifier.to_string(),
                address: Address::from(address),
            })
            .collect()
    }

    #[test]
    fn test_render_not_found()
    {
        assert_eq!(render(None, &SymbolicSequence::default()), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_render_uses_first_repetition_addresses()
    {
        let sequence = sequence(&[
            ("main", 0x1000),
            ("even", 0x2010),
            ("odd", 0x3020),
            ("even", 0x2011),
            ("odd", 0x3021),
        ]);
        let found = CycleMatch {
            start_index: 1,
            pattern: vec!["even".to_string(), "odd".to_string()],
        };

        let text = render(Some(&found), &sequence);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Recurring call pattern starting at frame 1");
        assert_eq!(lines[1].len(), lines[0].len());
        assert!(lines[1].chars().all(|c| c == '='));
        assert_eq!(lines[2], "even @ 0x2010");
        assert_eq!(lines[3], "odd @ 0x3020");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_render_element_without_source_frame()
    {
        let sequence = sequence(&[("walk", 0x4010)]);
        let found = CycleMatch {
            start_index: 0,
            pattern: vec!["walk".to_string(), "leaf".to_string()],
        };

        let text = render(Some(&found), &sequence);
        assert!(text.ends_with("walk @ 0x4010\nleaf\n"), "{text:?}");
    }
}
