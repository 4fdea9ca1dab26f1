//! Stable addresses for diff lines.
//!
//! An address is `<sha256(path)>_<old>_<new>` where an absent position is
//! written as `x`. Hashing the path keeps the address free of characters that
//! are awkward in DOM ids and URL fragments.

use diffnote_api::{LineAddress, RawDiffLine};
use sha2::{Digest, Sha256};

const ABSENT: &str = "x";

/// Produces [`LineAddress`] values.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineCoder;

impl LineCoder {
    /// Address of the line at `(new_position, old_position)` in `file_path`.
    #[must_use]
    pub fn address(
        file_path: &str,
        new_position: Option<u32>,
        old_position: Option<u32>,
    ) -> LineAddress {
        let mut encoded = hex::encode(Sha256::digest(file_path.as_bytes()));
        encoded.push('_');
        push_position(&mut encoded, old_position);
        encoded.push('_');
        push_position(&mut encoded, new_position);
        LineAddress::new(encoded)
    }

    /// Address of `line` within `file_path`.
    #[must_use]
    pub fn for_line(file_path: &str, line: &RawDiffLine) -> LineAddress {
        Self::address(file_path, line.new_line, line.old_line)
    }
}

fn push_position(buffer: &mut String, position: Option<u32>) {
    match position {
        Some(value) => buffer.push_str(&value.to_string()),
        None => buffer.push_str(ABSENT),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn address_is_deterministic() {
        let first = LineCoder::address("src/lib.rs", Some(4), Some(3));
        let second = LineCoder::address("src/lib.rs", Some(4), Some(3));
        assert_eq!(first, second);
    }

    #[test]
    fn absent_positions_do_not_collide() {
        let path = "app/models/user.rb";
        let addresses = [
            LineCoder::address(path, Some(5), Some(5)),
            LineCoder::address(path, Some(5), None),
            LineCoder::address(path, None, Some(5)),
            LineCoder::address(path, None, None),
        ];
        let unique: HashSet<_> = addresses.iter().collect();
        assert_eq!(unique.len(), addresses.len());
    }

    #[test]
    fn distinct_triples_yield_distinct_addresses() {
        let mut seen = HashSet::new();
        for path in ["a.rs", "b.rs", "dir/a.rs"] {
            for new in [None, Some(1), Some(2), Some(12)] {
                for old in [None, Some(1), Some(2), Some(21)] {
                    assert!(seen.insert(LineCoder::address(path, new, old)));
                }
            }
        }
    }

    #[test]
    fn positions_are_not_ambiguous_across_digits() {
        let one_twelve = LineCoder::address("a.rs", Some(12), Some(1));
        let eleven_two = LineCoder::address("a.rs", Some(2), Some(11));
        assert_ne!(one_twelve, eleven_two);
    }

    #[test]
    fn for_line_matches_address() {
        let line = RawDiffLine::removed("gone", 7);
        assert_eq!(
            LineCoder::for_line("a.rs", &line),
            LineCoder::address("a.rs", None, Some(7))
        );
        assert!(LineCoder::for_line("a.rs", &line).as_str().ends_with("_7_x"));
    }
}
