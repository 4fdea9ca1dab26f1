//! Decides which column of a split row shows which comments.

use diffnote_api::{Comment, LineAddress, LineKind};

use crate::comments::CommentIndex;

/// Comment sets for the left (old) and right (new) cell of a split row.
pub type SidePair<'a> = (Option<&'a [Comment]>, Option<&'a [Comment]>);

/// Resolves comment placement for split rows.
#[derive(Debug, Default, Clone, Copy)]
pub struct SideMapper;

impl SideMapper {
    /// Resolve the comment sets for one split row.
    ///
    /// `None` for a kind means the cell is empty; an empty cell usually has no
    /// address either. Rules, in order:
    /// 1. empty left cell next to an added line: the left set is absent;
    /// 2. both cells empty: the right set is absent;
    /// 3. otherwise each side is the lookup of its own address.
    ///
    /// A removed line next to an empty right cell is not special-cased, so the
    /// right lookup still happens.
    #[must_use]
    pub fn resolve_sides<'a>(
        left_kind: Option<LineKind>,
        right_kind: Option<LineKind>,
        left_address: Option<&LineAddress>,
        right_address: Option<&LineAddress>,
        index: &'a CommentIndex,
    ) -> SidePair<'a> {
        let left = if left_kind.is_none() && right_kind == Some(LineKind::Added) {
            None
        } else {
            left_address.and_then(|address| index.get(address))
        };

        let right = if left_kind.is_none() && right_kind.is_none() {
            None
        } else {
            right_address.and_then(|address| index.get(address))
        };

        (left, right)
    }
}
