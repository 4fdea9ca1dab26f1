//! Groups active comments by the line they are anchored to.

use std::collections::BTreeMap;

use diffnote_api::{Comment, LineAddress};

/// Active comments keyed by anchor, each group in insertion order.
///
/// Addresses without active comments are absent; callers treat absent and
/// empty alike.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentIndex {
    by_address: BTreeMap<LineAddress, Vec<Comment>>,
}

impl CommentIndex {
    /// Build the index from a comment snapshot, dropping inactive comments.
    pub fn build(comments: impl IntoIterator<Item = Comment>) -> Self {
        let mut by_address: BTreeMap<LineAddress, Vec<Comment>> = BTreeMap::new();
        for comment in comments.into_iter().filter(|comment| comment.active) {
            by_address
                .entry(comment.anchor.clone())
                .or_default()
                .push(comment);
        }

        Self { by_address }
    }

    /// Comments anchored to `address`, if any are active.
    #[must_use]
    pub fn get(&self, address: &LineAddress) -> Option<&[Comment]> {
        self.by_address.get(address).map(Vec::as_slice)
    }

    /// Addresses that carry at least one active comment.
    pub fn addresses(&self) -> impl Iterator<Item = &LineAddress> + '_ {
        self.by_address.keys()
    }

    /// Number of anchored addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    /// Whether no active comment exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }
}

impl FromIterator<Comment> for CommentIndex {
    fn from_iter<I: IntoIterator<Item = Comment>>(iter: I) -> Self {
        Self::build(iter)
    }
}
