//! Coordinates that views use to address model items.
//!
//! A [`ModelIndex`] is `(row, column, parent)` plus an opaque id the model
//! uses to find the item again. The parent chain is shared between an index
//! and the indices derived from it, so cloning is cheap even for deep items.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

/// A snapshot of an item position in an [`ItemModel`](super::ItemModel).
///
/// The invalid index stands for "no item": the model root when used as a
/// parent, and the result of any query that does not address an item.
///
/// An index does not follow its item. After the tree changes, an index
/// obtained earlier may no longer describe where the item is; models report
/// such an index as not found rather than resolving it to whatever now sits
/// at that position.
///
/// ```
/// use lattice_tree::model::ModelIndex;
///
/// let top = ModelIndex::with_internal_id(2, 0, ModelIndex::invalid(), 41);
/// let cell = ModelIndex::with_internal_id(0, 1, top.clone(), 42);
///
/// assert_eq!(cell.parent(), top);
/// assert_eq!(cell.depth(), 1);
/// assert!(cell.is_descendant_of(&top));
/// ```
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ModelIndex(Option<Rc<Position>>);

#[derive(PartialEq, Eq, Hash)]
struct Position {
    row: usize,
    column: usize,
    internal_id: u64,
    parent: ModelIndex,
}

impl ModelIndex {
    /// The index that addresses nothing.
    #[inline]
    pub const fn invalid() -> Self {
        Self(None)
    }

    /// A valid index whose internal id is zero.
    ///
    /// Models that find items by id never resolve such an index.
    #[inline]
    pub fn new(row: usize, column: usize, parent: ModelIndex) -> Self {
        Self::with_internal_id(row, column, parent, 0)
    }

    /// A valid index carrying the model's id for the item.
    ///
    /// Pass `ModelIndex::invalid()` as `parent` for top-level items.
    pub fn with_internal_id(row: usize, column: usize, parent: ModelIndex, internal_id: u64) -> Self {
        Self(Some(Rc::new(Position {
            row,
            column,
            internal_id,
            parent,
        })))
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    /// Row within the parent; 0 when invalid.
    #[inline]
    pub fn row(&self) -> usize {
        self.0.as_ref().map_or(0, |p| p.row)
    }

    /// Column; 0 when invalid.
    #[inline]
    pub fn column(&self) -> usize {
        self.0.as_ref().map_or(0, |p| p.column)
    }

    /// The model's id for the item; 0 when invalid.
    #[inline]
    pub fn internal_id(&self) -> u64 {
        self.0.as_ref().map_or(0, |p| p.internal_id)
    }

    /// The parent index; invalid for top-level items.
    pub fn parent(&self) -> ModelIndex {
        self.parent_ref().cloned().unwrap_or_default()
    }

    /// Borrow the parent index, if there is one.
    pub fn parent_ref(&self) -> Option<&ModelIndex> {
        self.0
            .as_ref()
            .map(|p| &p.parent)
            .filter(|parent| parent.is_valid())
    }

    #[inline]
    pub fn has_parent(&self) -> bool {
        self.parent_ref().is_some()
    }

    /// Parents from the immediate one up to the top-level ancestor.
    pub fn ancestors(&self) -> impl Iterator<Item = &ModelIndex> {
        std::iter::successors(self.parent_ref(), |index| index.parent_ref())
    }

    /// Number of ancestors. Top-level items (and the invalid index) are at 0.
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Returns `true` if `ancestor` is on this index's parent chain.
    pub fn is_descendant_of(&self, ancestor: &ModelIndex) -> bool {
        ancestor.is_valid() && self.ancestors().any(|index| index == ancestor)
    }

    /// The same row and parent at another column. Not checked against a model.
    pub fn with_column(&self, column: usize) -> ModelIndex {
        match &self.0 {
            Some(p) => Self::with_internal_id(p.row, column, p.parent.clone(), p.internal_id),
            None => Self::invalid(),
        }
    }
}

impl fmt::Debug for ModelIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(p) => f
                .debug_struct("ModelIndex")
                .field("row", &p.row)
                .field("column", &p.column)
                .field("depth", &self.depth())
                .field("internal_id", &p.internal_id)
                .finish(),
            None => f.write_str("ModelIndex(invalid)"),
        }
    }
}

impl PartialOrd for ModelIndex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Invalid first, then shallower before deeper, then by row, column and id,
/// with the parent chain as the final tie-breaker.
impl Ord for ModelIndex {
    fn cmp(&self, other: &Self) -> Ordering {
        let key = |index: &ModelIndex| {
            (
                index.depth(),
                index.row(),
                index.column(),
                index.internal_id(),
            )
        };
        self.is_valid()
            .cmp(&other.is_valid())
            .then_with(|| key(self).cmp(&key(other)))
            .then_with(|| self.parent_ref().cmp(&other.parent_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_invalid_index() {
        let index = ModelIndex::invalid();
        assert!(!index.is_valid());
        assert_eq!((index.row(), index.column(), index.internal_id()), (0, 0, 0));
        assert!(!index.has_parent());
        assert_eq!(index.depth(), 0);
        assert_eq!(index, ModelIndex::default());
    }

    #[test]
    fn test_parent_chain() {
        let top = ModelIndex::with_internal_id(0, 0, ModelIndex::invalid(), 7);
        let child = ModelIndex::with_internal_id(2, 1, top.clone(), 8);

        assert!(child.has_parent());
        assert_eq!(child.parent(), top);
        assert_eq!(child.depth(), 1);
        assert!(!top.parent().is_valid());
    }

    #[test]
    fn test_equality_covers_parent_and_id() {
        let a = ModelIndex::with_internal_id(0, 0, ModelIndex::invalid(), 1);
        let b = ModelIndex::with_internal_id(0, 0, ModelIndex::invalid(), 2);

        let under_a = ModelIndex::with_internal_id(1, 0, a.clone(), 10);
        let under_b = ModelIndex::with_internal_id(1, 0, b, 10);
        assert_ne!(under_a, under_b);
        assert_eq!(under_a, ModelIndex::with_internal_id(1, 0, a, 10));

        let mut set = HashSet::new();
        set.insert(under_a.clone());
        assert!(set.contains(&under_a));
        assert!(!set.contains(&under_b));
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let level1 = ModelIndex::with_internal_id(0, 0, ModelIndex::invalid(), 1);
        let level2 = ModelIndex::with_internal_id(1, 0, level1.clone(), 2);
        let level3 = ModelIndex::with_internal_id(2, 0, level2.clone(), 3);

        let ancestors: Vec<_> = level3.ancestors().cloned().collect();
        assert_eq!(ancestors, vec![level2.clone(), level1.clone()]);
        assert!(level3.is_descendant_of(&level1));
        assert!(!level1.is_descendant_of(&level3));
        assert!(!level1.is_descendant_of(&ModelIndex::invalid()));
    }

    #[test]
    fn test_with_column_keeps_parent() {
        let top = ModelIndex::with_internal_id(4, 0, ModelIndex::invalid(), 5);
        let index = ModelIndex::with_internal_id(3, 0, top.clone(), 9);
        let second = index.with_column(1);

        assert_eq!((second.row(), second.column(), second.internal_id()), (3, 1, 9));
        assert_eq!(second.parent(), top);
        assert!(!ModelIndex::invalid().with_column(1).is_valid());
    }

    #[test]
    fn test_ordering() {
        let root = ModelIndex::invalid();
        let first = ModelIndex::new(0, 0, root.clone());
        let second = ModelIndex::new(1, 0, root.clone());
        let first_col1 = ModelIndex::new(0, 1, root);
        let nested = ModelIndex::new(0, 0, first.clone());

        assert!(ModelIndex::invalid() < first);
        assert!(first < first_col1);
        assert!(first_col1 < second);
        assert!(second < nested);
    }
}
