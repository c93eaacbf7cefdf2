//! The view-facing model interface and its change notifications.

use lattice_tree_core::Signal;

use super::flags::ItemFlags;
use super::index::ModelIndex;
use super::role::{ItemData, ItemRole};

/// Read access to a model, as seen by a view.
///
/// A view walks the model lazily: it asks how many rows a parent has, builds
/// coordinates for the rows it shows, and fetches values per role. Queries
/// never fail. A coordinate that addresses nothing yields an invalid index,
/// a count of zero or `ItemData::None`.
///
/// The invalid index stands for the root wherever a parent is expected.
///
/// Models are used from a single thread; the trait has no `Send`/`Sync`
/// bound.
pub trait ItemModel {
    /// Children under `parent`.
    fn row_count(&self, parent: &ModelIndex) -> usize;

    /// Columns under `parent`.
    fn column_count(&self, parent: &ModelIndex) -> usize;

    /// The value of `role` at `index`.
    fn data(&self, index: &ModelIndex, role: ItemRole) -> ItemData;

    /// The coordinate of the child at `(row, column)` under `parent`, or an
    /// invalid index when there is none.
    fn index(&self, row: usize, column: usize, parent: &ModelIndex) -> ModelIndex;

    /// The coordinate of the item owning `index`; invalid for top-level items.
    fn parent(&self, index: &ModelIndex) -> ModelIndex;

    fn signals(&self) -> &ModelSignals;

    /// Store `value` under `role` at `index`.
    ///
    /// Returns `false` if the edit was refused. Read-only models keep this
    /// default.
    fn set_data(&self, _index: &ModelIndex, _value: ItemData, _role: ItemRole) -> bool {
        false
    }

    fn flags(&self, _index: &ModelIndex) -> ItemFlags {
        ItemFlags::READ_ONLY
    }

    fn has_children(&self, parent: &ModelIndex) -> bool {
        self.row_count(parent) > 0
    }

    /// Label of a header section. Models without headers keep this default.
    fn header_data(&self, _section: usize, _orientation: Orientation, _role: ItemRole) -> ItemData {
        ItemData::None
    }

    /// The display value of `index` if it is text.
    fn display_text(&self, index: &ModelIndex) -> Option<String> {
        self.data(index, ItemRole::Display).into_string()
    }

    /// Another cell under the same parent as `index`.
    fn sibling(&self, index: &ModelIndex, row: usize, column: usize) -> ModelIndex {
        if index.is_valid() {
            self.index(row, column, &index.parent())
        } else {
            ModelIndex::invalid()
        }
    }
}

/// Which header a section belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Column headers.
    Horizontal,
    /// Row headers.
    Vertical,
}

/// Arguments of the row and column signals: parent, first, last (inclusive).
pub type RangeArgs = (ModelIndex, usize, usize);

/// Arguments of `data_changed`: top-left, bottom-right, roles that changed.
///
/// An empty role list means "anything may have changed", as after a flags
/// update.
pub type DataChangedArgs = (ModelIndex, ModelIndex, Vec<ItemRole>);

/// Change notifications of one model.
///
/// Structural changes come in pairs. While an `*_about_to_be_*` signal runs,
/// the model still has its old layout: coordinates in the announced range
/// resolve, and observers can look at what is about to go. Once the matching
/// `rows_inserted`/`rows_removed` runs, only the new layout is valid.
///
/// All signals are delivered synchronously on the mutating thread.
/// Observers may query the model, but must not mutate it.
pub struct ModelSignals {
    pub rows_about_to_be_inserted: Signal<RangeArgs>,
    pub rows_inserted: Signal<RangeArgs>,
    pub rows_about_to_be_removed: Signal<RangeArgs>,
    pub rows_removed: Signal<RangeArgs>,

    /// Column signals always carry the invalid index as parent: the column
    /// count is shared by every level.
    pub columns_about_to_be_inserted: Signal<RangeArgs>,
    pub columns_inserted: Signal<RangeArgs>,
    pub columns_about_to_be_removed: Signal<RangeArgs>,
    pub columns_removed: Signal<RangeArgs>,

    pub data_changed: Signal<DataChangedArgs>,
    /// Orientation, first section, last section.
    pub header_data_changed: Signal<(Orientation, usize, usize)>,

    pub model_about_to_reset: Signal<()>,
    pub model_reset: Signal<()>,
}

impl Default for ModelSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelSignals {
    pub fn new() -> Self {
        Self {
            rows_about_to_be_inserted: Signal::new(),
            rows_inserted: Signal::new(),
            rows_about_to_be_removed: Signal::new(),
            rows_removed: Signal::new(),
            columns_about_to_be_inserted: Signal::new(),
            columns_inserted: Signal::new(),
            columns_about_to_be_removed: Signal::new(),
            columns_removed: Signal::new(),
            data_changed: Signal::new(),
            header_data_changed: Signal::new(),
            model_about_to_reset: Signal::new(),
            model_reset: Signal::new(),
        }
    }

    /// Runs `mutate` between `rows_about_to_be_inserted` and `rows_inserted`.
    pub fn around_row_insert<R>(
        &self,
        parent: ModelIndex,
        first: usize,
        last: usize,
        mutate: impl FnOnce() -> R,
    ) -> R {
        bracket(
            &self.rows_about_to_be_inserted,
            &self.rows_inserted,
            (parent, first, last),
            mutate,
        )
    }

    /// Runs `mutate` between `rows_about_to_be_removed` and `rows_removed`.
    pub fn around_row_removal<R>(
        &self,
        parent: ModelIndex,
        first: usize,
        last: usize,
        mutate: impl FnOnce() -> R,
    ) -> R {
        bracket(
            &self.rows_about_to_be_removed,
            &self.rows_removed,
            (parent, first, last),
            mutate,
        )
    }

    /// Runs `mutate` between the column insert signals.
    pub fn around_column_insert<R>(&self, first: usize, last: usize, mutate: impl FnOnce() -> R) -> R {
        bracket(
            &self.columns_about_to_be_inserted,
            &self.columns_inserted,
            (ModelIndex::invalid(), first, last),
            mutate,
        )
    }

    /// Runs `mutate` between the column removal signals.
    pub fn around_column_removal<R>(&self, first: usize, last: usize, mutate: impl FnOnce() -> R) -> R {
        bracket(
            &self.columns_about_to_be_removed,
            &self.columns_removed,
            (ModelIndex::invalid(), first, last),
            mutate,
        )
    }

    /// Runs `mutate` between `model_about_to_reset` and `model_reset`.
    pub fn around_reset<R>(&self, mutate: impl FnOnce() -> R) -> R {
        bracket(&self.model_about_to_reset, &self.model_reset, (), mutate)
    }

    /// Reports a change to a single cell.
    pub fn notify_cell_changed(&self, index: ModelIndex, roles: Vec<ItemRole>) {
        self.data_changed.emit((index.clone(), index, roles));
    }
}

fn bracket<A, R>(announce: &Signal<A>, commit: &Signal<A>, args: A, mutate: impl FnOnce() -> R) -> R
where
    A: Clone + 'static,
{
    announce.emit(args.clone());
    let result = mutate();
    commit.emit(args);
    result
}
