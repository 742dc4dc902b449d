use crate::{Category, Epoch, PageResult, SortField};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The table was mounted with its initial query state.
    Started,
    /// User edited the search box.
    SearchChanged(String),
    /// User clicked the clear button of the search box.
    SearchCleared,
    /// User picked a category in the filter, or cleared it.
    CategorySelected(Option<String>),
    /// User clicked a sortable column header.
    SortClicked(SortField),
    /// User jumped to a page (0-based).
    PageChanged(usize),
    NextPage,
    PreviousPage,
    /// User picked a page size.
    RowsPerPageChanged(usize),
    /// The category list arrived.
    CategoriesLoaded(Vec<Category>),
    /// The category list could not be loaded; the filter is hidden.
    CategoriesFailed,
    /// A listing epoch settled successfully.
    ListingLoaded { epoch: Epoch, page: PageResult },
    /// A listing epoch failed with something other than cancellation.
    ListingFailed { epoch: Epoch },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
