use crate::{Epoch, QueryState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch the category list once per session.
    LoadCategories,
    /// Start listing epoch `epoch` for `query`, superseding any earlier epoch.
    FetchListing { epoch: Epoch, query: QueryState },
    /// Mirror `query` into the location without adding a history entry.
    /// Nothing is written when the location already matches.
    ReplaceLocation { query: QueryState },
}
