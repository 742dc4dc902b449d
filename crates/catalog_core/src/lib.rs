//! Catalog core: pure product-table state machine, query building and
//! location sync.
mod effect;
mod location;
mod msg;
mod query;
mod request;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use location::{
    load_query_state, parse_query_string, sync_location, to_query_string, IgnoredParam, Location,
    MemoryLocation, ParsedQuery, PARAM_CATEGORY, PARAM_ORDER, PARAM_ORDER_BY, PARAM_PAGE,
    PARAM_ROWS_PER_PAGE, PARAM_SEARCH,
};
pub use msg::Msg;
pub use query::{
    Category, PageResult, Product, QueryState, SortDirection, SortField, DEFAULT_PAGE,
    DEFAULT_ROWS_PER_PAGE, MIN_SEARCH_LEN, ROWS_PER_PAGE_OPTIONS,
};
pub use request::{build_listing_url, categories_url, PRODUCT_FIELDS};
pub use state::{AppState, CategoryList, Epoch, FetchStatus, FETCH_FAILED_MESSAGE};
pub use update::update;
pub use view_model::{
    format_price, AppViewModel, CategoryFilterView, ColumnHeaderView, ListingBody, ProductRowView,
    SEARCH_HINT,
};
