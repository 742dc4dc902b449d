use crate::{Category, PageResult, QueryState};

/// Identifies one debounce-to-settle fetch cycle. Starts at 1; 0 means none.
pub type Epoch = u64;

/// Shown for every listing failure; transport detail only goes to the log.
pub const FETCH_FAILED_MESSAGE: &str =
    "Failed to fetch products. Please check your connection or try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryList {
    #[default]
    Loading,
    Loaded(Vec<Category>),
    /// Loading failed; the category filter is hidden.
    Unavailable,
}

impl CategoryList {
    pub fn find(&self, slug: &str) -> Option<&Category> {
        match self {
            CategoryList::Loaded(categories) => {
                categories.iter().find(|category| category.slug == slug)
            }
            CategoryList::Loading | CategoryList::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    query: QueryState,
    categories: CategoryList,
    status: FetchStatus,
    epoch: Epoch,
    page: PageResult,
    error_message: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State seeded from the location's initial query.
    pub fn with_query(query: QueryState) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn categories(&self) -> &CategoryList {
        &self.categories
    }

    pub fn status(&self) -> FetchStatus {
        self.status
    }

    /// The only epoch whose result may still be committed.
    pub fn current_epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn page(&self) -> &PageResult {
        &self.page
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Number of pages for the last committed result, at least 1.
    pub fn page_count(&self) -> usize {
        let size = self.query.page_size.max(1);
        self.page.total_count.div_ceil(size).max(1)
    }

    /// No result has settled for the current epoch yet.
    pub fn is_loading(&self) -> bool {
        matches!(self.status, FetchStatus::Idle | FetchStatus::Pending)
    }

    pub fn has_next_page(&self) -> bool {
        self.query.page_index + 1 < self.page_count()
    }

    /// Returns `true` once after any visible change, then resets.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn replace_query(&mut self, query: QueryState) {
        self.query = query;
        self.mark_dirty();
    }

    /// Opens a new epoch and enters `Pending`. Any older epoch is now stale.
    pub(crate) fn begin_epoch(&mut self) -> Epoch {
        self.epoch += 1;
        self.status = FetchStatus::Pending;
        self.mark_dirty();
        self.epoch
    }

    pub(crate) fn is_current(&self, epoch: Epoch) -> bool {
        epoch != 0 && epoch == self.epoch
    }

    pub(crate) fn commit_success(&mut self, page: PageResult) {
        self.status = FetchStatus::Success;
        self.page = page;
        self.error_message = None;
        self.mark_dirty();
    }

    pub(crate) fn commit_failure(&mut self) {
        self.status = FetchStatus::Error;
        self.page = PageResult::default();
        self.error_message = Some(FETCH_FAILED_MESSAGE.to_string());
        self.mark_dirty();
    }

    pub(crate) fn set_categories(&mut self, categories: CategoryList) {
        self.categories = categories;
        self.mark_dirty();
    }
}
