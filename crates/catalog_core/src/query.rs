use std::fmt;
use std::str::FromStr;

/// Search text must be at least this long before it drives the listing.
pub const MIN_SEARCH_LEN: usize = 2;
pub const DEFAULT_PAGE: usize = 0;
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;
pub const ROWS_PER_PAGE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Sortable product columns. The string form is the API field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortField {
    #[default]
    Title,
    Category,
    Price,
    Rating,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::Title,
        SortField::Category,
        SortField::Price,
        SortField::Rating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Category => "category",
            SortField::Price => "price",
            SortField::Rating => "rating",
        }
    }

    /// Column header label.
    pub fn label(self) -> &'static str {
        match self {
            SortField::Title => "Product",
            SortField::Category => "Category",
            SortField::Price => "Price",
            SortField::Rating => "Rating",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| format!("unknown sort field {raw:?}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            _ => Err(format!("unknown sort direction {raw:?}")),
        }
    }
}

/// Filter, sort and paging state of the product table.
///
/// `search_text` and `category` are mutually exclusive once the search text
/// is long enough to be active; the setters enforce that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_text: String,
    pub category: Option<String>,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            category: None,
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            page_index: DEFAULT_PAGE,
            page_size: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl QueryState {
    /// Search text when it is long enough to drive a search request.
    pub fn active_search(&self) -> Option<&str> {
        if self.search_text.chars().count() >= MIN_SEARCH_LEN {
            Some(self.search_text.as_str())
        } else {
            None
        }
    }

    pub fn set_search_text(&mut self, text: String) {
        self.search_text = text;
        self.page_index = 0;
        if self.active_search().is_some() {
            self.category = None;
        }
    }

    pub fn clear_search(&mut self) {
        self.search_text.clear();
        self.page_index = 0;
    }

    pub fn select_category(&mut self, slug: Option<String>) {
        let slug = slug.filter(|slug| !slug.trim().is_empty());
        if slug.is_some() {
            self.search_text.clear();
        }
        self.category = slug;
        self.page_index = 0;
    }

    /// Header click: repeat clicks on an ascending column flip to descending,
    /// everything else sorts ascending.
    pub fn sort_by(&mut self, field: SortField) {
        let is_asc = self.sort_field == field && self.sort_direction == SortDirection::Ascending;
        self.sort_direction = if is_asc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.sort_field = field;
        self.page_index = 0;
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub price: f64,
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub slug: String,
    pub name: String,
}

/// One page of listing results. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageResult {
    pub items: Vec<Product>,
    pub total_count: usize,
}
