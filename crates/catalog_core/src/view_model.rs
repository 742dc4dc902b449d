use crate::{
    AppState, CategoryList, Product, SortDirection, SortField, MIN_SEARCH_LEN,
    ROWS_PER_PAGE_OPTIONS,
};

pub const SEARCH_HINT: &str = "Type at least 2 characters to search";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeaderView {
    pub field: SortField,
    pub label: &'static str,
    /// Direction when this column is the active sort column.
    pub sorted: Option<SortDirection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryFilterView {
    /// False when the category list failed to load.
    pub visible: bool,
    /// Display name of the active filter.
    pub active: Option<String>,
    /// `(slug, name)` pairs in API order.
    pub options: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRowView {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub price: String,
    pub rating: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingBody {
    Loading,
    Error(String),
    Empty,
    Rows(Vec<ProductRowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub search_text: String,
    pub search_hint: Option<&'static str>,
    pub category_filter: CategoryFilterView,
    pub columns: Vec<ColumnHeaderView>,
    pub body: ListingBody,
    /// `None` while loading.
    pub summary: Option<String>,
    pub page_index: usize,
    pub page_count: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub can_previous: bool,
    pub can_next: bool,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        let query = self.query();
        let loading = self.is_loading();

        let columns = SortField::ALL
            .into_iter()
            .map(|field| ColumnHeaderView {
                field,
                label: field.label(),
                sorted: (query.sort_field == field).then_some(query.sort_direction),
            })
            .collect();

        let body = if loading {
            ListingBody::Loading
        } else if let Some(message) = self.error_message() {
            ListingBody::Error(message.to_string())
        } else if self.page().items.is_empty() {
            ListingBody::Empty
        } else {
            ListingBody::Rows(
                self.page()
                    .items
                    .iter()
                    .map(|product| self.row_view(product))
                    .collect(),
            )
        };

        let summary = (!loading).then(|| {
            let total = self.page().total_count;
            let start = if total == 0 { 0 } else { query.offset() + 1 };
            let end = total.min((query.page_index + 1).saturating_mul(query.page_size));
            format!("Showing {start}\u{2013}{end} of {total} products")
        });

        let search_len = query.search_text.chars().count();
        AppViewModel {
            search_text: query.search_text.clone(),
            search_hint: (search_len > 0 && search_len < MIN_SEARCH_LEN).then_some(SEARCH_HINT),
            category_filter: self.category_filter_view(),
            columns,
            body,
            summary,
            page_index: query.page_index,
            page_count: self.page_count(),
            page_size: query.page_size,
            page_size_options: ROWS_PER_PAGE_OPTIONS.to_vec(),
            can_previous: query.page_index > 0,
            can_next: !loading && self.has_next_page(),
        }
    }

    fn row_view(&self, product: &Product) -> ProductRowView {
        let category = self
            .categories()
            .find(&product.category)
            .map(|category| category.name.clone())
            .unwrap_or_else(|| product.category.clone());
        ProductRowView {
            id: product.id,
            title: product.title.clone(),
            category,
            price: format_price(product.price),
            rating: format!("{:.2} out of 5", product.rating),
        }
    }

    fn category_filter_view(&self) -> CategoryFilterView {
        let selected = self.query().category.as_deref();
        match self.categories() {
            CategoryList::Unavailable => CategoryFilterView::default(),
            CategoryList::Loading => CategoryFilterView {
                visible: true,
                active: selected.map(str::to_string),
                options: Vec::new(),
            },
            CategoryList::Loaded(categories) => CategoryFilterView {
                visible: true,
                active: selected.map(|slug| {
                    self.categories()
                        .find(slug)
                        .map(|category| category.name.clone())
                        .unwrap_or_else(|| slug.to_string())
                }),
                options: categories
                    .iter()
                    .map(|category| (category.slug.clone(), category.name.clone()))
                    .collect(),
            },
        }
    }
}

/// Formats a price as US currency, e.g. `$1,234.50`.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let sign = if price < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{sign}${}.{:02}",
        format_with_commas(cents / 100),
        cents % 100
    )
}

fn format_with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
