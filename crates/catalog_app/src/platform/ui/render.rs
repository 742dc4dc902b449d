use std::fmt::Write as _;
use std::panic::{self, AssertUnwindSafe};

use catalog_core::{AppViewModel, ColumnHeaderView, ListingBody, ProductRowView, SortDirection};
use catalog_logging::catalog_error;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};

use super::constants::*;

/// Renders the full screen. The listing region is isolated: a fault while
/// rendering it is replaced by an apology instead of taking the screen down.
pub fn render(view: &AppViewModel, location: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{APP_TITLE}");
    let _ = writeln!(out, "{}", render_controls(view));
    out.push_str(&contain(LISTING_COMPONENT, || render_listing(view)));
    let _ = writeln!(out, "{}", render_pagination(view));
    let _ = writeln!(out, "Location: {location}");
    out
}

/// Runs `region`, replacing its output with [`BOUNDARY_MESSAGE`] if it panics.
pub fn contain(component: &str, region: impl FnOnce() -> String) -> String {
    match panic::catch_unwind(AssertUnwindSafe(region)) {
        Ok(text) => text,
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown fault".to_string());
            catalog_error!("ErrorBoundary: {} {}", component, reason);
            format!("{BOUNDARY_MESSAGE}\n")
        }
    }
}

fn render_controls(view: &AppViewModel) -> String {
    let mut line = format!("Search: [{}]", view.search_text);
    if let Some(hint) = view.search_hint {
        let _ = write!(line, "  ({hint})");
    }
    if view.category_filter.visible {
        match &view.category_filter.active {
            Some(name) => {
                let _ = write!(line, "   Category filter: {name}");
            }
            None => line.push_str("   Category filter: all"),
        }
    }
    line
}

fn render_listing(view: &AppViewModel) -> String {
    let mut out = String::new();
    match &view.summary {
        Some(summary) => {
            let _ = writeln!(out, "{summary}");
        }
        None => {
            let _ = writeln!(out, "{LOADING_MESSAGE}");
        }
    }

    let headers: Vec<String> = view.columns.iter().map(header_label).collect();
    match &view.body {
        ListingBody::Loading => {
            let _ = writeln!(out, "{}", headers.join(" | "));
        }
        ListingBody::Error(message) => {
            let _ = writeln!(out, "{}\n{message}", headers.join(" | "));
        }
        ListingBody::Empty => {
            let _ = writeln!(out, "{}\n{EMPTY_MESSAGE}", headers.join(" | "));
        }
        ListingBody::Rows(rows) => {
            let _ = writeln!(out, "{}", product_table(headers, rows));
        }
    }
    out
}

fn header_label(column: &ColumnHeaderView) -> String {
    match column.sorted {
        Some(SortDirection::Ascending) => format!("{} {SORT_ASC_MARK}", column.label),
        Some(SortDirection::Descending) => format!("{} {SORT_DESC_MARK}", column.label),
        None => column.label.to_string(),
    }
}

fn product_table(headers: Vec<String>, rows: &[ProductRowView]) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record([
            row.title.clone(),
            row.category.clone(),
            row.price.clone(),
            row.rating.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .modify(Columns::new(2..), Alignment::right());
    table.to_string()
}

fn render_pagination(view: &AppViewModel) -> String {
    let previous = if view.can_previous { "[prev]" } else { " prev " };
    let next = if view.can_next { "[next]" } else { " next " };
    let options: Vec<String> = view
        .page_size_options
        .iter()
        .map(|size| {
            if *size == view.page_size {
                format!("[{size}]")
            } else {
                size.to_string()
            }
        })
        .collect();
    format!(
        "Page {} of {}   Rows per page: {}   {previous} {next}",
        view.page_index + 1,
        view.page_count,
        options.join(" ")
    )
}

/// Category filter options, one per line.
pub fn render_categories(view: &AppViewModel) -> String {
    if !view.category_filter.visible {
        return "Category filter unavailable.".to_string();
    }
    if view.category_filter.options.is_empty() {
        return "Categories are still loading.".to_string();
    }
    view.category_filter
        .options
        .iter()
        .map(|(slug, name)| format!("  {name} ({slug})"))
        .collect::<Vec<_>>()
        .join("\n")
}
