//! Mirrors [`QueryState`] into an address-bar style query string and back.
use url::form_urlencoded;

use crate::query::{DEFAULT_PAGE, DEFAULT_ROWS_PER_PAGE};
use crate::{QueryState, SortDirection, SortField};

pub const PARAM_ORDER_BY: &str = "orderBy";
pub const PARAM_ORDER: &str = "order";
pub const PARAM_PAGE: &str = "page";
pub const PARAM_ROWS_PER_PAGE: &str = "rowsPerPage";
pub const PARAM_CATEGORY: &str = "category";
pub const PARAM_SEARCH: &str = "search";

/// Read/replace access to the persisted query string.
///
/// `replace_query` must not create a history entry or trigger a reload.
pub trait Location {
    /// Current query string, with or without a leading `?`.
    fn query(&self) -> String;
    fn replace_query(&mut self, query: &str);
}

/// In-memory location, used when no real address bar exists and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLocation {
    query: String,
    writes: usize,
}

impl MemoryLocation {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            writes: 0,
        }
    }

    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Location for MemoryLocation {
    fn query(&self) -> String {
        self.query.clone()
    }

    fn replace_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.writes += 1;
    }
}

/// A query parameter that was present but could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredParam {
    pub key: String,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    pub state: QueryState,
    pub ignored: Vec<IgnoredParam>,
}

/// Parses a query string into [`QueryState`], applying defaults for missing
/// or unusable parameters. Unknown keys are skipped silently.
pub fn parse_query_string(raw: &str) -> ParsedQuery {
    let raw = raw.trim().trim_start_matches('?');
    let mut parsed = ParsedQuery::default();

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        let state = &mut parsed.state;
        let outcome: Result<(), String> = match key.as_ref() {
            PARAM_ORDER_BY => value.parse::<SortField>().map(|field| state.sort_field = field),
            PARAM_ORDER => value
                .parse::<SortDirection>()
                .map(|direction| state.sort_direction = direction),
            PARAM_PAGE => value
                .trim()
                .parse::<usize>()
                .map(|page| state.page_index = page)
                .map_err(|err| err.to_string()),
            PARAM_ROWS_PER_PAGE => match value.trim().parse::<usize>() {
                Ok(0) => Err("rows per page must be positive".to_string()),
                Ok(rows) => {
                    state.page_size = rows;
                    Ok(())
                }
                Err(err) => Err(err.to_string()),
            },
            PARAM_CATEGORY => {
                let slug = value.trim();
                if !slug.is_empty() {
                    state.category = Some(slug.to_string());
                }
                Ok(())
            }
            PARAM_SEARCH => {
                state.search_text = value.into_owned();
                continue;
            }
            _ => continue,
        };

        if let Err(reason) = outcome {
            parsed.ignored.push(IgnoredParam {
                key: key.into_owned(),
                value: value.into_owned(),
                reason,
            });
        }
    }

    if parsed.state.active_search().is_some() {
        parsed.state.category = None;
    }
    parsed
}

/// Serializes `state`, omitting every field that equals its default.
/// Returns an empty string when nothing differs from the defaults.
pub fn to_query_string(state: &QueryState) -> String {
    let defaults = QueryState::default();
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if state.page_index != DEFAULT_PAGE {
        serializer.append_pair(PARAM_PAGE, &state.page_index.to_string());
    }
    if state.page_size != DEFAULT_ROWS_PER_PAGE {
        serializer.append_pair(PARAM_ROWS_PER_PAGE, &state.page_size.to_string());
    }
    if state.sort_direction != defaults.sort_direction {
        serializer.append_pair(PARAM_ORDER, state.sort_direction.as_str());
    }
    if state.sort_field != defaults.sort_field {
        serializer.append_pair(PARAM_ORDER_BY, state.sort_field.as_str());
    }
    if let Some(slug) = state.category.as_deref() {
        serializer.append_pair(PARAM_CATEGORY, slug);
    }
    if let Some(text) = state.active_search() {
        serializer.append_pair(PARAM_SEARCH, text);
    }

    serializer.finish()
}

/// Reads the initial state from `location`.
pub fn load_query_state(location: &dyn Location) -> ParsedQuery {
    parse_query_string(&location.query())
}

/// Writes `state` back into `location` unless it is already current.
/// Returns whether a write happened.
pub fn sync_location(location: &mut dyn Location, state: &QueryState) -> bool {
    let next = to_query_string(state);
    let current = location.query();
    if current.trim_start_matches('?') == next {
        return false;
    }
    location.replace_query(&next);
    true
}
