use catalog_core::{
    load_query_state, parse_query_string, sync_location, to_query_string, Location,
    MemoryLocation, QueryState, SortDirection, SortField,
};
use pretty_assertions::assert_eq;

#[test]
fn round_trip_reproduces_state_and_omits_defaults() {
    let state = QueryState {
        page_index: 2,
        page_size: 25,
        sort_direction: SortDirection::Descending,
        sort_field: SortField::Price,
        ..QueryState::default()
    };

    let serialized = to_query_string(&state);
    assert_eq!(serialized, "page=2&rowsPerPage=25&order=desc&orderBy=price");
    assert!(!serialized.contains("category"));
    assert!(!serialized.contains("search"));

    let parsed = parse_query_string(&serialized);
    assert_eq!(parsed.state, state);
    assert!(parsed.ignored.is_empty());
}

#[test]
fn default_state_serializes_to_empty_string() {
    assert_eq!(to_query_string(&QueryState::default()), "");
    assert_eq!(parse_query_string("").state, QueryState::default());
    assert_eq!(parse_query_string("?").state, QueryState::default());
}

#[test]
fn missing_params_take_defaults() {
    let parsed = parse_query_string("?category=smartphones");

    assert_eq!(
        parsed.state,
        QueryState {
            category: Some("smartphones".to_string()),
            ..QueryState::default()
        }
    );
}

#[test]
fn search_and_category_round_trip_with_encoding() {
    let state = QueryState {
        search_text: "red shoes & socks".to_string(),
        ..QueryState::default()
    };

    let serialized = to_query_string(&state);
    assert_eq!(serialized, "search=red+shoes+%26+socks");
    assert_eq!(parse_query_string(&serialized).state, state);
}

#[test]
fn short_search_is_not_serialized() {
    let state = QueryState {
        search_text: "a".to_string(),
        ..QueryState::default()
    };
    assert_eq!(to_query_string(&state), "");
}

#[test]
fn active_search_in_url_drops_category() {
    let parsed = parse_query_string("category=phones&search=ab");

    assert_eq!(parsed.state.search_text, "ab");
    assert_eq!(parsed.state.category, None);
}

#[test]
fn invalid_values_fall_back_and_are_reported() {
    let parsed =
        parse_query_string("page=abc&rowsPerPage=0&orderBy=colour&order=sideways&unknown=1");

    assert_eq!(parsed.state, QueryState::default());
    let keys: Vec<&str> = parsed.ignored.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(keys, vec!["page", "rowsPerPage", "orderBy", "order"]);
}

#[test]
fn load_reads_from_location() {
    let location = MemoryLocation::new("?page=4&order=desc");

    let parsed = load_query_state(&location);

    assert_eq!(parsed.state.page_index, 4);
    assert_eq!(parsed.state.sort_direction, SortDirection::Descending);
}

#[test]
fn sync_writes_minimal_query_and_skips_unchanged() {
    let mut location = MemoryLocation::new("?page=1");
    let state = QueryState {
        page_index: 1,
        ..QueryState::default()
    };

    assert!(!sync_location(&mut location, &state));
    assert_eq!(location.writes(), 0);

    let state = QueryState {
        category: Some("laptops".to_string()),
        ..QueryState::default()
    };
    assert!(sync_location(&mut location, &state));
    assert_eq!(location.query(), "category=laptops");
    assert_eq!(location.writes(), 1);

    assert!(sync_location(&mut location, &QueryState::default()));
    assert_eq!(location.query(), "");
}
