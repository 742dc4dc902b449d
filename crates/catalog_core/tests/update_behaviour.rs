use std::sync::Once;

use catalog_core::{
    to_query_string, update, AppState, Category, Effect, FetchStatus, Msg, PageResult, Product,
    QueryState, SortDirection, SortField,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(catalog_logging::initialize_for_tests);
}

fn started(query: QueryState) -> AppState {
    let (state, _) = update(AppState::with_query(query), Msg::Started);
    state
}

fn fetched_query(effects: &[Effect]) -> Option<&QueryState> {
    effects.iter().find_map(|effect| match effect {
        Effect::FetchListing { query, .. } => Some(query),
        _ => None,
    })
}

fn location(effects: &[Effect]) -> Option<String> {
    effects.iter().find_map(|effect| match effect {
        Effect::ReplaceLocation { query } => Some(to_query_string(query)),
        _ => None,
    })
}

fn category(slug: &str, name: &str) -> Category {
    Category {
        slug: slug.to_string(),
        name: name.to_string(),
    }
}

fn with_categories(state: AppState) -> AppState {
    let (state, _) = update(
        state,
        Msg::CategoriesLoaded(vec![category("laptops", "Laptops"), category("phones", "Phones")]),
    );
    state
}

fn page_of(total: usize) -> PageResult {
    PageResult {
        items: vec![Product {
            id: 1,
            title: "Essence Mascara".to_string(),
            category: "beauty".to_string(),
            price: 9.99,
            rating: 4.94,
        }],
        total_count: total,
    }
}

#[test]
fn start_loads_categories_fetches_and_normalizes_location() {
    init_logging();
    let query = QueryState {
        page_index: 1,
        ..QueryState::default()
    };

    let (state, effects) = update(AppState::with_query(query.clone()), Msg::Started);

    assert_eq!(state.status(), FetchStatus::Pending);
    assert_eq!(
        effects,
        vec![
            Effect::LoadCategories,
            Effect::FetchListing {
                epoch: 1,
                query: query.clone()
            },
            Effect::ReplaceLocation { query },
        ]
    );
    assert_eq!(location(&effects).as_deref(), Some("page=1"));
}

#[test]
fn active_search_clears_selected_category() {
    init_logging();
    let state = started(QueryState {
        category: Some("phones".to_string()),
        page_index: 3,
        ..QueryState::default()
    });

    let (state, effects) = update(state, Msg::SearchChanged("ab".to_string()));

    assert_eq!(state.query().category, None);
    assert_eq!(state.query().search_text, "ab");
    assert_eq!(state.query().page_index, 0);
    assert_eq!(fetched_query(&effects).unwrap().search_text, "ab");
    assert_eq!(location(&effects).as_deref(), Some("search=ab"));
}

#[test]
fn single_character_search_keeps_category() {
    init_logging();
    let state = started(QueryState {
        category: Some("phones".to_string()),
        ..QueryState::default()
    });

    let (state, effects) = update(state, Msg::SearchChanged("a".to_string()));

    assert_eq!(state.query().category.as_deref(), Some("phones"));
    assert_eq!(location(&effects).as_deref(), Some("category=phones"));
    assert_eq!(
        state.view().search_hint,
        Some(catalog_core::SEARCH_HINT)
    );
}

#[test]
fn selecting_category_clears_search() {
    init_logging();
    let state = with_categories(started(QueryState {
        search_text: "phone".to_string(),
        ..QueryState::default()
    }));

    let (state, effects) = update(state, Msg::CategorySelected(Some("laptops".to_string())));

    assert_eq!(state.query().search_text, "");
    assert_eq!(state.query().category.as_deref(), Some("laptops"));
    assert_eq!(location(&effects).as_deref(), Some("category=laptops"));

    let (state, effects) = update(state, Msg::CategorySelected(None));
    assert_eq!(state.query().category, None);
    assert_eq!(location(&effects).as_deref(), Some(""));
}

#[test]
fn category_outside_loaded_filter_is_ignored() {
    init_logging();
    let state = started(QueryState::default());
    let epoch = state.current_epoch();

    let (state, effects) = update(state, Msg::CategorySelected(Some("laptops".to_string())));
    assert!(effects.is_empty(), "filter still loading");

    let state = with_categories(state);
    let (state, effects) = update(state, Msg::CategorySelected(Some("boats".to_string())));
    assert!(effects.is_empty(), "slug not offered");

    let (state, _) = update(state, Msg::CategoriesFailed);
    let (state, effects) = update(state, Msg::CategorySelected(Some("phones".to_string())));
    assert!(effects.is_empty(), "filter unavailable");
    assert_eq!(state.query().category, None);
    assert_eq!(state.current_epoch(), epoch);
}

#[test]
fn sort_toggles_on_repeat_click_and_resets_page() {
    init_logging();
    let state = started(QueryState {
        page_index: 2,
        ..QueryState::default()
    });

    let (state, _) = update(state, Msg::SortClicked(SortField::Title));
    assert_eq!(state.query().sort_field, SortField::Title);
    assert_eq!(state.query().sort_direction, SortDirection::Descending);
    assert_eq!(state.query().page_index, 0);

    let (state, _) = update(state, Msg::SortClicked(SortField::Title));
    assert_eq!(state.query().sort_direction, SortDirection::Ascending);

    let (state, _) = update(state, Msg::SortClicked(SortField::Price));
    assert_eq!(state.query().sort_field, SortField::Price);
    assert_eq!(state.query().sort_direction, SortDirection::Ascending);

    let (state, effects) = update(state, Msg::SortClicked(SortField::Price));
    assert_eq!(state.query().sort_direction, SortDirection::Descending);
    assert_eq!(location(&effects).as_deref(), Some("order=desc&orderBy=price"));
}

#[test]
fn rows_per_page_change_resets_page() {
    init_logging();
    let state = started(QueryState::default());
    let epoch = state.current_epoch();
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            epoch,
            page: page_of(100),
        },
    );
    let (state, _) = update(state, Msg::PageChanged(4));
    assert_eq!(state.query().page_index, 4);

    let (state, effects) = update(state, Msg::RowsPerPageChanged(25));

    assert_eq!(state.query().page_size, 25);
    assert_eq!(state.query().page_index, 0);
    assert_eq!(location(&effects).as_deref(), Some("rowsPerPage=25"));

    let (_state, effects) = update(state, Msg::RowsPerPageChanged(0));
    assert!(effects.is_empty());
}

#[test]
fn paging_respects_bounds() {
    init_logging();
    let state = started(QueryState::default());
    let (state, effects) = update(state, Msg::PreviousPage);
    assert!(effects.is_empty());

    let epoch = state.current_epoch();
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            epoch,
            page: page_of(25),
        },
    );
    assert_eq!(state.page_count(), 3);

    let (state, effects) = update(state, Msg::PageChanged(3));
    assert!(effects.is_empty());
    assert_eq!(state.query().page_index, 0);

    let (state, _) = update(state, Msg::NextPage);
    let epoch = state.current_epoch();
    let (state, _) = update(state, Msg::ListingLoaded { epoch, page: page_of(25) });
    let (state, _) = update(state, Msg::NextPage);
    assert_eq!(state.query().page_index, 2);
    let epoch = state.current_epoch();
    let (state, _) = update(state, Msg::ListingLoaded { epoch, page: page_of(25) });

    let (state, effects) = update(state, Msg::NextPage);
    assert!(effects.is_empty());
    assert!(!state.view().can_next);
    assert!(state.view().can_previous);

    let (state, _) = update(state, Msg::PreviousPage);
    assert_eq!(state.query().page_index, 1);
}

#[test]
fn paging_waits_for_pending_result() {
    init_logging();
    let state = started(QueryState::default());
    let epoch = state.current_epoch();
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            epoch,
            page: page_of(100),
        },
    );

    let (state, effects) = update(state, Msg::NextPage);
    assert_eq!(fetched_query(&effects).unwrap().page_index, 1);
    assert_eq!(state.status(), FetchStatus::Pending);
    assert!(!state.view().can_next);

    let (state, effects) = update(state, Msg::NextPage);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::PageChanged(5));
    assert!(effects.is_empty());
    assert_eq!(state.query().page_index, 1);

    let epoch = state.current_epoch();
    let (state, _) = update(
        state,
        Msg::ListingLoaded {
            epoch,
            page: page_of(100),
        },
    );
    let (state, _) = update(state, Msg::NextPage);
    assert_eq!(state.query().page_index, 2);
}

#[test]
fn unchanged_query_emits_nothing() {
    init_logging();
    let state = started(QueryState::default());
    let epoch = state.current_epoch();

    let (state, effects) = update(state, Msg::SearchCleared);
    assert!(effects.is_empty());
    let (state, effects) = update(state, Msg::CategorySelected(None));
    assert!(effects.is_empty());
    assert_eq!(state.current_epoch(), epoch);
}

#[test]
fn category_failure_hides_filter_without_blocking_listing() {
    init_logging();
    let state = started(QueryState::default());

    let (state, effects) = update(state, Msg::CategoriesFailed);
    assert!(effects.is_empty());
    assert!(!state.view().category_filter.visible);

    let epoch = state.current_epoch();
    let (state, _) = update(state, Msg::ListingLoaded { epoch, page: page_of(1) });
    assert_eq!(state.status(), FetchStatus::Success);
}

#[test]
fn loaded_categories_feed_filter_and_rows() {
    init_logging();
    let state = started(QueryState {
        category: Some("beauty".to_string()),
        ..QueryState::default()
    });
    let (state, _) = update(
        state,
        Msg::CategoriesLoaded(vec![
            Category {
                slug: "beauty".to_string(),
                name: "Beauty".to_string(),
            },
            Category {
                slug: "fragrances".to_string(),
                name: "Fragrances".to_string(),
            },
        ]),
    );
    let epoch = state.current_epoch();
    let (state, _) = update(state, Msg::ListingLoaded { epoch, page: page_of(1) });

    let view = state.view();
    assert!(view.category_filter.visible);
    assert_eq!(view.category_filter.active.as_deref(), Some("Beauty"));
    assert_eq!(view.category_filter.options.len(), 2);
    match view.body {
        catalog_core::ListingBody::Rows(rows) => assert_eq!(rows[0].category, "Beauty"),
        other => panic!("unexpected body {other:?}"),
    }
}
