use crate::{AppState, CategoryList, Effect, Msg, QueryState};

/// Pure update function: applies a message to state and returns any effects.
///
/// Every change to the query opens a new epoch and rewrites the location.
/// Listing results are committed only for the current epoch, so a late
/// response from a superseded request can never overwrite newer input.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            let epoch = state.begin_epoch();
            vec![
                Effect::LoadCategories,
                Effect::FetchListing {
                    epoch,
                    query: state.query().clone(),
                },
                Effect::ReplaceLocation {
                    query: state.query().clone(),
                },
            ]
        }
        Msg::SearchChanged(text) => change_query(&mut state, |query| query.set_search_text(text)),
        Msg::SearchCleared => change_query(&mut state, QueryState::clear_search),
        Msg::CategorySelected(slug) => {
            // Only slugs offered by a loaded filter can be selected.
            if let Some(slug) = &slug {
                if state.categories().find(slug).is_none() {
                    return (state, Vec::new());
                }
            }
            change_query(&mut state, |query| query.select_category(slug))
        }
        Msg::SortClicked(field) => change_query(&mut state, |query| query.sort_by(field)),
        Msg::PageChanged(page) => {
            if state.is_loading() || page >= state.page_count() {
                return (state, Vec::new());
            }
            change_query(&mut state, |query| query.page_index = page)
        }
        Msg::NextPage => {
            if state.is_loading() || !state.has_next_page() {
                return (state, Vec::new());
            }
            change_query(&mut state, |query| query.page_index += 1)
        }
        Msg::PreviousPage => change_query(&mut state, |query| {
            query.page_index = query.page_index.saturating_sub(1)
        }),
        Msg::RowsPerPageChanged(rows) => {
            if rows == 0 {
                return (state, Vec::new());
            }
            change_query(&mut state, |query| query.set_page_size(rows))
        }
        Msg::CategoriesLoaded(categories) => {
            state.set_categories(CategoryList::Loaded(categories));
            Vec::new()
        }
        Msg::CategoriesFailed => {
            state.set_categories(CategoryList::Unavailable);
            Vec::new()
        }
        Msg::ListingLoaded { epoch, page } => {
            if state.is_current(epoch) {
                state.commit_success(page);
            }
            Vec::new()
        }
        Msg::ListingFailed { epoch } => {
            if state.is_current(epoch) {
                state.commit_failure();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn change_query(state: &mut AppState, edit: impl FnOnce(&mut QueryState)) -> Vec<Effect> {
    let mut next = state.query().clone();
    edit(&mut next);
    if &next == state.query() {
        return Vec::new();
    }

    state.replace_query(next);
    let epoch = state.begin_epoch();
    vec![
        Effect::FetchListing {
            epoch,
            query: state.query().clone(),
        },
        Effect::ReplaceLocation {
            query: state.query().clone(),
        },
    ]
}
