//! Core state machine driving the orchestrator, as the app wires them.
mod common;

use std::sync::Arc;
use std::time::Duration;

use catalog_core::{
    build_listing_url, sync_location, update, AppState, Effect, FetchStatus, Location,
    MemoryLocation, Msg, PageResult, Product,
};
use catalog_engine::{
    CatalogApi, EngineEvent, ListingDto, ListingOrchestrator, RetryPolicy, DEFAULT_DEBOUNCE,
};
use common::{listing_json, Scripted, ScriptedTransport, TestSink};
use url::Url;

struct Harness {
    state: Option<AppState>,
    orchestrator: ListingOrchestrator,
    sink: Arc<TestSink>,
    location: MemoryLocation,
    base: Url,
}

impl Harness {
    fn new(transport: Arc<ScriptedTransport>, initial_location: &str) -> Self {
        let sink = Arc::new(TestSink::default());
        let api = Arc::new(CatalogApi::new(transport, RetryPolicy::default()));
        let location = MemoryLocation::new(initial_location);
        let initial = catalog_core::load_query_state(&location).state;
        Self {
            state: Some(AppState::with_query(initial)),
            orchestrator: ListingOrchestrator::new(api, sink.clone(), DEFAULT_DEBOUNCE),
            sink,
            location,
            base: Url::parse("https://catalog.test").unwrap(),
        }
    }

    fn state(&self) -> &AppState {
        self.state.as_ref().unwrap()
    }

    fn dispatch(&mut self, msg: Msg) {
        let (state, effects) = update(self.state.take().unwrap(), msg);
        self.state = Some(state);
        for effect in effects {
            match effect {
                Effect::FetchListing { epoch, query } => {
                    self.orchestrator
                        .submit(epoch, build_listing_url(&self.base, &query));
                }
                Effect::ReplaceLocation { query } => {
                    sync_location(&mut self.location, &query);
                }
                Effect::LoadCategories => {}
            }
        }
    }

    async fn settle(&mut self) {
        tokio::time::sleep(Duration::from_secs(2)).await;
        for event in self.sink.take() {
            if let EngineEvent::ListingSettled { epoch, result, .. } = event {
                let msg = match result {
                    Ok(listing) => Msg::ListingLoaded {
                        epoch,
                        page: to_page(listing),
                    },
                    Err(_) => Msg::ListingFailed { epoch },
                };
                self.dispatch(msg);
            }
        }
    }
}

fn to_page(listing: ListingDto) -> PageResult {
    PageResult {
        items: listing
            .items
            .into_iter()
            .map(|p| Product {
                id: p.id,
                title: p.title,
                category: p.category,
                price: p.price,
                rating: p.rating,
            })
            .collect(),
        total_count: listing.total_count,
    }
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[tokio::test(start_paused = true)]
async fn search_clears_category_and_issues_one_search_request() {
    let transport = Arc::new(ScriptedTransport::always(Scripted::Json(listing_json(
        &["ab"],
        1,
    ))));
    let mut harness = Harness::new(transport.clone(), "?category=phones");

    harness.dispatch(Msg::Started);
    harness.settle().await;
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].url.path(), "/products/category/phones");
    assert_eq!(harness.location.writes(), 0, "start leaves a current location alone");

    harness.dispatch(Msg::SearchChanged("ab".to_string()));
    assert_eq!(harness.state().query().category, None);
    assert_eq!(harness.location.query(), "search=ab");
    assert_eq!(harness.location.writes(), 1);

    harness.settle().await;
    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].url.path(), "/products/search");
    assert_eq!(query_value(&calls[1].url, "q").as_deref(), Some("ab"));
    assert_eq!(harness.state().status(), FetchStatus::Success);
}

#[tokio::test(start_paused = true)]
async fn rapid_keystrokes_issue_a_single_request_for_final_text() {
    let transport = Arc::new(ScriptedTransport::always(Scripted::Json(listing_json(
        &["abc phone"],
        1,
    ))));
    let mut harness = Harness::new(transport.clone(), "");
    harness.dispatch(Msg::Started);
    harness.settle().await;
    assert_eq!(transport.calls().len(), 1);

    for text in ["a", "ab", "abc"] {
        harness.dispatch(Msg::SearchChanged(text.to_string()));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    harness.settle().await;

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(query_value(&calls[1].url, "q").as_deref(), Some("abc"));
    assert_eq!(harness.state().page().items[0].title, "abc phone");
    assert_eq!(harness.location.query(), "search=abc");
}

#[tokio::test(start_paused = true)]
async fn late_response_for_old_input_never_wins() {
    // First request is slow; by the time it would land the user has moved on.
    let transport = Arc::new(
        ScriptedTransport::new(
            vec![
                Scripted::Json(listing_json(&["first page"], 30)),
                Scripted::Json(listing_json(&["price sorted"], 30)),
            ],
            Scripted::Json(listing_json(&["unused"], 30)),
        )
        .with_latency(Duration::from_millis(800)),
    );
    let mut harness = Harness::new(transport.clone(), "");

    harness.dispatch(Msg::Started);
    tokio::time::sleep(Duration::from_millis(500)).await;
    harness.dispatch(Msg::SortClicked(catalog_core::SortField::Price));
    harness.settle().await;

    assert_eq!(transport.calls().len(), 2);
    assert_eq!(harness.state().page().items[0].title, "price sorted");
    assert_eq!(harness.state().current_epoch(), 2);
}

#[tokio::test(start_paused = true)]
async fn failure_surfaces_generic_message_and_empty_page() {
    let transport = Arc::new(ScriptedTransport::always(Scripted::Status(500)));
    let mut harness = Harness::new(transport.clone(), "?page=1");

    harness.dispatch(Msg::Started);
    tokio::time::sleep(Duration::from_secs(10)).await;
    harness.settle().await;

    assert_eq!(transport.calls().len(), 4);
    assert_eq!(harness.state().status(), FetchStatus::Error);
    assert_eq!(
        harness.state().error_message(),
        Some(catalog_core::FETCH_FAILED_MESSAGE)
    );
    assert_eq!(harness.state().page(), &PageResult::default());
}
