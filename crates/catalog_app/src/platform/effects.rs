use std::sync::{mpsc, Arc, Mutex};

use catalog_core::{
    build_listing_url, categories_url, sync_location, Category, Effect, Epoch, Msg, PageResult,
    Product, QueryState,
};
use catalog_engine::{
    CategoryDto, EngineError, EngineEvent, EngineHandle, EngineSettings, EventSink, FailureKind,
    ListingDto, ProductDto,
};
use catalog_logging::{catalog_debug, catalog_error, catalog_info, catalog_warn};
use url::Url;

use super::app::Inbox;
use super::location::FileLocation;

/// Query behind the most recently submitted listing epoch.
type LatestListing = Arc<Mutex<Option<(Epoch, QueryState)>>>;

/// Executes core effects against the engine and the location file.
pub struct EffectRunner {
    engine: EngineHandle,
    location: FileLocation,
    base: Url,
    latest: LatestListing,
}

impl EffectRunner {
    pub fn new(
        settings: EngineSettings,
        base: Url,
        location: FileLocation,
        inbox: mpsc::Sender<Inbox>,
    ) -> Result<Self, EngineError> {
        let latest = LatestListing::default();
        let sink = InboxSink {
            tx: inbox,
            latest: latest.clone(),
        };
        let engine = EngineHandle::new(settings, Arc::new(sink))?;
        Ok(Self {
            engine,
            location,
            base,
            latest,
        })
    }

    pub fn location(&self) -> &FileLocation {
        &self.location
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadCategories => {
                    let url = categories_url(&self.base);
                    catalog_info!("LoadCategories url={}", url);
                    self.engine.load_categories(url);
                }
                Effect::FetchListing { epoch, query } => {
                    let url = build_listing_url(&self.base, &query);
                    catalog_debug!("FetchListing epoch={} url={}", epoch, url);
                    if let Ok(mut latest) = self.latest.lock() {
                        *latest = Some((epoch, query));
                    }
                    self.engine.fetch_listing(epoch, url);
                }
                Effect::ReplaceLocation { query } => {
                    if !sync_location(&mut self.location, &query) {
                        catalog_debug!("Location already current");
                    }
                }
            }
        }
    }

    pub fn shutdown(&mut self) {
        self.engine.shutdown();
    }
}

/// Turns engine events into core messages on the app inbox.
struct InboxSink {
    tx: mpsc::Sender<Inbox>,
    latest: LatestListing,
}

impl InboxSink {
    fn query_for(&self, epoch: Epoch) -> Option<QueryState> {
        let latest = self.latest.lock().ok()?;
        match latest.as_ref() {
            Some((current, query)) if *current == epoch => Some(query.clone()),
            _ => None,
        }
    }
}

impl EventSink for InboxSink {
    fn emit(&self, event: EngineEvent) {
        let msg = match event {
            EngineEvent::CategoriesLoaded(Ok(categories)) => {
                Msg::CategoriesLoaded(categories.into_iter().map(map_category).collect())
            }
            EngineEvent::CategoriesLoaded(Err(err)) => {
                catalog_warn!("Category list unavailable; filter hidden: {}", err);
                Msg::CategoriesFailed
            }
            EngineEvent::ListingSettled {
                epoch,
                result: Ok(listing),
                ..
            } => Msg::ListingLoaded {
                epoch,
                page: map_listing(listing),
            },
            EngineEvent::ListingSettled {
                epoch,
                url,
                result: Err(err),
            } => {
                log_listing_failure(epoch, &url, self.query_for(epoch).as_ref(), &err);
                Msg::ListingFailed { epoch }
            }
        };
        let _ = self.tx.send(Inbox::Msg(msg));
    }
}

fn log_listing_failure(
    epoch: Epoch,
    url: &Url,
    query: Option<&QueryState>,
    err: &catalog_engine::FetchError,
) {
    let scope = match err.kind {
        FailureKind::ClientError(_) => "client",
        FailureKind::ServerError(_) => "server",
        FailureKind::Network => "network",
        _ => "other",
    };
    let Some(query) = query else {
        catalog_warn!(
            "FetchingProductsFailed epoch={} (superseded) scope={} kind={} url={} error={}",
            epoch,
            scope,
            err.kind,
            url,
            err
        );
        return;
    };
    catalog_error!(
        "FetchingProductsFailed epoch={} scope={} kind={} attempts={} url={} {} error={}",
        epoch,
        scope,
        err.kind,
        err.attempts,
        url,
        query_context(query),
        err
    );
}

fn query_context(query: &QueryState) -> String {
    format!(
        "orderBy={} order={} page={} rowsPerPage={} category={} search={:?}",
        query.sort_field.as_str(),
        query.sort_direction.as_str(),
        query.page_index,
        query.page_size,
        query.category.as_deref().unwrap_or("-"),
        query.search_text
    )
}

fn map_category(dto: CategoryDto) -> Category {
    Category {
        slug: dto.slug,
        name: dto.name,
    }
}

fn map_product(dto: ProductDto) -> Product {
    Product {
        id: dto.id,
        title: dto.title,
        category: dto.category,
        price: dto.price,
        rating: dto.rating,
    }
}

fn map_listing(dto: ListingDto) -> PageResult {
    PageResult {
        items: dto.items.into_iter().map(map_product).collect(),
        total_count: dto.total_count,
    }
}
