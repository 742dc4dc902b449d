//! Catalog engine: network IO, resilient fetch and listing orchestration.
mod api;
mod engine;
mod orchestrator;
mod persist;
mod retry;
mod transport;
mod types;

pub use api::{CatalogApi, CategoryDto, ListingDto, ProductDto};
pub use engine::{EngineError, EngineHandle, EngineSettings};
pub use orchestrator::{ChannelEventSink, EventSink, ListingOrchestrator, DEFAULT_DEBOUNCE};
pub use persist::{ensure_parent_dir, read_if_exists, AtomicFileWriter, PersistError};
pub use retry::{classify_status, fetch_with_retry, Fetched, RetryPolicy, StatusClass};
pub use transport::{FetchSettings, ReqwestTransport, Transport};
pub use types::{
    EngineEvent, Epoch, FailureKind, FetchError, TransportError, TransportFailure,
    TransportResponse,
};
