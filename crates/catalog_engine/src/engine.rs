use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_error, catalog_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::orchestrator::{EventSink, ListingOrchestrator, DEFAULT_DEBOUNCE};
use crate::{
    CatalogApi, EngineEvent, Epoch, FetchSettings, ReqwestTransport, RetryPolicy, Transport,
    TransportError,
};

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub fetch: FetchSettings,
    pub retry: RetryPolicy,
    pub debounce: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            fetch: FetchSettings::default(),
            retry: RetryPolicy::default(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to build http client: {0}")]
    Transport(#[from] TransportError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    LoadCategories { url: Url },
    FetchListing { epoch: Epoch, url: Url },
    Shutdown,
}

/// Owns the background runtime thread that executes network effects.
///
/// Commands are processed in order on that thread; results are delivered to
/// the [`EventSink`] supplied at construction.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(settings: EngineSettings, sink: Arc<dyn EventSink>) -> Result<Self, EngineError> {
        let transport = Arc::new(ReqwestTransport::new(settings.fetch.clone())?);
        Self::with_transport(transport, settings, sink)
    }

    pub fn with_transport(
        transport: Arc<dyn Transport>,
        settings: EngineSettings,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, EngineError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("catalog-engine")
            .enable_all()
            .build()?;
        let api = Arc::new(CatalogApi::new(transport, settings.retry));
        let (cmd_tx, cmd_rx) = mpsc::channel();

        let worker = thread::spawn(move || {
            let guard = runtime.enter();
            let mut orchestrator =
                ListingOrchestrator::new(api.clone(), sink.clone(), settings.debounce);

            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::LoadCategories { url } => {
                        let cancel = orchestrator.teardown_token();
                        runtime.spawn(load_categories(api.clone(), sink.clone(), url, cancel));
                    }
                    EngineCommand::FetchListing { epoch, url } => {
                        orchestrator.submit(epoch, url);
                    }
                    EngineCommand::Shutdown => break,
                }
            }

            orchestrator.shutdown();
            drop(orchestrator);
            drop(guard);
            runtime.shutdown_timeout(Duration::from_millis(500));
            catalog_debug!("engine stopped");
        });

        Ok(Self {
            cmd_tx,
            worker: Some(worker),
        })
    }

    pub fn load_categories(&self, url: Url) {
        self.send(EngineCommand::LoadCategories { url });
    }

    /// Supersedes any earlier listing epoch.
    pub fn fetch_listing(&self, epoch: Epoch, url: Url) {
        self.send(EngineCommand::FetchListing { epoch, url });
    }

    /// Cancels all outstanding requests and joins the runtime thread.
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                catalog_error!("engine thread panicked during shutdown");
            }
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            catalog_warn!("engine is not running; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn load_categories(
    api: Arc<CatalogApi>,
    sink: Arc<dyn EventSink>,
    url: Url,
    cancel: CancellationToken,
) {
    let result = api.categories(&url, &cancel).await;
    if matches!(&result, Err(err) if err.is_cancelled()) {
        return;
    }
    sink.emit(EngineEvent::CategoriesLoaded(result));
}
