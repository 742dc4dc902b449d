//! Debounced, cancelable listing requests.
//!
//! Each submitted epoch supersedes the previous one: the older debounce timer
//! is dropped and its in-flight request aborted, and a superseded epoch never
//! reports back. Only settled, non-cancelled epochs reach the sink.
use std::sync::{mpsc, Arc};
use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_trace};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{CatalogApi, EngineEvent, Epoch};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

struct InFlight {
    epoch: Epoch,
    cancel: CancellationToken,
}

pub struct ListingOrchestrator {
    api: Arc<CatalogApi>,
    sink: Arc<dyn EventSink>,
    debounce: Duration,
    root: CancellationToken,
    current: Option<InFlight>,
}

impl ListingOrchestrator {
    pub fn new(api: Arc<CatalogApi>, sink: Arc<dyn EventSink>, debounce: Duration) -> Self {
        Self {
            api,
            sink,
            debounce,
            root: CancellationToken::new(),
            current: None,
        }
    }

    /// Starts `epoch`, cancelling whatever epoch was current.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self, epoch: Epoch, url: Url) {
        self.cancel_current();

        let cancel = self.root.child_token();
        self.current = Some(InFlight {
            epoch,
            cancel: cancel.clone(),
        });
        tokio::spawn(run_epoch(
            self.api.clone(),
            self.sink.clone(),
            self.debounce,
            epoch,
            url,
            cancel,
        ));
    }

    pub fn current_epoch(&self) -> Option<Epoch> {
        self.current.as_ref().map(|in_flight| in_flight.epoch)
    }

    pub fn cancel_current(&mut self) {
        if let Some(previous) = self.current.take() {
            catalog_trace!("cancelling epoch {}", previous.epoch);
            previous.cancel.cancel();
        }
    }

    /// Token that is cancelled on [`shutdown`](Self::shutdown); independent
    /// requests such as the category list hang off it.
    pub fn teardown_token(&self) -> CancellationToken {
        self.root.child_token()
    }

    pub fn shutdown(&mut self) {
        self.current = None;
        self.root.cancel();
    }
}

impl Drop for ListingOrchestrator {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

async fn run_epoch(
    api: Arc<CatalogApi>,
    sink: Arc<dyn EventSink>,
    debounce: Duration,
    epoch: Epoch,
    url: Url,
    cancel: CancellationToken,
) {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            catalog_trace!("epoch {} superseded before its request was issued", epoch);
            return;
        }
        _ = tokio::time::sleep(debounce) => {}
    }

    catalog_debug!("epoch {} requesting {}", epoch, url);
    let result = api.listing(&url, &cancel).await;

    if cancel.is_cancelled() || matches!(&result, Err(err) if err.is_cancelled()) {
        catalog_debug!("epoch {} cancelled; result discarded", epoch);
        return;
    }
    sink.emit(EngineEvent::ListingSettled { epoch, url, result });
}
