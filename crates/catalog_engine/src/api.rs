use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{fetch_with_retry, FailureKind, FetchError, RetryPolicy, Transport};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProductDto {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "CategoryWire")]
pub struct CategoryDto {
    pub slug: String,
    pub name: String,
}

/// Older API revisions list categories as bare slugs.
#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryWire {
    Full { slug: String, name: String },
    Slug(String),
}

impl From<CategoryWire> for CategoryDto {
    fn from(wire: CategoryWire) -> Self {
        match wire {
            CategoryWire::Full { slug, name } => Self { slug, name },
            CategoryWire::Slug(slug) => Self {
                name: slug.clone(),
                slug,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListingDto {
    #[serde(rename = "products")]
    pub items: Vec<ProductDto>,
    #[serde(rename = "total")]
    pub total_count: usize,
}

/// Product API calls: resilient fetch plus JSON decoding.
#[derive(Clone)]
pub struct CatalogApi {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl CatalogApi {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub async fn categories(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Vec<CategoryDto>, FetchError> {
        self.get_json(url, cancel).await
    }

    pub async fn listing(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<ListingDto, FetchError> {
        self.get_json(url, cancel).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("unsupported scheme {:?}", url.scheme()),
                0,
            ));
        }

        let fetched = fetch_with_retry(self.transport.as_ref(), url, cancel, self.policy).await?;
        serde_json::from_slice(&fetched.response.body).map_err(|err| {
            FetchError::new(FailureKind::Decode, err.to_string(), fetched.attempts)
        })
    }
}
