//! Shop API client.
//!
//! [`ShopApi`] is the seam the reducer's effects call through. It uses
//! explicit `Pin<Box<dyn Future>>` returns so it stays object-safe and can be
//! held as `Arc<dyn ShopApi>` in the environment.

use crate::config::Config;
use crate::error::ApiError;
use crate::types::{OrderConfirmation, OrderRequest, ProductId, ProductList, ProductRecord};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`ShopApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// Remote shop operations
pub trait ShopApi: Send + Sync {
    /// Fetch every catalog record, image URLs made absolute
    fn product_list(&self) -> ApiFuture<'_, Vec<ProductRecord>>;

    /// Fetch a single record, image URL made absolute
    ///
    /// Not used by the reducer; previews come from the loaded catalog.
    fn product(&self, id: ProductId) -> ApiFuture<'_, ProductRecord>;

    /// Submit an order
    fn submit_order(&self, order: OrderRequest) -> ApiFuture<'_, OrderConfirmation>;
}

/// `reqwest`-backed client for the Web Larek API
#[derive(Debug, Clone)]
pub struct HttpShopApi {
    client: Client,
    api_url: String,
    cdn_url: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpShopApi {
    /// Client for explicit API and CDN base URLs
    #[must_use]
    pub fn new(api_url: impl Into<String>, cdn_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            cdn_url: cdn_url.into(),
        }
    }

    /// Client for the URLs in `config`
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api_url(), config.cdn_url())
    }

    fn absolutize(&self, mut record: ProductRecord) -> ProductRecord {
        record.image = format!("{}{}", self.cdn_url, record.image);
        record
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .client
            .get(format!("{}{path}", self.api_url))
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body).map_or_else(
            |_| status.canonical_reason().unwrap_or("unknown status").to_string(),
            |parsed| parsed.error,
        );
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

impl ShopApi for HttpShopApi {
    fn product_list(&self) -> ApiFuture<'_, Vec<ProductRecord>> {
        Box::pin(async move {
            let list: ProductList = self.get("/product").await?;
            tracing::debug!(total = list.total, received = list.items.len(), "Catalog fetched");
            Ok(list
                .items
                .into_iter()
                .map(|record| self.absolutize(record))
                .collect())
        })
    }

    fn product(&self, id: ProductId) -> ApiFuture<'_, ProductRecord> {
        Box::pin(async move {
            let record: ProductRecord = self.get(&format!("/product/{id}")).await?;
            Ok(self.absolutize(record))
        })
    }

    fn submit_order(&self, order: OrderRequest) -> ApiFuture<'_, OrderConfirmation> {
        Box::pin(async move {
            let response = self
                .client
                .post(format!("{}/order", self.api_url))
                .json(&order)
                .send()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;
            Self::decode(response).await
        })
    }
}
