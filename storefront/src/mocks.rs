//! In-memory [`ShopApi`] for tests and offline runs.

use crate::api::{ApiFuture, ShopApi};
use crate::error::ApiError;
use crate::types::{OrderConfirmation, OrderRequest, ProductId, ProductRecord};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug)]
struct Inner {
    catalog: Result<Vec<ProductRecord>, ApiError>,
    order_failure: Option<ApiError>,
    submitted: Vec<OrderRequest>,
}

/// Scripted shop API.
///
/// Orders succeed by default with ids `order-1`, `order-2`, ... and echo the
/// requested total. Clones share state, so a test can keep one handle and
/// give another to the environment.
#[derive(Debug, Clone)]
pub struct MockShopApi {
    inner: Arc<Mutex<Inner>>,
    gate: Option<Arc<Notify>>,
}

impl Default for MockShopApi {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl MockShopApi {
    /// API serving `catalog`
    #[must_use]
    pub fn new(catalog: Vec<ProductRecord>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                catalog: Ok(catalog),
                order_failure: None,
                submitted: Vec::new(),
            })),
            gate: None,
        }
    }

    /// Make catalog requests fail with `error`
    #[must_use]
    pub fn with_catalog_failure(self, error: ApiError) -> Self {
        self.lock().catalog = Err(error);
        self
    }

    /// Make order submissions fail with `error`
    #[must_use]
    pub fn with_order_failure(self, error: ApiError) -> Self {
        self.lock().order_failure = Some(error);
        self
    }

    /// Hold every order submission until [`MockShopApi::release_order`] is called
    #[must_use]
    pub fn with_held_orders(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let one held submission complete
    pub fn release_order(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Orders received so far
    #[must_use]
    pub fn submitted(&self) -> Vec<OrderRequest> {
        self.lock().submitted.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ShopApi for MockShopApi {
    fn product_list(&self) -> ApiFuture<'_, Vec<ProductRecord>> {
        let result = self.lock().catalog.clone();
        Box::pin(async move { result })
    }

    fn product(&self, id: ProductId) -> ApiFuture<'_, ProductRecord> {
        let result = self.lock().catalog.clone().and_then(|records| {
            records
                .into_iter()
                .find(|record| record.id == id)
                .ok_or_else(|| ApiError::Status {
                    status: 404,
                    message: "NotFound".into(),
                })
        });
        Box::pin(async move { result })
    }

    fn submit_order(&self, order: OrderRequest) -> ApiFuture<'_, OrderConfirmation> {
        Box::pin(async move {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }

            let mut inner = self.lock();
            inner.submitted.push(order.clone());
            if let Some(error) = inner.order_failure.clone() {
                return Err(error);
            }
            Ok(OrderConfirmation {
                id: format!("order-{}", inner.submitted.len()),
                total: order.total,
            })
        })
    }
}
