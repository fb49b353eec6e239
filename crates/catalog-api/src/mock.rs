//! Canned in-memory catalog for controller tests.
//!
//! Each endpoint answers with whatever was configured last, after an
//! optional simulated latency. Responses can be swapped while a controller
//! holds the mock, which is how retry scenarios are staged.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use catalog_core::{CategoryLabel, Product, ProductId, ProductsResponse};

use crate::client::CatalogApi;
use crate::error::{CatalogError, CatalogResult};

/// One request the mock received.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MockCall {
    Products { limit: u32, skip: u32 },
    Product(ProductId),
    Categories,
    Category(String),
}

/// Which endpoint a latency applies to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MockEndpoint {
    Products,
    Product(ProductId),
    Categories,
    Category(String),
}

#[derive(Debug, Default)]
struct MockResponses {
    products: Option<CatalogResult<ProductsResponse>>,
    categories: Option<CatalogResult<Vec<CategoryLabel>>>,
    by_id: HashMap<ProductId, CatalogResult<Product>>,
    by_category: HashMap<String, CatalogResult<ProductsResponse>>,
    latency: HashMap<MockEndpoint, Duration>,
}

/// Catalog stub with canned per-endpoint results.
///
/// Unconfigured endpoints answer with an empty page / empty category list,
/// and unknown product ids with a 404.
#[derive(Debug, Default)]
pub struct MockCatalog {
    responses: Mutex<MockResponses>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(self, result: CatalogResult<ProductsResponse>) -> Self {
        self.set_products(result);
        self
    }

    pub fn with_categories(self, result: CatalogResult<Vec<CategoryLabel>>) -> Self {
        self.set_categories(result);
        self
    }

    pub fn with_product(self, id: ProductId, result: CatalogResult<Product>) -> Self {
        self.set_product(id, result);
        self
    }

    pub fn with_category(self, slug: &str, result: CatalogResult<ProductsResponse>) -> Self {
        self.set_category(slug, result);
        self
    }

    pub fn with_latency(self, endpoint: MockEndpoint, latency: Duration) -> Self {
        self.lock().latency.insert(endpoint, latency);
        self
    }

    pub fn set_products(&self, result: CatalogResult<ProductsResponse>) {
        self.lock().products = Some(result);
    }

    pub fn set_categories(&self, result: CatalogResult<Vec<CategoryLabel>>) {
        self.lock().categories = Some(result);
    }

    pub fn set_product(&self, id: ProductId, result: CatalogResult<Product>) {
        self.lock().by_id.insert(id, result);
    }

    pub fn set_category(&self, slug: &str, result: CatalogResult<ProductsResponse>) {
        self.lock().by_category.insert(slug.to_string(), result);
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockResponses> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&self, call: MockCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(call);
    }

    async fn respond<T>(&self, endpoint: MockEndpoint, result: CatalogResult<T>) -> CatalogResult<T> {
        let latency = self.lock().latency.get(&endpoint).copied();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        result
    }
}

impl CatalogApi for MockCatalog {
    async fn list_products(&self, limit: u32, skip: u32) -> CatalogResult<ProductsResponse> {
        self.record(MockCall::Products { limit, skip });
        let result = self
            .lock()
            .products
            .clone()
            .unwrap_or_else(|| Ok(ProductsResponse::default()));
        self.respond(MockEndpoint::Products, result).await
    }

    async fn get_product(&self, id: ProductId) -> CatalogResult<Product> {
        self.record(MockCall::Product(id));
        let result = self.lock().by_id.get(&id).cloned().unwrap_or_else(|| {
            Err(CatalogError::Server {
                status: 404,
                status_text: "Not Found".to_string(),
            })
        });
        self.respond(MockEndpoint::Product(id), result).await
    }

    async fn list_categories(&self) -> CatalogResult<Vec<CategoryLabel>> {
        self.record(MockCall::Categories);
        let result = self
            .lock()
            .categories
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()));
        self.respond(MockEndpoint::Categories, result).await
    }

    async fn products_by_category(&self, slug: &str) -> CatalogResult<ProductsResponse> {
        self.record(MockCall::Category(slug.to_string()));
        let result = self
            .lock()
            .by_category
            .get(slug)
            .cloned()
            .unwrap_or_else(|| Ok(ProductsResponse::default()));
        self.respond(MockEndpoint::Category(slug.to_string()), result)
            .await
    }
}
