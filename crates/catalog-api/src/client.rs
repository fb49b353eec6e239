//! # Catalog Client
//!
//! The [`CatalogApi`] trait is the seam between controllers and the remote
//! catalog; [`HttpCatalogClient`] is the production implementation.
//!
//! ## Endpoints
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation              Request                          Mapped to       │
//! │  ────────────────────   ──────────────────────────────   ─────────────── │
//! │  list_products          GET /products?limit=&skip=       ProductsResponse│
//! │  get_product            GET /products/{id}               Product         │
//! │  list_categories        GET /products/categories         CategoryLabel[] │
//! │  products_by_category   GET /products/category/{slug}    ProductsResponse│
//! │                                                                         │
//! │  Every request: same timeout (connect + whole request), JSON body,     │
//! │  non-2xx ──► CatalogError::Server, no response ──► Network,            │
//! │  anything else ──► Request                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::{Duration, Instant};

use catalog_core::mapper::{
    map_category_labels, map_product, map_products_response, ApiProduct, ApiProductsResponse,
};
use catalog_core::{CategoryLabel, Product, ProductId, ProductsResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ApiSettings;
use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// Catalog Trait
// =============================================================================

/// The complete catalog interface used by the controllers.
///
/// Implementations:
/// - **HTTP**: [`HttpCatalogClient`]
/// - **Mock** (tests, feature `mock`): `MockCatalog` with canned responses
#[allow(async_fn_in_trait)]
pub trait CatalogApi {
    /// One page of the unfiltered listing.
    async fn list_products(&self, limit: u32, skip: u32) -> CatalogResult<ProductsResponse>;

    /// A single product by id.
    async fn get_product(&self, id: ProductId) -> CatalogResult<Product>;

    /// Category slugs with their display labels, in API order.
    ///
    /// A payload that is not an array maps to an empty list, not an error.
    async fn list_categories(&self) -> CatalogResult<Vec<CategoryLabel>>;

    /// Products of one category, addressed by slug.
    async fn products_by_category(&self, slug: &str) -> CatalogResult<ProductsResponse>;
}

// =============================================================================
// HTTP Client
// =============================================================================

/// reqwest-backed catalog client.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Builds a client from API settings.
    pub fn new(settings: &ApiSettings) -> CatalogResult<Self> {
        let timeout = Duration::from_secs(settings.timeout_secs);

        let mut builder = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout);
        if let Some(ref user_agent) = settings.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let http = builder
            .build()
            .map_err(|e| CatalogError::Config(e.to_string()))?;

        debug!(
            base_url = %settings.base_url,
            timeout_secs = settings.timeout_secs,
            "building catalog HTTP client"
        );

        Ok(HttpCatalogClient {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GETs `path` and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> CatalogResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();
        debug!(%url, "GET");

        let response = self.http.get(&url).send().await.map_err(|e| {
            warn!(%url, error = %e, "catalog request failed");
            CatalogError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "catalog responded with error status");
            return Err(CatalogError::from_status(status));
        }

        let body = response.bytes().await?;
        let decoded = serde_json::from_slice(&body)?;

        debug!(
            %url,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            bytes = body.len(),
            "GET complete"
        );
        Ok(decoded)
    }
}

impl CatalogApi for HttpCatalogClient {
    async fn list_products(&self, limit: u32, skip: u32) -> CatalogResult<ProductsResponse> {
        let page: ApiProductsResponse = self
            .get_json(&format!("/products?limit={}&skip={}", limit, skip))
            .await?;
        Ok(map_products_response(page))
    }

    async fn get_product(&self, id: ProductId) -> CatalogResult<Product> {
        let product: ApiProduct = self.get_json(&format!("/products/{}", id)).await?;
        Ok(map_product(product))
    }

    async fn list_categories(&self) -> CatalogResult<Vec<CategoryLabel>> {
        let raw: Value = self.get_json("/products/categories").await?;
        if !raw.is_array() {
            warn!(payload = %raw, "Categories API returned non-array data");
        }
        Ok(map_category_labels(&raw))
    }

    async fn products_by_category(&self, slug: &str) -> CatalogResult<ProductsResponse> {
        let path = format!("/products/category/{}", urlencoding::encode(slug));
        let page: ApiProductsResponse = self.get_json(&path).await?;
        Ok(map_products_response(page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn client_for(url: String) -> HttpCatalogClient {
        HttpCatalogClient::new(&ApiSettings {
            base_url: url,
            timeout_secs: 2,
            user_agent: Some("catalog-browser-tests".to_string()),
        })
        .unwrap()
    }

    fn page_body() -> String {
        json!({
            "products": [
                {
                    "id": 1,
                    "title": "Essence Mascara Lash Princess",
                    "description": "Volumising mascara.",
                    "price": 9.99,
                    "discountPercentage": 7.17,
                    "rating": 4.94,
                    "stock": 5,
                    "brand": "Essence",
                    "category": "beauty",
                    "thumbnail": "https://cdn.example.com/1/thumbnail.png",
                    "images": []
                }
            ],
            "total": 194,
            "skip": 0,
            "limit": 1
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_list_products_sends_paging_and_maps_page() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/products")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("limit".into(), "20".into()),
                Matcher::UrlEncoded("skip".into(), "0".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body())
            .create_async()
            .await;

        let client = client_for(server.url());
        let page = client.list_products(20, 0).await.expect("page should load");

        mock.assert_async().await;
        assert_eq!(page.total, 194);
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.products[0].brand, "Essence");
    }

    #[tokio::test]
    async fn test_get_product_maps_single_product() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/products/5")
            .with_status(200)
            .with_body(
                json!({ "id": 5, "title": "Red Lipstick", "price": 12.99, "rating": 4.5,
                        "stock": 3, "brand": "Chic", "category": "beauty",
                        "thumbnail": "t.png", "description": "Red." })
                .to_string(),
            )
            .create_async()
            .await;

        let product = client_for(server.url()).get_product(5).await.unwrap();

        mock.assert_async().await;
        assert_eq!(product.id, 5);
        assert_eq!(product.title, "Red Lipstick");
    }

    #[tokio::test]
    async fn test_non_2xx_is_server_error_with_status_text() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/products/9999")
            .with_status(404)
            .with_body(r#"{"message":"Product with id '9999' not found"}"#)
            .create_async()
            .await;

        let err = client_for(server.url()).get_product(9999).await.unwrap_err();

        assert_eq!(
            err,
            CatalogError::Server {
                status: 404,
                status_text: "Not Found".to_string()
            }
        );
        assert_eq!(err.to_string(), "API Error: 404 - Not Found");
    }

    #[tokio::test]
    async fn test_invalid_body_is_request_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/products/1")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = client_for(server.url()).get_product(1).await.unwrap_err();

        assert!(matches!(err, CatalogError::Request(_)));
        assert!(err.to_string().starts_with("Request error: "));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Nothing listens on port 1
        let client = client_for("http://127.0.0.1:1".to_string());
        let err = client.list_products(20, 0).await.unwrap_err();

        assert_eq!(err, CatalogError::Network);
        assert_eq!(
            err.to_string(),
            "Network error: Unable to connect to the server"
        );
    }

    /// Serves every connection with `reply`, after reading the request.
    /// `None` holds the connection open without answering.
    async fn raw_server(reply: Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        tokio::spawn(async move {
            let mut held: Vec<TcpStream> = Vec::new();
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                match reply {
                    Some(reply) => {
                        let _ = socket.write_all(reply.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    None => held.push(socket),
                }
            }
        });

        url
    }

    #[tokio::test]
    async fn test_silent_server_times_out_as_network_error() {
        let url = raw_server(None).await;
        let client = HttpCatalogClient::new(&ApiSettings {
            base_url: url,
            timeout_secs: 1,
            user_agent: None,
        })
        .unwrap();

        let err = client.get_product(1).await.unwrap_err();

        assert_eq!(err, CatalogError::Network);
        assert_eq!(
            err.to_string(),
            "Network error: Unable to connect to the server"
        );
    }

    #[tokio::test]
    async fn test_truncated_body_is_request_error() {
        let url = raw_server(Some(
            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 100\r\nconnection: close\r\n\r\n{\"id\": 1",
        ))
        .await;

        let err = client_for(url).get_product(1).await.unwrap_err();

        assert!(matches!(err, CatalogError::Request(_)));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_categories_are_mapped_and_non_arrays_degrade() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/products/categories")
            .with_status(200)
            .with_body(r#"["beauty-products", "", null, "home-decor"]"#)
            .create_async()
            .await;

        let categories = client_for(server.url()).list_categories().await.unwrap();
        let labels: Vec<_> = categories.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Beauty products", "Home decor"]);
        assert_eq!(categories[0].slug, "beauty-products");

        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/products/categories")
            .with_status(200)
            .with_body(r#"{"error":"unexpected"}"#)
            .create_async()
            .await;

        let categories = client_for(server.url()).list_categories().await.unwrap();
        assert!(categories.is_empty());
    }

    #[tokio::test]
    async fn test_category_slug_is_percent_encoded() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/products/category/home%20decor")
            .with_status(200)
            .with_body(r#"{"products":[],"total":0,"skip":0,"limit":0}"#)
            .create_async()
            .await;

        let page = client_for(format!("{}/", server.url()))
            .products_by_category("home decor")
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(page.products.is_empty());
    }
}
