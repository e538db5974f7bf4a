use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::resource::Resource;
use crate::targets;
use crate::{
    ApiError, Category, DashboardMetrics, FinancialSummary, InventoryValueReport, Location,
    LowStockItem, Printer, RecordId, ReferenceKind, ReferenceOption,
};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// List/create/update/delete against one REST collection.
///
/// Implementations never touch local view state.
pub trait CollectionClient<R: Resource>: Send + Sync {
    fn list(&self) -> ApiFuture<'_, Vec<R::Record>>;
    fn create(&self, payload: R::Payload) -> ApiFuture<'_, R::Record>;
    fn update(&self, id: RecordId, payload: R::Payload) -> ApiFuture<'_, R::Record>;
    fn delete(&self, id: RecordId) -> ApiFuture<'_, ()>;
}

pub trait ReferenceSource: Send + Sync {
    fn options(&self, kind: ReferenceKind) -> ApiFuture<'_, Vec<ReferenceOption>>;
}

/// Read-only dashboard and report endpoints.
pub trait InsightSource: Send + Sync {
    fn dashboard_metrics(&self) -> ApiFuture<'_, DashboardMetrics>;
    fn financial_summary(&self) -> ApiFuture<'_, FinancialSummary>;
    fn low_stock(&self) -> ApiFuture<'_, Vec<LowStockItem>>;
    fn inventory_value(&self) -> ApiFuture<'_, InventoryValueReport>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| ApiError::Network {
                endpoint: base_url.clone(),
                details: error.to_string(),
            })?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Send,
    {
        let endpoint = endpoint_label(&Method::GET, path);
        let response = self
            .dispatch(self.http.get(self.url(path)), &endpoint)
            .await?;
        decode_body(response, &endpoint).await
    }

    pub async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned + Send,
    {
        let endpoint = endpoint_label(&method, path);
        let builder = self.http.request(method, self.url(path)).json(body);
        let response = self.dispatch(builder, &endpoint).await?;
        decode_body(response, &endpoint).await
    }

    pub async fn send_empty(&self, method: Method, path: &str) -> Result<(), ApiError> {
        let endpoint = endpoint_label(&method, path);
        let builder = self.http.request(method, self.url(path));
        self.dispatch(builder, &endpoint).await.map(|_| ())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn dispatch(
        &self,
        builder: reqwest::RequestBuilder,
        endpoint: &str,
    ) -> Result<reqwest::Response, ApiError> {
        debug!(target: targets::HTTP, endpoint, base_url = %self.base_url, "HTTP request");

        let response = builder.send().await.map_err(|error| {
            warn!(target: targets::HTTP, endpoint, error = %error, "HTTP transport failure");
            ApiError::Network {
                endpoint: endpoint.to_string(),
                details: error.to_string(),
            }
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(target: targets::HTTP, endpoint, status = status.as_u16(), "HTTP ok");
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = classify_failure(endpoint, status.as_u16(), &body);
        warn!(
            target: targets::HTTP,
            endpoint,
            status = status.as_u16(),
            "{}",
            error.technical_detail()
        );
        Err(error)
    }
}

pub fn collection_path(resource: &str) -> String {
    format!("/api/{resource}")
}

pub fn item_path(resource: &str, id: RecordId) -> String {
    format!("/api/{resource}/{id}")
}

fn endpoint_label(method: &Method, path: &str) -> String {
    format!("{method} {path}")
}

async fn decode_body<T>(response: reqwest::Response, endpoint: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let bytes = response.bytes().await.map_err(|error| ApiError::Network {
        endpoint: endpoint.to_string(),
        details: error.to_string(),
    })?;
    serde_json::from_slice(&bytes).map_err(|error| {
        warn!(target: targets::HTTP, endpoint, error = %error, "HTTP body decode failed");
        ApiError::Decode {
            endpoint: endpoint.to_string(),
            details: error.to_string(),
        }
    })
}

/// Maps a non-2xx response onto the error taxonomy.
pub fn classify_failure(endpoint: &str, status: u16, body: &str) -> ApiError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| extract_detail(&value));
    let endpoint = endpoint.to_string();

    match (status, detail) {
        (404, detail) => ApiError::NotFound { endpoint, detail },
        (status, Some(detail)) => ApiError::Validation {
            endpoint,
            status,
            detail,
        },
        (status, None) => ApiError::UnknownServer { endpoint, status },
    }
}

fn extract_detail(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        // Framework validation errors: [{ "loc": [...], "msg": "...", ... }]
        Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

impl<R: Resource> CollectionClient<R> for RestClient {
    fn list(&self) -> ApiFuture<'_, Vec<R::Record>> {
        Box::pin(async move { self.get_json(&collection_path(R::PATH)).await })
    }

    fn create(&self, payload: R::Payload) -> ApiFuture<'_, R::Record> {
        Box::pin(async move {
            self.send_json(Method::POST, &collection_path(R::PATH), &payload)
                .await
        })
    }

    fn update(&self, id: RecordId, payload: R::Payload) -> ApiFuture<'_, R::Record> {
        Box::pin(async move {
            self.send_json(Method::PUT, &item_path(R::PATH, id), &payload)
                .await
        })
    }

    fn delete(&self, id: RecordId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.send_empty(Method::DELETE, &item_path(R::PATH, id))
                .await
        })
    }
}

impl ReferenceSource for RestClient {
    fn options(&self, kind: ReferenceKind) -> ApiFuture<'_, Vec<ReferenceOption>> {
        Box::pin(async move {
            let path = collection_path(kind.path());
            let options = match kind {
                ReferenceKind::Categories => {
                    into_options(self.get_json::<Vec<Category>>(&path).await?)
                }
                ReferenceKind::Locations => {
                    into_options(self.get_json::<Vec<Location>>(&path).await?)
                }
                ReferenceKind::Printers => {
                    into_options(self.get_json::<Vec<Printer>>(&path).await?)
                }
            };
            Ok(options)
        })
    }
}

fn into_options<T: Into<ReferenceOption>>(records: Vec<T>) -> Vec<ReferenceOption> {
    records.into_iter().map(Into::into).collect()
}

impl InsightSource for RestClient {
    fn dashboard_metrics(&self) -> ApiFuture<'_, DashboardMetrics> {
        Box::pin(async move { self.get_json("/api/dashboard/metrics").await })
    }

    fn financial_summary(&self) -> ApiFuture<'_, FinancialSummary> {
        Box::pin(async move { self.get_json("/api/financial/summary").await })
    }

    fn low_stock(&self) -> ApiFuture<'_, Vec<LowStockItem>> {
        Box::pin(async move { self.get_json("/api/reports/low-stock").await })
    }

    fn inventory_value(&self) -> ApiFuture<'_, InventoryValueReport> {
        Box::pin(async move { self.get_json("/api/reports/inventory-value").await })
    }
}
