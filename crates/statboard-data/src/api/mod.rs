use std::sync::Arc;

use reqwest::{header, StatusCode};
use thiserror::Error;

use crate::config::ApiConfig;
use crate::models::PageResult;
use crate::resource::ResourceKind;

pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Response arrived with a non-success status; the body is not decoded.
    #[error("http status {0}")]
    Http(StatusCode),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Http(status) => Some(*status),
            FetchError::Transport(err) => err.status(),
            FetchError::Decode(_) => None,
        }
    }
}

/// Parameter snapshot for one page request. Built by the controller when a
/// fetch begins, so filter edits made while the request is in flight cannot
/// leak into the URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub resource: ResourceKind,
    pub path: &'static str,
    pub date_from: String,
    pub date_to: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Query pairs in the order the API has always received them:
    /// `dateFrom`, `dateTo` (range resources only), `page`, `limit`, `key`.
    pub fn query_pairs(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(5);
        pairs.push(("dateFrom", self.date_from.clone()));
        if let Some(date_to) = &self.date_to {
            pairs.push(("dateTo", date_to.clone()));
        }
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("key", api_key.to_string()));
        pairs
    }
}

/// Client for the statistics API. Cheap to clone; all controllers of an
/// application share one.
#[derive(Clone)]
pub struct StatsClient {
    inner: reqwest::Client,
    config: Arc<ApiConfig>,
    base_url: String,
}

impl StatsClient {
    pub fn new(config: ApiConfig) -> FetchResult<Self> {
        let base_url = normalize_base_url(&config.base_url);

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let inner = builder.build()?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            base_url,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of one resource. The `key` parameter is appended
    /// here; callers never handle the credential.
    pub async fn fetch_page(&self, request: &PageRequest) -> FetchResult<PageResult> {
        let url = format!("{}{}", self.base_url, request.path);
        let query = request.query_pairs(&self.config.api_key);

        tracing::debug!(
            resource = request.resource.as_str(),
            page = request.page,
            limit = request.limit,
            %url,
            "requesting resource page"
        );

        let response = self
            .inner
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status));
        }

        let bytes = response.bytes().await?;
        let page = PageResult::from_json(&bytes)?;

        tracing::debug!(
            resource = request.resource.as_str(),
            loaded = page.records().len(),
            total_pages = page.total_pages,
            "resource page received"
        );

        Ok(page)
    }
}

fn normalize_base_url(input: &str) -> String {
    input.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_request() -> PageRequest {
        PageRequest {
            resource: ResourceKind::Orders,
            path: "/api/orders",
            date_from: "2024-03-01".to_string(),
            date_to: Some("2024-03-31".to_string()),
            page: 2,
            limit: 25,
        }
    }

    #[test]
    fn query_pairs_keep_the_wire_order() {
        let pairs = orders_request().query_pairs("secret");
        let keys: Vec<_> = pairs.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["dateFrom", "dateTo", "page", "limit", "key"]);
        assert_eq!(pairs[1].1, "2024-03-31");
        assert_eq!(pairs[4].1, "secret");
    }

    #[test]
    fn single_day_requests_omit_date_to() {
        let request = PageRequest {
            resource: ResourceKind::Stocks,
            path: "/api/stocks",
            date_from: "2024-03-15".to_string(),
            date_to: None,
            page: 1,
            limit: 50,
        };
        let pairs = request.query_pairs("secret");
        let keys: Vec<_> = pairs.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys, vec!["dateFrom", "page", "limit", "key"]);
    }

    #[test]
    fn empty_date_to_is_still_sent_for_ranges() {
        let mut request = orders_request();
        request.date_to = Some(String::new());
        let pairs = request.query_pairs("secret");
        assert_eq!(pairs[1], ("dateTo", String::new()));
    }

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(normalize_base_url("http://host:8080/"), "http://host:8080");
        assert_eq!(normalize_base_url("http://host:8080"), "http://host:8080");
        assert_eq!(normalize_base_url("https://a.b//"), "https://a.b");
    }

    #[test]
    fn client_exposes_the_normalized_base_url() {
        let client = StatsClient::new(ApiConfig::new("http://host:8080/", "secret")).unwrap();
        assert_eq!(client.base_url(), "http://host:8080");
    }

    #[test]
    fn http_error_exposes_and_displays_the_status() {
        let err = FetchError::Http(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn decode_error_has_no_status() {
        let decode_err = PageResult::from_json(b"not json").unwrap_err();
        let err = FetchError::from(decode_err);
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("decode error"));
    }
}
