//! NASA ADS REST API client.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::config::ApiConfig;
use crate::models::{FetchPage, Library, PivotField};
use crate::sources::{PageSource, Resource, SourceError};
use crate::utils::HttpClient;

/// Production API base
pub const ADS_API_BASE: &str = "https://api.adsabs.harvard.edu/v1";

/// Largest `rows` value the search endpoint honours
pub const MAX_SEARCH_ROWS: usize = 2000;

/// Largest bibcode list the metrics endpoint accepts
pub const MAX_METRICS_BIBCODES: usize = 2000;

/// Page size used when paging through a private library
pub const LIBRARY_PAGE_SIZE: usize = 25;

/// Search fields needed to build a [`Record`](crate::models::Record)
pub const RECORD_FIELDS: &str = "bibcode,year,pubdate,property,citation_count,read_count";

/// One page of search results
#[derive(Debug, Clone)]
pub struct SearchPage {
    /// Total matches declared by the server
    pub num_found: usize,

    /// Raw documents on this page
    pub docs: Vec<Value>,
}

/// ADS API client
///
/// Holds an authenticated HTTP client and the endpoint it was configured with.
#[derive(Debug, Clone)]
pub struct AdsClient {
    http: HttpClient,
    base: Url,
}

impl AdsClient {
    /// Create a client from an explicit configuration
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        let http = HttpClient::new(config)?;
        let base = parse_base(&config.endpoint)?;
        Ok(Self { http, base })
    }

    /// Build request URL
    fn build_url(&self, endpoint: &str) -> Result<Url, SourceError> {
        Ok(self.base.join(endpoint.trim_start_matches('/'))?)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let url = self.build_url(endpoint)?;
        tracing::debug!("GET {} {:?}", url, params);

        let response = self
            .http
            .client()
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to reach ADS: {}", e)))?;

        decode(response).await
    }

    /// Fetch one page of search results
    pub async fn search_page(
        &self,
        query: &str,
        fields: &str,
        sort: Option<&str>,
        start: usize,
        rows: usize,
    ) -> Result<SearchPage, SourceError> {
        let mut params = vec![
            ("q", query.to_string()),
            ("fl", fields.to_string()),
            ("start", start.to_string()),
            ("rows", rows.to_string()),
        ];
        if let Some(sort) = sort {
            params.push(("sort", sort.to_string()));
        }

        let data: SearchEnvelope = self.get_json("search/query", &params).await?;
        Ok(SearchPage {
            num_found: data.response.num_found,
            docs: data.response.docs,
        })
    }

    /// Number of documents matching a query
    pub async fn count(&self, query: &str) -> Result<usize, SourceError> {
        let page = self.search_page(query, "bibcode", None, 0, 0).await?;
        Ok(page.num_found)
    }

    /// Fetch the `property,<field>` facet pivot entries for a query
    pub async fn facet_pivot(
        &self,
        query: &str,
        field: PivotField,
    ) -> Result<Vec<Value>, SourceError> {
        let key = field.pivot_key();
        let params = vec![
            ("q", query.to_string()),
            ("facet", "true".to_string()),
            ("facet.mincount", "1".to_string()),
            ("facet.limit", "-1".to_string()),
            ("facet.pivot", key.clone()),
            ("sort", field.sort().to_string()),
            ("rows", "0".to_string()),
        ];

        let mut data: SearchEnvelope = self.get_json("search/query", &params).await?;
        let entries = data
            .facet_counts
            .as_mut()
            .and_then(|f| f.facet_pivot.remove(&key))
            .ok_or_else(|| SourceError::Parse(format!("facet_pivot '{}' missing", key)))?;

        match entries {
            Value::Array(items) => Ok(items),
            other => Err(SourceError::Parse(format!(
                "facet_pivot '{}' is not a list: {}",
                key, other
            ))),
        }
    }

    /// Request the full metrics document for a set of bibcodes
    pub async fn metrics(&self, bibcodes: &[String]) -> Result<Value, SourceError> {
        let url = self.build_url("metrics")?;
        tracing::debug!("POST {} ({} bibcodes)", url, bibcodes.len());

        let response = self
            .http
            .client()
            .post(url)
            .json(&json!({ "bibcodes": bibcodes }))
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("Failed to reach ADS: {}", e)))?;

        decode(response).await
    }

    /// List the user's private libraries
    pub async fn libraries(&self) -> Result<Vec<Library>, SourceError> {
        let data: LibrariesEnvelope = self.get_json("biblib/libraries", &[]).await?;
        Ok(data.libraries)
    }

    /// Fetch one page of a library's bibcodes
    pub async fn library_page(
        &self,
        library_id: &str,
        start: usize,
        rows: usize,
    ) -> Result<Vec<Value>, SourceError> {
        let endpoint = format!("biblib/libraries/{}", library_id);
        let params = [("start", start.to_string()), ("rows", rows.to_string())];
        let data: LibraryDocuments = self.get_json(&endpoint, &params).await?;
        Ok(data.documents)
    }
}

#[async_trait]
impl PageSource for AdsClient {
    fn max_page_size(&self) -> usize {
        MAX_SEARCH_ROWS
    }

    async fn fetch_page(
        &self,
        resource: &Resource,
        page: FetchPage,
    ) -> Result<Vec<Value>, SourceError> {
        match resource {
            Resource::Search {
                query,
                fields,
                sort,
            } => Ok(self
                .search_page(query, fields, sort.as_deref(), page.start, page.rows)
                .await?
                .docs),
            Resource::Library(id) => self.library_page(id, page.start, page.rows).await,
        }
    }
}

/// Map a response to either its decoded body or a [`SourceError`]
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    let status = response.status();
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(SourceError::RateLimit);
    }

    let body = response
        .text()
        .await
        .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

    if !status.is_success() {
        return Err(SourceError::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| SourceError::Parse(format!("Unexpected response shape: {}", e)))
}

/// Parse the endpoint, making sure relative joins keep its last path segment
fn parse_base(endpoint: &str) -> Result<Url, SourceError> {
    let mut base = endpoint.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}

// ===== ADS API Types =====

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    response: SearchBody,
    #[serde(default)]
    facet_counts: Option<FacetCounts>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(rename = "numFound")]
    num_found: usize,
    #[serde(default)]
    docs: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct FacetCounts {
    #[serde(default)]
    facet_pivot: serde_json::Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct LibrariesEnvelope {
    libraries: Vec<Library>,
}

#[derive(Debug, Deserialize)]
struct LibraryDocuments {
    documents: Vec<Value>,
}
