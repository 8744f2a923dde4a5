// src/services/remote.rs

//! Remote school source.
//!
//! Consumes the SchoolNet REST API:
//!
//! | Request                  | Response envelope                 |
//! |--------------------------|-----------------------------------|
//! | `GET  /schools`          | `{ data: { schools: [..] } }`     |
//! | `GET  /schools/{id}`     | `{ data: { school: {..} } }`      |
//! | `POST /schools/filter`   | `{ data: [..] }`                  |
//!
//! A missing envelope member is reported as a malformed response.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, header};
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, RemoteFilterCriteria, SchoolRecord};
use crate::utils::http::{body_excerpt, create_async_client};

/// Source of school records.
#[async_trait]
pub trait SchoolSource: Send + Sync {
    /// Fetch the full collection.
    async fn fetch_all(&self) -> Result<Vec<SchoolRecord>>;

    /// Fetch a single record.
    async fn fetch_by_id(&self, id: &str) -> Result<SchoolRecord>;

    /// Server-side filtering.
    async fn filter(&self, criteria: &RemoteFilterCriteria) -> Result<Vec<SchoolRecord>>;
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct SchoolsData {
    schools: Option<Vec<SchoolRecord>>,
}

#[derive(Deserialize)]
struct SchoolData {
    school: Option<SchoolRecord>,
}

/// Parse a `GET /schools` body.
pub fn parse_school_list(body: &str) -> Result<Vec<SchoolRecord>> {
    let envelope: Envelope<SchoolsData> = serde_json::from_str(body)?;
    envelope
        .data
        .and_then(|d| d.schools)
        .ok_or_else(|| AppError::malformed(format!("missing data.schools in {}", body_excerpt(body))))
}

/// Parse a `GET /schools/{id}` body.
pub fn parse_school(body: &str) -> Result<SchoolRecord> {
    let envelope: Envelope<SchoolData> = serde_json::from_str(body)?;
    envelope
        .data
        .and_then(|d| d.school)
        .ok_or_else(|| AppError::malformed(format!("missing data.school in {}", body_excerpt(body))))
}

/// Parse a `POST /schools/filter` body.
pub fn parse_filter_result(body: &str) -> Result<Vec<SchoolRecord>> {
    let envelope: Envelope<Vec<SchoolRecord>> = serde_json::from_str(body)?;
    envelope
        .data
        .ok_or_else(|| AppError::malformed(format!("missing data in {}", body_excerpt(body))))
}

/// HTTP implementation of [`SchoolSource`].
#[derive(Debug, Clone)]
pub struct HttpSchoolSource {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpSchoolSource {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Build a source with a client configured from `config`.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = create_async_client(config)?;
        Ok(Self::new(client, config.base_url()?))
    }

    /// Attach a bearer token to every request. `None` sends no header.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Base URL plus escaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::config(format!("base URL {} cannot have a path", self.base_url)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send and return the body of a 2xx response.
    async fn send(&self, builder: RequestBuilder) -> Result<String> {
        let response = builder.send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl SchoolSource for HttpSchoolSource {
    async fn fetch_all(&self) -> Result<Vec<SchoolRecord>> {
        let url = self.endpoint(&["schools"])?;
        log::debug!("GET {}", url);
        let body = self.send(self.request(Method::GET, url)).await?;
        parse_school_list(&body)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<SchoolRecord> {
        let url = self.endpoint(&["schools", id])?;
        log::debug!("GET {}", url);
        let body = self.send(self.request(Method::GET, url)).await?;
        parse_school(&body)
    }

    async fn filter(&self, criteria: &RemoteFilterCriteria) -> Result<Vec<SchoolRecord>> {
        let url = self.endpoint(&["schools", "filter"])?;
        log::debug!("POST {}", url);
        let payload = serde_json::to_vec(criteria)?;
        let builder = self
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(payload);
        let body = self.send(builder).await?;
        parse_filter_result(&body)
    }
}
