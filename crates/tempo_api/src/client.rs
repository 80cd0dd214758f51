use std::sync::{Arc, PoisonError, RwLock};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client as HttpClient, Method, Response};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::TempoConfig;
use crate::error::{Result, TempoError};
use crate::models::{ApiResult, WorklogQuery, WorklogRequest, WorklogUpdate};
use crate::rate_limiter::RateLimiter;

const JSON_MIME: &str = "application/json";

/// Rate-limited Tempo REST client.
///
/// Cloning is cheap and every clone shares the connection pool, the limiter
/// and the open/closed state.
#[derive(Clone)]
pub struct TempoClient {
    http: Arc<RwLock<Option<HttpClient>>>,
    config: TempoConfig,
    limiter: RateLimiter,
}

impl TempoClient {
    pub fn new(config: TempoConfig) -> Result<Self> {
        let limiter = RateLimiter::new(config.cooldown);
        Self::new_with_limiter(config, limiter)
    }

    pub fn new_with_limiter(config: TempoConfig, limiter: RateLimiter) -> Result<Self> {
        config.validate()?;
        let http = build_http_client(&config)?;
        Ok(Self {
            http: Arc::new(RwLock::new(Some(http))),
            config,
            limiter,
        })
    }

    pub fn config(&self) -> &TempoConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Releases the connection pool once in-flight requests complete. Every call
    /// started after this fails with [`TempoError::Closed`].
    ///
    /// Requests already past the closed check hold their own pool handle and run
    /// to completion. Closing an already closed client is a no-op.
    pub fn close(&self) {
        let released = self
            .http
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if released.is_some() {
            tracing::info!("Tempo client closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    fn http(&self) -> Result<HttpClient> {
        self.http
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(TempoError::Closed)
    }

    pub async fn get(&self, path: &str) -> Result<ApiResult> {
        self.send(Method::GET, path, &[], Option::<&Value>::None).await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<ApiResult> {
        self.send(Method::GET, path, query, Option::<&Value>::None).await
    }

    pub async fn post<B>(&self, path: &str, body: &B) -> Result<ApiResult>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, path, &[], Some(body)).await
    }

    pub async fn put<B>(&self, path: &str, body: &B) -> Result<ApiResult>
    where
        B: Serialize + ?Sized,
    {
        self.send(Method::PUT, path, &[], Some(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResult> {
        self.send(Method::DELETE, path, &[], Option::<&Value>::None).await
    }

    /// Issues one rate-limited request and decodes the JSON body.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<ApiResult>
    where
        B: Serialize + ?Sized,
    {
        let http = self.http()?;
        self.limiter.acquire().await;

        let url = self.config.endpoint(path);
        tracing::debug!(%method, %url, ?query, "sending Tempo request");

        let mut request = http.request(method.clone(), &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(payload) = body {
            request = request.json(payload);
        }

        let response = request.send().await.map_err(|err| {
            let err = TempoError::from(err);
            tracing::error!(%method, %url, "request failed: {err}");
            err
        })?;
        Self::parse_json(response).await
    }

    async fn parse_json(response: Response) -> Result<ApiResult> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Object(Map::new()));
            }
            serde_json::from_slice(&bytes).map_err(TempoError::from)
        } else {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), %body, "Tempo API returned an error");
            Err(TempoError::from_status(status, body))
        }
    }

    pub async fn list_worklogs(&self, query: &WorklogQuery) -> Result<ApiResult> {
        self.get_with_query("worklogs", &query.to_query_pairs()).await
    }

    pub async fn create_worklog(&self, request: &WorklogRequest) -> Result<ApiResult> {
        request.validate()?;
        self.post("worklogs", request).await
    }

    pub async fn update_worklog(&self, worklog_id: i64, update: &WorklogUpdate) -> Result<ApiResult> {
        update.validate()?;
        let path = format!("worklogs/{}", worklog_id);
        self.put(&path, update).await
    }

    pub async fn delete_worklog(&self, worklog_id: i64) -> Result<ApiResult> {
        let path = format!("worklogs/{}", worklog_id);
        self.delete(&path).await
    }

    pub async fn list_accounts(&self) -> Result<ApiResult> {
        self.get("accounts").await
    }

    pub async fn list_work_attributes(&self) -> Result<ApiResult> {
        self.get("work-attributes").await
    }
}

fn build_http_client(config: &TempoConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let mut auth_value = header_value(format!("Bearer {}", config.token))?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .build()
        .map_err(|err| TempoError::Configuration(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| TempoError::Configuration(err.to_string()))
}
