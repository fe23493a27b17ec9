//! HTTP client for the backend's REST, storage and auth-admin endpoints.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder, StatusCode, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::config::BackendConfig;
use crate::error::{DataError, Result};
use crate::model::{AuthUser, StoredObject};
use crate::query::Query;

const REST_PATH: &str = "rest/v1";
const STORAGE_PATH: &str = "storage/v1/object";
const AUTH_ADMIN_PATH: &str = "auth/v1/admin/users";

/// Cheaply cloneable handle to the backend.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    base: Url,
    bucket: String,
    http: reqwest::Client,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base", &self.inner.base.as_str())
            .field("bucket", &self.inner.bucket)
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Build a client from a validated configuration.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert("apikey", header::HeaderValue::from_str(&config.api_key)?);
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        // A trailing slash keeps any path prefix of the base URL when joining.
        let base = Url::parse(&format!("{}/", config.url.trim_end_matches('/')))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                base,
                bucket: config.storage_bucket.clone(),
                http,
            }),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.inner.bucket
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base.join(path)?)
    }

    /// URL of an object inside the bucket; each path segment is escaped.
    fn object_url(&self, object_path: &str) -> Result<Url> {
        let mut url = self.endpoint(&format!("{STORAGE_PATH}/"))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| DataError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            segments.pop_if_empty().push(&self.inner.bucket);
            segments.extend(object_path.split('/').filter(|s| !s.is_empty()));
        }
        Ok(url)
    }

    /// URL of one auth user; the id is pushed as a single escaped segment.
    fn user_url(&self, id: &str) -> Result<Url> {
        let mut url = self.endpoint(AUTH_ADMIN_PATH)?;
        url.path_segments_mut()
            .map_err(|()| DataError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "backend request");
        self.inner.http.request(method, url)
    }

    async fn send(request: RequestBuilder) -> Result<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let error = status_error(status, &body);
        warn!(status = status.as_u16(), %error, "backend request failed");
        Err(error)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T> {
        let response = Self::send(request).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    // ---- rows ----

    /// Rows matching `query`.
    pub async fn select<T: DeserializeOwned>(&self, query: &Query) -> Result<Vec<T>> {
        let url = self.endpoint(&format!("{REST_PATH}/{}", query.table_name()))?;
        let request = self.request(Method::GET, url).query(&query.to_params());
        Self::send_json(request).await
    }

    /// Insert one row into `query`'s table and return what the backend
    /// stored, shaped by the query's `select`.
    pub async fn insert<B, T>(&self, query: &Query, row: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(&format!("{REST_PATH}/{}", query.table_name()))?;
        let request = self
            .request(Method::POST, url)
            .query(&query.to_params())
            .header("Prefer", "return=representation")
            .json(row);
        Self::send_json(request).await
    }

    /// Patch every row matching `query`; returns the updated rows.
    pub async fn update<B, T>(&self, query: &Query, patch: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(&format!("{REST_PATH}/{}", query.table_name()))?;
        let request = self
            .request(Method::PATCH, url)
            .query(&query.to_params())
            .header("Prefer", "return=representation")
            .json(patch);
        Self::send_json(request).await
    }

    // ---- storage ----

    /// Store `bytes` at `object_path`, replacing any existing object.
    pub async fn upload(&self, object_path: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let url = self.object_url(object_path)?;
        let request = self
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes);
        Self::send(request).await?;
        Ok(())
    }

    /// Objects directly under `prefix`.
    pub async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        let url = self.endpoint(&format!("{STORAGE_PATH}/list/{}", self.inner.bucket))?;
        let body = json!({
            "prefix": prefix,
            "limit": 100,
            "offset": 0,
            "sortBy": { "column": "name", "order": "asc" },
        });
        Self::send_json(self.request(Method::POST, url).json(&body)).await
    }

    pub async fn download(&self, object_path: &str) -> Result<Vec<u8>> {
        let url = self.object_url(object_path)?;
        let response = Self::send(self.request(Method::GET, url)).await?;
        Ok(response.bytes().await?.to_vec())
    }

    pub async fn remove(&self, object_paths: &[String]) -> Result<()> {
        let url = self.endpoint(&format!("{STORAGE_PATH}/{}", self.inner.bucket))?;
        let body = json!({ "prefixes": object_paths });
        Self::send(self.request(Method::DELETE, url).json(&body)).await?;
        Ok(())
    }

    // ---- auth admin ----

    pub async fn user_by_id(&self, id: &str) -> Result<AuthUser> {
        let url = self.user_url(id)?;
        Self::send_json(self.request(Method::GET, url)).await
    }

    pub async fn list_users(&self) -> Result<Vec<AuthUser>> {
        #[derive(serde::Deserialize)]
        struct UserPage {
            #[serde(default)]
            users: Vec<AuthUser>,
        }

        let url = self.endpoint(AUTH_ADMIN_PATH)?;
        let page: UserPage = Self::send_json(self.request(Method::GET, url)).await?;
        Ok(page.users)
    }
}

/// Turn an error answer into `DataError::Status`, picking the message out of
/// the JSON body when there is one.
fn status_error(status: StatusCode, body: &str) -> DataError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|key| value.get(key).and_then(Value::as_str).map(String::from))
        })
        .unwrap_or_else(|| body.trim().to_string());

    DataError::Status {
        status: status.as_u16(),
        message,
    }
}
