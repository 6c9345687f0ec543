//! Authenticated HTTP client for the tenant REST API
//!
//! This module handles:
//! - OAuth client-credentials tickets, cached until shortly before expiry
//! - Tenant/site/catalog context headers on every call
//! - Mapping non-success responses to [`MigrateError::Api`]
//!
//! The client does no throttling of its own; callers schedule requests
//! through the driver's rate limiter.

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;
use url::Url;

use crate::config::ApiConfig;
use crate::driver::{MigrateError, Page, Result};

/// Tickets are renewed this long before the server-side expiry
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
    grant_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    refresh_at: Instant,
}

/// Client for one tenant's API
///
/// Cheap to clone; clones share the cached access token.
#[derive(Clone)]
pub struct KiboClient {
    http: Client,
    config: Arc<ApiConfig>,
    base_url: Url,
    auth_url: Url,
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl KiboClient {
    /// Validate `config` and build a client for it
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;
        let base_url = config.base_url()?;
        let auth_url = config.auth_url()?;

        let http = Client::builder()
            .user_agent(concat!("migrator/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            base_url,
            auth_url,
            token: Arc::new(Mutex::new(None)),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for `segments`, each percent-encoded as one path segment
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MigrateError::InvalidUrl {
                url: self.base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Bearer token for the next call, fetching a new ticket when needed
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
            debug!("Access token about to expire, refreshing");
        }

        let body = TokenRequest {
            client_id: &self.config.client_id,
            client_secret: &self.config.shared_secret,
            grant_type: "client_credentials",
        };
        let response = self
            .http
            .post(self.auth_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|source| MigrateError::HttpRequest {
                url: self.auth_url.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(MigrateError::Auth {
                message: format!("{} from {}: {}", status.as_u16(), self.auth_url, text),
            });
        }

        let ticket: TokenResponse =
            serde_json::from_str(&text).map_err(|source| MigrateError::Decode {
                url: self.auth_url.to_string(),
                source,
            })?;

        let lifetime = Duration::from_secs(ticket.expires_in).saturating_sub(TOKEN_REFRESH_MARGIN);
        debug!(expires_in = ticket.expires_in, "Obtained access token");

        let value = ticket.access_token;
        *cached = Some(AccessToken {
            value: value.clone(),
            refresh_at: Instant::now() + lifetime,
        });
        Ok(value)
    }

    /// Request with auth and context headers; only configured headers are sent
    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        let config = &self.config;

        let mut builder = self
            .http
            .request(method, url)
            .bearer_auth(token)
            .header("x-vol-tenant", &config.tenant_id);
        if let Some(site) = &config.site_id {
            builder = builder.header("x-vol-site", site);
        }
        if let Some(catalog) = &config.catalog {
            builder = builder.header("x-vol-catalog", catalog);
        }
        if let Some(master) = &config.master_catalog {
            builder = builder.header("x-vol-master-catalog", master);
        }
        Ok(builder)
    }

    /// Send and return the body text of a successful response
    async fn execute(&self, builder: RequestBuilder, url: &Url) -> Result<String> {
        let response = builder
            .send()
            .await
            .map_err(|source| MigrateError::HttpRequest {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| MigrateError::HttpRequest {
                url: url.to_string(),
                source,
            })?;
        debug!(status = status.as_u16(), url = %url, "API response");

        if !status.is_success() {
            return Err(MigrateError::Api {
                status: status.as_u16(),
                url: url.to_string(),
                body: text,
            });
        }
        Ok(text)
    }

    fn decode<T: DeserializeOwned>(url: &Url, text: &str) -> Result<T> {
        serde_json::from_str(text).map_err(|source| MigrateError::Decode {
            url: url.to_string(),
            source,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        mut url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let builder = self.request(Method::GET, url.clone()).await?;
        let text = self.execute(builder, &url).await?;
        Self::decode(&url, &text)
    }

    /// One page of a list endpoint
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        url: Url,
        start_index: u32,
        page_size: u32,
    ) -> Result<Page<T>> {
        self.get_json(
            url,
            &[
                ("startIndex", start_index.to_string()),
                ("pageSize", page_size.to_string()),
            ],
        )
        .await
    }

    pub async fn post_json<B, T>(&self, url: Url, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self.request(Method::POST, url.clone()).await?.json(body);
        let text = self.execute(builder, &url).await?;
        Self::decode(&url, &text)
    }

    /// PUT whose response body is ignored
    pub async fn put_json<B: Serialize + ?Sized>(&self, url: Url, body: &B) -> Result<()> {
        let builder = self.request(Method::PUT, url.clone()).await?.json(body);
        self.execute(builder, &url).await?;
        Ok(())
    }

    pub async fn delete(&self, mut url: Url, query: &[(&str, String)]) -> Result<()> {
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        let builder = self.request(Method::DELETE, url.clone()).await?;
        self.execute(builder, &url).await?;
        Ok(())
    }
}
