//! Transport adapter: base-URL resolution, status checking and JSON decoding

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::error::{Result, SwitchControlError};
use crate::io::{HttpClient, HttpResponse};

/// Base URL used when running inside the embedded desktop shell
pub const EMBEDDED_BASE_URL: &str = "http://localhost:8854";

/// Where the control panel is hosted, decided once at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentContext {
    /// Served by the backend itself; requests go to the same origin
    #[default]
    Browser,
    /// Hosted by the native webview shell; requests go to the loopback server
    Embedded,
}

impl DeploymentContext {
    /// Base URL prefixed to every request path. Empty means same-origin.
    pub fn base_url(self) -> &'static str {
        match self {
            DeploymentContext::Browser => "",
            DeploymentContext::Embedded => EMBEDDED_BASE_URL,
        }
    }
}

/// HTTP method used by the backend API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
        }
    }
}

/// Sends JSON requests to the backend and decodes successful responses
pub struct Transport {
    http: Arc<dyn HttpClient>,
    context: DeploymentContext,
    origin: String,
    abort: CancellationToken,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("context", &self.context)
            .field("origin", &self.origin)
            .finish()
    }
}

impl Transport {
    /// `origin` is the page origin; it is only used when the context resolves
    /// to a relative base URL.
    pub fn new(http: Arc<dyn HttpClient>, context: DeploymentContext, origin: &str) -> Self {
        let origin = origin.trim_end_matches('/').to_string();
        tracing::debug!(
            "Created transport for {:?} context (base '{}', origin '{}')",
            context,
            context.base_url(),
            origin
        );
        Self {
            http,
            context,
            origin,
            abort: CancellationToken::new(),
        }
    }

    /// Hosting context this transport resolves URLs for
    pub fn context(&self) -> DeploymentContext {
        self.context
    }

    /// Handle that aborts every in-flight and future request when cancelled
    pub fn abort_handle(&self) -> CancellationToken {
        self.abort.clone()
    }

    /// Absolute URL for a backend path
    pub fn url(&self, path: &str) -> String {
        let base = self.context.base_url();
        if base.is_empty() {
            format!("{}{}", self.origin, path)
        } else {
            format!("{}{}", base, path)
        }
    }

    /// Perform a request and decode the JSON body of a 2xx response
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
    ) -> Result<T> {
        if self.abort.is_cancelled() {
            return Err(SwitchControlError::Aborted);
        }

        let url = self.url(path);
        let request = async {
            match method {
                Method::Get => self.http.get(&url).await,
                Method::Post => {
                    let body = body.as_deref().unwrap_or("{}");
                    self.http.post_json(&url, body).await
                }
            }
        };

        let response: HttpResponse = tokio::select! {
            result = request => result?,
            _ = self.abort.cancelled() => {
                tracing::debug!("{} {} aborted", method, path);
                return Err(SwitchControlError::Aborted);
            }
        };

        if !response.is_success() {
            tracing::debug!("{} {} returned status {}", method, path, response.status);
            return Err(SwitchControlError::Status {
                status: response.status,
                path: path.to_string(),
            });
        }

        Ok(serde_json::from_str(&response.body)?)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.fetch(Method::Get, path, None).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_string(body)?;
        self.fetch(Method::Post, path, Some(body)).await
    }
}
