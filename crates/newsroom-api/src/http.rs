// Shared HTTP plumbing: one reqwest client, portal credentials on every call
use reqwest::{Method, RequestBuilder, Response};
use tracing::debug;

use crate::error::{ApiError, Result};

/// How the client proves who it is to the portal
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Raw `Cookie` header value (e.g. `JSESSIONID=...`)
    pub session_cookie: Option<String>,
}

/// Cheap to clone - reqwest keeps the connection pool behind an Arc
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: reqwest::Client,
    credentials: Credentials,
}

impl HttpSession {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("Newsroom/0.1.0"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            credentials,
        })
    }

    /// Session without any credentials, for anonymous portals and tests
    pub fn anonymous() -> Result<Self> {
        Self::new(Credentials::default())
    }

    /// Start a request with the session credentials attached
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);

        if let Some(ref username) = self.credentials.username {
            request = request.basic_auth(username, self.credentials.password.as_ref());
        }

        if let Some(ref cookie) = self.credentials.session_cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }

        request
    }

    pub fn get(&self, url: &str) -> RequestBuilder {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder {
        self.request(Method::PUT, url)
    }

    pub fn patch(&self, url: &str) -> RequestBuilder {
        self.request(Method::PATCH, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder {
        self.request(Method::DELETE, url)
    }
}

/// Turn a non-2xx response into `ApiError::Rejected` carrying `message`
pub(crate) async fn ensure_success(response: Response, message: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    debug!("{}: status {} body {:?}", message, status, body);

    Err(ApiError::Rejected {
        message: message.to_string(),
        status: status.as_u16(),
    })
}
