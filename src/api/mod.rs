//! HTTP client for the management API.
//!
//! [`ApiClient`] attaches the bearer token of the shared session to every
//! request; the resource calls live in the submodules as further
//! `impl ApiClient` blocks.

pub mod appointments;
pub mod auth;
pub mod calls;
pub mod clients;
pub mod error;
pub mod projects;
pub mod tasks;

pub use error::ApiError;

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::session::SessionProvider;

pub type Result<T> = std::result::Result<T, ApiError>;

const NGROK_SKIP_WARNING: &str = "ngrok-skip-browser-warning";

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionProvider,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str, session: SessionProvider) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionProvider {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, self.url(path))
            .header(NGROK_SKIP_WARNING, "true");
        if let Some(token) = self.session.token() {
            req = req.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        req
    }

    fn json_request(&self, method: Method, path: &str) -> RequestBuilder {
        self.request(method, path)
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        log::error!("API error ({}): {}", status.as_u16(), body);
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        log::debug!("GET {}", path);
        let resp = self.send(self.json_request(Method::GET, path)).await?;
        Self::parse(resp).await
    }

    pub(crate) async fn get_json_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        log::debug!("GET {} {:?}", path, query);
        let resp = self
            .send(self.json_request(Method::GET, path).query(query))
            .await?;
        Self::parse(resp).await
    }

    /// JSON request whose reply body is parsed.
    pub(crate) async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        log::debug!("{} {}", method, path);
        let resp = self.send(self.json_request(method, path).json(body)).await?;
        Self::parse(resp).await
    }

    /// JSON request whose reply body is ignored; the view re-fetches instead.
    pub(crate) async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<()> {
        log::debug!("{} {}", method, path);
        let mut req = self.json_request(method, path);
        if let Some(body) = body {
            req = req.json(body);
        }
        self.send(req).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute::<()>(Method::DELETE, path, None).await
    }

    pub(crate) async fn send_multipart(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<()> {
        log::debug!("POST {} (multipart)", path);
        self.send(self.request(Method::POST, path).multipart(form))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_without_double_slashes() {
        let client = ApiClient::new("http://localhost:5000/api/", SessionProvider::new()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/tasks/list"), "http://localhost:5000/api/tasks/list");
        assert_eq!(client.url("clients/"), "http://localhost:5000/api/clients/");
    }
}
