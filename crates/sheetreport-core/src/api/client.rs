use std::sync::RwLock;
use std::time::Duration;

use reqwest::multipart::{Form, Part};

use super::{
    ApiError, ApiFuture, LoginResponse, RemoteFile, ReportApi, ReportData, SheetListing,
    decode_report, extract_detail,
};
use crate::FileId;
use crate::report::ReportRequest;
use crate::session::Credentials;
use crate::upload::LocalFile;

/// [`ReportApi`] over HTTP with reqwest.
///
/// Authentication works with either server style: the bearer token returned
/// by a successful login is attached to every later request, and a cookie
/// store keeps any session cookie the server sets.
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
    timeout: Option<Duration>,
    token: RwLock<Option<String>>,
}

impl HttpApi {
    /// Create a client rooted at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            timeout: None,
            token: RwLock::new(None),
        })
    }

    /// Per-request timeout. `None` leaves requests unbounded.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a bearer token from a previous login is held.
    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }

    fn request(&self, method: reqwest::Method, path_and_query: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path_and_query);
        let mut req = self.client.request(method, url);
        if let Ok(guard) = self.token.read()
            && let Some(token) = guard.as_deref()
        {
            req = req.bearer_auth(token);
        }
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        req
    }
}

/// Turn a non-2xx response into [`ApiError::Rejected`], reading the body for
/// a `detail` reason.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApiError::Rejected {
        status: status.as_u16(),
        detail: extract_detail(&body),
    })
}

impl ReportApi for HttpApi {
    fn list_files(&self) -> ApiFuture<'_, Vec<RemoteFile>> {
        Box::pin(async move {
            let resp = self.request(reqwest::Method::GET, "/v1/upload").send().await?;
            let resp = check_response(resp).await?;
            Ok(resp.json::<Vec<RemoteFile>>().await?)
        })
    }

    fn list_sheets<'a>(&'a self, file_id: &'a FileId) -> ApiFuture<'a, Vec<String>> {
        Box::pin(async move {
            let path = format!("/v1/upload/{}", urlencoding::encode(file_id.as_str()));
            let resp = self.request(reqwest::Method::GET, &path).send().await?;
            let resp = check_response(resp).await?;
            let listing: SheetListing = resp.json().await?;
            Ok(listing.into_sheets())
        })
    }

    fn generate_report<'a>(&'a self, request: &'a ReportRequest) -> ApiFuture<'a, ReportData> {
        Box::pin(async move {
            let resp = self
                .request(reqwest::Method::GET, &request.path_and_query())
                .send()
                .await?;
            let resp = check_response(resp).await?;
            let body: serde_json::Value = resp.json().await?;
            decode_report(body)
        })
    }

    fn upload<'a>(&'a self, file: &'a LocalFile) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let bytes = tokio::fs::read(file.path())
                .await
                .map_err(|e| ApiError::Io(format!("{}: {}", file.path().display(), e)))?;
            let part = Part::bytes(bytes).file_name(file.file_name().to_string());
            let form = Form::new().part("file", part);
            let resp = self
                .request(reqwest::Method::POST, "/v1/upload")
                .multipart(form)
                .send()
                .await?;
            check_response(resp).await?;
            Ok(())
        })
    }

    fn login<'a>(&'a self, credentials: &'a Credentials) -> ApiFuture<'a, ()> {
        Box::pin(async move {
            let body = serde_json::json!({
                "email": credentials.email(),
                "password": credentials.password(),
            });
            let resp = self
                .request(reqwest::Method::POST, "/v1/auth/login")
                .json(&body)
                .send()
                .await?;
            let resp = check_response(resp).await?;
            // Cookie-session servers may answer with an empty or non-token body.
            let text = resp.text().await.unwrap_or_default();
            let token = serde_json::from_str::<LoginResponse>(&text)
                .ok()
                .map(|r| r.access_token);
            self.set_token(token);
            Ok(())
        })
    }

    fn logout(&self) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let resp = self
                .request(reqwest::Method::POST, "/v1/auth/logout")
                .send()
                .await?;
            check_response(resp).await?;
            self.set_token(None);
            Ok(())
        })
    }
}
