use crate::error::{ApiError, Result};
use crate::tokens::{TokenPair, TokenStore};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

/// REST client for the questionnaire backend. Injects the bearer token on
/// every request and, on a 401, performs a silent token refresh and retries
/// the request once. Only one refresh runs at a time; other 401s wait behind
/// the gate and reuse its outcome.
#[derive(Clone)]
pub struct ApiClient {
    base: String,
    http: Client,
    tokens: TokenStore,
    refresh_gate: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
            tokens: TokenStore::new(),
            refresh_gate: Arc::new(Mutex::new(())),
        })
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.access() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request produced by `build`, refreshing the access token and
    /// retrying exactly once if the first attempt answers 401. The builder is
    /// a closure because retried requests (multipart in particular) must be
    /// reconstructed from scratch.
    pub(crate) async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let first = self.authorize(build(&self.http)).send().await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return check_status(first).await;
        }

        self.refresh_access().await?;

        let second = self.authorize(build(&self.http)).send().await?;
        if second.status() == StatusCode::UNAUTHORIZED {
            // Fresh token and still rejected: do not loop.
            return Err(ApiError::Unauthorized);
        }
        check_status(second).await
    }

    /// Single-flight refresh. Callers that queued behind an in-progress
    /// refresh either reuse the new token or fail together with it.
    async fn refresh_access(&self) -> Result<()> {
        let before = self.tokens.access();
        let _gate = self.refresh_gate.lock().await;

        match refresh_plan(before.as_deref(), self.tokens.access().as_deref()) {
            RefreshPlan::Reuse => return Ok(()),
            RefreshPlan::FailTogether => return Err(ApiError::Unauthorized),
            RefreshPlan::Refresh => {}
        }

        let Some(refresh) = self.tokens.refresh_token() else {
            return Err(ApiError::MissingToken);
        };

        let outcome = self
            .http
            .post(self.url("/auth/token/refresh/"))
            .json(&serde_json::json!({ "refresh": refresh }))
            .send()
            .await;

        let response = match outcome {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                log::warn!("token refresh rejected with {}", response.status());
                self.tokens.clear();
                return Err(ApiError::Unauthorized);
            }
            Err(err) => {
                log::warn!("token refresh failed: {err}");
                self.tokens.clear();
                return Err(ApiError::Unauthorized);
            }
        };

        #[derive(Deserialize)]
        struct Refreshed {
            access: String,
        }

        match response.json::<Refreshed>().await {
            Ok(refreshed) => {
                self.tokens.set(TokenPair {
                    access: refreshed.access,
                    refresh,
                });
                Ok(())
            }
            Err(err) => {
                log::warn!("token refresh returned no access token: {err}");
                self.tokens.clear();
                Err(ApiError::Unauthorized)
            }
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.url(path);
        let response = self.send(|http| http.get(&url).query(query)).await?;
        decode_body(response).await
    }

    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.send(|http| http.post(&url).json(body)).await?;
        decode_body(response).await
    }

    /// POST with an empty JSON body, used by submission workflow actions.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.post_json(path, &serde_json::json!({})).await
    }

    pub(crate) async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let response = self.send(|http| http.patch(&url).json(body)).await?;
        decode_body(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path);
        self.send(|http| http.delete(&url)).await?;
        Ok(())
    }

    /// PATCH one file as a multipart form field.
    pub(crate) async fn patch_file<T: DeserializeOwned>(
        &self,
        path: &str,
        field: &'static str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<T> {
        let url = self.url(path);
        let name = filename.to_string();
        let payload = bytes.to_vec();
        let response = self
            .send(move |http| {
                let part = reqwest::multipart::Part::bytes(payload.clone()).file_name(name.clone());
                http.patch(&url)
                    .multipart(reqwest::multipart::Form::new().part(field, part))
            })
            .await?;
        decode_body(response).await
    }
}

/// What a caller holding the refresh gate should do, given the access token
/// it saw when it hit the 401 and what the slot holds now. A changed token
/// means another caller already refreshed; an emptied slot means that
/// refresh was rejected and everyone queued behind it fails with it.
#[derive(Debug, PartialEq, Eq)]
enum RefreshPlan {
    Reuse,
    FailTogether,
    Refresh,
}

fn refresh_plan(before: Option<&str>, current: Option<&str>) -> RefreshPlan {
    match (before, current) {
        (Some(old), Some(now)) if old != now => RefreshPlan::Reuse,
        (Some(_), None) => RefreshPlan::FailTogether,
        _ => RefreshPlan::Refresh,
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    parse_json(&body)
}

fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let path = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status { status, path, body })
}

/// DRF list endpoints answer either a bare array or a paginated envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum MaybePaged<T> {
    Plain(Vec<T>),
    Paged {
        results: Vec<T>,
        #[serde(default)]
        count: Option<usize>,
    },
}

impl<T> MaybePaged<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            MaybePaged::Plain(items) => items,
            MaybePaged::Paged { results, .. } => results,
        }
    }
}
