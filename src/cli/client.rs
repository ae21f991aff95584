use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Thin HTTP client for the POS API that unwraps the response envelope.
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

/// Status plus decoded body for calls where the caller wants both.
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            http,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        self.send(self.request(Method::GET, path)?.query(query)).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> anyhow::Result<Value> {
        self.send(self.request(Method::POST, path)?.json(body)).await
    }

    pub async fn delete(&self, path: &str) -> anyhow::Result<Value> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    /// GET without envelope handling; used by health checks that treat 503 as data.
    pub async fn get_raw(&self, path: &str) -> anyhow::Result<RawResponse> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("request to {} failed", self.url(path)))?;
        let status = response.status();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(RawResponse { status, body })
    }

    fn request(&self, method: Method, path: &str) -> anyhow::Result<RequestBuilder> {
        let mut builder = self.http.request(method, self.url(path));
        if path.starts_with("/api/") {
            let token = self
                .token
                .as_deref()
                .ok_or_else(|| anyhow!("no token: pass --token or set POS_API_TOKEN (see `pos auth login`)"))?;
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> anyhow::Result<Value> {
        let response = builder.send().await.context("request failed")?;
        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .with_context(|| format!("server answered {} without a JSON body", status))?;
        unwrap_envelope(status, body)
    }
}

/// Success bodies are returned whole; failures become errors carrying the server's code and message.
pub fn unwrap_envelope(status: StatusCode, body: Value) -> anyhow::Result<Value> {
    if status.is_success() && body["success"] != Value::Bool(false) {
        return Ok(body);
    }
    let code = body["error"]["code"].as_str().unwrap_or("HTTP_ERROR");
    let message = body["error"]["message"].as_str().unwrap_or("request failed");
    Err(anyhow!("{} ({}): {}", status.as_u16(), code, message))
}
