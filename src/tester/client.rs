// vetmed-e2e - End-to-end checks for the VetMed Pro HTTP API
//
// Copyright (c) 2025 Stephen Harrison
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use anyhow::{Context, Result};
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::types::SuiteConfig;

/// HTTP client bound to the API root of the service under test.
///
/// One instance lives for the whole run. It is consumed by [`ApiClient::close`]
/// once the last case has finished.
pub struct ApiClient {
    client: Client,
    api_base: Url,
}

impl ApiClient {
    pub fn connect(config: &SuiteConfig) -> Result<Self> {
        let api_base = config.api_base()?;

        let mut client_builder = Client::builder();
        if config.timeout > 0 {
            client_builder = client_builder.timeout(Duration::from_secs(config.timeout));
        }
        let client = client_builder
            .build()
            .context("Failed to build HTTP client")?;

        debug!("HTTP client ready for {api_base}");
        Ok(ApiClient { client, api_base })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Resolve a path relative to the API root, e.g. `auth/login`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_base
            .join(path.trim_start_matches('/'))
            .with_context(|| format!("Invalid endpoint path: {path}"))
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");
        self.send(self.client.get(url)).await
    }

    pub async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<ApiResponse> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");
        // `json` sets the Content-Type header
        self.send(self.client.post(url).json(body)).await
    }

    async fn send(&self, request_builder: RequestBuilder) -> Result<ApiResponse> {
        let resp = request_builder.send().await.context("Request failed")?;
        let status = resp.status();
        let body = resp.text().await.context("Failed to read response body")?;
        debug!("-> {status} ({} bytes)", body.len());
        Ok(ApiResponse { status, body })
    }

    /// Release the client and its connection pool.
    pub fn close(self) {
        debug!("Closing HTTP client for {}", self.api_base);
        drop(self.client);
    }
}

/// A fully read response
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body)
            .with_context(|| format!("Invalid JSON in HTTP {} response", self.status.as_u16()))
    }

    /// Failure message for an unexpected status: `HTTP <code>: <body>`
    pub fn describe(&self) -> String {
        format!("HTTP {}: {}", self.status.as_u16(), self.body)
    }
}

/// Read a field as a string. Numeric ids are accepted and rendered in decimal.
pub fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Keys of an object field, empty when the field is missing or not an object
pub fn object_keys<'a>(value: &'a Value, key: &str) -> Vec<&'a str> {
    value
        .get(key)
        .and_then(Value::as_object)
        .map(|map| map.keys().map(String::as_str).collect())
        .unwrap_or_default()
}
