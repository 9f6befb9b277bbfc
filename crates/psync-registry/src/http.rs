//! HTTP registry client
//!
//! Thin JSON client over the registry contract. Transport robustness
//! (retry, backoff, timeouts) is deliberately absent; callers own it.
//! Keys travel as query parameters so prompt names containing `/` never
//! need path encoding.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::Registry;
use crate::error::{Error, Result};
use crate::types::{
    ConnectionQuery, ConnectionUpsert, Page, PromptQuery, PromptSelector, RemoteConnection,
    RemotePrompt, clamp_page_size,
};

/// Environment variable naming the registry base URL.
pub const REGISTRY_URL_VAR: &str = "PSYNC_REGISTRY_URL";
/// Environment variable carrying the bearer token.
pub const API_KEY_VAR: &str = "PSYNC_API_KEY";

/// Registry client speaking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRegistry {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpRegistry {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from `PSYNC_REGISTRY_URL` and `PSYNC_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var(REGISTRY_URL_VAR).map_err(|_| Error::Config {
            message: format!("{REGISTRY_URL_VAR} is not set"),
        })?;
        let token = std::env::var(API_KEY_VAR).ok();
        Ok(Self::new(base_url, token))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        kind: &'static str,
        key: &str,
    ) -> Result<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| Error::Transport {
                message: e.to_string(),
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::not_found(kind, key));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        response.json::<T>().await.map_err(|e| Error::Transport {
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl Registry for HttpRegistry {
    async fn list_prompts(&self, query: &PromptQuery) -> Result<Page<RemotePrompt>> {
        let mut params = vec![
            ("page", query.page.to_string()),
            ("limit", clamp_page_size(query.limit).to_string()),
        ];
        if let Some(label) = &query.label {
            params.push(("label", label.clone()));
        }
        let request = self.client.get(self.endpoint("api/prompts")).query(&params);
        self.send(request, "prompt", "(list)").await
    }

    async fn get_prompt(&self, name: &str, selector: &PromptSelector) -> Result<RemotePrompt> {
        let mut params = vec![("name", name.to_string())];
        if let Some(label) = &selector.label {
            params.push(("label", label.clone()));
        }
        if let Some(version) = selector.version {
            params.push(("version", version.to_string()));
        }
        let request = self
            .client
            .get(self.endpoint("api/prompts/find"))
            .query(&params);
        self.send(request, "prompt", name).await
    }

    async fn upsert_prompt(&self, prompt: &RemotePrompt) -> Result<RemotePrompt> {
        let request = self.client.post(self.endpoint("api/prompts")).json(prompt);
        self.send(request, "prompt", &prompt.name).await
    }

    async fn list_connections(&self, query: &ConnectionQuery) -> Result<Page<RemoteConnection>> {
        let params = [
            ("page", query.page.to_string()),
            ("limit", clamp_page_size(query.limit).to_string()),
        ];
        let request = self
            .client
            .get(self.endpoint("api/connections"))
            .query(&params);
        self.send(request, "connection", "(list)").await
    }

    async fn get_connection(&self, provider: &str) -> Result<RemoteConnection> {
        let request = self
            .client
            .get(self.endpoint("api/connections/find"))
            .query(&[("provider", provider)]);
        self.send(request, "connection", provider).await
    }

    async fn upsert_connection(&self, upsert: &ConnectionUpsert) -> Result<RemoteConnection> {
        let request = self
            .client
            .put(self.endpoint("api/connections"))
            .json(upsert);
        self.send(request, "connection", &upsert.provider).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = HttpRegistry::new("https://registry.example.com/", None);
        assert_eq!(client.base_url(), "https://registry.example.com");
        assert_eq!(
            client.endpoint("api/prompts"),
            "https://registry.example.com/api/prompts"
        );
    }
}
