//! HTTP backend serving the registry, widget assets and persisted documents.
//!
//! ERROR HANDLING
//! ==============
//! Transport failures and non-success statuses become `ShellError::Fetch`;
//! bodies that are not JSON become `ShellError::Parse`. Callers decide the
//! fallback; this layer never retries.

#[cfg(test)]
#[path = "backend_test.rs"]
mod backend_test;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ShellConfig;
use crate::error::ShellError;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Backend operations used by the shell. Paths are absolute (`/widget.json`).
#[async_trait]
pub trait Backend: Send + Sync {
    /// GET a JSON document.
    async fn get_json(&self, path: &str) -> Result<Value, ShellError>;

    /// POST a JSON body. Success means a 2xx status.
    async fn post_json(&self, path: &str, body: &Value) -> Result<(), ShellError>;

    /// GET a text asset (stylesheet or script).
    async fn fetch_text(&self, path: &str) -> Result<String, ShellError>;
}

/// `reqwest` implementation of [`Backend`].
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    /// Build the HTTP client from shell config.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Fetch`] if the HTTP client cannot be built.
    pub fn new(config: &ShellConfig) -> Result<Self, ShellError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS));
        if let Some(token) = &config.auth_token {
            builder = builder.user_agent(token.clone());
        }
        let http = builder.build().map_err(|e| ShellError::fetch(&config.base_url, e))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_text(&self, url: &str) -> Result<String, ShellError> {
        let response = self.http.get(url).send().await.map_err(|e| ShellError::fetch(url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ShellError::fetch(url, format!("status {}", status.as_u16())));
        }
        response.text().await.map_err(|e| ShellError::fetch(url, e))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_json(&self, path: &str) -> Result<Value, ShellError> {
        let url = self.url(path);
        let text = self.get_text(&url).await?;
        serde_json::from_str(&text).map_err(|e| ShellError::parse(path, e))
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<(), ShellError> {
        let url = self.url(path);
        let response = self.http.post(&url).json(body).send().await.map_err(|e| ShellError::fetch(&url, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ShellError::fetch(&url, format!("status {}", status.as_u16())));
        }
        Ok(())
    }

    async fn fetch_text(&self, path: &str) -> Result<String, ShellError> {
        self.get_text(&self.url(path)).await
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::collections::HashMap;
    use std::sync::{Mutex, PoisonError};

    use async_trait::async_trait;
    use serde_json::Value;

    use super::Backend;
    use crate::error::ShellError;

    /// In-memory backend. Unknown paths answer like a 404.
    #[derive(Default)]
    pub(crate) struct MemoryBackend {
        documents: Mutex<HashMap<String, Value>>,
        malformed: Mutex<HashMap<String, String>>,
        assets: Mutex<HashMap<String, String>>,
        posts: Mutex<Vec<(String, Value)>>,
        fetches: Mutex<Vec<String>>,
        fail_posts: Mutex<bool>,
    }

    impl MemoryBackend {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn with_document(self, path: &str, value: Value) -> Self {
            self.documents.lock().unwrap_or_else(PoisonError::into_inner).insert(path.to_owned(), value);
            self
        }

        /// Serve a body that is not valid JSON.
        pub(crate) fn with_malformed(self, path: &str, body: &str) -> Self {
            self.malformed.lock().unwrap_or_else(PoisonError::into_inner).insert(path.to_owned(), body.to_owned());
            self
        }

        pub(crate) fn with_asset(self, path: &str, body: &str) -> Self {
            self.assets.lock().unwrap_or_else(PoisonError::into_inner).insert(path.to_owned(), body.to_owned());
            self
        }

        /// Serve both assets of a widget folder under `/widgets`.
        pub(crate) fn with_widget_assets(self, folder: &str) -> Self {
            self.with_asset(&format!("/widgets/{folder}/style.css"), "")
                .with_asset(&format!("/widgets/{folder}/main.js"), "")
        }

        pub(crate) fn failing_posts(self) -> Self {
            *self.fail_posts.lock().unwrap_or_else(PoisonError::into_inner) = true;
            self
        }

        pub(crate) fn posts(&self) -> Vec<(String, Value)> {
            self.posts.lock().unwrap_or_else(PoisonError::into_inner).clone()
        }

        /// Bodies posted to `path`, oldest first.
        pub(crate) fn posts_to(&self, path: &str) -> Vec<Value> {
            self.posts().into_iter().filter(|(p, _)| p == path).map(|(_, body)| body).collect()
        }

        pub(crate) fn fetch_count(&self, path: &str) -> usize {
            self.fetches.lock().unwrap_or_else(PoisonError::into_inner).iter().filter(|p| *p == path).count()
        }
    }

    #[async_trait]
    impl Backend for MemoryBackend {
        async fn get_json(&self, path: &str) -> Result<Value, ShellError> {
            self.fetches.lock().unwrap_or_else(PoisonError::into_inner).push(path.to_owned());
            if let Some(body) = self.malformed.lock().unwrap_or_else(PoisonError::into_inner).get(path) {
                return serde_json::from_str(body).map_err(|e| ShellError::parse(path, e));
            }
            self.documents
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(path)
                .cloned()
                .ok_or_else(|| ShellError::fetch(path, "status 404"))
        }

        async fn post_json(&self, path: &str, body: &Value) -> Result<(), ShellError> {
            if *self.fail_posts.lock().unwrap_or_else(PoisonError::into_inner) {
                return Err(ShellError::fetch(path, "status 500"));
            }
            self.posts.lock().unwrap_or_else(PoisonError::into_inner).push((path.to_owned(), body.clone()));
            Ok(())
        }

        async fn fetch_text(&self, path: &str) -> Result<String, ShellError> {
            self.fetches.lock().unwrap_or_else(PoisonError::into_inner).push(path.to_owned());
            self.assets
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(path)
                .cloned()
                .ok_or_else(|| ShellError::fetch(path, "status 404"))
        }
    }
}
