use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::{Document, ListResponse, RunQueryItem};

use super::query::StructuredQuery;
use super::source::{snapshot_file_name, DocumentSource};

/// Client for the Firestore REST API
pub struct FirestoreClient {
    client: Client,
    base_path: String,
    page_size: u32,
    max_pages: u32,
    snapshot_dir: Option<PathBuf>,
}

/// Shape written to snapshot files for collection listings
#[derive(Serialize)]
struct ListSnapshot<'a> {
    documents: &'a [Document],
}

impl FirestoreClient {
    /// Create a new client for the configured project and database
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_path: config.base_path(),
            page_size: config.page_size,
            max_pages: config.max_pages.max(1),
            snapshot_dir: config.snapshot_dir.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            self.base_path.clone()
        } else {
            format!("{}/{}", self.base_path, path)
        }
    }

    /// Send a request and return the body of a successful response
    async fn send(&self, request: RequestBuilder, url: &str) -> Result<String, FetchError> {
        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        Ok(body)
    }

    /// Write a raw response for later manual inspection. Failures are only logged.
    async fn save_snapshot(&self, name: &str, body: &str) {
        let Some(dir) = &self.snapshot_dir else {
            return;
        };

        let path = dir.join(name);
        let result = async {
            tokio::fs::create_dir_all(dir).await?;
            tokio::fs::write(&path, body).await
        }
        .await;

        match result {
            Ok(()) => debug!("Wrote snapshot {}", path.display()),
            Err(e) => warn!("Failed to write snapshot {}: {}", path.display(), e),
        }
    }
}

#[async_trait]
impl DocumentSource for FirestoreClient {
    async fn list_documents(&self, collection_path: &str) -> Result<Vec<Document>, FetchError> {
        let base_url = self.url(collection_path);
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        for page in 0..self.max_pages {
            let mut url = format!("{}?pageSize={}", base_url, self.page_size);
            if let Some(token) = &page_token {
                url.push_str("&pageToken=");
                url.push_str(&urlencoding::encode(token));
            }

            debug!("Listing documents: {}", url);

            // A missing project or database also answers 404, so it stays an error here
            let body = self.send(self.client.get(&url), &url).await?;

            let response: ListResponse =
                serde_json::from_str(&body).map_err(|source| FetchError::Decode {
                    origin: url.clone(),
                    source,
                })?;

            documents.extend(response.documents);

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }

            if page + 1 == self.max_pages {
                warn!(
                    "Stopped listing {} after {} pages, results are truncated",
                    collection_path, self.max_pages
                );
            }
        }

        debug!("Listed {} documents from {}", documents.len(), collection_path);

        if self.snapshot_dir.is_some() {
            match serde_json::to_string_pretty(&ListSnapshot { documents: &documents }) {
                Ok(body) => {
                    self.save_snapshot(&snapshot_file_name(collection_path), &body)
                        .await
                }
                Err(e) => warn!("Failed to encode snapshot for {}: {}", collection_path, e),
            }
        }

        Ok(documents)
    }

    async fn get_document(&self, document_path: &str) -> Result<Option<Document>, FetchError> {
        let url = self.url(document_path);
        debug!("Getting document: {}", url);

        let body = match self.send(self.client.get(&url), &url).await {
            Ok(body) => body,
            Err(FetchError::Status { status, .. }) if status == StatusCode::NOT_FOUND => {
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let document: Document = serde_json::from_str(&body).map_err(|source| FetchError::Decode {
            origin: url.clone(),
            source,
        })?;

        self.save_snapshot(&snapshot_file_name(document_path), &body)
            .await;

        Ok(Some(document))
    }

    async fn run_query(&self, parent_path: &str, query: &StructuredQuery) -> Option<Vec<Document>> {
        let url = format!("{}:runQuery", self.url(parent_path));
        debug!("Running structured query: {}", url);

        let request = self.client.post(&url).json(&query.clone().into_request());

        let body = match self.send(request, &url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Structured query failed: {}", e);
                return None;
            }
        };

        let items: Vec<RunQueryItem> = match serde_json::from_str(&body) {
            Ok(items) => items,
            Err(e) => {
                warn!("Failed to parse structured query response: {}", e);
                return None;
            }
        };

        let documents: Vec<Document> = items.into_iter().filter_map(|item| item.document).collect();
        if documents.is_empty() {
            info!("Structured query returned no documents");
            return None;
        }

        let name = format!(
            "query_{}",
            snapshot_file_name(query.collection().unwrap_or_default())
        );
        self.save_snapshot(&name, &body).await;

        Some(documents)
    }
}
