// ─── File Fetch ───
// Network collaborator used to materialize the auth agents and the
// wrapper launcher on first use.

use std::path::PathBuf;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{LaunchError, LaunchResult};

const USER_AGENT: &str = concat!("craftlaunch/", env!("CARGO_PKG_VERSION"));

/// A single file to fetch with an optional SHA-1 for validation.
#[derive(Debug, Clone)]
pub struct FetchItem {
    pub url: String,
    pub dest: PathBuf,
    pub sha1: Option<String>,
}

impl FetchItem {
    pub fn new(url: impl Into<String>, dest: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            dest: dest.into(),
            sha1: None,
        }
    }
}

/// Boundary to the download subsystem. The argument assembler depends
/// only on this trait, so builds can run against a stub in tests. The
/// caller owns retry policy; implementations perform none.
#[async_trait]
pub trait FileFetcher: Send + Sync {
    async fn fetch_files(&self, items: &[FetchItem]) -> LaunchResult<()>;
}

/// Fetch `item` only when its destination does not exist yet.
///
/// Racing duplicate fetches is harmless: the artifacts are immutable
/// and addressed by name, so the worst case is a redundant download.
pub async fn ensure_present(fetcher: &dyn FileFetcher, item: FetchItem) -> LaunchResult<()> {
    if item.dest.exists() {
        debug!("Artifact already cached: {:?}", item.dest);
        return Ok(());
    }
    fetcher.fetch_files(std::slice::from_ref(&item)).await
}

/// Concurrent, SHA-1 validated reqwest fetcher.
pub struct HttpFetcher {
    client: Client,
    /// Maximum number of parallel fetches.
    concurrency: usize,
}

impl HttpFetcher {
    pub fn new() -> LaunchResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            concurrency: 8,
        })
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.concurrency = n;
        self
    }

    async fn fetch_one(&self, item: &FetchItem) -> LaunchResult<()> {
        if let Some(parent) = item.dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| LaunchError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }

        let response = self.client.get(&item.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LaunchError::DownloadFailed {
                url: item.url.clone(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;

        // Validate before writing, on the in-memory buffer.
        if let Some(expected) = &item.sha1 {
            let mut hasher = Sha1::new();
            hasher.update(&bytes);
            let actual = hex::encode(hasher.finalize());
            if &actual != expected {
                return Err(LaunchError::Sha1Mismatch {
                    path: item.dest.clone(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        // Write inside a block so the handle drops immediately — the
        // file may be handed to the JVM right after this returns.
        {
            let mut file =
                tokio::fs::File::create(&item.dest)
                    .await
                    .map_err(|e| LaunchError::Io {
                        path: item.dest.clone(),
                        source: e,
                    })?;
            file.write_all(&bytes).await.map_err(|e| LaunchError::Io {
                path: item.dest.clone(),
                source: e,
            })?;
            file.flush().await.map_err(|e| LaunchError::Io {
                path: item.dest.clone(),
                source: e,
            })?;
        }

        debug!("Fetched: {} -> {:?}", item.url, item.dest);
        Ok(())
    }
}

#[async_trait]
impl FileFetcher for HttpFetcher {
    /// Fetch all items concurrently; the first failure fails the batch.
    async fn fetch_files(&self, items: &[FetchItem]) -> LaunchResult<()> {
        info!(
            "Fetching {} files, concurrency={}",
            items.len(),
            self.concurrency
        );

        let futures: Vec<_> = items.iter().map(|item| self.fetch_one(item)).collect();
        let mut results = stream::iter(futures).buffer_unordered(self.concurrency);

        while let Some(result) = results.next().await {
            result?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingFetcher {
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl FileFetcher for CountingFetcher {
        async fn fetch_files(&self, items: &[FetchItem]) -> LaunchResult<()> {
            self.calls
                .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            for item in items {
                if let Some(parent) = item.dest.parent() {
                    std::fs::create_dir_all(parent).map_err(|e| LaunchError::Io {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }
                std::fs::write(&item.dest, b"stub").map_err(|e| LaunchError::Io {
                    path: item.dest.clone(),
                    source: e,
                })?;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn ensure_present_fetches_at_most_once() {
        let temp = std::env::temp_dir().join(format!("fetch-test-once-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&temp);
        let fetcher = CountingFetcher {
            calls: std::sync::atomic::AtomicUsize::new(0),
        };
        let dest = temp.join("agent.jar");

        ensure_present(&fetcher, FetchItem::new("https://example.invalid/a", &dest))
            .await
            .unwrap();
        ensure_present(&fetcher, FetchItem::new("https://example.invalid/a", &dest))
            .await
            .unwrap();

        assert_eq!(fetcher.calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(dest.exists());

        let _ = std::fs::remove_dir_all(&temp);
    }
}
