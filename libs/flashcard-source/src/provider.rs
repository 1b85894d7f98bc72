//! Providers that turn a source identifier into raw card text.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::error::{AcquisitionError, Result};

/// Default HTTP request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can fetch the raw text of a deck.
#[allow(async_fn_in_trait)]
pub trait SourceProvider {
    async fn acquire(&self, identifier: &str) -> Result<String>;
}

/// Reads decks from the local file system.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative identifiers against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, identifier: &str) -> PathBuf {
        let path = Path::new(identifier.strip_prefix("file://").unwrap_or(identifier));
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl SourceProvider for FileSource {
    async fn acquire(&self, identifier: &str) -> Result<String> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AcquisitionError::InvalidIdentifier(identifier.to_string()));
        }
        let path = self.resolve(identifier);
        debug!(path = %path.display(), "reading deck file");

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => AcquisitionError::NotFound(path.display().to_string()),
            ErrorKind::PermissionDenied => {
                AcquisitionError::PermissionDenied(path.display().to_string())
            }
            _ => AcquisitionError::Io(e),
        })?;
        Ok(decode(bytes, identifier))
    }
}

/// Fetches decks over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Option<String>,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Resolve identifiers that are not absolute URLs against `base_url`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    fn resolve(&self, identifier: &str) -> Result<String> {
        if is_http_url(identifier) {
            return Ok(identifier.to_string());
        }
        match &self.base_url {
            Some(base) => Ok(format!(
                "{}/{}",
                base.trim_end_matches('/'),
                identifier.trim_start_matches('/')
            )),
            None => Err(AcquisitionError::InvalidIdentifier(identifier.to_string())),
        }
    }
}

impl SourceProvider for HttpSource {
    async fn acquire(&self, identifier: &str) -> Result<String> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AcquisitionError::InvalidIdentifier(identifier.to_string()));
        }
        let url = self.resolve(identifier)?;
        debug!(%url, "fetching deck");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(match status {
                StatusCode::NOT_FOUND | StatusCode::GONE => AcquisitionError::NotFound(url),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    AcquisitionError::PermissionDenied(url)
                }
                _ => AcquisitionError::Status {
                    status: status.as_u16(),
                    url,
                },
            });
        }

        let bytes = response.bytes().await?;
        Ok(decode(bytes.to_vec(), identifier))
    }
}

/// Decks held in memory, keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    texts: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, identifier: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(identifier, text);
        self
    }

    pub fn insert(&mut self, identifier: impl Into<String>, text: impl Into<String>) {
        self.texts.insert(identifier.into(), text.into());
    }
}

impl SourceProvider for MemorySource {
    async fn acquire(&self, identifier: &str) -> Result<String> {
        self.texts
            .get(identifier)
            .cloned()
            .ok_or_else(|| AcquisitionError::NotFound(identifier.to_string()))
    }
}

/// Routes `http(s)://` identifiers to [`HttpSource`] and everything else to
/// [`FileSource`].
#[derive(Debug, Clone)]
pub struct AutoSource {
    pub file: FileSource,
    pub http: HttpSource,
}

impl AutoSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            file: FileSource::new(),
            http: HttpSource::new()?,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let timeout = config
            .http_timeout_secs
            .map_or(DEFAULT_HTTP_TIMEOUT, Duration::from_secs);
        let file = match &config.file_root {
            Some(root) => FileSource::with_root(root),
            None => FileSource::new(),
        };
        Ok(Self {
            file,
            http: HttpSource::with_timeout(timeout)?,
        })
    }
}

impl SourceProvider for AutoSource {
    async fn acquire(&self, identifier: &str) -> Result<String> {
        if is_http_url(identifier.trim()) {
            self.http.acquire(identifier).await
        } else {
            self.file.acquire(identifier).await
        }
    }
}

fn is_http_url(identifier: &str) -> bool {
    let lower = identifier.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Decode source bytes as UTF-8, replacing invalid sequences.
fn decode(bytes: Vec<u8>, identifier: &str) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(identifier, "source is not valid UTF-8, replacing invalid bytes");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    }
}
