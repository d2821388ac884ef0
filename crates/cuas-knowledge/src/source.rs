use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use cuas_core::Catalog;
use tracing::debug;

use crate::error::KnowledgeError;

/// Location of the knowledge base document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeSource {
    File(PathBuf),
    Url(String),
}

impl KnowledgeSource {
    /// Interpret a configured location: `http://` and `https://` are URLs,
    /// anything else is a file path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            KnowledgeSource::Url(trimmed.to_string())
        } else {
            KnowledgeSource::File(PathBuf::from(trimmed))
        }
    }

    /// Fetch and parse the document.
    pub async fn fetch(&self, timeout: Duration) -> Result<Catalog, KnowledgeError> {
        let content = match self {
            KnowledgeSource::File(path) => tokio::fs::read_to_string(path).await?,
            KnowledgeSource::Url(url) => {
                let client = reqwest::Client::builder().timeout(timeout).build()?;
                let response = client.get(url).send().await?.error_for_status()?;
                response.text().await?
            }
        };
        debug!(source = %self, bytes = content.len(), "Knowledge document fetched");
        Catalog::from_json(&content).map_err(|e| KnowledgeError::Parse(e.to_string()))
    }
}

impl fmt::Display for KnowledgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnowledgeSource::File(path) => write!(f, "{}", path.display()),
            KnowledgeSource::Url(url) => f.write_str(url),
        }
    }
}
