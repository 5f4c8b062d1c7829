use crate::model::SourceError;
use crate::source::traits::SalesSource;
use crate::utils::is_url;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

pub struct FileSource {
    path: PathBuf,
    display: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let display = path.display().to_string();
        Self { path, display }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[async_trait::async_trait]
impl SalesSource for FileSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        info!("Reading sales data from {}", self.display);
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn location(&self) -> &str {
        &self.display
    }
}

pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("SalesProfiler/0.1")
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait::async_trait]
impl SalesSource for HttpSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        info!("Downloading sales data from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::InvalidResponse(response.status().as_u16()));
        }

        Ok(response.text().await?)
    }

    fn location(&self) -> &str {
        &self.url
    }
}

/// Picks an HTTP source for `http(s)://` locations and a file source otherwise.
pub fn source_for(location: &str) -> Result<Box<dyn SalesSource>, SourceError> {
    if is_url(location) {
        Ok(Box::new(HttpSource::new(location.trim())?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}
