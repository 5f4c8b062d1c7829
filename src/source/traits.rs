use crate::model::SourceError;

/// Where a raw sales export comes from.
#[async_trait::async_trait]
pub trait SalesSource: Send + Sync {
    async fn fetch(&self) -> Result<String, SourceError>;

    /// Human-readable location for logs.
    fn location(&self) -> &str;
}
