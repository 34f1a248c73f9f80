use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

#[async_trait]
trait Fetch {
    type Error;
    async fn fetch(&self) -> Result<String, Self::Error>;
}

struct UrlFetcher(String);

struct FileFetcher(String);

#[async_trait]
impl Fetch for UrlFetcher {
    type Error = anyhow::Error;
    async fn fetch(&self) -> Result<String, Self::Error> {
        let resp = reqwest::get(self.0.as_str()).await?.error_for_status()?;
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl Fetch for FileFetcher {
    type Error = anyhow::Error;
    async fn fetch(&self) -> Result<String, Self::Error> {
        fs::read_to_string(&self.0)
            .await
            .with_context(|| format!("failed to read {}", self.0))
    }
}

/// 按来源读取 CSV 文本: http(s) 地址, file:// 地址, 或者本地路径
pub async fn fetch(source: &str) -> Result<String> {
    if source.starts_with("http://") || source.starts_with("https://") {
        debug!("fetching over http: {}", source);
        return UrlFetcher(source.to_string()).fetch().await;
    }
    if let Some(path) = source.strip_prefix("file://") {
        return FileFetcher(path.to_string()).fetch().await;
    }
    if source.contains("://") {
        return Err(anyhow!("Only support http/https/file right now, got {}", source));
    }
    FileFetcher(source.to_string()).fetch().await
}
