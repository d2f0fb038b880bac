use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::Settings;
use crate::models::{MediaItem, TrailerReference};

pub const DEFAULT_CATALOG_BASE: &str = "https://api.themoviedb.org/3";

#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch the `results` list behind a catalog endpoint such as `/movie/popular`.
    async fn fetch_list(&self, endpoint: &str) -> Result<Vec<MediaItem>>;
    async fn search_movies(&self, query: &str) -> Result<Vec<MediaItem>>;
    async fn fetch_videos(&self, id: i64) -> Result<Vec<Video>>;
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Video {
    #[serde(default)]
    pub site: String,
    #[serde(rename = "type", default)]
    pub video_type: String,
    pub key: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
struct Videos {
    #[serde(default)]
    results: Vec<Video>,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let user_agent = format!("streamboard/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .context("Failed to build catalog HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.catalog_base.clone(), settings.api_key.clone())
    }

    fn url(&self, endpoint: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("TMDB_API_KEY not set"))?;
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        Ok(format!(
            "{}{endpoint}{separator}api_key={}",
            self.base_url,
            urlencoding::encode(api_key)
        ))
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .context("request failed")?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("catalog returned {}: {}", status, text));
        }
        let parsed: T = serde_json::from_str(&text).context("JSON parse failed")?;
        Ok(parsed)
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn fetch_list(&self, endpoint: &str) -> Result<Vec<MediaItem>> {
        let url = self.url(endpoint)?;
        let data: ListResponse = self.get_json(&url).await?;
        Ok(data.results)
    }

    async fn search_movies(&self, query: &str) -> Result<Vec<MediaItem>> {
        let endpoint = format!("/search/movie?query={}", urlencoding::encode(query));
        let url = self.url(&endpoint)?;
        let data: ListResponse = self.get_json(&url).await?;
        Ok(data.results)
    }

    async fn fetch_videos(&self, id: i64) -> Result<Vec<Video>> {
        let url = self.url(&format!("/movie/{id}/videos"))?;
        let data: Videos = self.get_json(&url).await?;
        Ok(data.results)
    }
}

/// First YouTube entry typed "Trailer"; teasers and other sites are ignored.
pub fn select_trailer(videos: &[Video]) -> Option<TrailerReference> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
        .map(|v| TrailerReference(v.key.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(site: &str, kind: &str, key: &str) -> Video {
        Video {
            site: site.to_string(),
            video_type: kind.to_string(),
            key: key.to_string(),
        }
    }

    #[test]
    fn picks_first_youtube_trailer() {
        let videos = vec![
            video("YouTube", "Teaser", "teaser"),
            video("Vimeo", "Trailer", "vimeo"),
            video("YouTube", "Trailer", "first"),
            video("YouTube", "Trailer", "second"),
        ];
        assert_eq!(
            select_trailer(&videos),
            Some(TrailerReference("first".to_string()))
        );
    }

    #[test]
    fn no_trailer_among_teasers() {
        let videos = vec![video("YouTube", "Teaser", "t"), video("YouTube", "Clip", "c")];
        assert_eq!(select_trailer(&videos), None);
    }

    #[test]
    fn url_uses_ampersand_when_endpoint_has_query() {
        let client = CatalogClient::new("http://catalog.test/3/", Some("k".to_string())).unwrap();
        assert_eq!(
            client.url("/discover/movie?with_genres=28").unwrap(),
            "http://catalog.test/3/discover/movie?with_genres=28&api_key=k"
        );
        assert_eq!(
            client.url("/movie/popular").unwrap(),
            "http://catalog.test/3/movie/popular?api_key=k"
        );
    }

    #[test]
    fn missing_key_is_an_error() {
        let client = CatalogClient::new(DEFAULT_CATALOG_BASE, None).unwrap();
        assert!(client.url("/movie/popular").is_err());
    }
}
