//! NewsAPI top-headlines client.

use super::{ApiError, NewsApi, user_agent};
use crate::consts::dash_consts::{http, news};
use reqwest::{Client, ClientBuilder};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TopHeadlines {
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: String,
    country: String,
    max_headlines: usize,
}

impl NewsClient {
    pub fn new(country: impl Into<String>, max_headlines: usize) -> Result<Self, ApiError> {
        let client = ClientBuilder::new()
            .timeout(http::request_timeout())
            .user_agent(user_agent())
            .build()?;
        Ok(Self {
            client,
            base_url: news::API_URL.to_string(),
            country: country.into(),
            max_headlines,
        })
    }
}

#[async_trait::async_trait]
impl NewsApi for NewsClient {
    async fn fetch(&self, api_key: &str) -> Result<Vec<String>, ApiError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("country", self.country.as_str()), ("apiKey", api_key)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }

        let body: TopHeadlines = response.json().await?;
        Ok(titles(body, self.max_headlines))
    }
}

/// Non-blank titles in response order, at most `max`.
fn titles(body: TopHeadlines, max: usize) -> Vec<String> {
    body.articles
        .into_iter()
        .filter_map(|article| article.title)
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_titles_skip_blank_and_cap() {
        let body: TopHeadlines = serde_json::from_str(
            r#"{"status": "ok", "totalResults": 4, "articles": [
                {"title": "First story "},
                {"title": null},
                {"title": "   "},
                {"title": "Second story"},
                {"title": "Third story"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(titles(body, 2), vec!["First story", "Second story"]);
    }

    #[test]
    fn test_missing_articles_is_empty() {
        let body: TopHeadlines = serde_json::from_str(r#"{"status": "ok"}"#).unwrap();
        assert!(titles(body, 10).is_empty());
    }
}
