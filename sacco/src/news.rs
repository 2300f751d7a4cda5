//! Business headlines for the dashboard's news widget. Strictly cosmetic,
//! so every failure degrades to an empty list.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use crate::{error::Result, state::Portal};

const HEADLINE_LIMIT: usize = 5;

#[derive(Deserialize)]
struct NewsResponse {
    articles: Vec<NewsArticle>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: NewsSource,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewsSource {
    pub name: Option<String>,
}

impl Portal {
    pub async fn financial_news(&self) -> Vec<NewsArticle> {
        match self.fetch_news().await {
            Ok(mut articles) => {
                articles.truncate(HEADLINE_LIMIT);
                articles
            }
            Err(e) => {
                warn!("news unavailable: {e}");
                Vec::new()
            }
        }
    }

    async fn fetch_news(&self) -> Result<Vec<NewsArticle>> {
        let url = format!(
            "{}/top-headlines?category=business&country=us&apiKey={}",
            self.config.news_api_url, self.config.news_api_key
        );
        let body = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let response: NewsResponse = serde_json::from_str(&body)?;
        Ok(response.articles)
    }
}
