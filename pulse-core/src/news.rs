use std::collections::HashMap;

use futures_util::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};
use url::Url;

use crate::article::{with_preview_images, ArticlesResponse, NewsArticle};
use crate::categories::query_term;
use crate::config::NewsConfig;
use crate::error::{PulseError, Result, ValidationError};

/// Articles per category label, plus the labels whose request failed.
#[derive(Debug, Default)]
pub struct CategoryNews {
    pub articles: HashMap<String, Vec<NewsArticle>>,
    pub failures: HashMap<String, PulseError>,
}

impl CategoryNews {
    pub fn get(&self, label: &str) -> Option<&[NewsArticle]> {
        self.articles.get(label).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty() && self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Everything,
    TopHeadlines { page_size: u32 },
}

#[derive(Debug, Clone)]
pub struct NewsClient {
    client: Client,
    base_url: Url,
    config: NewsConfig,
}

impl NewsClient {
    pub fn new(config: NewsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("NewsPulse/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: NewsConfig) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'.
        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| PulseError::Config(format!("invalid news base url {base}: {e}")))?;
        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    /// Unfiltered results for the configured "latest" keyword.
    pub async fn latest_news(&self) -> Result<Vec<NewsArticle>> {
        self.fetch(&self.config.latest_query, Endpoint::Everything)
            .await
    }

    /// Latest news reduced to articles with a preview image.
    pub async fn home_feed(&self) -> Result<Vec<NewsArticle>> {
        let articles = self.latest_news().await?;
        Ok(with_preview_images(articles, self.config.home_cap))
    }

    pub async fn search_news(&self, keyword: &str) -> Result<Vec<NewsArticle>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ValidationError::EmptyField("search keyword").into());
        }
        let articles = self.fetch(keyword, Endpoint::Everything).await?;
        Ok(with_preview_images(articles, self.config.category_cap))
    }

    /// One request per label, mapped through the category table. A failed
    /// label lands in `failures` without affecting the others.
    pub async fn category_news(&self, categories: &[String]) -> CategoryNews {
        let queries = categories
            .iter()
            .map(|label| (label.clone(), query_term(label).to_string()));
        self.fan_out(queries, Endpoint::Everything).await
    }

    /// Headlines for the fixed trending topics.
    pub async fn trending_news(&self) -> CategoryNews {
        let endpoint = Endpoint::TopHeadlines {
            page_size: self.config.trending_page_size,
        };
        let queries = self
            .config
            .trending_topics
            .iter()
            .map(|topic| (topic.clone(), topic.clone()));
        self.fan_out(queries, endpoint).await
    }

    async fn fan_out(
        &self,
        queries: impl Iterator<Item = (String, String)>,
        endpoint: Endpoint,
    ) -> CategoryNews {
        let cap = self.config.category_cap;
        let results: Vec<(String, Result<Vec<NewsArticle>>)> = stream::iter(queries)
            .map(|(label, term)| async move {
                let outcome = self.fetch(&term, endpoint).await;
                (label, outcome)
            })
            .buffered(self.config.max_concurrent_requests.max(1))
            .collect()
            .await;

        let mut news = CategoryNews::default();
        for (label, outcome) in results {
            match outcome {
                Ok(articles) => {
                    news.articles
                        .insert(label, with_preview_images(articles, cap));
                }
                Err(err) => {
                    warn!(category = %label, error = %err, "failed to fetch category news");
                    news.failures.insert(label, err);
                }
            }
        }
        news
    }

    fn request_url(&self, query: &str, endpoint: Endpoint) -> Result<Url> {
        let path = match endpoint {
            Endpoint::Everything => "everything",
            Endpoint::TopHeadlines { .. } => "top-headlines",
        };
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| PulseError::Config(format!("invalid news endpoint: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("q", query);
            if let Endpoint::TopHeadlines { page_size } = endpoint {
                pairs.append_pair("pageSize", &page_size.to_string());
            }
            pairs.append_pair("apiKey", &self.config.api_key);
        }
        Ok(url)
    }

    async fn fetch(&self, query: &str, endpoint: Endpoint) -> Result<Vec<NewsArticle>> {
        let url = self.request_url(query, endpoint)?;
        debug!(query, ?endpoint, "requesting news");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        // Error bodies share the envelope; fall back to the bare status.
        let body = serde_json::from_slice::<ArticlesResponse>(&bytes);
        if !status.is_success() {
            let message = body
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    PulseError::Unauthorized(message)
                }
                _ => PulseError::Http { status, message },
            });
        }

        let body = body?;
        if body.status != "ok" {
            let code = body.code.unwrap_or_default();
            let message = body.message.unwrap_or(code);
            return Err(PulseError::Http { status, message });
        }
        debug!(
            query,
            total = body.total_results,
            returned = body.articles.len(),
            "news response"
        );
        Ok(body.articles)
    }
}
