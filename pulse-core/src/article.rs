use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleSource {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub url: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url_to_image: Option<String>,
    #[serde(default)]
    pub source: Option<ArticleSource>,
}

impl NewsArticle {
    pub fn has_preview_image(&self) -> bool {
        self.url_to_image
            .as_deref()
            .map(|u| !u.trim().is_empty())
            .unwrap_or(false)
    }

    pub fn source_name(&self) -> Option<&str> {
        self.source.as_ref().map(|s| s.name.as_str())
    }

    /// Text used when sharing an article.
    pub fn share_text(&self) -> String {
        format!(
            "{}\n\n{}\n\nRead more: {}",
            self.title, self.description, self.url
        )
    }
}

/// Keeps articles with a preview image, at most `cap` of them.
pub fn with_preview_images(articles: Vec<NewsArticle>, cap: usize) -> Vec<NewsArticle> {
    articles
        .into_iter()
        .filter(NewsArticle::has_preview_image)
        .take(cap)
        .collect()
}

/// Envelope returned by both news endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ArticlesResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<NewsArticle>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(image: Option<&str>) -> NewsArticle {
        NewsArticle {
            title: "Title".into(),
            description: "Desc".into(),
            url: "https://example.com/a".into(),
            published_at: None,
            author: None,
            content: None,
            url_to_image: image.map(str::to_owned),
            source: None,
        }
    }

    #[test]
    fn decodes_news_api_shape() {
        let json = r#"{
            "source": { "id": null, "name": "Wire" },
            "author": null,
            "title": "Headline",
            "description": null,
            "url": "https://example.com/1",
            "urlToImage": "https://example.com/1.jpg",
            "publishedAt": "2024-10-21T07:28:00Z",
            "content": "Body"
        }"#;
        let a: NewsArticle = serde_json::from_str(json).unwrap();
        assert_eq!(a.title, "Headline");
        assert_eq!(a.description, "");
        assert_eq!(a.source_name(), Some("Wire"));
        assert!(a.has_preview_image());
        assert_eq!(
            a.published_at.unwrap().to_rfc3339(),
            "2024-10-21T07:28:00+00:00"
        );
    }

    #[test]
    fn unparsable_timestamp_becomes_none() {
        let json = r#"{ "title": "t", "url": "u", "publishedAt": "yesterday" }"#;
        let a: NewsArticle = serde_json::from_str(json).unwrap();
        assert!(a.published_at.is_none());
    }

    #[test]
    fn blank_image_is_not_a_preview() {
        assert!(!article(Some("   ")).has_preview_image());
        assert!(!article(None).has_preview_image());
    }

    #[test]
    fn filter_drops_imageless_then_caps() {
        let list = vec![
            article(None),
            article(Some("a.jpg")),
            article(Some("")),
            article(Some("b.jpg")),
            article(Some("c.jpg")),
        ];
        let kept = with_preview_images(list, 2);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(NewsArticle::has_preview_image));
        assert_eq!(kept[0].url_to_image.as_deref(), Some("a.jpg"));
    }

    #[test]
    fn share_text_has_link_last() {
        let text = article(None).share_text();
        assert!(text.starts_with("Title\n\nDesc"));
        assert!(text.ends_with("Read more: https://example.com/a"));
    }
}
