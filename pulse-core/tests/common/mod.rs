#![allow(dead_code)]

use pulse_core::{BackendClient, BackendConfig, NewsClient, NewsConfig};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const DOCUMENTS: &str = "/databases/newspulse/collections/preferences/documents";

pub fn backend(server: &MockServer) -> BackendClient {
    let config = BackendConfig {
        endpoint: server.uri(),
        project_id: "proj".into(),
        ..BackendConfig::default()
    };
    BackendClient::new(config).unwrap()
}

pub fn news(server: &MockServer) -> NewsClient {
    let config = NewsConfig {
        base_url: format!("{}/v2/", server.uri()),
        api_key: "test-key".into(),
        ..NewsConfig::default()
    };
    NewsClient::new(config).unwrap()
}

pub fn user_json(id: &str) -> Value {
    json!({ "$id": id, "name": "Ann", "email": "ann@example.com", "status": true })
}

pub fn document_json(id: &str, user: &str, categories: &[&str]) -> Value {
    json!({
        "$id": id,
        "$collectionId": "preferences",
        "userid": user,
        "interested_categories": categories,
    })
}

/// `with_image` articles carrying a preview image followed by
/// `without_image` that lack one.
pub fn articles_json(tag: &str, with_image: usize, without_image: usize) -> Value {
    let mut articles = Vec::new();
    for i in 0..without_image {
        articles.push(json!({
            "source": { "id": null, "name": "Wire" },
            "title": format!("{tag} plain {i}"),
            "description": "no picture",
            "url": format!("https://news.example/{tag}/plain/{i}"),
            "urlToImage": null,
            "publishedAt": "2024-10-21T07:28:00Z"
        }));
    }
    for i in 0..with_image {
        articles.push(json!({
            "source": { "id": null, "name": "Wire" },
            "title": format!("{tag} {i}"),
            "description": "with picture",
            "url": format!("https://news.example/{tag}/{i}"),
            "urlToImage": format!("https://img.example/{tag}/{i}.jpg"),
            "publishedAt": "2024-10-21T08:00:00Z"
        }));
    }
    json!({ "status": "ok", "totalResults": articles.len(), "articles": articles })
}
