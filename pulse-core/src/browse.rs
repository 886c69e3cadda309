use tracing::{debug, info, warn};

use crate::backend::{BackendClient, User};
use crate::error::{ErrorKind, PulseError, Result};
use crate::news::{CategoryNews, NewsClient};
use crate::preferences::{CategorySelection, PreferenceDocument};

/// Result of a single category toggle.
#[derive(Debug)]
pub struct ToggleOutcome {
    pub label: String,
    pub selected: bool,
    /// Local selection right after the toggle, in selection order.
    pub selection: Vec<String>,
    pub persisted: Result<PreferenceDocument>,
}

impl ToggleOutcome {
    pub fn message(&self) -> String {
        match &self.persisted {
            Ok(_) => "Preferences updated successfully".to_string(),
            Err(e) => e.user_message(),
        }
    }
}

/// State behind the Browse tab: the selected categories, the id of the
/// user's preference document once known, and the news shown per category.
/// All of it belongs to `owner`; a different signed-in user starts empty.
pub struct BrowseFlow {
    backend: BackendClient,
    news: NewsClient,
    owner: Option<String>,
    selection: CategorySelection,
    document_id: Option<String>,
    articles: CategoryNews,
}

impl BrowseFlow {
    pub fn new(backend: BackendClient, news: NewsClient) -> Self {
        Self {
            backend,
            news,
            owner: None,
            selection: CategorySelection::new(),
            document_id: None,
            articles: CategoryNews::default(),
        }
    }

    pub fn selection(&self) -> &CategorySelection {
        &self.selection
    }

    pub fn document_id(&self) -> Option<&str> {
        self.document_id.as_deref()
    }

    pub fn news(&self) -> &CategoryNews {
        &self.articles
    }

    /// Drops the selection, cached document id and news. Call on logout and
    /// after a new sign-in.
    pub fn reset(&mut self) {
        self.owner = None;
        self.selection.clear();
        self.document_id = None;
        self.articles = CategoryNews::default();
    }

    /// Binds the cached state to `user`, discarding another user's state.
    fn adopt(&mut self, user: &User) {
        if self.owner.as_deref() == Some(user.id.as_str()) {
            return;
        }
        if let Some(previous) = &self.owner {
            debug!(
                previous = %previous,
                user = %user.id,
                "browse state belongs to another user, clearing"
            );
        }
        self.reset();
        self.owner = Some(user.id.clone());
    }

    /// Loads the saved selection and the news for it. Returns whether a
    /// preference document exists for the user.
    pub async fn on_focus(&mut self) -> Result<bool> {
        let user = self.current_user().await?;
        self.adopt(&user);
        let found = match self.backend.get_preferences(&user.id).await {
            Ok(doc) => {
                debug!(
                    document = %doc.id,
                    count = doc.interested_categories.len(),
                    "saved selection loaded"
                );
                self.selection.replace_all(doc.interested_categories);
                self.document_id = Some(doc.id);
                true
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.selection.clear();
                self.document_id = None;
                false
            }
            Err(e) => return Err(e),
        };
        self.refresh_news().await;
        Ok(found)
    }

    /// Flips `label`, persists the new selection, then reloads news. A failed
    /// save is reported in the outcome and the local selection is kept.
    pub async fn toggle(&mut self, label: &str) -> ToggleOutcome {
        let user = self.current_user().await;
        if let Ok(user) = &user {
            self.adopt(user);
        }
        let selected = self.selection.toggle(label);
        let selection = self.selection.as_slice().to_vec();
        info!(category = %label, selected, "category toggled");

        let persisted = match user {
            Ok(user) => self.persist(&user, &selection).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &persisted {
            warn!(category = %label, error = %e, "selection not persisted");
        }
        self.refresh_news().await;

        ToggleOutcome {
            label: label.to_owned(),
            selected,
            selection,
            persisted,
        }
    }

    /// Fetches news for every selected category.
    pub async fn refresh_news(&mut self) {
        if self.selection.is_empty() {
            self.articles = CategoryNews::default();
            return;
        }
        self.articles = self.news.category_news(self.selection.as_slice()).await;
    }

    async fn persist(&mut self, user: &User, categories: &[String]) -> Result<PreferenceDocument> {
        if let Some(id) = self.document_id.clone() {
            match self.backend.save_preferences(&id, &user.id, categories).await {
                Ok(doc) => return Ok(doc),
                // Deleted elsewhere; look it up again below.
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(document = %id, "cached preference document is gone");
                    self.document_id = None;
                }
                Err(e) => return Err(e),
            }
        }

        // No known id: another device may already have created the document.
        let doc = match self.backend.get_preferences(&user.id).await {
            Ok(existing) => {
                self.backend
                    .save_preferences(&existing.id, &user.id, categories)
                    .await?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.backend.create_preferences(&user.id, categories).await?
            }
            Err(e) => return Err(e),
        };
        self.document_id = Some(doc.id.clone());
        Ok(doc)
    }

    async fn current_user(&self) -> Result<User> {
        self.backend
            .get_current_user()
            .await?
            .ok_or_else(|| PulseError::Unauthorized(String::new()))
    }
}
