pub mod article;
pub mod backend;
pub mod browse;
pub mod categories;
pub mod config;
pub mod error;
pub mod news;
pub mod preferences;
pub mod profile;
pub mod session;
pub mod validation;

pub use article::{ArticleSource, NewsArticle};
pub use backend::{BackendClient, Session, User};
pub use browse::{BrowseFlow, ToggleOutcome};
pub use categories::{query_term, BROWSE_CATEGORIES};
pub use config::{BackendConfig, NewsConfig, PulseConfig};
pub use error::{ErrorKind, PulseError, ValidationError};
pub use news::{CategoryNews, NewsClient};
pub use preferences::{CategorySelection, PreferenceDocument};
pub use profile::ProfileFlow;
pub use session::{AuthScreen, Route, SessionController, SessionState, Tab};
