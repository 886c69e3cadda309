use tracing::{info, warn};

use crate::backend::{BackendClient, User};
use crate::error::{PulseError, Result};
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScreen {
    Login,
    Signup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Home,
    Trending,
    Profile,
    Browse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Auth(AuthScreen),
    App(Tab),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unauthenticated,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Unauthenticated => None,
        }
    }

    /// Where navigation starts for this state.
    pub fn route(&self) -> Route {
        match self {
            SessionState::Authenticated(_) => Route::App(Tab::Home),
            SessionState::Unauthenticated => Route::Auth(AuthScreen::Login),
        }
    }
}

/// Owns the signed-in state. Login, signup and logout are the only ways
/// it changes.
pub struct SessionController {
    backend: BackendClient,
    state: SessionState,
}

impl SessionController {
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            state: SessionState::Unauthenticated,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    /// Resolves the initial route from the backend's view of the session.
    /// An unreachable backend counts as signed out.
    pub async fn launch(&mut self) -> Route {
        self.state = match self.backend.get_current_user().await {
            Ok(Some(user)) => {
                info!(user = %user.id, "resuming session");
                SessionState::Authenticated(user)
            }
            Ok(None) => SessionState::Unauthenticated,
            Err(e) => {
                warn!(error = %e, "could not check session at launch");
                SessionState::Unauthenticated
            }
        };
        self.state.route()
    }

    pub async fn log_in(&mut self, email: &str, password: &str) -> Result<Route> {
        validation::login(email, password)?;
        self.backend.login(email, password).await?;
        self.enter().await
    }

    pub async fn sign_up(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        repeat_password: &str,
    ) -> Result<Route> {
        validation::signup(name, email, password, repeat_password)?;
        self.backend.create_account(email, password, name).await?;
        self.enter().await
    }

    /// Always ends signed out; a failed remote logout is still returned.
    pub async fn log_out(&mut self) -> Result<Route> {
        let outcome = self.backend.logout().await;
        self.state = SessionState::Unauthenticated;
        outcome.map(|()| self.state.route())
    }

    /// Replaces the cached user after a profile change.
    pub fn refresh_user(&mut self, user: User) {
        if let SessionState::Authenticated(current) = &mut self.state {
            *current = user;
        }
    }

    async fn enter(&mut self) -> Result<Route> {
        let user = self
            .backend
            .get_current_user()
            .await?
            .ok_or_else(|| PulseError::Unauthorized("Login failed".into()))?;
        info!(user = %user.id, "signed in");
        self.state = SessionState::Authenticated(user);
        Ok(self.state.route())
    }
}
