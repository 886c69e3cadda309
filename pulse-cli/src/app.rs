use std::io::Write;

use pulse_core::{
    BackendClient, BrowseFlow, CategoryNews, NewsArticle, NewsClient, ProfileFlow, PulseError,
    Route, SessionController, Tab, BROWSE_CATEGORIES,
};
use tokio::io::{self, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

use crate::command::{help, resolve_category, Command};

/// Interactive frontend. Owns the session holder and the per-tab flows; the
/// route decides which commands are accepted.
pub struct PulseApp {
    session: SessionController,
    browse: BrowseFlow,
    profile: ProfileFlow,
    news: NewsClient,
    route: Route,
    /// Articles from the last listing, addressed by `show`/`open`.
    listed: Vec<NewsArticle>,
    input: Lines<BufReader<Stdin>>,
}

impl PulseApp {
    pub fn new(backend: BackendClient, news: NewsClient) -> Self {
        Self {
            session: SessionController::new(backend.clone()),
            browse: BrowseFlow::new(backend.clone(), news.clone()),
            profile: ProfileFlow::new(backend),
            news,
            route: Route::Auth(pulse_core::AuthScreen::Login),
            listed: Vec::new(),
            input: BufReader::new(io::stdin()).lines(),
        }
    }

    pub async fn run(&mut self) -> std::io::Result<()> {
        println!("NEWS PULSE");
        self.route = self.session.launch().await;
        self.enter_route().await;

        loop {
            let Some(line) = self.ask("> ").await? else {
                break;
            };
            let command = Command::parse(&line);
            if !command.available_on(self.route) {
                println!("not available here. {}", help(self.route));
                continue;
            }
            match command {
                Command::Quit => break,
                Command::Empty => {}
                Command::Help => println!("{}", help(self.route)),
                Command::Unknown(text) => println!("unknown command: {text}. {}", help(self.route)),
                Command::Login => self.login().await?,
                Command::Signup => self.signup().await?,
                Command::Logout => self.logout().await,
                Command::Home => self.go(Tab::Home).await,
                Command::Trending => self.go(Tab::Trending).await,
                Command::Browse => self.go(Tab::Browse).await,
                Command::Profile => self.go(Tab::Profile).await,
                Command::Toggle(arg) => self.toggle(&arg).await,
                Command::Search(keyword) => self.search(&keyword).await,
                Command::Show(n) => self.show(n),
                Command::Open(n) => self.open(n),
                Command::Name => self.update_name().await?,
                Command::Email => self.update_email().await?,
                Command::Password => self.reset_password().await?,
            }
        }
        Ok(())
    }

    async fn ask(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        self.input.next_line().await
    }

    /// Reads one form field; empty once stdin is closed.
    async fn field(&mut self, label: &str) -> std::io::Result<String> {
        Ok(self
            .ask(&format!("{label}: "))
            .await?
            .unwrap_or_default()
            .trim_end_matches(['\r', '\n'])
            .to_string())
    }

    async fn enter_route(&mut self) {
        match self.route {
            Route::Auth(_) => println!("Please log in or sign up. {}", help(self.route)),
            Route::App(tab) => self.go(tab).await,
        }
    }

    async fn go(&mut self, tab: Tab) {
        self.route = Route::App(tab);
        debug!(?tab, "switching tab");
        match tab {
            Tab::Home => {
                if let Some(user) = self.session.state().user() {
                    println!("Welcome, {}!", user.name);
                }
                match self.news.home_feed().await {
                    Ok(articles) => self.list(articles),
                    Err(e) => notice(&e),
                }
            }
            Tab::Trending => {
                let trending = self.news.trending_news().await;
                self.list_grouped(&trending, None);
            }
            Tab::Browse => {
                if let Err(e) = self.browse.on_focus().await {
                    notice(&e);
                }
                self.print_categories();
                self.listed = grouped(
                    self.browse.news(),
                    Some(self.browse.selection().as_slice()),
                );
            }
            Tab::Profile => match self.profile.load().await {
                Ok(user) => {
                    println!("Name:  {}", user.name);
                    println!("Email: {}", user.email);
                    println!("use `name`, `email` or `password` to change them");
                }
                Err(e) => notice(&e),
            },
        }
    }

    async fn login(&mut self) -> std::io::Result<()> {
        self.route = Route::Auth(pulse_core::AuthScreen::Login);
        let email = self.field("email").await?;
        let password = self.field("password").await?;
        match self.session.log_in(&email, &password).await {
            Ok(route) => {
                println!("Login successful");
                self.browse.reset();
                self.route = route;
                self.enter_route().await;
            }
            Err(e) => notice(&e),
        }
        Ok(())
    }

    async fn signup(&mut self) -> std::io::Result<()> {
        self.route = Route::Auth(pulse_core::AuthScreen::Signup);
        let name = self.field("name").await?;
        let email = self.field("email").await?;
        let password = self.field("password").await?;
        let repeat = self.field("repeat password").await?;
        match self.session.sign_up(&name, &email, &password, &repeat).await {
            Ok(route) => {
                println!("Account created");
                self.browse.reset();
                self.route = route;
                self.enter_route().await;
            }
            Err(e) => {
                notice(&e);
                self.route = Route::Auth(pulse_core::AuthScreen::Login);
            }
        }
        Ok(())
    }

    async fn logout(&mut self) {
        match self.session.log_out().await {
            Ok(_) => println!("Logout Successful"),
            Err(e) => {
                warn!(error = %e, "remote logout failed, local session cleared");
                notice(&e);
            }
        }
        self.listed.clear();
        self.browse.reset();
        self.route = self.session.state().route();
        self.enter_route().await;
    }

    async fn toggle(&mut self, arg: &str) {
        self.route = Route::App(Tab::Browse);
        let label = resolve_category(arg);
        let outcome = self.browse.toggle(&label).await;
        println!(
            "{} {} - {}",
            if outcome.selected { "selected" } else { "removed" },
            outcome.label,
            outcome.message()
        );
        self.listed = grouped(self.browse.news(), Some(outcome.selection.as_slice()));
    }

    async fn search(&mut self, keyword: &str) {
        match self.news.search_news(keyword).await {
            Ok(articles) if articles.is_empty() => println!("no results for {keyword}"),
            Ok(articles) => self.list(articles),
            Err(e) => notice(&e),
        }
    }

    fn show(&self, n: usize) {
        let Some(article) = self.listed.get(n - 1) else {
            println!("no article #{n}");
            return;
        };
        println!("{}", article.title);
        if let Some(author) = &article.author {
            println!("By: {author}");
        }
        if let Some(source) = article.source_name() {
            println!("Source: {source}");
        }
        println!("{}", article.description);
        if let Some(content) = &article.content {
            println!("\n{content}");
        }
        println!("Published on: {}", published(article));
        println!("\n--- share ---\n{}", article.share_text());
    }

    fn open(&self, n: usize) {
        match self.listed.get(n - 1) {
            Some(article) => {
                if let Err(e) = webbrowser::open(&article.url) {
                    warn!(error = %e, url = %article.url, "failed to open browser");
                    println!("could not open {}", article.url);
                }
            }
            None => println!("no article #{n}"),
        }
    }

    async fn update_name(&mut self) -> std::io::Result<()> {
        let name = self.field("new name").await?;
        match self.profile.update_name(&name).await {
            Ok(user) => {
                println!("Name updated to {}", user.name);
                self.session.refresh_user(user);
            }
            Err(e) => notice(&e),
        }
        Ok(())
    }

    async fn update_email(&mut self) -> std::io::Result<()> {
        let email = self.field("new email").await?;
        println!("Please enter your current password to update your email address.");
        let password = self.field("password").await?;
        match self.profile.update_email(&email, &password).await {
            Ok(user) => {
                println!("Email updated to {}", user.email);
                self.session.refresh_user(user);
            }
            Err(e) => notice(&e),
        }
        Ok(())
    }

    async fn reset_password(&mut self) -> std::io::Result<()> {
        let old = self.field("old password").await?;
        let new = self.field("new password").await?;
        match self.profile.reset_password(&old, &new).await {
            Ok(_) => println!("Password updated successfully"),
            Err(e) => notice(&e),
        }
        Ok(())
    }

    fn print_categories(&self) {
        println!("Select Categories:");
        for (i, label) in BROWSE_CATEGORIES.iter().enumerate() {
            let mark = if self.browse.selection().contains(label) { "x" } else { " " };
            println!("  [{mark}] {:>2}. {label}", i + 1);
        }
    }

    fn list(&mut self, articles: Vec<NewsArticle>) {
        for (i, article) in articles.iter().enumerate() {
            print_line(i + 1, article);
        }
        self.listed = articles;
    }

    fn list_grouped(&mut self, news: &CategoryNews, order: Option<&[String]>) {
        self.listed = grouped(news, order);
    }
}

/// Prints articles per category and returns them flattened in print order.
fn grouped(news: &CategoryNews, order: Option<&[String]>) -> Vec<NewsArticle> {
    let mut keys: Vec<&String> = match order {
        Some(order) => order.iter().collect(),
        None => news.articles.keys().chain(news.failures.keys()).collect(),
    };
    if order.is_none() {
        keys.sort();
    }

    let mut flat = Vec::new();
    for key in keys {
        if let Some(err) = news.failures.get(key.as_str()) {
            println!("== {key}: {}", err.user_message());
            continue;
        }
        let Some(articles) = news.get(key) else {
            continue;
        };
        println!("== {key}");
        for article in articles {
            flat.push(article.clone());
            print_line(flat.len(), article);
        }
    }
    flat
}

fn print_line(n: usize, article: &NewsArticle) {
    println!("{n:>3}. {} ({})", article.title, published(article));
}

fn published(article: &NewsArticle) -> String {
    article
        .published_at
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string())
}

fn notice(err: &PulseError) {
    debug!(kind = ?err.kind(), error = %err, "showing error notice");
    println!("! {}", err.user_message());
}
