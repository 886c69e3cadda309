use pulse_core::{Route, BROWSE_CATEGORIES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login,
    Signup,
    Home,
    Trending,
    Browse,
    Toggle(String),
    Search(String),
    Open(usize),
    Show(usize),
    Profile,
    Name,
    Email,
    Password,
    Logout,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };
        match head.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "login" => Command::Login,
            "signup" => Command::Signup,
            "home" => Command::Home,
            "trending" => Command::Trending,
            "browse" => Command::Browse,
            "toggle" if !rest.is_empty() => Command::Toggle(rest.to_string()),
            "search" if !rest.is_empty() => Command::Search(rest.to_string()),
            "open" => index(rest).map_or_else(|| Command::Unknown(line.into()), Command::Open),
            "show" => index(rest).map_or_else(|| Command::Unknown(line.into()), Command::Show),
            "profile" => Command::Profile,
            "name" => Command::Name,
            "email" => Command::Email,
            "password" => Command::Password,
            "logout" => Command::Logout,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }

    /// Whether the command belongs to the stack `route` is on.
    pub fn available_on(&self, route: Route) -> bool {
        match self {
            Command::Help | Command::Quit | Command::Empty | Command::Unknown(_) => true,
            Command::Login | Command::Signup => matches!(route, Route::Auth(_)),
            _ => matches!(route, Route::App(_)),
        }
    }
}

fn index(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().filter(|n| *n > 0)
}

/// Accepts a 1-based position in the category list or a label, matched
/// case-insensitively against known labels.
pub fn resolve_category(arg: &str) -> String {
    if let Some(n) = index(arg) {
        if let Some(label) = BROWSE_CATEGORIES.get(n - 1) {
            return label.to_string();
        }
    }
    BROWSE_CATEGORIES
        .iter()
        .find(|label| label.eq_ignore_ascii_case(arg))
        .map(|label| label.to_string())
        .unwrap_or_else(|| arg.to_string())
}

pub fn help(route: Route) -> &'static str {
    match route {
        Route::Auth(_) => "commands: login, signup, help, quit",
        Route::App(_) => {
            "commands: home, trending, browse, toggle <n|label>, search <keyword>, \
             show <n>, open <n>, profile, name, email, password, logout, help, quit"
        }
    }
}
