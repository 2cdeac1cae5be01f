use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub base_url: String,
    pub session_token: Option<String>,
    pub session_cookie_name: String,
    pub gmail_api_path: String,
    pub gmail_upsert_path: String,
    pub file_upsert_path: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub log_level: String,
}

impl AppConfig {
    /// Returns the session cookie value, or an error naming the variable to set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when `DKIMDB_SESSION_TOKEN` is unset.
    pub fn require_session_token(&self) -> Result<&str, ConfigError> {
        self.session_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DKIMDB_SESSION_TOKEN".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("base_url", &self.base_url)
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[redacted]"),
            )
            .field("session_cookie_name", &self.session_cookie_name)
            .field("gmail_api_path", &self.gmail_api_path)
            .field("gmail_upsert_path", &self.gmail_upsert_path)
            .field("file_upsert_path", &self.file_upsert_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("log_level", &self.log_level)
            .finish()
    }
}
