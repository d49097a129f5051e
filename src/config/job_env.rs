/// Fallback API address when the worker exports neither base URL
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Values the platform exports into every job's environment
#[derive(Debug, Clone, Default)]
pub struct JobEnv {
    pub workspace: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub base_internal_url: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
}

impl JobEnv {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            workspace: lookup("WM_WORKSPACE"),
            token: lookup("WM_TOKEN"),
            base_url: lookup("BASE_URL"),
            base_internal_url: lookup("BASE_INTERNAL_URL"),
            email: lookup("WM_EMAIL"),
            username: lookup("WM_USERNAME"),
        }
    }

    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }

    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or("")
    }

    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or("")
    }

    /// Base URL handed to the workflow CLI, always with a trailing slash
    pub fn cli_base_url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        format!("{}/", base)
    }

    /// Address for direct API calls; the internal URL wins when set
    pub fn api_base_url(&self) -> &str {
        self.base_internal_url
            .as_deref()
            .or(self.base_url.as_deref())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}
