pub const DEFAULT_API_BASE: &str = "https://www.wrike.com/api/v4";
pub const DEFAULT_USER_AGENT: &str = "wrike-board";

#[derive(Clone, Debug)]
pub struct WrikeConfig {
    pub base_url: String,
    pub token: String,
    pub user_agent: String,
}

impl WrikeConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    /// Same settings bound to a different token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn api_root(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}
