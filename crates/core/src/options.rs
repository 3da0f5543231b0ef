use std::time::Duration;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_KIND: &str = "asr";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) ",
    "AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.5 Safari/605.1.15"
);

/// Caller-supplied settings for one download call.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Preferred caption language, e.g. `"en"`.
    pub language: String,
    /// `"asr"` for auto-generated captions, anything else for authored ones.
    pub kind: String,
    /// Overall deadline covering both round trips and all backoff sleeps.
    pub timeout: Duration,
    /// Size of the retry budget; each unit buys ten seconds of backoff.
    pub max_retries: u32,
    pub user_agent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            kind: DEFAULT_KIND.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Options {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
