use std::time::Duration;
use url::Url;

use crate::reddit::Error;

pub const ACCESS_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
pub const API_URL: &str = "https://oauth.reddit.com";
pub const USER_AGENT: &str = "reddit-bot";
pub const DEFAULT_LIMIT: u32 = 5;

/// Endpoints and request settings shared by every call a backend makes.
#[derive(Clone, Debug)]
pub struct RedditConfig {
    pub token_url: Url,
    pub api_url: Url,
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl RedditConfig {
    pub fn new(token_url: &str, api_url: &str) -> Result<Self, Error> {
        Ok(Self {
            token_url: Url::parse(token_url)?,
            api_url: Url::parse(api_url)?,
            user_agent: USER_AGENT.to_string(),
            timeout: None,
        })
    }

    /// Url of the newest-posts listing for `subreddit`, e.g. `r/rust`.
    pub fn read_url(&self, subreddit: &str) -> Result<Url, Error> {
        build_read_url(&self.api_url, subreddit)
    }
}

impl Default for RedditConfig {
    fn default() -> Self {
        Self {
            token_url: Url::parse(ACCESS_TOKEN_URL).expect("static url"),
            api_url: Url::parse(API_URL).expect("static url"),
            user_agent: USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

pub fn normalize_subreddit(subreddit: &str) -> Result<&str, Error> {
    let subreddit = subreddit.trim().trim_matches('/');
    if subreddit.is_empty() {
        return Err(Error::EmptySubreddit);
    }
    Ok(subreddit)
}

pub fn build_read_url(api_url: &Url, subreddit: &str) -> Result<Url, Error> {
    let subreddit = normalize_subreddit(subreddit)?;
    let base = api_url.as_str().trim_end_matches('/');
    Ok(Url::parse(&format!("{base}/{subreddit}/new.json"))?)
}
