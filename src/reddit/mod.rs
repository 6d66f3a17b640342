use std::sync::Arc;
use tracing::{debug, info};
use crate::reddit::backend::RedditRequestBackend;

pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod listing;

pub use auth::{AccessToken, Credentials};
pub use backend::direct::DirectBackend;
pub use config::{RedditConfig, DEFAULT_LIMIT};
pub use error::{Error, Stage};
pub use listing::{Edited, Listing, Post};

/// An authenticated session. Only obtainable through [`Reddit::login`], so
/// holding one means the token exchange succeeded.
pub struct Reddit {
    backend: Box<dyn RedditRequestBackend>,
    token: AccessToken,
    limit: u32,
}

impl Reddit {
    pub async fn login(backend: Box<dyn RedditRequestBackend>, credentials: &Credentials, limit: u32) -> Result<Arc<Self>, Error> {
        let token = backend.request_access_token(credentials).await?;
        info!("Reddit client initialized for {}", credentials.username);
        Ok(Arc::new(Reddit {
            backend,
            token,
            limit,
        }))
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Fetches the newest page of `subreddit` on the calling task.
    pub async fn fetch_new(&self, subreddit: &str) -> Result<Listing, Error> {
        let subreddit = config::normalize_subreddit(subreddit)?;
        debug!("Fetching {} newest posts from {subreddit}", self.limit);
        self.backend.fetch_new(&self.token, subreddit, self.limit).await
    }

    /// Runs the fetch on its own task and waits for its single outcome.
    pub async fn read(self: &Arc<Self>, subreddit: &str) -> Result<Listing, Error> {
        let subreddit = config::normalize_subreddit(subreddit)?.to_string();
        let reddit = self.clone();
        let handle = tokio::spawn(async move {
            reddit.fetch_new(&subreddit).await
        });
        handle.await?
    }
}
