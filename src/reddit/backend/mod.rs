use async_trait::async_trait;
use crate::reddit::auth::{AccessToken, Credentials};
use crate::reddit::error::Error;
use crate::reddit::listing::Listing;

pub mod direct;

#[async_trait]
pub trait RedditRequestBackend: Sync + Send {
    async fn request_access_token(&self, credentials: &Credentials) -> Result<AccessToken, Error>;

    async fn fetch_new(&self, token: &AccessToken, subreddit: &str, limit: u32) -> Result<Listing, Error>;
}
