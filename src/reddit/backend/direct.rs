use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request, Response, StatusCode};
use tracing::{debug, info};
use crate::reddit::auth::{AccessToken, Credentials, TokenResponse};
use crate::reddit::backend::RedditRequestBackend;
use crate::reddit::config::RedditConfig;
use crate::reddit::error::{Error, Stage};
use crate::reddit::listing::Listing;

pub struct DirectBackend {
    client: Client,
    config: RedditConfig,
}

impl DirectBackend {
    pub fn new(config: RedditConfig) -> Result<Box<Self>, Error> {
        let client = Client::builder();
        let client = client.user_agent(config.user_agent.clone());
        let client = match config.timeout {
            Some(timeout) => client.timeout(timeout),
            None => client,
        };
        let client = client.build().map_err(Error::Client)?;
        Ok(Box::new(DirectBackend {
            client,
            config,
        }))
    }

    async fn execute(&self, stage: Stage, request: Request) -> Result<Vec<u8>, Error> {
        debug!("Sending {stage} request to {}", request.url());
        let resp: Response = self.client.execute(request).await
            .map_err(|source| Error::Transport { stage, source })?;
        let status = resp.status();
        let accepted = match stage {
            Stage::Authenticate => status == StatusCode::OK,
            Stage::Fetch => status.is_success(),
        };
        if !accepted {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Status { stage, status, body });
        }
        let body = resp.bytes().await
            .map_err(|source| Error::Transport { stage, source })?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl RedditRequestBackend for DirectBackend {
    async fn request_access_token(&self, credentials: &Credentials) -> Result<AccessToken, Error> {
        let stage = Stage::Authenticate;
        let req = self.client.post(self.config.token_url.clone());
        let req = req.basic_auth(&credentials.client_id, Some(&credentials.client_secret));
        let req = req.header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        let req = req.body(credentials.token_form());
        let req = req.build().map_err(|source| Error::RequestBuild { stage, source })?;

        info!("Requesting access token for {}...", credentials.username);
        let body = self.execute(stage, req).await?;
        let token: TokenResponse = serde_json::from_slice(&body)
            .map_err(|source| Error::Decode { stage, source })?;
        Ok(AccessToken::new(token.access_token))
    }

    async fn fetch_new(&self, token: &AccessToken, subreddit: &str, limit: u32) -> Result<Listing, Error> {
        let stage = Stage::Fetch;
        let url = self.config.read_url(subreddit)?;
        let req = self.client.get(url);
        let req = req.query(&[("limit", limit)]);
        let req = req.header(AUTHORIZATION, format!("Bearer {}", token.as_str()));
        let req = req.build().map_err(|source| Error::RequestBuild { stage, source })?;

        let body = self.execute(stage, req).await?;
        let listing = Listing::from_slice(&body)?;
        info!("Read and parsed {} posts from {subreddit}", listing.len());
        Ok(listing)
    }
}
