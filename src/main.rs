use std::time::Duration;
use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, ValueEnum};
use tracing::{error, info};
use reddit_new::reddit::{Credentials, DirectBackend, Listing, Reddit, RedditConfig, DEFAULT_LIMIT};
use reddit_new::reddit::config::{ACCESS_TOKEN_URL, API_URL, USER_AGENT};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[clap(long = "username", short = 'u', value_parser = NonEmptyStringValueParser::new())]
    username: String,

    #[clap(long = "password", short = 'p', value_parser = NonEmptyStringValueParser::new())]
    password: String,

    #[clap(long = "client-id", value_parser = NonEmptyStringValueParser::new())]
    client_id: String,

    #[clap(long = "client-secret", value_parser = NonEmptyStringValueParser::new())]
    client_secret: String,

    /// Subreddit path, e.g. r/postrock
    #[clap(long = "subreddit", short = 's', value_parser = NonEmptyStringValueParser::new())]
    subreddit: String,

    /// Number of posts to request
    #[clap(long = "limit", short = 'l', default_value_t = DEFAULT_LIMIT, value_parser = clap::value_parser!(u32).range(1..))]
    limit: u32,

    #[clap(long = "token-url", default_value = ACCESS_TOKEN_URL)]
    token_url: String,

    #[clap(long = "api-url", default_value = API_URL)]
    api_url: String,

    #[clap(long = "user-agent", default_value = USER_AGENT)]
    user_agent: String,

    /// Per-request timeout; unset waits forever
    #[clap(long = "timeout-secs")]
    timeout_secs: Option<u64>,

    #[clap(long = "format", short = 'f', value_enum, default_value_t = Format::Summary)]
    format: Format,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Format {
    /// One line per post
    Summary,
    /// The whole decoded listing
    Json,
}

impl Cli {
    pub fn reddit_config(&self) -> Result<RedditConfig> {
        let mut config = RedditConfig::new(&self.token_url, &self.api_url)?;
        config.user_agent = self.user_agent.clone();
        config.timeout = self.timeout_secs.map(Duration::from_secs);
        Ok(config)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.username, &self.password, &self.client_id, &self.client_secret)
    }
}

fn print_listing(listing: &Listing, format: Format) -> Result<()> {
    match format {
        Format::Summary => {
            for post in listing.posts() {
                let created = post.created_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                println!("{created} [{}] u/{}: {} ({})", post.score, post.author, post.title, post.permalink);
            }
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(listing)?);
        }
    }
    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let backend = DirectBackend::new(cli.reddit_config()?)?;
    let reddit = Reddit::login(backend, &cli.credentials(), cli.limit).await
        .context("Failed to initialize Reddit client")?;

    let listing = reddit.read(&cli.subreddit).await
        .with_context(|| format!("Failed to read {}", cli.subreddit))?;
    info!("Response received with {} posts", listing.len());

    print_listing(&listing, cli.format)
}

#[tokio::main]
async fn main() {
    // install global collector configured based on RUST_LOG env var.
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    info!("Application has started with the following flags...");
    info!("username: {}", cli.username);
    info!("client-id: {}", cli.client_id);
    info!("subreddit: {}", cli.subreddit);
    info!("limit: {}", cli.limit);

    if let Err(e) = run(&cli).await {
        error!("{e:#}");
        std::process::exit(1);
    }
}
