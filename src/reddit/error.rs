use reqwest::StatusCode;
use strum::Display;
use thiserror::Error;

/// Which of the two API round trips an error came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Stage {
    #[strum(serialize = "access token")]
    Authenticate,
    #[strum(serialize = "listing")]
    Fetch,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("No subreddit provided")]
    EmptySubreddit,

    #[error("Invalid endpoint url: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unable to create http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Error during {stage} request creation: {source}")]
    RequestBuild {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error during {stage} fetch: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("Error response code from {stage} api: {status} {body}")]
    Status {
        stage: Stage,
        status: StatusCode,
        body: String,
    },

    #[error("Error decoding {stage} response: {source}")]
    Decode {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },

    #[error("Fetch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::RequestBuild { stage, .. }
            | Error::Transport { stage, .. }
            | Error::Status { stage, .. }
            | Error::Decode { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_stage_and_code() {
        let err = Error::Status {
            stage: Stage::Authenticate,
            status: StatusCode::UNAUTHORIZED,
            body: "{\"error\": 401}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("access token"));
        assert!(msg.contains("401"));
        assert_eq!(err.stage(), Some(Stage::Authenticate));
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    }

    #[test]
    fn precondition_has_no_stage() {
        assert_eq!(Error::EmptySubreddit.stage(), None);
        assert_eq!(Error::EmptySubreddit.status(), None);
    }
}
