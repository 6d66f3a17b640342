use std::fmt;
use serde::Deserialize;
use url::form_urlencoded;

/// Resource owner and OAuth client credentials for the password grant.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    /// `application/x-www-form-urlencoded` body for the token request.
    pub fn token_form(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", "password")
            .append_pair("username", &self.username)
            .append_pair("password", &self.password)
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Token endpoint reply. Everything except the token itself is ignored.
#[derive(Deserialize, Debug)]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn token_form_round_trip() {
        let creds = Credentials::new("spez", "p&ss=word ü", "client", "secret");
        let body = creds.token_form();
        let fields: HashMap<String, String> = form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect();
        assert_eq!(fields["grant_type"], "password");
        assert_eq!(fields["username"], "spez");
        assert_eq!(fields["password"], "p&ss=word ü");
        assert!(!fields.contains_key("client_secret"));
    }

    #[test]
    fn debug_hides_secrets() {
        let creds = Credentials::new("spez", "hunter2", "client", "topsecret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("spez"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("topsecret"));

        let token = AccessToken::new("abc123");
        assert!(!format!("{token:?}").contains("abc123"));
    }

    #[test]
    fn token_response_requires_access_token() {
        let ok: TokenResponse = serde_json::from_str(
            r#"{"access_token": "abc", "token_type": "bearer", "expires_in": 86400, "scope": "*"}"#,
        ).unwrap();
        assert_eq!(ok.access_token, "abc");
        assert!(serde_json::from_str::<TokenResponse>(r#"{"error": "invalid_grant"}"#).is_err());
    }
}
