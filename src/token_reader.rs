use std::{collections::HashMap, future::Future};

use async_trait::async_trait;
use reqwest::Response;
use serde::Deserialize;

use crate::{Error, KeyPair, Result, TokenError, TokenResult};

const OAUTH_TOKEN_KEY: &str = "oauth_token";

const OAUTH_TOKEN_SECRET_KEY: &str = "oauth_token_secret";

/// A temporary or access credential returned by a token endpoint, parsed
/// from its form-encoded response body.
#[derive(Deserialize, Debug)]
pub struct TokenResponse {
    /// OAuth Token
    pub oauth_token: String,
    /// OAuth Token Secret
    pub oauth_token_secret: String,
    /// Other response attributes (e.g. `oauth_callback_confirmed`)
    #[serde(flatten)]
    pub remain: HashMap<String, String>,
}

impl TokenResponse {
    /// View the credential as a [`KeyPair`], ready for
    /// [`Secrets::token`](crate::Secrets::token).
    pub fn token_pair(&self) -> KeyPair<'_> {
        KeyPair::new(&*self.oauth_token, &*self.oauth_token_secret)
    }
}

/// Add parse_oauth_token feature to reqwest::Response.
// this trait is sealed
#[async_trait(?Send)]
pub trait TokenReader: private::Sealed {
    async fn parse_oauth_token(self) -> Result<TokenResponse>;
}

#[async_trait(?Send)]
impl TokenReader for Response {
    async fn parse_oauth_token(self) -> Result<TokenResponse> {
        let text = self.text().await?;
        Ok(read_oauth_token(&text)?)
    }
}

/// Add parse_oauth_token feature to Future of reqwest::Response.
// this trait is also sealed
#[async_trait(?Send)]
pub trait TokenReaderFuture: private::SealedWrapper {
    async fn parse_oauth_token(self) -> Result<TokenResponse>;
}

#[async_trait(?Send)]
impl<T, E> TokenReaderFuture for T
where
    T: Future<Output = std::result::Result<Response, E>>,
    E: Into<Error> + 'static,
{
    async fn parse_oauth_token(self) -> Result<TokenResponse> {
        match self.await {
            Ok(resp) => Ok(resp.parse_oauth_token().await?),
            Err(err) => Err(err.into()),
        }
    }
}

fn read_oauth_token(text: &str) -> TokenResult<TokenResponse> {
    let mut pairs: HashMap<String, String> = url::form_urlencoded::parse(text.as_bytes())
        .into_owned()
        .collect();
    let oauth_token = pairs.remove(OAUTH_TOKEN_KEY);
    let oauth_token_secret = pairs.remove(OAUTH_TOKEN_SECRET_KEY);
    match (oauth_token, oauth_token_secret) {
        (Some(token), Some(secret)) => Ok(TokenResponse {
            oauth_token: token,
            oauth_token_secret: secret,
            remain: pairs,
        }),
        (None, _) => Err(TokenError::KeyNotFound(OAUTH_TOKEN_KEY, text.to_string())),
        (_, _) => Err(TokenError::KeyNotFound(
            OAUTH_TOKEN_SECRET_KEY,
            text.to_string(),
        )),
    }
}

mod private {
    use std::future::Future;

    use reqwest::Response;

    use crate::Error;

    pub trait Sealed {}
    impl Sealed for Response {}
    pub trait SealedWrapper {}
    impl<T, E> SealedWrapper for T
    where
        T: Future<Output = Result<Response, E>>,
        E: Into<Error>,
    {
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn parse_response_typical() {
        let resp = "oauth_token=hh5s93j4hdidpola&oauth_token_secret=hdhd0244k9j7ao03&oauth_callback_confirmed=true";
        for parsed in &[
            read_oauth_token(resp).unwrap(),
            serde_urlencoded::from_str::<TokenResponse>(resp).unwrap(),
        ] {
            assert_eq!(parsed.oauth_token, "hh5s93j4hdidpola");
            assert_eq!(parsed.oauth_token_secret, "hdhd0244k9j7ao03");
            assert_eq!(parsed.remain.len(), 1);
            assert_eq!(
                parsed.remain.get("oauth_callback_confirmed").unwrap(),
                "true"
            );
        }
    }

    #[test]
    fn parse_response_escaped_values() {
        let resp = "oauth_token=ab%2Fcd&oauth_token_secret=e+f";
        let parsed = read_oauth_token(resp).unwrap();
        assert_eq!(parsed.oauth_token, "ab/cd");
        assert_eq!(parsed.oauth_token_secret, "e f");
        assert!(parsed.remain.is_empty());
    }

    #[test]
    fn parse_minimal() {
        let parsed = read_oauth_token("oauth_token&oauth_token_secret").unwrap();
        assert_eq!(parsed.oauth_token, "");
        assert_eq!(parsed.oauth_token_secret, "");
        assert_eq!(parsed.remain.len(), 0);
    }

    #[test]
    fn parse_token_notfound() {
        let resp = "oauth_token_secret=";
        match read_oauth_token(resp) {
            Err(TokenError::KeyNotFound(key, body)) => {
                assert_eq!(key, OAUTH_TOKEN_KEY);
                assert_eq!(body, resp);
            }
            other => panic!("unexpected parse result: {:?}", other.map(|t| t.oauth_token)),
        }
    }

    #[test]
    fn parse_token_secret_notfound() {
        let resp = "oauth_token=";
        match read_oauth_token(resp) {
            Err(TokenError::KeyNotFound(key, body)) => {
                assert_eq!(key, OAUTH_TOKEN_SECRET_KEY);
                assert_eq!(body, resp);
            }
            other => panic!("unexpected parse result: {:?}", other.map(|t| t.oauth_token)),
        }
    }

    #[test]
    fn token_pair_borrows_credential() {
        let parsed = read_oauth_token("oauth_token=tk&oauth_token_secret=ts").unwrap();
        let pair = parsed.token_pair();
        assert_eq!(pair.key, "tk");
        assert_eq!(pair.secret, "ts");
    }
}
