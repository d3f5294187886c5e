use std::borrow::Cow;

use reqwest::{Client as ReqwestClient, Method, RequestBuilder as ReqwestRequestBuilder};

use crate::{AccessToken, KeyPair, OAuthClientProvider, SecretsProvider, SignResult};

/// Credentials for one of the two supported schemes. The variant decides how
/// a request gets its `Authorization` header: per-request signing for
/// [`Credentials::OAuth1`], a constant bearer header for
/// [`Credentials::OAuth2`].
#[derive(Debug, Clone)]
pub enum Credentials<'a> {
    OAuth1 {
        consumer: KeyPair<'a>,
        token: Option<KeyPair<'a>>,
    },
    OAuth2(Cow<'a, str>),
}

impl From<AccessToken> for Credentials<'static> {
    fn from(token: AccessToken) -> Self {
        Credentials::OAuth2(token.access_token.into())
    }
}

/// Facade attaching a ready `Authorization` header to plain requests.
///
/// Callers hand over a method, a URL and loose parameters; what comes back is
/// a `reqwest::RequestBuilder` carrying either an `OAuth ...` signature or a
/// `Bearer ...` header, ready for the transport. Nothing outside this type
/// needs to construct signatures directly.
#[derive(Debug, Clone)]
pub struct Authorizer<'a> {
    client: ReqwestClient,
    credentials: Credentials<'a>,
}

// internal SecretsProvider view over the runtime-optional token pair
struct BorrowedSecrets<'a> {
    consumer: &'a KeyPair<'a>,
    token: Option<&'a KeyPair<'a>>,
}

impl SecretsProvider for BorrowedSecrets<'_> {
    fn consumer_pair(&self) -> (&str, &str) {
        (&self.consumer.key, &self.consumer.secret)
    }

    fn token_pair(&self) -> Option<(&str, &str)> {
        self.token.map(|pair| (&*pair.key, &*pair.secret))
    }
}

fn params_ride_in_query(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD || *method == Method::DELETE
}

impl<'a> Authorizer<'a> {
    pub fn new(client: ReqwestClient, credentials: Credentials<'a>) -> Self {
        Authorizer {
            client,
            credentials,
        }
    }

    /// Convenience method to authorize a `GET` request.
    pub fn get(&self, url: &str, params: &[(&str, &str)]) -> SignResult<ReqwestRequestBuilder> {
        self.request(Method::GET, url, params)
    }

    /// Convenience method to authorize a `POST` request.
    pub fn post(&self, url: &str, params: &[(&str, &str)]) -> SignResult<ReqwestRequestBuilder> {
        self.request(Method::POST, url, params)
    }

    /// Build a request with its `Authorization` header fully populated.
    ///
    /// Parameters ride the query string for `GET`/`HEAD`/`DELETE` and the
    /// form body otherwise, and participate in the signature when the
    /// credentials call for one.
    pub fn request(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, &str)],
    ) -> SignResult<ReqwestRequestBuilder> {
        match &self.credentials {
            Credentials::OAuth1 { consumer, token } => {
                let secrets = BorrowedSecrets {
                    consumer,
                    token: token.as_ref(),
                };
                let in_query = params_ride_in_query(&method);
                let builder = self
                    .client
                    .clone()
                    .oauth1(&secrets)
                    .request(method, url);
                let builder = if params.is_empty() {
                    builder
                } else if in_query {
                    builder.query(params)
                } else {
                    builder.form(params)
                };
                builder.generate_signature()
            }
            Credentials::OAuth2(bearer) => {
                let builder = self
                    .client
                    .request(method.clone(), url)
                    .bearer_auth(bearer);
                Ok(if params.is_empty() {
                    builder
                } else if params_ride_in_query(&method) {
                    builder.query(params)
                } else {
                    builder.form(params)
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::AUTHORIZATION;

    fn authorization_of(builder: ReqwestRequestBuilder) -> String {
        builder
            .build()
            .unwrap()
            .headers()
            .get(AUTHORIZATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn oauth1_credentials_yield_signed_header() {
        let credentials = Credentials::OAuth1 {
            consumer: KeyPair::new("CK", "CS"),
            token: Some(KeyPair::new("TK", "TS")),
        };
        let authorizer = Authorizer::new(reqwest::Client::new(), credentials);
        let header = authorization_of(
            authorizer
                .get("https://api.example.com/resource", &[("count", "200")])
                .unwrap(),
        );
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"CK\""));
        assert!(header.contains("oauth_token=\"TK\""));
        assert!(header.contains("oauth_signature="));
    }

    #[test]
    fn oauth1_without_token_still_signs() {
        let credentials = Credentials::OAuth1 {
            consumer: KeyPair::new("CK", "CS"),
            token: None,
        };
        let authorizer = Authorizer::new(reqwest::Client::new(), credentials);
        let header = authorization_of(
            authorizer
                .post("https://api.example.com/oauth/request_token", &[])
                .unwrap(),
        );
        assert!(header.starts_with("OAuth "));
        assert!(!header.contains("oauth_token=\""));
    }

    #[test]
    fn oauth2_credentials_yield_bearer_header() {
        let authorizer = Authorizer::new(
            reqwest::Client::new(),
            Credentials::OAuth2("AT".into()),
        );
        let request = authorizer
            .get("https://api.example.com/resource", &[("count", "200")])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer AT"
        );
        assert_eq!(
            request.url().as_str(),
            "https://api.example.com/resource?count=200"
        );
    }

    #[test]
    fn access_token_converts_into_credentials() {
        let token: AccessToken =
            serde_json::from_str(r#"{"token_type":"bearer","access_token":"AT"}"#).unwrap();
        match Credentials::from(token) {
            Credentials::OAuth2(bearer) => assert_eq!(bearer, "AT"),
            other => panic!("unexpected variant: {:?}", other),
        }
    }

    #[test]
    fn post_params_are_signed_into_the_form_body() {
        let credentials = Credentials::OAuth1 {
            consumer: KeyPair::new("CK", "CS"),
            token: Some(KeyPair::new("TK", "TS")),
        };
        let authorizer = Authorizer::new(reqwest::Client::new(), credentials);
        let request = authorizer
            .post("https://api.example.com/update", &[("status", "hello")])
            .unwrap()
            .build()
            .unwrap();
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, &b"status=hello"[..]);
        assert!(request.headers().get(AUTHORIZATION).is_some());
    }
}
