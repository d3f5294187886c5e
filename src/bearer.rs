use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client as ReqwestClient;
use serde::Deserialize;
use tracing::debug;

use crate::{Result, SecretsProvider, TokenError};

const GRANT_TYPE_BODY: &str = "grant_type=client_credentials";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded;charset=UTF-8";

/// A bearer credential issued by a client-credentials token endpoint.
///
/// Opaque after issuance; expiry and revocation are not tracked here.
#[derive(Deserialize, Debug, Clone)]
pub struct AccessToken {
    pub token_type: String,
    pub access_token: String,
}

impl AccessToken {
    /// Render the fixed `Authorization` header value this token yields.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

/// HTTP Basic credentials carrying the consumer pair:
/// `Basic base64(key:secret)`.
pub(crate) fn basic_credentials(consumer_key: &str, consumer_secret: &str) -> String {
    format!(
        "Basic {}",
        BASE64.encode(format!("{}:{}", consumer_key, consumer_secret))
    )
}

pub trait OAuth2ClientProvider {
    fn oauth2<'a, T>(self, secrets: &'a T) -> BearerClient<'a, T>
    where
        Self: Sized,
        T: SecretsProvider;
}

impl OAuth2ClientProvider for ReqwestClient {
    fn oauth2<'a, T>(self, secrets: &'a T) -> BearerClient<'a, T>
    where
        Self: Sized,
        T: SecretsProvider,
    {
        BearerClient {
            inner: self,
            secrets,
        }
    }
}

/// Two-legged client-credentials flow: one Basic-authenticated exchange,
/// then a constant `Bearer` header for every later call. No per-request
/// signing exists under this scheme.
#[derive(Debug)]
pub struct BearerClient<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    inner: ReqwestClient,
    secrets: &'a TSecretsProvider,
}

impl<'a, TSecretsProvider> BearerClient<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    /// Exchange the consumer pair for a bearer token at `endpoint`.
    ///
    /// A non-success answer or a body that does not decode into an
    /// [`AccessToken`] is an error; no token is retained in either case.
    pub async fn fetch_bearer_token(&self, endpoint: &str) -> Result<AccessToken> {
        let (consumer_key, consumer_secret) = self.secrets.consumer_pair();
        debug!(%endpoint, "exchanging consumer credentials for bearer token");
        let response = self
            .inner
            .post(endpoint)
            .header(AUTHORIZATION, basic_credentials(consumer_key, consumer_secret))
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(GRANT_TYPE_BODY)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::Status(status).into());
        }
        let body = response.text().await?;
        let token: AccessToken =
            serde_json::from_str(&body).map_err(TokenError::Decode)?;
        debug!(token_type = %token.token_type, "bearer token acquired");
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Secrets};

    #[test]
    fn basic_credentials_encodes_the_pair() {
        assert_eq!(basic_credentials("CK", "CS"), "Basic Q0s6Q1M=");
        assert_eq!(
            basic_credentials(
                "xvz1evFS4wEEPTGEFPHBog",
                "L8qq9PZyRg6ieKGEKhZolGC0vJWLw8iEJ88DRdyOg"
            ),
            "Basic eHZ6MWV2RlM0d0VFUFRHRUZQSEJvZzpMOHFxOVBaeVJnNmllS0dFS2hab2xHQzB2SldMdzhpRUo4OERSZHlPZw=="
        );
    }

    #[test]
    fn access_token_renders_bearer_header() {
        let token: AccessToken =
            serde_json::from_str(r#"{"token_type":"bearer","access_token":"AT"}"#).unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.authorization(), "Bearer AT");
    }

    #[test]
    fn incomplete_token_document_fails_to_decode() {
        let parsed = serde_json::from_str::<AccessToken>(r#"{"token_type":"bearer"}"#);
        assert!(parsed.is_err());
    }

    fn spawn_one_shot<F>(respond: F) -> (String, std::thread::JoinHandle<()>)
    where
        F: FnOnce(tiny_http::Request) + Send + 'static,
    {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            respond(request);
        });
        (format!("http://{}", addr), handle)
    }

    #[tokio::test]
    async fn bearer_token_roundtrip() {
        use std::io::Read;

        let (base, handle) = spawn_one_shot(|mut request| {
            let authorization = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("authorization"))
                .map(|h| h.value.to_string());
            assert_eq!(authorization.as_deref(), Some("Basic Q0s6Q1M="));
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body).unwrap();
            assert_eq!(body, "grant_type=client_credentials");
            request
                .respond(tiny_http::Response::from_string(
                    r#"{"token_type":"bearer","access_token":"AT"}"#,
                ))
                .unwrap();
        });

        let secrets = Secrets::new("CK", "CS");
        let token = reqwest::Client::new()
            .oauth2(&secrets)
            .fetch_bearer_token(&format!("{}/oauth2/token", base))
            .await
            .unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.access_token, "AT");
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn bearer_token_server_error_propagates() {
        let (base, handle) = spawn_one_shot(|request| {
            request
                .respond(tiny_http::Response::from_string("oops").with_status_code(500))
                .unwrap();
        });

        let secrets = Secrets::new("CK", "CS");
        let result = reqwest::Client::new()
            .oauth2(&secrets)
            .fetch_bearer_token(&format!("{}/oauth2/token", base))
            .await;
        match result {
            Err(Error::Token(TokenError::Status(status))) => assert_eq!(status.as_u16(), 500),
            other => panic!("unexpected outcome: {:?}", other.map(|t| t.access_token)),
        }
        handle.join().unwrap();
    }

    #[tokio::test]
    async fn bearer_token_malformed_body_propagates() {
        let (base, handle) = spawn_one_shot(|request| {
            request
                .respond(tiny_http::Response::from_string("not json at all"))
                .unwrap();
        });

        let secrets = Secrets::new("CK", "CS");
        let result = reqwest::Client::new()
            .oauth2(&secrets)
            .fetch_bearer_token(&format!("{}/oauth2/token", base))
            .await;
        assert!(matches!(
            result,
            Err(Error::Token(TokenError::Decode(_)))
        ));
        handle.join().unwrap();
    }
}
