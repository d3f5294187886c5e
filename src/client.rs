// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use reqwest::{Client as ReqwestClient, IntoUrl, Method};
use tracing::debug;

use crate::{
    OAuthParameters, Result, SecretsProvider, Signer, TokenError, TokenReader, TokenResponse,
};

use super::request::RequestBuilder;

pub trait OAuthClientProvider {
    fn oauth1<'a, T>(self, secrets: &'a T) -> Client<Signer<'a, T>>
    where
        Self: Sized,
        T: SecretsProvider,
    {
        self.oauth1_with_params(secrets, OAuthParameters::new())
    }

    fn oauth1_with_params<'a, T>(
        self,
        secrets: &'a T,
        params: OAuthParameters<'a>,
    ) -> Client<Signer<'a, T>>
    where
        Self: Sized,
        T: SecretsProvider;
}

#[derive(Debug)]
pub struct Client<TSigner> {
    inner: ReqwestClient,
    signer: TSigner,
}

impl OAuthClientProvider for ReqwestClient {
    fn oauth1_with_params<'a, T>(
        self,
        secrets: &'a T,
        parameters: OAuthParameters<'a>,
    ) -> Client<Signer<'a, T>>
    where
        Self: Sized,
        T: SecretsProvider,
    {
        Client {
            inner: self,
            signer: Signer::new(secrets, parameters),
        }
    }
}

impl From<ReqwestClient> for Client<()> {
    fn from(client: ReqwestClient) -> Self {
        Client::new_with_client(client)
    }
}

impl Client<()> {
    /// Constructs a new `Client`.
    ///
    /// This method calls reqwest::Client::new() internally.
    pub fn new() -> Self {
        Client {
            inner: ReqwestClient::new(),
            signer: (),
        }
    }

    /// Constructs a new `Client` with specifying inner `reqwest::Client`.
    pub fn new_with_client(client: ReqwestClient) -> Self {
        Client {
            inner: client,
            signer: (),
        }
    }
}

impl Default for Client<()> {
    fn default() -> Self {
        Client::new()
    }
}

impl<T> Client<T>
where
    T: Clone,
{
    /// Convenience method to make a `GET` request to a URL.
    ///
    /// # Errors
    ///
    /// This method fails whenever supplied `Url` cannot be parsed.
    pub fn get<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::GET, url)
    }

    /// Convenience method to make a `POST` request to a URL.
    ///
    /// # Errors
    ///
    /// This method fails whenever supplied `Url` cannot be parsed.
    pub fn post<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::POST, url)
    }

    /// Convenience method to make a `PUT` request to a URL.
    ///
    /// # Errors
    ///
    /// This method fails whenever supplied `Url` cannot be parsed.
    pub fn put<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::PUT, url)
    }

    /// Convenience method to make a `PATCH` request to a URL.
    ///
    /// # Errors
    ///
    /// This method fails whenever supplied `Url` cannot be parsed.
    pub fn patch<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::PATCH, url)
    }

    /// Convenience method to make a `DELETE` request to a URL.
    ///
    /// # Errors
    ///
    /// This method fails whenever supplied `Url` cannot be parsed.
    pub fn delete<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::DELETE, url)
    }

    /// Convenience method to make a `HEAD` request to a URL.
    ///
    /// # Errors
    ///
    /// This method fails whenever supplied `Url` cannot be parsed.
    pub fn head<U: IntoUrl + Clone>(&self, url: U) -> RequestBuilder<T> {
        self.request(Method::HEAD, url)
    }

    /// Start building a `Request` with the `Method` and `Url`.
    ///
    /// Returns a `RequestBuilder<T>`, which will allow setting headers and
    /// request body before sending.
    ///
    /// # Errors
    ///
    /// This method fails whenever supplied `Url` cannot be parsed.
    pub fn request<U: IntoUrl + Clone>(&self, method: Method, url: U) -> RequestBuilder<T> {
        let cloned_url = match url.clone().into_url() {
            Ok(url) => Some(url),
            Err(_) => None,
        };
        let cloned_method = method.clone();
        RequestBuilder::new(
            self.inner.request(method, url),
            cloned_method,
            cloned_url,
            self.signer.clone(),
        )
    }
}

impl<'a, TSecretsProvider> Client<Signer<'a, TSecretsProvider>>
where
    TSecretsProvider: SecretsProvider,
{
    /// Acquire a temporary credential from `endpoint`.
    ///
    /// Signs a `POST` with the consumer secret only (the token secret slot of
    /// the signing key stays empty) and parses the form-encoded
    /// `oauth_token` / `oauth_token_secret` answer. A transport failure,
    /// non-success status or malformed body surfaces as an error and leaves
    /// nothing behind; retrying is the caller's decision.
    pub async fn request_temporary_credential(&self, endpoint: &str) -> Result<TokenResponse> {
        debug!(%endpoint, "requesting temporary credential");
        let response = self.post(endpoint).generate_signature()?.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TokenError::Status(status).into());
        }
        let credential = response.parse_oauth_token().await?;
        debug!(%endpoint, "temporary credential acquired");
        Ok(credential)
    }
}
