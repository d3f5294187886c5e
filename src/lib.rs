/*!
reqwest-oauthflow: OAuth 1.0a signing and OAuth 2.0 client-credentials for reqwest.

# Overview

This library authenticates requests against HTTP APIs that accept either of
two credential schemes:

- **OAuth 1.0a**: every request carries an `Authorization: OAuth ...` header
  with a fresh nonce/timestamp and an HMAC-SHA1 signature over the canonical
  signature base string.
- **OAuth 2.0 client-credentials**: the consumer pair is exchanged once, via
  HTTP Basic authentication, for a bearer token that every later request
  carries verbatim.

The signing machinery is exposed through a thin layer over
[reqwest](https://crates.io/crates/reqwest): wrap a `reqwest::Client` with
your secrets and use it like the original.

# How to use

## Basic usecase 1 - signing requests with an access token

```no_run
# async fn run() -> Result<(), reqwest_oauthflow::Error> {
use reqwest_oauthflow::{OAuthClientProvider, Secrets};

let secrets = Secrets::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .token("[ACCESS_TOKEN]", "[TOKEN_SECRET]");

let client = reqwest::Client::new();
let resp = client
    .oauth1(&secrets)
    .get("https://api.example.com/1.1/statuses/user_timeline.json")
    .query(&[("screen_name", "rustlang"), ("count", "10")])
    .send()
    .await?;
# Ok(())
# }
```

## Basic usecase 2 - acquiring a temporary credential

```no_run
# async fn run() -> Result<(), reqwest_oauthflow::Error> {
use reqwest_oauthflow::{OAuthClientProvider, Secrets};

let consumer_key = "[CONSUMER_KEY]";
let consumer_secret = "[CONSUMER_SECRET]";

let secrets = Secrets::new(consumer_key, consumer_secret);
let client = reqwest::Client::new().oauth1(&secrets);
let temporary = client
    .request_temporary_credential("https://api.example.com/oauth/request_token")
    .await?;

// hold the returned pair for the rest of the session
let secrets = Secrets::new(consumer_key, consumer_secret)
    .token(temporary.oauth_token, temporary.oauth_token_secret);
# Ok(())
# }
```

The user-facing authorize-and-exchange step that would upgrade a temporary
credential into an access credential is out of scope here; once you hold an
access pair (from wherever), `Secrets::token` makes it ready for signing.

## Basic usecase 3 - two-legged bearer token

```no_run
# async fn run() -> Result<(), reqwest_oauthflow::Error> {
use reqwest_oauthflow::{OAuth2ClientProvider, Secrets};

let secrets = Secrets::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]");
let token = reqwest::Client::new()
    .oauth2(&secrets)
    .fetch_bearer_token("https://api.example.com/oauth2/token")
    .await?;

let resp = reqwest::Client::new()
    .get("https://api.example.com/1.1/statuses/user_timeline.json")
    .header("Authorization", token.authorization())
    .send()
    .await?;
# Ok(())
# }
```

## Basic usecase 4 - one facade over both schemes

```no_run
# async fn run() -> Result<(), reqwest_oauthflow::Error> {
use reqwest_oauthflow::{Authorizer, ProfileStore};

let store = ProfileStore::open_default()?;
let profile = store.get("api.example.com")?;

let authorizer = Authorizer::new(reqwest::Client::new(), profile.credentials());
let resp = authorizer
    .get(
        "https://api.example.com/1.1/statuses/user_timeline.json",
        &[("count", "200")],
    )?
    .send()
    .await?;
# Ok(())
# }
```
*/
mod authorizer;
mod bearer;
mod client;
mod encode;
mod error;
mod profile;
mod request;
mod secrets;
mod signer;
mod token_reader;

// exposed to external program
pub use authorizer::{Authorizer, Credentials};
pub use bearer::{AccessToken, BearerClient, OAuth2ClientProvider};
pub use client::{Client, OAuthClientProvider};
pub use encode::{escape_query_escaped, percent_encode};
pub use error::{
    Error, ProfileError, ProfileResult, Result, SignError, SignResult, TokenError, TokenResult,
};
pub use profile::{Profile, ProfileStore};
pub use request::RequestBuilder;
pub use secrets::{KeyPair, Secrets, SecretsProvider};
pub use signer::{nonce, unix_timestamp, OAuthParameters, Signer};
pub use token_reader::{TokenReader, TokenReaderFuture, TokenResponse};

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
pub(crate) const OAUTH_VERSION_VALUE: &str = "1.0";
pub(crate) const SIGNATURE_METHOD: &str = "HMAC-SHA1";
