use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use http::Method;
use rand::RngCore;
use sha1::Sha1;
use url::Url;

use crate::encode::{escape_query_escaped, percent_encode};
use crate::{
    SecretsProvider, SignError, SignResult, OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY,
    OAUTH_KEY_PREFIX, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY, OAUTH_SIGNATURE_METHOD_KEY,
    OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY, OAUTH_VERSION_KEY,
    OAUTH_VERSION_VALUE, REALM_KEY, SIGNATURE_METHOD,
};

type HmacSha1 = Hmac<Sha1>;

/// Current Unix time in seconds.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Generate a fresh `oauth_nonce` value.
///
/// 32 bytes from the thread-local CSPRNG, base64-encoded, with every
/// character outside `[A-Za-z0-9]` removed (not replaced, so the length
/// varies a little between calls).
pub fn nonce() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    BASE64
        .encode(bytes)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Derive the HMAC key: `encode(consumer_secret) & encode(token_secret)`.
/// The trailing `&` stays even when no token secret exists yet.
pub(crate) fn signing_key(consumer_secret: &str, token_secret: Option<&str>) -> String {
    format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    )
}

fn hmac_sha1_base64(key: &str, message: &str) -> SignResult<String> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| SignError::Key)?;
    mac.update(message.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Byte-wise sort of already-encoded pairs, joined as `name=value&...`.
pub(crate) fn parameter_block(mut params: Vec<(String, String)>) -> String {
    params.sort();
    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

/// Computes `Authorization: OAuth ...` header values.
///
/// Stateless apart from the borrowed secrets and per-request parameters;
/// every call draws its own nonce and timestamp unless they were pinned via
/// [`OAuthParameters`], so concurrent signings never share a context.
#[derive(Debug)]
pub struct Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
}

impl<'a, TSecretsProvider> Clone for Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    fn clone(&self) -> Self {
        Signer {
            secrets: self.secrets,
            parameters: self.parameters.clone(),
        }
    }
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            secrets,
            parameters,
        }
    }

    /// Build the signature base string over `method`, `url` and the
    /// form-encoded `payload` (the query string or request body), sign it,
    /// and render the complete `OAuth ...` header value.
    ///
    /// `payload` is expected in the form the transport emits it; its tokens
    /// are normalized with the form-urlencoding fixup rather than decoded.
    pub fn generate_signature(
        self,
        method: Method,
        mut url: Url,
        payload: &str,
    ) -> SignResult<String> {
        let (consumer_key, consumer_secret) = self.secrets.consumer_pair();
        let token = self.secrets.token_pair();

        let nonce = match &self.parameters.nonce {
            Some(pinned) => pinned.to_string(),
            None => nonce(),
        };
        let timestamp = self
            .parameters
            .timestamp
            .unwrap_or_else(unix_timestamp)
            .to_string();

        fn enc(s: &str) -> String {
            percent_encode(s).to_string()
        }

        // protocol parameters, encoded, in alphabetical order; these are
        // both signed and emitted in the header
        let mut protocol: Vec<(&str, String)> = Vec::new();
        if let Some(callback) = &self.parameters.callback {
            protocol.push((OAUTH_CALLBACK_KEY, enc(callback)));
        }
        protocol.push((OAUTH_CONSUMER_KEY, enc(consumer_key)));
        protocol.push((OAUTH_NONCE_KEY, enc(&nonce)));
        protocol.push((OAUTH_SIGNATURE_METHOD_KEY, SIGNATURE_METHOD.to_string()));
        protocol.push((OAUTH_TIMESTAMP_KEY, timestamp));
        if let Some((token_key, _)) = token {
            protocol.push((OAUTH_TOKEN_KEY, enc(token_key)));
        }
        if let Some(verifier) = &self.parameters.verifier {
            protocol.push((OAUTH_VERIFIER_KEY, enc(verifier)));
        }
        if self.parameters.version {
            protocol.push((OAUTH_VERSION_KEY, OAUTH_VERSION_VALUE.to_string()));
        }

        // request parameters ride in already form-encoded; oauth_* keys are
        // reserved for the protocol set above
        let mut signed: Vec<(String, String)> = payload
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let mut kv = pair.splitn(2, '=');
                (
                    escape_query_escaped(kv.next().unwrap_or_default()),
                    escape_query_escaped(kv.next().unwrap_or_default()),
                )
            })
            .filter(|(key, _)| !key.starts_with(OAUTH_KEY_PREFIX))
            .collect();
        signed.extend(protocol.iter().map(|(k, v)| (k.to_string(), v.clone())));

        url.set_fragment(None);
        url.set_query(None);
        let base_string = format!(
            "{}&{}&{}",
            method.as_str().to_ascii_uppercase(),
            percent_encode(url.as_str()),
            percent_encode(&parameter_block(signed))
        );

        let key = signing_key(consumer_secret, token.map(|(_, secret)| secret));
        let signature = hmac_sha1_base64(&key, &base_string)?;

        // the signature slots into the protocol set alphabetically;
        // realm is unsigned and goes last
        let mut fields = protocol;
        let at = fields
            .iter()
            .position(|(k, _)| *k > OAUTH_SIGNATURE_KEY)
            .unwrap_or(fields.len());
        fields.insert(at, (OAUTH_SIGNATURE_KEY, enc(&signature)));
        if let Some(realm) = &self.parameters.realm {
            fields.push((REALM_KEY, enc(realm)));
        }

        let rendered = fields
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {}", rendered))
    }
}

/// Per-request OAuth parameters.
///
/// Everything is optional: an unset nonce/timestamp is drawn fresh at signing
/// time. Pinning them exists for reproducing signatures in tests and for
/// callers that must replay a known vector.
#[derive(Debug, Clone)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    realm: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
    version: bool,
}

impl Default for OAuthParameters<'_> {
    fn default() -> Self {
        OAuthParameters {
            callback: None,
            nonce: None,
            realm: None,
            timestamp: None,
            verifier: None,
            version: true,
        }
    }
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    /// set the oauth_callback value
    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the realm value
    ///
    /// # Note
    /// The realm decorates the `Authorization` header but never participates
    /// in the signature.
    pub fn realm<T>(self, realm: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            realm: Some(realm.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    /// set whether oauth_version is emitted
    ///
    /// # Note
    /// When enabled (the default) the header and signature carry
    /// `oauth_version="1.0"`; the parameter is optional per the protocol and
    /// some published signature vectors omit it.
    pub fn version<T>(self, version: T) -> Self
    where
        T: Into<bool>,
    {
        OAuthParameters {
            version: version.into(),
            ..self
        }
    }
}
