use std::borrow::Cow;

/// A key/secret credential pair.
///
/// Two of these identify a session: the consumer pair names the application,
/// the token pair names the user (or stays absent for two-legged flows).
/// Immutable once built; share it by reference across concurrent signings.
#[derive(Debug, Clone)]
pub struct KeyPair<'a> {
    pub key: Cow<'a, str>,
    pub secret: Cow<'a, str>,
}

impl<'a> KeyPair<'a> {
    pub fn new<K, S>(key: K, secret: S) -> Self
    where
        K: Into<Cow<'a, str>>,
        S: Into<Cow<'a, str>>,
    {
        KeyPair {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

/// The seam the signer consumes: a consumer pair plus an optional token pair.
pub trait SecretsProvider {
    fn consumer_pair(&self) -> (&str, &str);

    fn token_pair(&self) -> Option<(&str, &str)>;
}

/// Credential set for a signing session.
///
/// The token slot is a typestate: `Secrets::new` yields consumer-only secrets
/// (the shape used for the temporary-credential request), and
/// [`Secrets::token`] upgrades them once a token pair has been obtained.
#[derive(Debug, Clone)]
pub struct Secrets<'a, TToken> {
    consumer: KeyPair<'a>,
    token: TToken,
}

impl<'a> Secrets<'a, ()> {
    pub fn new<K, S>(consumer_key: K, consumer_secret: S) -> Self
    where
        K: Into<Cow<'a, str>>,
        S: Into<Cow<'a, str>>,
    {
        Secrets {
            consumer: KeyPair::new(consumer_key, consumer_secret),
            token: (),
        }
    }

    /// Attach a temporary or access token pair.
    pub fn token<K, S>(self, token: K, token_secret: S) -> Secrets<'a, KeyPair<'a>>
    where
        K: Into<Cow<'a, str>>,
        S: Into<Cow<'a, str>>,
    {
        Secrets {
            consumer: self.consumer,
            token: KeyPair::new(token, token_secret),
        }
    }
}

impl SecretsProvider for Secrets<'_, ()> {
    fn consumer_pair(&self) -> (&str, &str) {
        (&self.consumer.key, &self.consumer.secret)
    }

    fn token_pair(&self) -> Option<(&str, &str)> {
        None
    }
}

impl SecretsProvider for Secrets<'_, KeyPair<'_>> {
    fn consumer_pair(&self) -> (&str, &str) {
        (&self.consumer.key, &self.consumer.secret)
    }

    fn token_pair(&self) -> Option<(&str, &str)> {
        Some((&self.token.key, &self.token.secret))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consumer_only_has_no_token() {
        let secrets = Secrets::new("ck", "cs");
        assert_eq!(secrets.consumer_pair(), ("ck", "cs"));
        assert!(secrets.token_pair().is_none());
    }

    #[test]
    fn token_upgrade_keeps_consumer() {
        let secrets = Secrets::new("ck", "cs").token("tk", "ts");
        assert_eq!(secrets.consumer_pair(), ("ck", "cs"));
        assert_eq!(secrets.token_pair(), Some(("tk", "ts")));
    }
}
