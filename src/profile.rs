use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::debug;

use crate::{Credentials, KeyPair, ProfileError, ProfileResult};

/// Credentials registered for one remote service.
///
/// The token pair is optional: a consumer-only profile is enough for the
/// temporary-credential handshake and for the bearer exchange.
#[derive(Deserialize, Debug, Clone)]
pub struct Profile {
    pub consumer_key: String,
    pub consumer_secret: String,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub access_token_secret: Option<String>,
}

impl Profile {
    pub fn consumer(&self) -> KeyPair<'_> {
        KeyPair::new(&*self.consumer_key, &*self.consumer_secret)
    }

    /// The stored token pair, present only when both halves are registered.
    pub fn token(&self) -> Option<KeyPair<'_>> {
        match (&self.access_token, &self.access_token_secret) {
            (Some(token), Some(secret)) => Some(KeyPair::new(&**token, &**secret)),
            _ => None,
        }
    }

    pub fn credentials(&self) -> Credentials<'_> {
        Credentials::OAuth1 {
            consumer: self.consumer(),
            token: self.token(),
        }
    }
}

/// Service-name-keyed credential profiles, read from a TOML document:
///
/// ```toml
/// ["api.example.com"]
/// consumer_key = "..."
/// consumer_secret = "..."
/// access_token = "..."        # optional
/// access_token_secret = "..." # optional
/// ```
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles: HashMap<String, Profile>,
}

impl ProfileStore {
    /// Read a profile store from `path`.
    pub fn open(path: &Path) -> ProfileResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_toml(&text)?;
        debug!(path = %path.display(), services = store.profiles.len(), "profile store loaded");
        Ok(store)
    }

    /// Read the profile store at its default location under the user
    /// configuration directory.
    pub fn open_default() -> ProfileResult<Self> {
        Self::open(&Self::default_path().ok_or(ProfileError::NoConfigDir)?)
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("oauthflow").join("profiles.toml"))
    }

    pub fn from_toml(text: &str) -> ProfileResult<Self> {
        Ok(ProfileStore {
            profiles: toml::from_str(text)?,
        })
    }

    /// Look up the profile registered for `service`.
    pub fn get(&self, service: &str) -> ProfileResult<&Profile> {
        self.profiles
            .get(service)
            .ok_or_else(|| ProfileError::UnknownService(service.to_string()))
    }
}
