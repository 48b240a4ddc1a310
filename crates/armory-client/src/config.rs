//! Client configuration

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{ApiError, Result};
use crate::region::{self, Region};

/// Process-wide current configuration, replaced wholesale on publish
static CURRENT: RwLock<Option<Arc<ClientConfig>>> = parking_lot::const_rwlock(None);

/// Resolved host, locale and credentials for the community API.
///
/// `host` and `locale` always come from the same catalog lookup and cannot
/// be changed afterwards. An empty secret key means requests are sent
/// anonymously over plain HTTP.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    region: Region,
    host: String,
    locale: String,
    secret_key: String,
    public_key: String,
}

impl ClientConfig {
    /// Resolve `region` (code or full name) and an optional `locale`.
    ///
    /// An empty locale selects the region default.
    pub fn new(region: &str, locale: &str) -> Result<Self> {
        let resolved = region::resolve(region, locale)?;

        Ok(Self {
            region: resolved.region,
            host: resolved.host.to_string(),
            locale: resolved.locale.to_string(),
            secret_key: String::new(),
            public_key: String::new(),
        })
    }

    /// Attach API credentials.
    ///
    /// A non-empty secret key requires a public key. Passing an empty secret
    /// key keeps the configuration unauthenticated.
    pub fn with_credentials(
        mut self,
        secret_key: impl Into<String>,
        public_key: impl Into<String>,
    ) -> Result<Self> {
        let secret_key = secret_key.into();
        let public_key = public_key.into();

        if !secret_key.is_empty() && public_key.is_empty() {
            return Err(ApiError::MissingPublicKey);
        }

        self.secret_key = secret_key;
        self.public_key = public_key;
        Ok(self)
    }

    /// Create configuration from environment variables
    ///
    /// | Variable            | Default |
    /// |---------------------|---------|
    /// | `ARMORY_REGION`     | `US`    |
    /// | `ARMORY_LOCALE`     | region default |
    /// | `ARMORY_SECRET_KEY` | none    |
    /// | `ARMORY_PUBLIC_KEY` | none    |
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let region = var("ARMORY_REGION").unwrap_or_else(|| "US".to_string());
        let locale = var("ARMORY_LOCALE").unwrap_or_default();
        let secret_key = var("ARMORY_SECRET_KEY").unwrap_or_default();
        let public_key = var("ARMORY_PUBLIC_KEY").unwrap_or_default();

        Self::new(&region, &locale)?.with_credentials(secret_key, public_key)
    }

    pub fn region(&self) -> Region {
        self.region
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Whether requests built from this configuration are signed
    pub fn is_authenticated(&self) -> bool {
        !self.secret_key.is_empty()
    }

    /// `https` for authenticated configurations, `http` otherwise
    pub fn scheme(&self) -> &'static str {
        if self.is_authenticated() {
            "https"
        } else {
            "http"
        }
    }

    /// Make this configuration the process-wide current one.
    ///
    /// The last published configuration wins; readers holding an earlier
    /// snapshot keep using it.
    pub fn publish(self) -> Arc<Self> {
        let config = Arc::new(self);
        *CURRENT.write() = Some(Arc::clone(&config));
        tracing::debug!(host = %config.host, locale = %config.locale, "published client configuration");
        config
    }

    /// Snapshot of the process-wide current configuration, if any
    pub fn current() -> Option<Arc<Self>> {
        CURRENT.read().clone()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("region", &self.region)
            .field("host", &self.host)
            .field("locale", &self.locale)
            .field(
                "secret_key",
                &if self.secret_key.is_empty() { "" } else { "<redacted>" },
            )
            .field("public_key", &self.public_key)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_resolves_region() {
        let config = ClientConfig::new("Europe", "de_DE").unwrap();
        assert_eq!(config.region(), Region::EU);
        assert_eq!(config.host(), "eu.battle.net");
        assert_eq!(config.locale(), "de_DE");
        assert!(!config.is_authenticated());
        assert_eq!(config.scheme(), "http");
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert!(matches!(
            ClientConfig::new("Mars", ""),
            Err(ApiError::InvalidRegion(_))
        ));
        assert!(matches!(
            ClientConfig::new("US", "de_DE"),
            Err(ApiError::InvalidLocale { .. })
        ));
    }

    #[test]
    fn test_credentials() {
        let config = ClientConfig::new("US", "")
            .unwrap()
            .with_credentials("s3cr3t", "pub")
            .unwrap();
        assert!(config.is_authenticated());
        assert_eq!(config.scheme(), "https");
        assert_eq!(config.public_key(), "pub");

        let anonymous = ClientConfig::new("US", "")
            .unwrap()
            .with_credentials("", "")
            .unwrap();
        assert!(!anonymous.is_authenticated());
    }

    #[test]
    fn test_secret_requires_public_key() {
        let result = ClientConfig::new("US", "")
            .unwrap()
            .with_credentials("s3cr3t", "");
        assert!(matches!(result, Err(ApiError::MissingPublicKey)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = ClientConfig::new("KR", "")
            .unwrap()
            .with_credentials("hunter2", "pub")
            .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }

    fn vars<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_from_vars_defaults_to_us() {
        let config = ClientConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.region(), Region::US);
        assert_eq!(config.host(), "us.api.battle.net");
        assert_eq!(config.locale(), "en_US");
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_from_vars_region_and_locale() {
        let config =
            ClientConfig::from_vars(vars(&[("ARMORY_REGION", "EU"), ("ARMORY_LOCALE", "fr_FR")]))
                .unwrap();
        assert_eq!(config.region(), Region::EU);
        assert_eq!(config.locale(), "fr_FR");

        // Region alone picks that region's default locale
        let config = ClientConfig::from_vars(vars(&[("ARMORY_REGION", "Korea")])).unwrap();
        assert_eq!(config.host(), "kr.battle.net");
        assert_eq!(config.locale(), "ko_KR");
    }

    #[test]
    fn test_from_vars_credentials() {
        let config = ClientConfig::from_vars(vars(&[
            ("ARMORY_SECRET_KEY", "s3cr3t"),
            ("ARMORY_PUBLIC_KEY", "pub"),
        ]))
        .unwrap();
        assert!(config.is_authenticated());
        assert_eq!(config.public_key(), "pub");

        let result = ClientConfig::from_vars(vars(&[("ARMORY_SECRET_KEY", "s3cr3t")]));
        assert!(matches!(result, Err(ApiError::MissingPublicKey)));
    }

    #[test]
    fn test_from_vars_rejects_bad_region() {
        let result = ClientConfig::from_vars(vars(&[("ARMORY_REGION", "Mars")]));
        assert!(matches!(result, Err(ApiError::InvalidRegion(ref r)) if r == "Mars"));
    }

    #[test]
    fn test_from_env() {
        // Only test that sets the region and locale variables
        unsafe {
            std::env::set_var("ARMORY_REGION", "TW");
            std::env::set_var("ARMORY_LOCALE", "zh_TW");
            std::env::remove_var("ARMORY_SECRET_KEY");
            std::env::remove_var("ARMORY_PUBLIC_KEY");
        }

        let config = ClientConfig::from_env().unwrap();

        unsafe {
            std::env::remove_var("ARMORY_REGION");
            std::env::remove_var("ARMORY_LOCALE");
        }

        assert_eq!(config.region(), Region::TW);
        assert_eq!(config.host(), "tw.battle.net");
        assert_eq!(config.locale(), "zh_TW");
    }

    #[test]
    fn test_publish_last_write_wins() {
        let first = ClientConfig::new("TW", "").unwrap().publish();
        let snapshot = ClientConfig::current().unwrap();

        let second = ClientConfig::new("China", "").unwrap().publish();
        let current = ClientConfig::current().unwrap();

        // Only test in this binary that publishes
        assert!(Arc::ptr_eq(&first, &snapshot));
        assert!(Arc::ptr_eq(&second, &current));
        assert_eq!(snapshot.host(), "tw.battle.net");
        assert_eq!(current.host(), "www.battle.com.cn");
    }
}
