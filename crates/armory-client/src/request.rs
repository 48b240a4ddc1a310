//! Request URL assembly.
//!
//! Every request targets `scheme://host/wow/<resource path>` and carries two
//! implicit query parameters, `locale` and `apikey`. Parameters are written
//! in ascending name order so the same input always yields the same URL.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::signer::RequestSigner;

/// Fixed namespace segment in front of every resource path
pub const NAMESPACE: &str = "wow";

/// Only verb the community API accepts
pub const VERB: &str = "GET";

/// Query parameters, kept sorted by name
pub type QueryParams = BTreeMap<String, String>;

/// A fully built request, ready for the transport.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiRequest {
    url: Url,
    authorization: Option<String>,
}

impl ApiRequest {
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Authorization header value, present only for signed requests
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.authorization.is_some()
    }

    /// Path component used in the signature
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("host", &self.url.host_str().unwrap_or_default())
            .field("path", &self.url.path())
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

/// Combines configuration, resource path and parameters into an [`ApiRequest`].
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    signer: RequestSigner,
    origin: Option<Url>,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific signer, e.g. one with a fixed clock
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.signer = signer;
        self
    }

    /// Send requests to `origin` (scheme, host and port) instead of the
    /// configured region host.
    ///
    /// The path, query and signature are unaffected. Intended for proxies
    /// and test servers.
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Build a request, signing it when `config` carries a secret key.
    pub fn build(
        &self,
        config: &ClientConfig,
        resource_path: &str,
        params: &QueryParams,
    ) -> Result<ApiRequest> {
        self.build_with_auth(config, resource_path, params, config.is_authenticated())
    }

    /// Build a request, signing it when `requires_auth` is set.
    pub fn build_with_auth(
        &self,
        config: &ClientConfig,
        resource_path: &str,
        params: &QueryParams,
        requires_auth: bool,
    ) -> Result<ApiRequest> {
        let url = self.url(config, resource_path, params)?;

        let authorization = if requires_auth {
            if !config.is_authenticated() {
                return Err(ApiError::signing("no secret key configured"));
            }
            let signed = self.signer.sign(config, VERB, url.path())?;
            Some(signed.authorization(config.public_key()))
        } else {
            None
        };

        tracing::debug!(
            host = url.host_str().unwrap_or_default(),
            path = url.path(),
            authenticated = authorization.is_some(),
            "built request"
        );

        Ok(ApiRequest { url, authorization })
    }

    /// Assemble the request URL.
    pub fn url(
        &self,
        config: &ClientConfig,
        resource_path: &str,
        params: &QueryParams,
    ) -> Result<Url> {
        let base = match &self.origin {
            Some(origin) => origin.origin().ascii_serialization(),
            None => format!("{}://{}", config.scheme(), config.host()),
        };

        let mut url = Url::parse(&format!("{base}/"))?;
        url.set_path(&format!(
            "/{NAMESPACE}/{}",
            resource_path.trim_start_matches('/')
        ));

        let mut query = params.clone();
        query.insert("locale".to_string(), config.locale().to_string());
        query.insert("apikey".to_string(), config.secret_key().to_string());
        url.query_pairs_mut().extend_pairs(&query);

        Ok(url)
    }
}

/// Build a query map from borrowed pairs
pub fn query<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> QueryParams {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn us() -> ClientConfig {
        ClientConfig::new("US", "").unwrap()
    }

    fn fixed_builder(secs: i64) -> RequestBuilder {
        RequestBuilder::new().with_signer(RequestSigner::fixed(
            Utc.timestamp_opt(secs, 0).unwrap(),
        ))
    }

    #[test]
    fn test_anonymous_item_url() {
        let request = RequestBuilder::new()
            .build(&us(), "item/19019", &QueryParams::new())
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://us.api.battle.net/wow/item/19019?apikey=&locale=en_US"
        );
        assert!(request.authorization().is_none());
        assert!(!request.is_authenticated());
    }

    #[test]
    fn test_params_sorted_by_name() {
        let params = query([("qualityId", "3"), ("level", "25"), ("breedId", "5")]);
        let url = RequestBuilder::new()
            .url(&us(), "battlePet/stats/258", &params)
            .unwrap();

        assert_eq!(
            url.query(),
            Some("apikey=&breedId=5&level=25&locale=en_US&qualityId=3")
        );
    }

    #[test]
    fn test_build_is_repeatable() {
        let params = query([("fields", "stats,pvp")]);
        let builder = RequestBuilder::new();
        let first = builder.build(&us(), "character/realm/name", &params).unwrap();
        let second = builder.build(&us(), "character/realm/name", &params).unwrap();
        assert_eq!(first.url().as_str(), second.url().as_str());
    }

    #[test]
    fn test_implicit_params_override_caller() {
        let params = query([("locale", "xx_XX"), ("apikey", "stolen")]);
        let url = RequestBuilder::new().url(&us(), "item/1", &params).unwrap();
        assert_eq!(url.query(), Some("apikey=&locale=en_US"));
    }

    #[test]
    fn test_values_are_form_encoded() {
        let params = query([("fields", "stats,pvp")]);
        let url = RequestBuilder::new().url(&us(), "character/a/b", &params).unwrap();
        assert_eq!(url.query(), Some("apikey=&fields=stats%2Cpvp&locale=en_US"));
    }

    #[test]
    fn test_authenticated_request() {
        let config = us().with_credentials("s3cr3t", "pub").unwrap();
        let request = fixed_builder(1_500_000_000)
            .build(&config, "item/19019", &QueryParams::new())
            .unwrap();

        assert_eq!(request.url().scheme(), "https");
        assert_eq!(
            request.url().as_str(),
            "https://us.api.battle.net/wow/item/19019?apikey=s3cr3t&locale=en_US"
        );

        let header = request.authorization().unwrap();
        assert!(header.starts_with(" BNET pub:"));
        assert_eq!(header.len(), " BNET pub:".len() + 28);
    }

    #[test]
    fn test_authorization_changes_with_timestamp() {
        let config = us().with_credentials("s3cr3t", "pub").unwrap();
        let params = QueryParams::new();

        let first = fixed_builder(1_500_000_000)
            .build(&config, "item/19019", &params)
            .unwrap();
        let again = fixed_builder(1_500_000_000)
            .build(&config, "item/19019", &params)
            .unwrap();
        let later = fixed_builder(1_500_000_001)
            .build(&config, "item/19019", &params)
            .unwrap();

        assert_eq!(first.authorization(), again.authorization());
        assert_ne!(first.authorization(), later.authorization());
        assert_eq!(first.url(), later.url());
    }

    #[test]
    fn test_auth_without_secret_fails() {
        let result = RequestBuilder::new().build_with_auth(&us(), "item/1", &QueryParams::new(), true);
        assert!(matches!(result, Err(ApiError::Signing(_))));
    }

    #[test]
    fn test_signed_path_includes_namespace() {
        let config = us().with_credentials("s3cr3t", "pub").unwrap();
        let request = fixed_builder(0)
            .build(&config, "/item/19019", &QueryParams::new())
            .unwrap();
        assert_eq!(request.path(), "/wow/item/19019");
    }

    #[test]
    fn test_origin_override() {
        let origin = Url::parse("http://127.0.0.1:8080").unwrap();
        let config = us().with_credentials("s3cr3t", "pub").unwrap();
        let request = fixed_builder(0)
            .with_origin(origin)
            .build(&config, "item/1", &QueryParams::new())
            .unwrap();

        assert_eq!(
            request.url().as_str(),
            "http://127.0.0.1:8080/wow/item/1?apikey=s3cr3t&locale=en_US"
        );
        assert!(request.is_authenticated());
    }

    #[test]
    fn test_debug_hides_query() {
        let config = us().with_credentials("s3cr3t", "pub").unwrap();
        let request = fixed_builder(0)
            .build(&config, "item/19019", &QueryParams::new())
            .unwrap();

        let shown = format!("{request:?}");
        assert!(shown.contains("us.api.battle.net"));
        assert!(shown.contains("/wow/item/19019"));
        assert!(!shown.contains("s3cr3t"));
        assert!(!shown.contains("BNET"));
    }
}
