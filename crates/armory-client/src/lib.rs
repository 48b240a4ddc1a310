//! # armory-client - World of Warcraft community API client
//!
//! Builds requests against the regional community web API
//! (`us.api.battle.net`, `eu.battle.net`, ...) and hands back raw or
//! JSON-decoded responses. Response shapes are left to the caller: any
//! `serde::Deserialize` type can be used as a target.
//!
//! ## Request pipeline
//!
//! 1. [`ClientConfig::new`] resolves a region selector and locale against the
//!    static [region catalog](region).
//! 2. [`Endpoint::route`] maps a resource to its path and validates optional
//!    field lists against the [character and guild whitelists](fields).
//! 3. [`RequestBuilder`] assembles the URL with parameters in ascending name
//!    order and, when a secret key is configured, signs the request with
//!    [`RequestSigner`].
//! 4. A [`Transport`] sends it; [`HttpTransport`] is the reqwest-backed default.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use armory_client::{ApiClient, ClientConfig, Endpoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("Europe", "de_DE")?;
//!     let client = ApiClient::new(config)?;
//!
//!     let character: serde_json::Value = client
//!         .fetch(&Endpoint::character("antonidas", "Thrall").with_fields(["stats", "pvp"]))
//!         .await?;
//!     println!("{character:#}");
//!     Ok(())
//! }
//! ```
//!
//! ## Authentication
//!
//! With a secret key configured, requests go over HTTPS and carry an
//! `Authorization` header of the form `" BNET <public key>:<signature>"`.
//!
//! ```rust
//! use armory_client::{ClientConfig, QueryParams, RequestBuilder};
//!
//! let config = ClientConfig::new("US", "")?.with_credentials("s3cr3t", "pub")?;
//! let request = RequestBuilder::new().build(&config, "item/19019", &QueryParams::new())?;
//!
//! assert_eq!(request.url().scheme(), "https");
//! assert!(request.authorization().is_some());
//! # Ok::<(), armory_client::ApiError>(())
//! ```
//!
//! ## Configuration
//!
//! [`ClientConfig::from_env`] and [`HttpConfig::from_env`] read:
//!
//! ```bash
//! export ARMORY_REGION="EU"
//! export ARMORY_LOCALE="fr_FR"
//! export ARMORY_SECRET_KEY="..."
//! export ARMORY_PUBLIC_KEY="..."
//! export ARMORY_CONNECT_TIMEOUT="10"
//! export ARMORY_REQUEST_TIMEOUT="30"
//! ```

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod fields;
pub mod region;
pub mod request;
pub mod signer;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use endpoint::{Endpoint, Route};
pub use error::{ApiError, Result};
pub use fields::{CHARACTER_FIELDS, FieldWhitelist, GUILD_FIELDS};
pub use region::{Region, RegionEntry, ResolvedRegion};
pub use request::{ApiRequest, QueryParams, RequestBuilder};
pub use signer::{Clock, FixedClock, RequestSigner, SignedRequest, SystemClock};
pub use transport::{HttpConfig, HttpTransport, Transport};
