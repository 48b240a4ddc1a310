//! `armory` command-line entry point.
//!
//! Thin wrapper around the armory-client library that resolves a region,
//! prints or fetches community API requests, and lists the static catalogs.

use anyhow::{Context, Result, bail};
use armory_client::{
    ApiClient, ClientConfig, FieldWhitelist, HttpConfig, HttpTransport, QueryParams, Region,
    RequestBuilder,
};
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(
    name = "armory",
    about = "Query the World of Warcraft community API",
    version
)]
struct Cli {
    /// Region code or name (US, United States, EU, Europe, KR, Korea, TW, Taiwan, ZH, CN, China)
    #[arg(long, env = "ARMORY_REGION", default_value = "US")]
    region: String,

    /// Locale; defaults to the first locale of the region
    #[arg(long, env = "ARMORY_LOCALE", default_value = "")]
    locale: String,

    /// Secret key; enables signed HTTPS requests
    #[arg(long, env = "ARMORY_SECRET_KEY", default_value = "", hide_env_values = true)]
    secret_key: String,

    /// Public key sent in the Authorization header
    #[arg(long, env = "ARMORY_PUBLIC_KEY", default_value = "")]
    public_key: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the URL and Authorization header for a resource path
    Url {
        /// Resource path below the wow/ namespace, e.g. item/19019
        path: String,
        /// Extra query parameter as name=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Fetch a resource path and pretty-print the JSON response
    Get {
        /// Resource path below the wow/ namespace, e.g. realm/status
        path: String,
        /// Extra query parameter as name=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// List supported regions, hosts and locales
    Regions,
    /// List the optional fields of a resource (character or guild)
    Fields { resource: String },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))
}

impl Cli {
    fn config(&self) -> Result<ClientConfig> {
        let config = ClientConfig::new(&self.region, &self.locale)?
            .with_credentials(self.secret_key.clone(), self.public_key.clone())?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Regions => {
            for region in Region::all() {
                let entry = region.entry();
                println!(
                    "{:<3} {:<20} {:<18} {}",
                    region.code(),
                    entry.aliases.join("|"),
                    entry.host,
                    entry.locales.join(", ")
                );
            }
        }
        Command::Fields { resource } => {
            let Some(whitelist) = FieldWhitelist::for_resource(resource) else {
                bail!("unknown resource '{resource}', expected character or guild");
            };
            for field in whitelist.fields() {
                println!("{field}");
            }
        }
        Command::Url { path, params } => {
            let config = cli.config()?;
            let params: QueryParams = params.iter().cloned().collect();
            let request = RequestBuilder::new().build(&config, path, &params)?;

            println!("{}", request.url());
            if let Some(authorization) = request.authorization() {
                println!("Authorization:{authorization}");
            }
        }
        Command::Get { path, params } => {
            let config = cli.config()?;
            tracing::info!(host = config.host(), locale = config.locale(), "fetching {path}");

            let transport = HttpTransport::with_config(&HttpConfig::from_env())?;
            let client = ApiClient::with_transport(config, Arc::new(transport));
            let params: QueryParams = params.iter().cloned().collect();

            let body: serde_json::Value = client
                .get(path, &params)
                .await
                .with_context(|| format!("GET {path} failed"))?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(
            parse_param("fields=stats,pvp").unwrap(),
            ("fields".to_string(), "stats,pvp".to_string())
        );
        // Only the first '=' separates name and value
        assert_eq!(
            parse_param("q=a=b").unwrap(),
            ("q".to_string(), "a=b".to_string())
        );
        assert_eq!(parse_param("empty=").unwrap(), ("empty".to_string(), String::new()));
        assert!(parse_param("novalue").unwrap_err().contains("novalue"));
    }

    #[test]
    fn test_url_subcommand() {
        let cli = Cli::try_parse_from([
            "armory",
            "--region",
            "EU",
            "--locale",
            "fr_FR",
            "url",
            "character/medivh/Uther",
            "--param",
            "fields=stats",
        ])
        .unwrap();

        let Command::Url { path, params } = &cli.command else {
            panic!("expected url subcommand, got {:?}", cli.command);
        };
        assert_eq!(path, "character/medivh/Uther");
        assert_eq!(params, &[("fields".to_string(), "stats".to_string())]);

        let config = cli.config().unwrap();
        assert_eq!(config.host(), "eu.battle.net");
        assert_eq!(config.locale(), "fr_FR");
    }

    #[test]
    fn test_bad_param_rejected() {
        let result = Cli::try_parse_from(["armory", "url", "item/1", "--param", "oops"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_secret_without_public_key() {
        let cli = Cli::try_parse_from(["armory", "--secret-key", "s3cr3t", "regions"]).unwrap();
        assert!(cli.config().is_err());
    }
}
