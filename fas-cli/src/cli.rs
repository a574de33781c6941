use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::{self, Write};
use tracing::info;

use crate::client::{
    ApiKey, CommodityCode, CountryCode, FasClient, MarketYear, DEFAULT_BASE_URL,
};
use crate::config::Config;
use crate::output::print_json;

#[derive(Debug, Parser)]
#[command(name = "usda-fas")]
#[command(
    about = "Fetch data from the USDA FAS PSD and ESR open data APIs",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API key sent with every request
    #[arg(long, env = "USDA_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// API base URL (overrides config)
    #[arg(long, env = "USDA_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Print compact JSON on a single line
    #[arg(long, global = true)]
    pub raw: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Api(ApiCommand),

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, Clone, Subcommand)]
pub enum ApiCommand {
    /// Get PSD commodity attributes
    Attributes,
    /// Get the list of PSD commodities
    Commodities,
    /// Get the list of PSD countries
    Countries,
    /// Get the list of PSD regions
    Regions,
    /// Get the list of PSD units of measure
    #[command(alias = "units")]
    UnitsOfMeasure,
    /// Get world PSD data for a commodity
    #[command(alias = "world-data")]
    PsdWorld {
        /// Commodity code
        commodity_code: CommodityCode,
        /// Market year (e.g., 2023)
        market_year: MarketYear,
    },
    /// Get PSD data for a commodity in one country
    #[command(alias = "country-data")]
    PsdCountry {
        /// Commodity code
        commodity_code: CommodityCode,
        /// Country code
        country_code: CountryCode,
        /// Market year (e.g., 2023)
        market_year: MarketYear,
    },
    /// Get the list of ESR commodities
    EsrCommodities,
    /// Get the list of ESR countries
    EsrCountries,
    /// Get the ESR data release dates
    #[command(alias = "esr-dates")]
    EsrReleaseDates,
    /// Get the list of ESR regions
    EsrRegions,
    /// Get the list of ESR units of measure
    #[command(alias = "esr-units")]
    EsrUnitsOfMeasure,
    /// Get ESR export sales of a commodity to all countries
    EsrExportsAll {
        /// Commodity code
        commodity_code: CommodityCode,
        /// Market year (e.g., 2023)
        market_year: MarketYear,
    },
    /// Get ESR export sales of a commodity to one country
    EsrExportsCountry {
        /// Commodity code
        commodity_code: CommodityCode,
        /// Country code
        country_code: CountryCode,
        /// Market year (e.g., 2023)
        market_year: MarketYear,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., api.url)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Print the configuration file path
    Path,
}

impl ApiCommand {
    async fn fetch(self, client: &FasClient) -> Result<Value> {
        let name = self.name();
        let result = match self {
            Self::Attributes => client.commodity_attributes().await,
            Self::Commodities => client.commodities().await,
            Self::Countries => client.countries().await,
            Self::Regions => client.regions().await,
            Self::UnitsOfMeasure => client.units_of_measure().await,
            Self::PsdWorld {
                commodity_code,
                market_year,
            } => client.world_data(commodity_code, market_year).await,
            Self::PsdCountry {
                commodity_code,
                country_code,
                market_year,
            } => {
                client
                    .country_data(commodity_code, country_code, market_year)
                    .await
            }
            Self::EsrCommodities => client.esr_commodities().await,
            Self::EsrCountries => client.esr_countries().await,
            Self::EsrReleaseDates => client.esr_release_dates().await,
            Self::EsrRegions => client.esr_regions().await,
            Self::EsrUnitsOfMeasure => client.esr_units_of_measure().await,
            Self::EsrExportsAll {
                commodity_code,
                market_year,
            } => client.esr_exports_all(commodity_code, market_year).await,
            Self::EsrExportsCountry {
                commodity_code,
                country_code,
                market_year,
            } => {
                client
                    .esr_exports_country(commodity_code, country_code, market_year)
                    .await
            }
        };
        result.with_context(|| format!("Failed to fetch {}", name))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Attributes => "attributes",
            Self::Commodities => "commodities",
            Self::Countries => "countries",
            Self::Regions => "regions",
            Self::UnitsOfMeasure => "units-of-measure",
            Self::PsdWorld { .. } => "psd-world",
            Self::PsdCountry { .. } => "psd-country",
            Self::EsrCommodities => "esr-commodities",
            Self::EsrCountries => "esr-countries",
            Self::EsrReleaseDates => "esr-release-dates",
            Self::EsrRegions => "esr-regions",
            Self::EsrUnitsOfMeasure => "esr-units-of-measure",
            Self::EsrExportsAll { .. } => "esr-exports-all",
            Self::EsrExportsCountry { .. } => "esr-exports-country",
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.execute(Config::load, &mut out).await
    }

    /// The config file is only read when a command actually needs it.
    pub async fn execute<F, W>(self, load_config: F, out: &mut W) -> Result<()>
    where
        F: FnOnce() -> Result<Config>,
        W: Write,
    {
        let command = match self.command {
            Commands::Api(command) => command,
            Commands::Config(cmd) => {
                let mut config = load_config()?;
                return run_config(cmd, &mut config, out);
            }
        };

        // resolved before the client exists so a bad key never reaches the network
        let api_key = ApiKey::from_value(self.api_key.as_deref())?;
        let api_url = match self.api_url {
            Some(url) => url,
            None => load_config()?
                .api_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        let client = FasClient::new(&api_url, api_key)?;
        info!(command = command.name(), %api_url, "fetching");
        let value = command.fetch(&client).await?;

        print_json(out, &value, self.raw)
    }
}

fn run_config<W: Write>(cmd: ConfigCommands, config: &mut Config, out: &mut W) -> Result<()> {
    match cmd {
        ConfigCommands::Set { key, value } => {
            config.set(&key, &value)?;
            writeln!(out, "✓ Configuration updated: {} = {}", key, value)?;
        }
        ConfigCommands::Get { key } => match config.get(&key)? {
            Some(val) => writeln!(out, "{}", val)?,
            None => writeln!(out, "Configuration key '{}' not found", key)?,
        },
        ConfigCommands::Path => writeln!(out, "{}", config.path().display())?,
    }
    Ok(())
}
