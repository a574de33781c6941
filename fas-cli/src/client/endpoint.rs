use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParamError {
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },
    #[error("{kind} '{value}' must contain only ASCII letters and digits")]
    InvalidCode { kind: &'static str, value: String },
    #[error("market year '{0}' must be a four-digit year (e.g. 2023)")]
    InvalidYear(String),
}

fn parse_code(kind: &'static str, s: &str) -> Result<String, ParamError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParamError::Empty { kind });
    }
    if !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ParamError::InvalidCode {
            kind,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

/// Provider-defined commodity identifier, e.g. `0440000` (PSD) or `101` (ESR).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommodityCode(String);

impl FromStr for CommodityCode {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code("commodity code", s).map(Self)
    }
}

impl fmt::Display for CommodityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Provider-defined country identifier, e.g. `US` or `1220`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCode(String);

impl FromStr for CountryCode {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_code("country code", s).map(Self)
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketYear(u16);

impl FromStr for MarketYear {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() != 4 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParamError::InvalidYear(trimmed.to_string()));
        }
        let year: u16 = trimmed
            .parse()
            .map_err(|_| ParamError::InvalidYear(trimmed.to_string()))?;
        if year < 1000 {
            return Err(ParamError::InvalidYear(trimmed.to_string()));
        }
        Ok(Self(year))
    }
}

impl fmt::Display for MarketYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Every GET endpoint the CLI can reach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    CommodityAttributes,
    Commodities,
    Countries,
    Regions,
    UnitsOfMeasure,
    WorldData {
        commodity: CommodityCode,
        year: MarketYear,
    },
    CountryData {
        commodity: CommodityCode,
        country: CountryCode,
        year: MarketYear,
    },
    EsrCommodities,
    EsrCountries,
    EsrReleaseDates,
    EsrRegions,
    EsrUnitsOfMeasure,
    EsrExportsAll {
        commodity: CommodityCode,
        year: MarketYear,
    },
    EsrExportsCountry {
        commodity: CommodityCode,
        country: CountryCode,
        year: MarketYear,
    },
}

impl Endpoint {
    /// Path relative to the API host, always starting with `/api/`.
    pub fn path(&self) -> String {
        match self {
            Self::CommodityAttributes => "/api/psd/commodityAttributes".to_string(),
            Self::Commodities => "/api/psd/commodities".to_string(),
            Self::Countries => "/api/psd/countries".to_string(),
            Self::Regions => "/api/psd/regions".to_string(),
            Self::UnitsOfMeasure => "/api/psd/unitsOfMeasure".to_string(),
            Self::WorldData { commodity, year } => {
                format!("/api/psd/commodity/{}/world/year/{}", commodity, year)
            }
            Self::CountryData {
                commodity,
                country,
                year,
            } => format!(
                "/api/psd/commodity/{}/country/{}/year/{}",
                commodity, country, year
            ),
            Self::EsrCommodities => "/api/esr/commodities".to_string(),
            Self::EsrCountries => "/api/esr/countries".to_string(),
            Self::EsrReleaseDates => "/api/esr/datareleasedates".to_string(),
            Self::EsrRegions => "/api/esr/regions".to_string(),
            Self::EsrUnitsOfMeasure => "/api/esr/unitsOfMeasure".to_string(),
            Self::EsrExportsAll { commodity, year } => format!(
                "/api/esr/exports/commodityCode/{}/allCountries/marketYear/{}",
                commodity, year
            ),
            Self::EsrExportsCountry {
                commodity,
                country,
                year,
            } => format!(
                "/api/esr/exports/commodityCode/{}/countryCode/{}/marketYear/{}",
                commodity, country, year
            ),
        }
    }
}
