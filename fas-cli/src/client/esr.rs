//! Export Sales Reporting endpoints.

use serde_json::Value;

use super::{ApiError, CommodityCode, CountryCode, Endpoint, FasClient, MarketYear};

impl FasClient {
    pub async fn esr_commodities(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::EsrCommodities).await
    }

    pub async fn esr_countries(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::EsrCountries).await
    }

    /// Weekly data release dates.
    pub async fn esr_release_dates(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::EsrReleaseDates).await
    }

    pub async fn esr_regions(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::EsrRegions).await
    }

    pub async fn esr_units_of_measure(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::EsrUnitsOfMeasure).await
    }

    /// Export sales of one commodity to all destination countries.
    pub async fn esr_exports_all(
        &self,
        commodity: CommodityCode,
        year: MarketYear,
    ) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::EsrExportsAll { commodity, year })
            .await
    }

    pub async fn esr_exports_country(
        &self,
        commodity: CommodityCode,
        country: CountryCode,
        year: MarketYear,
    ) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::EsrExportsCountry {
            commodity,
            country,
            year,
        })
        .await
    }
}
