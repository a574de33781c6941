//! Production, Supply and Distribution endpoints.

use serde_json::Value;

use super::{ApiError, CommodityCode, CountryCode, Endpoint, FasClient, MarketYear};

impl FasClient {
    /// Commodity attribute names and their attribute IDs.
    pub async fn commodity_attributes(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::CommodityAttributes).await
    }

    pub async fn commodities(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::Commodities).await
    }

    pub async fn countries(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::Countries).await
    }

    pub async fn regions(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::Regions).await
    }

    pub async fn units_of_measure(&self) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::UnitsOfMeasure).await
    }

    /// World-level PSD data for one commodity and market year.
    pub async fn world_data(
        &self,
        commodity: CommodityCode,
        year: MarketYear,
    ) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::WorldData { commodity, year }).await
    }

    /// PSD data for one commodity, country and market year.
    pub async fn country_data(
        &self,
        commodity: CommodityCode,
        country: CountryCode,
        year: MarketYear,
    ) -> Result<Value, ApiError> {
        self.get_json(&Endpoint::CountryData {
            commodity,
            country,
            year,
        })
        .await
    }
}
