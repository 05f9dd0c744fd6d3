//! Facade crate for the CityRank scoring engine.
//!
//! This crate re-exports the core domain types and the ranking session, and
//! exposes the JSON catalog loader, origin lookup and enrichment job behind
//! the `data` feature.
//!
//! # Examples
//!
//! ```
//! use cityrank::{Catalog, CityId, CityRecord, Indicator, RankingSession, ScoringConfig};
//!
//! let catalog = Catalog::from_records([
//!     CityRecord::new(CityId(1), "Oslo", "Norway", "Europe").with_indicator(Indicator::Pm25, 5.0),
//!     CityRecord::new(CityId(2), "Dhaka", "Bangladesh", "Asia").with_indicator(Indicator::Pm25, 80.0),
//! ]);
//! let mut session = RankingSession::new(catalog, ScoringConfig::default());
//! let ranked = session.rank();
//! assert_eq!(ranked[0].city.name, "Oslo");
//! ```

#![forbid(unsafe_code)]

pub use cityrank_core::{
    AudienceProfile, Catalog, CatalogError, CatalogSource, CityId, CityRecord, DistanceSettings,
    Indicator, IndicatorValues, Polarity, ProfileId, RangeScope, RankedCity, RegionFilter,
    ScoringConfig, WeightVector, share,
};
pub use cityrank_scorer::{OriginRequest, RankingSession, WeightedScorer};

#[cfg(feature = "data")]
pub use cityrank_data::{
    HttpOriginLocator, JsonCatalogSource, OriginLocator, enrich, locate_with_timeout,
};
