//! Core domain types for the CityRank engine.
//!
//! The crate defines the closed indicator registry, city records and the
//! catalog that holds them, user-controlled weights, audience profiles,
//! region filters and distance settings, together with the shareable
//! query-string encoding of a full [`ScoringConfig`]. Computation lives in
//! `cityrank-scorer`; this crate only models the inputs and the
//! [`Scorer`] seam.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod catalog;
pub mod city;
pub mod config;
pub mod distance;
pub mod filter;
pub mod indicator;
pub mod profile;
pub mod scorer;
pub mod share;
pub mod weights;

pub use catalog::{Catalog, CatalogError, CatalogSource};
pub use city::{CityId, CityRecord, IndicatorValues};
pub use config::{RangeScope, ScoringConfig};
pub use distance::{
    DEFAULT_DISTANCE_WEIGHT, DEFAULT_MAX_DISTANCE_KM, DistanceSettings, DistanceTerm,
};
pub use filter::RegionFilter;
pub use indicator::{Indicator, IndicatorDefinition, Polarity, REGISTRY};
pub use profile::{AudienceProfile, ProfileId, apply_profile};
pub use scorer::{RankedCity, Scorer};
pub use weights::WeightVector;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
#[cfg(any(test, feature = "test-support"))]
pub use test_support::{FailingCatalog, MemoryCatalog};
