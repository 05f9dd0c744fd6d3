//! Data access for the CityRank engine.
//!
//! Responsibilities:
//! - Load catalogs from JSON files ([`JsonCatalogSource`]).
//! - Resolve the user's origin over HTTP ([`HttpOriginLocator`]).
//! - Fill gaps in a catalog offline through an OpenAI-compatible completion
//!   endpoint ([`enrich::EnrichmentJob`]).
//!
//! Boundaries:
//! - Do not encode scoring rules (live in `cityrank-scorer`).
//! - Filesystem access goes through `cityrank-fs`.
//!
//! Invariants:
//! - Absent or non-numeric values never become `0`.
//! - The catalog file is replaced atomically or not at all.

pub mod catalog;
pub mod enrich;
pub mod geolocate;
mod transport;

pub use catalog::{
    CatalogDocument, JsonCatalogSource, parse_catalog, read_document, record_from_object,
};
pub use geolocate::{
    DEFAULT_LOCATE_TIMEOUT, DEFAULT_LOCATE_URL, HttpOriginLocator, HttpOriginLocatorConfig,
    LocateError, OriginLocator, locate_with_timeout, parse_origin,
};
pub use transport::{ClientBuildError, TransportError};

pub mod test_support;
