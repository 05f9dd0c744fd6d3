//! Normalisation, scoring and ranking for CityRank catalogs.
//!
//! The crate is the single canonical implementation of the scoring engine
//! consumed by every front end:
//! - **Normalisation** computes a min–max [`IndicatorRange`] per indicator
//!   over a reference population and maps raw values onto `0.0..=1.0`,
//!   honouring each indicator's polarity. Missing values and degenerate
//!   ranges contribute the neutral midpoint.
//! - **Scoring** combines normalised values, and optionally a proximity term
//!   derived from the haversine distance to the user's origin, into a
//!   weighted average. [`WeightedScorer`] implements the
//!   [`Scorer`](cityrank_core::Scorer) trait.
//! - **Ranking** sorts scored cities by descending score with a stable sort.
//! - **Sessions** ([`RankingSession`]) hold the user's evolving
//!   configuration, cache ranges between passes and discard stale origin
//!   lookups.
//!
//! # Examples
//!
//! ```
//! use cityrank_core::{Indicator, WeightVector, test_support::two_city_catalog};
//! use cityrank_scorer::{RangeTable, rank};
//!
//! let catalog = two_city_catalog();
//! let indicators = [Indicator::GdpPerCapita, Indicator::LifeExpectancy, Indicator::Pm25];
//! let ranges = RangeTable::compute(catalog.iter(), indicators);
//! let weights: WeightVector = indicators.into_iter().map(|i| (i, 1)).collect();
//!
//! let ranked = rank(&catalog, &weights, &ranges, None);
//! assert_eq!(ranked[0].score, 1.0);
//! assert_eq!(ranked[1].score, 0.0);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod distance;
mod normalise;
mod rank;
mod score;
mod session;

pub use distance::{EARTH_RADIUS_KM, haversine_km, proximity};
pub use normalise::{IndicatorRange, NEUTRAL, RangeTable, compute_range, normalize};
pub use rank::{by_descending_score, rank};
pub use score::{SCORE_SCALE, WeightedScorer, compute_score, score_city};
pub use session::{OriginRequest, RankingSession};

#[cfg(test)]
mod tests;
