//! A user's ranking session over one loaded catalog.
//!
//! The session owns the catalog and the [`ScoringConfig`] and applies user
//! actions to them. Each call to [`RankingSession::rank`] runs a fresh
//! synchronous scoring pass. Indicator ranges are cached and only
//! recomputed when the reference population or the active indicator set
//! changes.
//!
//! Origin lookups are asynchronous and may resolve late. Every request is
//! issued an [`OriginRequest`] ticket; results carrying an outdated ticket
//! are discarded.

use cityrank_core::{
    Catalog, CityRecord, Indicator, ProfileId, RangeScope, RankedCity, RegionFilter,
    ScoringConfig, WeightVector,
};
use geo::Point;
use log::debug;

use crate::normalise::RangeTable;
use crate::rank::rank;

/// Ticket identifying one origin lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginRequest {
    generation: u64,
}

impl OriginRequest {
    /// Generation number of the request.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RangeKey {
    scope: RangeScope,
    filter: Option<RegionFilter>,
    indicators: Vec<Indicator>,
}

#[derive(Debug, Clone)]
struct CachedRanges {
    key: RangeKey,
    table: RangeTable,
}

/// Mutable ranking state for one user.
///
/// # Examples
/// ```
/// use cityrank_core::{ProfileId, ScoringConfig, test_support::two_city_catalog};
/// use cityrank_scorer::RankingSession;
///
/// let mut session = RankingSession::new(two_city_catalog(), ScoringConfig::default());
/// session.select_profile(ProfileId::All);
/// let ranked = session.rank();
/// assert_eq!(ranked[0].city.name, "Brightwater");
/// ```
#[derive(Debug, Clone)]
pub struct RankingSession {
    catalog: Catalog,
    config: ScoringConfig,
    origin: Option<Point<f64>>,
    origin_generation: u64,
    cache: Option<CachedRanges>,
}

impl RankingSession {
    /// Start a session over `catalog` with `config`.
    #[must_use]
    pub const fn new(catalog: Catalog, config: ScoringConfig) -> Self {
        Self {
            catalog,
            config,
            origin: None,
            origin_generation: 0,
            cache: None,
        }
    }

    /// The catalog being ranked.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current configuration.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// The resolved origin, if any.
    #[must_use]
    pub const fn origin(&self) -> Option<Point<f64>> {
        self.origin
    }

    /// Switch audience profile, merging its presets over the current weights.
    pub fn select_profile(&mut self, profile: ProfileId) {
        self.config.select_profile(profile);
    }

    /// Set the weight of one indicator.
    pub fn set_weight(&mut self, indicator: Indicator, weight: u32) {
        self.config.weights.set_weight(indicator, weight);
    }

    /// Replace the whole weight vector.
    pub fn set_weights(&mut self, weights: WeightVector) {
        self.config.weights = weights;
    }

    /// Replace the region filter.
    pub fn set_filter(&mut self, filter: RegionFilter) {
        self.config.filter = filter;
    }

    /// Choose the reference population for indicator ranges.
    pub const fn set_range_scope(&mut self, scope: RangeScope) {
        self.config.range_scope = scope;
    }

    /// Set the weight of the proximity term.
    pub const fn set_distance_weight(&mut self, weight: u32) {
        self.config.distance.weight = weight;
    }

    /// Set the distance at or beyond which proximity scores zero.
    pub const fn set_max_distance_km(&mut self, max_km: u32) {
        self.config.distance.max_km = max_km;
    }

    /// Enable distance scoring and issue a ticket for a new origin lookup.
    ///
    /// Any lookup still in flight is superseded.
    pub fn request_origin(&mut self) -> OriginRequest {
        self.config.distance.enabled = true;
        self.next_generation()
    }

    /// Deliver the result of an origin lookup.
    ///
    /// Returns `false` and changes nothing when the ticket is outdated or
    /// distance scoring was disabled meanwhile. A `None` result records that
    /// no origin is available, so the proximity term drops out.
    pub fn resolve_origin(&mut self, request: OriginRequest, origin: Option<Point<f64>>) -> bool {
        if request.generation != self.origin_generation || !self.config.distance.enabled {
            debug!(
                "discarding stale origin result for request {}",
                request.generation
            );
            return false;
        }
        self.origin = origin;
        true
    }

    /// Enable distance scoring with a known origin.
    pub fn set_origin(&mut self, origin: Point<f64>) {
        let request = self.request_origin();
        self.resolve_origin(request, Some(origin));
    }

    /// Disable distance scoring and discard the origin.
    pub fn disable_distance(&mut self) {
        self.config.distance.enabled = false;
        self.origin = None;
        self.next_generation();
    }

    /// Report whether the proximity term takes part in scoring.
    #[must_use]
    pub fn distance_active(&self) -> bool {
        self.config.distance.term(self.origin).is_some()
    }

    /// Score the filtered cities and return them best first.
    pub fn rank(&mut self) -> Vec<RankedCity<'_>> {
        let weights = self.config.effective_weights();
        self.refresh_ranges(&weights);
        let this = &*self;
        let distance = this.config.distance.term(this.origin);
        let filter = &this.config.filter;
        rank(
            this.catalog.iter().filter(|city| filter.matches(city)),
            &weights,
            this.cached_ranges(),
            distance.as_ref(),
        )
    }

    /// Ranges used by the next pass, recomputing them when stale.
    pub fn ranges(&mut self) -> &RangeTable {
        let weights = self.config.effective_weights();
        self.refresh_ranges(&weights);
        self.cached_ranges()
    }

    fn next_generation(&mut self) -> OriginRequest {
        self.origin_generation = self.origin_generation.wrapping_add(1);
        OriginRequest {
            generation: self.origin_generation,
        }
    }

    fn range_key(&self, weights: &WeightVector) -> RangeKey {
        let filter = match self.config.range_scope {
            RangeScope::Catalog => None,
            RangeScope::Filtered => Some(self.config.filter.clone()),
        };
        RangeKey {
            scope: self.config.range_scope,
            filter,
            indicators: weights.active().map(|(indicator, _)| indicator).collect(),
        }
    }

    fn refresh_ranges(&mut self, weights: &WeightVector) {
        let key = self.range_key(weights);
        if self.cache.as_ref().is_some_and(|cached| cached.key == key) {
            debug!("reusing cached indicator ranges");
            return;
        }
        debug!(
            "recomputing ranges for {} indicators ({} scope)",
            key.indicators.len(),
            key.scope
        );
        let table = compute_table(&self.catalog, &key);
        self.cache = Some(CachedRanges { key, table });
    }

    fn cached_ranges(&self) -> &RangeTable {
        self.cache
            .as_ref()
            .map_or(&EMPTY_RANGES, |cached| &cached.table)
    }
}

static EMPTY_RANGES: RangeTable = RangeTable::empty();

fn compute_table(catalog: &Catalog, key: &RangeKey) -> RangeTable {
    let in_scope = |city: &&CityRecord| key.filter.as_ref().is_none_or(|f| f.matches(city));
    RangeTable::compute(
        catalog.iter().filter(in_scope),
        key.indicators.iter().copied(),
    )
}
