//! JSON catalog files.
//!
//! A catalog file is a JSON array of objects. Each object carries the
//! city's identity (`name` or `city`, `country_name` or `country`,
//! `continent`), an optional position (`lat`, `lon`) and any subset of the
//! indicator fields keyed by [`Indicator::as_str`]. Fields this crate does
//! not know about are kept verbatim in [`CatalogDocument`] so the enrichment
//! job can rewrite the file without losing them.

use std::collections::BTreeSet;

use camino::{Utf8Path, Utf8PathBuf};
use cityrank_core::{Catalog, CatalogError, CatalogSource, CityId, CityRecord, Indicator};
use geo::Point;
use log::{debug, info};
use serde_json::{Map, Value};

const NAME_KEYS: [&str; 2] = ["name", "city"];
const COUNTRY_KEYS: [&str; 2] = ["country_name", "country"];
const REGION_KEYS: [&str; 2] = ["region_name", "region"];
const ID_KEYS: [&str; 2] = ["geonameid", "id"];

/// A parsed catalog file that preserves every field of every record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogDocument {
    name: String,
    records: Vec<Map<String, Value>>,
}

impl CatalogDocument {
    /// Parse `text` as a catalog called `name`.
    ///
    /// # Errors
    /// Returns [`CatalogError::Malformed`] when `text` is not a JSON array of
    /// objects.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, CatalogError> {
        let name = name.into();
        match serde_json::from_str::<Vec<Map<String, Value>>>(text) {
            Ok(records) => Ok(Self { name, records }),
            Err(source) => Err(CatalogError::Malformed {
                name,
                source: Box::new(source),
            }),
        }
    }

    /// Wrap already-parsed records.
    pub fn from_records(name: impl Into<String>, records: Vec<Map<String, Value>>) -> Self {
        Self {
            name: name.into(),
            records,
        }
    }

    /// Name of the source, usually its path.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw records in file order.
    pub fn records(&self) -> &[Map<String, Value>] {
        &self.records
    }

    /// Mutable access to the raw records.
    pub fn records_mut(&mut self) -> &mut [Map<String, Value>] {
        &mut self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Report whether the document holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// City id of every record in file order.
    ///
    /// A record without a usable id gets the smallest number at or after its
    /// 1-based position that no other record in the file claims.
    pub fn record_ids(&self) -> Vec<CityId> {
        let explicit: Vec<Option<CityId>> = self.records.iter().map(first_id).collect();
        let mut taken: BTreeSet<CityId> = explicit.iter().flatten().copied().collect();
        explicit
            .into_iter()
            .enumerate()
            .map(|(index, id)| {
                id.unwrap_or_else(|| {
                    let mut candidate = u64::try_from(index + 1).unwrap_or(u64::MAX);
                    while candidate < u64::MAX && taken.contains(&CityId(candidate)) {
                        candidate += 1;
                    }
                    debug!("record at position {} has no id; using {candidate}", index + 1);
                    taken.insert(CityId(candidate));
                    CityId(candidate)
                })
            })
            .collect()
    }

    /// Convert the raw records into a [`Catalog`].
    pub fn to_catalog(&self) -> Catalog {
        Catalog::from_records(
            self.record_ids()
                .into_iter()
                .zip(&self.records)
                .map(|(id, object)| record_from_object(id, object)),
        )
    }

    /// Serialise the document back to pretty-printed JSON.
    ///
    /// # Errors
    /// Propagates serialisation failures from `serde_json`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(&self.records)?;
        text.push('\n');
        Ok(text)
    }
}

/// Parse a catalog held in memory.
///
/// # Examples
/// ```
/// use cityrank_core::{CityId, Indicator};
/// use cityrank_data::parse_catalog;
///
/// let catalog = parse_catalog(
///     "inline",
///     r#"[{"geonameid": 7, "name": "Tartu", "country": "Estonia",
///          "continent": "Europe", "lat": 58.38, "lon": 26.72, "pm25": null}]"#,
/// )?;
/// let city = &catalog.cities()[0];
/// assert_eq!(city.id, CityId(7));
/// assert_eq!(city.value(Indicator::Pm25), None);
/// # Ok::<(), cityrank_core::CatalogError>(())
/// ```
///
/// # Errors
/// Returns [`CatalogError::Malformed`] when `text` is not a JSON array of
/// objects.
pub fn parse_catalog(name: &str, text: &str) -> Result<Catalog, CatalogError> {
    CatalogDocument::parse(name, text).map(|document| document.to_catalog())
}

/// Build a [`CityRecord`] from one catalog object.
///
/// `fallback` becomes the id when the object has none; see
/// [`CatalogDocument::record_ids`] for how a file picks it. Missing, `null`
/// and non-numeric indicator values are left absent.
pub fn record_from_object(fallback: CityId, object: &Map<String, Value>) -> CityRecord {
    let id = first_id(object).unwrap_or(fallback);
    let mut record = CityRecord::new(
        id,
        first_text(object, &NAME_KEYS).unwrap_or_default(),
        first_text(object, &COUNTRY_KEYS).unwrap_or_default(),
        first_text(object, &["continent"]).unwrap_or_default(),
    );
    record.region = first_text(object, &REGION_KEYS);
    record.population = object.get("population").and_then(Value::as_u64);
    record.location = location(object);
    for indicator in Indicator::ALL {
        if let Some(value) = object.get(indicator.as_str()).and_then(number) {
            record.indicators.set(indicator, value);
        }
    }
    record
}

/// Read a [`CatalogDocument`] from `path`.
///
/// # Errors
/// Returns [`CatalogError::Read`] when the file cannot be read and
/// [`CatalogError::Malformed`] when its contents are not a catalog.
pub fn read_document(path: &Utf8Path) -> Result<CatalogDocument, CatalogError> {
    let text = cityrank_fs::read_to_string(path).map_err(|source| CatalogError::Read {
        name: path.to_string(),
        source,
    })?;
    CatalogDocument::parse(path.as_str(), &text)
}

/// Loads a catalog from a JSON file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonCatalogSource {
    path: Utf8PathBuf,
}

impl JsonCatalogSource {
    /// Create a source reading `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the catalog file.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl CatalogSource for JsonCatalogSource {
    fn load(&self) -> Result<Catalog, CatalogError> {
        let catalog = read_document(&self.path)?.to_catalog();
        info!("loaded {} cities from {}", catalog.len(), self.path);
        Ok(catalog)
    }
}

fn number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| v.is_finite())
}

fn first_text(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| value.as_str().map(str::trim).filter(|s| !s.is_empty()))
        .map(str::to_owned)
}

fn first_id(object: &Map<String, Value>) -> Option<CityId> {
    ID_KEYS
        .iter()
        .filter_map(|key| object.get(*key))
        .find_map(|value| match value {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .map(CityId)
}

fn location(object: &Map<String, Value>) -> Option<Point<f64>> {
    let lat = object.get("lat").and_then(number)?;
    let lon = object.get("lon").and_then(number)?;
    ((-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon))
        .then(|| Point::new(lon, lat))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected an object, got {other}"),
        }
    }

    #[rstest]
    fn reads_identity_and_location_from_either_key() {
        let record = record_from_object(
            CityId(3),
            &object(json!({
                "city": "Porto",
                "country_name": "Portugal",
                "country": "PT",
                "continent": "Europe",
                "region_name": "Norte",
                "population": 231800,
                "lat": 41.15,
                "lon": -8.61,
            })),
        );
        assert_eq!(record.id, CityId(3));
        assert_eq!(record.name, "Porto");
        assert_eq!(record.country, "Portugal");
        assert_eq!(record.region.as_deref(), Some("Norte"));
        assert_eq!(record.population, Some(231_800));
        assert_eq!(record.location, Some(Point::new(-8.61, 41.15)));
    }

    #[rstest]
    #[case(json!({"geonameid": 2735943}), CityId(2_735_943))]
    #[case(json!({"id": "42"}), CityId(42))]
    #[case(json!({"geonameid": "x", "id": 5}), CityId(5))]
    #[case(json!({"id": -1}), CityId(9))]
    fn ids_fall_back_when_absent(#[case] value: Value, #[case] expected: CityId) {
        assert_eq!(record_from_object(CityId(9), &object(value)).id, expected);
    }

    #[rstest]
    #[case(json!(null))]
    #[case(json!("12.5"))]
    #[case(json!(true))]
    #[case(json!([1.0]))]
    fn non_numeric_indicator_values_are_absent(#[case] value: Value) {
        let record = record_from_object(CityId(1), &object(json!({ "pm25": value })));
        assert_eq!(record.value(Indicator::Pm25), None);
    }

    #[rstest]
    fn numeric_indicator_values_are_kept() {
        let record = record_from_object(
            CityId(1),
            &object(json!({ "pm25": 8, "gdp_per_capita": 41000.5, "unknown": 3 })),
        );
        assert_eq!(record.value(Indicator::Pm25), Some(8.0));
        assert_eq!(record.value(Indicator::GdpPerCapita), Some(41_000.5));
        assert_eq!(record.indicators.len(), 2);
    }

    #[rstest]
    #[case(json!({"lat": 10.0}))]
    #[case(json!({"lat": 95.0, "lon": 0.0}))]
    #[case(json!({"lat": "10", "lon": 0.0}))]
    fn incomplete_positions_are_dropped(#[case] value: Value) {
        assert_eq!(record_from_object(CityId(1), &object(value)).location, None);
    }

    #[rstest]
    #[case("{}")]
    #[case("[1, 2]")]
    #[case("[{\"name\": ")]
    fn rejects_documents_that_are_not_arrays_of_objects(#[case] text: &str) {
        let err = parse_catalog("bad.json", text).expect_err("malformed catalog");
        assert!(matches!(err, CatalogError::Malformed { ref name, .. } if name == "bad.json"));
    }

    #[rstest]
    fn duplicate_ids_keep_the_first_record() {
        let catalog = parse_catalog(
            "dupes",
            r#"[{"id": 1, "name": "First"}, {"id": 1, "name": "Second"}, {"name": "Third"}]"#,
        )
        .expect("valid catalog");
        let names: Vec<_> = catalog.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Third"]);
        assert_eq!(catalog.cities()[1].id, CityId(3));
    }

    #[rstest]
    fn positional_ids_never_shadow_explicit_ones() {
        let catalog = parse_catalog(
            "mixed",
            r#"[{"name": "A"}, {"name": "B"}, {"id": 2, "name": "C"}, {"geonameid": "3", "name": "D"}]"#,
        )
        .expect("valid catalog");
        let cities: Vec<_> = catalog.iter().map(|c| (c.name.as_str(), c.id)).collect();
        assert_eq!(
            cities,
            vec![
                ("A", CityId(1)),
                ("B", CityId(4)),
                ("C", CityId(2)),
                ("D", CityId(3)),
            ]
        );
    }

    #[rstest]
    fn document_round_trip_keeps_unknown_fields() {
        let text = r#"[{"name": "Lagos", "flag": "ng", "nested": {"a": 1}}]"#;
        let document = CatalogDocument::parse("doc", text).expect("valid document");
        let written = document.to_json().expect("serialises");
        let reread = CatalogDocument::parse("doc", &written).expect("valid document");
        assert_eq!(reread, document);
        assert_eq!(reread.records()[0].get("flag"), Some(&json!("ng")));
    }

    #[rstest]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.json")).expect("utf-8 path");
        let source = JsonCatalogSource::new(path);
        assert!(matches!(source.load(), Err(CatalogError::Read { .. })));
        assert!(source.load_or_empty().is_empty());
    }
}
