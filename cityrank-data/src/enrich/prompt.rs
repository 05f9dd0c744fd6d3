//! Prompt text sent for each record.

use std::fmt::Write as _;

use cityrank_core::CityRecord;

use super::CORE_FIELDS;

/// System instruction accompanying every prompt.
pub const SYSTEM_PROMPT: &str = "You return only JSON, with no commentary and no code fences.";

/// Build the user prompt asking for every core field of `city`.
///
/// # Examples
/// ```
/// use cityrank_core::{CityId, CityRecord};
/// use cityrank_data::enrich::build_prompt;
///
/// let prompt = build_prompt(&CityRecord::new(CityId(1), "Cusco", "Peru", "South America"));
/// assert!(prompt.contains("Cusco, Peru"));
/// assert!(prompt.contains("\"doctors_per_1000\""));
/// ```
pub fn build_prompt(city: &CityRecord) -> String {
    let mut prompt = format!(
        "Give the most recent numeric values for the city of {}, {}",
        city.name, city.country
    );
    if !city.continent.is_empty() {
        let _ = write!(prompt, " ({})", city.continent);
    }
    prompt.push_str(
        ". Answer with a single strict JSON object with exactly these keys, \
         using a number for each value and null when it is unknown:\n",
    );
    for indicator in CORE_FIELDS {
        let definition = indicator.definition();
        let _ = write!(prompt, "- \"{}\": {}", definition.key, definition.label);
        if !definition.unit.is_empty() {
            let _ = write!(prompt, " ({})", definition.unit);
        }
        prompt.push('\n');
    }
    prompt
}
