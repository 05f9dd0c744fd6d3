//! Parsing model replies into indicator values.

use cityrank_core::IndicatorValues;
use serde_json::{Map, Value};

use super::{CORE_FIELDS, EnrichError};

const SMART_QUOTES: [(char, char); 6] = [
    ('\u{201c}', '"'),
    ('\u{201d}', '"'),
    ('\u{201e}', '"'),
    ('\u{2018}', '\''),
    ('\u{2019}', '\''),
    ('\u{00ab}', '"'),
];

/// Parse a reply into values for the core fields.
///
/// Code fences and typographic quotes are removed first. Numbers and
/// numeric strings are accepted; `null`, other types and non-finite values
/// are skipped.
///
/// # Examples
/// ```
/// use cityrank_core::Indicator;
/// use cityrank_data::enrich::parse_response;
///
/// let values = parse_response("```json\n{\u{201c}pm25\u{201d}: \"7.5\", \"gdp_per_capita\": null}\n```")?;
/// assert_eq!(values.get(Indicator::Pm25), Some(7.5));
/// assert_eq!(values.get(Indicator::GdpPerCapita), None);
/// # Ok::<(), cityrank_data::enrich::EnrichError>(())
/// ```
///
/// # Errors
/// Returns [`EnrichError::Parse`] when no JSON object can be recovered and
/// [`EnrichError::NoValues`] when the object holds no usable value.
pub fn parse_response(reply: &str) -> Result<IndicatorValues, EnrichError> {
    let cleaned = normalise_quotes(strip_code_fence(reply.trim()));
    let object = object_slice(&cleaned);
    let map: Map<String, Value> =
        serde_json::from_str(object).map_err(|err| EnrichError::Parse {
            message: err.to_string(),
        })?;
    let values: IndicatorValues = CORE_FIELDS
        .into_iter()
        .filter_map(|indicator| {
            map.get(indicator.as_str())
                .and_then(numeric)
                .map(|value| (indicator, value))
        })
        .collect();
    if values.is_empty() {
        return Err(EnrichError::NoValues);
    }
    Ok(values)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn normalise_quotes(text: &str) -> String {
    text.chars()
        .map(|c| {
            SMART_QUOTES
                .iter()
                .find(|(smart, _)| *smart == c)
                .map_or(c, |(_, plain)| *plain)
        })
        .collect()
}

fn object_slice(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}
