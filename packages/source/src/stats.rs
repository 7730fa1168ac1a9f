//! Ingestion boundary for the installation statistics feed.
//!
//! The API payload is loosely typed: capacities arrive as numbers or as
//! decimal strings, and fields may be missing or `null`. Every record is
//! parsed field by field into a [`MunicipioStat`] whose numbers are
//! finite and non-negative, defaulting to zero instead of failing. Only
//! an envelope that cannot be trusted as a whole (`success: false`, no
//! `data` array, invalid JSON) is rejected.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use solar_map_heatmap_models::MunicipioStat;

use crate::StatsError;

/// A validated statistics payload.
#[derive(Debug, Clone)]
pub struct StatsSnapshot {
    /// Parsed records, shared so the heat map pipeline can cache on them.
    pub records: Arc<Vec<MunicipioStat>>,
    /// `total_municipios` as reported by the API. Informational only.
    pub reported_total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct StatsEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    total_municipios: Option<Value>,
}

/// Parses and validates a statistics response body.
///
/// # Errors
///
/// * [`StatsError::Json`] if the body is not a JSON object
/// * [`StatsError::Rejected`] if `success` is not `true`
/// * [`StatsError::MalformedData`] if `data` is missing or not an array
pub fn parse_stats_response(body: &str) -> Result<StatsSnapshot, StatsError> {
    let envelope: StatsEnvelope = serde_json::from_str(body)?;

    if !envelope.success {
        return Err(StatsError::Rejected {
            message: envelope.message,
        });
    }

    let Some(Value::Array(items)) = envelope.data else {
        return Err(StatsError::MalformedData);
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match item.as_object() {
            Some(object) => records.push(parse_record(object)),
            None => log::warn!("Skipping statistics entry {i}: expected an object, got {item}"),
        }
    }

    let reported_total = envelope.total_municipios.as_ref().and_then(Value::as_u64);
    if let Some(total) = reported_total {
        log::debug!(
            "Statistics API reports {total} municipalities across {} records",
            records.len()
        );
    }

    Ok(StatsSnapshot {
        records: Arc::new(records),
        reported_total,
    })
}

fn parse_record(object: &Map<String, Value>) -> MunicipioStat {
    MunicipioStat {
        provincia: text_field(object, "provincia"),
        municipio: text_field(object, "municipio"),
        total_clientes_instalados: count_field(object, "total_clientes_instalados"),
        potencia_inversores_kw: kw_field(object, "potencia_inversores_kw"),
        potencia_paneles_kw: kw_field(object, "potencia_paneles_kw"),
        total_kw_instalados: kw_field(object, "total_kw_instalados"),
    }
}

/// Reads a string field; anything else is the empty string.
fn text_field(object: &Map<String, Value>, name: &str) -> String {
    object
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reads a capacity given as a number or a numeric string. Missing,
/// non-numeric, negative, and non-finite values are zero.
fn kw_field(object: &Map<String, Value>, name: &str) -> f64 {
    let value = match object.get(name) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Reads a count the same way as [`kw_field`], truncating fractions.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count_field(object: &Map<String, Value>, name: &str) -> u64 {
    match object.get(name) {
        Some(Value::Number(n)) if n.is_u64() => n.as_u64().unwrap_or(0),
        _ => kw_field(object, name).trunc() as u64,
    }
}
