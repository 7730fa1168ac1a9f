//! Folds raw statistics records into per-municipality totals.

use std::collections::BTreeMap;

use solar_map_heatmap_models::{MunicipioAggregate, MunicipioStat};

use crate::normalize::normalize_name;

/// Aggregates keyed by normalized municipality name.
pub type AggregateMap = BTreeMap<String, MunicipioAggregate>;

/// Sums every record sharing a normalized municipality name.
///
/// Display names come from the first record seen for a key; later records
/// only contribute to the sums. Non-finite and negative capacities count
/// as zero, so the sums never decrease and never become `NaN`. Sums
/// saturate at `f64::MAX`. Records
/// whose name normalizes to the empty key cannot be joined and are
/// skipped.
#[must_use]
pub fn aggregate_stats<'a, I>(records: I) -> AggregateMap
where
    I: IntoIterator<Item = &'a MunicipioStat>,
{
    let mut aggregates = AggregateMap::new();

    for record in records {
        let key = normalize_name(&record.municipio);
        if key.is_empty() {
            log::debug!(
                "Skipping statistics record without a usable municipality name (provincia={:?})",
                record.provincia
            );
            continue;
        }

        let entry = aggregates
            .entry(key)
            .or_insert_with(|| MunicipioAggregate::empty(&record.provincia, &record.municipio));

        entry.total_kw = add_kw(entry.total_kw, record.total_kw_instalados);
        entry.paneles_kw = add_kw(entry.paneles_kw, record.potencia_paneles_kw);
        entry.inversores_kw = add_kw(entry.inversores_kw, record.potencia_inversores_kw);
        entry.clientes_instalados = entry
            .clientes_instalados
            .saturating_add(record.total_clientes_instalados);
        entry.record_count = entry.record_count.saturating_add(1);
    }

    aggregates
}

/// Coerces a capacity into a finite, non-negative value.
#[must_use]
pub fn kw_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Adds a capacity to a running sum, saturating at `f64::MAX`.
#[must_use]
pub fn add_kw(sum: f64, value: f64) -> f64 {
    (sum + kw_or_zero(value)).min(f64::MAX)
}
