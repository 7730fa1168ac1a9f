#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Municipality energy statistics and heat map render types.
//!
//! These types describe both sides of the municipality energy density
//! map: the per-record statistics consumed from the installations API,
//! the per-municipality aggregates and heat points derived from them,
//! and the style, marker, and tooltip descriptors handed to a map
//! renderer.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Label shown in the tooltip of a municipality without installations.
pub const UNMATCHED_LABEL: &str = "Sin instalaciones registradas";

/// One raw statistics record as returned by the installations API.
///
/// The same municipality may appear several times (e.g. once per provider
/// or period). All numeric fields are non-negative and finite once they
/// have crossed the ingestion boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MunicipioStat {
    /// Province display name.
    pub provincia: String,
    /// Municipality display name, spelled as the statistics feed spells it.
    pub municipio: String,
    /// Number of customers with a completed installation.
    pub total_clientes_instalados: u64,
    /// Installed inverter capacity in kW.
    pub potencia_inversores_kw: f64,
    /// Installed panel capacity in kW.
    pub potencia_paneles_kw: f64,
    /// Total installed capacity in kW.
    pub total_kw_instalados: f64,
}

/// Totals for every statistics record sharing one normalized municipality
/// name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipioAggregate {
    /// Province display name (from the first record seen).
    pub provincia: String,
    /// Municipality display name (from the first record seen).
    pub municipio: String,
    /// Sum of `total_kw_instalados`.
    pub total_kw: f64,
    /// Sum of `potencia_paneles_kw`.
    pub paneles_kw: f64,
    /// Sum of `potencia_inversores_kw`.
    pub inversores_kw: f64,
    /// Sum of `total_clientes_instalados`.
    pub clientes_instalados: u64,
    /// Number of raw records folded into this aggregate.
    pub record_count: u32,
}

impl MunicipioAggregate {
    /// Creates an empty accumulator carrying the display names of the
    /// first record seen for a key.
    #[must_use]
    pub fn empty(provincia: impl Into<String>, municipio: impl Into<String>) -> Self {
        Self {
            provincia: provincia.into(),
            municipio: municipio.into(),
            total_kw: 0.0,
            paneles_kw: 0.0,
            inversores_kw: 0.0,
            clientes_instalados: 0,
            record_count: 0,
        }
    }
}

/// A lit municipality: one boundary feature joined with its aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatPoint {
    /// Normalized municipality name used for the join.
    pub key: String,
    /// Latitude of the marker position.
    pub lat: f64,
    /// Longitude of the marker position.
    pub lng: f64,
    /// Normalized intensity in `[floor, 1]`.
    pub intensity: f64,
    /// Province display name.
    pub provincia: String,
    /// Municipality display name.
    pub municipio: String,
    /// Total installed capacity in kW.
    pub total_kw: f64,
    /// Installed panel capacity in kW.
    pub paneles_kw: f64,
    /// Installed inverter capacity in kW.
    pub inversores_kw: f64,
}

/// Global "lights" toggle of the map.
///
/// With the lights off every municipality is drawn with the same dim
/// fill regardless of its data.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LightsMode {
    /// Intensity-driven styling.
    #[default]
    On,
    /// Uniform blackout styling.
    Off,
}

impl LightsMode {
    /// Returns `true` when the lights are on.
    #[must_use]
    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// Fill and stroke parameters for one boundary feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    /// CSS fill color.
    pub fill_color: String,
    /// Fill opacity in `[0, 1]`.
    pub fill_opacity: f64,
    /// CSS stroke color.
    pub stroke_color: String,
    /// Stroke width in pixels.
    pub stroke_weight: f64,
    /// Stroke opacity in `[0, 1]`.
    pub stroke_opacity: f64,
}

/// A glowing point marker placed at a heat point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlowMarker {
    /// Normalized municipality name.
    pub key: String,
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
    /// Glow diameter in pixels.
    pub size_px: f64,
    /// Glow opacity in `[0, 1]`.
    pub opacity: f64,
    /// Duration of one pulse cycle in seconds.
    pub pulse_duration_s: f64,
    /// Delay before the first pulse in seconds.
    pub pulse_delay_s: f64,
}

/// Tooltip content for one boundary feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Tooltip {
    /// The feature has a heat point.
    #[serde(rename_all = "camelCase")]
    Matched {
        /// Municipality display name.
        municipio: String,
        /// Province display name.
        provincia: String,
        /// Installed panel capacity in kW.
        paneles_kw: f64,
        /// Installed inverter capacity in kW.
        potencia_kw: f64,
    },
    /// The feature has no installations on record.
    Unmatched {
        /// Boundary name of the feature.
        name: String,
    },
}

impl std::fmt::Display for Tooltip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Matched {
                municipio,
                provincia,
                paneles_kw,
                potencia_kw,
            } => write!(
                f,
                "{municipio}\n{provincia}\nPaneles: {paneles_kw:.2} kW\nPotencia: {potencia_kw:.2} kW"
            ),
            Self::Unmatched { name } => write!(f, "{name}\n{UNMATCHED_LABEL}"),
        }
    }
}

/// Headline numbers of one heat map computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatmapSummary {
    /// Distinct municipalities with any statistics record, whether or not
    /// a boundary matched them.
    pub municipalities_with_data: usize,
    /// Number of heat points emitted.
    pub lit_municipalities: usize,
    /// Sum of installed kW across all aggregates.
    pub total_kw: f64,
    /// Normalization denominator (largest aggregate, at least 1).
    pub max_total_kw: f64,
}

/// Geographic bounding box of the boundary layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    /// Minimum latitude.
    pub south: f64,
    /// Minimum longitude.
    pub west: f64,
    /// Maximum latitude.
    pub north: f64,
    /// Maximum longitude.
    pub east: f64,
}

impl MapBounds {
    /// Returns the bounds as `[[south, west], [north, east]]`, the corner
    /// order map libraries expect for fitting a viewport.
    #[must_use]
    pub const fn corners(&self) -> [[f64; 2]; 2] {
        [[self.south, self.west], [self.north, self.east]]
    }
}

/// Numeric constants driving intensity and render styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeatmapTuning {
    /// Lower bound of every heat point intensity.
    pub intensity_floor: f64,
    /// Fill opacity of a lit feature at zero intensity.
    pub fill_base: f64,
    /// Fill opacity added per unit of intensity.
    pub fill_gain: f64,
    /// Upper bound of a lit feature's fill opacity.
    pub fill_cap: f64,
    /// Fill opacity of a feature without a heat point.
    pub unmatched_fill: f64,
    /// Fill opacity of every feature with the lights off.
    pub blackout_fill: f64,
    /// Glow diameter at zero intensity, in pixels.
    pub glow_base_px: f64,
    /// Glow diameter added per unit of intensity, in pixels.
    pub glow_gain_px: f64,
    /// Glow opacity at zero intensity.
    pub glow_opacity_base: f64,
    /// Glow opacity added per unit of intensity.
    pub glow_opacity_gain: f64,
    /// Pulse cycle length at zero intensity, in seconds.
    pub pulse_base_s: f64,
    /// Seconds removed from the pulse cycle per unit of intensity.
    pub pulse_speedup_s: f64,
    /// Number of distinct stagger slots for pulse delays.
    pub pulse_stagger_slots: usize,
    /// Delay between consecutive stagger slots, in seconds.
    pub pulse_stagger_step_s: f64,
}

impl Default for HeatmapTuning {
    fn default() -> Self {
        Self {
            intensity_floor: 0.16,
            fill_base: 0.18,
            fill_gain: 0.42,
            fill_cap: 0.72,
            unmatched_fill: 0.03,
            blackout_fill: 0.04,
            glow_base_px: 16.0,
            glow_gain_px: 36.0,
            glow_opacity_base: 0.2,
            glow_opacity_gain: 0.7,
            pulse_base_s: 3.4,
            pulse_speedup_s: 1.1,
            pulse_stagger_slots: 9,
            pulse_stagger_step_s: 0.35,
        }
    }
}
