//! Render parameters derived from heat points.
//!
//! Pure functions of a heat point (or its absence), the global
//! [`LightsMode`], and the [`HeatmapTuning`] constants. Unmatched
//! features never depend on intensity.

use solar_map_heatmap_models::{
    FeatureStyle, GlowMarker, HeatPoint, HeatmapTuning, LightsMode, Tooltip,
};

/// Fill of a lit municipality.
pub const LIT_FILL_COLOR: &str = "#facc15";
/// Fill of a municipality without installations.
pub const UNLIT_FILL_COLOR: &str = "#334155";
/// Fill of every municipality with the lights off.
pub const BLACKOUT_FILL_COLOR: &str = "#0f172a";
/// Boundary stroke color.
pub const STROKE_COLOR: &str = "#94a3b8";

const STROKE_WEIGHT: f64 = 1.0;
const LIT_STROKE_OPACITY: f64 = 0.8;
const UNLIT_STROKE_OPACITY: f64 = 0.5;
const BLACKOUT_STROKE_OPACITY: f64 = 0.35;

/// Derives the fill and stroke of one boundary feature.
#[must_use]
pub fn feature_style(
    point: Option<&HeatPoint>,
    lights: LightsMode,
    tuning: &HeatmapTuning,
) -> FeatureStyle {
    if !lights.is_on() {
        return FeatureStyle {
            fill_color: BLACKOUT_FILL_COLOR.to_string(),
            fill_opacity: tuning.blackout_fill,
            stroke_color: STROKE_COLOR.to_string(),
            stroke_weight: STROKE_WEIGHT,
            stroke_opacity: BLACKOUT_STROKE_OPACITY,
        };
    }

    match point {
        Some(point) => FeatureStyle {
            fill_color: LIT_FILL_COLOR.to_string(),
            fill_opacity: point
                .intensity
                .mul_add(tuning.fill_gain, tuning.fill_base)
                .min(tuning.fill_cap),
            stroke_color: STROKE_COLOR.to_string(),
            stroke_weight: STROKE_WEIGHT,
            stroke_opacity: LIT_STROKE_OPACITY,
        },
        None => FeatureStyle {
            fill_color: UNLIT_FILL_COLOR.to_string(),
            fill_opacity: tuning.unmatched_fill,
            stroke_color: STROKE_COLOR.to_string(),
            stroke_weight: STROKE_WEIGHT,
            stroke_opacity: UNLIT_STROKE_OPACITY,
        },
    }
}

/// Derives the glow marker of the `index`-th heat point.
///
/// Brighter points glow larger and pulse faster. Pulse delays cycle
/// through a fixed number of slots so neighbouring markers do not pulse
/// in lockstep. With the lights off the glow is fully transparent.
#[must_use]
pub fn glow_marker(
    point: &HeatPoint,
    index: usize,
    lights: LightsMode,
    tuning: &HeatmapTuning,
) -> GlowMarker {
    let intensity = point.intensity;
    let opacity = if lights.is_on() {
        intensity.mul_add(tuning.glow_opacity_gain, tuning.glow_opacity_base)
    } else {
        0.0
    };
    #[allow(clippy::cast_precision_loss)]
    let slot = (index % tuning.pulse_stagger_slots.max(1)) as f64;

    GlowMarker {
        key: point.key.clone(),
        lat: point.lat,
        lng: point.lng,
        size_px: intensity.mul_add(tuning.glow_gain_px, tuning.glow_base_px),
        opacity,
        pulse_duration_s: intensity.mul_add(-tuning.pulse_speedup_s, tuning.pulse_base_s),
        pulse_delay_s: slot * tuning.pulse_stagger_step_s,
    }
}

/// Builds the tooltip of a feature named `name`.
#[must_use]
pub fn tooltip(name: &str, point: Option<&HeatPoint>) -> Tooltip {
    point.map_or_else(
        || Tooltip::Unmatched {
            name: name.to_string(),
        },
        |point| Tooltip::Matched {
            municipio: point.municipio.clone(),
            provincia: point.provincia.clone(),
            paneles_kw: point.paneles_kw,
            potencia_kw: point.inversores_kw,
        },
    )
}
