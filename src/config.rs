use crate::affiliation::DEFAULT_MERGE_GAP;
use crate::parties::{PartyOverride, PartyTable};
use crate::theme::Theme;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Seat allocation and ring geometry for the hemicycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub rows: usize,
    /// Nominal seats in the innermost row.
    pub base_seats: usize,
    /// Nominal seats added per row going outwards.
    pub seat_increment: usize,
    /// Innermost radius as a fraction of the outer half-diameter.
    pub inner_radius: f32,
    /// Radius growth per row as a fraction of the outer half-diameter.
    pub radius_step: f32,
    /// Seat dot radius relative to the row spacing.
    pub seat_scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            rows: 5,
            base_seats: 20,
            seat_increment: 8,
            inner_radius: 0.5,
            radius_step: 0.12,
            seat_scale: 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub diameter: f32,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
    pub title: Option<String>,
    pub show_total: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            diameter: 600.0,
            width: 1000.0,
            height: 400.0,
            padding: 16.0,
            title: None,
            show_total: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffiliationConfig {
    pub max_gap_seconds: i64,
}

impl AffiliationConfig {
    pub fn max_gap(&self) -> TimeDelta {
        TimeDelta::try_seconds(self.max_gap_seconds).unwrap_or(DEFAULT_MERGE_GAP)
    }
}

impl Default for AffiliationConfig {
    fn default() -> Self {
        Self {
            max_gap_seconds: DEFAULT_MERGE_GAP.num_seconds(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub affiliation: AffiliationConfig,
    pub parties: PartyTable,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    hemicycle: Option<HemicycleFile>,
    affiliation: Option<AffiliationFile>,
    parties: Option<BTreeMap<String, PartyOverride>>,
    neutral_color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    seat_stroke: Option<String>,
    seat_stroke_width: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HemicycleFile {
    rows: Option<usize>,
    base_seats: Option<usize>,
    seat_increment: Option<usize>,
    inner_radius: Option<f32>,
    radius_step: Option<f32>,
    seat_scale: Option<f32>,
    diameter: Option<f32>,
    title: Option<String>,
    show_total: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AffiliationFile {
    max_gap_seconds: Option<i64>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let parsed: ConfigFile = json5::from_str(contents)?;
    let mut config = Config::default();

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = %theme_name, "unknown theme, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.seat_stroke {
            config.theme.seat_stroke = v;
        }
        if let Some(v) = vars.seat_stroke_width {
            config.theme.seat_stroke_width = v;
        }
    }

    if let Some(hemicycle) = parsed.hemicycle {
        if let Some(v) = hemicycle.rows {
            config.layout.rows = v.max(1);
        }
        if let Some(v) = hemicycle.base_seats {
            config.layout.base_seats = v;
        }
        if let Some(v) = hemicycle.seat_increment {
            config.layout.seat_increment = v;
        }
        if let Some(v) = hemicycle.inner_radius {
            config.layout.inner_radius = v;
        }
        if let Some(v) = hemicycle.radius_step {
            config.layout.radius_step = v;
        }
        if let Some(v) = hemicycle.seat_scale {
            config.layout.seat_scale = v;
        }
        if let Some(v) = hemicycle.diameter {
            config.render.diameter = v.max(1.0);
        }
        if hemicycle.title.is_some() {
            config.render.title = hemicycle.title;
        }
        if let Some(v) = hemicycle.show_total {
            config.render.show_total = v;
        }
    }

    if let Some(affiliation) = parsed.affiliation {
        if let Some(v) = affiliation.max_gap_seconds {
            config.affiliation.max_gap_seconds = v;
        }
    }

    if let Some(color) = parsed.neutral_color.as_deref() {
        config.parties.set_fallback_color(color);
    }
    if let Some(overrides) = parsed.parties {
        config.parties.apply_overrides(&overrides);
    }

    Ok(config)
}
