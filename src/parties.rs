use std::collections::{BTreeMap, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ir::{INDEPENDENT_PARTY_ID, INDEPENDENT_PARTY_NAME};

pub const NEUTRAL_PARTY_COLOR: &str = "#9E9E9E";

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid color regex"));

static CHILEAN_PARTIES: Lazy<PartyTable> = Lazy::new(|| {
    use Alignment::*;
    let parties: [(&str, &str, &str, Alignment); 24] = [
        ("PC", "Partido Comunista", "#B71C1C", Left),
        ("PS", "Partido Socialista", "#E53935", Left),
        ("PPD", "Partido por la Democracia", "#FBC02D", Left),
        ("FA", "Frente Amplio", "#7B1FA2", Left),
        ("RD", "Revolución Democrática", "#6A1B9A", Left),
        ("CS", "Convergencia Social", "#8E24AA", Left),
        ("COM", "Comunes", "#AB47BC", Left),
        ("PH", "Partido Humanista", "#FF7043", Left),
        ("FRVS", "Federación Regionalista Verde Social", "#2E7D32", Left),
        ("PEV", "Partido Ecologista Verde", "#43A047", Left),
        ("PL", "Partido Liberal", "#FFB300", Left),
        ("PR", "Partido Radical", "#C62828", Center),
        ("DC", "Democracia Cristiana", "#1E88E5", Center),
        ("PDG", "Partido de la Gente", "#F57C00", Center),
        ("DEM", "Demócratas", "#0097A7", Center),
        ("AMAR", "Amarillos por Chile", "#FDD835", Center),
        (INDEPENDENT_PARTY_ID, INDEPENDENT_PARTY_NAME, NEUTRAL_PARTY_COLOR, Center),
        ("EVOP", "Evópoli", "#29B6F6", Right),
        ("RN", "Renovación Nacional", "#1565C0", Right),
        ("UDI", "Unión Demócrata Independiente", "#283593", Right),
        ("PREP", "Partido Republicano", "#0D47A1", Right),
        ("PNL", "Partido Nacional Libertario", "#212121", Right),
        ("PSC", "Partido Social Cristiano", "#5D4037", Right),
        ("PRI", "Partido Regionalista Independiente", "#4E342E", Right),
    ];
    let mut table = PartyTable::new(NEUTRAL_PARTY_COLOR);
    for (id, name, color, alignment) in parties {
        table.insert(id, PartyStyle::new(name, color, alignment));
    }
    table
});

/// Coarse political position, used only to order parties around the hemicycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStyle {
    pub name: String,
    pub color: String,
    pub alignment: Alignment,
}

impl PartyStyle {
    pub fn new(name: impl Into<String>, color: impl Into<String>, alignment: Alignment) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            alignment,
        }
    }
}

/// Partial entry as written in a config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyOverride {
    pub name: Option<String>,
    pub color: Option<String>,
    pub alignment: Option<Alignment>,
}

/// Party id → display name, color and alignment. Lookups never fail: unknown
/// ids are centered and painted with the fallback color.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyTable {
    entries: HashMap<String, PartyStyle>,
    fallback_color: String,
}

impl PartyTable {
    pub fn new(fallback_color: impl Into<String>) -> Self {
        Self {
            entries: HashMap::new(),
            fallback_color: fallback_color.into(),
        }
    }

    /// Parties seated in the Chilean Congress since the 2018 period.
    pub fn chilean() -> Self {
        CHILEAN_PARTIES.clone()
    }

    pub fn insert(&mut self, id: impl Into<String>, style: PartyStyle) {
        self.entries.insert(id.into(), style);
    }

    pub fn with_party(
        mut self,
        id: &str,
        name: &str,
        color: &str,
        alignment: Alignment,
    ) -> Self {
        self.insert(id, PartyStyle::new(name, color, alignment));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn fallback_color(&self) -> &str {
        &self.fallback_color
    }

    pub fn lookup(&self, id: &str) -> Option<&PartyStyle> {
        self.entries.get(id)
    }

    pub fn alignment_of(&self, id: &str) -> Alignment {
        self.lookup(id)
            .map(|style| style.alignment)
            .unwrap_or_default()
    }

    pub fn color_of(&self, id: &str) -> &str {
        self.lookup(id)
            .map(|style| style.color.as_str())
            .unwrap_or(self.fallback_color.as_str())
    }

    /// Table name first, then the name the feed carried, then the id itself.
    pub fn display_name_of(&self, id: &str, feed_name: Option<&str>) -> String {
        if let Some(style) = self.lookup(id) {
            return style.name.clone();
        }
        match feed_name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => id.to_string(),
        }
    }

    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, PartyOverride>) {
        for (id, patch) in overrides {
            let mut style = self.lookup(id).cloned().unwrap_or_else(|| {
                PartyStyle::new(id.clone(), self.fallback_color.clone(), Alignment::Center)
            });
            if let Some(name) = &patch.name {
                style.name = name.clone();
            }
            if let Some(color) = &patch.color {
                if is_valid_color(color) {
                    style.color = color.clone();
                } else {
                    tracing::warn!(party = %id, color = %color, "ignoring invalid party color");
                }
            }
            if let Some(alignment) = patch.alignment {
                style.alignment = alignment;
            }
            self.insert(id.clone(), style);
        }
    }

    pub fn set_fallback_color(&mut self, color: &str) {
        if is_valid_color(color) {
            self.fallback_color = color.to_string();
        } else {
            tracing::warn!(color = %color, "ignoring invalid fallback color");
        }
    }
}

impl Default for PartyTable {
    fn default() -> Self {
        Self::chilean()
    }
}

pub fn is_valid_color(color: &str) -> bool {
    HEX_COLOR.is_match(color)
}
