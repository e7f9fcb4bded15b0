pub mod affiliation;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod parties;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;

pub use affiliation::{MergedAffiliation, consolidate, consolidate_with_gap};
pub use config::{Config, LayoutConfig, RenderConfig};
pub use ir::{Legislator, PartyMembershipInterval};
pub use layout::{HemicycleLayout, PartyGroup, Seat, SeatLayoutEngine};
pub use parser::{FeedError, parse_feed};
pub use parties::{Alignment, PartyTable};
pub use render::render_svg;
pub use theme::Theme;

use chrono::NaiveDateTime;

/// Everything needed to go from a feed document to an SVG in one call.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub parties: PartyTable,
    /// Reference instant for current memberships; `None` means now.
    pub as_of: Option<NaiveDateTime>,
}

impl RenderOptions {
    pub fn light() -> Self {
        Self::default()
    }

    pub fn dark() -> Self {
        Self {
            theme: Theme::dark(),
            ..Self::default()
        }
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            theme: config.theme,
            layout: config.layout,
            render: config.render,
            parties: config.parties,
            as_of: None,
        }
    }

    pub fn with_diameter(mut self, diameter: f32) -> Self {
        self.render.diameter = diameter.max(1.0);
        self
    }

    pub fn compute(&self, legislators: &[Legislator]) -> HemicycleLayout {
        let engine = SeatLayoutEngine::new(self.parties.clone(), self.layout.clone());
        match self.as_of {
            Some(at) => engine.layout_at(legislators, self.render.diameter, at),
            None => engine.layout(legislators, self.render.diameter),
        }
    }
}

pub fn render_with_options(feed: &str, options: RenderOptions) -> anyhow::Result<String> {
    let legislators = parse_feed(feed)?;
    let layout = options.compute(&legislators);
    Ok(render_svg(&layout, &options.theme, &options.render))
}
