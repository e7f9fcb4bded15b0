use hemiciclo::affiliation::returning_parties;
use hemiciclo::layout_dump::HistoryDump;
use hemiciclo::parser::parse_feed_date;
use hemiciclo::{RenderOptions, consolidate, parse_feed, render_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HemicycleRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    diameter: Option<f32>,
    title: Option<String>,
    as_of: Option<String>,
}

fn build_render_options(options: HemicycleRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = if options.theme.as_deref() == Some("dark") {
        RenderOptions::dark()
    } else {
        RenderOptions::light()
    };

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(diameter) = options.diameter {
        render_options = render_options.with_diameter(diameter);
    }
    render_options.render.title = options.title;
    if let Some(as_of) = options.as_of.as_deref() {
        let parsed = parse_feed_date(as_of).ok_or_else(|| format!("invalid asOf date: {as_of}"))?;
        render_options.as_of = Some(parsed);
    }

    Ok(render_options)
}

fn history_json(feed: &str, legislator_id: &str) -> Result<String, String> {
    let legislators = parse_feed(feed).map_err(|error| error.to_string())?;
    let legislator = legislators
        .iter()
        .find(|legislator| legislator.id == legislator_id)
        .ok_or_else(|| format!("no legislator with id {legislator_id}"))?;
    let merged = consolidate(&legislator.memberships);
    let dump = HistoryDump::new(legislator, &merged, returning_parties(&merged));
    serde_json::to_string(&dump).map_err(|error| error.to_string())
}

#[wasm_bindgen]
pub fn render_hemicycle_svg(feed: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = if let Some(raw_options) = options_json {
        serde_json::from_str::<HemicycleRenderOptions>(&raw_options)
            .map_err(|error| JsValue::from_str(&error.to_string()))?
    } else {
        HemicycleRenderOptions::default()
    };

    let render_options = build_render_options(options).map_err(|error| JsValue::from_str(&error))?;
    render_with_options(feed, render_options).map_err(|error| JsValue::from_str(&error.to_string()))
}

#[wasm_bindgen]
pub fn consolidate_history(feed: &str, legislator_id: &str) -> Result<String, JsValue> {
    history_json(feed, legislator_id).map_err(|error| JsValue::from_str(&error))
}
