use crate::config::RenderConfig;
use crate::layout::{HemicycleLayout, measure_label};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

const TITLE_GAP: f32 = 10.0;

/// Canvas geometry shared by the SVG writer and the PNG rasterizer.
#[derive(Debug, Clone, Copy)]
struct Frame {
    offset_x: f32,
    offset_y: f32,
    legend_x: f32,
    legend_y: f32,
    width: f32,
    height: f32,
}

fn frame(layout: &HemicycleLayout, theme: &Theme, config: &RenderConfig) -> Frame {
    let pad = config.padding;
    let title_height = match &config.title {
        Some(_) => theme.font_size * 1.5 + TITLE_GAP,
        None => 0.0,
    };
    let legend_row = theme.legend_marker_size + theme.legend_spacing;
    let legend_width = layout
        .legend
        .iter()
        .map(|group| {
            measure_label(&legend_text(&group.display_name, group.seat_count), theme).width
        })
        .fold(0.0, f32::max);
    let legend_height = legend_row * layout.legend.len() as f32;

    // Seat circles overhang the ring radius by one seat radius on every side.
    let chart_width = layout.diameter + layout.seat_radius * 2.0;
    let chart_height = layout.diameter / 2.0 + layout.seat_radius * 2.0;
    let legend_x = pad + chart_width + pad * 2.0;
    let width = if layout.legend.is_empty() {
        chart_width + pad * 2.0
    } else {
        legend_x + theme.legend_marker_size + theme.legend_spacing + legend_width + pad
    };
    let height = pad * 2.0 + title_height + chart_height.max(legend_height);

    Frame {
        offset_x: pad + layout.seat_radius,
        offset_y: pad + title_height + layout.seat_radius,
        legend_x,
        legend_y: pad + title_height,
        width: width.max(1.0),
        height: height.max(1.0),
    }
}

fn legend_text(name: &str, seats: usize) -> String {
    format!("{name} ({seats})")
}

pub fn render_svg(layout: &HemicycleLayout, theme: &Theme, config: &RenderConfig) -> String {
    let frame = frame(layout, theme, config);
    let width = frame.width;
    let height = frame.height;
    let mut svg = String::new();

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    ));

    if let Some(title) = &config.title {
        svg.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.1}\" font-weight=\"600\" fill=\"{}\">{}</text>",
            config.padding,
            config.padding + theme.font_size * 1.2,
            escape_xml(&theme.font_family),
            theme.font_size * 1.3,
            theme.text_color,
            escape_xml(title)
        ));
    }

    svg.push_str(&format!(
        "<g class=\"seats\" transform=\"translate({:.2} {:.2})\">",
        frame.offset_x, frame.offset_y
    ));
    for seat in &layout.seats {
        svg.push_str(&format!(
            "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\" data-party=\"{}\"/>",
            seat.x,
            seat.y,
            layout.seat_radius,
            seat.color,
            theme.seat_stroke,
            theme.seat_stroke_width,
            escape_xml(&seat.party_id)
        ));
    }
    if config.show_total && !layout.seats.is_empty() {
        let (cx, cy) = layout.center();
        svg.push_str(&format!(
            "<text x=\"{cx:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.1}\" font-weight=\"700\" fill=\"{}\">{}</text>",
            cy - theme.font_size * 0.3,
            escape_xml(&theme.font_family),
            theme.font_size * 2.0,
            theme.text_color,
            layout.total_seats()
        ));
    }
    svg.push_str("</g>");

    if !layout.legend.is_empty() {
        svg.push_str("<g class=\"legend\">");
        let marker = theme.legend_marker_size;
        let row_height = marker + theme.legend_spacing;
        for (idx, group) in layout.legend.iter().enumerate() {
            let y = frame.legend_y + idx as f32 * row_height;
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{y:.2}\" width=\"{marker:.2}\" height=\"{marker:.2}\" rx=\"3\" ry=\"3\" fill=\"{}\"/>",
                frame.legend_x, group.color
            ));
            svg.push_str(&format!(
                "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
                frame.legend_x + marker + theme.legend_spacing,
                y + marker * 0.85,
                escape_xml(&theme.font_family),
                theme.font_size,
                theme.muted_text_color,
                escape_xml(&legend_text(&group.display_name, group.seat_count))
            ));
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    render_cfg: &RenderConfig,
    theme: &Theme,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = theme
        .font_family
        .split(',')
        .next()
        .map(|family| family.trim().trim_matches('"').to_string())
        .unwrap_or_else(|| "Inter".to_string());
    opt.fontdb_mut().load_system_fonts();
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(
    _svg: &str,
    _output: &Path,
    _render_cfg: &RenderConfig,
    _theme: &Theme,
) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{Legislator, OPEN_END, PartyMembershipInterval};
    use crate::layout::SeatLayoutEngine;
    use crate::parties::{Alignment, PartyTable};
    use chrono::NaiveDate;

    fn sample_layout() -> HemicycleLayout {
        let start = NaiveDate::from_ymd_opt(2022, 3, 11)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let legislators: Vec<Legislator> = (0..6)
            .map(|i| {
                let party = if i < 4 { "A&B" } else { "C" };
                Legislator::new(i.to_string())
                    .with_membership(PartyMembershipInterval::new(party, party, start, OPEN_END))
            })
            .collect();
        let table = PartyTable::new("#999999")
            .with_party("A&B", "Alianza <A&B>", "#ff0000", Alignment::Left)
            .with_party("C", "Centro", "#00ff00", Alignment::Center);
        SeatLayoutEngine::new(table, LayoutConfig::default()).layout_at(
            &legislators,
            300.0,
            start,
        )
    }

    #[test]
    fn render_svg_basic() {
        let layout = sample_layout();
        let svg = render_svg(&layout, &Theme::light(), &RenderConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 6);
        assert!(svg.contains("Alianza &lt;A&amp;B&gt; (4)"));
        assert!(svg.contains("Centro (2)"));
        assert!(svg.contains("data-party=\"A&amp;B\""));
    }

    #[test]
    fn title_and_total_are_optional() {
        let layout = sample_layout();
        let config = RenderConfig {
            title: Some("Cámara".to_string()),
            show_total: false,
            ..RenderConfig::default()
        };
        let svg = render_svg(&layout, &Theme::dark(), &config);
        assert!(svg.contains(">Cámara</text>"));
        assert!(!svg.contains("font-weight=\"700\""));
    }

    #[test]
    fn seats_stay_inside_canvas() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 11)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let legislators: Vec<Legislator> = (0..155)
            .map(|i| {
                let party = if i % 3 == 0 { "PS" } else { "RN" };
                Legislator::new(i.to_string())
                    .with_membership(PartyMembershipInterval::new(party, party, start, OPEN_END))
            })
            .collect();
        let theme = Theme::light();
        let config = RenderConfig {
            title: Some("Cámara".to_string()),
            ..RenderConfig::default()
        };
        for diameter in [300.0, 600.0, 1000.0, 1400.0, 3000.0] {
            let layout = SeatLayoutEngine::default().layout_at(&legislators, diameter, start);
            let frame = frame(&layout, &theme, &config);
            let r = layout.seat_radius;
            for seat in &layout.seats {
                let x = frame.offset_x + seat.x;
                let y = frame.offset_y + seat.y;
                assert!(x - r >= 0.0, "d={diameter} left edge {}", x - r);
                assert!(y - r >= 0.0, "d={diameter} top edge {}", y - r);
                assert!(x + r <= frame.legend_x, "d={diameter} overlaps legend");
                assert!(x + r <= frame.width, "d={diameter} right edge {}", x + r);
                assert!(y + r <= frame.height, "d={diameter} bottom edge {}", y + r);
            }
            let svg = render_svg(&layout, &theme, &config);
            assert!(svg.contains(&format!("height=\"{:.2}\"", frame.height)));
        }
    }

    #[test]
    fn empty_layout_still_renders() {
        let layout = SeatLayoutEngine::default().layout(&[], 300.0);
        let svg = render_svg(&layout, &Theme::light(), &RenderConfig::default());
        assert!(svg.contains("<svg"));
        assert!(!svg.contains("<circle"));
        assert!(!svg.contains("class=\"legend\""));
    }
}
