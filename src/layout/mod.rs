mod grouping;
mod rows;
pub(crate) mod text;
pub(crate) mod types;
pub use text::measure_label;
pub use types::*;
use grouping::*;
use rows::*;

use chrono::{Local, NaiveDateTime};

use crate::config::LayoutConfig;
use crate::ir::Legislator;
use crate::parties::PartyTable;

/// Turns a chamber's legislators into hemicycle seats colored by party.
///
/// The party table and ring geometry are injected so callers can lay out
/// synthetic party universes. The engine holds no per-call state.
#[derive(Debug, Clone, Default)]
pub struct SeatLayoutEngine {
    parties: PartyTable,
    config: LayoutConfig,
}

impl SeatLayoutEngine {
    pub fn new(parties: PartyTable, config: LayoutConfig) -> Self {
        Self { parties, config }
    }

    pub fn parties(&self) -> &PartyTable {
        &self.parties
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lays out the chamber as it stands right now.
    pub fn layout(&self, legislators: &[Legislator], diameter: f32) -> HemicycleLayout {
        self.layout_at(legislators, diameter, Local::now().naive_local())
    }

    /// Lays out the chamber with party membership resolved at `now`.
    pub fn layout_at(
        &self,
        legislators: &[Legislator],
        diameter: f32,
        now: NaiveDateTime,
    ) -> HemicycleLayout {
        let groups = group_by_party(legislators, &self.parties, now);
        let legend = order_parties(groups);
        let row_counts = allocate_rows(legislators.len(), &self.config);
        tracing::debug!(
            legislators = legislators.len(),
            parties = legend.len(),
            rows = ?row_counts,
            "hemicycle allocation"
        );

        let positions = seat_positions(&row_counts, diameter, &self.config);
        let seats = assign_seats(&positions, &legend);

        HemicycleLayout {
            diameter,
            seat_radius: (diameter / 2.0) * self.config.radius_step * self.config.seat_scale,
            seats,
            legend,
        }
    }
}

/// Hands out the left-to-right slots to each party in legend order.
fn assign_seats(positions: &[SeatPosition], legend: &[PartyGroup]) -> Vec<Seat> {
    legend
        .iter()
        .flat_map(|group| std::iter::repeat_n(group, group.seat_count))
        .zip(positions)
        .map(|(group, position)| Seat {
            x: position.x,
            y: position.y,
            color: group.color.clone(),
            party_id: group.party_id.clone(),
            row: position.row,
            angle: position.angle,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{OPEN_END, PartyMembershipInterval};
    use crate::parties::Alignment;
    use chrono::NaiveDate;
    use std::f32::consts::PI;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn since(year: i32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, 3, 11)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn member(id: usize, party: &str) -> Legislator {
        Legislator::new(id.to_string()).with_membership(PartyMembershipInterval::new(
            party,
            party,
            since(2022),
            OPEN_END,
        ))
    }

    fn chamber(parties: &[(&str, usize)]) -> Vec<Legislator> {
        let mut out = Vec::new();
        for (party, count) in parties {
            for _ in 0..*count {
                out.push(member(out.len(), party));
            }
        }
        out
    }

    fn synthetic_table() -> PartyTable {
        PartyTable::new("#999999")
            .with_party("PC", "Comunista", "#aa0000", Alignment::Left)
            .with_party("DC", "Democracia Cristiana", "#0000aa", Alignment::Center)
            .with_party("RN", "Renovación Nacional", "#00aaff", Alignment::Right)
    }

    #[test]
    fn alignment_orders_legend_and_blocks() {
        let engine = SeatLayoutEngine::new(synthetic_table(), LayoutConfig::default());
        let legislators = chamber(&[("RN", 5), ("DC", 3), ("PC", 10)]);
        let layout = engine.layout_at(&legislators, 400.0, now());

        let legend: Vec<&str> = layout.legend.iter().map(|g| g.party_id.as_str()).collect();
        assert_eq!(legend, vec!["PC", "DC", "RN"]);

        let seats: Vec<&str> = layout.seats.iter().map(|s| s.party_id.as_str()).collect();
        let mut expected = vec!["PC"; 10];
        expected.extend(vec!["DC"; 3]);
        expected.extend(vec!["RN"; 5]);
        assert_eq!(seats, expected);
        assert!(layout.seats.windows(2).all(|w| w[0].angle >= w[1].angle));
        assert_eq!(layout.seats[0].color, "#aa0000");
    }

    #[test]
    fn pooled_rows_keep_party_blocks_contiguous() {
        let table = synthetic_table().with_party("UDI", "UDI", "#0000ff", Alignment::Right);
        let engine = SeatLayoutEngine::new(table, LayoutConfig::default());
        let legislators = chamber(&[("RN", 40), ("PC", 30), ("UDI", 35), ("DC", 50)]);
        let layout = engine.layout_at(&legislators, 600.0, now());
        assert_eq!(layout.seats.len(), 155);

        let rows: std::collections::HashSet<usize> = layout.seats.iter().map(|s| s.row).collect();
        assert_eq!(rows.len(), 5);
        assert!(layout.seats.windows(2).all(|w| w[0].angle >= w[1].angle));

        let legend: Vec<&str> = layout.legend.iter().map(|g| g.party_id.as_str()).collect();
        assert_eq!(legend, vec!["PC", "DC", "UDI", "RN"]);
        let mut runs: Vec<&str> = layout.seats.iter().map(|s| s.party_id.as_str()).collect();
        runs.dedup();
        assert_eq!(runs, legend);
        for group in &layout.legend {
            let taken = layout.seats.iter().filter(|s| s.party_id == group.party_id).count();
            assert_eq!(taken, group.seat_count);
        }
    }

    #[test]
    fn seat_count_is_exact() {
        let engine = SeatLayoutEngine::default();
        for size in [0usize, 1, 7, 50, 129, 155, 180, 250] {
            let legislators = chamber(&[("PS", size / 2), ("UDI", size - size / 2)]);
            let layout = engine.layout_at(&legislators, 600.0, now());
            assert_eq!(layout.seats.len(), size, "size {size}");
            let legend_total: usize = layout.legend.iter().map(|g| g.seat_count).sum();
            assert_eq!(legend_total, size, "size {size}");
        }
    }

    #[test]
    fn empty_chamber_is_empty() {
        let layout = SeatLayoutEngine::default().layout_at(&[], 600.0, now());
        assert!(layout.seats.is_empty());
        assert!(layout.legend.is_empty());
    }

    #[test]
    fn single_seat_row_sits_at_midpoint() {
        // 129 = 20 + 28 + 36 + 44 + 1
        let engine = SeatLayoutEngine::default();
        let legislators = chamber(&[("PS", 129)]);
        let diameter = 500.0;
        let layout = engine.layout_at(&legislators, diameter, now());
        let outer: Vec<&Seat> = layout.seats.iter().filter(|s| s.row == 4).collect();
        assert_eq!(outer.len(), 1);
        let seat = outer[0];
        assert_eq!(seat.angle, PI / 2.0);
        let radius = (diameter / 2.0) * (0.5 + 4.0 * 0.12);
        assert!((seat.x - diameter / 2.0).abs() < 1e-3);
        assert!((seat.y - (diameter / 2.0 - radius)).abs() < 1e-3);
    }

    #[test]
    fn layout_is_idempotent() {
        let engine = SeatLayoutEngine::default();
        let legislators = chamber(&[("PS", 12), ("RN", 20), ("DC", 4), ("PC", 9)]);
        let first = engine.layout_at(&legislators, 600.0, now());
        let second = engine.layout_at(&legislators, 600.0, now());
        assert_eq!(first, second);
    }

    #[test]
    fn lapsed_membership_counts_as_independent() {
        let engine = SeatLayoutEngine::default();
        let lapsed = Legislator::new("9").with_membership(PartyMembershipInterval::new(
            "PPD",
            "PPD",
            since(2014),
            since(2018),
        ));
        let layout = engine.layout_at(&[lapsed, Legislator::new("10")], 600.0, now());
        assert_eq!(layout.legend.len(), 1);
        assert_eq!(layout.legend[0].party_id, "IND");
        assert_eq!(layout.legend[0].seat_count, 2);
        assert_eq!(layout.legend[0].alignment, Alignment::Center);
    }

    #[test]
    fn unknown_party_gets_fallback_color_and_center() {
        let engine = SeatLayoutEngine::new(synthetic_table(), LayoutConfig::default());
        let legislators = chamber(&[("RN", 2), ("XYZ", 1), ("PC", 1)]);
        let layout = engine.layout_at(&legislators, 300.0, now());
        let unknown = layout.legend.iter().find(|g| g.party_id == "XYZ").unwrap();
        assert_eq!(unknown.color, "#999999");
        assert_eq!(unknown.alignment, Alignment::Center);
        assert_eq!(unknown.display_name, "XYZ");
        let legend: Vec<&str> = layout.legend.iter().map(|g| g.party_id.as_str()).collect();
        assert_eq!(legend, vec!["PC", "XYZ", "RN"]);
    }

    #[test]
    fn diameter_scales_positions() {
        let engine = SeatLayoutEngine::default();
        let legislators = chamber(&[("PS", 30)]);
        let small = engine.layout_at(&legislators, 100.0, now());
        let large = engine.layout_at(&legislators, 200.0, now());
        for (a, b) in small.seats.iter().zip(&large.seats) {
            assert!((a.x * 2.0 - b.x).abs() < 1e-2);
            assert!((a.y * 2.0 - b.y).abs() < 1e-2);
        }
        assert!((small.seat_radius * 2.0 - large.seat_radius).abs() < 1e-4);
    }
}
