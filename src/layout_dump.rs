use crate::affiliation::MergedAffiliation;
use crate::ir::Legislator;
use crate::layout::HemicycleLayout;
use crate::parties::Alignment;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub diameter: f32,
    pub seat_radius: f32,
    pub total_seats: usize,
    pub seats: Vec<SeatDump>,
    pub legend: Vec<LegendDump>,
}

#[derive(Debug, Serialize)]
pub struct SeatDump {
    pub x: f32,
    pub y: f32,
    pub row: usize,
    pub angle_deg: f32,
    pub party: String,
    pub color: String,
}

#[derive(Debug, Serialize)]
pub struct LegendDump {
    pub party: String,
    pub name: String,
    pub color: String,
    pub alignment: Alignment,
    pub seats: usize,
}

impl LayoutDump {
    pub fn from_layout(layout: &HemicycleLayout) -> Self {
        let seats = layout
            .seats
            .iter()
            .map(|seat| SeatDump {
                x: seat.x,
                y: seat.y,
                row: seat.row,
                angle_deg: seat.angle.to_degrees(),
                party: seat.party_id.clone(),
                color: seat.color.clone(),
            })
            .collect();

        let legend = layout
            .legend
            .iter()
            .map(|group| LegendDump {
                party: group.party_id.clone(),
                name: group.display_name.clone(),
                color: group.color.clone(),
                alignment: group.alignment,
                seats: group.seat_count,
            })
            .collect();

        Self {
            diameter: layout.diameter,
            seat_radius: layout.seat_radius,
            total_seats: layout.total_seats(),
            seats,
            legend,
        }
    }
}

/// One legislator's consolidated party history.
#[derive(Debug, Serialize)]
pub struct HistoryDump<'a> {
    pub id: &'a str,
    pub name: String,
    pub affiliations: &'a [MergedAffiliation],
    pub returning_parties: Vec<String>,
}

impl<'a> HistoryDump<'a> {
    pub fn new(
        legislator: &'a Legislator,
        affiliations: &'a [MergedAffiliation],
        returning_parties: Vec<String>,
    ) -> Self {
        Self {
            id: &legislator.id,
            name: legislator.full_name(),
            affiliations,
            returning_parties,
        }
    }
}

/// Pretty JSON to `output`, or stdout when `None`.
pub fn write_json<T: Serialize + ?Sized>(value: &T, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            serde_json::to_writer_pretty(&mut lock, value)?;
            lock.write_all(b"\n")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PartyGroup, Seat};
    use std::f32::consts::PI;

    #[test]
    fn dump_mirrors_layout() {
        let layout = HemicycleLayout {
            diameter: 100.0,
            seat_radius: 2.4,
            seats: vec![Seat {
                x: 25.0,
                y: 50.0,
                color: "#ff0000".to_string(),
                party_id: "PS".to_string(),
                row: 0,
                angle: PI,
            }],
            legend: vec![PartyGroup {
                party_id: "PS".to_string(),
                display_name: "Partido Socialista".to_string(),
                color: "#ff0000".to_string(),
                alignment: Alignment::Left,
                seat_count: 1,
            }],
        };
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.total_seats, 1);
        assert!((dump.seats[0].angle_deg - 180.0).abs() < 1e-3);
        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["legend"][0]["alignment"], "left");
        assert_eq!(json["seats"][0]["party"], "PS");
    }
}
