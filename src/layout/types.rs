use serde::Serialize;

use crate::parties::Alignment;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub text: String,
    pub width: f32,
    pub height: f32,
}

/// One party's share of the chamber, in the order its block is drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyGroup {
    pub party_id: String,
    pub display_name: String,
    pub color: String,
    pub alignment: Alignment,
    pub seat_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Seat {
    pub x: f32,
    pub y: f32,
    pub color: String,
    pub party_id: String,
    pub row: usize,
    pub angle: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HemicycleLayout {
    pub diameter: f32,
    pub seat_radius: f32,
    /// Sorted left to right (descending angle).
    pub seats: Vec<Seat>,
    pub legend: Vec<PartyGroup>,
}

impl HemicycleLayout {
    pub fn total_seats(&self) -> usize {
        self.seats.len()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.diameter / 2.0, self.diameter / 2.0)
    }
}

/// A seat slot before a party is assigned to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SeatPosition {
    pub x: f32,
    pub y: f32,
    pub row: usize,
    pub angle: f32,
}
