use std::cmp::Ordering;
use std::f32::consts::PI;

use crate::config::LayoutConfig;

use super::SeatPosition;

/// Seats per row, innermost first. Rows follow the nominal
/// `base + row * increment` formula and the outermost row absorbs the
/// difference to `total`. A deficit larger than the outer row keeps eating
/// inwards, so the rows always sum to `total`.
pub(super) fn allocate_rows(total: usize, config: &LayoutConfig) -> Vec<usize> {
    let rows = config.rows.max(1);
    let mut counts: Vec<i64> = (0..rows)
        .map(|row| (config.base_seats + row * config.seat_increment) as i64)
        .collect();
    let nominal: i64 = counts.iter().sum();
    let adjustment = total as i64 - nominal;
    if let Some(outer) = counts.last_mut() {
        *outer += adjustment;
    }

    let mut deficit = 0i64;
    for count in counts.iter_mut().rev() {
        *count -= deficit;
        deficit = (-*count).max(0);
        *count = (*count).max(0);
    }

    counts.into_iter().map(|count| count as usize).collect()
}

pub(super) fn row_radius(row: usize, diameter: f32, config: &LayoutConfig) -> f32 {
    (diameter / 2.0) * (config.inner_radius + row as f32 * config.radius_step)
}

/// Angle of seat `index` among `count` seats, from π (left) down to 0 (right).
pub(super) fn seat_angle(index: usize, count: usize) -> f32 {
    if count <= 1 {
        return PI / 2.0;
    }
    PI * (1.0 - index as f32 / (count - 1) as f32)
}

/// Every slot of every row, sorted by descending angle. Rows interleave; equal
/// angles keep the inner row first.
pub(super) fn seat_positions(
    row_counts: &[usize],
    diameter: f32,
    config: &LayoutConfig,
) -> Vec<SeatPosition> {
    let center = diameter / 2.0;
    let mut positions = Vec::with_capacity(row_counts.iter().sum());
    for (row, &count) in row_counts.iter().enumerate() {
        let radius = row_radius(row, diameter, config);
        for index in 0..count {
            let angle = seat_angle(index, count);
            positions.push(SeatPosition {
                x: center + radius * angle.cos(),
                y: center - radius * angle.sin(),
                row,
                angle,
            });
        }
    }
    positions.sort_by(|a, b| b.angle.partial_cmp(&a.angle).unwrap_or(Ordering::Equal));
    positions
}
