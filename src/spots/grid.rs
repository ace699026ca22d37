use crate::models::Coordinate;

/// Square grid of candidate cells around `center`.
///
/// Offsets run from `-radius_steps` to `+radius_steps` steps inclusive on
/// both axes, so a radius of 5 yields 11 x 11 cells. Cells are ordered with
/// latitude in the outer loop and longitude in the inner loop.
///
/// Near a pole or the antimeridian, cells that fall off the valid coordinate
/// range are left out, so the grid can hold fewer cells.
#[must_use]
pub fn build_grid(center: Coordinate, radius_steps: u32, step_deg: f64) -> Vec<Coordinate> {
    let radius = i64::from(radius_steps);
    let side = (2 * radius + 1) as usize;
    let mut cells = Vec::with_capacity(side * side);

    for i in -radius..=radius {
        for j in -radius..=radius {
            if let Ok(cell) = center.offset(i as f64 * step_deg, j as f64 * step_deg) {
                cells.push(cell);
            }
        }
    }

    cells
}
