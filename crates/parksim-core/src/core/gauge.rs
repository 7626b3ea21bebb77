//! Fixed-width text gauge for a distance.

/// Number of cells between the delimiters.
pub const BAR_CELLS: usize = 40;

/// Distance that fills the whole bar.
pub const FULL_SCALE_CM: f64 = 200.0;

const FILL: char = '#';
const BLANK: char = ' ';

/// Returns how many of the [`BAR_CELLS`] cells are filled for a distance.
///
/// Distances above [`FULL_SCALE_CM`] are capped. There is no lower clamp on
/// the distance itself; a negative distance yields an empty bar because the
/// cell count saturates at zero.
pub fn filled_cells(distance_cm: f64) -> usize {
    let capped = distance_cm.min(FULL_SCALE_CM);
    let filled = (capped / FULL_SCALE_CM) * BAR_CELLS as f64;
    // `as` truncates toward zero and saturates negatives and NaN to 0.
    (filled as usize).min(BAR_CELLS)
}

/// Renders `[####      ]` with [`BAR_CELLS`] cells.
pub fn render_bar(distance_cm: f64) -> String {
    let filled = filled_cells(distance_cm);
    let mut bar = String::with_capacity(BAR_CELLS + 2);
    bar.push('[');
    bar.extend(std::iter::repeat_n(FILL, filled));
    bar.extend(std::iter::repeat_n(BLANK, BAR_CELLS - filled));
    bar.push(']');
    bar
}
