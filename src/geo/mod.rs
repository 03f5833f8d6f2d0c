//! Offline US-state resolution.
//!
//! Two lookups, tried in order: a point-in-polygon test against simplified
//! state outlines, then a Maidenhead `grid4 → state` table for spots whose
//! coordinates are missing or fall outside every outline (the outlines are
//! coarse, so coastal and border spots sometimes miss). Non-US spots
//! resolve to `None`.

mod grids;
mod states;

pub use grids::state_for_grid;

/// Resolves a state from coordinates via the outline table.
pub fn state_for_coords(lat: f64, lon: f64) -> Option<&'static str> {
    if !lat.is_finite() || !lon.is_finite() || (lat == 0.0 && lon == 0.0) {
        return None;
    }
    states::STATE_OUTLINES
        .iter()
        .find(|(_, outline)| point_in_polygon(lon, lat, outline))
        .map(|(state, _)| *state)
}

/// Coordinate lookup with grid fallback, the resolution order the
/// normalizer uses.
pub fn resolve_state(lat: f64, lon: f64, grid: &str) -> Option<&'static str> {
    state_for_coords(lat, lon).or_else(|| state_for_grid(grid))
}

/// Ray-casting containment test. `outline` is a closed polygon given as
/// `(lon, lat)` vertices; the closing edge back to the first vertex is
/// implicit.
fn point_in_polygon(x: f64, y: f64, outline: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let n = outline.len();
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = outline[i];
        let (xj, yj) = outline[j];
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_in_polygon_square() {
        let square = [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)];
        assert!(point_in_polygon(1.0, 1.0, &square));
        assert!(!point_in_polygon(3.0, 1.0, &square));
        assert!(!point_in_polygon(-1.0, -1.0, &square));
    }

    #[test]
    fn test_state_for_coords_interior_points() {
        assert_eq!(state_for_coords(42.4, -71.8), Some("MA"));
        assert_eq!(state_for_coords(40.9, -77.8), Some("PA"));
        assert_eq!(state_for_coords(39.0, -105.5), Some("CO"));
        assert_eq!(state_for_coords(31.5, -99.0), Some("TX"));
    }

    #[test]
    fn test_state_for_coords_outside_us() {
        // Mid-Atlantic ocean
        assert_eq!(state_for_coords(40.0, -50.0), None);
        // London
        assert_eq!(state_for_coords(51.5, -0.1), None);
    }

    #[test]
    fn test_state_for_coords_rejects_degenerate_input() {
        assert_eq!(state_for_coords(f64::NAN, -71.8), None);
        assert_eq!(state_for_coords(0.0, 0.0), None);
    }

    #[test]
    fn test_resolve_state_falls_back_to_grid() {
        // Coordinates miss every outline; the grid still identifies MA.
        assert_eq!(resolve_state(0.0, 0.0, "FN42"), Some("MA"));
        // Both miss.
        assert_eq!(resolve_state(0.0, 0.0, "JO01"), None);
    }

    #[test]
    fn test_resolve_state_prefers_coordinates() {
        // Coordinates say PA even though the grid claims MA.
        assert_eq!(resolve_state(40.9, -77.8, "FN42"), Some("PA"));
    }
}
