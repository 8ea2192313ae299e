//! The 16-case marching-squares polygon table.
//!
//! Each configuration maps to one convex (or star-shaped from point 0)
//! polygon, listed clockwise. Diagonal cases 5 and 10 always resolve to a
//! single connected hexagon.

use crate::cell::CellPoint::{
    self, BottomLeft, BottomRight, CentreBottom, CentreLeft, CentreRight, CentreTop, TopLeft,
    TopRight,
};

/// Most points any case polygon has.
pub const MAX_POLYGON_POINTS: usize = 6;

/// Configuration of a fully solid cell.
pub const SOLID_CONFIGURATION: u8 = 15;

/// Case polygons indexed by configuration.
const CASES: [&[CellPoint]; 16] = [
    // 0: empty
    &[],
    &[CentreBottom, BottomLeft, CentreLeft],
    &[CentreRight, BottomRight, CentreBottom],
    &[CentreRight, BottomRight, BottomLeft, CentreLeft],
    &[CentreTop, TopRight, CentreRight],
    &[
        CentreTop,
        TopRight,
        CentreRight,
        CentreBottom,
        BottomLeft,
        CentreLeft,
    ],
    &[CentreTop, TopRight, BottomRight, CentreBottom],
    &[CentreTop, TopRight, BottomRight, BottomLeft, CentreLeft],
    &[TopLeft, CentreTop, CentreLeft],
    &[TopLeft, CentreTop, CentreBottom, BottomLeft],
    &[
        TopLeft,
        CentreTop,
        CentreRight,
        BottomRight,
        CentreBottom,
        CentreLeft,
    ],
    &[TopLeft, CentreTop, CentreRight, BottomRight, BottomLeft],
    &[TopLeft, TopRight, CentreRight, CentreLeft],
    &[TopLeft, TopRight, CentreRight, CentreBottom, BottomLeft],
    &[TopLeft, TopRight, BottomRight, CentreBottom, CentreLeft],
    // 15: solid
    &[TopLeft, TopRight, BottomRight, BottomLeft],
];

/// Returns the polygon for a configuration. Only the low 4 bits are used.
#[must_use]
pub const fn polygon(configuration: u8) -> &'static [CellPoint] {
    CASES[(configuration & 0x0F) as usize]
}

/// Whether a configuration produces a collision boundary.
///
/// Empty cells have nothing to collide with and solid cells are interior.
#[must_use]
pub const fn emits_boundary(configuration: u8) -> bool {
    let configuration = configuration & 0x0F;
    configuration != 0 && configuration != SOLID_CONFIGURATION
}

/// Fan triangulation of an `n`-point polygon from point 0.
pub fn fan_triangles(n: usize) -> impl Iterator<Item = [usize; 3]> {
    (1..n.saturating_sub(1)).map(|i| [0, i, i + 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    /// Unit-cell positions with y up.
    fn unit_position(point: CellPoint) -> Vec2 {
        match point {
            TopLeft => Vec2::new(0.0, 1.0),
            TopRight => Vec2::new(1.0, 1.0),
            BottomRight => Vec2::new(1.0, 0.0),
            BottomLeft => Vec2::new(0.0, 0.0),
            CentreTop => Vec2::new(0.5, 1.0),
            CentreRight => Vec2::new(1.0, 0.5),
            CentreBottom => Vec2::new(0.5, 0.0),
            CentreLeft => Vec2::new(0.0, 0.5),
        }
    }

    fn corner_bits(points: &[CellPoint]) -> u8 {
        points.iter().fold(0, |acc, p| {
            acc | match p {
                TopLeft => 8,
                TopRight => 4,
                BottomRight => 2,
                BottomLeft => 1,
                _ => 0,
            }
        })
    }

    #[test]
    fn test_polygon_sizes() {
        let sizes: Vec<_> = (0..16).map(|c| polygon(c).len()).collect();
        assert_eq!(
            sizes,
            vec![0, 3, 3, 4, 3, 6, 4, 5, 3, 4, 6, 5, 4, 5, 5, 4]
        );
    }

    #[test]
    fn test_polygon_corners_match_configuration() {
        for config in 0..16u8 {
            assert_eq!(corner_bits(polygon(config)), config, "case {config}");
        }
    }

    #[test]
    fn test_diagonal_cases_are_hexagons() {
        assert_eq!(
            polygon(10),
            &[TopLeft, CentreTop, CentreRight, BottomRight, CentreBottom, CentreLeft]
        );
        assert_eq!(
            polygon(5),
            &[CentreTop, TopRight, CentreRight, CentreBottom, BottomLeft, CentreLeft]
        );
    }

    #[test]
    fn test_boundary_emission() {
        assert!(!emits_boundary(0));
        assert!(!emits_boundary(15));
        for config in 1..15 {
            assert!(emits_boundary(config));
        }
    }

    #[test]
    fn test_fan_triangles() {
        let tris: Vec<_> = fan_triangles(6).collect();
        assert_eq!(tris, vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 5]]);
        assert_eq!(fan_triangles(3).count(), 1);
        assert_eq!(fan_triangles(0).count(), 0);
    }

    #[test]
    fn test_every_case_winds_clockwise() {
        for config in 1..16u8 {
            let points = polygon(config);
            for [a, b, c] in fan_triangles(points.len()) {
                let (pa, pb, pc) = (
                    unit_position(points[a]),
                    unit_position(points[b]),
                    unit_position(points[c]),
                );
                let area = (pb - pa).perp_dot(pc - pa);
                assert!(area < 0.0, "case {config} triangle {a},{b},{c} area {area}");
            }
        }
    }

    #[test]
    fn test_max_polygon_points() {
        let max = (0..16).map(|c| polygon(c).len()).max();
        assert_eq!(max, Some(MAX_POLYGON_POINTS));
    }
}
