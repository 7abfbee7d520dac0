//! Geodesic area computation
//!
//! Areas are computed on a sphere by decomposing the ring into geographic
//! quadrilaterals against the pole (the line-integral form of spherical
//! excess). This is accurate at parcel scale and deliberately uses a fixed
//! mean Earth radius so results stay reproducible.

use std::f64::consts::PI;

use crate::ring::Ring;

/// Mean Earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Square meters per hectare
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

fn radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Area of a closed ring in square meters
///
/// Rings with fewer than three points have no area. The result is the
/// absolute value of the signed area, so winding order does not matter.
pub fn ring_area(ring: &Ring) -> f64 {
    if !ring.is_complete() {
        return 0.0;
    }

    let mut sum = 0.0;
    for (a, b) in ring.edges() {
        let lat1 = radians(a.lat);
        let lat2 = radians(b.lat);
        let delta_lon = radians(b.lon - a.lon);
        sum += delta_lon * (2.0 + lat1.sin() + lat2.sin());
    }

    let area = (sum * EARTH_RADIUS_M * EARTH_RADIUS_M / 2.0).abs();
    if area.is_finite() { area } else { 0.0 }
}

/// Net area of an outer ring minus its holes, in hectares
///
/// Never negative: holes larger than the outer ring floor the result at 0.
pub fn net_area<'a, I>(outer: &Ring, holes: I) -> f64
where
    I: IntoIterator<Item = &'a Ring>,
{
    let holes_area: f64 = holes.into_iter().map(ring_area).sum();
    let net = (ring_area(outer) - holes_area).max(0.0);
    if net.is_finite() {
        net / SQUARE_METERS_PER_HECTARE
    } else {
        0.0
    }
}

/// Round an area in hectares to two decimal places
pub fn round_hectares(hectares: f64) -> f64 {
    (hectares * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use approx::assert_relative_eq;

    fn ring(coords: &[[f64; 2]]) -> Ring {
        Ring::from_points(coords.iter().copied().map(Point::from).collect())
    }

    fn square() -> Ring {
        ring(&[[0.0, 0.0], [0.01, 0.0], [0.01, 0.01], [0.0, 0.01]])
    }

    fn inner_square() -> Ring {
        ring(&[
            [0.0025, 0.0025],
            [0.0075, 0.0025],
            [0.0075, 0.0075],
            [0.0025, 0.0075],
        ])
    }

    #[test]
    fn test_incomplete_rings_have_no_area() {
        assert_eq!(ring_area(&Ring::new()), 0.0);
        assert_eq!(ring_area(&ring(&[[10.0, 10.0]])), 0.0);
        assert_eq!(ring_area(&ring(&[[10.0, 10.0], [11.0, 12.0]])), 0.0);
    }

    #[test]
    fn test_square_area_pinned() {
        // Reference: sum over edges of dlon * (2 + sin lat1 + sin lat2), times R^2 / 2
        let coords = [[0.0, 0.0], [0.01, 0.0], [0.01, 0.01], [0.0, 0.01]];
        let mut expected = 0.0_f64;
        for i in 0..coords.len() {
            let j = (i + 1) % coords.len();
            let lat1 = coords[i][1] * PI / 180.0;
            let lat2 = coords[j][1] * PI / 180.0;
            let delta_lon = (coords[j][0] - coords[i][0]) * PI / 180.0;
            expected += delta_lon * (2.0 + lat1.sin() + lat2.sin());
        }
        let expected = (expected * 6_371_000.0 * 6_371_000.0 / 2.0).abs();

        let area = ring_area(&square());
        assert_eq!(area.to_bits(), expected.to_bits());
        assert_relative_eq!(area, 1_236_431.164_872_512_2, max_relative = 1e-12);
    }

    #[test]
    fn test_winding_order_does_not_matter() {
        let mut reversed = square().into_points();
        reversed.reverse();
        assert_eq!(ring_area(&square()), ring_area(&Ring::from_points(reversed)));
    }

    #[test]
    fn test_net_area_in_hectares() {
        let area = net_area(&square(), []);
        assert_relative_eq!(area, 123.643_116_487_251_22, max_relative = 1e-12);
        assert_eq!(round_hectares(area), 123.64);
    }

    #[test]
    fn test_net_area_subtracts_holes() {
        let holes = [inner_square()];
        let area = net_area(&square(), &holes);
        let expected = (ring_area(&square()) - ring_area(&inner_square())) / 10_000.0;
        assert_relative_eq!(area, expected);
        assert_eq!(round_hectares(area), 92.73);
    }

    #[test]
    fn test_net_area_never_negative() {
        let holes = [square(), square()];
        assert_eq!(net_area(&inner_square(), &holes), 0.0);
        assert_eq!(net_area(&Ring::new(), &holes), 0.0);
    }

    #[test]
    fn test_degenerate_input_is_total() {
        let nan = ring(&[[f64::NAN, 0.0], [1.0, 0.0], [1.0, 1.0]]);
        assert_eq!(ring_area(&nan), 0.0);
        assert_eq!(net_area(&square(), [&nan]), net_area(&square(), []));

        let collinear = ring(&[[0.0, 0.0], [1.0, 1.0], [2.0, 2.0]]);
        assert!(ring_area(&collinear) >= 0.0);
    }

    #[test]
    fn test_round_hectares() {
        assert_eq!(round_hectares(0.0), 0.0);
        assert_eq!(round_hectares(1.234), 1.23);
        assert_eq!(round_hectares(1.235_1), 1.24);
        assert_eq!(round_hectares(10.0), 10.0);
    }
}
