//! Stiffness of a single two-node axial bar in global coordinates.
//!
//! A bar only carries force along its own axis, so with direction cosines
//! `c` and `s` its stiffness is the outer product `(E*A/L) * u * u^T` where
//! `u = [-c, -s, c, s]`. See
//! <https://en.wikipedia.org/wiki/Direct_stiffness_method#Example>.

use nalgebra::{Matrix2, Matrix4, Vector4};

use crate::errors::BarPropertyError;
use crate::geometry::Point;

/// Stack the two end points of a bar as rows of a 2×2 coordinate matrix.
#[must_use]
pub fn end_coordinates(start: Point, end: Point) -> Matrix2<f64> {
    Matrix2::new(start.x, start.y, end.x, end.y)
}

/// Distance between the two ends of a bar.
#[must_use]
pub fn bar_length(ends: &Matrix2<f64>) -> f64 {
    let dx = ends[(1, 0)] - ends[(0, 0)];
    let dy = ends[(1, 1)] - ends[(0, 1)];
    dx.hypot(dy)
}

/// Direction cosines `(c, s)` of the axis running from the first to the second end.
///
/// # Errors
///
/// Returns [`BarPropertyError::NonFiniteCoordinates`] when a coordinate is NaN or
/// infinite and [`BarPropertyError::ZeroLength`] when both ends coincide.
pub fn direction_cosines(ends: &Matrix2<f64>) -> Result<(f64, f64), BarPropertyError> {
    let length = bar_length(ends);
    if !length.is_finite() || ends.iter().any(|coordinate| !coordinate.is_finite()) {
        return Err(BarPropertyError::NonFiniteCoordinates);
    }
    if length == 0.0 {
        return Err(BarPropertyError::ZeroLength);
    }
    let dx = ends[(1, 0)] - ends[(0, 0)];
    let dy = ends[(1, 1)] - ends[(0, 1)];
    Ok((dx / length, dy / length))
}

/// Axial stiffness `E*A/L` after checking the section and material.
fn axial_stiffness(
    elastic_modulus: f64,
    area: f64,
    ends: &Matrix2<f64>,
) -> Result<(f64, f64, f64), BarPropertyError> {
    if elastic_modulus <= 0.0 || !elastic_modulus.is_finite() {
        return Err(BarPropertyError::NonPositiveElasticModulus { elastic_modulus });
    }
    if area <= 0.0 || !area.is_finite() {
        return Err(BarPropertyError::NonPositiveArea { area });
    }
    let (c, s) = direction_cosines(ends)?;
    Ok((elastic_modulus * area / bar_length(ends), c, s))
}

/// Compute the 4×4 stiffness matrix of a bar in global x-y coordinates.
///
/// `ends` holds `[[x1, y1], [x2, y2]]`. Rows and columns are ordered
/// (node1-x, node1-y, node2-x, node2-y).
///
/// # Errors
///
/// Returns a [`BarPropertyError`] when `elastic_modulus` or `area` is not
/// strictly positive or when the ends coincide.
///
/// # Examples
/// ```
/// use trussdsm::{element_stiffness, end_coordinates, point};
///
/// let ends = end_coordinates(point(0.0, 0.0), point(2.0, 0.0));
/// let k = element_stiffness(10.0, 1.0, &ends).expect("valid bar");
/// assert_eq!(k[(0, 0)], 5.0);
/// assert_eq!(k[(0, 2)], -5.0);
/// assert_eq!(k[(1, 1)], 0.0);
/// ```
pub fn element_stiffness(
    elastic_modulus: f64,
    area: f64,
    ends: &Matrix2<f64>,
) -> Result<Matrix4<f64>, BarPropertyError> {
    let (ea_over_l, c, s) = axial_stiffness(elastic_modulus, area, ends)?;
    let cc = c * c;
    let cs = c * s;
    let ss = s * s;

    #[rustfmt::skip]
    let local = Matrix4::from_row_slice(&[
         cc,  cs, -cc, -cs,
         cs,  ss, -cs, -ss,
        -cc, -cs,  cc,  cs,
        -cs, -ss,  cs,  ss,
    ]);
    Ok(ea_over_l * local)
}

/// Axial force carried by a bar given the displacements of its four DOFs.
///
/// Tension is positive.
///
/// # Errors
///
/// Returns a [`BarPropertyError`] under the same conditions as [`element_stiffness`].
pub fn axial_force(
    elastic_modulus: f64,
    area: f64,
    ends: &Matrix2<f64>,
    displacements: &Vector4<f64>,
) -> Result<f64, BarPropertyError> {
    let (ea_over_l, c, s) = axial_stiffness(elastic_modulus, area, ends)?;
    let elongation = Vector4::new(-c, -s, c, s).dot(displacements);
    Ok(ea_over_l * elongation)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::point;

    fn diagonal_bar() -> Matrix2<f64> {
        end_coordinates(point(0.0, 0.0), point(4_000.0, 3_000.0))
    }

    #[test]
    fn inclined_bar_matches_closed_form() {
        let k = element_stiffness(210.0e3, 2.0e3, &diagonal_bar()).expect("valid bar");
        let ea_over_l = 210.0e3 * 2.0e3 / 5_000.0;
        assert_relative_eq!(k[(0, 0)], ea_over_l * 0.64, epsilon = 1.0e-6);
        assert_relative_eq!(k[(0, 1)], ea_over_l * 0.48, epsilon = 1.0e-6);
        assert_relative_eq!(k[(1, 1)], ea_over_l * 0.36, epsilon = 1.0e-6);
        assert_relative_eq!(k[(1, 3)], -ea_over_l * 0.36, epsilon = 1.0e-6);
    }

    #[test]
    fn element_matrix_is_symmetric_with_rank_one() {
        let k = element_stiffness(70.0e3, 3.0e3, &diagonal_bar()).expect("valid bar");
        assert_relative_eq!(k, k.transpose(), epsilon = 1.0e-9);
        assert_eq!(k.rank(1.0e-6 * k.norm()), 1);
    }

    #[test]
    fn rigid_translation_produces_no_force() {
        let k = element_stiffness(70.0e3, 3.0e3, &diagonal_bar()).expect("valid bar");
        let translation = Vector4::new(1.5, -2.0, 1.5, -2.0);
        assert_relative_eq!((k * translation).norm(), 0.0, epsilon = 1.0e-6);
    }

    #[test]
    fn invalid_bars_are_rejected() {
        let ends = diagonal_bar();
        assert_eq!(
            element_stiffness(0.0, 1.0, &ends),
            Err(BarPropertyError::NonPositiveElasticModulus {
                elastic_modulus: 0.0
            })
        );
        assert_eq!(
            element_stiffness(1.0, -1.0, &ends),
            Err(BarPropertyError::NonPositiveArea { area: -1.0 })
        );
        let collapsed = end_coordinates(point(1.0, 1.0), point(1.0, 1.0));
        assert_eq!(
            element_stiffness(1.0, 1.0, &collapsed),
            Err(BarPropertyError::ZeroLength)
        );
    }

    #[test]
    fn non_finite_coordinates_are_not_reported_as_zero_length() {
        let unplaced = end_coordinates(point(0.0, 0.0), point(f64::NAN, 1.0));
        assert_eq!(
            direction_cosines(&unplaced),
            Err(BarPropertyError::NonFiniteCoordinates)
        );
        let far = end_coordinates(point(f64::INFINITY, 0.0), point(0.0, 0.0));
        assert_eq!(
            element_stiffness(1.0, 1.0, &far),
            Err(BarPropertyError::NonFiniteCoordinates)
        );
    }

    #[test]
    fn stretched_bar_is_in_tension() {
        let ends = end_coordinates(point(0.0, 0.0), point(1_000.0, 0.0));
        let stretch = Vector4::new(0.0, 0.0, 0.5, 0.0);
        let force = axial_force(200.0e3, 100.0, &ends, &stretch).expect("valid bar");
        assert_relative_eq!(force, 10_000.0, epsilon = 1.0e-9);
    }
}
