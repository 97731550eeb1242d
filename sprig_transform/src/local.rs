// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-node local transform and its analytic forward/inverse maps.

use kurbo::{Affine, Point, Vec2};

use crate::TransformError;

/// Placement of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalTransform {
    /// Offset of the node's frame in parent space.
    pub position: Vec2,
    /// Pivot for rotation and scale, in local space.
    pub origin: Vec2,
    /// Per-axis scale factors.
    pub scale: Vec2,
    /// Rotation in degrees. Positive values turn +x toward +y.
    pub rotation: f64,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl LocalTransform {
    /// No translation, rotation or scaling.
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        origin: Vec2::ZERO,
        scale: Vec2::new(1.0, 1.0),
        rotation: 0.0,
    };

    /// Returns `true` if either scale component has no finite reciprocal.
    ///
    /// This covers zero, subnormal magnitudes like `1e-320`, and NaN.
    pub fn is_degenerate(&self) -> bool {
        !self.scale.is_finite()
            || !self.scale.x.recip().is_finite()
            || !self.scale.y.recip().is_finite()
    }

    /// Compose the local → parent matrix.
    ///
    /// See the crate docs for the composition order.
    pub fn to_affine(&self) -> Affine {
        let mut tf = Affine::translate(self.position + self.origin);
        if self.rotation != 0.0 {
            tf *= Affine::rotate(self.rotation.to_radians());
        }
        if self.scale != Vec2::new(1.0, 1.0) {
            tf *= Affine::scale_non_uniform(self.scale.x, self.scale.y);
        }
        if self.origin != Vec2::ZERO {
            tf *= Affine::translate(-self.origin);
        }
        tf
    }

    /// Compose the parent → local matrix without a general matrix inverse.
    ///
    /// Each step of [`to_affine`](Self::to_affine) is undone in reverse order.
    pub fn inverse_affine(&self) -> Result<Affine, TransformError> {
        if self.is_degenerate() {
            return Err(TransformError::DegenerateScale {
                x: self.scale.x,
                y: self.scale.y,
            });
        }
        let mut tf = Affine::IDENTITY;
        if self.origin != Vec2::ZERO {
            tf = Affine::translate(self.origin);
        }
        if self.scale != Vec2::new(1.0, 1.0) {
            tf *= Affine::scale_non_uniform(1.0 / self.scale.x, 1.0 / self.scale.y);
        }
        if self.rotation != 0.0 {
            tf *= Affine::rotate(-self.rotation.to_radians());
        }
        let tf = tf * Affine::translate(-(self.position + self.origin));
        if !tf.is_finite() {
            return Err(TransformError::Singular {
                determinant: tf.determinant(),
            });
        }
        Ok(tf)
    }

    /// Map a local point into the parent's space.
    pub fn map_to_parent(&self, local: Point) -> Point {
        self.to_affine() * local
    }

    /// Map a parent-space point into local space.
    pub fn map_from_parent(&self, parent: Point) -> Result<Point, TransformError> {
        Ok(self.inverse_affine()? * parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_point_eq(actual: Point, expected: Point) {
        assert_abs_diff_eq!(actual.x, expected.x, epsilon = 1e-9);
        assert_abs_diff_eq!(actual.y, expected.y, epsilon = 1e-9);
    }

    /// Closed form of the composition, written out per component.
    fn closed_form(tf: &LocalTransform, p: Point) -> Point {
        let (sin, cos) = {
            let [c, s, _, _, _, _] = Affine::rotate(tf.rotation.to_radians()).as_coeffs();
            (s, c)
        };
        let dx = (p.x - tf.origin.x) * tf.scale.x;
        let dy = (p.y - tf.origin.y) * tf.scale.y;
        Point::new(
            tf.position.x + tf.origin.x + dx * cos - dy * sin,
            tf.position.y + tf.origin.y + dx * sin + dy * cos,
        )
    }

    #[test]
    fn identity_maps_points_unchanged() {
        let p = Point::new(3.0, -4.0);
        assert_eq!(LocalTransform::IDENTITY.map_to_parent(p), p);
        assert_eq!(LocalTransform::IDENTITY.to_affine(), Affine::IDENTITY);
    }

    #[test]
    fn quarter_turn_about_box_center() {
        let tf = LocalTransform {
            origin: Vec2::new(5.0, 5.0),
            rotation: 90.0,
            ..LocalTransform::IDENTITY
        };
        assert_point_eq(tf.map_to_parent(Point::new(10.0, 5.0)), Point::new(5.0, 10.0));
        // The pivot itself stays put.
        assert_point_eq(tf.map_to_parent(Point::new(5.0, 5.0)), Point::new(5.0, 5.0));
    }

    #[test]
    fn origin_does_not_move_an_unrotated_unscaled_node() {
        let tf = LocalTransform {
            position: Vec2::new(20.0, 30.0),
            origin: Vec2::new(7.0, 3.0),
            ..LocalTransform::IDENTITY
        };
        assert_point_eq(tf.map_to_parent(Point::ZERO), Point::new(20.0, 30.0));
    }

    #[test]
    fn scale_pivots_around_origin() {
        let tf = LocalTransform {
            origin: Vec2::new(5.0, 5.0),
            scale: Vec2::new(2.0, 3.0),
            ..LocalTransform::IDENTITY
        };
        assert_point_eq(tf.map_to_parent(Point::new(5.0, 5.0)), Point::new(5.0, 5.0));
        assert_point_eq(tf.map_to_parent(Point::new(6.0, 6.0)), Point::new(7.0, 8.0));
    }

    #[test]
    fn matches_closed_form() {
        let tf = LocalTransform {
            position: Vec2::new(12.5, -3.0),
            origin: Vec2::new(4.0, 2.0),
            scale: Vec2::new(1.5, 0.5),
            rotation: 33.0,
        };
        for p in [
            Point::ZERO,
            Point::new(1.0, 0.0),
            Point::new(-6.0, 9.0),
            Point::new(100.0, 0.25),
        ] {
            assert_point_eq(tf.map_to_parent(p), closed_form(&tf, p));
        }
    }

    #[test]
    fn analytic_inverse_undoes_forward() {
        let tf = LocalTransform {
            position: Vec2::new(-8.0, 14.0),
            origin: Vec2::new(2.0, 6.0),
            scale: Vec2::new(-2.0, 0.25),
            rotation: 200.0,
        };
        let p = Point::new(3.5, -1.25);
        assert_point_eq(tf.map_from_parent(tf.map_to_parent(p)).unwrap(), p);
    }

    #[test]
    fn zero_scale_is_rejected_on_inverse() {
        let tf = LocalTransform {
            scale: Vec2::new(0.0, 1.0),
            ..LocalTransform::IDENTITY
        };
        assert!(tf.is_degenerate());
        assert_eq!(
            tf.map_from_parent(Point::new(1.0, 1.0)),
            Err(TransformError::DegenerateScale { x: 0.0, y: 1.0 })
        );
    }

    #[test]
    fn subnormal_scale_is_rejected_on_inverse() {
        let tf = LocalTransform {
            scale: Vec2::new(1e-320, 1.0),
            ..LocalTransform::IDENTITY
        };
        assert!(tf.is_degenerate());
        assert!(matches!(
            tf.map_from_parent(Point::new(1.0, 1.0)),
            Err(TransformError::DegenerateScale { .. })
        ));
    }

    #[test]
    fn non_finite_position_is_rejected_on_inverse() {
        let tf = LocalTransform {
            position: Vec2::new(f64::INFINITY, 0.0),
            ..LocalTransform::IDENTITY
        };
        assert!(!tf.is_degenerate());
        assert!(matches!(
            tf.inverse_affine(),
            Err(TransformError::Singular { .. })
        ));
    }
}
