// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Failure to map a point back through a transform.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TransformError {
    /// A scale component is zero, so the local space collapsed onto a line or point.
    #[error("scale ({x}, {y}) has a zero component and cannot be inverted")]
    DegenerateScale {
        /// Horizontal scale factor.
        x: f64,
        /// Vertical scale factor.
        y: f64,
    },
    /// A composed matrix has a zero (or non-finite) determinant.
    #[error("transform is singular (determinant {determinant})")]
    Singular {
        /// Determinant of the rejected matrix.
        determinant: f64,
    },
}
