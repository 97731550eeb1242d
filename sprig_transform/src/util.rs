// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Affine;

use crate::TransformError;

/// Invert a composed transform, rejecting singular matrices.
///
/// [`Affine::inverse`] divides by the determinant unconditionally; this
/// checks it first so a collapsed chain reports an error instead of filling
/// the result with infinities. A determinant too small for its reciprocal to
/// be finite counts as singular.
pub fn invert(affine: Affine) -> Result<Affine, TransformError> {
    let determinant = affine.determinant();
    if determinant == 0.0 || !determinant.recip().is_finite() {
        return Err(TransformError::Singular { determinant });
    }
    let inverse = affine.inverse();
    if !inverse.is_finite() {
        return Err(TransformError::Singular { determinant });
    }
    Ok(inverse)
}
