// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprig Transform: local 2D transforms for scene-graph nodes.
//!
//! A node in a 2D scene is placed by a position, a size, an origin (the pivot
//! used for rotation and scaling), a non-uniform scale, and a rotation in
//! degrees. This crate turns that description into a [`kurbo::Affine`] and
//! back again.
//!
//! ## Composition order
//!
//! [`LocalTransform::to_affine`] composes, left to right:
//!
//! ```text
//! T(position + origin) · R(rotation) · S(scale) · T(-origin)
//! ```
//!
//! The trailing `T(-origin)` is the pivot correction: the origin moves the
//! point that rotation and scale pivot around, but it does not move the node.
//! With a zero origin this is plain translate → rotate → scale.
//!
//! Each step is skipped when it is the identity, so a node that is only
//! translated costs a single translation.
//!
//! ## Inverses
//!
//! - [`LocalTransform::inverse_affine`] builds the analytic inverse and rejects
//!   a scale component without a finite reciprocal (zero, subnormal or NaN)
//!   with [`TransformError::DegenerateScale`].
//! - [`invert`] inverts an arbitrary composed matrix (for example a world
//!   transform) and rejects singular matrices with [`TransformError::Singular`].
//!
//! Neither path ever produces a NaN or infinite matrix from a degenerate input.
//!
//! ```rust
//! use kurbo::{Point, Vec2};
//! use sprig_transform::LocalTransform;
//!
//! // A 10×10 box rotated a quarter turn about its center.
//! let tf = LocalTransform {
//!     origin: Vec2::new(5.0, 5.0),
//!     rotation: 90.0,
//!     ..LocalTransform::IDENTITY
//! };
//! let p = tf.map_to_parent(Point::new(10.0, 5.0));
//! assert!((p.x - 5.0).abs() < 1e-9 && (p.y - 10.0).abs() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: `no_std` floating-point support through `libm`.
//! - `serde`: derives `Serialize`/`Deserialize` for [`LocalTransform`].
//!
//! This crate is `no_std`.

#![no_std]

mod error;
mod local;
mod util;

pub use error::TransformError;
pub use local::LocalTransform;
pub use util::invert;
