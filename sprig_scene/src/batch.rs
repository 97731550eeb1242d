// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The drawing collaborator consumed by the draw traversal.

use kurbo::{Affine, Point, Rect};

/// An immediate-mode sprite batcher supplied by the host.
///
/// The draw traversal brackets each visible node with
/// [`push_transform`](Batch::push_transform) / [`pop_transform`](Batch::pop_transform),
/// passing the node's *local* transform. Implementations compose it onto the
/// current transform, so while a node's behavior draws, the active transform is
/// that node's world transform and primitives are given in local coordinates.
///
/// GPU buffers, shaders, and texture management are entirely the
/// implementation's concern.
pub trait Batch {
    /// Texture region handle accepted by [`draw_region`](Batch::draw_region).
    type Region: ?Sized;
    /// Color representation used by the fill and line primitives.
    type Color: Copy;

    /// Start collecting draw calls for a frame.
    fn begin(&mut self);

    /// Flush everything collected since [`begin`](Batch::begin).
    fn end(&mut self);

    /// Set the world → clip projection.
    fn set_projection(&mut self, projection: Affine);

    /// Compose `transform` onto the current transform and remember the previous one.
    fn push_transform(&mut self, transform: Affine);

    /// Restore the transform active before the matching push.
    fn pop_transform(&mut self);

    /// Draw a texture region stretched over `rect`.
    fn draw_region(&mut self, region: &Self::Region, rect: Rect);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, color: Self::Color);

    /// Draw a line segment of the given stroke width.
    fn line(&mut self, from: Point, to: Point, color: Self::Color, stroke: f64);
}
