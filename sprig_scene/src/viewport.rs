// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Affine, Point, Size};

/// Camera and viewport mapping supplied by the host.
///
/// The scene uses it to set the batch projection before drawing and to turn
/// pointer positions (screen space) into scene coordinates for hit testing.
pub trait Viewport {
    /// React to a new window size, in physical pixels.
    fn update(&mut self, screen_width: u32, screen_height: u32);

    /// Make this viewport current on the graphics context before drawing.
    fn apply(&mut self) {}

    /// World → clip projection handed to [`Batch::set_projection`](crate::Batch::set_projection).
    fn projection(&self) -> Affine;

    /// Map a screen-space point to world (scene) space.
    fn screen_to_world(&self, screen: Point) -> Point;

    /// Size of the visible world region.
    fn world_size(&self) -> Size;
}
