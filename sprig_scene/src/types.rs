// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene tree: node identifiers, flags, and local state.

use alloc::string::String;

use kurbo::{Rect, Size, Vec2};
use sprig_transform::LocalTransform;

/// Identifier for a node in the tree (generational).
///
/// Ids stay valid until the node is destroyed; after that the slot may be
/// reused with a new generation and the old id is reported as stale.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Identifier of the scene a node is attached to.
///
/// Nodes carry this as a non-owning back-reference; it is propagated to a
/// whole subtree when the subtree is attached or detached.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct SceneId(pub(crate) u32);

bitflags::bitflags! {
    /// Node flags controlling drawing and picking.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are drawn and hit tested.
        const VISIBLE  = 0b0000_0001;
        /// Node itself can be returned by hit testing. Children are unaffected.
        const PICKABLE = 0b0000_0010;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Local data for a node, supplied at insertion.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalNode {
    /// Optional, non-unique name used for lookup and debugging.
    pub name: Option<String>,
    /// Placement relative to the parent.
    pub transform: LocalTransform,
    /// Extent of the node's box, `[0, width) × [0, height)` in local space.
    pub size: Size,
    /// Stacking order among siblings. Higher is drawn on top; ties keep insertion order.
    pub z_index: i32,
    /// Visibility and picking flags.
    pub flags: NodeFlags,
}

impl Default for LocalNode {
    fn default() -> Self {
        Self {
            name: None,
            transform: LocalTransform::IDENTITY,
            size: Size::ZERO,
            z_index: 0,
            flags: NodeFlags::default(),
        }
    }
}

impl LocalNode {
    /// A node of the given size placed at `position`.
    pub fn at(position: Vec2, size: Size) -> Self {
        Self {
            transform: LocalTransform {
                position,
                ..LocalTransform::IDENTITY
            },
            size,
            ..Self::default()
        }
    }

    /// Set the name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The node's box in local space.
    pub fn local_bounds(&self) -> Rect {
        self.size.to_rect()
    }
}
