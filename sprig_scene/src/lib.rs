// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sprig Scene: a retained 2D scene graph with cached world transforms.
//!
//! Sprig Scene is the core of a small sprite-oriented 2D engine.
//!
//! - Represents a hierarchy of nodes, each with a local transform (position, origin, scale,
//!   rotation), a size, a z-index, and visibility/picking flags.
//! - Caches every node's world transform and recomputes only what a change invalidated.
//! - Runs two per-frame traversals: `act` drives per-node [`Behavior`]s, `draw` emits draw calls
//!   into a host-supplied [`Batch`].
//! - Answers point queries ("which node is under the cursor?") with inverse-transform hit testing.
//!
//! ## Coordinate spaces
//!
//! A node's *local* space has its box at `[0, width) × [0, height)`. Its local transform maps
//! local space into its parent's space; composing transforms up to the scene root yields *scene*
//! (world) space. The host's [`Viewport`] maps between screen space and scene space.
//!
//! ## Ownership
//!
//! Nodes live in a generational arena ([`Tree`]) and are named by [`NodeId`]. Parents own their
//! child lists; parents and scenes are back-references. Stale ids are reported, never
//! dereferenced.
//!
//! ## Not a renderer
//!
//! GPU buffers, shaders, textures, and window management belong to the [`Batch`] and [`Viewport`]
//! implementations. This crate only decides what is drawn, in which order, and under which
//! transform.
//!
//! ## API overview
//!
//! - [`Tree`]: node arena, structural operations, transform caching, coordinate conversions.
//! - [`Scene`]: owns a tree with a pinned root plus the viewport and batch; drives frames.
//! - [`LocalNode`]: per-node data supplied at insertion.
//! - [`NodeFlags`]: visibility and picking controls.
//! - [`Behavior`], [`ActCx`], [`DrawCx`]: per-node logic and the access it gets while running.
//! - [`SceneConfig`]: hit-testing conventions.
//!
//! Key operations:
//! - [`Tree::insert`] / [`Tree::add_child`] / [`Tree::remove_child`] / [`Tree::destroy`]
//! - [`Tree::world_transform`], [`Tree::local_to_scene`], [`Tree::scene_to_local`]
//! - [`Tree::act`] and [`Tree::draw`]
//! - [`Tree::hit`] and [`Scene::hit`]
//!
//! ```rust
//! use kurbo::{Point, Size, Vec2};
//! use sprig_scene::{HitOrder, LocalNode, Tree};
//!
//! let mut tree: Tree<()> = Tree::new();
//! let root = tree.insert(None, LocalNode::at(Vec2::ZERO, Size::new(100.0, 100.0)));
//! let button = tree.insert(Some(root), LocalNode::at(Vec2::new(10.0, 10.0), Size::new(20.0, 8.0)));
//!
//! assert_eq!(tree.hit(root, Point::new(15.0, 12.0), HitOrder::DeepestFirst), Some(button));
//! assert_eq!(tree.hit(root, Point::new(50.0, 50.0), HitOrder::DeepestFirst), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod batch;
mod behavior;
mod config;
mod error;
mod hit;
mod scene;
mod traverse;
mod tree;
mod types;
mod viewport;

#[cfg(test)]
mod test_support;

pub use batch::Batch;
pub use behavior::{ActCx, Behavior, DrawCx};
pub use config::{HitConvention, HitOrder, SceneConfig};
pub use error::TreeError;
pub use scene::Scene;
pub use tree::{Ancestors, DepthFirst, Node, Tree};
pub use types::{LocalNode, NodeFlags, NodeId, SceneId};
pub use viewport::Viewport;

pub use sprig_transform::{LocalTransform, TransformError};
