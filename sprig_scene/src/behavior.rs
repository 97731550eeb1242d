// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node behaviors and the contexts they run in.

use kurbo::{Affine, Vec2};

use crate::{Node, NodeId, Tree};

/// Per-node logic driven by the scene traversals.
///
/// A node has zero or one behavior. A node without one is a plain transform
/// group: it still positions its children and can still be hit.
///
/// Both hooks default to doing nothing, so a behavior only overrides what it
/// needs.
///
/// ```rust
/// use sprig_scene::{ActCx, Batch, Behavior, DrawCx};
///
/// struct Spinner {
///     degrees_per_second: f64,
/// }
///
/// impl<B: Batch<Color = u32>> Behavior<B> for Spinner {
///     fn act(&mut self, cx: &mut ActCx<'_, B>, delta: f64) {
///         cx.rotate_by(self.degrees_per_second * delta);
///     }
///
///     fn draw(&self, cx: &DrawCx<'_, B>, batch: &mut B) {
///         batch.fill_rect(cx.node().local_bounds(), 0xff_00_00_ff);
///     }
/// }
/// ```
pub trait Behavior<B>: 'static {
    /// Advance by `delta` seconds. Called for hidden nodes too.
    fn act(&mut self, _cx: &mut ActCx<'_, B>, _delta: f64) {}

    /// Emit draw calls in the node's local coordinates. Only called for
    /// visible nodes whose ancestors are all visible.
    fn draw(&self, _cx: &DrawCx<'_, B>, _batch: &mut B) {}
}

/// Mutable access to the tree while a node's behavior acts.
///
/// While [`Behavior::act`] runs, the behavior is lent out of its node, so
/// [`Node::has_behavior`] reports `false` for the acting node. A behavior
/// installed on the node during the call replaces the acting one, and
/// [`remove_behavior`](Self::remove_behavior) (or [`Tree::take_behavior`] on
/// the acting node) drops it once the call returns.
#[derive(Debug)]
pub struct ActCx<'a, B> {
    pub(crate) tree: &'a mut Tree<B>,
    pub(crate) id: NodeId,
}

impl<B> ActCx<'_, B> {
    /// The acting node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read the acting node.
    ///
    /// # Panics
    ///
    /// Panics if the behavior destroyed its own node through [`tree_mut`](Self::tree_mut).
    pub fn node(&self) -> &Node<B> {
        self.tree.node(self.id)
    }

    /// The whole tree.
    pub fn tree(&self) -> &Tree<B> {
        self.tree
    }

    /// The whole tree, mutably.
    ///
    /// Structural changes to the subtree being traversed take effect for nodes
    /// not yet visited; prefer deferring them to the end of the frame.
    pub fn tree_mut(&mut self) -> &mut Tree<B> {
        self.tree
    }

    /// World transform of the acting node.
    pub fn world_transform(&self) -> Affine {
        self.tree
            .world_transform(self.id)
            .unwrap_or(Affine::IDENTITY)
    }

    /// Move the acting node to `position`.
    pub fn set_position(&mut self, position: Vec2) {
        self.tree.set_position(self.id, position);
    }

    /// Offset the acting node by `delta`.
    pub fn translate_by(&mut self, delta: Vec2) {
        if let Some(node) = self.tree.get(self.id) {
            let position = node.position() + delta;
            self.tree.set_position(self.id, position);
        }
    }

    /// Set the acting node's rotation in degrees.
    pub fn set_rotation(&mut self, degrees: f64) {
        self.tree.set_rotation(self.id, degrees);
    }

    /// Add `degrees` to the acting node's rotation.
    pub fn rotate_by(&mut self, degrees: f64) {
        if let Some(node) = self.tree.get(self.id) {
            let rotation = node.rotation() + degrees;
            self.tree.set_rotation(self.id, rotation);
        }
    }

    /// Set the acting node's scale.
    pub fn set_scale(&mut self, scale: Vec2) {
        self.tree.set_scale(self.id, scale);
    }

    /// Detach the acting behavior from its node; it is dropped once `act` returns.
    pub fn remove_behavior(&mut self) {
        self.tree.take_behavior(self.id);
    }

    /// Show or hide the acting node.
    pub fn set_visible(&mut self, visible: bool) {
        self.tree.set_visible(self.id, visible);
    }
}

/// Read access to the tree while a node's behavior draws.
#[derive(Debug)]
pub struct DrawCx<'a, B> {
    pub(crate) tree: &'a Tree<B>,
    pub(crate) id: NodeId,
}

impl<B> DrawCx<'_, B> {
    /// The drawing node.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read the drawing node.
    pub fn node(&self) -> &Node<B> {
        self.tree.node(self.id)
    }

    /// The whole tree.
    pub fn tree(&self) -> &Tree<B> {
        self.tree
    }

    /// World transform of the drawing node; equal to the batch's active
    /// transform for batches that compose pushes.
    pub fn world_transform(&self) -> Affine {
        self.tree
            .world_transform(self.id)
            .unwrap_or(Affine::IDENTITY)
    }
}
