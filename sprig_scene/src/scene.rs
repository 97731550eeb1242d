// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The scene container: a tree with a pinned root, bound to a viewport and a batch.

use alloc::vec::Vec;

use kurbo::Point;
use log::{debug, trace};

use crate::{Batch, LocalNode, NodeId, SceneConfig, SceneId, Tree, TreeError, Viewport};

/// A node tree bound to a [`Viewport`] and a [`Batch`], with per-frame entry points.
///
/// The scene owns a root node which cannot be re-parented or destroyed. Nodes
/// attached under the root (directly or transitively) report this scene's
/// [`SceneId`].
///
/// A typical frame is [`act`](Scene::act) followed by [`draw`](Scene::draw);
/// [`resize`](Scene::resize) forwards window size changes and
/// [`hit`](Scene::hit) resolves pointer positions.
#[derive(Debug)]
pub struct Scene<V, B> {
    tree: Tree<B>,
    root: NodeId,
    id: SceneId,
    viewport: V,
    batch: B,
    config: SceneConfig,
}

impl<V, B> Scene<V, B>
where
    V: Viewport,
    B: Batch + 'static,
{
    /// Create an empty scene with the default [`SceneConfig`].
    pub fn new(viewport: V, batch: B) -> Self {
        Self::with_config(viewport, batch, SceneConfig::default())
    }

    /// Create an empty scene with the given configuration.
    pub fn with_config(viewport: V, batch: B, config: SceneConfig) -> Self {
        let mut tree = Tree::new();
        let (root, id) = tree.insert_scene_root(LocalNode::default().named("root"));
        Self {
            tree,
            root,
            id,
            viewport,
            batch,
            config,
        }
    }

    /// The pinned root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// This scene's identifier, as reported by [`Tree::scene_of`].
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// The node tree.
    pub fn tree(&self) -> &Tree<B> {
        &self.tree
    }

    /// The node tree, mutably.
    pub fn tree_mut(&mut self) -> &mut Tree<B> {
        &mut self.tree
    }

    /// The bound viewport.
    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    /// The bound viewport, mutably.
    pub fn viewport_mut(&mut self) -> &mut V {
        &mut self.viewport
    }

    /// The bound batch.
    pub fn batch(&self) -> &B {
        &self.batch
    }

    /// The bound batch, mutably.
    pub fn batch_mut(&mut self) -> &mut B {
        &mut self.batch
    }

    /// Current configuration.
    pub fn config(&self) -> SceneConfig {
        self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: SceneConfig) {
        self.config = config;
    }

    /// Create a node as the last child of the root.
    pub fn spawn(&mut self, local: LocalNode) -> NodeId {
        self.tree.insert(Some(self.root), local)
    }

    /// Attach an existing node as the last child of the root.
    ///
    /// The node is detached from any previous parent first.
    pub fn add_node(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.tree.add_child(self.root, node)
    }

    /// Detach a direct child of the root. The node stays alive.
    pub fn remove_node(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.tree.remove_child(self.root, node)
    }

    /// Detach every child of the root and return them in their former order.
    ///
    /// The nodes stay alive; destroy them with [`Tree::destroy`] if they are
    /// no longer needed.
    pub fn clear(&mut self) -> Vec<NodeId> {
        // The root is never stale.
        let removed = self.tree.remove_all_children(self.root).unwrap_or_default();
        debug!("cleared {:?}: {} nodes detached", self.id, removed.len());
        removed
    }

    /// Advance every behavior in the scene by `delta` seconds.
    pub fn act(&mut self, delta: f64) {
        self.tree.act(self.root, delta);
    }

    /// Draw one frame.
    ///
    /// Applies the viewport, hands its projection to the batch, and draws the
    /// whole tree between [`Batch::begin`] and [`Batch::end`].
    pub fn draw(&mut self) {
        self.viewport.apply();
        self.batch.set_projection(self.viewport.projection());
        self.batch.begin();
        self.tree.draw(self.root, &mut self.batch);
        self.batch.end();
    }

    /// Forward a new window size to the viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        debug!("resize {:?} to {width}x{height}", self.id);
        self.viewport.update(width, height);
    }

    /// Map a screen-space point to scene space through the viewport.
    pub fn screen_to_scene(&self, screen: Point) -> Point {
        self.viewport.screen_to_world(screen)
    }

    /// Find the topmost node under a screen-space point.
    ///
    /// The configured [`HitConvention`](crate::HitConvention) offset is
    /// applied to `screen` before it is mapped to scene space.
    pub fn hit(&self, screen: Point) -> Option<NodeId> {
        let screen = screen + self.config.hit_convention.offset();
        self.hit_scene(self.screen_to_scene(screen))
    }

    /// Find the topmost node under a scene-space point.
    pub fn hit_scene(&self, point: Point) -> Option<NodeId> {
        let local = match self.tree.parent_to_local(self.root, point) {
            Ok(local) => local,
            Err(err) => {
                trace!("hit_scene: root is not invertible: {err}");
                return None;
            }
        };
        self.tree.hit(self.root, local, self.config.hit_order)
    }

    /// Split the scene into its tree, viewport and batch.
    pub fn into_parts(self) -> (Tree<B>, V, B) {
        (self.tree, self.viewport, self.batch)
    }
}
