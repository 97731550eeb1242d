// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, local state, cached world transforms.

use alloc::{boxed::Box, string::String, vec, vec::Vec};
use core::any::Any;
use core::cell::Cell;

use kurbo::{Affine, Point, Rect, Size, Vec2};
use log::{debug, trace, warn};
use smallvec::SmallVec;
use sprig_transform::{LocalTransform, invert};

use crate::{Behavior, LocalNode, NodeFlags, NodeId, SceneId, TreeError};

/// Storage for a node's behavior.
enum BehaviorSlot<B> {
    Empty,
    Installed(Box<dyn Behavior<B>>),
    /// Moved out while its `act` runs.
    Lent,
}

/// A node of the scene tree.
///
/// Nodes are owned by a [`Tree`] and read through [`Tree::get`]. All mutation
/// goes through the tree so that cached world transforms stay coherent.
pub struct Node<B> {
    generation: u32,
    local: LocalNode,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    scene: Option<SceneId>,
    scene_root: bool,
    behavior: BehaviorSlot<B>,
    user_data: Option<Box<dyn Any>>,
    /// Local → world, valid while `dirty` is false.
    world: Cell<Affine>,
    dirty: Cell<bool>,
}

impl<B> core::fmt::Debug for Node<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("generation", &self.generation)
            .field("local", &self.local)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("scene", &self.scene)
            .field("has_behavior", &self.has_behavior())
            .field("has_user_data", &self.user_data.is_some())
            .field("dirty", &self.dirty.get())
            .finish_non_exhaustive()
    }
}

impl<B> Node<B> {
    fn new(generation: u32, local: LocalNode) -> Self {
        Self {
            generation,
            local,
            parent: None,
            children: Vec::new(),
            scene: None,
            scene_root: false,
            behavior: BehaviorSlot::Empty,
            user_data: None,
            world: Cell::new(Affine::IDENTITY),
            dirty: Cell::new(true),
        }
    }

    /// Name given at insertion or by [`Tree::set_name`].
    pub fn name(&self) -> Option<&str> {
        self.local.name.as_deref()
    }

    /// Local placement relative to the parent.
    pub fn local_transform(&self) -> &LocalTransform {
        &self.local.transform
    }

    /// Position in parent space.
    pub fn position(&self) -> Vec2 {
        self.local.transform.position
    }

    /// Rotation and scale pivot in local space.
    pub fn origin(&self) -> Vec2 {
        self.local.transform.origin
    }

    /// Per-axis scale.
    pub fn scale(&self) -> Vec2 {
        self.local.transform.scale
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        self.local.transform.rotation
    }

    /// Box size.
    pub fn size(&self) -> Size {
        self.local.size
    }

    /// The node's box in local space, `[0, width) × [0, height)`.
    pub fn local_bounds(&self) -> Rect {
        self.local.local_bounds()
    }

    /// Stacking order among siblings.
    pub fn z_index(&self) -> i32 {
        self.local.z_index
    }

    /// Visibility and picking flags.
    pub fn flags(&self) -> NodeFlags {
        self.local.flags
    }

    /// Whether the node (and so its subtree) is drawn and hit tested.
    pub fn is_visible(&self) -> bool {
        self.local.flags.contains(NodeFlags::VISIBLE)
    }

    /// Whether the node itself can be returned by hit testing.
    pub fn is_pickable(&self) -> bool {
        self.local.flags.contains(NodeFlags::PICKABLE)
    }

    /// Parent, or `None` for roots and detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Scene this node is attached to, if any.
    pub fn scene(&self) -> Option<SceneId> {
        self.scene
    }

    /// Returns `true` if the node is the root of a scene.
    pub fn is_scene_root(&self) -> bool {
        self.scene_root
    }

    /// Returns `true` if a behavior is installed.
    ///
    /// A behavior that is currently running [`Behavior::act`] is lent out and
    /// not counted.
    pub fn has_behavior(&self) -> bool {
        matches!(self.behavior, BehaviorSlot::Installed(_))
    }

    /// The installed behavior, unless it is lent out.
    pub(crate) fn behavior(&self) -> Option<&dyn Behavior<B>> {
        match &self.behavior {
            BehaviorSlot::Installed(behavior) => Some(behavior.as_ref()),
            BehaviorSlot::Empty | BehaviorSlot::Lent => None,
        }
    }

    /// Caller-supplied data, if present and of type `T`.
    pub fn user_data<T: Any>(&self) -> Option<&T> {
        self.user_data.as_deref()?.downcast_ref()
    }

    /// Returns `true` if the world transform must be recomputed before use.
    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Whether `local` (in this node's space) lies inside the node's box.
    pub(crate) fn contains_local(&self, local: Point) -> bool {
        let size = self.local.size;
        local.x >= 0.0 && local.y >= 0.0 && local.x < size.width && local.y < size.height
    }
}

/// Arena holding every node and the parent/child structure between them.
///
/// The type parameter `B` is the batch type behaviors draw with; trees used
/// without a scene can pick any type, such as `()`.
///
/// ## Ownership
///
/// Children are owned by their parent's child list; the `parent` and `scene`
/// fields are back-references. [`Tree::add_child`] detaches a node from its
/// old parent before appending it to the new one, and rejects moves that
/// would make a node its own ancestor, so the structure is always a forest.
///
/// ## World transforms
///
/// Each node caches its local → world transform. Changing a node's local
/// transform or parent marks it and its descendants dirty; the next
/// [`Tree::world_transform`] recomputes only dirty nodes along the chain and
/// caches every result.
///
/// ## Example
///
/// ```rust
/// use kurbo::{Point, Size, Vec2};
/// use sprig_scene::{LocalNode, Tree};
///
/// let mut tree: Tree<()> = Tree::new();
/// let root = tree.insert(None, LocalNode::at(Vec2::new(100.0, 0.0), Size::new(50.0, 50.0)));
/// let child = tree.insert(Some(root), LocalNode::at(Vec2::new(10.0, 10.0), Size::new(5.0, 5.0)));
///
/// let p = tree.local_to_scene(child, Point::ZERO).unwrap();
/// assert_eq!(p, Point::new(110.0, 10.0));
/// ```
pub struct Tree<B> {
    /// slots
    nodes: Vec<Option<Node<B>>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    next_scene: u32,
}

impl<B> core::fmt::Debug for Tree<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Tree")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("scenes", &self.next_scene)
            .finish_non_exhaustive()
    }
}

impl<B> Default for Tree<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> Tree<B> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            next_scene: 0,
        }
    }

    /// Insert a new node as the last child of `parent` (or detached if `None`).
    ///
    /// A stale `parent` leaves the new node detached.
    pub fn insert(&mut self, parent: Option<NodeId>, local: LocalNode) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, local));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, local)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        let id = NodeId::new(idx, generation);
        if let Some(p) = parent
            && let Err(err) = self.add_child(p, id)
        {
            warn!("inserted {id:?} detached: {err}");
        }
        id
    }

    /// Free a node and its whole subtree.
    ///
    /// The node is first removed from its parent. Every freed id becomes stale.
    pub fn destroy(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.try_node(id)?;
        let (scene_root, parent) = (node.scene_root, node.parent);
        if scene_root {
            return Err(TreeError::SceneRoot(id));
        }
        if let Some(parent) = parent {
            self.unlink_parent(id, parent);
        }
        let mut freed = 0_usize;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes[next.idx()].take() {
                stack.extend(node.children);
                self.free_list.push(next.idx());
                freed += 1;
            }
        }
        debug!("destroyed {id:?} ({freed} nodes)");
        Ok(())
    }

    /// Append `child` to `parent`'s children.
    ///
    /// If `child` already has a parent it is removed from that parent first, so
    /// re-parenting never fails on its own. The child's subtree takes on the
    /// parent's scene and is marked dirty.
    ///
    /// Fails, leaving the tree unchanged, if either id is stale, if `child` is
    /// a scene root, or if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let scene = self.try_node(parent)?.scene;
        let child_node = self.try_node(child)?;
        let (scene_root, old_parent) = (child_node.scene_root, child_node.parent);
        if scene_root {
            return Err(TreeError::SceneRoot(child));
        }
        if parent == child || self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        if let Some(old) = old_parent {
            self.unlink_parent(child, old);
        }
        self.link_parent(child, parent);
        self.set_subtree_scene(child, scene);
        self.mark_subtree_dirty(child);
        debug!("attached {child:?} under {parent:?}");
        Ok(())
    }

    /// Remove `child` from `parent`'s children.
    ///
    /// The child keeps its own subtree but loses its parent and scene. Returns
    /// [`TreeError::NotAChild`] if `child` is not currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.try_node(parent)?;
        if self.try_node(child)?.parent != Some(parent) {
            return Err(TreeError::NotAChild { parent, child });
        }
        self.unlink_parent(child, parent);
        self.set_subtree_scene(child, None);
        self.mark_subtree_dirty(child);
        debug!("detached {child:?} from {parent:?}");
        Ok(())
    }

    /// Detach every child of `parent` and return them in their former order.
    pub fn remove_all_children(&mut self, parent: NodeId) -> Result<Vec<NodeId>, TreeError> {
        let children = core::mem::take(&mut self.try_node_mut(parent)?.children);
        for &child in &children {
            self.node_mut(child).parent = None;
            self.set_subtree_scene(child, None);
            self.mark_subtree_dirty(child);
        }
        debug!("detached {} children from {parent:?}", children.len());
        Ok(children)
    }

    /// Remove `id` from its parent, if it has one.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        match self.try_node(id)?.parent {
            Some(parent) => self.remove_child(parent, id),
            None => Ok(()),
        }
    }

    /// Replace the whole local transform.
    pub fn set_local_transform(&mut self, id: NodeId, transform: LocalTransform) {
        self.update_transform(id, |t| *t = transform);
    }

    /// Update position.
    pub fn set_position(&mut self, id: NodeId, position: Vec2) {
        self.update_transform(id, |t| t.position = position);
    }

    /// Update the rotation/scale pivot.
    pub fn set_origin(&mut self, id: NodeId, origin: Vec2) {
        self.update_transform(id, |t| t.origin = origin);
    }

    /// Update scale. A zero component is accepted; inverse mappings through
    /// this node then report [`TransformError::DegenerateScale`](sprig_transform::TransformError::DegenerateScale).
    pub fn set_scale(&mut self, id: NodeId, scale: Vec2) {
        self.update_transform(id, |t| t.scale = scale);
    }

    /// Update rotation, in degrees.
    pub fn set_rotation(&mut self, id: NodeId, degrees: f64) {
        self.update_transform(id, |t| t.rotation = degrees);
    }

    /// Update size.
    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(n) = self.node_opt_mut(id)
            && n.local.size != size
        {
            n.local.size = size;
            self.mark_subtree_dirty(id);
        }
    }

    /// Update z index.
    pub fn set_z_index(&mut self, id: NodeId, z: i32) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.z_index = z;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags = flags;
        }
    }

    /// Show or hide a node and its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags.set(NodeFlags::VISIBLE, visible);
        }
    }

    /// Allow or forbid hit testing from returning this node.
    pub fn set_pickable(&mut self, id: NodeId, pickable: bool) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.flags.set(NodeFlags::PICKABLE, pickable);
        }
    }

    /// Update the name.
    pub fn set_name(&mut self, id: NodeId, name: Option<String>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.local.name = name;
        }
    }

    /// Install `behavior`, dropping any previous one.
    pub fn set_behavior(
        &mut self,
        id: NodeId,
        behavior: impl Behavior<B>,
    ) -> Result<(), TreeError> {
        self.try_node_mut(id)?.behavior = BehaviorSlot::Installed(Box::new(behavior));
        Ok(())
    }

    /// Remove and return the installed behavior.
    ///
    /// Called on a node whose behavior is running [`Behavior::act`], this
    /// removes the acting behavior instead: nothing is returned and the
    /// behavior is dropped when its `act` returns.
    pub fn take_behavior(&mut self, id: NodeId) -> Option<Box<dyn Behavior<B>>> {
        let node = self.node_opt_mut(id)?;
        match core::mem::replace(&mut node.behavior, BehaviorSlot::Empty) {
            BehaviorSlot::Installed(behavior) => Some(behavior),
            BehaviorSlot::Empty | BehaviorSlot::Lent => None,
        }
    }

    /// Move the installed behavior out for [`Behavior::act`], leaving the slot lent.
    pub(crate) fn lend_behavior(&mut self, id: NodeId) -> Option<Box<dyn Behavior<B>>> {
        let node = self.node_opt_mut(id)?;
        if !matches!(node.behavior, BehaviorSlot::Installed(_)) {
            return None;
        }
        match core::mem::replace(&mut node.behavior, BehaviorSlot::Lent) {
            BehaviorSlot::Installed(behavior) => Some(behavior),
            BehaviorSlot::Empty | BehaviorSlot::Lent => None,
        }
    }

    /// Put a lent behavior back.
    ///
    /// If the slot was emptied or refilled while the behavior was out, the
    /// returned behavior is dropped. Returns whether it was reinstalled.
    pub(crate) fn restore_behavior(
        &mut self,
        id: NodeId,
        behavior: Box<dyn Behavior<B>>,
    ) -> bool {
        match self.node_opt_mut(id) {
            Some(node) if matches!(node.behavior, BehaviorSlot::Lent) => {
                node.behavior = BehaviorSlot::Installed(behavior);
                true
            }
            _ => false,
        }
    }

    /// Attach caller-owned data, replacing any previous value.
    pub fn set_user_data<T: Any>(&mut self, id: NodeId, data: T) -> Result<(), TreeError> {
        self.try_node_mut(id)?.user_data = Some(Box::new(data));
        Ok(())
    }

    /// Mutable access to user data of type `T`.
    pub fn user_data_mut<T: Any>(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_opt_mut(id)?.user_data.as_deref_mut()?.downcast_mut()
    }

    /// Remove and return the user data.
    pub fn take_user_data(&mut self, id: NodeId) -> Option<Box<dyn Any>> {
        self.node_opt_mut(id)?.user_data.take()
    }

    /// Return the world transform of a live node.
    ///
    /// The returned [`Affine`] maps the node's local space into the space of
    /// its tree root's parent (the scene space when the root is a scene root).
    /// Returns `None` for stale identifiers.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine> {
        let node = self.get(id)?;
        if !node.dirty.get() {
            return Some(node.world.get());
        }

        // Walk up to the nearest clean ancestor; everything below it on the
        // chain is dirty and gets recomputed top-down.
        let mut chain: SmallVec<[NodeId; 16]> = SmallVec::new();
        let mut base = Affine::IDENTITY;
        let mut current = Some(id);
        while let Some(c) = current {
            let n = self.node(c);
            if !n.dirty.get() {
                base = n.world.get();
                break;
            }
            chain.push(c);
            current = n.parent;
        }
        trace!("recomputing {} world transforms for {id:?}", chain.len());
        for &c in chain.iter().rev() {
            let n = self.node(c);
            base *= n.local.transform.to_affine();
            n.world.set(base);
            n.dirty.set(false);
        }
        Some(base)
    }

    /// Returns whether a live node's cached world transform is stale.
    pub fn is_dirty(&self, id: NodeId) -> Option<bool> {
        self.get(id).map(Node::is_dirty)
    }

    /// Return a conservative world-space AABB of a live node's box.
    ///
    /// Tight for translated and axis-aligned scaled nodes, loose under rotation.
    pub fn world_bounds(&self, id: NodeId) -> Option<Rect> {
        let world = self.world_transform(id)?;
        Some(world.transform_rect_bbox(self.node(id).local_bounds()))
    }

    /// Map a point from a node's local space into its parent's space.
    pub fn local_to_parent(&self, id: NodeId, local: Point) -> Result<Point, TreeError> {
        Ok(self.try_node(id)?.local.transform.map_to_parent(local))
    }

    /// Map a point from a node's parent space into its local space.
    ///
    /// Uses the analytic inverse of the node's own transform only.
    pub fn parent_to_local(&self, id: NodeId, point: Point) -> Result<Point, TreeError> {
        let node = self.try_node(id)?;
        node.local.transform.map_from_parent(point).map_err(|err| {
            debug!("parent_to_local({id:?}): {err}");
            TreeError::from(err)
        })
    }

    /// Map a point from a node's local space into scene space.
    pub fn local_to_scene(&self, id: NodeId, local: Point) -> Result<Point, TreeError> {
        let world = self.world_transform(id).ok_or(TreeError::StaleNode(id))?;
        Ok(world * local)
    }

    /// Map a point from scene space into a node's local space.
    ///
    /// Fails with [`TransformError::Singular`](sprig_transform::TransformError::Singular)
    /// if any node on the chain has a zero scale.
    pub fn scene_to_local(&self, id: NodeId, point: Point) -> Result<Point, TreeError> {
        let world = self.world_transform(id).ok_or(TreeError::StaleNode(id))?;
        let inverse = invert(world).map_err(|err| {
            warn!("scene_to_local({id:?}): {err}");
            TreeError::from(err)
        })?;
        Ok(inverse * point)
    }

    /// Access a live node.
    pub fn get(&self, id: NodeId) -> Option<&Node<B>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    /// Returns true if `id` refers to a live node.
    ///
    /// A `NodeId` is considered live if its slot exists and its generation matches
    /// the current generation stored in that slot.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.free_list.len()
    }

    /// Returns `true` if the tree holds no live nodes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the parent of a node if live, or `None` for roots or stale ids.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Get the children of a node, or empty slice if node is stale.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(n) => &n.children,
            None => &[],
        }
    }

    /// Returns the scene a node is attached to.
    pub fn scene_of(&self, id: NodeId) -> Option<SceneId> {
        self.get(id)?.scene
    }

    /// Iterate the strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, B> {
        Ancestors {
            tree: self,
            next: self.parent_of(id),
        }
    }

    /// Returns `true` if `ancestor` is a strict ancestor of `id`.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// Iterate the subtree rooted at `root` in depth-first pre-order.
    ///
    /// Siblings are visited in insertion order. Yields nothing for a stale root.
    pub fn depth_first(&self, root: NodeId) -> DepthFirst<'_, B> {
        DepthFirst {
            tree: self,
            root,
            next: self.is_alive(root).then_some(root),
        }
    }

    /// First node of `root`'s subtree, in pre-order, named `name`.
    pub fn find_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.depth_first(root)
            .find(|&id| self.node(id).name() == Some(name))
    }

    // --- internals ---

    /// Access a node; panics if `id` is stale.
    pub(crate) fn node(&self, id: NodeId) -> &Node<B> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<B> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    pub(crate) fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<B>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    fn try_node(&self, id: NodeId) -> Result<&Node<B>, TreeError> {
        self.get(id).ok_or(TreeError::StaleNode(id))
    }

    fn try_node_mut(&mut self, id: NodeId) -> Result<&mut Node<B>, TreeError> {
        self.node_opt_mut(id).ok_or(TreeError::StaleNode(id))
    }

    /// Children of `id` in stacking order: ascending z, ties in insertion order.
    pub(crate) fn ordered_children(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut order: SmallVec<[NodeId; 8]> = self.node(id).children.iter().copied().collect();
        order.sort_by_key(|&c| self.node(c).local.z_index);
        order
    }

    /// Insert a detached node and make it the root of a new scene.
    ///
    /// Scene roots cannot be re-parented or destroyed.
    pub(crate) fn insert_scene_root(&mut self, local: LocalNode) -> (NodeId, SceneId) {
        let root = self.insert(None, local);
        self.node_mut(root).scene_root = true;
        let scene = SceneId(self.next_scene);
        self.next_scene = self.next_scene.wrapping_add(1);
        self.set_subtree_scene(root, Some(scene));
        debug!("bound {root:?} as root of {scene:?}");
        (root, scene)
    }

    fn update_transform(&mut self, id: NodeId, f: impl FnOnce(&mut LocalTransform)) {
        let Some(n) = self.node_opt_mut(id) else {
            return;
        };
        let before = n.local.transform;
        f(&mut n.local.transform);
        if n.local.transform != before {
            self.mark_subtree_dirty(id);
        }
    }

    /// Mark `id` and its descendants dirty.
    ///
    /// A dirty node never has a clean descendant (recomputing a node always
    /// recomputes its dirty ancestors first), so the walk stops at nodes that
    /// are already dirty.
    fn mark_subtree_dirty(&self, id: NodeId) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(next) = stack.pop() {
            let n = self.node(next);
            if n.dirty.replace(true) {
                continue;
            }
            stack.extend(n.children.iter().copied());
        }
    }

    fn set_subtree_scene(&mut self, id: NodeId, scene: Option<SceneId>) {
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(next) = stack.pop() {
            let n = self.node_mut(next);
            n.scene = scene;
            stack.extend(n.children.iter().copied());
        }
    }

    fn link_parent(&mut self, id: NodeId, parent: NodeId) {
        let parent_node = self.node_mut(parent);
        parent_node.children.push(id);
        self.node_mut(id).parent = Some(parent);
    }

    fn unlink_parent(&mut self, id: NodeId, parent: NodeId) {
        let p = self.node_mut(parent);
        p.children.retain(|c| *c != id);
        self.node_mut(id).parent = None;
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent_of(node)?;
        let siblings = &self.node(parent).children;
        let pos = siblings.iter().position(|&id| id == node)?;
        siblings.get(pos + 1).copied()
    }

    /// Next node after `current` in pre-order, without leaving `root`'s subtree.
    fn next_in_subtree(&self, root: NodeId, current: NodeId) -> Option<NodeId> {
        if let Some(&first_child) = self.node(current).children.first() {
            return Some(first_child);
        }

        let mut node = current;
        while node != root {
            if let Some(next_sibling) = self.next_sibling(node) {
                return Some(next_sibling);
            }
            node = self.parent_of(node)?;
        }
        None
    }
}

/// Iterator over the ancestors of a node. See [`Tree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a, B> {
    tree: &'a Tree<B>,
    next: Option<NodeId>,
}

impl<B> Iterator for Ancestors<'_, B> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent_of(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree. See [`Tree::depth_first`].
#[derive(Debug)]
pub struct DepthFirst<'a, B> {
    tree: &'a Tree<B>,
    root: NodeId,
    next: Option<NodeId>,
}

impl<B> Iterator for DepthFirst<'_, B> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_in_subtree(self.root, current);
        Some(current)
    }
}
