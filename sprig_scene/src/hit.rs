// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point hit testing over a subtree.

use kurbo::Point;
use log::trace;

use crate::{HitOrder, NodeId, Tree};

impl<B> Tree<B> {
    /// Find the topmost descendant of `root` whose box contains `point`.
    ///
    /// `point` is in `root`'s local space; `root` itself is never returned.
    /// Children are tested in reverse stacking order, so the last drawn wins.
    /// Invisible nodes are skipped together with their subtree, and so are
    /// nodes whose transform cannot be inverted. Non-pickable nodes are never
    /// returned but their children still are.
    ///
    /// With [`HitOrder::ContainerFirst`] a child whose box contains the point
    /// claims it outright; its children are only searched when the point
    /// misses the child's box. [`HitOrder::DeepestFirst`] searches a child's
    /// descendants before the child.
    ///
    /// Returns `None` for a stale `root` or when nothing claims the point.
    pub fn hit(&self, root: NodeId, point: Point, order: HitOrder) -> Option<NodeId> {
        /// Test `parent`'s children against `point`, given in `parent`'s local space.
        fn hit_children<B>(
            tree: &Tree<B>,
            parent: NodeId,
            point: Point,
            order: HitOrder,
        ) -> Option<NodeId> {
            for child in tree.ordered_children(parent).into_iter().rev() {
                let node = tree.node(child);
                if !node.is_visible() {
                    continue;
                }
                let local = match node.local_transform().map_from_parent(point) {
                    Ok(local) => local,
                    Err(err) => {
                        trace!("hit skips {child:?}: {err}");
                        continue;
                    }
                };
                let claims = node.is_pickable() && node.contains_local(local);
                match order {
                    HitOrder::ContainerFirst => {
                        if claims {
                            return Some(child);
                        }
                        if let Some(hit) = hit_children(tree, child, local, order) {
                            return Some(hit);
                        }
                    }
                    HitOrder::DeepestFirst => {
                        if let Some(hit) = hit_children(tree, child, local, order) {
                            return Some(hit);
                        }
                        if claims {
                            return Some(child);
                        }
                    }
                }
            }
            None
        }

        if !self.is_alive(root) {
            return None;
        }
        hit_children(self, root, point, order)
    }
}
