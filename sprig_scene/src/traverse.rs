// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame traversals: `act` (update) and `draw` (render).
//!
//! Both walk a subtree depth-first in pre-order, visiting siblings in
//! stacking order (ascending z, ties in insertion order). A node's child list
//! is read when the node is visited; nodes destroyed before they are reached
//! are skipped.

use alloc::{vec, vec::Vec};

use log::trace;

use crate::{ActCx, Batch, DrawCx, NodeId, Tree};

enum Visit {
    Enter(NodeId),
    Exit,
}

impl<B: 'static> Tree<B> {
    /// Run every behavior in `root`'s subtree with the elapsed time `delta`.
    ///
    /// Visibility does not gate `act`: hidden nodes keep updating.
    pub fn act(&mut self, root: NodeId, delta: f64) {
        let mut visited = 0_usize;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !self.is_alive(id) {
                continue;
            }
            visited += 1;
            if let Some(mut behavior) = self.lend_behavior(id) {
                behavior.act(&mut ActCx { tree: self, id }, delta);
                if !self.restore_behavior(id, behavior) {
                    trace!("behavior of {id:?} was replaced or removed while acting");
                }
            }
            if self.is_alive(id) {
                stack.extend(self.ordered_children(id).into_iter().rev());
            }
        }
        trace!("act {root:?}: {visited} nodes, delta {delta}");
    }

    /// Draw `root`'s subtree into `batch`.
    ///
    /// An invisible node is skipped together with its whole subtree. Each
    /// visible node's local transform is pushed on the batch before its
    /// behavior draws and popped after its last descendant, so behaviors draw
    /// in local coordinates.
    pub fn draw(&self, root: NodeId, batch: &mut B)
    where
        B: Batch,
    {
        let mut visited = 0_usize;
        let mut stack: Vec<Visit> = vec![Visit::Enter(root)];
        while let Some(visit) = stack.pop() {
            let id = match visit {
                Visit::Exit => {
                    batch.pop_transform();
                    continue;
                }
                Visit::Enter(id) => id,
            };
            let Some(node) = self.get(id) else {
                continue;
            };
            if !node.is_visible() {
                continue;
            }
            visited += 1;
            batch.push_transform(node.local_transform().to_affine());
            stack.push(Visit::Exit);
            if let Some(behavior) = node.behavior() {
                behavior.draw(&DrawCx { tree: self, id }, batch);
            }
            stack.extend(
                self.ordered_children(id)
                    .into_iter()
                    .rev()
                    .map(Visit::Enter),
            );
        }
        trace!("draw {root:?}: {visited} nodes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalNode;
    use crate::test_support::{Event, EventLog, Op, RecordingBatch, Recorder, event_log};
    use alloc::rc::Rc;
    use approx::assert_abs_diff_eq;
    use kurbo::{Affine, Point, Rect, Size, Vec2};

    type TestTree = Tree<RecordingBatch>;

    #[test]
    fn act_and_draw_are_preorder() {
        let log = event_log();
        let mut tree = TestTree::new();
        let r = tree.insert(None, LocalNode::default());
        let a = tree.insert(Some(r), LocalNode::default());
        let a1 = tree.insert(Some(a), LocalNode::default());
        let b = tree.insert(Some(r), LocalNode::default());
        for (id, name) in [(r, "r"), (a, "a"), (a1, "a1"), (b, "b")] {
            tree.set_behavior(id, Recorder::new(name, &log)).unwrap();
        }

        tree.act(r, 0.5);
        tree.draw(r, &mut RecordingBatch::default());

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Act("r", 0.5),
                Event::Act("a", 0.5),
                Event::Act("a1", 0.5),
                Event::Act("b", 0.5),
                Event::Draw("r"),
                Event::Draw("a"),
                Event::Draw("a1"),
                Event::Draw("b"),
            ]
        );
    }

    #[test]
    fn hidden_subtree_is_not_drawn_but_still_acts() {
        let log = event_log();
        let mut tree = TestTree::new();
        let r = tree.insert(None, LocalNode::default());
        let n = tree.insert(Some(r), LocalNode::default());
        let child = tree.insert(Some(n), LocalNode::default());
        let sibling = tree.insert(Some(r), LocalNode::default());
        tree.set_behavior(n, Recorder::new("n", &log)).unwrap();
        tree.set_behavior(child, Recorder::new("child", &log)).unwrap();
        tree.set_behavior(sibling, Recorder::new("sibling", &log)).unwrap();
        tree.set_visible(n, false);

        tree.draw(r, &mut RecordingBatch::default());
        assert_eq!(*log.borrow(), vec![Event::Draw("sibling")]);

        log.borrow_mut().clear();
        tree.act(r, 1.0 / 60.0);
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Act("n", 1.0 / 60.0),
                Event::Act("child", 1.0 / 60.0),
                Event::Act("sibling", 1.0 / 60.0),
            ]
        );
    }

    #[test]
    fn visible_child_of_hidden_parent_is_not_drawn() {
        let log = event_log();
        let mut tree = TestTree::new();
        let r = tree.insert(None, LocalNode::default());
        let n = tree.insert(Some(r), LocalNode::default());
        tree.set_behavior(r, Recorder::new("r", &log)).unwrap();
        tree.set_behavior(n, Recorder::new("n", &log)).unwrap();
        tree.set_visible(r, false);
        tree.draw(r, &mut RecordingBatch::default());
        assert!(log.borrow().is_empty(), "got {:?}", log.borrow());
    }

    #[test]
    fn z_index_orders_siblings() {
        let log = event_log();
        let mut tree = TestTree::new();
        let r = tree.insert(None, LocalNode::default());
        let low = tree.insert(Some(r), LocalNode::default());
        let high = tree.insert(Some(r), LocalNode::default());
        let mid = tree.insert(Some(r), LocalNode::default());
        tree.set_behavior(low, Recorder::new("low", &log)).unwrap();
        tree.set_behavior(high, Recorder::new("high", &log)).unwrap();
        tree.set_behavior(mid, Recorder::new("mid", &log)).unwrap();
        tree.set_z_index(high, 5);

        tree.draw(r, &mut RecordingBatch::default());
        assert_eq!(
            *log.borrow(),
            vec![Event::Draw("low"), Event::Draw("mid"), Event::Draw("high")]
        );
        // Insertion order is untouched.
        assert_eq!(tree.children_of(r), &[low, high, mid]);
    }

    #[test]
    fn draw_composes_local_transforms_on_the_batch() {
        let log = event_log();
        let mut tree = TestTree::new();
        let r = tree.insert(None, LocalNode::at(Vec2::new(100.0, 0.0), Size::ZERO));
        let n = tree.insert(
            Some(r),
            LocalNode::at(Vec2::new(10.0, 20.0), Size::new(4.0, 2.0)),
        );
        tree.set_scale(n, Vec2::new(2.0, 2.0));
        tree.set_behavior(n, Recorder::new("n", &log)).unwrap();

        let mut batch = RecordingBatch::default();
        tree.draw(r, &mut batch);

        let fills: Vec<_> = batch
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Fill { rect, transform } => Some((*rect, *transform)),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 1);
        let (rect, transform) = fills[0];
        assert_eq!(rect, Rect::new(0.0, 0.0, 4.0, 2.0));
        let world = tree.world_transform(n).unwrap();
        for (a, e) in transform.as_coeffs().iter().zip(world.as_coeffs()) {
            assert_abs_diff_eq!(*a, e, epsilon = 1e-9);
        }
        let far_corner = transform * Point::new(4.0, 2.0);
        assert_abs_diff_eq!(far_corner.x, 118.0, epsilon = 1e-9);
        assert_abs_diff_eq!(far_corner.y, 24.0, epsilon = 1e-9);
        // Every push was matched by a pop.
        assert_eq!(batch.depth(), 0);
        assert_eq!(batch.current, Affine::IDENTITY);
    }

    #[test]
    fn act_can_move_its_node() {
        struct Drift;
        impl crate::Behavior<RecordingBatch> for Drift {
            fn act(&mut self, cx: &mut ActCx<'_, RecordingBatch>, delta: f64) {
                assert!(!cx.node().has_behavior(), "behavior is lent out while acting");
                cx.translate_by(Vec2::new(10.0 * delta, 0.0));
            }
        }

        let mut tree = TestTree::new();
        let n = tree.insert(None, LocalNode::default());
        tree.set_behavior(n, Drift).unwrap();
        tree.world_transform(n);
        tree.act(n, 0.5);
        tree.act(n, 0.5);
        assert_eq!(tree.get(n).unwrap().position(), Vec2::new(10.0, 0.0));
        assert!(tree.get(n).unwrap().has_behavior(), "behavior is restored");
        assert_eq!(
            tree.world_transform(n),
            Some(Affine::translate(Vec2::new(10.0, 0.0)))
        );
    }

    #[test]
    fn taken_behavior_no_longer_runs() {
        let log = event_log();
        let mut tree = TestTree::new();
        let n = tree.insert(None, LocalNode::default());
        tree.set_behavior(n, Recorder::new("n", &log)).unwrap();

        assert!(tree.take_behavior(n).is_some());
        assert!(!tree.get(n).unwrap().has_behavior());
        assert!(tree.take_behavior(n).is_none());

        tree.act(n, 1.0);
        tree.draw(n, &mut RecordingBatch::default());
        assert!(log.borrow().is_empty(), "got {:?}", log.borrow());
    }

    #[test]
    fn behavior_installed_during_act_replaces_the_acting_one() {
        struct Handoff {
            log: EventLog,
        }
        impl crate::Behavior<RecordingBatch> for Handoff {
            fn act(&mut self, cx: &mut ActCx<'_, RecordingBatch>, delta: f64) {
                self.log.borrow_mut().push(Event::Act("handoff", delta));
                let id = cx.id();
                let next = Recorder::new("next", &self.log);
                cx.tree_mut().set_behavior(id, next).unwrap();
            }
        }

        let log = event_log();
        let mut tree = TestTree::new();
        let n = tree.insert(None, LocalNode::default());
        tree.set_behavior(n, Handoff { log: Rc::clone(&log) }).unwrap();

        tree.act(n, 1.0);
        assert!(tree.get(n).unwrap().has_behavior());
        tree.act(n, 2.0);
        assert_eq!(
            *log.borrow(),
            vec![Event::Act("handoff", 1.0), Event::Act("next", 2.0)]
        );
    }

    #[test]
    fn behavior_can_remove_itself_during_act() {
        struct OneShot {
            log: EventLog,
            through_tree: bool,
        }
        impl crate::Behavior<RecordingBatch> for OneShot {
            fn act(&mut self, cx: &mut ActCx<'_, RecordingBatch>, delta: f64) {
                self.log.borrow_mut().push(Event::Act("once", delta));
                if self.through_tree {
                    let id = cx.id();
                    assert!(
                        cx.tree_mut().take_behavior(id).is_none(),
                        "acting behavior is lent out"
                    );
                } else {
                    cx.remove_behavior();
                }
            }
        }

        for through_tree in [false, true] {
            let log = event_log();
            let mut tree = TestTree::new();
            let n = tree.insert(None, LocalNode::default());
            let behavior = OneShot {
                log: Rc::clone(&log),
                through_tree,
            };
            tree.set_behavior(n, behavior).unwrap();

            tree.act(n, 1.0);
            assert!(!tree.get(n).unwrap().has_behavior(), "stays detached");
            tree.act(n, 1.0);
            assert_eq!(*log.borrow(), vec![Event::Act("once", 1.0)]);
        }
    }

    #[test]
    fn act_skips_nodes_destroyed_mid_frame() {
        struct Reaper {
            victim: NodeId,
        }
        impl crate::Behavior<RecordingBatch> for Reaper {
            fn act(&mut self, cx: &mut ActCx<'_, RecordingBatch>, _delta: f64) {
                let _ = cx.tree_mut().destroy(self.victim);
            }
        }

        let log = event_log();
        let mut tree = TestTree::new();
        let r = tree.insert(None, LocalNode::default());
        let reaper = tree.insert(Some(r), LocalNode::default());
        let victim = tree.insert(Some(r), LocalNode::default());
        tree.set_behavior(victim, Recorder::new("victim", &log)).unwrap();
        tree.set_behavior(reaper, Reaper { victim }).unwrap();

        tree.act(r, 1.0);
        assert!(log.borrow().is_empty());
        assert!(!tree.is_alive(victim));
    }

    #[test]
    fn stale_root_is_a_no_op() {
        let mut tree = TestTree::new();
        let n = tree.insert(None, LocalNode::default());
        tree.destroy(n).unwrap();
        let mut batch = RecordingBatch::default();
        tree.act(n, 1.0);
        tree.draw(n, &mut batch);
        assert!(batch.ops.is_empty());
    }
}
