// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording doubles for the batch, viewport and behavior seams.

use alloc::{rc::Rc, vec, vec::Vec};
use core::cell::RefCell;

use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::{ActCx, Batch, Behavior, DrawCx, Viewport};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Op {
    Begin,
    End,
    Projection(Affine),
    Fill { rect: Rect, transform: Affine },
}

/// Batch that composes pushed transforms and logs what it is asked to draw.
#[derive(Debug)]
pub(crate) struct RecordingBatch {
    pub(crate) current: Affine,
    stack: Vec<Affine>,
    pub(crate) ops: Vec<Op>,
}

impl Default for RecordingBatch {
    fn default() -> Self {
        Self {
            current: Affine::IDENTITY,
            stack: Vec::new(),
            ops: Vec::new(),
        }
    }
}

impl RecordingBatch {
    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl Batch for RecordingBatch {
    type Region = str;
    type Color = u32;

    fn begin(&mut self) {
        self.ops.push(Op::Begin);
    }

    fn end(&mut self) {
        self.ops.push(Op::End);
    }

    fn set_projection(&mut self, projection: Affine) {
        self.ops.push(Op::Projection(projection));
    }

    fn push_transform(&mut self, transform: Affine) {
        self.stack.push(self.current);
        self.current *= transform;
    }

    fn pop_transform(&mut self) {
        self.current = self.stack.pop().expect("unbalanced pop_transform");
    }

    fn draw_region(&mut self, _region: &str, rect: Rect) {
        self.fill_rect(rect, 0);
    }

    fn fill_rect(&mut self, rect: Rect, _color: u32) {
        self.ops.push(Op::Fill {
            rect,
            transform: self.current,
        });
    }

    fn line(&mut self, _from: Point, _to: Point, _color: u32, _stroke: f64) {}
}

/// Viewport whose camera sits at `offset` in world space with unit zoom.
#[derive(Debug, Default)]
pub(crate) struct OffsetViewport {
    pub(crate) offset: Vec2,
    pub(crate) screen: (u32, u32),
    pub(crate) applied: usize,
}

impl Viewport for OffsetViewport {
    fn update(&mut self, screen_width: u32, screen_height: u32) {
        self.screen = (screen_width, screen_height);
    }

    fn apply(&mut self) {
        self.applied += 1;
    }

    fn projection(&self) -> Affine {
        Affine::translate(-self.offset)
    }

    fn screen_to_world(&self, screen: Point) -> Point {
        screen + self.offset
    }

    fn world_size(&self) -> Size {
        Size::new(f64::from(self.screen.0), f64::from(self.screen.1))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Event {
    Act(&'static str, f64),
    Draw(&'static str),
}

pub(crate) type EventLog = Rc<RefCell<Vec<Event>>>;

pub(crate) fn event_log() -> EventLog {
    Rc::new(RefCell::new(vec![]))
}

/// Behavior that records its calls and fills its node's box when drawn.
pub(crate) struct Recorder {
    name: &'static str,
    log: EventLog,
}

impl Recorder {
    pub(crate) fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl Behavior<RecordingBatch> for Recorder {
    fn act(&mut self, _cx: &mut ActCx<'_, RecordingBatch>, delta: f64) {
        self.log.borrow_mut().push(Event::Act(self.name, delta));
    }

    fn draw(&self, cx: &DrawCx<'_, RecordingBatch>, batch: &mut RecordingBatch) {
        self.log.borrow_mut().push(Event::Draw(self.name));
        batch.fill_rect(cx.node().local_bounds(), 0xff_ff_ff_ff);
    }
}
