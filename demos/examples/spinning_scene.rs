// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A few frames of a small scene, drawn into a logging batch.
//!
//! This example shows how to:
//! - implement [`Batch`] and [`Viewport`] for a host,
//! - attach [`Behavior`]s that move their nodes every frame,
//! - resolve pointer positions with [`Scene::hit`].
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p sprig_demos --example spinning_scene`

use kurbo::{Affine, Point, Rect, Size, Vec2};
use log::{LevelFilter, info};
use sprig_scene::{
    ActCx, Batch, Behavior, DrawCx, HitOrder, LocalNode, Scene, SceneConfig, Viewport,
};

/// Batch that composes transforms and logs every primitive in world space.
#[derive(Debug)]
struct LogBatch {
    current: Affine,
    stack: Vec<Affine>,
    primitives: usize,
}

impl LogBatch {
    fn new() -> Self {
        Self {
            current: Affine::IDENTITY,
            stack: Vec::new(),
            primitives: 0,
        }
    }
}

impl Batch for LogBatch {
    type Region = str;
    type Color = [u8; 4];

    fn begin(&mut self) {
        self.primitives = 0;
    }

    fn end(&mut self) {
        info!("frame flushed: {} primitives", self.primitives);
    }

    fn set_projection(&mut self, projection: Affine) {
        info!("projection {:?}", projection.as_coeffs());
    }

    fn push_transform(&mut self, transform: Affine) {
        self.stack.push(self.current);
        self.current *= transform;
    }

    fn pop_transform(&mut self) {
        if let Some(previous) = self.stack.pop() {
            self.current = previous;
        }
    }

    fn draw_region(&mut self, region: &str, rect: Rect) {
        self.primitives += 1;
        let bounds = self.current.transform_rect_bbox(rect);
        info!("  region {region:?} over {bounds:?}");
    }

    fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        self.primitives += 1;
        let bounds = self.current.transform_rect_bbox(rect);
        info!("  fill {color:?} over {bounds:?}");
    }

    fn line(&mut self, from: Point, to: Point, color: [u8; 4], stroke: f64) {
        self.primitives += 1;
        let (from, to) = (self.current * from, self.current * to);
        info!("  line {color:?} {from:?} -> {to:?} ({stroke}px)");
    }
}

/// Camera centered on `center` with a uniform zoom.
#[derive(Debug)]
struct Camera {
    center: Point,
    zoom: f64,
    screen: Size,
}

impl Camera {
    fn screen_to_world_affine(&self) -> Affine {
        Affine::translate(self.center.to_vec2())
            * Affine::scale(1.0 / self.zoom)
            * Affine::translate(-self.screen.to_vec2() / 2.0)
    }
}

impl Viewport for Camera {
    fn update(&mut self, screen_width: u32, screen_height: u32) {
        self.screen = Size::new(f64::from(screen_width), f64::from(screen_height));
    }

    fn projection(&self) -> Affine {
        self.screen_to_world_affine().inverse()
    }

    fn screen_to_world(&self, screen: Point) -> Point {
        self.screen_to_world_affine() * screen
    }

    fn world_size(&self) -> Size {
        self.screen / self.zoom
    }
}

/// Turns its node at a fixed rate and draws its box.
struct Spinner {
    degrees_per_second: f64,
    color: [u8; 4],
}

impl Behavior<LogBatch> for Spinner {
    fn act(&mut self, cx: &mut ActCx<'_, LogBatch>, delta: f64) {
        cx.rotate_by(self.degrees_per_second * delta);
    }

    fn draw(&self, cx: &DrawCx<'_, LogBatch>, batch: &mut LogBatch) {
        batch.fill_rect(cx.node().local_bounds(), self.color);
    }
}

/// Moves back and forth along the x axis.
struct Patrol {
    speed: f64,
    span: f64,
}

impl Behavior<LogBatch> for Patrol {
    fn act(&mut self, cx: &mut ActCx<'_, LogBatch>, delta: f64) {
        let x = cx.node().position().x + self.speed * delta;
        if !(0.0..=self.span).contains(&x) {
            self.speed = -self.speed;
        }
        cx.translate_by(Vec2::new(self.speed * delta, 0.0));
    }

    fn draw(&self, cx: &DrawCx<'_, LogBatch>, batch: &mut LogBatch) {
        batch.draw_region("ship", cx.node().local_bounds());
        let size = cx.node().size();
        batch.line(
            Point::new(size.width / 2.0, 0.0),
            Point::new(size.width / 2.0, -8.0),
            [255, 255, 0, 255],
            1.0,
        );
    }
}

fn main() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let camera = Camera {
        center: Point::new(100.0, 100.0),
        zoom: 2.0,
        screen: Size::new(400.0, 400.0),
    };
    let mut scene = Scene::with_config(
        camera,
        LogBatch::new(),
        SceneConfig {
            hit_order: HitOrder::DeepestFirst,
            ..SceneConfig::default()
        },
    );

    let base = scene.spawn(
        LocalNode::at(Vec2::new(50.0, 50.0), Size::new(100.0, 100.0)).named("base"),
    );
    let tree = scene.tree_mut();
    tree.set_origin(base, Vec2::new(50.0, 50.0));
    tree.set_behavior(
        base,
        Spinner {
            degrees_per_second: 90.0,
            color: [40, 40, 200, 255],
        },
    )
    .expect("base was just spawned");
    let ship = tree.insert(
        Some(base),
        LocalNode::at(Vec2::new(10.0, 40.0), Size::new(20.0, 20.0)).named("ship"),
    );
    tree.set_behavior(ship, Patrol { speed: 30.0, span: 80.0 })
        .expect("ship was just inserted");

    scene.resize(400, 400);
    for frame in 0..4 {
        info!("frame {frame}");
        scene.act(0.25);
        scene.draw();
    }

    for screen in [Point::new(200.0, 200.0), Point::new(5.0, 5.0)] {
        let name = scene
            .hit(screen)
            .and_then(|id| scene.tree().get(id))
            .and_then(|node| node.name());
        let world = scene.screen_to_scene(screen);
        info!("hit at screen {screen:?} (scene {world:?}): {name:?}");
    }

    if let Some(ship) = scene.tree().find_by_name(scene.root(), "ship") {
        match scene.tree().local_to_scene(ship, Point::ZERO) {
            Ok(p) => info!("ship origin in scene space: {p:?}"),
            Err(err) => info!("ship has no scene position: {err}"),
        }
    }
}
