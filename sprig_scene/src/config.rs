// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene configuration.

/// How a screen-space query point is sampled before hit testing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitConvention {
    /// Use the pointer position as reported.
    #[default]
    Exact,
    /// Shift the pointer by `(-0.5, -0.5)` so integer pointer positions sample
    /// pixel centers.
    PixelCenter,
}

impl HitConvention {
    /// Offset applied to a screen-space query point.
    pub const fn offset(self) -> kurbo::Vec2 {
        match self {
            Self::Exact => kurbo::Vec2::ZERO,
            Self::PixelCenter => kurbo::Vec2::new(-0.5, -0.5),
        }
    }
}

/// Whether a node or its descendants are tested first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitOrder {
    /// A node whose box contains the point claims it before its children are
    /// consulted; children are only searched when the point misses the box.
    #[default]
    ContainerFirst,
    /// Descendants are searched before the node itself, so nested nodes win
    /// over the containers they sit in.
    DeepestFirst,
}

/// Tunables for a [`Scene`](crate::Scene).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SceneConfig {
    /// Pointer sampling convention.
    pub hit_convention: HitConvention,
    /// Container vs. descendant precedence.
    pub hit_order: HitOrder,
}
