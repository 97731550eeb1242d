// Copyright 2025 the Sprig Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use sprig_transform::TransformError;

use crate::NodeId;

/// Recoverable failure of a tree operation.
///
/// A failed call leaves the tree exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// The id refers to a destroyed node.
    #[error("node {0:?} is not alive")]
    StaleNode(NodeId),
    /// `child` is not in `parent`'s child list.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Node whose children were searched.
        parent: NodeId,
        /// Node that was not found.
        child: NodeId,
    },
    /// `child` is `parent` or one of its ancestors.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle {
        /// Requested new parent.
        parent: NodeId,
        /// Node that was to be attached.
        child: NodeId,
    },
    /// Scene roots are owned by their scene and cannot be re-parented.
    #[error("node {0:?} is a scene root")]
    SceneRoot(NodeId),
    /// A coordinate conversion hit a non-invertible transform.
    #[error(transparent)]
    Transform(#[from] TransformError),
}
