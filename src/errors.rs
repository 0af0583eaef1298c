use std::path::PathBuf;
use thiserror::Error;

use crate::node::NodeId;

#[derive(Error, Debug)]
pub enum TreeError {
    #[error("{context}: index {index} out of range ({available} available)")]
    IndexOutOfRange {
        context: &'static str,
        index: usize,
        available: usize,
    },

    #[error("path step {step}: {reason}")]
    PathOutOfRange { step: usize, reason: &'static str },

    #[error("no node at depth {depth} below {anchor:?}")]
    DepthOutOfRange { anchor: NodeId, depth: usize },

    #[error("fixed-depth traversal exhausted after {last:?}")]
    FixedDepthExhausted { last: Option<NodeId> },

    #[error("node {node:?} is not reachable from {anchor:?}")]
    Unreachable { node: NodeId, anchor: NodeId },

    #[error("invalid path syntax: {0}")]
    InvalidPath(String),

    #[error("tree inconsistency at {node:?}: {reason}")]
    Inconsistent { node: NodeId, reason: &'static str },

    #[error("outline line {line}: {reason}")]
    Outline { line: usize, reason: String },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TreeError {
    /// True for the recoverable range family: navigation stepped past the
    /// edge of the addressable structure.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            TreeError::IndexOutOfRange { .. }
                | TreeError::PathOutOfRange { .. }
                | TreeError::DepthOutOfRange { .. }
                | TreeError::FixedDepthExhausted { .. }
                | TreeError::Unreachable { .. }
        )
    }
}

pub type TreeResult<T> = Result<T, TreeError>;
