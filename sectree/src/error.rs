use std::io;

use thiserror::Error;

/// Errors produced while building or toggling a section tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("element id {id} appears more than once")]
    DuplicateId { id: String },

    #[error("element {id} references missing parent {parent}")]
    DanglingParent { id: String, parent: String },

    #[error("{count} element(s) are not connected to the root: {ids}")]
    Unreachable { count: usize, ids: String },

    #[error("node {id} not found while walking the tree")]
    NodeNotFound { id: String },

    #[error("section index {index} out of range for {len} section(s)")]
    SectionOutOfRange { index: usize, len: usize },

    #[error("tree engine worker is not running")]
    EngineClosed,

    #[error("failed to spawn tree engine worker: {0}")]
    Spawn(#[source] io::Error),
}

pub type Result<T> = std::result::Result<T, TreeError>;

/// Render an element id for error messages.
pub(crate) fn display_id<T: std::fmt::Debug>(id: &T) -> String {
    format!("{id:?}")
}
