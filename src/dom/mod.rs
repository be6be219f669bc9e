//! Document abstraction the renderer mutates
//!
//! `WebDom` (browser build) and `MemoryDom` (tests, preview tool) implement
//! the same small set of operations, which is all the renderer needs.

mod memory;

pub use memory::{MemoryDom, NodeId};

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("DOM operation '{operation}' failed: {message}")]
pub struct DomError {
    pub operation: &'static str,
    pub message: String,
}

impl DomError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

pub trait Dom {
    type Node: Clone + PartialEq + fmt::Debug;

    /// Attached element with the given id
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// New detached element
    fn create_element(&self, tag: &str) -> Result<Self::Node, DomError>;

    fn set_id(&self, node: &Self::Node, id: &str) -> Result<(), DomError>;

    fn set_class_name(&self, node: &Self::Node, class_name: &str) -> Result<(), DomError>;

    /// Replace all content of `node` with a text node
    fn set_text(&self, node: &Self::Node, text: &str) -> Result<(), DomError>;

    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<(), DomError>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), DomError>;

    /// Drop every child of `node`
    fn clear_children(&self, node: &Self::Node) -> Result<(), DomError>;

    fn append_to_body(&self, node: &Self::Node) -> Result<(), DomError>;

    /// Detach `node` from the document
    fn remove(&self, node: &Self::Node) -> Result<(), DomError>;

    /// Add a stylesheet under `id` unless one is already present.
    /// Returns true if a new stylesheet was added.
    fn inject_stylesheet(&self, id: &str, css: &str) -> Result<bool, DomError>;
}
