//! In-memory document
//!
//! Arena-backed stand-in for the browser document. Cleared and removed
//! subtrees are freed and their slots reused, so a long-running preview keeps
//! a constant node count.

use std::cell::RefCell;
use std::fmt::Write as _;
use std::rc::Rc;

use super::{Dom, DomError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct MemoryNode {
    tag: String,
    id: Option<String>,
    class_name: String,
    text: Option<String>,
    styles: Vec<(String, String)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

#[derive(Debug, Default)]
struct Arena {
    slots: Vec<Option<MemoryNode>>,
    free: Vec<usize>,
    body: Vec<NodeId>,
    stylesheets: Vec<(String, String)>,
    fail_create_in: Option<usize>,
    fail_next_remove: bool,
}

impl Arena {
    fn node(&self, id: NodeId, operation: &'static str) -> Result<&MemoryNode, DomError> {
        self.slots
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| DomError::new(operation, format!("node {} no longer exists", id.0)))
    }

    fn node_mut(&mut self, id: NodeId, operation: &'static str) -> Result<&mut MemoryNode, DomError> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| DomError::new(operation, format!("node {} no longer exists", id.0)))
    }

    fn alloc(&mut self, node: MemoryNode) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    fn free_subtree(&mut self, id: NodeId) {
        if let Some(node) = self.slots.get_mut(id.0).and_then(Option::take) {
            self.free.push(id.0);
            for child in node.children {
                self.free_subtree(child);
            }
        }
    }

    fn detach(&mut self, id: NodeId) {
        let parent = self.slots.get(id.0).and_then(Option::as_ref).and_then(|n| n.parent);
        match parent {
            Some(parent) => {
                if let Some(parent) = self.slots.get_mut(parent.0).and_then(Option::as_mut) {
                    parent.children.retain(|child| *child != id);
                }
            }
            None => self.body.retain(|child| *child != id),
        }
        if let Some(node) = self.slots.get_mut(id.0).and_then(Option::as_mut) {
            node.parent = None;
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.slots.get(id.0).and_then(Option::as_ref).and_then(|n| n.parent) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    fn find_by_id(&self, roots: &[NodeId], wanted: &str) -> Option<NodeId> {
        for &root in roots {
            let Some(node) = self.slots.get(root.0).and_then(Option::as_ref) else {
                continue;
            };
            if node.id.as_deref() == Some(wanted) {
                return Some(root);
            }
            if let Some(found) = self.find_by_id(&node.children, wanted) {
                return Some(found);
            }
        }
        None
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.slots.get(id.0).and_then(Option::as_ref) else {
            return;
        };
        let _ = write!(out, "<{}", node.tag);
        if let Some(node_id) = &node.id {
            let _ = write!(out, " id=\"{}\"", escape(node_id));
        }
        if !node.class_name.is_empty() {
            let _ = write!(out, " class=\"{}\"", escape(&node.class_name));
        }
        if !node.styles.is_empty() {
            let style = node
                .styles
                .iter()
                .map(|(property, value)| format!("{property}: {value}"))
                .collect::<Vec<_>>()
                .join("; ");
            let _ = write!(out, " style=\"{}\"", escape(&style));
        }
        out.push('>');
        if let Some(text) = &node.text {
            out.push_str(&escape(text));
        }
        for &child in &node.children {
            self.write_html(child, out);
        }
        let _ = write!(out, "</{}>", node.tag);
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Cheap to clone; clones share the same document
#[derive(Debug, Clone, Default)]
pub struct MemoryDom {
    arena: Rc<RefCell<Arena>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of allocated nodes, attached or not
    pub fn live_nodes(&self) -> usize {
        let arena = self.arena.borrow();
        arena.slots.len() - arena.free.len()
    }

    pub fn body_children(&self) -> Vec<NodeId> {
        self.arena.borrow().body.clone()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.arena
            .borrow()
            .node(node, "children")
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    pub fn class_name(&self, node: NodeId) -> Option<String> {
        self.arena.borrow().node(node, "class_name").ok().map(|n| n.class_name.clone())
    }

    pub fn text(&self, node: NodeId) -> Option<String> {
        self.arena.borrow().node(node, "text").ok().and_then(|n| n.text.clone())
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.arena.borrow().node(node, "style").ok().and_then(|n| {
            n.styles
                .iter()
                .find(|(name, _)| name == property)
                .map(|(_, value)| value.clone())
        })
    }

    pub fn stylesheet(&self, id: &str) -> Option<String> {
        self.arena
            .borrow()
            .stylesheets
            .iter()
            .find(|(sheet_id, _)| sheet_id == id)
            .map(|(_, css)| css.clone())
    }

    /// Serialize one subtree
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.arena.borrow().write_html(node, &mut out);
        out
    }

    /// Serialize everything attached to the body
    pub fn body_html(&self) -> String {
        let arena = self.arena.borrow();
        let mut out = String::new();
        for &child in &arena.body {
            arena.write_html(child, &mut out);
        }
        out
    }

    /// Make the next `create_element` call fail
    pub fn fail_next_create(&self) {
        self.fail_create_after(0);
    }

    /// Let `successes` more `create_element` calls through, then fail one
    pub fn fail_create_after(&self, successes: usize) {
        self.arena.borrow_mut().fail_create_in = Some(successes);
    }

    /// Make the next `remove` call fail
    pub fn fail_next_remove(&self) {
        self.arena.borrow_mut().fail_next_remove = true;
    }
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let arena = self.arena.borrow();
        arena.find_by_id(&arena.body, id)
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, DomError> {
        let mut arena = self.arena.borrow_mut();
        match arena.fail_create_in {
            Some(0) => {
                arena.fail_create_in = None;
                return Err(DomError::new("create_element", "injected failure"));
            }
            Some(remaining) => arena.fail_create_in = Some(remaining - 1),
            None => {}
        }
        Ok(arena.alloc(MemoryNode {
            tag: tag.to_string(),
            ..Default::default()
        }))
    }

    fn set_id(&self, node: &NodeId, id: &str) -> Result<(), DomError> {
        self.arena.borrow_mut().node_mut(*node, "set_id")?.id = Some(id.to_string());
        Ok(())
    }

    fn set_class_name(&self, node: &NodeId, class_name: &str) -> Result<(), DomError> {
        self.arena.borrow_mut().node_mut(*node, "set_class_name")?.class_name = class_name.to_string();
        Ok(())
    }

    fn set_text(&self, node: &NodeId, text: &str) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        let children = std::mem::take(&mut arena.node_mut(*node, "set_text")?.children);
        for child in children {
            arena.free_subtree(child);
        }
        arena.node_mut(*node, "set_text")?.text = Some(text.to_string());
        Ok(())
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        let styles = &mut arena.node_mut(*node, "set_style")?.styles;
        match styles.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => styles.push((property.to_string(), value.to_string())),
        }
        Ok(())
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        arena.node(*parent, "append_child")?;
        arena.node(*child, "append_child")?;
        if arena.is_ancestor(*child, *parent) {
            return Err(DomError::new("append_child", "cannot append a node to its own subtree"));
        }
        arena.detach(*child);
        arena.node_mut(*child, "append_child")?.parent = Some(*parent);
        arena.node_mut(*parent, "append_child")?.children.push(*child);
        Ok(())
    }

    fn clear_children(&self, node: &NodeId) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        let target = arena.node_mut(*node, "clear_children")?;
        target.text = None;
        let children = std::mem::take(&mut target.children);
        for child in children {
            arena.free_subtree(child);
        }
        Ok(())
    }

    fn append_to_body(&self, node: &NodeId) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        arena.node(*node, "append_to_body")?;
        arena.detach(*node);
        arena.body.push(*node);
        Ok(())
    }

    fn remove(&self, node: &NodeId) -> Result<(), DomError> {
        let mut arena = self.arena.borrow_mut();
        if std::mem::take(&mut arena.fail_next_remove) {
            return Err(DomError::new("remove", "injected failure"));
        }
        arena.node(*node, "remove")?;
        arena.detach(*node);
        arena.free_subtree(*node);
        Ok(())
    }

    fn inject_stylesheet(&self, id: &str, css: &str) -> Result<bool, DomError> {
        let mut arena = self.arena.borrow_mut();
        if arena.stylesheets.iter().any(|(sheet_id, _)| sheet_id == id) {
            return Ok(false);
        }
        arena.stylesheets.push((id.to_string(), css.to_string()));
        Ok(true)
    }
}
