//! Declarative description of a DOM subtree
//!
//! The panel logic only produces `VNode` trees; `panel::mount_tree` applies
//! them to a real (or in-memory) document.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VNode {
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub styles: Vec<(&'static str, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<VNode>,
}

impl VNode {
    pub fn element(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            text: None,
            styles: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn style(mut self, property: &'static str, value: impl Into<String>) -> Self {
        self.styles.push((property, value.into()));
        self
    }

    pub fn child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    /// Space-separated class attribute
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    /// Value of an inline style property, if set
    pub fn style_value(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Depth-first search for the first node carrying `class`
    pub fn find_by_class(&self, class: &str) -> Option<&VNode> {
        if self.has_class(class) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_class(class))
    }

    /// Total node count of this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(VNode::node_count).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_and_queries() {
        let node = VNode::element("div")
            .class("outer")
            .class("wide")
            .child(VNode::element("span").class("inner").text("hi"))
            .child(VNode::element("div").style("width", "50%"));

        assert_eq!(node.class_name(), "outer wide");
        assert_eq!(node.node_count(), 3);
        assert_eq!(node.find_by_class("inner").and_then(|n| n.text.as_deref()), Some("hi"));
        assert_eq!(node.children[1].style_value("width"), Some("50%"));
        assert!(node.find_by_class("missing").is_none());
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let node = VNode::element("span").text("x");
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            r#"{"tag":"span","text":"x"}"#
        );
    }
}
