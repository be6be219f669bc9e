use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use super::describe;
use crate::dom::{Dom, DomError};

/// The live page document
#[derive(Debug, Clone)]
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new(document: Document) -> Self {
        Self { document }
    }
}

fn js_error(operation: &'static str) -> impl Fn(JsValue) -> DomError {
    move |e| DomError::new(operation, describe(&e))
}

impl Dom for WebDom {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn create_element(&self, tag: &str) -> Result<Element, DomError> {
        self.document
            .create_element(tag)
            .map_err(js_error("create_element"))
    }

    fn set_id(&self, node: &Element, id: &str) -> Result<(), DomError> {
        node.set_id(id);
        Ok(())
    }

    fn set_class_name(&self, node: &Element, class_name: &str) -> Result<(), DomError> {
        node.set_class_name(class_name);
        Ok(())
    }

    fn set_text(&self, node: &Element, text: &str) -> Result<(), DomError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<(), DomError> {
        node.dyn_ref::<HtmlElement>()
            .ok_or_else(|| DomError::new("set_style", "element has no inline style"))?
            .style()
            .set_property(property, value)
            .map_err(js_error("set_style"))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), DomError> {
        parent
            .append_child(child)
            .map(|_| ())
            .map_err(js_error("append_child"))
    }

    fn clear_children(&self, node: &Element) -> Result<(), DomError> {
        node.set_text_content(None);
        Ok(())
    }

    fn append_to_body(&self, node: &Element) -> Result<(), DomError> {
        self.document
            .body()
            .ok_or_else(|| DomError::new("append_to_body", "document has no body"))?
            .append_child(node)
            .map(|_| ())
            .map_err(js_error("append_to_body"))
    }

    fn remove(&self, node: &Element) -> Result<(), DomError> {
        node.remove();
        Ok(())
    }

    fn inject_stylesheet(&self, id: &str, css: &str) -> Result<bool, DomError> {
        if self.document.get_element_by_id(id).is_some() {
            return Ok(false);
        }
        let style = self.create_element("style")?;
        style.set_id(id);
        style.set_text_content(Some(css));

        // Pages without a <head> still get the rules
        let parent: Element = match self.document.head() {
            Some(head) => head.into(),
            None => self
                .document
                .body()
                .ok_or_else(|| DomError::new("inject_stylesheet", "document has no head or body"))?
                .into(),
        };
        parent
            .append_child(&style)
            .map_err(js_error("inject_stylesheet"))?;
        Ok(true)
    }
}
