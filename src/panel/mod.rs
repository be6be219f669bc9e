//! Panel renderer - owns the overlay root and rebuilds its content on every render

pub mod tree;

pub use tree::{build_gauge_tree, build_panel_tree, fill_percent, PanelTree};

use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::PanelConfig;
use crate::constants::{css, panel};
use crate::dom::{Dom, DomError};
use crate::snapshot::StatSnapshot;
use crate::vnode::VNode;

/// The live overlay root
#[derive(Debug, Clone, PartialEq)]
pub struct PanelHandle<N> {
    root: N,
}

impl<N> PanelHandle<N> {
    pub fn root(&self) -> &N {
        &self.root
    }
}

/// Outcome of one render: gauges drawn and visible gauges without data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct PanelRenderer<D: Dom> {
    dom: D,
    config: Rc<PanelConfig>,
    renders: u64,
}

impl<D: Dom> PanelRenderer<D> {
    pub fn new(dom: D, config: Rc<PanelConfig>) -> Self {
        Self {
            dom,
            config,
            renders: 0,
        }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    /// Number of successful renders so far
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Return the attached panel root, creating and attaching it if absent
    pub fn ensure_panel(&self) -> Result<PanelHandle<D::Node>, DomError> {
        if let Some(root) = self.dom.element_by_id(panel::ROOT_ID) {
            return Ok(PanelHandle { root });
        }

        let root = self.dom.create_element(panel::BLOCK_TAG)?;
        self.dom.set_id(&root, panel::ROOT_ID)?;
        self.dom.set_class_name(
            &root,
            &format!("{} {}", css::PANEL, self.config.corner().css_class()),
        )?;
        self.dom.append_to_body(&root)?;
        info!(corner = %self.config.corner(), "Created stats panel");
        Ok(PanelHandle { root })
    }

    /// Replace the panel content with one block per visible gauge in `snapshot`.
    ///
    /// The new blocks are built before the old content is cleared, so a DOM
    /// failure while building leaves the previous content on screen.
    pub fn render(&mut self, snapshot: &StatSnapshot) -> Result<RenderReport, DomError> {
        let handle = self.ensure_panel()?;
        let tree = build_panel_tree(&self.config, snapshot);
        for key in &tree.skipped {
            debug!(gauge = %key, "No snapshot entry for visible gauge, skipping");
        }

        let mut blocks = Vec::with_capacity(tree.blocks.len());
        for block in &tree.blocks {
            match mount_tree(&self.dom, block) {
                Ok(node) => blocks.push(node),
                Err(e) => {
                    for node in &blocks {
                        discard(&self.dom, node);
                    }
                    return Err(e);
                }
            }
        }

        self.dom.clear_children(handle.root())?;
        for node in &blocks {
            self.dom.append_child(handle.root(), node)?;
        }

        self.renders += 1;
        debug!(
            render = self.renders,
            gauges = blocks.len(),
            skipped = tree.skipped.len(),
            "Rendered stats panel"
        );
        Ok(RenderReport {
            rendered: tree.rendered,
            skipped: tree.skipped,
        })
    }

    /// Remove the panel root from the document. Returns false if there was none.
    pub fn teardown(&self) -> Result<bool, DomError> {
        match self.dom.element_by_id(panel::ROOT_ID) {
            Some(root) => {
                self.dom.remove(&root)?;
                info!("Removed stats panel");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Create detached DOM nodes for `vnode` and its children
pub fn mount_tree<D: Dom>(dom: &D, vnode: &VNode) -> Result<D::Node, DomError> {
    let node = dom.create_element(vnode.tag)?;
    if let Err(e) = populate(dom, &node, vnode) {
        discard(dom, &node);
        return Err(e);
    }
    Ok(node)
}

/// Drop a detached node from a failed build; the build error is what gets reported
fn discard<D: Dom>(dom: &D, node: &D::Node) {
    if let Err(e) = dom.remove(node) {
        warn!(error = %e, "Failed to discard partially built panel node");
    }
}

fn populate<D: Dom>(dom: &D, node: &D::Node, vnode: &VNode) -> Result<(), DomError> {
    if !vnode.classes.is_empty() {
        dom.set_class_name(node, &vnode.class_name())?;
    }
    if let Some(text) = &vnode.text {
        dom.set_text(node, text)?;
    }
    for (property, value) in &vnode.styles {
        dom.set_style(node, property, value)?;
    }
    for child in &vnode.children {
        let child_node = mount_tree(dom, child)?;
        dom.append_child(node, &child_node)?;
    }
    Ok(())
}
