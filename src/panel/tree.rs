//! Pure panel layout: gauge selection, ordering and bar widths
//!
//! Nothing here touches a document, so every rule can be checked on plain
//! `VNode` values.

use crate::config::PanelConfig;
use crate::constants::{css, panel};
use crate::gauge::GaugeSpec;
use crate::snapshot::{StatSnapshot, Vital};
use crate::vnode::VNode;

/// Gauge blocks for one render plus which visible gauges had no data
#[derive(Debug, Clone, PartialEq)]
pub struct PanelTree {
    pub blocks: Vec<VNode>,
    pub rendered: Vec<String>,
    pub skipped: Vec<String>,
}

/// Bar width as a CSS percentage, always within `0%..=100%`
pub fn fill_percent(vital: &Vital) -> String {
    let percent = vital.fill_ratio() * 100.0;
    // Four decimals keeps widths like 93.75% exact and hides float noise
    let rounded = (percent * 10_000.0).round() / 10_000.0;
    format!("{rounded}%")
}

pub fn build_gauge_tree(spec: &GaugeSpec, vital: &Vital) -> VNode {
    VNode::element(panel::BLOCK_TAG)
        .class(css::STAT)
        .child(
            VNode::element(panel::INLINE_TAG)
                .class(css::STAT_LABEL)
                .text(format!("{}:", spec.label)),
        )
        .child(
            VNode::element(panel::INLINE_TAG)
                .class(css::STAT_VALUE)
                .text(vital.value_text()),
        )
        .child(
            VNode::element(panel::BLOCK_TAG)
                .class(css::PROGRESS)
                .class(spec.css_class.as_str())
                .child(
                    VNode::element(panel::BLOCK_TAG)
                        .class(css::PROGRESS_BAR)
                        .style("width", fill_percent(vital)),
                ),
        )
}

/// One block per gauge that is both visible and present in the snapshot,
/// in configured display order. Visible gauges without data are skipped.
pub fn build_panel_tree(config: &PanelConfig, snapshot: &StatSnapshot) -> PanelTree {
    let mut tree = PanelTree {
        blocks: Vec::new(),
        rendered: Vec::new(),
        skipped: Vec::new(),
    };
    for spec in config.display_order() {
        match snapshot.get(&spec.key) {
            Some(vital) => {
                tree.blocks.push(build_gauge_tree(spec, vital));
                tree.rendered.push(spec.key.clone());
            }
            None => tree.skipped.push(spec.key.clone()),
        }
    }
    tree
}
