//! Process-wide switch for printing resolved blocks.
//!
//! Purely diagnostic: the switch never changes the tree that is returned.
//! Output goes through `tracing`, so a subscriber must be installed to see
//! it (the `godecl` binary installs one).

use crate::tree::{Container, Node};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

static PRINT_BLOCKS: AtomicBool = AtomicBool::new(false);

#[inline]
pub fn enable() {
    PRINT_BLOCKS.store(true, Ordering::Relaxed);
}

#[inline]
pub fn disable() {
    PRINT_BLOCKS.store(false, Ordering::Relaxed);
}

#[inline]
pub fn is_enabled() -> bool {
    PRINT_BLOCKS.load(Ordering::Relaxed)
}

pub(crate) fn print_node(depth: usize, node: &Node) {
    if !is_enabled() {
        return;
    }
    info!(
        target: "godecl::blocks",
        depth,
        kind = node.kind.as_str(),
        name = %node.name,
        span = %node.span,
        start = %node.location_span.start,
        end = %node.location_span.end,
        "node"
    );
}

pub(crate) fn print_container(depth: usize, container: &Container) {
    if !is_enabled() {
        return;
    }
    info!(
        target: "godecl::blocks",
        depth,
        kind = container.kind.as_str(),
        name = %container.name,
        header = %container.header_span,
        footer = %container.footer_span,
        nodes = container.nodes.len(),
        containers = container.containers.len(),
        "container"
    );
}
