//! Second pass: resolve block boundaries in rune offsets.
//!
//! Blocks arrive from the walker in document order with byte ranges taken
//! from the parser. This pass:
//!
//! - extends each block backwards over its leading region (blank lines and
//!   doc comments since the previous sibling's line),
//! - finds the braces of every container by scanning the raw text,
//! - translates everything into rune offsets through a forward-only cursor,
//! - assembles the owned tree and checks ordering and containment.
//!
//! All byte offsets stay inside this module.

use crate::config::ParseOptions;
use crate::debug;
use crate::offsets::{OffsetError, RuneCursor};
use crate::scan::{after_first_newline, find_close, find_open, BRACES};
use crate::tree::{Container, File, Location, LocationSpan, Node, RuneSpan};
use crate::ts::LineTable;
use crate::walker::{Block, BlockKind, Walk};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoundaryError {
    #[error("offset translation failed: {0}")]
    Offset(#[from] OffsetError),

    #[error("no '{delimiter}' found for {name} after byte {from}")]
    MissingDelimiter {
        name: String,
        delimiter: char,
        from: usize,
    },

    #[error("block '{name}': {message}")]
    Invariant { name: String, message: String },
}

impl BoundaryError {
    fn invariant(name: &str, message: impl Into<String>) -> Self {
        BoundaryError::Invariant {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Rewrite the walker's output into the finished tree.
pub fn fix_block_boundaries(
    walk: Walk,
    source: &str,
    lines: &LineTable,
    options: &ParseOptions,
) -> Result<File, BoundaryError> {
    let Walk { mut file, blocks } = walk;
    let mut fixer = Fixer {
        text: source.as_bytes(),
        runes: RuneCursor::new(source),
        lines,
    };

    let mut top = Siblings::default();
    let mut stack: Vec<Open> = Vec::new();

    for (index, block) in blocks.into_iter().enumerate() {
        fixer.close_until(&mut stack, &mut top, block.parent)?;
        if block.parent != stack.last().map(|open| open.index) {
            return Err(BoundaryError::invariant(
                block.name(),
                "parent container is not the innermost open block",
            ));
        }
        fixer.resolve(index, block, &mut stack, &mut top)?;
    }
    fixer.close_until(&mut stack, &mut top, None)?;

    check_order("file", &top.spans, None)?;

    let end = top.last_location.unwrap_or_else(Location::file_start);
    file.location_span = LocationSpan::new(Location::file_start(), end);

    if options.trailing_footer {
        if let Some(last_end) = top.last_end {
            let start = after_first_newline(fixer.text, last_end, fixer.text.len());
            let footer = fixer.rune_span(start, fixer.text.len())?;
            if !footer.is_empty() {
                file.footer_span = footer;
            }
        }
    }

    file.nodes = top.nodes;
    file.containers = top.containers;
    Ok(file)
}

/// Finished blocks of one parent, in document order.
#[derive(Debug, Default)]
struct Siblings {
    nodes: Vec<Node>,
    containers: Vec<Container>,
    /// Full extent of every finished block, with its name.
    spans: Vec<(RuneSpan, String)>,
    /// Byte offset where the last finished block (or the header) ends.
    last_end: Option<usize>,
    last_location: Option<Location>,
}

impl Siblings {
    fn after_header(header_end: usize) -> Self {
        Self {
            last_end: Some(header_end),
            ..Self::default()
        }
    }

    fn push_node(&mut self, node: Node, end: usize, end_location: Location) {
        self.spans.push((node.span, node.name.clone()));
        self.last_end = Some(end);
        self.last_location = Some(end_location);
        self.nodes.push(node);
    }

    fn push_container(&mut self, closed: Closed) {
        self.spans
            .push((closed.container.extent(), closed.container.name.clone()));
        self.last_end = Some(closed.end);
        self.last_location = Some(closed.container.location_span.end);
        self.containers.push(closed.container);
    }
}

/// A container whose header is resolved and whose members are pending.
#[derive(Debug)]
struct Open {
    index: usize,
    container: Container,
    header_start: usize,
    decl_end: usize,
    members: Siblings,
}

#[derive(Debug)]
struct Closed {
    container: Container,
    end: usize,
}

struct Fixer<'a> {
    text: &'a [u8],
    runes: RuneCursor<'a>,
    lines: &'a LineTable,
}

impl Fixer<'_> {
    fn rune_span(&mut self, start: usize, end: usize) -> Result<RuneSpan, OffsetError> {
        let start = self.runes.rune_offset(start)?;
        let end = self.runes.rune_offset(end)?;
        Ok(RuneSpan::new(start as i64, end as i64))
    }

    /// Close open containers until `parent` is innermost (or the stack is
    /// empty when `parent` is `None`).
    fn close_until(
        &mut self,
        stack: &mut Vec<Open>,
        top: &mut Siblings,
        parent: Option<usize>,
    ) -> Result<(), BoundaryError> {
        while let Some(open) = stack.pop() {
            if Some(open.index) == parent {
                stack.push(open);
                break;
            }
            let closed = self.close(open, stack.len())?;
            current(stack, top).push_container(closed);
        }
        Ok(())
    }

    fn resolve(
        &mut self,
        index: usize,
        block: Block,
        stack: &mut Vec<Open>,
        top: &mut Siblings,
    ) -> Result<(), BoundaryError> {
        let depth = stack.len();
        let start = match current(stack, top).last_end {
            Some(previous) if previous > block.decl.start => {
                return Err(BoundaryError::invariant(
                    block.name(),
                    format!(
                        "starts at byte {} before the previous block ends at {previous}",
                        block.decl.start
                    ),
                ));
            }
            Some(previous) => after_first_newline(self.text, previous, block.decl.start),
            // the first block owns everything before it
            None => 0,
        };

        match block.kind {
            BlockKind::Node(mut node) => {
                node.span = self.rune_span(start, block.decl.end)?;
                node.location_span = LocationSpan::new(self.lines.location(start), block.end);
                debug::print_node(depth, &node);
                current(stack, top).push_node(node, block.decl.end, block.end);
            }
            BlockKind::Container(mut container) => {
                let anchor = block.body_anchor.unwrap_or(block.decl.start);
                let open_brace = find_open(self.text, anchor, BRACES)
                    .filter(|&pos| pos < block.decl.end)
                    .ok_or_else(|| BoundaryError::MissingDelimiter {
                        name: container.name.clone(),
                        delimiter: BRACES.open as char,
                        from: anchor,
                    })?;
                let header_end = open_brace + 1;
                container.header_span = self.rune_span(start, header_end)?;
                stack.push(Open {
                    index,
                    container,
                    header_start: start,
                    decl_end: block.decl.end,
                    members: Siblings::after_header(header_end),
                });
            }
        }
        Ok(())
    }

    fn close(&mut self, open: Open, depth: usize) -> Result<Closed, BoundaryError> {
        let Open {
            mut container,
            header_start,
            decl_end,
            members,
            ..
        } = open;

        let from = members.last_end.unwrap_or(header_start);
        let close_brace = find_close(self.text, from, BRACES)
            .filter(|&pos| pos < decl_end)
            .ok_or_else(|| BoundaryError::MissingDelimiter {
                name: container.name.clone(),
                delimiter: BRACES.close as char,
                from,
            })?;
        let end = close_brace + 1;
        let footer_start = after_first_newline(self.text, from, close_brace);

        container.footer_span = self.rune_span(footer_start, end)?;
        container.location_span = LocationSpan::new(
            self.lines.location(header_start),
            self.lines.location(end),
        );
        check_order(&container.name, &members.spans, Some(container.extent()))?;
        container.nodes = members.nodes;
        container.containers = members.containers;

        debug::print_container(depth, &container);
        Ok(Closed { container, end })
    }
}

fn current<'s>(stack: &'s mut [Open], top: &'s mut Siblings) -> &'s mut Siblings {
    match stack.last_mut() {
        Some(open) => &mut open.members,
        None => top,
    }
}

/// Spans must be present, strictly increasing, non-overlapping and inside
/// `bounds` when given.
fn check_order(
    owner: &str,
    spans: &[(RuneSpan, String)],
    bounds: Option<RuneSpan>,
) -> Result<(), BoundaryError> {
    for (span, name) in spans {
        if span.is_absent() {
            return Err(BoundaryError::invariant(name, "span was never resolved"));
        }
        if let Some(bounds) = bounds {
            if !bounds.contains(span) {
                return Err(BoundaryError::invariant(
                    name,
                    format!("span {span} lies outside {owner} {bounds}"),
                ));
            }
        }
    }
    for pair in spans.windows(2) {
        let ((prev, prev_name), (next, next_name)) = (&pair[0], &pair[1]);
        if next.start <= prev.start || next.start < prev.end {
            return Err(BoundaryError::invariant(
                next_name,
                format!("span {next} overlaps or precedes '{prev_name}' {prev} in {owner}"),
            ));
        }
    }
    Ok(())
}
