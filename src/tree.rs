//! Declaration tree handed to structural diff/merge tools.
//!
//! Every offset in this module is a rune (character) offset. Byte offsets
//! never leave the crate.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line/column position. Lines are 1-based; columns are 1-based byte
/// columns, with 0 marking a position at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Position used for synthetic spans (file start, unparsed files).
    pub const fn file_start() -> Self {
        Self { line: 1, column: 0 }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocationSpan {
    pub start: Location,
    pub end: Location,
}

impl LocationSpan {
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// `{1,0}-{1,0}`, the span of a file that could not be parsed.
    pub const fn degenerate() -> Self {
        Self {
            start: Location::file_start(),
            end: Location::file_start(),
        }
    }
}

/// Half-open range `[start, end)` of rune offsets.
///
/// A span with `end < start` means "absent"; [`RuneSpan::ABSENT`] is the
/// canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuneSpan {
    pub start: i64,
    pub end: i64,
}

impl RuneSpan {
    pub const ABSENT: RuneSpan = RuneSpan { start: 0, end: -1 };

    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_absent(&self) -> bool {
        self.end < self.start
    }

    pub fn len(&self) -> usize {
        if self.is_absent() {
            0
        } else {
            (self.end - self.start) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when `other` lies entirely inside `self`.
    pub fn contains(&self, other: &RuneSpan) -> bool {
        !self.is_absent() && other.start >= self.start && other.end <= self.end
    }
}

impl Default for RuneSpan {
    fn default() -> Self {
        Self::ABSENT
    }
}

impl fmt::Display for RuneSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Kinds of leaf declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Package,
    Import,
    Const,
    Var,
    Type,
    Function,
    Method,
    Field,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Package => "package",
            NodeType::Import => "import",
            NodeType::Const => "const",
            NodeType::Var => "var",
            NodeType::Type => "type",
            NodeType::Function => "function",
            NodeType::Method => "method",
            NodeType::Field => "field",
        }
    }
}

/// Kinds of composite declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContainerType {
    Struct,
    Interface,
}

impl ContainerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerType::Struct => "struct",
            ContainerType::Interface => "interface",
        }
    }
}

/// A leaf declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "type")]
    pub kind: NodeType,
    pub name: String,
    pub location_span: LocationSpan,
    pub span: RuneSpan,
}

/// A declaration that owns nested declarations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    #[serde(rename = "type")]
    pub kind: ContainerType,
    pub name: String,
    pub location_span: LocationSpan,
    pub header_span: RuneSpan,
    pub footer_span: RuneSpan,
    pub containers: Vec<Container>,
    pub nodes: Vec<Node>,
}

impl Container {
    /// Full extent, from the header start through the footer end.
    pub fn extent(&self) -> RuneSpan {
        RuneSpan::new(self.header_span.start, self.footer_span.end)
    }

    /// Nested blocks in document order.
    pub fn blocks(&self) -> Vec<BlockRef<'_>> {
        merge_in_order(&self.nodes, &self.containers)
    }
}

/// A syntax error reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsingError {
    pub location: Location,
    pub message: String,
}

/// Root of the declaration tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct File {
    pub location_span: LocationSpan,
    pub footer_span: RuneSpan,
    pub containers: Vec<Container>,
    pub nodes: Vec<Node>,
    pub parsing_errors: Option<Vec<ParsingError>>,
}

impl File {
    /// Tree for a file that failed to parse: no declarations, a degenerate
    /// location span and exactly one error.
    pub fn unparsed(error: ParsingError) -> Self {
        Self {
            location_span: LocationSpan::degenerate(),
            footer_span: RuneSpan::ABSENT,
            containers: Vec::new(),
            nodes: Vec::new(),
            parsing_errors: Some(vec![error]),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.parsing_errors.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// The package declaration, when parsing succeeded.
    pub fn package(&self) -> Option<&Node> {
        self.nodes.first().filter(|n| n.kind == NodeType::Package)
    }

    /// Top-level blocks in document order, interleaving nodes and containers.
    pub fn blocks(&self) -> Vec<BlockRef<'_>> {
        merge_in_order(&self.nodes, &self.containers)
    }
}

/// Borrowed view of either kind of block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRef<'a> {
    Node(&'a Node),
    Container(&'a Container),
}

impl BlockRef<'_> {
    pub fn span(&self) -> RuneSpan {
        match self {
            BlockRef::Node(n) => n.span,
            BlockRef::Container(c) => c.extent(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            BlockRef::Node(n) => &n.name,
            BlockRef::Container(c) => &c.name,
        }
    }
}

fn merge_in_order<'a>(nodes: &'a [Node], containers: &'a [Container]) -> Vec<BlockRef<'a>> {
    let mut blocks: Vec<BlockRef<'a>> = nodes
        .iter()
        .map(BlockRef::Node)
        .chain(containers.iter().map(BlockRef::Container))
        .collect();
    blocks.sort_by_key(|b| b.span().start);
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_span() {
        assert!(RuneSpan::ABSENT.is_absent());
        assert_eq!(RuneSpan::ABSENT.len(), 0);
        assert_eq!(RuneSpan::default(), RuneSpan::new(0, -1));
        assert!(!RuneSpan::new(3, 3).is_absent());
    }

    #[test]
    fn containment() {
        let outer = RuneSpan::new(10, 20);
        assert!(outer.contains(&RuneSpan::new(10, 20)));
        assert!(outer.contains(&RuneSpan::new(12, 15)));
        assert!(!outer.contains(&RuneSpan::new(9, 15)));
        assert!(!RuneSpan::ABSENT.contains(&RuneSpan::new(0, 0)));
    }

    #[test]
    fn unparsed_file_shape() {
        let file = File::unparsed(ParsingError {
            location: Location::new(1, 0),
            message: "boom".to_string(),
        });
        assert_eq!(file.location_span, LocationSpan::degenerate());
        assert_eq!(file.footer_span, RuneSpan::ABSENT);
        assert!(file.nodes.is_empty());
        assert!(file.containers.is_empty());
        assert!(file.has_errors());
        assert!(file.package().is_none());
    }

    #[test]
    fn serializes_with_host_field_names() {
        let node = Node {
            kind: NodeType::Function,
            name: "Hi".to_string(),
            location_span: LocationSpan::new(Location::new(2, 0), Location::new(4, 1)),
            span: RuneSpan::new(19, 47),
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "Function");
        assert_eq!(json["locationSpan"]["start"]["line"], 2);
        assert_eq!(json["span"]["end"], 47);
    }
}
