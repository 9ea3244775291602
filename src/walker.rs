//! First pass: extract declarations from the Go syntax tree.
//!
//! The walker produces the File shell and a flat sequence of blocks in
//! document order. Spans are still byte ranges here; every rune span in the
//! pending nodes and containers is [`RuneSpan::ABSENT`] until the boundary
//! fixer resolves it.

use crate::tree::{
    Container, ContainerType, File, Location, LocationSpan, Node, NodeType, RuneSpan,
};
use crate::ts::lines::point_location;
use crate::ts::ParsedSource;
use tree_sitter::Node as SyntaxNode;

/// Separator used when one declaration introduces several names.
const NAME_SEPARATOR: &str = ", ";

/// Half-open byte range into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

impl ByteSpan {
    fn of(node: SyntaxNode<'_>) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }
}

/// The declaration a block finalizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Node(Node),
    Container(Container),
}

/// Working record shared between the walker and the boundary fixer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    /// Index of the owning container block; `None` at top level.
    pub parent: Option<usize>,
    /// Extent of the declaration as reported by the parser.
    pub decl: ByteSpan,
    /// Parser location of `decl.end`.
    pub end: Location,
    /// Containers only: offset after which the opening brace is searched.
    pub body_anchor: Option<usize>,
}

impl Block {
    pub fn name(&self) -> &str {
        match &self.kind {
            BlockKind::Node(node) => &node.name,
            BlockKind::Container(container) => &container.name,
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, BlockKind::Container(_))
    }
}

/// Output of the walk.
#[derive(Debug)]
pub struct Walk {
    pub file: File,
    pub blocks: Vec<Block>,
}

/// Declaration shapes recognized at the top level of a Go file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Package,
    Simple(NodeType),
    Composite(ContainerType),
    Unrecognized,
}

/// Walk a syntax tree that is known to be free of errors.
pub fn walk(parsed: &ParsedSource<'_>) -> Walk {
    let mut walker = Walker {
        parsed,
        blocks: Vec::new(),
    };

    let root = parsed.root_node();
    let mut cursor = root.walk();
    for child in root.named_children(&mut cursor) {
        walker.top_level(child);
    }

    let file = File {
        location_span: LocationSpan::degenerate(),
        footer_span: RuneSpan::ABSENT,
        containers: Vec::new(),
        nodes: Vec::new(),
        parsing_errors: None,
    };
    Walk {
        file,
        blocks: walker.blocks,
    }
}

struct Walker<'p, 's> {
    parsed: &'p ParsedSource<'s>,
    blocks: Vec<Block>,
}

impl<'s> Walker<'_, 's> {
    fn text(&self, node: SyntaxNode<'_>) -> &'s str {
        self.parsed.node_text(node)
    }

    fn top_level(&mut self, node: SyntaxNode<'_>) {
        match shape_of(node) {
            Shape::Package => {
                let name = node
                    .named_child(0)
                    .map(|ident| self.text(ident).to_string())
                    .unwrap_or_default();
                self.push_node(node, NodeType::Package, name, None);
            }
            Shape::Simple(kind) => {
                let name = self.simple_name(node, kind);
                self.push_node(node, kind, name, None);
            }
            Shape::Composite(kind) => {
                let Some((name, body)) = single_type_spec(node).and_then(|spec| {
                    let name = spec.child_by_field_name("name")?;
                    let body = spec.child_by_field_name("type")?;
                    Some((self.text(name).to_string(), body))
                }) else {
                    return;
                };
                self.container(node, body, kind, name, None);
            }
            Shape::Unrecognized => {}
        }
    }

    fn push_node(
        &mut self,
        node: SyntaxNode<'_>,
        kind: NodeType,
        name: String,
        parent: Option<usize>,
    ) {
        let pending = Node {
            kind,
            name,
            location_span: LocationSpan::default(),
            span: RuneSpan::ABSENT,
        };
        self.blocks.push(Block {
            kind: BlockKind::Node(pending),
            parent,
            decl: ByteSpan::of(node),
            end: point_location(node.end_position()),
            body_anchor: None,
        });
    }

    /// Push a container block for `decl` whose composite type is `body`,
    /// then its members.
    fn container(
        &mut self,
        decl: SyntaxNode<'_>,
        body: SyntaxNode<'_>,
        kind: ContainerType,
        name: String,
        parent: Option<usize>,
    ) {
        let anchor = body.child(0).map_or(body.start_byte(), |kw| kw.end_byte());
        let pending = Container {
            kind,
            name,
            location_span: LocationSpan::default(),
            header_span: RuneSpan::ABSENT,
            footer_span: RuneSpan::ABSENT,
            containers: Vec::new(),
            nodes: Vec::new(),
        };
        let index = self.blocks.len();
        self.blocks.push(Block {
            kind: BlockKind::Container(pending),
            parent,
            decl: ByteSpan::of(decl),
            end: point_location(decl.end_position()),
            body_anchor: Some(anchor),
        });

        match kind {
            ContainerType::Struct => self.struct_members(body, index),
            ContainerType::Interface => self.interface_members(body, index),
        }
    }

    fn struct_members(&mut self, body: SyntaxNode<'_>, parent: usize) {
        let mut cursor = body.walk();
        let Some(list) = body
            .named_children(&mut cursor)
            .find(|c| c.kind() == "field_declaration_list")
        else {
            return;
        };

        let mut cursor = list.walk();
        for field in list.named_children(&mut cursor) {
            if field.kind() != "field_declaration" {
                continue;
            }
            let names = self.field_names(field, "name");
            let field_type = field.child_by_field_name("type");
            let composite = field_type.and_then(|t| composite_kind(t).map(|kind| (t, kind)));

            match composite {
                Some((body, kind)) if !names.is_empty() => {
                    self.container(field, body, kind, names, Some(parent));
                }
                _ if names.is_empty() => {
                    // embedded field: named after its type
                    let name = field_type
                        .map(|t| self.text(t).trim_start_matches('*').to_string())
                        .unwrap_or_default();
                    self.push_node(field, NodeType::Field, name, Some(parent));
                }
                _ => self.push_node(field, NodeType::Field, names, Some(parent)),
            }
        }
    }

    fn interface_members(&mut self, body: SyntaxNode<'_>, parent: usize) {
        let mut cursor = body.walk();
        for member in body.named_children(&mut cursor) {
            match member.kind() {
                "comment" => {}
                "method_elem" | "method_spec" => {
                    let name = self.field_names(member, "name");
                    self.push_node(member, NodeType::Method, name, Some(parent));
                }
                _ => {
                    let name = self.text(member).trim().to_string();
                    self.push_node(member, NodeType::Field, name, Some(parent));
                }
            }
        }
    }

    fn simple_name(&self, node: SyntaxNode<'_>, kind: NodeType) -> String {
        match kind {
            NodeType::Import => descendants_of_kind(node, &["import_spec"])
                .into_iter()
                .filter_map(|spec| spec.child_by_field_name("path"))
                .map(|path| unquote(self.text(path)))
                .collect::<Vec<_>>()
                .join(NAME_SEPARATOR),
            NodeType::Const | NodeType::Var | NodeType::Type => {
                let spec_kinds: &[&str] = match kind {
                    NodeType::Const => &["const_spec"],
                    NodeType::Var => &["var_spec"],
                    _ => &["type_spec", "type_alias"],
                };
                descendants_of_kind(node, spec_kinds)
                    .into_iter()
                    .map(|spec| self.field_names(spec, "name"))
                    .filter(|names| !names.is_empty())
                    .collect::<Vec<_>>()
                    .join(NAME_SEPARATOR)
            }
            NodeType::Function => node
                .child_by_field_name("name")
                .map(|n| self.text(n).to_string())
                .unwrap_or_default(),
            NodeType::Method => {
                let name = node
                    .child_by_field_name("name")
                    .map(|n| self.text(n))
                    .unwrap_or_default();
                match node
                    .child_by_field_name("receiver")
                    .and_then(|r| self.receiver_type(r))
                {
                    Some(receiver) => format!("{receiver}.{name}"),
                    None => name.to_string(),
                }
            }
            NodeType::Package | NodeType::Field => String::new(),
        }
    }

    /// Base type name of a method receiver, without pointer or type
    /// arguments.
    fn receiver_type(&self, receiver: SyntaxNode<'_>) -> Option<&'s str> {
        let mut cursor = receiver.walk();
        let param = receiver
            .named_children(&mut cursor)
            .find(|c| c.kind() == "parameter_declaration")?;
        let mut ty = param.child_by_field_name("type")?;
        loop {
            match ty.kind() {
                "pointer_type" | "parenthesized_type" => ty = ty.named_child(0)?,
                "generic_type" => ty = ty.child_by_field_name("type")?,
                _ => return self.text(ty).split('[').next(),
            }
        }
    }

    /// Joined texts of every child under `field`.
    fn field_names(&self, node: SyntaxNode<'_>, field: &str) -> String {
        let mut cursor = node.walk();
        let names: Vec<&str> = node
            .children_by_field_name(field, &mut cursor)
            .map(|n| self.text(n))
            .collect();
        names.join(NAME_SEPARATOR)
    }
}

/// Descendants of `node` whose kind is one of `kinds`, in document order.
/// Matching nodes are not descended into.
fn descendants_of_kind<'t>(node: SyntaxNode<'t>, kinds: &[&str]) -> Vec<SyntaxNode<'t>> {
    let mut found = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if kinds.contains(&child.kind()) {
            found.push(child);
        } else {
            found.extend(descendants_of_kind(child, kinds));
        }
    }
    found
}

fn shape_of(node: SyntaxNode<'_>) -> Shape {
    match node.kind() {
        "package_clause" => Shape::Package,
        "import_declaration" => Shape::Simple(NodeType::Import),
        "const_declaration" => Shape::Simple(NodeType::Const),
        "var_declaration" => Shape::Simple(NodeType::Var),
        "function_declaration" => Shape::Simple(NodeType::Function),
        "method_declaration" => Shape::Simple(NodeType::Method),
        "type_declaration" => match single_type_spec(node)
            .and_then(|spec| spec.child_by_field_name("type"))
            .and_then(composite_kind)
        {
            Some(kind) => Shape::Composite(kind),
            None => Shape::Simple(NodeType::Type),
        },
        _ => Shape::Unrecognized,
    }
}

/// The `type_spec` of an ungrouped type declaration; `None` for
/// parenthesized groups (even with one spec) and for aliases.
fn single_type_spec(decl: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    let mut cursor = decl.walk();
    if decl.children(&mut cursor).any(|c| c.kind() == "(") {
        return None;
    }
    let specs: Vec<_> = decl
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .collect();
    match specs.as_slice() {
        [spec] if spec.kind() == "type_spec" => Some(*spec),
        _ => None,
    }
}

fn composite_kind(ty: SyntaxNode<'_>) -> Option<ContainerType> {
    match ty.kind() {
        "struct_type" => Some(ContainerType::Struct),
        "interface_type" => Some(ContainerType::Interface),
        _ => None,
    }
}

fn unquote(literal: &str) -> &str {
    literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .unwrap_or(literal)
}
