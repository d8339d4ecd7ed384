//! Parsed document tree for the preview, plus its parser and classifier.

pub mod classify;
pub mod parser;

pub use classify::{classify, Classified, ClassifiedDocument, Role, Treatment};
pub use parser::parse;

use std::collections::BTreeMap;

/// Attributes as written on a raw tag, known and unknown alike
pub type Attributes = BTreeMap<String, String>;

/// Ordered sequence of top-level nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading(Heading),
    Paragraph(Paragraph),
    Image(Image),
    Link(Link),
    Text(String),
    Raw(RawBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub level: u8,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    /// Value of an `align` attribute, when the paragraph came from a raw tag
    pub align: Option<String>,
    /// Source text the paragraph was built from
    pub raw: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub attrs: Attributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub href: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

/// Any raw tag without a dedicated node kind (`div`, `b`, `br`, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct RawBlock {
    pub tag: String,
    pub attrs: Attributes,
    pub children: Vec<Node>,
}

impl Node {
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading(h) => &h.children,
            Node::Paragraph(p) => &p.children,
            Node::Link(l) => &l.children,
            Node::Raw(r) => &r.children,
            Node::Image(_) | Node::Text(_) => &[],
        }
    }

    /// Visible text of the node and its descendants
    pub fn text(&self) -> String {
        match self {
            Node::Text(t) => t.clone(),
            Node::Image(img) => img.alt.clone(),
            _ => self.children().iter().map(Node::text).collect(),
        }
    }

    fn flatten_into(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Image(img) => out.push_str(&img.alt),
            Node::Link(link) => {
                for child in &link.children {
                    child.flatten_into(out);
                }
                out.push_str(" <");
                out.push_str(&link.href);
                out.push('>');
            }
            _ => {
                for child in self.children() {
                    child.flatten_into(out);
                }
            }
        }
    }
}

impl Document {
    /// Text of every block, one block per line; links render as `label <href>`
    pub fn flatten(&self) -> String {
        let mut lines = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let mut line = String::new();
            node.flatten_into(&mut line);
            lines.push(line);
        }
        lines.join("\n")
    }

    /// Every image in document order, at any depth
    pub fn images(&self) -> Vec<&Image> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Image>) {
            for node in nodes {
                if let Node::Image(img) = node {
                    out.push(img);
                }
                walk(node.children(), out);
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }

    /// Every link in document order, at any depth
    pub fn links(&self) -> Vec<&Link> {
        fn walk<'a>(nodes: &'a [Node], out: &mut Vec<&'a Link>) {
            for node in nodes {
                if let Node::Link(link) = node {
                    out.push(link);
                }
                walk(node.children(), out);
            }
        }
        let mut out = Vec::new();
        walk(&self.nodes, &mut out);
        out
    }
}
