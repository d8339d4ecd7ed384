//! Semantic roles for parsed nodes and the fixed styling attached to each.
//!
//! `role_of` is an ordered, total decision over the node's structure and
//! content. `Role::treatment` is a static table; adding a role without a
//! treatment does not compile.

use super::{Document, Node};
use crate::descriptor::Badge;

/// Marker that centres a raw paragraph
pub const CENTER_MARKER: &str = r#"align="center""#;

/// Alt-text marker carried by every generated screenshot
pub const SCREENSHOT_MARKER: &str = "Screenshot";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Level-1 heading
    Title,
    /// Level-4 heading holding the link row
    LinkBar,
    /// Any other heading level
    Heading,
    CenteredParagraph,
    LeftParagraph,
    Logo,
    Badge,
    Screenshot,
    ExternalLink,
    Text,
    Raw,
}

/// How a role is drawn in the preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Treatment {
    TitleText,
    LinkBarText,
    HeadingText,
    CenteredBlock,
    LeftBlock,
    /// Small square frame, contents scaled to fit
    SquareFrame,
    /// Icon-sized inline image
    InlineIcon,
    /// Bordered image spanning the content width
    FullWidthFrame,
    /// Anchor opened in a new context without referrer
    ExternalAnchor,
    Inherit,
}

impl Role {
    pub fn treatment(self) -> Treatment {
        match self {
            Role::Title => Treatment::TitleText,
            Role::LinkBar => Treatment::LinkBarText,
            Role::Heading => Treatment::HeadingText,
            Role::CenteredParagraph => Treatment::CenteredBlock,
            Role::LeftParagraph => Treatment::LeftBlock,
            Role::Logo => Treatment::SquareFrame,
            Role::Badge => Treatment::InlineIcon,
            Role::Screenshot => Treatment::FullWidthFrame,
            Role::ExternalLink => Treatment::ExternalAnchor,
            Role::Text | Role::Raw => Treatment::Inherit,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Title => "title",
            Role::LinkBar => "link-bar",
            Role::Heading => "heading",
            Role::CenteredParagraph => "centered-paragraph",
            Role::LeftParagraph => "left-paragraph",
            Role::Logo => "logo",
            Role::Badge => "badge",
            Role::Screenshot => "screenshot",
            Role::ExternalLink => "external-link",
            Role::Text => "text",
            Role::Raw => "raw",
        }
    }
}

impl Treatment {
    /// Style token handed to whatever draws the preview
    pub fn class(self) -> &'static str {
        match self {
            Treatment::TitleText => "text-center text-3xl font-bold my-4",
            Treatment::LinkBarText => "text-center text-lg font-medium my-3",
            Treatment::HeadingText => "font-semibold my-2",
            Treatment::CenteredBlock => "text-center my-3",
            Treatment::LeftBlock => "my-3",
            Treatment::SquareFrame => "mx-auto w-32 h-32 object-contain",
            Treatment::InlineIcon => "mx-auto inline-block h-5",
            Treatment::FullWidthFrame => "mx-auto w-full my-2 border rounded-md",
            Treatment::ExternalAnchor => "text-blue-600 hover:underline",
            Treatment::Inherit => "",
        }
    }

    pub fn is_centered(self) -> bool {
        matches!(
            self,
            Treatment::TitleText
                | Treatment::LinkBarText
                | Treatment::CenteredBlock
                | Treatment::SquareFrame
                | Treatment::InlineIcon
                | Treatment::FullWidthFrame
        )
    }

    /// Extra anchor attributes, for treatments that open links elsewhere
    pub fn anchor_attrs(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Treatment::ExternalAnchor => &[("target", "_blank"), ("rel", "noopener noreferrer")],
            _ => &[],
        }
    }
}

/// Assign a role to a single node, ignoring its children
pub fn role_of(node: &Node) -> Role {
    match node {
        Node::Heading(h) => match h.level {
            1 => Role::Title,
            4 => Role::LinkBar,
            _ => Role::Heading,
        },
        Node::Paragraph(p) => {
            if p.raw.contains(CENTER_MARKER) {
                Role::CenteredParagraph
            } else {
                Role::LeftParagraph
            }
        }
        // badge first, screenshot second, logo otherwise
        Node::Image(img) => {
            if Badge::ALL.iter().any(|b| img.src.contains(b.service_marker())) {
                Role::Badge
            } else if img.alt.contains(SCREENSHOT_MARKER) {
                Role::Screenshot
            } else {
                Role::Logo
            }
        }
        Node::Link(_) => Role::ExternalLink,
        Node::Text(_) => Role::Text,
        Node::Raw(_) => Role::Raw,
    }
}

/// A parsed node together with its role; borrows the node it describes
#[derive(Debug, Clone)]
pub struct Classified<'a> {
    pub node: &'a Node,
    pub role: Role,
    pub treatment: Treatment,
    pub children: Vec<Classified<'a>>,
}

impl<'a> Classified<'a> {
    pub fn new(node: &'a Node) -> Self {
        let role = role_of(node);
        Self {
            node,
            role,
            treatment: role.treatment(),
            children: node.children().iter().map(Classified::new).collect(),
        }
    }

    /// This node and its descendants, depth first
    pub fn walk(&self) -> Vec<&Classified<'a>> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.walk());
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct ClassifiedDocument<'a> {
    pub nodes: Vec<Classified<'a>>,
}

impl<'a> ClassifiedDocument<'a> {
    /// Every classified node at any depth, in document order
    pub fn walk(&self) -> Vec<&Classified<'a>> {
        self.nodes.iter().flat_map(Classified::walk).collect()
    }

    pub fn roles(&self) -> Vec<Role> {
        self.walk().into_iter().map(|c| c.role).collect()
    }
}

/// Classify every node of `doc`
pub fn classify(doc: &Document) -> ClassifiedDocument<'_> {
    ClassifiedDocument {
        nodes: doc.nodes.iter().map(Classified::new).collect(),
    }
}
