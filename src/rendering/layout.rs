//! Block layout for the rendered preview

use crate::markup::{Classified, ClassifiedDocument, Node, Role, Treatment};
use crate::Viewport;

/// Width of one glyph at scale 1, in pixels
pub const CHAR_WIDTH: u32 = 8;
pub const LOGO_SIZE: u32 = 128;
pub const BADGE_HEIGHT: u32 = 20;
pub const BADGE_WIDTH: u32 = 100;
const BADGE_GAP: u32 = 4;
const PAGE_MARGIN: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxModel {
    pub margin: u32,
    pub border: u32,
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub rect: Rect,
    pub box_model: BoxModel,
}

impl LayoutBox {
    pub fn content_width(&self) -> u32 {
        let total = self.box_model.margin + self.box_model.border + self.box_model.padding;
        self.rect.width.saturating_sub(total)
    }
}

/// A positioned box with the role it was laid out for.
///
/// Text boxes carry wrapped lines in `text`; image boxes carry the alt text
/// and the image source.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub lb: LayoutBox,
    pub text: String,
    pub role: Role,
    pub treatment: Treatment,
    pub scale: usize,
    pub src: Option<String>,
}

impl LayoutNode {
    pub fn is_image(&self) -> bool {
        self.src.is_some()
    }
}

struct Cursor {
    y: u32,
    page_width: u32,
    nodes: Vec<LayoutNode>,
}

impl Cursor {
    fn advance(&mut self, by: u32) {
        self.y = self.y.saturating_add(by);
    }

    fn top(&self) -> i32 {
        i32::try_from(self.y).unwrap_or(i32::MAX)
    }

    fn content_width(&self) -> u32 {
        self.page_width.saturating_sub(PAGE_MARGIN * 2)
    }

    fn text_block(&mut self, text: &str, role: Role, treatment: Treatment, scale: usize) {
        let padding = 6u32;
        let glyph = CHAR_WIDTH * scale as u32;
        let content_w = self.content_width().saturating_sub(padding * 2);
        let chars_per_line = (content_w / glyph).max(1) as usize;
        let lines = wrap(text, chars_per_line);
        let box_h = lines.len() as u32 * glyph + padding * 2;

        self.nodes.push(LayoutNode {
            lb: LayoutBox {
                rect: Rect {
                    x: PAGE_MARGIN as i32,
                    y: self.top(),
                    width: self.content_width(),
                    height: box_h,
                },
                box_model: BoxModel {
                    margin: 6,
                    border: 0,
                    padding,
                },
            },
            text: lines.join("\n"),
            role,
            treatment,
            scale,
            src: None,
        });
        self.advance(box_h.saturating_add(6));
    }

    fn image(&mut self, c: &Classified<'_>, x: i32, width: u32, height: u32) {
        let Node::Image(img) = c.node else {
            return;
        };
        let border = if c.treatment == Treatment::FullWidthFrame { 1 } else { 0 };
        self.nodes.push(LayoutNode {
            lb: LayoutBox {
                rect: Rect {
                    x,
                    y: self.top(),
                    width,
                    height,
                },
                box_model: BoxModel {
                    margin: 0,
                    border,
                    padding: 0,
                },
            },
            text: img.alt.clone(),
            role: c.role,
            treatment: c.treatment,
            scale: 1,
            src: Some(img.src.clone()),
        });
    }

    fn centered_x(&self, width: u32) -> i32 {
        (self.page_width.saturating_sub(width) / 2) as i32
    }

    /// Lay out a run of images: badges share a row, the rest stack
    fn images(&mut self, images: &[&Classified<'_>]) {
        let mut i = 0;
        while i < images.len() {
            let c = images[i];
            match c.role {
                Role::Badge => {
                    let run = images[i..].iter().take_while(|c| c.role == Role::Badge).count() as u32;
                    let row_w = run * BADGE_WIDTH + run.saturating_sub(1) * BADGE_GAP;
                    let mut x = self.centered_x(row_w);
                    for badge in &images[i..i + run as usize] {
                        self.image(badge, x, BADGE_WIDTH, BADGE_HEIGHT);
                        x += (BADGE_WIDTH + BADGE_GAP) as i32;
                    }
                    self.advance(BADGE_HEIGHT + 6);
                    i += run as usize;
                }
                Role::Screenshot => {
                    let w = self.content_width();
                    let h = (u64::from(w) * 9 / 16) as u32;
                    self.image(c, PAGE_MARGIN as i32, w, h);
                    self.advance(h.saturating_add(8));
                    i += 1;
                }
                _ => {
                    let x = self.centered_x(LOGO_SIZE);
                    self.image(c, x, LOGO_SIZE, LOGO_SIZE);
                    self.advance(LOGO_SIZE + 8);
                    i += 1;
                }
            }
        }
    }

    fn block(&mut self, c: &Classified<'_>) {
        match c.role {
            Role::Title => self.text_block(&collapse(&visible_text(c)), c.role, c.treatment, 2),
            Role::LinkBar | Role::Heading => {
                self.text_block(&collapse(&visible_text(c)), c.role, c.treatment, 1)
            }
            Role::Logo | Role::Badge | Role::Screenshot => self.images(&[c]),
            _ => {
                let images: Vec<&Classified<'_>> = c
                    .walk()
                    .into_iter()
                    .filter(|n| matches!(n.node, Node::Image(_)))
                    .collect();
                self.images(&images);
                let text = collapse(&visible_text(c));
                // an empty block still takes its place in the flow
                if !text.is_empty() || images.is_empty() {
                    self.text_block(&text, c.role, c.treatment, 1);
                }
            }
        }
    }
}

/// Text of a classified subtree, leaving out image alt text
fn visible_text(c: &Classified<'_>) -> String {
    match c.node {
        Node::Text(t) => t.clone(),
        Node::Image(_) => String::new(),
        _ => c.children.iter().map(visible_text).collect(),
    }
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn wrap(text: &str, chars_per_line: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        let cur_len = cur.chars().count();
        if cur_len + word.chars().count() + 1 > chars_per_line && !cur.is_empty() {
            lines.push(std::mem::take(&mut cur));
            cur.push_str(word);
        } else {
            if !cur.is_empty() {
                cur.push(' ');
            }
            cur.push_str(word);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Stack the classified blocks of a document vertically.
///
/// - title at scale 2, other text at scale 1, wrapped at 8px per glyph
/// - logos as centred 128px squares, badges in a centred 20px row,
///   screenshots across the content width at 16:9
pub fn layout_document(doc: &ClassifiedDocument<'_>, viewport: Viewport) -> Vec<LayoutNode> {
    let mut cursor = Cursor {
        y: PAGE_MARGIN,
        page_width: viewport.width,
        nodes: Vec::new(),
    };
    for c in &doc.nodes {
        cursor.block(c);
    }
    cursor.nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{classify, parse};

    fn layout(src: &str) -> Vec<LayoutNode> {
        let doc = parse(src);
        let classified = classify(&doc);
        layout_document(&classified, Viewport { width: 400, height: 300 })
    }

    #[test]
    fn logo_is_a_centred_square() {
        let nodes = layout("<p align=\"center\">\n  <img src=\"l.png\" width=\"150\" />\n</p>");
        assert_eq!(nodes.len(), 1);
        let logo = &nodes[0];
        assert_eq!(logo.role, Role::Logo);
        assert_eq!(logo.lb.rect.width, LOGO_SIZE);
        assert_eq!(logo.lb.rect.height, LOGO_SIZE);
        assert_eq!(logo.lb.rect.x, ((400 - LOGO_SIZE) / 2) as i32);
    }

    #[test]
    fn title_and_description_stack_downwards() {
        let nodes = layout("<h1 align=\"center\">Project</h1>\n\n<p align=\"center\">Some words here</p>");
        assert_eq!(nodes[0].role, Role::Title);
        assert_eq!(nodes[0].scale, 2);
        assert_eq!(nodes[0].text, "Project");
        assert_eq!(nodes[1].role, Role::CenteredParagraph);
        assert!(nodes[1].lb.rect.y > nodes[0].lb.rect.y);
    }

    #[test]
    fn empty_badge_row_keeps_a_box() {
        let nodes = layout("<p align=\"center\">\n  \n</p>");
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].text, "");
        assert_eq!(nodes[0].role, Role::CenteredParagraph);
    }

    #[test]
    fn screenshots_span_content_width() {
        let nodes = layout("<img width=\"1280\" alt=\"Screenshot 1\" src=\"a.png\" />");
        assert_eq!(nodes[0].role, Role::Screenshot);
        assert_eq!(nodes[0].lb.rect.width, 400 - 16);
        assert_eq!(nodes[0].lb.rect.height, (400 - 16) * 9 / 16);
        assert_eq!(nodes[0].lb.box_model.border, 1);
    }

    #[test]
    fn long_text_wraps() {
        let words = vec!["word"; 40].join(" ");
        let nodes = layout(&words);
        assert!(nodes[0].text.lines().count() > 1);
    }

    #[test]
    fn huge_viewport_does_not_overflow() {
        let doc = parse("<img alt=\"Screenshot 1\" src=\"a.png\" />\n<img alt=\"Screenshot 2\" src=\"b.png\" />");
        let classified = classify(&doc);
        let nodes = layout_document(&classified, Viewport { width: u32::MAX, height: 720 });
        let w = u32::MAX - 16;
        assert_eq!(nodes[0].lb.rect.height, (u64::from(w) * 9 / 16) as u32);
        assert!(nodes[1].lb.rect.y > nodes[0].lb.rect.y);
    }
}
