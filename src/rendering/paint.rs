//! Paint commands for the rendered preview

use super::layout::{LayoutNode, CHAR_WIDTH};
use crate::markup::Treatment;
use crate::Viewport;

const PAGE: (u8, u8, u8, u8) = (255, 255, 255, 255);
const FRAME: (u8, u8, u8, u8) = (209, 213, 219, 255);
const LINK: (u8, u8, u8, u8) = (37, 99, 235, 255);
const INK: (u8, u8, u8, u8) = (15, 23, 42, 255);

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: (u8, u8, u8, u8),
    },
    StrokeRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: (u8, u8, u8, u8),
    },
    Image {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        src: String,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: usize,
        rgba: (u8, u8, u8, u8),
    },
}

/// Turn laid-out boxes into draw calls, page background first
pub fn paint(nodes: &[LayoutNode], viewport: Viewport) -> Vec<PaintCommand> {
    let page_height = nodes
        .iter()
        .map(|n| (n.lb.rect.y.max(0) as u32).saturating_add(n.lb.rect.height))
        .max()
        .unwrap_or(0)
        .max(viewport.height);

    let mut cmds = vec![PaintCommand::SolidRect {
        x: 0,
        y: 0,
        width: viewport.width,
        height: page_height,
        rgba: PAGE,
    }];

    for node in nodes {
        let r = &node.lb.rect;
        if let Some(src) = &node.src {
            cmds.push(PaintCommand::Image {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                src: src.clone(),
            });
            if node.lb.box_model.border > 0 {
                cmds.push(PaintCommand::StrokeRect {
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height: r.height,
                    rgba: FRAME,
                });
            }
            continue;
        }

        let glyph = CHAR_WIDTH * node.scale as u32;
        let padding = node.lb.box_model.padding;
        let inner_w = r.width.saturating_sub(padding * 2);
        let color = if node.treatment == Treatment::ExternalAnchor {
            LINK
        } else {
            INK
        };
        for (i, line) in node.text.lines().enumerate() {
            let line_w = line.chars().count() as u32 * glyph;
            let offset = if node.treatment.is_centered() {
                inner_w.saturating_sub(line_w) / 2
            } else {
                0
            };
            cmds.push(PaintCommand::Text {
                x: r.x.saturating_add(to_i32(padding.saturating_add(offset))),
                y: r.y.saturating_add(to_i32(padding.saturating_add(i as u32 * glyph))),
                text: line.to_string(),
                scale: node.scale,
                rgba: color,
            });
        }
    }
    cmds
}

fn to_i32(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::{classify, parse};
    use crate::rendering::layout::layout_document;

    #[test]
    fn screenshot_gets_image_and_frame() {
        let doc = parse("<img alt=\"Screenshot 1\" src=\"a.png\">");
        let v = Viewport { width: 320, height: 100 };
        let cmds = paint(&layout_document(&classify(&doc), v), v);
        assert!(matches!(cmds[0], PaintCommand::SolidRect { width: 320, .. }));
        assert!(matches!(&cmds[1], PaintCommand::Image { src, .. } if src == "a.png"));
        assert!(matches!(cmds[2], PaintCommand::StrokeRect { .. }));
    }

    #[test]
    fn centred_text_is_offset() {
        let doc = parse("<h1 align=\"center\">Hi</h1>\n\nleft");
        let v = Viewport { width: 320, height: 100 };
        let cmds = paint(&layout_document(&classify(&doc), v), v);
        let xs: Vec<i32> = cmds
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Text { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(xs.len(), 2);
        assert!(xs[0] > xs[1]);
    }

    #[test]
    fn huge_viewport_paints_without_overflow() {
        let doc = parse("<h1 align=\"center\">Hi</h1>\n\n<img alt=\"Screenshot 1\" src=\"a.png\">\n\nafter");
        let v = Viewport { width: u32::MAX, height: 720 };
        let cmds = paint(&layout_document(&classify(&doc), v), v);
        assert!(matches!(cmds[0], PaintCommand::SolidRect { height, .. } if height > 2_000_000_000));
        assert_eq!(
            cmds.iter().filter(|c| matches!(c, PaintCommand::Text { .. })).count(),
            2
        );
    }
}
