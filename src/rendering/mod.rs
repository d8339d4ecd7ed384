//! Rendered preview: parse, classify, lay out and paint generated markup.

pub mod layout;
pub mod paint;

use crate::markup::{classify, parse, Role};
use crate::Viewport;
use layout::{layout_document, LayoutNode, CHAR_WIDTH};
use paint::PaintCommand;

/// Longest image source shown verbatim in the text preview
const MAX_SRC_CHARS: usize = 48;

/// Everything the rendered view shows for one version of the markup
#[derive(Debug, Clone)]
pub struct RenderedView {
    pub layout: Vec<LayoutNode>,
    pub commands: Vec<PaintCommand>,
    /// Terminal-friendly rendering of `layout`
    pub text: String,
}

/// Run the whole preview pipeline over `markup`. Never fails.
pub fn render(markup: &str, viewport: Viewport) -> RenderedView {
    let doc = parse(markup);
    let classified = classify(&doc);
    let layout = layout_document(&classified, viewport);
    let commands = paint::paint(&layout, viewport);
    let text = text_preview(&layout, viewport);
    log::debug!(
        "rendered {} block(s) into {} box(es), {} paint command(s)",
        doc.nodes.len(),
        layout.len(),
        commands.len()
    );
    RenderedView {
        layout,
        commands,
        text,
    }
}

/// Plain-text rendering of laid-out boxes.
///
/// Boxes sharing a row (badges) are printed on one line; images appear as
/// bracketed placeholders; centred treatments are centred in
/// `viewport.width / 8` columns.
pub fn text_preview(nodes: &[LayoutNode], viewport: Viewport) -> String {
    let columns = (viewport.width / CHAR_WIDTH).max(1) as usize;
    let mut out: Vec<String> = Vec::new();

    let mut i = 0;
    while i < nodes.len() {
        let row_y = nodes[i].lb.rect.y;
        let row: Vec<&LayoutNode> = nodes[i..]
            .iter()
            .take_while(|n| n.lb.rect.y == row_y)
            .collect();
        i += row.len();

        let centered = row.iter().all(|n| n.treatment.is_centered());
        let lines: Vec<String> = if row.iter().all(|n| n.is_image()) {
            vec![row.iter().map(|n| placeholder(n)).collect::<Vec<_>>().join(" ")]
        } else {
            row.iter()
                .flat_map(|n| n.text.lines().map(str::to_string).collect::<Vec<_>>())
                .collect()
        };

        if lines.is_empty() {
            out.push(String::new());
        }
        for line in lines {
            out.push(if centered { center(&line, columns) } else { line });
        }
    }
    out.join("\n")
}

fn placeholder(node: &LayoutNode) -> String {
    match node.role {
        Role::Screenshot | Role::Badge if !node.text.is_empty() => format!("[{}]", node.text),
        role => {
            let src = node.src.as_deref().unwrap_or_default();
            format!("[{}: {}]", role.name(), shorten(src))
        }
    }
}

fn shorten(src: &str) -> String {
    if src.chars().count() <= MAX_SRC_CHARS {
        return src.to_string();
    }
    let head: String = src.chars().take(MAX_SRC_CHARS - 3).collect();
    format!("{}...", head)
}

fn center(line: &str, columns: usize) -> String {
    let len = line.chars().count();
    if len >= columns {
        return line.to_string();
    }
    format!("{}{}", " ".repeat((columns - len) / 2), line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_produces_layout_commands_and_text() {
        let view = render(
            "<h1 align=\"center\">Demo</h1>\n\n<img alt=\"Screenshot 1\" src=\"s.png\" />",
            Viewport { width: 160, height: 120 },
        );
        assert_eq!(view.layout.len(), 2);
        assert!(view.commands.len() >= 3);
        let lines: Vec<&str> = view.text.lines().collect();
        assert_eq!(lines[0].trim(), "Demo");
        assert!(lines[0].starts_with(' '));
        assert_eq!(lines[1].trim(), "[Screenshot 1]");
    }

    #[test]
    fn badges_share_a_line() {
        let src = "<p align=\"center\"><img src=\"https://www.pwa-shields.com/a.svg\" alt=\"PWA Shields\"><img src=\"https://www.pwa-shields.com/b.svg\" alt=\"PWA Shields\"></p>";
        let view = render(src, Viewport { width: 800, height: 100 });
        assert_eq!(view.text.trim(), "[PWA Shields] [PWA Shields]");
    }

    #[test]
    fn long_data_uris_are_shortened() {
        let uri = format!("data:image/png;base64,{}", "A".repeat(200));
        let view = render(&format!("<img src=\"{}\">", uri), Viewport::default());
        let line = view.text.trim();
        assert!(line.starts_with("[logo: data:image/png;base64,"));
        assert!(line.ends_with("...]"));
        assert!(line.len() < 80);
    }
}
