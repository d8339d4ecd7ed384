//! Permissive parser for README markup.
//!
//! Input is split into blocks on blank lines. Blocks whose first character
//! is `<` are raw; each run of raw blocks is handed to the HTML fragment
//! parser as a whole, verbatim, and a run keeps absorbing the following
//! blocks while one of its tags is still open. Any other block is read line
//! by line for ATX headings, the remaining lines forming a paragraph.
//!
//! Inline content of markdown blocks goes through the fragment parser too,
//! so raw tags may appear anywhere, and `[label](href)` and `![alt](src)`
//! are picked out of the resulting text runs. Text inside raw blocks is
//! never scanned for markdown.
//!
//! Parsing never fails. Anything that does not form a recognised construct
//! is kept as literal text.

use super::{Attributes, Document, Heading, Image, Link, Node, Paragraph, RawBlock};
use scraper::{ElementRef, Html};
use std::ops::Range;

/// Elements that never take a closing tag
const VOID_TAGS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse `source` into a fresh document tree
pub fn parse(source: &str) -> Document {
    let lines: Vec<&str> = source.lines().collect();
    let mut nodes = Vec::new();
    let mut raw_run: Option<Range<usize>> = None;
    for block in blocks(&lines) {
        let continues_run = raw_run
            .as_ref()
            .is_some_and(|run| has_open_tags(&lines[run.clone()]));
        if continues_run || is_raw_block(&lines[block.clone()]) {
            raw_run = Some(match raw_run {
                Some(run) => run.start..block.end,
                None => block,
            });
            continue;
        }
        flush_raw(&lines, raw_run.take(), &mut nodes);
        parse_block(&lines[block], &mut nodes);
    }
    flush_raw(&lines, raw_run.take(), &mut nodes);
    Document { nodes }
}

fn is_raw_block(lines: &[&str]) -> bool {
    lines
        .first()
        .map(|l| l.trim_start().starts_with('<'))
        .unwrap_or(false)
}

/// Whether some non-void tag opened in `lines` has no matching close
fn has_open_tags(lines: &[&str]) -> bool {
    let mut open: Vec<String> = Vec::new();
    for line in lines {
        let mut rest = *line;
        while let Some(pos) = rest.find('<') {
            rest = &rest[pos + 1..];
            let closing = rest.starts_with('/');
            let tag_src = if closing { &rest[1..] } else { rest };
            if !tag_src.starts_with(|c: char| c.is_ascii_alphabetic()) {
                continue;
            }
            let name = tag_src
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase();
            let self_closing = rest
                .find('>')
                .map(|end| rest[..end].ends_with('/'))
                .unwrap_or(false);

            if closing {
                if let Some(i) = open.iter().rposition(|t| *t == name) {
                    open.truncate(i);
                }
            } else if !self_closing && !VOID_TAGS.contains(&name.as_str()) {
                open.push(name);
            }
        }
    }
    !open.is_empty()
}

fn flush_raw(lines: &[&str], run: Option<Range<usize>>, out: &mut Vec<Node>) {
    let Some(run) = run else {
        return;
    };
    let line_count = run.len();
    let source = lines[run].join("\n");
    let fragment = Html::parse_fragment(&source);
    let nodes = convert_children(fragment.root_element(), false);
    log::debug!("raw run of {} line(s) -> {} node(s)", line_count, nodes.len());
    out.extend(nodes);
}

/// Line ranges of the blocks in `lines`, separated by blank lines
fn blocks(lines: &[&str]) -> Vec<Range<usize>> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                out.push(s..i);
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        out.push(s..lines.len());
    }
    out
}

fn parse_block(lines: &[&str], out: &mut Vec<Node>) {
    let mut pending: Vec<&str> = Vec::new();
    for line in lines {
        match atx_heading(line) {
            Some((level, content)) => {
                flush_paragraph(&mut pending, out);
                out.push(Node::Heading(Heading {
                    level,
                    attrs: Attributes::new(),
                    children: inline_nodes(content),
                }));
            }
            None => pending.push(line),
        }
    }
    flush_paragraph(&mut pending, out);
}

fn flush_paragraph(pending: &mut Vec<&str>, out: &mut Vec<Node>) {
    if pending.is_empty() {
        return;
    }
    let raw = pending.join("\n");
    pending.clear();
    let children = inline_nodes(&raw);
    out.push(Node::Paragraph(Paragraph {
        align: None,
        raw,
        attrs: Attributes::new(),
        children,
    }));
}

/// `# Title`, up to six levels, optional closing hashes
fn atx_heading(line: &str) -> Option<(u8, &str)> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let level = trimmed.bytes().take_while(|b| *b == b'#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }

    let mut content = rest.trim();
    let unclosed = content.trim_end_matches('#');
    if unclosed.is_empty() {
        content = unclosed;
    } else if unclosed.len() < content.len() && unclosed.ends_with([' ', '\t']) {
        content = unclosed.trim_end();
    }
    Some((level as u8, content))
}

fn inline_nodes(source: &str) -> Vec<Node> {
    let fragment = Html::parse_fragment(source);
    convert_children(fragment.root_element(), true)
}

/// Convert the children of `el`; `markdown` enables inline link and image
/// syntax in text runs
fn convert_children(el: ElementRef<'_>, markdown: bool) -> Vec<Node> {
    let mut out = Vec::new();
    for child in el.children() {
        match child.value() {
            scraper::Node::Text(t) if markdown => out.extend(text_nodes(&t.text)),
            scraper::Node::Text(t) => {
                if !t.text.trim().is_empty() {
                    out.push(Node::Text(t.text.to_string()));
                }
            }
            scraper::Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    out.push(element_node(child_el, markdown));
                }
            }
            _ => {}
        }
    }
    out
}

fn element_node(el: ElementRef<'_>, markdown: bool) -> Node {
    let attrs = attributes(el);
    let name = el.value().name();

    if let Some(level) = heading_level(name) {
        return Node::Heading(Heading {
            level,
            attrs,
            children: convert_children(el, markdown),
        });
    }

    match name {
        "p" => Node::Paragraph(Paragraph {
            align: attrs.get("align").cloned(),
            raw: el.html(),
            children: convert_children(el, markdown),
            attrs,
        }),
        "img" => Node::Image(Image {
            src: attrs.get("src").cloned().unwrap_or_default(),
            alt: attrs.get("alt").cloned().unwrap_or_default(),
            attrs,
        }),
        "a" => Node::Link(Link {
            href: attrs.get("href").cloned().unwrap_or_default(),
            children: convert_children(el, markdown),
            attrs,
        }),
        tag => Node::Raw(RawBlock {
            tag: tag.to_string(),
            children: convert_children(el, markdown),
            attrs,
        }),
    }
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn attributes(el: ElementRef<'_>) -> Attributes {
    el.value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Split a text run into literal text, inline links and inline images.
/// Whitespace-only runs carry no content and are dropped.
fn text_nodes(text: &str) -> Vec<Node> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut literal = String::new();
    let mut rest = text;

    while let Some(pos) = rest.find('[') {
        let is_image = rest[..pos].ends_with('!');
        match bracket_target(&rest[pos..]) {
            Some((label, target, consumed)) => {
                let literal_end = if is_image { pos - 1 } else { pos };
                literal.push_str(&rest[..literal_end]);
                push_literal(&mut literal, &mut out);
                if is_image {
                    out.push(Node::Image(Image {
                        src: target.to_string(),
                        alt: label.to_string(),
                        attrs: Attributes::new(),
                    }));
                } else {
                    let children = if label.is_empty() {
                        Vec::new()
                    } else {
                        vec![Node::Text(label.to_string())]
                    };
                    out.push(Node::Link(Link {
                        href: target.to_string(),
                        attrs: Attributes::new(),
                        children,
                    }));
                }
                rest = &rest[pos + consumed..];
            }
            None => {
                literal.push_str(&rest[..=pos]);
                rest = &rest[pos + 1..];
            }
        }
    }
    literal.push_str(rest);
    push_literal(&mut literal, &mut out);
    out
}

/// Match `[label](target)` at the start of `s`, returning the bytes consumed
fn bracket_target(s: &str) -> Option<(&str, &str, usize)> {
    let close = s.find(']')?;
    let label = &s[1..close];
    let after = &s[close + 1..];
    if !after.starts_with('(') {
        return None;
    }
    let end = after.find(')')?;
    Some((label, after[1..end].trim(), close + 1 + end + 1))
}

fn push_literal(literal: &mut String, out: &mut Vec<Node>) {
    if !literal.is_empty() {
        out.push(Node::Text(std::mem::take(literal)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atx_headings_up_to_six_levels() {
        let doc = parse("# One\n## Two\n#### Four ####\n####### seven");
        let levels: Vec<u8> = doc
            .nodes
            .iter()
            .filter_map(|n| match n {
                Node::Heading(h) => Some(h.level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![1, 2, 4]);
        assert_eq!(doc.nodes[2].text(), "Four");
        // too many hashes is a paragraph
        assert!(matches!(doc.nodes[3], Node::Paragraph(_)));
    }

    #[test]
    fn hash_without_space_is_not_a_heading() {
        let doc = parse("#hashtag");
        assert!(matches!(doc.nodes[0], Node::Paragraph(_)));
        assert_eq!(doc.nodes[0].text(), "#hashtag");
    }

    #[test]
    fn raw_block_yields_paragraph_and_heading() {
        let doc = parse("<p align=\"center\">\n  <img src=\"logo.png\" width=\"150\" />\n</p>\n<h1 align=\"center\">Title</h1>");
        assert_eq!(doc.nodes.len(), 2);
        match &doc.nodes[0] {
            Node::Paragraph(p) => {
                assert_eq!(p.align.as_deref(), Some("center"));
                assert!(p.raw.contains("align=\"center\""));
                match &p.children[..] {
                    [Node::Image(img)] => {
                        assert_eq!(img.src, "logo.png");
                        assert_eq!(img.attrs.get("width").map(String::as_str), Some("150"));
                    }
                    other => panic!("unexpected children {:?}", other),
                }
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
        match &doc.nodes[1] {
            Node::Heading(h) => {
                assert_eq!(h.level, 1);
                assert_eq!(doc.nodes[1].text(), "Title");
            }
            other => panic!("expected heading, got {:?}", other),
        }
    }

    #[test]
    fn unknown_attributes_are_kept() {
        let doc = parse("<img src=\"a.png\" data-foo=\"bar\" loading=\"lazy\">");
        match &doc.nodes[0] {
            Node::Image(img) => {
                assert_eq!(img.attrs.get("data-foo").map(String::as_str), Some("bar"));
                assert_eq!(img.attrs.get("loading").map(String::as_str), Some("lazy"));
                assert_eq!(img.alt, "");
            }
            other => panic!("expected image, got {:?}", other),
        }
    }

    #[test]
    fn markdown_links_and_images_inline() {
        let doc = parse("See [docs](https://docs.example) and ![shot](s.png) now");
        let Node::Paragraph(p) = &doc.nodes[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(p.align, None);
        assert_eq!(p.children.len(), 5);
        assert!(matches!(&p.children[1], Node::Link(l) if l.href == "https://docs.example"));
        assert!(matches!(&p.children[3], Node::Image(i) if i.alt == "shot" && i.src == "s.png"));
        assert_eq!(doc.flatten(), "See docs <https://docs.example> and shot now");
    }

    #[test]
    fn raw_tags_inside_markdown_paragraph() {
        let doc = parse("Hello <b>bold</b> [x](y)");
        let Node::Paragraph(p) = &doc.nodes[0] else {
            panic!("expected paragraph");
        };
        assert!(matches!(&p.children[0], Node::Text(t) if t == "Hello "));
        assert!(matches!(&p.children[1], Node::Raw(r) if r.tag == "b"));
        assert!(matches!(p.children.last(), Some(Node::Link(l)) if l.href == "y"));
    }

    #[test]
    fn unclosed_link_syntax_stays_literal() {
        let doc = parse("broken [label](nowhere and [no paren] here");
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].text(), "broken [label](nowhere and [no paren] here");
        assert!(doc.links().is_empty());
    }

    #[test]
    fn malformed_markup_never_fails() {
        for src in ["<", "<p", "</h4>", "<<>>", "<img src=", "[", "![", "](", "\n\n\n", ""] {
            let _ = parse(src);
        }
        let doc = parse("<div><span>half open");
        assert_eq!(doc.flatten(), "half open");
    }

    #[test]
    fn link_bar_keeps_anchors_and_separator_text() {
        let doc = parse("<h4 align=\"center\">\n  <a href=\"#\">A</a>\n  ·\n  <a href=\"/b\">B</a>\n</h4>");
        let Node::Heading(h) = &doc.nodes[0] else {
            panic!("expected heading");
        };
        assert_eq!(h.level, 4);
        assert_eq!(doc.links().len(), 2);
        assert!(doc.nodes[0].text().contains('·'));
    }

    #[test]
    fn raw_tag_may_span_a_blank_line() {
        let doc = parse("<p align=\"center\">\n  \n</p>\n\n<h4 align=\"center\">\n</h4>");
        assert_eq!(doc.nodes.len(), 2);
        assert!(matches!(&doc.nodes[0], Node::Paragraph(p) if p.children.is_empty()));
        assert!(matches!(&doc.nodes[1], Node::Heading(h) if h.level == 4));
    }

    #[test]
    fn markdown_between_raw_blocks_splits_runs() {
        let doc = parse("<h1>T</h1>\n\n## Sub\n\nplain\n\n<img src=\"x\">");
        assert_eq!(doc.nodes.len(), 4);
        assert!(matches!(&doc.nodes[1], Node::Heading(h) if h.level == 2));
        assert!(matches!(&doc.nodes[2], Node::Paragraph(p) if p.raw == "plain"));
        assert!(matches!(&doc.nodes[3], Node::Image(_)));
    }

    #[test]
    fn consecutive_raw_images_are_top_level() {
        let doc = parse("<img width=\"1280\" alt=\"Screenshot 1\" src=\"a\" />\n<img width=\"1280\" alt=\"Screenshot 2\" src=\"b\" />");
        assert_eq!(doc.nodes.len(), 2);
        assert!(doc.nodes.iter().all(|n| matches!(n, Node::Image(_))));
    }

    #[test]
    fn open_tag_absorbs_blocks_until_closed() {
        let doc = parse("<p align=\"center\">First para\n\nSecond para</p>\n\nafter");
        assert_eq!(doc.nodes.len(), 2);
        let Node::Paragraph(p) = &doc.nodes[0] else {
            panic!("expected paragraph, got {:?}", doc.nodes[0]);
        };
        assert_eq!(p.align.as_deref(), Some("center"));
        assert_eq!(doc.nodes[0].text(), "First para\n\nSecond para");
        assert!(matches!(&doc.nodes[1], Node::Paragraph(p) if p.raw == "after"));
    }

    #[test]
    fn blank_lines_inside_raw_run_are_kept_verbatim() {
        let doc = parse("<p>a\n \n\n\nb</p>");
        assert_eq!(doc.nodes[0].text(), "a\n \n\n\nb");
    }

    #[test]
    fn text_in_raw_tags_is_literal() {
        let doc = parse("<p align=\"center\">see [docs](https://d.example) and ![x](y.png)</p>");
        assert!(doc.links().is_empty());
        assert!(doc.images().is_empty());
        assert_eq!(doc.flatten(), "see [docs](https://d.example) and ![x](y.png)");
    }

    #[test]
    fn open_tag_tracking() {
        assert!(!has_open_tags(&["<p align=\"center\">", "  <img src=\"a\" width=\"150\" />", "</p>"]));
        assert!(!has_open_tags(&["<br>", "<img src=\"a\">", "<hr/>", "a < b"]));
        assert!(has_open_tags(&["<h4 align=\"center\">", "  <a href=\"#\">A</a>"]));
        assert!(has_open_tags(&["<div><span>half open</span>"]));
        assert!(!has_open_tags(&["<div><span>text</div>"]));
    }
}
