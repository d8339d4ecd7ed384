//! README template: descriptor in, markup text out.
//!
//! The layout is fixed. Every image and link is written as a raw tag so that
//! alignment and sizing attributes can ride along; the preview parser accepts
//! this mix of raw tags and line-oriented markup.

use crate::descriptor::{Badge, Descriptor, Link};

/// Logo used when the descriptor has none
pub const PLACEHOLDER_LOGO: &str = "https://via.placeholder.com/200";

/// Glyph placed between consecutive link anchors
pub const LINK_SEPARATOR: char = '·';

/// Render the README for `descriptor`.
///
/// Pure and total: the same descriptor always yields the same bytes, and
/// empty fields or sequences still yield a complete document.
pub fn generate(descriptor: &Descriptor) -> String {
    let logo = if descriptor.logo_ref.is_empty() {
        PLACEHOLDER_LOGO
    } else {
        descriptor.logo_ref.as_str()
    };

    format!(
        r#"
<p align="center">
  <img src="{logo}" width="150" />
</p>
<h1 align="center">{title}</h1>

<p align="center">
  {badges}
</p>

<h4 align="center">
  {links}
</h4>

<p align="center">{description}</p>

{screenshots}
"#,
        logo = logo,
        title = descriptor.title,
        badges = badge_row(descriptor),
        links = link_row(&descriptor.links),
        description = descriptor.description,
        screenshots = screenshot_section(&descriptor.screenshots),
    )
}

fn badge_row(descriptor: &Descriptor) -> String {
    Badge::ALL
        .into_iter()
        .filter(|b| descriptor.has_badge(*b))
        .map(Badge::fragment)
        .collect()
}

fn link_row(links: &[Link]) -> String {
    let separator = format!("\n  {}\n  ", LINK_SEPARATOR);
    links
        .iter()
        .map(|link| format!(r#"<a href="{}">{}</a>"#, link.url, link.label))
        .collect::<Vec<_>>()
        .join(&separator)
}

fn screenshot_section(screenshots: &[String]) -> String {
    screenshots
        .iter()
        .enumerate()
        .map(|(i, src)| format!(r#"<img width="1280" alt="Screenshot {}" src="{}" />"#, i + 1, src))
        .collect::<Vec<_>>()
        .join("\n")
}
