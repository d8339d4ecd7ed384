//! Chooses between the rendered preview and the raw markup.

use crate::rendering::{self, RenderedView};
use crate::Viewport;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Rendered,
    Raw,
}

impl ViewMode {
    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Rendered => "Markdown Preview",
            ViewMode::Raw => "Markdown Code",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ViewMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rendered" | "preview" => Ok(ViewMode::Rendered),
            "raw" | "code" => Ok(ViewMode::Raw),
            other => Err(crate::Error::Other(format!("Unknown view mode: {}", other))),
        }
    }
}

/// What the user sees for one piece of markup
#[derive(Debug, Clone)]
pub enum View {
    Rendered(RenderedView),
    Raw(String),
}

impl View {
    /// Text to print for this view
    pub fn as_text(&self) -> &str {
        match self {
            View::Rendered(r) => &r.text,
            View::Raw(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewCoordinator {
    mode: ViewMode,
}

impl ViewCoordinator {
    pub fn new(mode: ViewMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn toggle(&mut self) -> ViewMode {
        self.mode = match self.mode {
            ViewMode::Rendered => ViewMode::Raw,
            ViewMode::Raw => ViewMode::Rendered,
        };
        self.mode
    }

    /// Present `markup` in the current mode; the raw view is the text verbatim
    pub fn present(&self, markup: &str, viewport: Viewport) -> View {
        match self.mode {
            ViewMode::Rendered => View::Rendered(rendering::render(markup, viewport)),
            ViewMode::Raw => View::Raw(markup.to_string()),
        }
    }
}
