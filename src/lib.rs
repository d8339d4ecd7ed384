//! readmegen
//!
//! Generates a project README from a small descriptor (title, description,
//! logo, badges, links, screenshots), previews it, and exports it.
//!
//! # Pipeline
//!
//! - [`template::generate`]: descriptor to markup text. Pure and total.
//! - [`markup::parse`]: markup text to a node tree. Never fails; raw layout
//!   tags and line-oriented markup may be mixed freely.
//! - [`markup::classify`]: assigns each node a [`markup::Role`] and the
//!   fixed [`markup::Treatment`] for that role.
//! - [`rendering`]: lays out and paints the classified tree.
//! - [`view`]: picks the rendered preview or the raw markup.
//!
//! Background collaborators (profile lookup, image ingestion) live in
//! [`platform`] and reach the descriptor only through [`session::Session`].
//!
//! # Example
//!
//! ```
//! use readmegen::descriptor::{Descriptor, Link};
//!
//! let d = Descriptor {
//!     title: "Demo".to_string(),
//!     links: vec![Link::new("Docs", "https://docs.example")],
//!     ..Default::default()
//! };
//! let text = readmegen::generate(&d);
//! assert!(text.contains("<h1 align=\"center\">Demo</h1>"));
//!
//! let doc = readmegen::markup::parse(&text);
//! assert!(doc.flatten().contains("Docs <https://docs.example>"));
//! ```

pub mod descriptor;
pub mod error;
pub mod markup;
pub mod platform;
pub mod rendering;
pub mod session;
pub mod template;
pub mod view;

pub use descriptor::{Badge, Descriptor, DescriptorStore, Link, Patch};
pub use error::{Error, Result};
pub use session::Session;
pub use template::generate;
pub use view::{View, ViewCoordinator, ViewMode};

/// Default profile API
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Settings for previewing, looking up profiles and exporting.
///
/// # Examples
///
/// ```
/// let cfg = readmegen::PreviewConfig::default();
/// assert_eq!(cfg.export_file_name, "README.md");
/// ```
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Size of the rendered preview
    pub viewport: Viewport,
    /// Base URL of the profile API; `/users/{handle}` is appended
    pub api_base: String,
    /// User agent sent with profile lookups
    pub user_agent: String,
    /// Timeout for profile lookups in milliseconds
    pub timeout_ms: u64,
    /// Name of the exported file
    pub export_file_name: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: format!("readmegen/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 10000,
            export_file_name: "README.md".to_string(),
        }
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
