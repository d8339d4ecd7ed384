//! Document descriptor and the store that owns it.
//!
//! A `Descriptor` is an immutable value. Every edit is expressed as a
//! [`Patch`]; applying a patch produces a fresh descriptor which replaces the
//! previous one wholesale, so readers always observe a complete value.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Label/url pair rendered in the link bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

impl Default for Link {
    /// The entry the form adds when the user asks for another link
    fn default() -> Self {
        Self::new("Custom Link", "#")
    }
}

/// Fixed badge vocabulary.
///
/// Variant order is the canonical order in which badge fragments are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "PWA")]
    Pwa,
}

impl Badge {
    /// Every badge, in canonical order
    pub const ALL: [Badge; 1] = [Badge::Pwa];

    /// Identifier shown to the user and stored in descriptor files
    pub fn label(self) -> &'static str {
        match self {
            Badge::Pwa => "PWA",
        }
    }

    /// Raw markup fragment emitted into the badge row
    pub fn fragment(self) -> &'static str {
        match self {
            Badge::Pwa => {
                r#"<img src="https://www.pwa-shields.com/1.0.0/series/certified/purple.svg" alt="PWA Shields" height="20">"#
            }
        }
    }

    /// Substring of the image service URI that identifies this badge in a preview
    pub fn service_marker(self) -> &'static str {
        match self {
            Badge::Pwa => "pwa-shields.com",
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Badge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Badge::ALL
            .into_iter()
            .find(|b| b.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Other(format!("Unknown badge: {}", s)))
    }
}

/// Which link field an edit targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Label,
    Url,
}

/// The structured state describing the README to generate
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Descriptor {
    pub title: String,
    pub description: String,
    pub author_handle: String,
    /// URI or data URI of the logo; empty means "use the placeholder"
    pub logo_ref: String,
    pub badges: BTreeSet<Badge>,
    pub links: Vec<Link>,
    pub screenshots: Vec<String>,
    /// Set while a profile lookup is in flight. Never rendered or saved.
    #[serde(skip)]
    pub loading: bool,
}

impl Descriptor {
    /// The project the editor opens with
    pub fn sample() -> Self {
        Self {
            title: "ParsonLabs Music".to_string(),
            description: "ParsonLabs Music is the Self Hosted Audio streaming alternative to YouTube Music, Spotify & Apple Music, providing Unrestricted Access to your library in Uncompressed, Lossless Quality".to_string(),
            author_handle: "parsonlabs".to_string(),
            logo_ref: "https://avatars.githubusercontent.com/u/138057124?s=200&v=4".to_string(),
            badges: BTreeSet::from([Badge::Pwa]),
            links: vec![
                Link::new("Get Started", "#"),
                Link::new("Documentation", "https://docs.parsonlabs.com"),
                Link::new("Releases", "https://github.com/WillKirkmanM/music/releases"),
            ],
            screenshots: vec!["/music.png".to_string()],
            loading: false,
        }
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }

    /// Return a new descriptor with `patch` applied. `self` is left untouched.
    pub fn apply(&self, patch: &Patch) -> Descriptor {
        let mut next = self.clone();
        match patch {
            Patch::SetTitle(v) => next.title = v.clone(),
            Patch::SetDescription(v) => next.description = v.clone(),
            Patch::SetAuthorHandle(v) => next.author_handle = v.clone(),
            Patch::SetLogo(v) => next.logo_ref = v.clone(),
            Patch::ToggleBadge(b) => {
                if !next.badges.remove(b) {
                    next.badges.insert(*b);
                }
            }
            Patch::AddLink(link) => next.links.push(link.clone()),
            Patch::UpdateLink { index, field, value } => {
                if let Some(link) = next.links.get_mut(*index) {
                    match field {
                        LinkField::Label => link.label = value.clone(),
                        LinkField::Url => link.url = value.clone(),
                    }
                }
            }
            Patch::RemoveLink(index) => {
                // the editor always keeps one link row around
                if next.links.len() > 1 && *index < next.links.len() {
                    next.links.remove(*index);
                }
            }
            Patch::AddScreenshot(v) => next.screenshots.push(v.clone()),
            Patch::RemoveScreenshot(index) => {
                if *index < next.screenshots.len() {
                    next.screenshots.remove(*index);
                }
            }
            Patch::SetLoading(v) => next.loading = *v,
            Patch::ProfileResolved { avatar } => {
                if let Some(url) = avatar {
                    next.logo_ref = url.clone();
                }
                next.loading = false;
            }
            Patch::Replace(d) => next = (**d).clone(),
        }
        next
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// A single edit to the descriptor.
///
/// Patches are the only way to change a descriptor; collaborators running as
/// background tasks each resolve to exactly one patch.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    SetTitle(String),
    SetDescription(String),
    SetAuthorHandle(String),
    SetLogo(String),
    ToggleBadge(Badge),
    AddLink(Link),
    UpdateLink {
        index: usize,
        field: LinkField,
        value: String,
    },
    /// Ignored when it would remove the last remaining link
    RemoveLink(usize),
    AddScreenshot(String),
    RemoveScreenshot(usize),
    SetLoading(bool),
    /// Outcome of a profile lookup: merges the avatar if any and clears `loading`
    ProfileResolved { avatar: Option<String> },
    Replace(Box<Descriptor>),
}

/// Owner of the current descriptor value
#[derive(Debug, Clone, Default)]
pub struct DescriptorStore {
    current: Arc<Descriptor>,
    revision: u64,
}

impl DescriptorStore {
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            current: Arc::new(descriptor),
            revision: 0,
        }
    }

    /// Shared handle to the current value; later patches never alter it
    pub fn snapshot(&self) -> Arc<Descriptor> {
        Arc::clone(&self.current)
    }

    pub fn get(&self) -> &Descriptor {
        &self.current
    }

    /// Number of patches that changed the descriptor so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a patch, returning whether the descriptor changed
    pub fn apply(&mut self, patch: Patch) -> bool {
        let next = self.current.apply(&patch);
        if next == *self.current {
            log::debug!("{} left descriptor unchanged", patch_name(&patch));
            return false;
        }
        self.current = Arc::new(next);
        self.revision += 1;
        log::debug!("applied {} (revision {})", patch_name(&patch), self.revision);
        true
    }
}

fn patch_name(patch: &Patch) -> &'static str {
    match patch {
        Patch::SetTitle(_) => "SetTitle",
        Patch::SetDescription(_) => "SetDescription",
        Patch::SetAuthorHandle(_) => "SetAuthorHandle",
        Patch::SetLogo(_) => "SetLogo",
        Patch::ToggleBadge(_) => "ToggleBadge",
        Patch::AddLink(_) => "AddLink",
        Patch::UpdateLink { .. } => "UpdateLink",
        Patch::RemoveLink(_) => "RemoveLink",
        Patch::AddScreenshot(_) => "AddScreenshot",
        Patch::RemoveScreenshot(_) => "RemoveScreenshot",
        Patch::SetLoading(_) => "SetLoading",
        Patch::ProfileResolved { .. } => "ProfileResolved",
        Patch::Replace(_) => "Replace",
    }
}
