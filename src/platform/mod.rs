//! Collaborators around the core: profile lookup, image ingestion, export.
//!
//! Each one either produces a descriptor [`Patch`](crate::descriptor::Patch)
//! or consumes generated markup; none of them touches the descriptor
//! directly.

pub mod export;
pub mod images;
pub mod profile;

pub use export::{write_readme, ExportReport};
pub use images::{encode_data_uri, ingest_image, mime_for_path, UploadSlot};
pub use profile::{resolve_profile, GithubProfileLookup, NoopProfileLookup, ProfileLookup};
