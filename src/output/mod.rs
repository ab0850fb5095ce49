//! Output module for persisting and shipping crawl results
//!
//! This module handles:
//! - Writing the run's listing collection as an indented JSON artifact
//! - Resolving upload destinations from a token template
//! - The upload collaborator seam and its filesystem implementation

mod destination;
mod upload;

pub use destination::resolve_destination;
pub use upload::{FsUploader, Uploader};

use std::path::Path;

use crate::listing::Listing;
use crate::Result;

/// Writes the listing collection as pretty-printed JSON.
///
/// The field names in the artifact are the listing model's JSON aliases,
/// so the output stays byte-compatible with the feed's consumers.
pub fn write_listings(listings: &[Listing], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(listings)?;
    std::fs::write(path, json)?;

    tracing::info!(
        path = %path.display(),
        listings = listings.len(),
        "wrote listing artifact"
    );
    Ok(())
}
