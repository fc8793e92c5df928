//! Source reader trait and the three built-in readers.
//!
//! Each reader looks at one embedded data source of the page snapshot and
//! reports whatever profile fields it can find. Readers are total: malformed
//! or missing input yields an empty fragment, never an error.

mod boot_data;
mod meta_tags;
mod structured;

use profilescout_shared::{ProfileFragment, RawPageSnapshot};
use tracing::debug;

pub use boot_data::BootDataReader;
pub use meta_tags::MetaTagReader;
pub use structured::StructuredMetadataReader;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Identifies which data source a fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// `application/ld+json` structured metadata.
    StructuredMetadata,
    /// OpenGraph `<meta>` tags.
    MetaTags,
    /// Embedded application boot data.
    BootData,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StructuredMetadata => "structured-metadata",
            Self::MetaTags => "meta-tags",
            Self::BootData => "boot-data",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for extracting a partial profile from one embedded data source.
pub trait SourceReader: Send + Sync {
    /// The data source this reader consumes.
    fn source(&self) -> Source;

    /// Read a fragment from the snapshot. Must never panic on any input.
    fn read(&self, snapshot: &RawPageSnapshot) -> ProfileFragment;

    /// Human-readable reader name for tracing.
    fn name(&self) -> &str {
        self.source().as_str()
    }
}

// ---------------------------------------------------------------------------
// Fragments
// ---------------------------------------------------------------------------

/// One fragment per source, as produced by a full reader pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFragments {
    pub structured_metadata: ProfileFragment,
    pub meta_tags: ProfileFragment,
    pub boot_data: ProfileFragment,
}

impl SourceFragments {
    /// The fragment produced by `source`.
    pub fn get(&self, source: Source) -> &ProfileFragment {
        match source {
            Source::StructuredMetadata => &self.structured_metadata,
            Source::MetaTags => &self.meta_tags,
            Source::BootData => &self.boot_data,
        }
    }

    fn set(&mut self, source: Source, fragment: ProfileFragment) {
        match source {
            Source::StructuredMetadata => self.structured_metadata = fragment,
            Source::MetaTags => self.meta_tags = fragment,
            Source::BootData => self.boot_data = fragment,
        }
    }

    /// `true` when no reader found anything.
    pub fn all_empty(&self) -> bool {
        self.structured_metadata.is_empty() && self.meta_tags.is_empty() && self.boot_data.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Holds the registered readers.
///
/// Readers only share the immutable snapshot, so their order has no
/// observable effect on the result.
pub struct ReaderRegistry {
    readers: Vec<Box<dyn SourceReader>>,
}

impl ReaderRegistry {
    /// Create a registry with all built-in readers.
    pub fn new() -> Self {
        Self {
            readers: vec![
                Box::new(StructuredMetadataReader),
                Box::new(MetaTagReader),
                Box::new(BootDataReader),
            ],
        }
    }

    /// Run every reader against the snapshot.
    pub fn read_all(&self, snapshot: &RawPageSnapshot) -> SourceFragments {
        let mut fragments = SourceFragments::default();

        for reader in &self.readers {
            let fragment = reader.read(snapshot);
            debug!(
                reader = reader.name(),
                empty = fragment.is_empty(),
                "source reader finished"
            );
            fragments.set(reader.source(), fragment);
        }

        fragments
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
