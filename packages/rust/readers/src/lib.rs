//! Page snapshot building and profile source readers.
//!
//! This crate provides:
//! - [`snapshot`]: Locates embedded data scripts in rendered HTML
//! - [`sources`]: The three source readers and [`ReaderRegistry`]
//! - [`deep_search`]: Cycle-safe, deterministic search over JSON-like graphs

pub mod deep_search;
pub mod snapshot;
pub mod sources;

pub use deep_search::{SearchNode, find_first};
pub use snapshot::snapshot_from_html;
pub use sources::{
    BootDataReader, MetaTagReader, ReaderRegistry, Source, SourceFragments, SourceReader,
    StructuredMetadataReader,
};

#[cfg(test)]
mod tests {
    use super::*;
    use profilescout_shared::RawPageSnapshot;

    fn load_fixture(name: &str) -> RawPageSnapshot {
        let path = format!("../../../fixtures/html/{name}");
        let content = std::fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("missing fixture: {path}"));
        snapshot_from_html(&content)
    }

    // -----------------------------------------------------------------------
    // Full profile page
    // -----------------------------------------------------------------------

    #[test]
    fn full_page_structured_metadata() {
        let snapshot = load_fixture("profile_full.html");
        let fragment = StructuredMetadataReader.read(&snapshot);

        assert_eq!(fragment.full_name.as_deref(), Some("Ada Lovelace (@ada)"));
        assert_eq!(fragment.external_url.as_deref(), Some("https://ada.example.org"));
        assert!(fragment.bio_text.as_deref().unwrap().contains("bookings@ada.example.org"));
        assert!(fragment.followers_count.is_none());
    }

    #[test]
    fn full_page_meta_tags() {
        let snapshot = load_fixture("profile_full.html");
        let fragment = MetaTagReader.read(&snapshot);

        assert_eq!(fragment.profile_pic_url.as_deref(), Some("https://cdn.example.com/ada_og.jpg"));
        assert!(fragment.bio_text.as_deref().unwrap().starts_with("1,204 Followers"));
    }

    #[test]
    fn full_page_boot_data_skips_viewer() {
        let snapshot = load_fixture("profile_full.html");
        let fragment = BootDataReader.read(&snapshot);

        // The viewer record has no boolean flags, so the profile user is chosen.
        assert_eq!(fragment.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(fragment.is_verified, Some(true));
        assert_eq!(fragment.is_private, Some(false));
        assert_eq!(fragment.followers_count, Some(1204));
        assert_eq!(fragment.following_count, Some(87));
        assert_eq!(fragment.posts_count, Some(42));
        assert_eq!(fragment.profile_pic_url.as_deref(), Some("https://cdn.example.com/ada_hd.jpg"));

        let captions = fragment.recent_captions.unwrap();
        assert_eq!(captions.len(), 3);
        assert_eq!(captions[1], "");
    }

    #[test]
    fn registry_reads_every_source() {
        let snapshot = load_fixture("profile_full.html");
        let fragments = ReaderRegistry::new().read_all(&snapshot);

        assert!(!fragments.get(Source::StructuredMetadata).is_empty());
        assert!(!fragments.get(Source::MetaTags).is_empty());
        assert!(!fragments.get(Source::BootData).is_empty());
        assert!(!fragments.all_empty());
    }

    // -----------------------------------------------------------------------
    // Degraded pages
    // -----------------------------------------------------------------------

    #[test]
    fn meta_only_page() {
        let snapshot = load_fixture("profile_meta_only.html");
        let fragments = ReaderRegistry::new().read_all(&snapshot);

        assert!(fragments.structured_metadata.is_empty());
        assert!(fragments.boot_data.is_empty());
        assert_eq!(fragments.meta_tags.bio_text.as_deref(), Some("contact: joe@x.co"));
    }

    #[test]
    fn login_wall_yields_nothing() {
        let snapshot = load_fixture("login_wall.html");
        let fragments = ReaderRegistry::new().read_all(&snapshot);
        assert!(fragments.all_empty());
    }
}
