//! Field resolution: merge source fragments into one canonical profile.
//!
//! Each canonical field has a [`FieldPolicy`] listing the sources allowed to
//! supply it, in priority order. The first source that reports the field
//! wins; when none does, the field stays [`Resolved::Unknown`].

use profilescout_readers::{Source, SourceFragments};
use profilescout_shared::{CanonicalProfile, MaybeEmpty, ProfileFragment, Resolved};
use tracing::trace;

/// Priority policy for one canonical field.
pub struct FieldPolicy<T> {
    /// Field name for tracing.
    pub name: &'static str,
    /// Sources consulted, highest priority first.
    pub order: &'static [Source],
    /// Reads the field from a fragment.
    pub get: fn(&ProfileFragment) -> Option<&T>,
}

impl<T: Clone + MaybeEmpty> FieldPolicy<T> {
    /// The winning source and its value, if any source reported the field.
    pub fn winner<'f>(&self, fragments: &'f SourceFragments) -> Option<(Source, &'f T)> {
        self.order
            .iter()
            .find_map(|&source| (self.get)(fragments.get(source)).map(|value| (source, value)))
    }

    pub fn resolve(&self, fragments: &SourceFragments) -> Resolved<T> {
        match self.winner(fragments) {
            Some((source, value)) => {
                trace!(field = self.name, %source, "field resolved");
                Resolved::present(value.clone())
            }
            None => Resolved::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Policies
// ---------------------------------------------------------------------------

pub const FULL_NAME: FieldPolicy<String> = FieldPolicy {
    name: "full_name",
    order: &[Source::BootData, Source::StructuredMetadata],
    get: |f| f.full_name.as_ref(),
};

/// Boot data carries a biography too, but it only feeds the contact corpus.
pub const BIO_TEXT: FieldPolicy<String> = FieldPolicy {
    name: "bio_text",
    order: &[Source::StructuredMetadata, Source::MetaTags],
    get: |f| f.bio_text.as_ref(),
};

pub const PROFILE_PIC_URL: FieldPolicy<String> = FieldPolicy {
    name: "profile_pic_url",
    order: &[Source::BootData, Source::StructuredMetadata, Source::MetaTags],
    get: |f| f.profile_pic_url.as_ref(),
};

pub const EXTERNAL_URL: FieldPolicy<String> = FieldPolicy {
    name: "external_url",
    order: &[Source::StructuredMetadata],
    get: |f| f.external_url.as_ref(),
};

pub const IS_VERIFIED: FieldPolicy<bool> = FieldPolicy {
    name: "is_verified",
    order: &[Source::BootData],
    get: |f| f.is_verified.as_ref(),
};

pub const IS_PRIVATE: FieldPolicy<bool> = FieldPolicy {
    name: "is_private",
    order: &[Source::BootData],
    get: |f| f.is_private.as_ref(),
};

pub const FOLLOWERS_COUNT: FieldPolicy<u64> = FieldPolicy {
    name: "followers_count",
    order: &[Source::BootData],
    get: |f| f.followers_count.as_ref(),
};

pub const FOLLOWING_COUNT: FieldPolicy<u64> = FieldPolicy {
    name: "following_count",
    order: &[Source::BootData],
    get: |f| f.following_count.as_ref(),
};

pub const POSTS_COUNT: FieldPolicy<u64> = FieldPolicy {
    name: "posts_count",
    order: &[Source::BootData],
    get: |f| f.posts_count.as_ref(),
};

pub const RECENT_CAPTIONS: FieldPolicy<Vec<String>> = FieldPolicy {
    name: "recent_captions",
    order: &[Source::BootData],
    get: |f| f.recent_captions.as_ref(),
};

/// Order in which bio-like text from every source enters the corpus.
const CORPUS_SOURCES: [Source; 3] = [Source::StructuredMetadata, Source::MetaTags, Source::BootData];

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Merge fragments into the canonical profile.
pub fn resolve(fragments: &SourceFragments) -> CanonicalProfile {
    CanonicalProfile {
        full_name: FULL_NAME.resolve(fragments),
        bio_text: BIO_TEXT.resolve(fragments),
        profile_pic_url: PROFILE_PIC_URL.resolve(fragments),
        external_url: EXTERNAL_URL.resolve(fragments),
        is_verified: IS_VERIFIED.resolve(fragments),
        is_private: IS_PRIVATE.resolve(fragments),
        followers_count: FOLLOWERS_COUNT.resolve(fragments),
        following_count: FOLLOWING_COUNT.resolve(fragments),
        posts_count: POSTS_COUNT.resolve(fragments),
        recent_captions: RECENT_CAPTIONS
            .resolve(fragments)
            .value()
            .cloned()
            .unwrap_or_default(),
    }
}

/// All free text worth scanning for contacts, newline-joined.
///
/// Includes the bio reported by *every* source, not just the one that won
/// `bio_text`, followed by every non-empty caption.
pub fn free_text_corpus(fragments: &SourceFragments) -> String {
    let bios = CORPUS_SOURCES
        .iter()
        .filter_map(|&source| fragments.get(source).bio_text.as_deref());
    let captions = CORPUS_SOURCES
        .iter()
        .filter_map(|&source| fragments.get(source).recent_captions.as_deref())
        .flatten()
        .map(String::as_str);

    bios.chain(captions)
        .filter(|text| !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
