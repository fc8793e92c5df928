//! Core domain types for profile extraction.

use serde::{Serialize, Serializer};

/// Maximum number of recent post captions kept per profile.
pub const MAX_RECENT_CAPTIONS: usize = 6;

// ---------------------------------------------------------------------------
// RawPageSnapshot
// ---------------------------------------------------------------------------

/// Everything the page-fetch step hands to the extraction pipeline.
///
/// Produced once per request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPageSnapshot {
    /// Rendered DOM serialized as HTML.
    pub dom: String,
    /// Raw text of the `application/ld+json` script, if the page had one.
    pub structured_metadata: Option<String>,
    /// Raw text of the boot-data script, if the page had one.
    pub boot_data: Option<String>,
    /// Fetch-level error that happened while the DOM could still be read
    /// (e.g. a navigation timeout after a partial render).
    pub fetch_warning: Option<String>,
}

impl RawPageSnapshot {
    /// Snapshot holding only a DOM.
    pub fn new(dom: impl Into<String>) -> Self {
        Self {
            dom: dom.into(),
            ..Self::default()
        }
    }

    pub fn with_structured_metadata(mut self, text: impl Into<String>) -> Self {
        self.structured_metadata = Some(text.into());
        self
    }

    pub fn with_boot_data(mut self, text: impl Into<String>) -> Self {
        self.boot_data = Some(text.into());
        self
    }

    pub fn with_fetch_warning(mut self, warning: impl Into<String>) -> Self {
        self.fetch_warning = Some(warning.into());
        self
    }
}

// ---------------------------------------------------------------------------
// ProfileFragment
// ---------------------------------------------------------------------------

/// Partial profile reported by a single source reader.
///
/// Every field is independently optional; `None` means "this source said
/// nothing about the field".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileFragment {
    pub full_name: Option<String>,
    pub bio_text: Option<String>,
    pub profile_pic_url: Option<String>,
    pub external_url: Option<String>,
    pub is_verified: Option<bool>,
    pub is_private: Option<bool>,
    pub followers_count: Option<u64>,
    pub following_count: Option<u64>,
    pub posts_count: Option<u64>,
    pub recent_captions: Option<Vec<String>>,
}

impl ProfileFragment {
    /// `true` when the source reported nothing at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

// ---------------------------------------------------------------------------
// Resolved
// ---------------------------------------------------------------------------

/// Values that can be "present but empty" (an empty string, an empty list).
pub trait MaybeEmpty {
    fn is_empty_value(&self) -> bool;
}

impl MaybeEmpty for String {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl MaybeEmpty for bool {
    fn is_empty_value(&self) -> bool {
        false
    }
}

impl MaybeEmpty for u64 {
    fn is_empty_value(&self) -> bool {
        false
    }
}

impl<T> MaybeEmpty for Vec<T> {
    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

/// Outcome of resolving one canonical field.
///
/// `Empty` and `Unknown` are deliberately distinct: a source that reported
/// `""` is not the same as no source reporting anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Resolved<T> {
    /// A source supplied a concrete value.
    Value(T),
    /// A source supplied a value, and it was empty.
    Empty,
    /// No source supplied the field.
    #[default]
    Unknown,
}

impl<T: MaybeEmpty> Resolved<T> {
    /// Classify a value some source reported.
    pub fn present(value: T) -> Self {
        if value.is_empty_value() {
            Self::Empty
        } else {
            Self::Value(value)
        }
    }
}

impl<T> Resolved<T> {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Borrow the concrete value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Empty | Self::Unknown => None,
        }
    }
}

impl<T: MaybeEmpty> From<Option<T>> for Resolved<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unknown, Self::present)
    }
}

/// `Value` serializes as the value, `Empty` as the type's empty default
/// (`""`, `[]`), and `Unknown` as `null`.
impl<T: Serialize + Default> Serialize for Resolved<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            Self::Empty => T::default().serialize(serializer),
            Self::Unknown => serializer.serialize_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// CanonicalProfile
// ---------------------------------------------------------------------------

/// The merged profile record after field resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalProfile {
    pub full_name: Resolved<String>,
    pub bio_text: Resolved<String>,
    pub profile_pic_url: Resolved<String>,
    pub external_url: Resolved<String>,
    pub is_verified: Resolved<bool>,
    pub is_private: Resolved<bool>,
    pub followers_count: Resolved<u64>,
    pub following_count: Resolved<u64>,
    pub posts_count: Resolved<u64>,
    pub recent_captions: Vec<String>,
}

// ---------------------------------------------------------------------------
// ContactSet
// ---------------------------------------------------------------------------

/// Contact identifiers found in profile free text.
///
/// Both lists keep first-seen order and never contain exact duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactSet {
    pub emails: Vec<String>,
    pub phones: Vec<String>,
}

impl ContactSet {
    /// Record an email unless an identical one was already seen.
    pub fn add_email(&mut self, email: impl Into<String>) {
        push_unique(&mut self.emails, email.into());
    }

    /// Record an already-normalized phone unless it was already seen.
    pub fn add_phone(&mut self, phone: impl Into<String>) {
        push_unique(&mut self.phones, phone.into());
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty() && self.phones.is_empty()
    }
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}
