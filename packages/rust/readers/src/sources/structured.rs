//! JSON-LD structured metadata reader.

use profilescout_shared::{ProfileFragment, RawPageSnapshot};
use serde_json::{Map, Value};

use super::{Source, SourceReader};

/// Reads the `application/ld+json` document describing the profile.
///
/// Only ever reports `full_name`, `profile_pic_url`, `external_url` and
/// `bio_text`; counts and flags are not part of this vocabulary.
pub struct StructuredMetadataReader;

impl SourceReader for StructuredMetadataReader {
    fn source(&self) -> Source {
        Source::StructuredMetadata
    }

    fn read(&self, snapshot: &RawPageSnapshot) -> ProfileFragment {
        snapshot
            .structured_metadata
            .as_deref()
            .map(read_document)
            .unwrap_or_default()
    }
}

fn read_document(raw: &str) -> ProfileFragment {
    let Ok(doc) = serde_json::from_str::<Value>(raw.trim()) else {
        return ProfileFragment::default();
    };
    let Some(subject) = subject(&doc) else {
        return ProfileFragment::default();
    };

    ProfileFragment {
        full_name: lookup(subject, "name", string),
        bio_text: lookup(subject, "description", string),
        profile_pic_url: lookup(subject, "image", image_url),
        external_url: lookup(subject, "sameAs", first_string),
        ..ProfileFragment::default()
    }
}

/// The object describing the page's subject: the document itself, or the
/// first object when the document is a list.
fn subject(doc: &Value) -> Option<&Map<String, Value>> {
    match doc {
        Value::Object(map) => Some(map),
        Value::Array(items) => items.iter().find_map(Value::as_object),
        _ => None,
    }
}

/// Read `key` from the subject with `read`, falling back to a
/// `ProfilePage`'s `mainEntity` when the top level has no usable value.
fn lookup(
    subject: &Map<String, Value>,
    key: &str,
    read: fn(&Value) -> Option<String>,
) -> Option<String> {
    subject.get(key).and_then(read).or_else(|| {
        subject
            .get("mainEntity")
            .and_then(Value::as_object)
            .and_then(|entity| entity.get(key))
            .and_then(read)
    })
}

fn string(value: &Value) -> Option<String> {
    value.as_str().map(String::from)
}

/// `image` may be a URL string, an `ImageObject`, or a list of either.
fn image_url(value: &Value) -> Option<String> {
    match value {
        Value::String(url) => Some(url.clone()),
        Value::Object(obj) => obj.get("url").and_then(Value::as_str).map(String::from),
        Value::Array(items) => items.first().and_then(image_url),
        _ => None,
    }
}

fn first_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(Value::as_str).map(String::from),
        _ => None,
    }
}
