//! Embedded boot-data reader.
//!
//! The boot payload has no stable schema, so the reader searches the whole
//! value for the first object shaped like a user record and maps that.

use profilescout_shared::{MAX_RECENT_CAPTIONS, ProfileFragment, RawPageSnapshot};
use serde_json::Value;

use super::{Source, SourceReader};
use crate::deep_search::find_first;

/// Boolean keys that mark a user record (at least one must be present).
const USER_FLAG_KEYS: [&str; 2] = ["is_verified", "is_private"];

/// Reads the application boot data script.
pub struct BootDataReader;

impl SourceReader for BootDataReader {
    fn source(&self) -> Source {
        Source::BootData
    }

    fn read(&self, snapshot: &RawPageSnapshot) -> ProfileFragment {
        let Some(root) = snapshot.boot_data.as_deref().and_then(parse_boot_data) else {
            return ProfileFragment::default();
        };

        match find_first(&root, is_user_shaped) {
            Some(user) => fragment_from_user(user),
            None => ProfileFragment::default(),
        }
    }
}

/// Parse the boot payload, tolerating an assignment wrapper such as
/// `window._sharedData = {...};`.
pub(crate) fn parse_boot_data(raw: &str) -> Option<Value> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Some(value);
    }

    let start = trimmed.find(|c: char| c == '{' || c == '[')?;
    let body = trimmed[start..].trim_end().trim_end_matches(';');
    serde_json::from_str(body).ok()
}

/// A user record has a non-null `username` and a boolean verification or
/// privacy flag.
fn is_user_shaped(node: &Value) -> bool {
    let Some(obj) = node.as_object() else {
        return false;
    };

    let has_username = obj.get("username").is_some_and(|v| !v.is_null());
    let has_flag = USER_FLAG_KEYS
        .iter()
        .any(|key| obj.get(*key).is_some_and(Value::is_boolean));

    has_username && has_flag
}

fn fragment_from_user(user: &Value) -> ProfileFragment {
    ProfileFragment {
        full_name: string_field(user, "full_name"),
        bio_text: string_field(user, "biography"),
        profile_pic_url: string_field(user, "profile_pic_url_hd")
            .or_else(|| string_field(user, "profile_pic_url")),
        external_url: None,
        is_verified: user.get("is_verified").and_then(Value::as_bool),
        is_private: user.get("is_private").and_then(Value::as_bool),
        followers_count: count(user, "edge_followed_by", "follower_count"),
        following_count: count(user, "edge_follow", "following_count"),
        posts_count: count(user, "edge_owner_to_timeline_media", "media_count"),
        recent_captions: recent_captions(user),
    }
}

fn string_field(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(String::from)
}

/// `<edge>.count`, falling back to the flat `<flat>` field when the nested
/// count is missing or not a non-negative integer.
fn count(node: &Value, edge: &str, flat: &str) -> Option<u64> {
    node.get(edge)
        .and_then(|e| e.get("count"))
        .and_then(Value::as_u64)
        .or_else(|| node.get(flat).and_then(Value::as_u64))
}

fn recent_captions(user: &Value) -> Option<Vec<String>> {
    let edges = user
        .get("edge_owner_to_timeline_media")
        .and_then(|media| media.get("edges"))
        .and_then(Value::as_array)?;

    Some(
        edges
            .iter()
            .take(MAX_RECENT_CAPTIONS)
            .map(|edge| {
                edge.pointer("/node/edge_media_to_caption/edges/0/node/text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(raw: &str) -> ProfileFragment {
        BootDataReader.read(&RawPageSnapshot::default().with_boot_data(raw))
    }

    fn caption_edge(text: &str) -> String {
        format!(r#"{{"node": {{"edge_media_to_caption": {{"edges": [{{"node": {{"text": "{text}"}}}}]}}}}}}"#)
    }

    #[test]
    fn minimal_user_node() {
        let fragment = read(
            r#"{"username": "a", "is_verified": true, "is_private": false,
                "edge_followed_by": {"count": 10}}"#,
        );
        assert_eq!(fragment.is_verified, Some(true));
        assert_eq!(fragment.is_private, Some(false));
        assert_eq!(fragment.followers_count, Some(10));
        assert_eq!(fragment.following_count, None);
        assert_eq!(fragment.recent_captions, None);
    }

    #[test]
    fn nested_user_with_full_mapping() {
        let raw = format!(
            r#"window._sharedData = {{
                "config": {{"viewer": null}},
                "entry_data": {{"ProfilePage": [{{"graphql": {{"user": {{
                    "username": "ada",
                    "full_name": "Ada L.",
                    "biography": "math · ada@example.org",
                    "is_verified": false,
                    "profile_pic_url": "https://cdn.example.com/sd.jpg",
                    "profile_pic_url_hd": "https://cdn.example.com/hd.jpg",
                    "edge_followed_by": {{"count": "lots"}},
                    "follower_count": 1200,
                    "edge_follow": {{"count": 3}},
                    "edge_owner_to_timeline_media": {{
                        "count": 2,
                        "edges": [{}, {{"node": {{}}}}]
                    }}
                }}}}}}]}}
            }};"#,
            caption_edge("first post")
        );

        let fragment = read(&raw);
        assert_eq!(fragment.full_name.as_deref(), Some("Ada L."));
        assert_eq!(fragment.bio_text.as_deref(), Some("math · ada@example.org"));
        assert_eq!(fragment.profile_pic_url.as_deref(), Some("https://cdn.example.com/hd.jpg"));
        assert_eq!(fragment.is_verified, Some(false));
        assert_eq!(fragment.is_private, None);
        assert_eq!(fragment.followers_count, Some(1200));
        assert_eq!(fragment.following_count, Some(3));
        assert_eq!(fragment.posts_count, Some(2));
        assert_eq!(
            fragment.recent_captions,
            Some(vec!["first post".to_string(), String::new()])
        );
    }

    #[test]
    fn captions_capped_at_six() {
        let edges: Vec<String> = (0..9).map(|i| caption_edge(&format!("post {i}"))).collect();
        let raw = format!(
            r#"{{"username": "u", "is_private": true,
                "edge_owner_to_timeline_media": {{"edges": [{}]}}}}"#,
            edges.join(",")
        );
        let captions = read(&raw).recent_captions.unwrap();
        assert_eq!(captions.len(), MAX_RECENT_CAPTIONS);
        assert_eq!(captions[5], "post 5");
    }

    #[test]
    fn first_user_shaped_node_wins_deterministically() {
        let raw = r#"{
            "viewer": {"username": "me", "is_verified": false, "full_name": "Viewer"},
            "profile": {"username": "them", "is_verified": true, "full_name": "Target"}
        }"#;
        let first = read(raw);
        for _ in 0..5 {
            assert_eq!(read(raw), first);
        }
        assert_eq!(first.full_name.as_deref(), Some("Viewer"));
    }

    #[test]
    fn non_qualifying_nodes_skipped() {
        // null username, and a username without a boolean flag
        let raw = r#"{
            "a": {"username": null, "is_private": true, "full_name": "No"},
            "b": {"username": "x", "is_private": "yes", "full_name": "No"},
            "c": {"username": "y", "is_private": true, "full_name": "Yes"}
        }"#;
        assert_eq!(read(raw).full_name.as_deref(), Some("Yes"));
    }

    #[test]
    fn no_match_or_malformed_yields_empty() {
        assert!(read(r#"{"data": {"username": "x"}}"#).is_empty());
        assert!(read("window.__bad = {oops").is_empty());
        assert!(read("").is_empty());
        assert!(BootDataReader.read(&RawPageSnapshot::default()).is_empty());
    }
}
