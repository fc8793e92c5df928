//! OpenGraph meta-tag reader (fallback of last resort).

use profilescout_shared::{ProfileFragment, RawPageSnapshot};
use scraper::{Html, Selector};

use super::{Source, SourceReader};

/// Reads `og:image` and `og:description` from the DOM.
pub struct MetaTagReader;

impl SourceReader for MetaTagReader {
    fn source(&self) -> Source {
        Source::MetaTags
    }

    fn read(&self, snapshot: &RawPageSnapshot) -> ProfileFragment {
        if snapshot.dom.trim().is_empty() {
            return ProfileFragment::default();
        }

        let doc = Html::parse_document(&snapshot.dom);
        ProfileFragment {
            profile_pic_url: meta_property(&doc, "og:image"),
            bio_text: meta_property(&doc, "og:description"),
            ..ProfileFragment::default()
        }
    }
}

/// Content of the first `<meta property="...">` tag with the given property.
fn meta_property(doc: &Html, property: &str) -> Option<String> {
    let sel = Selector::parse(&format!(r#"meta[property="{property}"]"#)).ok()?;
    doc.select(&sel)
        .find_map(|el| el.value().attr("content"))
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_both_tags() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://cdn.example.com/pic.jpg">
            <meta property="og:description" content="contact: joe@x.co &amp; friends">
        </head><body></body></html>"#;

        let fragment = MetaTagReader.read(&RawPageSnapshot::new(html));
        assert_eq!(fragment.profile_pic_url.as_deref(), Some("https://cdn.example.com/pic.jpg"));
        assert_eq!(fragment.bio_text.as_deref(), Some("contact: joe@x.co & friends"));
        assert!(fragment.full_name.is_none());
    }

    #[test]
    fn missing_tags_stay_absent() {
        let html = r#"<html><head><meta name="description" content="not og"></head></html>"#;
        let fragment = MetaTagReader.read(&RawPageSnapshot::new(html));
        assert!(fragment.is_empty());
    }

    #[test]
    fn garbage_dom_is_harmless() {
        assert!(MetaTagReader.read(&RawPageSnapshot::new("<<<>>> {]")).is_empty());
        assert!(MetaTagReader.read(&RawPageSnapshot::default()).is_empty());
    }
}
