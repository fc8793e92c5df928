//! Build a [`RawPageSnapshot`] from rendered HTML.

use profilescout_shared::RawPageSnapshot;
use scraper::{ElementRef, Html, Selector};

/// Prefix of the classic boot-data assignment script.
const SHARED_DATA_PREFIX: &str = "window._sharedData";

/// Locate the embedded data scripts in `html` and package everything as a snapshot.
///
/// Structured metadata is the first non-empty `application/ld+json` script.
/// Boot data is the first script assigning `window._sharedData`, or failing
/// that, the first `application/json` script mentioning a `"username"` key.
pub fn snapshot_from_html(html: &str) -> RawPageSnapshot {
    let doc = Html::parse_document(html);

    let ld_sel = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();
    let structured_metadata = doc
        .select(&ld_sel)
        .map(script_text)
        .find(|text| !text.trim().is_empty());

    let script_sel = Selector::parse("script").unwrap();
    let json_sel = Selector::parse(r#"script[type="application/json"]"#).unwrap();
    let boot_data = doc
        .select(&script_sel)
        .map(script_text)
        .find(|text| text.trim_start().starts_with(SHARED_DATA_PREFIX))
        .or_else(|| {
            doc.select(&json_sel)
                .map(script_text)
                .find(|text| text.contains("\"username\""))
        });

    RawPageSnapshot {
        dom: html.to_string(),
        structured_metadata,
        boot_data,
        fetch_warning: None,
    }
}

fn script_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_both_scripts() {
        let html = r#"<html><head>
            <script type="application/ld+json">  </script>
            <script type="application/ld+json">{"name": "Ada"}</script>
            <script>console.log("noise")</script>
            <script>window._sharedData = {"user": {}};</script>
        </head></html>"#;

        let snapshot = snapshot_from_html(html);
        assert_eq!(snapshot.structured_metadata.as_deref(), Some(r#"{"name": "Ada"}"#));
        assert_eq!(
            snapshot.boot_data.as_deref(),
            Some(r#"window._sharedData = {"user": {}};"#)
        );
        assert!(snapshot.fetch_warning.is_none());
        assert_eq!(snapshot.dom, html);
    }

    #[test]
    fn json_script_fallback_for_boot_data() {
        let html = r#"<html><body>
            <script type="application/json">{"theme": "dark"}</script>
            <script type="application/json">{"data": {"username": "ada"}}</script>
        </body></html>"#;

        let snapshot = snapshot_from_html(html);
        assert!(snapshot.structured_metadata.is_none());
        assert_eq!(
            snapshot.boot_data.as_deref(),
            Some(r#"{"data": {"username": "ada"}}"#)
        );
    }

    #[test]
    fn plain_page_has_no_scripts() {
        let snapshot = snapshot_from_html("<html><body><p>hi</p></body></html>");
        assert!(snapshot.structured_metadata.is_none());
        assert!(snapshot.boot_data.is_none());
    }
}
