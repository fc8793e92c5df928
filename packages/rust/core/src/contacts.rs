//! Contact extraction: emails and phone numbers from profile free text.

use std::sync::LazyLock;

use profilescout_shared::ContactSet;
use regex::Regex;

/// Minimum digit count for a phone number match.
const MIN_PHONE_DIGITS: usize = 9;

/// Maximum digit count of one phone number (E.164).
const MAX_PHONE_DIGITS: usize = 15;

/// Local part, `@`, one or more dotted labels, and a final alphabetic label.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@(?:[A-Za-z0-9-]+\.)+[A-Za-z]{2,}").expect("email regex")
});

/// Optional `+`, then digits mixed with spaces, parentheses and hyphens,
/// starting and ending on a digit.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+?[0-9][0-9 ()\-]*[0-9]").expect("phone regex"));

/// Scan `corpus` for contact identifiers.
///
/// Results keep first-seen order with exact duplicates removed; phones are
/// normalized before deduplication.
pub fn extract_contacts(corpus: &str) -> ContactSet {
    let mut contacts = ContactSet::default();

    for m in EMAIL_RE.find_iter(corpus) {
        contacts.add_email(m.as_str());
    }

    for m in PHONE_RE.find_iter(corpus) {
        for (start, end) in phone_spans(corpus, m.start(), m.end()) {
            contacts.add_phone(normalize_phone(&corpus[start..end]));
        }
    }

    contacts
}

/// Keep digits and a single leading `+`.
pub fn normalize_phone(raw: &str) -> String {
    let mut phone = String::with_capacity(raw.len());
    if raw.starts_with('+') {
        phone.push('+');
    }
    phone.extend(raw.chars().filter(char::is_ascii_digit));
    phone
}

/// A space-separated piece of a phone candidate: byte range and digit count.
type Chunk = (usize, usize, usize);

/// Split one pattern match into the phone numbers it actually contains.
///
/// The match is cut at spaces. An edge chunk glued to a longer token (an id,
/// a handle, an email local part) is dropped, and the remaining chunks are
/// packed left to right into numbers of at most [`MAX_PHONE_DIGITS`] digits.
fn phone_spans(text: &str, start: usize, end: usize) -> Vec<(usize, usize)> {
    let mut chunks = space_chunks(text, start, end);
    if chunks.first().is_some_and(|&(s, _, _)| glued_before(text, s)) {
        chunks.remove(0);
    }
    if chunks.last().is_some_and(|&(_, e, _)| glued_after(text, e)) {
        chunks.pop();
    }

    let mut spans = Vec::new();
    let mut current: Option<Chunk> = None;
    for (s, e, digits) in chunks {
        current = match current {
            Some((gs, _, gd)) if gd + digits <= MAX_PHONE_DIGITS => Some((gs, e, gd + digits)),
            Some(group) => {
                push_span(&mut spans, text, group);
                Some((s, e, digits))
            }
            None => Some((s, e, digits)),
        };
    }
    if let Some(group) = current {
        push_span(&mut spans, text, group);
    }

    spans
}

fn space_chunks(text: &str, start: usize, end: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut offset = start;
    for piece in text[start..end].split(' ') {
        let piece_end = offset + piece.len();
        if !piece.is_empty() {
            let digits = piece.chars().filter(char::is_ascii_digit).count();
            chunks.push((offset, piece_end, digits));
        }
        offset = piece_end + 1;
    }
    chunks
}

/// Keep a group with a plausible digit count, trimmed to start on `+` or a
/// digit and end on a digit.
fn push_span(spans: &mut Vec<(usize, usize)>, text: &str, (start, end, digits): Chunk) {
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return;
    }
    let span = &text[start..end];
    let lead = span.find(|c: char| c == '+' || c.is_ascii_digit());
    let tail = span.rfind(|c: char| c.is_ascii_digit());
    if let (Some(lead), Some(tail)) = (lead, tail) {
        spans.push((start + lead, start + tail + 1));
    }
}

fn glued(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '@'
}

fn glued_before(text: &str, at: usize) -> bool {
    text[..at].chars().next_back().is_some_and(glued)
}

fn glued_after(text: &str, at: usize) -> bool {
    text[at..].chars().next().is_some_and(glued)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_emails() {
        let contacts = extract_contacts("a@b.com a@b.com");
        assert_eq!(contacts.emails, vec!["a@b.com"]);
        assert!(contacts.phones.is_empty());
    }

    #[test]
    fn normalizes_phone() {
        let contacts = extract_contacts("Call +1 (555) 123-4567 today");
        assert_eq!(contacts.phones, vec!["+15551234567"]);
    }

    #[test]
    fn phone_duplicates_collapse_after_normalization() {
        let contacts = extract_contacts("555-123-4567\n(555) 123 4567\n+1 555 123 4567");
        assert_eq!(contacts.phones, vec!["5551234567", "+15551234567"]);
    }

    #[test]
    fn email_shapes() {
        let contacts = extract_contacts(
            "write to first.last+tag@mail.example.co.uk. or ops_team%x@sub-domain.io, not me@localhost or x@y.z",
        );
        assert_eq!(
            contacts.emails,
            vec!["first.last+tag@mail.example.co.uk", "ops_team%x@sub-domain.io"]
        );
    }

    #[test]
    fn short_numbers_are_not_phones() {
        let contacts = extract_contacts("1,204 followers, 87 following, born 1815-12-10, 12 345 678");
        assert!(contacts.phones.is_empty());
    }

    #[test]
    fn numbers_inside_tokens_are_not_phones() {
        let contacts = extract_contacts("order id ABC1234567890 and user_987654321 and 123456789@pager.net");
        assert!(contacts.phones.is_empty());
        assert_eq!(contacts.emails, vec!["123456789@pager.net"]);
    }

    #[test]
    fn phone_bounded_by_punctuation() {
        let contacts = extract_contacts("WhatsApp:+44 20 7946 0958. Office (020) 7946-0000!");
        assert_eq!(contacts.phones, vec!["+442079460958", "02079460000"]);
    }

    #[test]
    fn number_after_glued_token_is_kept() {
        let contacts = extract_contacts("code X9 555 123 4567");
        assert_eq!(contacts.phones, vec!["5551234567"]);
    }

    #[test]
    fn adjacent_numbers_stay_separate() {
        let contacts = extract_contacts("call 555-123-4567 555-987-6543");
        assert_eq!(contacts.phones, vec!["5551234567", "5559876543"]);
    }

    #[test]
    fn overlong_digit_runs_are_not_phones() {
        let contacts = extract_contacts("ref 12345678901234567 end");
        assert!(contacts.phones.is_empty());
    }

    #[test]
    fn empty_and_matchless_text() {
        assert!(extract_contacts("").is_empty());
        assert!(extract_contacts("just vibes ✨ no contacts here").is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let corpus = "b@x.io a@x.io b@x.io +49 30 1234 5678 / 030-1234-5678";
        let first = extract_contacts(corpus);
        let second = extract_contacts(corpus);
        assert_eq!(first, second);
        assert_eq!(first.emails, vec!["b@x.io", "a@x.io"]);
        assert_eq!(first.phones, vec!["+493012345678", "03012345678"]);
    }
}
