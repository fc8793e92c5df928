//! End-to-end profile pipeline: snapshot → readers → resolver → contacts → reply.

use tracing::{debug, info, instrument};

use profilescout_fetcher::{PageFetcher, profile_url, validate_username};
use profilescout_readers::{ReaderRegistry, SourceFragments};
use profilescout_shared::{CanonicalProfile, ContactSet, RawPageSnapshot, Result};

use crate::assembler::{ProfileResponse, assemble};
use crate::contacts::extract_contacts;
use crate::resolver::{free_text_corpus, resolve};

/// Everything the pure part of the pipeline derives from one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Raw per-source fragments.
    pub fragments: SourceFragments,
    /// Merged profile.
    pub profile: CanonicalProfile,
    /// Contacts found in the free-text corpus.
    pub contacts: ContactSet,
}

/// Run readers, resolution and contact extraction over a snapshot.
///
/// Pure and total: never fails, never performs I/O.
pub fn extract(snapshot: &RawPageSnapshot) -> Extraction {
    let fragments = ReaderRegistry::new().read_all(snapshot);
    let profile = resolve(&fragments);
    let corpus = free_text_corpus(&fragments);
    let contacts = extract_contacts(&corpus);

    debug!(
        corpus_len = corpus.len(),
        emails = contacts.emails.len(),
        phones = contacts.phones.len(),
        "extraction finished"
    );

    Extraction {
        fragments,
        profile,
        contacts,
    }
}

/// Fetch `username`'s profile page once and build the reply.
///
/// Returns `Err` only when the request is rejected before fetching (bad
/// username or URL template). Fetch failures become a failure reply.
#[instrument(skip_all, fields(username = %username, fetcher = fetcher.name()))]
pub async fn scrape_profile(
    fetcher: &dyn PageFetcher,
    url_template: &str,
    username: &str,
) -> Result<ProfileResponse> {
    let username = validate_username(username)?;
    let url = profile_url(url_template, username)?;

    let fetched = fetcher.fetch(&url).await;
    let response = assemble(username, fetched);

    info!(ok = response.is_ok(), "profile request finished");
    Ok(response)
}
