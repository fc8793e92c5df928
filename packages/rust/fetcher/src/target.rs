//! Profile URL construction.

use std::sync::LazyLock;

use profilescout_shared::{ProfileScoutError, Result};
use regex::Regex;
use url::Url;

/// Placeholder substituted in the profile URL template.
const USERNAME_PLACEHOLDER: &str = "{username}";

/// Handles are 1–30 characters of letters, digits, `.` and `_`.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._]{1,30}$").expect("username regex"));

/// Check that `username` is a plausible handle, returning it trimmed.
pub fn validate_username(username: &str) -> Result<&str> {
    let trimmed = username.trim().trim_start_matches('@');
    if USERNAME_RE.is_match(trimmed) {
        Ok(trimmed)
    } else {
        Err(ProfileScoutError::validation(format!(
            "invalid username '{username}': expected 1-30 letters, digits, '.' or '_'"
        )))
    }
}

/// Substitute a validated username into `template` and parse the result.
pub fn profile_url(template: &str, username: &str) -> Result<Url> {
    let username = validate_username(username)?;

    if !template.contains(USERNAME_PLACEHOLDER) {
        return Err(ProfileScoutError::config(format!(
            "profile URL template '{template}' has no {USERNAME_PLACEHOLDER} placeholder"
        )));
    }

    let url = Url::parse(&template.replace(USERNAME_PLACEHOLDER, username)).map_err(|e| {
        ProfileScoutError::config(format!("invalid profile URL template '{template}': {e}"))
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ProfileScoutError::config(format!(
            "profile URL template must be http(s), got '{scheme}'"
        ))),
    }
}
