//! DOI validation and normalization helpers

use crate::doi::parse_doi;
use crate::error::DoiError;

/// Check whether a string is a DOI in any supported presentation form
pub fn is_valid_doi(doi: &str) -> bool {
    parse_doi(doi).is_ok()
}

/// Normalize a DOI to its canonical bare form `prefix/suffix`.
///
/// Resolver URLs and `doi:` URIs are unwrapped and any query or fragment is
/// dropped. The suffix is not case-folded or percent-decoded.
pub fn normalize_doi(doi: &str) -> Result<String, DoiError> {
    parse_doi(doi).map(String::from)
}
