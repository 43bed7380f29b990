//! DOI parsing
//!
//! Every accepted presentation form is reduced to one "core" string
//! (`10.<registrant>/<suffix>[?query][#fragment]`) which is then checked by a
//! single pattern. Markers are matched case-insensitively, but the prefix and
//! suffix are always sliced from the caller's original text.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::DoiError;

/// Resolver URL prefixes, most specific first
const RESOLVER_PREFIXES: [&str; 4] = [
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
];

const RESOLVER_HOSTS: [&str; 2] = ["doi.org", "dx.doi.org"];

const URI_MARKER: &str = "doi:";

/// Directory indicator every DOI prefix starts with
const DIRECTORY_INDICATOR: &str = "10.";

lazy_static! {
    // prefix: 10. then digits/dots; suffix: up to the first ?, # or whitespace.
    // A trailing ?query or #fragment is allowed and discarded.
    static ref DOI_CORE_REGEX: Regex =
        Regex::new(r"^(10\.[0-9.]+)/([^?#\s]+)(?:[?#]\S*)?$").unwrap();

    // Any other <scheme>://<authority> input
    static ref URL_REGEX: Regex =
        Regex::new(r"^(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*)://(?P<authority>[^/?#]*)").unwrap();
}

/// The form a DOI was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Presentation {
    /// `10.1000/xyz123`
    Bare,
    /// `doi:10.1000/xyz123`
    Uri,
    /// `https://doi.org/10.1000/xyz123`
    ResolverUrl,
}

/// A validated DOI split into prefix and suffix.
///
/// Only the parser constructs this type, so a `Doi` always satisfies:
/// - `prefix` is `10.` followed by at least one digit or dot
/// - `suffix` is non-empty and free of `?`, `#` and whitespace
///
/// Serializes as the canonical `prefix/suffix` string and deserializes
/// through [`parse_doi`], so invalid DOIs are rejected on the way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Doi {
    prefix: String,
    suffix: String,
}

impl Doi {
    /// Parse a DOI from any supported presentation form
    pub fn parse(input: &str) -> Result<Self, DoiError> {
        parse_doi(input)
    }

    /// Registrant prefix, e.g. `10.1000`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Registrant-assigned suffix, exactly as written in the input
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Registrant code: the prefix without the leading `10.`
    pub fn registrant(&self) -> &str {
        &self.prefix[DIRECTORY_INDICATOR.len()..]
    }

    /// `doi:` URI form
    pub fn to_uri(&self) -> String {
        format!("{}{}", URI_MARKER, self)
    }

    /// `https://doi.org/` resolver URL
    pub fn to_url(&self) -> String {
        format!("{}{}", RESOLVER_PREFIXES[0], self)
    }

    pub fn into_parts(self) -> (String, String) {
        (self.prefix, self.suffix)
    }
}

impl fmt::Display for Doi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.prefix, self.suffix)
    }
}

impl FromStr for Doi {
    type Err = DoiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_doi(s)
    }
}

impl TryFrom<&str> for Doi {
    type Error = DoiError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parse_doi(value)
    }
}

impl TryFrom<String> for Doi {
    type Error = DoiError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_doi(&value)
    }
}

impl From<Doi> for String {
    fn from(doi: Doi) -> Self {
        doi.to_string()
    }
}

/// Parse a DOI given as a bare identifier, `doi:` URI or resolver URL
pub fn parse_doi(input: &str) -> Result<Doi, DoiError> {
    parse_doi_with_presentation(input).map(|(doi, _)| doi)
}

/// Parse a DOI and report which presentation form it was written in
pub fn parse_doi_with_presentation(input: &str) -> Result<(Doi, Presentation), DoiError> {
    let result = parse_trimmed(input.trim());
    match &result {
        Ok((doi, presentation)) => trace!(
            prefix = %doi.prefix,
            suffix = %doi.suffix,
            ?presentation,
            "parsed DOI"
        ),
        Err(err) => trace!(kind = err.kind(), %err, "rejected DOI"),
    }
    result
}

fn parse_trimmed(input: &str) -> Result<(Doi, Presentation), DoiError> {
    if input.is_empty() {
        return Err(DoiError::EmptyInput);
    }

    let (presentation, marker, rest) = split_presentation(input)?;

    let core = rest.trim();
    if core.is_empty() {
        return Err(DoiError::InvalidIdentifier {
            marker: marker.to_string(),
        });
    }

    let caps = DOI_CORE_REGEX
        .captures(core)
        .ok_or_else(|| DoiError::MalformedDoi(core.to_string()))?;

    match (caps.get(1), caps.get(2)) {
        (Some(prefix), Some(suffix)) => Ok((
            Doi {
                prefix: prefix.as_str().to_string(),
                suffix: suffix.as_str().to_string(),
            },
            presentation,
        )),
        _ => Err(DoiError::MalformedDoi(core.to_string())),
    }
}

/// Split off the presentation marker, returning (form, marker, remainder).
/// Marker and remainder are both slices of `input`.
fn split_presentation(input: &str) -> Result<(Presentation, &str, &str), DoiError> {
    for prefix in RESOLVER_PREFIXES {
        if let Some((marker, rest)) = split_prefix_ignore_case(input, prefix) {
            return Ok((Presentation::ResolverUrl, marker, rest));
        }
    }

    if let Some((marker, rest)) = split_prefix_ignore_case(input, URI_MARKER) {
        return Ok((Presentation::Uri, marker, rest));
    }

    if let Some(caps) = URL_REGEX.captures(input) {
        return Err(reject_url(&caps["scheme"], &caps["authority"]));
    }

    Ok((Presentation::Bare, "", input))
}

/// Classify a URL that did not start with a resolver prefix
fn reject_url(scheme: &str, authority: &str) -> DoiError {
    if !scheme.eq_ignore_ascii_case("http") && !scheme.eq_ignore_ascii_case("https") {
        return DoiError::UnsupportedScheme(scheme.to_string());
    }

    // No host at all (`https://`), or a resolver host with no path
    // (`http://dx.doi.org`)
    if authority.is_empty()
        || RESOLVER_HOSTS
            .iter()
            .any(|host| authority.eq_ignore_ascii_case(host))
    {
        return DoiError::InvalidIdentifier {
            marker: format!("{}://{}", scheme, authority),
        };
    }

    // Includes resolver hosts with an explicit port
    DoiError::UnsupportedHost(authority.to_string())
}

fn split_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<(&'a str, &'a str)> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some((head, &s[prefix.len()..]))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare() {
        let doi = parse_doi("10.1016/j.physletb.2003.10.071").unwrap();
        assert_eq!(doi.prefix(), "10.1016");
        assert_eq!(doi.suffix(), "j.physletb.2003.10.071");
        assert_eq!(doi.registrant(), "1016");
    }

    #[test]
    fn test_parse_reports_presentation() {
        let (_, form) = parse_doi_with_presentation("10.1/a").unwrap();
        assert_eq!(form, Presentation::Bare);

        let (_, form) = parse_doi_with_presentation("DOI:10.1/a").unwrap();
        assert_eq!(form, Presentation::Uri);

        let (_, form) = parse_doi_with_presentation("http://DX.doi.org/10.1/a").unwrap();
        assert_eq!(form, Presentation::ResolverUrl);
    }

    #[test]
    fn test_marker_is_echoed_as_written() {
        assert_eq!(
            parse_doi("DOI:"),
            Err(DoiError::InvalidIdentifier {
                marker: "DOI:".to_string()
            })
        );
        assert_eq!(
            parse_doi("https://DOI.org/  "),
            Err(DoiError::InvalidIdentifier {
                marker: "https://DOI.org/".to_string()
            })
        );
    }

    #[test]
    fn test_resolver_without_path() {
        assert_eq!(
            parse_doi("http://dx.doi.org"),
            Err(DoiError::InvalidIdentifier {
                marker: "http://dx.doi.org".to_string()
            })
        );
    }

    #[test]
    fn test_url_without_host() {
        assert_eq!(
            parse_doi("https://"),
            Err(DoiError::InvalidIdentifier {
                marker: "https://".to_string()
            })
        );
        assert_eq!(
            parse_doi("http:///10.1000/x"),
            Err(DoiError::InvalidIdentifier {
                marker: "http://".to_string()
            })
        );
    }

    #[test]
    fn test_foreign_urls() {
        assert_eq!(
            parse_doi("ftp://doi.org/10.1000/x"),
            Err(DoiError::UnsupportedScheme("ftp".to_string()))
        );
        assert_eq!(
            parse_doi("https://Example.com/10.1000/x"),
            Err(DoiError::UnsupportedHost("Example.com".to_string()))
        );
        assert_eq!(
            parse_doi("https://doi.org:8080/10.1101/2020.03.13.991234"),
            Err(DoiError::UnsupportedHost("doi.org:8080".to_string()))
        );
    }

    #[test]
    fn test_malformed_carries_core() {
        assert_eq!(
            parse_doi("doi:10.1000"),
            Err(DoiError::MalformedDoi("10.1000".to_string()))
        );
        assert_eq!(
            parse_doi("https://doi.org//10.1234/suffix"),
            Err(DoiError::MalformedDoi("/10.1234/suffix".to_string()))
        );
    }

    #[test]
    fn test_marker_check_respects_char_boundaries() {
        // byte 4 falls inside the euro sign
        assert!(matches!(parse_doi("aa€/10.1/x"), Err(DoiError::MalformedDoi(_))));
    }

    #[test]
    fn test_output_forms() {
        let doi = parse_doi("doi:10.5555/AbC").unwrap();
        assert_eq!(doi.to_string(), "10.5555/AbC");
        assert_eq!(doi.to_uri(), "doi:10.5555/AbC");
        assert_eq!(doi.to_url(), "https://doi.org/10.5555/AbC");
        assert_eq!(
            doi.into_parts(),
            ("10.5555".to_string(), "AbC".to_string())
        );
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let doi: Doi = "https://doi.org/10.1000/xyz123#top".parse().unwrap();
        let json = serde_json::to_string(&doi).unwrap();
        assert_eq!(json, "\"10.1000/xyz123\"");

        let back: Doi = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doi);

        assert!(serde_json::from_str::<Doi>("\"11.1000/x\"").is_err());
    }
}
