//! Per-input parse reports for batch and CLI use

use serde::{Deserialize, Serialize};

use crate::doi::{parse_doi_with_presentation, Presentation};

/// Outcome of parsing one input string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoiReport {
    pub input: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presentation: Option<Presentation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl DoiReport {
    /// Parse `input` and record the result
    pub fn from_input(input: &str) -> Self {
        match parse_doi_with_presentation(input) {
            Ok((doi, presentation)) => {
                let (prefix, suffix) = doi.into_parts();
                Self {
                    input: input.to_string(),
                    valid: true,
                    prefix: Some(prefix),
                    suffix: Some(suffix),
                    presentation: Some(presentation),
                    error: None,
                    kind: None,
                }
            }
            Err(err) => Self {
                input: input.to_string(),
                valid: false,
                prefix: None,
                suffix: None,
                presentation: None,
                error: Some(err.to_string()),
                kind: Some(err.kind().to_string()),
            },
        }
    }

    /// Rejected result for input that could not be decoded as UTF-8.
    /// `input` is the lossy rendering of the raw bytes.
    pub fn unreadable(input: String) -> Self {
        Self {
            input,
            valid: false,
            prefix: None,
            suffix: None,
            presentation: None,
            error: Some("input is not valid UTF-8".to_string()),
            kind: Some("invalid_utf8".to_string()),
        }
    }

    /// Single-line JSON rendering
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Parse each input in order
pub fn report_all<I, S>(inputs: I) -> Vec<DoiReport>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|input| DoiReport::from_input(input.as_ref()))
        .collect()
}
