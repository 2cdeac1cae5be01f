//! DKIM domain/selector pairs and the paged result shape used by the Gmail
//! source API.
//!
//! ## Wire shape
//!
//! The Gmail proxy returns pairs as `{"domain": "...", "selector": "..."}`
//! objects inside `domainSelectorPairs`, together with an opaque
//! `nextPageToken`. The last page carries an empty token; some deployments
//! omit the field or send `null` instead, and both are treated as empty.

use serde::{Deserialize, Deserializer, Serialize};

/// A DKIM signing identity: the `d=` domain and `s=` selector of a
/// `DKIM-Signature` header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DomainSelectorPair {
    pub domain: String,
    pub selector: String,
}

impl DomainSelectorPair {
    #[must_use]
    pub fn new(domain: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            selector: selector.into(),
        }
    }

    /// Canonical string form used for set membership within one upload run.
    ///
    /// Renders `{"domain":"<domain>","selector":"<selector>"}` with JSON string
    /// escaping, so two pairs share an identity exactly when both fields match
    /// byte for byte.
    #[must_use]
    pub fn identity(&self) -> String {
        serde_json::json!({
            "domain": self.domain,
            "selector": self.selector,
        })
        .to_string()
    }
}

impl std::fmt::Display for DomainSelectorPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.domain, self.selector)
    }
}

/// One page from the Gmail source API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    #[serde(rename = "domainSelectorPairs", default)]
    pub pairs: Vec<DomainSelectorPair>,

    /// Continuation token; empty means there are no more pages.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub next_page_token: String,
}

impl PageResult {
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.next_page_token.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
