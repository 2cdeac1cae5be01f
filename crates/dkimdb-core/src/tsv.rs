//! Tab-separated input files of domain/selector pairs.
//!
//! Each non-blank line holds exactly two tab-separated fields,
//! `domain<TAB>selector`. Surrounding whitespace is trimmed from lines and
//! fields. Malformed lines are skipped with a warning rather than failing the
//! whole file; producers of these files are expected to have deduplicated
//! them already, so no deduplication happens here.

use crate::pairs::DomainSelectorPair;

/// Parses TSV text into pairs, preserving file order.
#[must_use]
pub fn parse_domain_selector_tsv(content: &str) -> Vec<DomainSelectorPair> {
    let mut pairs = Vec::new();

    for (index, raw_line) in content.lines().enumerate() {
        let line_number = index + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        let [domain, selector] = fields.as_slice() else {
            tracing::warn!(
                line = line_number,
                fields = fields.len(),
                "skipping tsv line: expected 2 tab-separated fields"
            );
            continue;
        };

        if domain.is_empty() || selector.is_empty() {
            tracing::warn!(line = line_number, "skipping tsv line: empty domain or selector");
            continue;
        }

        pairs.push(DomainSelectorPair::new(*domain, *selector));
    }

    pairs
}
