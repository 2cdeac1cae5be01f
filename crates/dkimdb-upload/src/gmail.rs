//! Gmail upload: page through the Gmail proxy and submit each DKIM
//! domain/selector pair once per run.

use std::collections::HashSet;

use dkimdb_api::DkimApiClient;

use crate::error::UploadError;
use crate::log::RunLog;

/// Pair identities already submitted during the current run.
#[derive(Debug, Default)]
struct SeenPairs(HashSet<String>);

impl SeenPairs {
    fn contains(&self, identity: &str) -> bool {
        self.0.contains(identity)
    }

    fn insert(&mut self, identity: String) {
        self.0.insert(identity);
    }
}

/// Counters for a finished Gmail upload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GmailUploadSummary {
    pub pages: usize,
    pub submitted: usize,
    pub duplicates: usize,
}

/// Pages through the Gmail proxy until it returns an empty continuation
/// token, submitting every pair not yet seen in this run.
///
/// Submissions are strictly sequential and in the order received. The session
/// is refreshed after each page fetch and after each submission so a long
/// run does not outlive its session. A pair is marked as seen only after its
/// submission and the following refresh succeed.
///
/// There is no page cap: a proxy that never returns an empty token keeps the
/// loop going.
///
/// # Errors
///
/// Any fetch, upsert or refresh failure aborts the run immediately as
/// [`UploadError::Transport`]; pairs already submitted stay submitted.
pub async fn upload_from_gmail(
    client: &DkimApiClient,
    log: &RunLog,
) -> Result<GmailUploadSummary, UploadError> {
    let gmail_url = client.endpoint_url(&client.endpoints().gmail)?;
    let mut seen = SeenPairs::default();
    let mut summary = GmailUploadSummary::default();
    let mut page_token = String::new();

    log.append(format!("starting upload to {gmail_url}"));

    loop {
        log.append("fetching email batch...");
        let page = client.fetch_gmail_page(&page_token).await?;
        client.refresh_session().await?;
        summary.pages += 1;

        page_token = page.next_page_token;
        log.append(format!(
            "received: {} domain/selector pairs",
            page.pairs.len()
        ));

        for pair in page.pairs {
            let identity = pair.identity();
            if seen.contains(&identity) {
                summary.duplicates += 1;
                continue;
            }

            log.append(format!("new pair found, uploading: {identity}"));
            client.add_domain_selector_pair(&pair).await?;
            client.refresh_session().await?;
            seen.insert(identity);
            summary.submitted += 1;
        }

        if page_token.is_empty() {
            break;
        }
    }

    tracing::info!(
        pages = summary.pages,
        submitted = summary.submitted,
        duplicates = summary.duplicates,
        "gmail upload finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seen_pairs_tracks_identities() {
        let mut seen = SeenPairs::default();
        let identity = dkimdb_core::DomainSelectorPair::new("d1", "s1").identity();
        assert!(!seen.contains(&identity));
        seen.insert(identity.clone());
        assert!(seen.contains(&identity));
    }
}
