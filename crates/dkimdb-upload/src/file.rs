//! File upload: submit every row of a TSV file of domain/selector pairs.

use std::path::Path;

use dkimdb_api::DkimApiClient;
use dkimdb_core::parse_domain_selector_tsv;

use crate::error::UploadError;
use crate::log::RunLog;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileUploadSummary {
    pub submitted: usize,
}

/// Parses the file at `path` and submits each pair, in file order, to the
/// file-path upsert endpoint. The server's status message for each row is
/// logged as `<domain> <selector> <message>`.
///
/// Rows are not deduplicated.
///
/// # Errors
///
/// - [`UploadError::Input`] if no file was given or it is unreadable, empty,
///   or not UTF-8 text. No request is made in that case.
/// - [`UploadError::Transport`] on the first failed upsert; later rows are
///   never attempted.
pub async fn upload_file(
    client: &DkimApiClient,
    path: Option<&Path>,
    log: &RunLog,
) -> Result<FileUploadSummary, UploadError> {
    let path = path.ok_or_else(|| UploadError::Input("no file selected".to_owned()))?;
    let content = read_text(path).await?;
    let pairs = parse_domain_selector_tsv(&content);

    let upsert_url = client.endpoint_url(&client.endpoints().file_upsert)?;
    log.append(format!("starting upload to {upsert_url}"));

    let mut summary = FileUploadSummary::default();
    for pair in &pairs {
        let response = client.upsert_dkim_record(pair).await?;
        log.append(format!(
            "{} {} {}",
            pair.domain, pair.selector, response.message
        ));
        summary.submitted += 1;
    }

    tracing::info!(
        path = %path.display(),
        submitted = summary.submitted,
        "file upload finished"
    );
    Ok(summary)
}

async fn read_text(path: &Path) -> Result<String, UploadError> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        UploadError::Input(format!(
            "invalid file content: cannot read {}: {e}",
            path.display()
        ))
    })?;

    let text = String::from_utf8(bytes).map_err(|e| {
        UploadError::Input(format!(
            "invalid file content: {} is not UTF-8 text ({e})",
            path.display()
        ))
    })?;

    if text.is_empty() {
        return Err(UploadError::Input(format!(
            "invalid file content: {} is empty",
            path.display()
        )));
    }
    Ok(text)
}
