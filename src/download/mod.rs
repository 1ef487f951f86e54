use crate::http::HttpClient;
use crate::runtime::Runtime;
use anyhow::{Context, Result};
use log::info;
use std::path::Path;

/// Streams `url` into a file at `dest_path`. Returns the number of bytes written.
#[tracing::instrument(skip(runtime, dest_path, http_client))]
pub async fn download_file<R: Runtime>(
    runtime: &R,
    url: &str,
    dest_path: &Path,
    http_client: &HttpClient,
) -> Result<u64> {
    info!("Downloading {}...", url);

    let dest_path = dest_path.to_path_buf();
    let bytes = http_client
        .download_file(url, || {
            runtime
                .create_file(&dest_path)
                .with_context(|| format!("Failed to create file at {:?}", dest_path))
        })
        .await?;

    info!("Download complete.");
    Ok(bytes)
}
