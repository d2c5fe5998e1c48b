use crate::{
    error::{AvatarError, Result},
    models::Artifact,
};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;

/// Extensions reported as generated artifacts.
pub const ARTIFACT_EXTENSIONS: [&str; 3] = ["svg", "png", "zip"];

/// Wall-clock Unix seconds. Only non-decreasing as long as the system clock is not set back.
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn timestamp_filename(timestamp: i64) -> String {
    format!("avatar_{}", timestamp)
}

pub fn batch_archive_name(format: &str, timestamp: i64) -> String {
    format!("avatars_{}_{}.zip", format, timestamp)
}

pub fn svg_archive_name(timestamp: i64) -> String {
    format!("avatars_{}.zip", timestamp)
}

/// Copies a response body into `path` chunk by chunk. A failed copy leaves the
/// partial file behind.
pub async fn write_response_body(
    operation: &'static str,
    mut response: reqwest::Response,
    path: &Path,
) -> Result<u64> {
    let mut file = File::create(path)
        .await
        .map_err(|e| AvatarError::file(operation, path, e))?;

    let mut written = 0u64;
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| AvatarError::request(operation, e))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| AvatarError::file(operation, path, e))?;
        written += chunk.len() as u64;
    }

    file.flush()
        .await
        .map_err(|e| AvatarError::file(operation, path, e))?;

    Ok(written)
}

pub async fn list_artifacts(dir: &Path) -> Result<Vec<Artifact>> {
    let operation = "list_artifacts";
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| AvatarError::file(operation, dir, e))?;

    let mut artifacts = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AvatarError::file(operation, dir, e))?
    {
        let path = entry.path();
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
        };

        if metadata.is_dir() || !is_artifact(&path) {
            continue;
        }

        artifacts.push(Artifact {
            name: entry.file_name().to_string_lossy().to_string(),
            path,
            size: metadata.len(),
        });
    }

    artifacts.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(artifacts)
}

fn is_artifact(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| ARTIFACT_EXTENSIONS.contains(&ext))
}
