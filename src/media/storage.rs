use std::path::{Path, PathBuf};

use rand::Rng;

use super::resize::ImageVersion;
use crate::models::photo::NewPhotoVersion;

/// Random 16-byte hex key naming an upload's directory.
pub fn new_file_key() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    hex::encode(bytes)
}

/// Keys are generated by `new_file_key`; anything else is refused so paths stay inside the upload dir.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_hexdigit())
}

fn photo_dir(upload_dir: &Path, key: &str) -> std::io::Result<PathBuf> {
    if !is_valid_key(key) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("invalid file key '{key}'"),
        ));
    }
    Ok(upload_dir.join(key))
}

/// Write each version to `{upload_dir}/{key}/{tier}.jpg`.
/// On failure nothing is left behind under `{key}/`.
pub async fn write_versions(
    upload_dir: &Path,
    key: &str,
    versions: &[ImageVersion],
) -> std::io::Result<Vec<NewPhotoVersion>> {
    let dir = photo_dir(upload_dir, key)?;
    tokio::fs::create_dir_all(&dir).await?;

    match write_all(&dir, key, versions).await {
        Ok(written) => Ok(written),
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_dir_all(&dir).await {
                log::error!("Could not remove partial upload {key}: {cleanup}");
            }
            Err(e)
        }
    }
}

async fn write_all(dir: &Path, key: &str, versions: &[ImageVersion]) -> std::io::Result<Vec<NewPhotoVersion>> {
    let mut written = Vec::with_capacity(versions.len());
    for version in versions {
        let file_name = format!("{}.jpg", version.tier.name);
        tokio::fs::write(dir.join(&file_name), &version.bytes).await?;
        written.push(NewPhotoVersion {
            tier: version.tier.name.to_string(),
            width: version.width as i32,
            height: version.height as i32,
            byte_size: version.bytes.len() as i64,
            path: format!("{key}/{file_name}"),
        });
    }
    Ok(written)
}

/// Remove an upload's directory. A directory that is already gone is not an error.
pub async fn remove_versions(upload_dir: &Path, key: &str) -> std::io::Result<()> {
    let dir = photo_dir(upload_dir, key)?;
    match tokio::fs::remove_dir_all(&dir).await {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
