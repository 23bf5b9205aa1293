//! Photo storage tests: generated versions on disk, key validation and the
//! PostgreSQL photo records (skipped without DATABASE_URL).

mod common;

use std::io::Cursor;
use std::path::PathBuf;

use chapelle::media::{DEFAULT_TIERS, generate_versions, storage};
use chapelle::models::photo::{self, NewPhoto};
use common::setup_test_db;
use image::{ImageFormat, RgbImage};

fn temp_upload_dir() -> PathBuf {
    std::env::temp_dir().join(format!("chapelle-test-{}", storage::new_file_key()))
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| image::Rgb([x as u8, y as u8, 90]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).expect("encode png");
    out.into_inner()
}

#[test]
fn test_file_keys_are_unique_hex() {
    let a = storage::new_file_key();
    let b = storage::new_file_key();
    assert_eq!(a.len(), 32);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_write_and_remove_versions() {
    let dir = temp_upload_dir();
    let key = storage::new_file_key();
    let versions = generate_versions(png_bytes(1200, 800), &DEFAULT_TIERS)
        .await
        .expect("resize failed");

    let written = storage::write_versions(&dir, &key, &versions).await.expect("write");
    assert_eq!(written.len(), 3);
    for (meta, version) in written.iter().zip(&versions) {
        assert_eq!(meta.path, format!("{key}/{}.jpg", version.tier.name));
        assert_eq!(meta.byte_size as usize, version.bytes.len());
        let on_disk = tokio::fs::read(dir.join(&meta.path)).await.expect("read back");
        assert_eq!(on_disk, version.bytes);
    }

    storage::remove_versions(&dir, &key).await.expect("remove");
    assert!(!dir.join(&key).exists());
    // Removing twice is fine
    storage::remove_versions(&dir, &key).await.expect("remove again");

    tokio::fs::remove_dir_all(&dir).await.ok();
}

#[tokio::test]
async fn test_partial_write_leaves_nothing_behind() {
    let dir = temp_upload_dir();
    let key = storage::new_file_key();
    let versions = generate_versions(png_bytes(1200, 800), &DEFAULT_TIERS)
        .await
        .expect("resize failed");

    // A directory where the second tier's file should go makes that write fail
    tokio::fs::create_dir_all(dir.join(&key).join("medium.jpg"))
        .await
        .expect("create obstacle");

    let result = storage::write_versions(&dir, &key, &versions).await;
    assert!(result.is_err());
    assert!(!dir.join(&key).exists(), "partial upload directory must be removed");

    tokio::fs::remove_dir_all(&dir).await.ok();
}

#[tokio::test]
async fn test_path_traversal_keys_are_refused() {
    let dir = temp_upload_dir();
    assert!(storage::write_versions(&dir, "../escape", &[]).await.is_err());
    assert!(storage::remove_versions(&dir, "..").await.is_err());
    assert!(storage::remove_versions(&dir, "").await.is_err());
}

#[tokio::test]
async fn test_photo_records() {
    let Some(db) = setup_test_db().await else { return };
    let pool = db.pool();

    let dir = temp_upload_dir();
    let key = storage::new_file_key();
    let bytes = png_bytes(640, 480);
    let versions = generate_versions(bytes.clone(), &DEFAULT_TIERS).await.expect("resize");
    let written = storage::write_versions(&dir, &key, &versions).await.expect("write");

    let id = photo::create(
        pool,
        &NewPhoto {
            file_key: key.clone(),
            tag: "culte".to_string(),
            mime_type: "image/png".to_string(),
            byte_size: bytes.len() as i64,
            versions: written,
        },
    )
    .await
    .expect("create photo");

    let found = photo::find_by_id(pool, id).await.expect("lookup").expect("present");
    assert_eq!(found.tag, "culte");
    assert_eq!(found.versions.len(), 3);
    assert_eq!(found.thumbnail_path(), Some(format!("{key}/thumbnail.jpg").as_str()));

    photo::update_tag(pool, id, "baptême").await.expect("tag");
    let all = photo::find_all(pool).await.expect("list");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].tag, "baptême");

    photo::delete(pool, id).await.expect("delete");
    assert!(photo::find_by_id(pool, id).await.expect("lookup").is_none());
    assert!(photo::delete(pool, id).await.is_err());

    tokio::fs::remove_dir_all(&dir).await.ok();
    db.teardown().await;
}
