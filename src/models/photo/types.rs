use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored size of an uploaded photo.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PhotoVersion {
    pub photo_id: i64,
    pub tier: String,
    pub width: i32,
    pub height: i32,
    pub byte_size: i64,
    /// Path relative to the upload directory, e.g. `ab12.../medium.jpg`.
    pub path: String,
}

/// Photo with all of its versions, as shown in the admin list.
#[derive(Debug, Clone, Serialize)]
pub struct PhotoDetail {
    pub id: i64,
    pub file_key: String,
    pub tag: String,
    pub mime_type: String,
    pub byte_size: i64,
    pub created_at: DateTime<Utc>,
    pub versions: Vec<PhotoVersion>,
}

impl PhotoDetail {
    /// Relative path of the smallest version, for list thumbnails.
    pub fn thumbnail_path(&self) -> Option<&str> {
        self.versions
            .iter()
            .min_by_key(|v| v.width.max(v.height))
            .map(|v| v.path.as_str())
    }
}

/// Insert payload for a processed upload.
#[derive(Debug, Clone)]
pub struct NewPhoto {
    pub file_key: String,
    pub tag: String,
    pub mime_type: String,
    pub byte_size: i64,
    pub versions: Vec<NewPhotoVersion>,
}

#[derive(Debug, Clone)]
pub struct NewPhotoVersion {
    pub tier: String,
    pub width: i32,
    pub height: i32,
    pub byte_size: i64,
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadQuery {
    #[serde(default)]
    pub tag: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagForm {
    pub tag: String,
    pub csrf_token: String,
}
