pub mod resize;
pub mod storage;

pub use resize::{
    DEFAULT_TIERS, ImageError, ImageVersion, Tier, check_upload, generate_versions,
    scaled_dimensions,
};
