use askama::Template;

use super::PageContext;
use crate::models::photo::PhotoDetail;

#[derive(Template)]
#[template(path = "photos/list.html")]
pub struct PhotoListTemplate {
    pub ctx: PageContext,
    pub photos: Vec<PhotoDetail>,
    pub max_upload_mb: usize,
}
