// Template context structures for Askama templates, organised by domain.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{get_username, take_flash};
use crate::errors::AppError;

/// Common context shared by all back-office pages.
/// Templates access these as `ctx.username`, `ctx.csrf_token`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub flash: Option<String>,
    pub app_name: String,
    pub csrf_token: String,
    pub current_path: String,
}

impl PageContext {
    pub fn build(session: &Session, app_name: &str, current_path: &str) -> Result<Self, AppError> {
        let username = get_username(session)?;
        let flash = take_flash(session);
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = username.chars().next().unwrap_or('?').to_uppercase().to_string();
        Ok(Self {
            username,
            avatar_initial,
            flash,
            app_name: app_name.to_string(),
            csrf_token,
            current_path: current_path.to_string(),
        })
    }

    /// Whether a nav link should be highlighted.
    pub fn is_active(&self, prefix: &str) -> bool {
        self.current_path.starts_with(prefix)
    }
}

mod common;
mod photo;
mod roster;

pub use common::*;
pub use photo::*;
pub use roster::*;
