pub mod auth_handlers;
pub mod photo_handlers;
pub mod roster_handlers;

use serde::Deserialize;

/// Body of forms that only carry the CSRF token (delete, logout, toggles).
#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}
