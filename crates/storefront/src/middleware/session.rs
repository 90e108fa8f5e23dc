//! Session middleware configuration.
//!
//! Sessions hold only the visitor's Shopify cart ID, so they live in a moka
//! cache: losing it on restart means the visitor starts a new cart. Entries
//! are evicted at their expiry date and the cache never holds more than
//! [`SESSION_MAX_ENTRIES`] sessions.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "highland_session";

/// Session expiry time in seconds (14 days, matching Shopify cart lifetime).
const SESSION_EXPIRY_SECONDS: i64 = 14 * 24 * 60 * 60;

/// Upper bound on stored sessions; the least recently used are evicted first.
pub const SESSION_MAX_ENTRIES: u64 = 100_000;

/// Create the bounded session store.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(SESSION_MAX_ENTRIES))
}

/// Create the session layer backed by [`session_store`].
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
