//! HTTP API handlers for audionest

pub mod auth;
pub mod extract;
pub mod files;
pub mod health;
pub mod sources;
pub mod user_audio;

pub use auth::auth_routes;
pub use extract::{AuthenticatedUser, FormBody, JsonBody};
pub use health::health_routes;
pub use sources::source_routes;
pub use user_audio::user_audio_routes;
