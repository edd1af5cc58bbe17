//! HTTP API endpoints

mod health;
mod now_playing;

pub use health::{health_check, health_routes, HealthResponse};
pub use now_playing::now_playing;
