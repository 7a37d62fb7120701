//! Audio endpoints: sound settings, custom uploads, mute, and the alerts
//! WebSocket.

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod websocket;

pub use handlers::AudioHandlers;
pub use routes::audio_routes;
