// Network adapter modules split by the game socket vs plain HTTP routes.

pub mod client;
pub mod internal;

pub use client::{spawn_session_serializer, ws_handler};
pub use internal::scores_handler;
