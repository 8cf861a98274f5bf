//! egui Native Desktop App Module
//!
//! This module provides the native desktop client: session management, the
//! backend API client, the realtime synchronization layer and the egui
//! views consuming the shared cache.
//!
//! # Module Structure
//!
//! ```text
//! egui_app/
//! ├── mod.rs       - Module exports
//! ├── main.rs      - Application entry point (binary)
//! ├── config.rs    - Configuration wrapper
//! ├── session.rs   - Bearer credential lifecycle + persistence
//! ├── api/         - REST client for the marketplace backend
//! ├── realtime/    - Broadcaster connection manager + channel registry
//! ├── sync/        - Cache reducer, pollers, optimistic outbox
//! ├── routes.rs    - Role-based view gating
//! ├── state.rs     - App state and pending-operation plumbing
//! ├── theme/       - Color constants
//! └── views/       - Login, dashboards, messaging
//! ```

pub mod api;
pub mod config;
pub mod realtime;
pub mod routes;
pub mod session;
pub mod state;
pub mod sync;
pub mod theme;
pub mod views;

// Re-export commonly used types
pub use api::ApiClient;
pub use config::Config;
pub use realtime::RealtimeClient;
pub use routes::Route;
pub use session::Session;
pub use state::AppState;
