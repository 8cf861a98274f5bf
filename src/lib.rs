//! RideLink - Main Library
//!
//! RideLink is the native desktop client for the RideLink car-sharing
//! marketplace. It is a presentation layer over the marketplace's REST
//! backend: listings, bookings and payments live server-side, while this
//! crate owns the client-side messaging and notification synchronization
//! layer plus the egui shell that consumes it.
//!
//! # Module Structure
//!
//! The library is organized into two main modules:
//!
//! - **`shared`** - Types shared across the client layers
//!   - Conversation, message and user structures
//!   - Realtime event names and channel naming
//!   - Configuration and error types
//!
//! - **`egui_app`** - Native desktop app (egui/eframe)
//!   - Session credential lifecycle and persisted token storage
//!   - REST API client for the marketplace backend
//!   - Realtime connection manager and channel subscription registry
//!   - Cache synchronizer (push events + polling backstop)
//!   - Role-gated views
//!
//! # Realtime Model
//!
//! Push delivery over the broadcaster is strictly an enhancement: when the
//! broadcaster is not configured or the connection drops, the client degrades
//! to poll-only mode (30 s unread-count poll, 10 s message poll for the open
//! conversation). The periodic poll is the source of truth and overwrites
//! optimistic state on conflict.
//!
//! # Error Handling
//!
//! The library uses Rust's standard error handling:
//!
//! - `Result<T, E>` for fallible operations
//! - `Option<T>` for optional values
//! - The `ClientError` taxonomy in `shared::error`
//!
//! Nothing in this layer is process-fatal; the worst case is degraded
//! (poll-only) realtime behavior.

/// Shared types and data structures
pub mod shared;

/// egui native desktop app
pub mod egui_app;
