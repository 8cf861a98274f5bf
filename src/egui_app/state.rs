//! Application State
//!
//! The state behind the egui shell: the shared cache handle, auth inputs,
//! the selected conversation, transient UI errors, and the receivers for
//! async operations in flight. Network work runs on the app-owned tokio
//! runtime; results cross back to the UI thread over `std::sync::mpsc`
//! channels polled once per frame in `check_pending_operations`.

use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use tokio::runtime::Runtime;
use uuid::Uuid;

use crate::egui_app::api::ApiClient;
use crate::egui_app::config::Config;
use crate::egui_app::realtime::RealtimeClient;
use crate::egui_app::routes::{guard, home_for, Route};
use crate::egui_app::session::Session;
use crate::egui_app::sync::conversation::ConversationPoller;
use crate::egui_app::sync::notifications::NotificationSync;
use crate::egui_app::sync::outbox::Outbox;
use crate::egui_app::sync::{self, SharedCache};
use crate::shared::error::ClientError;
use crate::shared::messaging::{AuthResponse, UserInfo};

/// Pending async operation result types
pub type LoginResult = Result<AuthResponse, ClientError>;
pub type OpResult = Result<(), ClientError>;

/// The main state for the application
pub struct AppState {
    /// Currently shown view (resolved through the role guard each frame)
    pub route: Route,

    /// App-owned async runtime; background sync tasks live on it
    runtime: Runtime,
    pub api: ApiClient,
    pub realtime: Arc<RealtimeClient>,
    pub notifications: Arc<NotificationSync>,
    pub poller: ConversationPoller,
    pub outbox: Outbox,
    /// Cache shared with the sync tasks
    pub cache: SharedCache,

    /// Login form state
    pub email_input: String,
    pub password_input: String,
    pub auth_error: Option<String>,
    pub auth_loading: bool,

    /// Currently selected conversation ID
    pub selected_conversation_id: Option<u64>,
    /// Message input text
    pub message_input: String,
    pub is_sending_message: bool,

    /// Transient UI error to show to the user (e.g. auth or network issues)
    pub ui_error: Option<String>,

    /// Pending async operation receivers
    pending_login: Option<Receiver<LoginResult>>,
    pending_logout: Option<Receiver<OpResult>>,
    pending_send: Option<Receiver<OpResult>>,
    pending_refresh: Option<Receiver<OpResult>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let runtime = Runtime::new().expect("failed to start async runtime");
        let config = Config::new();
        let session = Arc::new(Session::load());
        let api = ApiClient::new(config, session);
        let realtime = Arc::new(RealtimeClient::new(api.clone()));
        let cache = sync::new_shared_cache();
        let notifications = Arc::new(NotificationSync::new(
            Arc::clone(&cache),
            api.clone(),
            Arc::clone(&realtime),
        ));
        let poller = ConversationPoller::new(Arc::clone(&cache), api.clone(), runtime.handle().clone());
        let outbox = Outbox::new(Arc::clone(&cache), api.clone());

        let mut state = Self {
            route: Route::Login,
            runtime,
            api,
            realtime,
            notifications,
            poller,
            outbox,
            cache,
            email_input: String::new(),
            password_input: String::new(),
            auth_error: None,
            auth_loading: false,
            selected_conversation_id: None,
            message_input: String::new(),
            is_sending_message: false,
            ui_error: None,
            pending_login: None,
            pending_logout: None,
            pending_send: None,
            pending_refresh: None,
        };

        // A persisted session from a previous run resumes directly
        if let Some(user) = state.api.session().user() {
            state.route = home_for(user.role);
            state.start_session_sync(&user);
        }
        state
    }

    /// The authenticated user, if any
    pub fn current_user(&self) -> Option<UserInfo> {
        self.api.session().user()
    }

    /// Aggregate unread count from the cache
    pub fn unread_count(&self) -> u64 {
        self.cache.lock().expect("cache lock poisoned").unread_count
    }

    /// Re-resolve the shown route through the role guard
    pub fn resolve_route(&mut self) {
        let user = self.current_user();
        self.route = guard(self.route, user.as_ref());
    }

    /// Navigate (subject to the guard on the next frame)
    pub fn navigate(&mut self, route: Route) {
        if route != Route::Messages && self.route == Route::Messages {
            self.poller.close();
        }
        self.route = route;
    }

    /// Kick off a login with the form inputs
    pub fn start_login(&mut self) {
        if self.auth_loading {
            return;
        }
        let email = self.email_input.trim().to_string();
        let password = self.password_input.clone();
        if email.is_empty() || password.is_empty() {
            self.auth_error = Some("Email and password are required".to_string());
            return;
        }
        self.auth_loading = true;
        self.auth_error = None;

        let (tx, rx) = mpsc::channel();
        let api = self.api.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(api.login(email, password).await);
        });
        self.pending_login = Some(rx);
    }

    /// Kick off a logout: stop syncing, tear down realtime, invalidate the
    /// server-side token
    pub fn logout(&mut self) {
        self.poller.close();
        let (tx, rx) = mpsc::channel();
        let notifications = Arc::clone(&self.notifications);
        let api = self.api.clone();
        self.runtime.spawn(async move {
            notifications.stop().await;
            let _ = tx.send(api.logout().await);
        });
        self.pending_logout = Some(rx);
    }

    /// Select a conversation: start its message poll and mark its unread
    /// incoming messages read
    pub fn select_conversation(&mut self, conversation_id: u64) {
        self.selected_conversation_id = Some(conversation_id);
        self.poller.open(conversation_id);
        self.mark_conversation_read(conversation_id);
    }

    /// Send the composed message to the selected conversation
    pub fn send_current_message(&mut self) {
        let Some(conversation_id) = self.selected_conversation_id else {
            return;
        };
        let body = self.message_input.trim().to_string();
        if body.is_empty() {
            return;
        }
        self.message_input.clear();
        self.is_sending_message = true;

        let (tx, rx) = mpsc::channel();
        let outbox = self.outbox.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(outbox.send_text(conversation_id, body).await);
        });
        self.pending_send = Some(rx);
    }

    /// Retry a failed optimistic entry
    pub fn retry_message(&mut self, conversation_id: u64, local_id: Uuid) {
        let (tx, rx) = mpsc::channel();
        let outbox = self.outbox.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(outbox.retry(conversation_id, local_id).await);
        });
        self.pending_send = Some(rx);
        self.is_sending_message = true;
    }

    /// Dismiss a failed optimistic entry
    pub fn dismiss_message(&mut self, conversation_id: u64, local_id: Uuid) {
        self.outbox.dismiss(conversation_id, local_id);
    }

    /// Check for pending async operation results
    pub fn check_pending_operations(&mut self) {
        if let Some(ref rx) = self.pending_login {
            if let Ok(result) = rx.try_recv() {
                self.pending_login = None;
                self.auth_loading = false;
                match result {
                    Ok(auth) => {
                        self.email_input.clear();
                        self.password_input.clear();
                        self.route = home_for(auth.user.role);
                        self.start_session_sync(&auth.user);
                    }
                    Err(ClientError::Unauthorized) | Err(ClientError::Api { status: 422, .. }) => {
                        self.auth_error = Some("Invalid email or password".to_string());
                    }
                    Err(e) => {
                        self.auth_error = Some(e.to_string());
                    }
                }
            }
        }

        if let Some(ref rx) = self.pending_logout {
            if let Ok(result) = rx.try_recv() {
                self.pending_logout = None;
                if let Err(e) = result {
                    tracing::warn!("logout completed with error: {}", e);
                }
                sync::apply_shared(&self.cache, sync::cache::CacheEvent::SessionCleared);
                self.selected_conversation_id = None;
                self.ui_error = None;
                self.route = Route::Login;
            }
        }

        if let Some(ref rx) = self.pending_send {
            if let Ok(result) = rx.try_recv() {
                self.pending_send = None;
                self.is_sending_message = false;
                if let Err(e) = result {
                    self.ui_error = Some(describe_error("Could not send message", &e));
                }
            }
        }

        if let Some(ref rx) = self.pending_refresh {
            if let Ok(result) = rx.try_recv() {
                self.pending_refresh = None;
                if let Err(e) = result {
                    self.ui_error = Some(describe_error("Could not load conversations", &e));
                }
            }
        }
    }

    /// Start the background synchronizer for a fresh session
    fn start_session_sync(&mut self, user: &UserInfo) {
        let notifications = Arc::clone(&self.notifications);
        let user_id = user.id;
        self.runtime.spawn(async move {
            notifications.start(user_id).await;
        });

        let (tx, rx) = mpsc::channel();
        let api = self.api.clone();
        let cache = Arc::clone(&self.cache);
        self.runtime.spawn(async move {
            let _ = tx.send(sync::refresh_conversations(&cache, &api).await);
        });
        self.pending_refresh = Some(rx);
    }

    /// Mark every unread incoming message of a conversation read
    fn mark_conversation_read(&self, conversation_id: u64) {
        let Some(user) = self.current_user() else {
            return;
        };
        let unread_ids: Vec<u64> = {
            let state = self.cache.lock().expect("cache lock poisoned");
            state
                .conversation_messages(conversation_id)
                .iter()
                .filter(|m| m.is_unread_for(user.id))
                .filter_map(|m| m.id)
                .collect()
        };
        if unread_ids.is_empty() {
            return;
        }

        let api = self.api.clone();
        let cache = Arc::clone(&self.cache);
        self.runtime.spawn(async move {
            for message_id in unread_ids {
                if let Err(e) = sync::mark_message_read(&cache, &api, message_id).await {
                    tracing::warn!("failed to mark message {} read: {}", message_id, e);
                }
            }
        });
    }
}

/// Translate an error into the toast shown to the user
fn describe_error(context: &str, error: &ClientError) -> String {
    match error {
        ClientError::Unauthorized => "Your session has expired. Please log in again.".to_string(),
        other => format!("{}: {}", context, other),
    }
}
