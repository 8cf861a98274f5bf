//! Views
//!
//! Top bar, login, role-gated dashboards and the messaging view. These are
//! thin consumers of the shared cache; all mutation goes through the state
//! methods, never directly into the sync layer.

pub mod dashboard_view;
pub mod login_view;
pub mod messages_view;

use eframe::egui;

use crate::egui_app::routes::{home_for, Route};
use crate::egui_app::state::AppState;
use crate::egui_app::theme::colors;

/// Top navigation bar with the unread badge, plus the error toast
pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_bar")
        .frame(egui::Frame::default().fill(colors::TOP_BAR_BG).inner_margin(8))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("🚗 RideLink")
                        .size(18.0)
                        .strong()
                        .color(colors::TEXT_LIGHT),
                );

                if let Some(user) = state.current_user() {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Log out").clicked() {
                            state.logout();
                        }

                        let unread = state.unread_count();
                        let messages_label = if unread > 0 {
                            format!("Messages ({})", unread)
                        } else {
                            "Messages".to_string()
                        };
                        if ui.button(messages_label).clicked() {
                            state.navigate(Route::Messages);
                        }
                        if ui.button("Dashboard").clicked() {
                            state.navigate(home_for(user.role));
                        }

                        ui.label(
                            egui::RichText::new(user.name.as_str())
                                .color(colors::TEXT_SECONDARY),
                        );
                    });
                }
            });
        });

    if let Some(error) = state.ui_error.clone() {
        egui::TopBottomPanel::bottom("error_toast")
            .frame(egui::Frame::default().fill(colors::SIDEBAR_BG).inner_margin(8))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            state.ui_error = None;
                        }
                    });
                });
            });
    }
}

/// Main panel, dispatched by the guarded route
pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState) {
    state.resolve_route();
    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(colors::MAIN_BG))
        .show(ctx, |ui| match state.route {
            Route::Login => login_view::render(ui, state),
            Route::Messages => messages_view::render(ui, state),
            Route::ClientDashboard | Route::OwnerDashboard | Route::AdminDashboard => {
                dashboard_view::render(ui, state)
            }
        });
}
