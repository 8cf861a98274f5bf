use eframe::egui;

use crate::egui_app::routes::Route;
use crate::egui_app::state::AppState;
use crate::egui_app::theme::colors;

/// Role-gated dashboard shell. The marketplace CRUD pages (cars, bookings,
/// subscriptions) live in the web app; the desktop shell only surfaces
/// navigation and the messaging entry point with its unread badge.
pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(user) = state.current_user() else {
        return;
    };

    let (title, blurb) = match state.route {
        Route::OwnerDashboard => (
            "Owner dashboard",
            "Manage your listed cars and answer booking requests from renters.",
        ),
        Route::AdminDashboard => (
            "Admin dashboard",
            "Review listings, users and reported conversations.",
        ),
        _ => (
            "Find a car",
            "Browse listings and message owners about availability.",
        ),
    };

    ui.add_space(24.0);
    ui.vertical_centered(|ui| {
        ui.label(
            egui::RichText::new(format!("Welcome back, {}", user.name))
                .size(24.0)
                .strong()
                .color(colors::TEXT_DARK),
        );
        ui.add_space(4.0);
        ui.label(egui::RichText::new(title).size(18.0).color(colors::TEXT_DARK));
        ui.add_space(4.0);
        ui.label(egui::RichText::new(blurb).color(colors::TEXT_SECONDARY));
        ui.add_space(20.0);

        let unread = state.unread_count();
        let label = if unread > 0 {
            format!("Open messages ({} unread)", unread)
        } else {
            "Open messages".to_string()
        };
        if ui.add_sized([240.0, 36.0], egui::Button::new(label)).clicked() {
            state.navigate(Route::Messages);
        }
    });
}
