use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::colors;

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let available = ui.available_rect_before_wrap();

    ui.vertical_centered(|ui| {
        let top_space = (available.height() - 260.0).max(0.0) / 2.0;
        ui.add_space(top_space);

        ui.label(
            egui::RichText::new("🚗 RideLink")
                .size(32.0)
                .strong()
                .color(colors::TEXT_DARK),
        );
        ui.add_space(8.0);
        ui.label(
            egui::RichText::new("Sign in to your account")
                .size(16.0)
                .color(colors::TEXT_SECONDARY),
        );
        ui.add_space(16.0);

        if let Some(ref error) = state.auth_error {
            ui.colored_label(colors::ERROR, error);
            ui.add_space(8.0);
        }

        let input_width = 280.0;

        ui.add_sized(
            [input_width, 28.0],
            egui::TextEdit::singleline(&mut state.email_input).hint_text("Email"),
        );
        ui.add_space(8.0);

        let password = ui.add_sized(
            [input_width, 28.0],
            egui::TextEdit::singleline(&mut state.password_input)
                .password(true)
                .hint_text("Password"),
        );
        ui.add_space(12.0);

        let submitted =
            password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let label = if state.auth_loading { "Signing in..." } else { "Sign in" };
        if ui.add_sized([input_width, 32.0], egui::Button::new(label)).clicked() || submitted {
            state.start_login();
        }
    });
}
