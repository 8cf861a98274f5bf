/**
 * RideLink Desktop - Main Entry Point
 *
 * Implements eframe::App over the shared AppState: every frame drains
 * pending async results, then renders the guarded route.
 */
use eframe::egui;
use ridelink::egui_app::{views, AppState};

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "RideLink",
        options,
        Box::new(|_cc| Ok(Box::new(RideLinkApp::default()))),
    )
}

/// Main application state
struct RideLinkApp {
    state: AppState,
}

impl Default for RideLinkApp {
    fn default() -> Self {
        Self {
            state: AppState::new(),
        }
    }
}

impl eframe::App for RideLinkApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.check_pending_operations();

        views::render_top_bar(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state);

        // keep polling results and push events flowing into the UI
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
