use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::colors;
use crate::shared::messaging::{ChatMessage, DeliveryState};

/// Row data extracted from the cache for the conversation list
struct ConversationRow {
    id: u64,
    name: String,
    preview: String,
    unread: bool,
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let Some(user) = state.current_user() else {
        return;
    };

    // Snapshot the cache once per frame; the UI never holds the lock across
    // widget closures.
    let (rows, selected_messages) = {
        let cache = state.cache.lock().expect("cache lock poisoned");
        let rows: Vec<ConversationRow> = cache
            .conversations_by_recency()
            .iter()
            .map(|c| ConversationRow {
                id: c.id,
                name: c.display_name(user.id),
                preview: c
                    .latest_message
                    .as_ref()
                    .map(|m| m.preview(36))
                    .unwrap_or_default(),
                unread: c
                    .participants
                    .iter()
                    .find(|p| p.user_id == user.id)
                    .map(|p| p.unread)
                    .unwrap_or(false),
            })
            .collect();
        let selected_messages: Vec<ChatMessage> = state
            .selected_conversation_id
            .map(|id| cache.conversation_messages(id).to_vec())
            .unwrap_or_default();
        (rows, selected_messages)
    };

    egui::SidePanel::left("conversation_list")
        .default_width(260.0)
        .frame(egui::Frame::default().fill(colors::SIDEBAR_BG).inner_margin(8))
        .show_inside(ui, |ui| {
            ui.label(
                egui::RichText::new("Conversations")
                    .size(16.0)
                    .strong()
                    .color(colors::TEXT_LIGHT),
            );
            ui.add_space(8.0);

            if rows.is_empty() {
                ui.label(
                    egui::RichText::new("No conversations yet")
                        .color(colors::TEXT_SECONDARY),
                );
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for row in &rows {
                    let selected = state.selected_conversation_id == Some(row.id);
                    let title = if row.unread {
                        format!("● {}", row.name)
                    } else {
                        row.name.clone()
                    };
                    let text = egui::RichText::new(format!("{}\n{}", title, row.preview))
                        .color(colors::TEXT_LIGHT);
                    if ui.selectable_label(selected, text).clicked() {
                        state.select_conversation(row.id);
                    }
                    ui.add_space(2.0);
                }
            });
        });

    egui::CentralPanel::default()
        .frame(egui::Frame::default().fill(colors::MAIN_BG).inner_margin(8))
        .show_inside(ui, |ui| {
            let Some(conversation_id) = state.selected_conversation_id else {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Select a conversation")
                            .color(colors::TEXT_SECONDARY),
                    );
                });
                return;
            };

            egui::TopBottomPanel::bottom("input_bar")
                .frame(egui::Frame::default().fill(colors::MAIN_BG).inner_margin(4))
                .show_inside(ui, |ui| {
                    ui.horizontal(|ui| {
                        let input = ui.add_sized(
                            [ui.available_width() - 70.0, 28.0],
                            egui::TextEdit::singleline(&mut state.message_input)
                                .hint_text("Write a message"),
                        );
                        let submitted =
                            input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        let label = if state.is_sending_message { "..." } else { "Send" };
                        if ui.add_sized([60.0, 28.0], egui::Button::new(label)).clicked()
                            || submitted
                        {
                            state.send_current_message();
                        }
                    });
                });

            egui::CentralPanel::default()
                .frame(egui::Frame::default().fill(colors::MAIN_BG))
                .show_inside(ui, |ui| {
                    egui::ScrollArea::vertical()
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for message in &selected_messages {
                                render_bubble(ui, state, conversation_id, message, user.id);
                            }
                        });
                });
        });
}

fn render_bubble(
    ui: &mut egui::Ui,
    state: &mut AppState,
    conversation_id: u64,
    message: &ChatMessage,
    current_user_id: u64,
) {
    let outgoing = message.sender_id == current_user_id;
    let (fill, align) = if outgoing {
        (colors::BUBBLE_OUTGOING, egui::Align::Max)
    } else {
        (colors::BUBBLE_INCOMING, egui::Align::Min)
    };

    ui.with_layout(egui::Layout::top_down(align), |ui| {
        egui::Frame::default()
            .fill(fill)
            .corner_radius(6)
            .inner_margin(8)
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.7);
                if let Some(ref body) = message.body {
                    ui.label(egui::RichText::new(body.as_str()).color(colors::TEXT_DARK));
                }
                if let Some(ref attachment) = message.attachment_url {
                    ui.hyperlink_to("📎 attachment", state.api.config().asset_url(attachment));
                }

                match message.delivery {
                    DeliveryState::Pending => {
                        ui.label(
                            egui::RichText::new("sending...")
                                .small()
                                .color(colors::PENDING),
                        );
                    }
                    DeliveryState::Failed => {
                        ui.horizontal(|ui| {
                            ui.label(
                                egui::RichText::new("not delivered")
                                    .small()
                                    .color(colors::ERROR),
                            );
                            if ui.small_button("Retry").clicked() {
                                state.retry_message(conversation_id, message.local_id);
                            }
                            if ui.small_button("Dismiss").clicked() {
                                state.dismiss_message(conversation_id, message.local_id);
                            }
                        });
                    }
                    DeliveryState::Sent => {
                        if outgoing && message.read_at.is_some() {
                            ui.label(
                                egui::RichText::new("read")
                                    .small()
                                    .color(colors::TEXT_SECONDARY),
                            );
                        }
                    }
                }
            });
        ui.add_space(4.0);
    });
}
