use eframe::egui;
use eframe::egui::{Color32, RichText};
use eligibility_core::{EligibilityConfig, FieldSpec, RulesHttpClient};

use crate::navbar::{self, Page};
use crate::state_manager::EligibilityStateManager;

const HEADING: Color32 = Color32::from_rgb(67, 56, 202);
const ELIGIBLE: Color32 = Color32::from_rgb(22, 163, 74);
const NOT_ELIGIBLE: Color32 = Color32::from_rgb(220, 38, 38);
const DESTRUCTIVE_FILL: Color32 = Color32::from_rgb(185, 28, 28);

/// Rule management and eligibility check screen.
pub struct EligibilityApp {
    state: EligibilityStateManager,
    fields: Vec<FieldSpec>,
    base_url: String,
    page: Page,
}

impl EligibilityApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        client: RulesHttpClient,
        config: EligibilityConfig,
    ) -> Self {
        log::info!("Starting Eligibility Checker against {}", client.base_url());

        let base_url = client.base_url().to_string();
        let ctx = cc.egui_ctx.clone();
        let state =
            EligibilityStateManager::spawn(client, &config.ui, move || ctx.request_repaint());

        // Load the catalogue once on start-up
        state.fetch_rules();

        Self {
            state,
            fields: config.fields,
            base_url,
            page: Page::Home,
        }
    }
}

impl eframe::App for EligibilityApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.update_from_async();

        navbar::show(ctx, &mut self.page);

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.page {
                Page::Home => self.render_home(ui),
                Page::About => navbar::about(ui, &self.base_url),
            });
        });

        self.render_toasts(ctx);
    }
}

impl EligibilityApp {
    fn render_home(&mut self, ui: &mut egui::Ui) {
        ui.add_space(12.0);
        self.render_create_rule(ui);
        ui.add_space(16.0);

        ui.columns(2, |columns| {
            self.render_rule_list(&mut columns[0]);
            self.render_eligibility_check(&mut columns[1]);
        });

        if self.state.is_busy() {
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Contacting rules service...");
            });
        }
    }

    fn render_create_rule(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Create New Rule").size(22.0).strong().color(HEADING));
            ui.add_space(8.0);

            ui.add(
                egui::TextEdit::singleline(&mut self.state.rule_name)
                    .hint_text("Enter rule name")
                    .desired_width(f32::INFINITY),
            );
            ui.add(
                egui::TextEdit::singleline(&mut self.state.rule_expression)
                    .hint_text("Enter rule expression")
                    .desired_width(f32::INFINITY),
            );

            ui.add_space(4.0);
            let width = ui.available_width();
            if ui
                .add_sized([width, 28.0], egui::Button::new("➕ Add Rule"))
                .clicked()
            {
                self.state.add_rule();
            }
        });
    }

    fn render_rule_list(&self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Available Rules").size(22.0).strong().color(HEADING));
            ui.add_space(8.0);

            egui::ScrollArea::vertical()
                .max_height(200.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    let snapshot = &self.state.snapshot;

                    if !snapshot.rules_loaded && snapshot.rules.is_empty() {
                        ui.weak("Rules have not been loaded.");
                    } else if snapshot.rules.is_empty() {
                        ui.weak("No rules yet.");
                    }

                    for rule in &snapshot.rules {
                        ui.horizontal(|ui| {
                            let mut checked = snapshot.is_selected(&rule.id);
                            if ui.checkbox(&mut checked, rule.display_line()).changed() {
                                self.state.toggle_rule(&rule.id);
                            }

                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    let delete = egui::Button::new(
                                        RichText::new("✖").color(NOT_ELIGIBLE),
                                    )
                                    .frame(false);
                                    if ui.add(delete).on_hover_text("Delete rule").clicked() {
                                        self.state.delete_rule(&rule.id);
                                    }
                                },
                            );
                        });
                    }
                });
        });
    }

    fn render_eligibility_check(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.label(RichText::new("Eligibility Check").size(22.0).strong().color(HEADING));
            ui.add_space(8.0);

            for field in &self.fields {
                let buffer = self
                    .state
                    .field_values
                    .entry(field.key.clone())
                    .or_default();
                let response = ui.add(
                    egui::TextEdit::singleline(buffer)
                        .hint_text(field.placeholder.as_str())
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    self.state.field_changed(&field.key);
                }
            }

            ui.add_space(8.0);
            let width = ui.available_width();
            if ui
                .add_sized([width, 28.0], egui::Button::new("Check Eligibility"))
                .clicked()
            {
                self.state.check_eligibility();
            }

            if let Some(verdict) = self.state.snapshot.eligibility {
                let (icon, color) = if verdict.is_eligible() {
                    ("✔", ELIGIBLE)
                } else {
                    ("✖", NOT_ELIGIBLE)
                };

                ui.add_space(12.0);
                ui.vertical_centered(|ui| {
                    ui.label(
                        RichText::new(format!("{} {}", icon, verdict))
                            .size(28.0)
                            .strong()
                            .color(color),
                    );
                });
            }
        });
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        if self.state.snapshot.toasts.is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                for toast in self.state.snapshot.toasts.iter() {
                    let mut frame = egui::Frame::popup(ui.style());
                    if toast.is_destructive() {
                        frame = frame.fill(DESTRUCTIVE_FILL);
                    }

                    frame.show(ui, |ui| {
                        ui.set_max_width(320.0);
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                let color = if toast.is_destructive() {
                                    Color32::WHITE
                                } else {
                                    ui.visuals().strong_text_color()
                                };
                                ui.label(RichText::new(toast.title.as_str()).strong().color(color));
                                ui.label(RichText::new(toast.description.as_str()).color(color));
                            });
                            if ui.small_button("✖").clicked() {
                                self.state.dismiss_toast(toast.id);
                            }
                        });
                    });
                    ui.add_space(6.0);
                }
            });
    }
}
