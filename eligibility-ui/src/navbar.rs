use eframe::egui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    About,
}

/// Static header: product title on the left, page links on the right.
pub fn show(ctx: &egui::Context, page: &mut Page) {
    egui::TopBottomPanel::top("navbar")
        .exact_height(56.0)
        .show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                ui.label(egui::RichText::new("Eligibility").size(24.0).strong());
                ui.label(egui::RichText::new("Checker").size(24.0));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.selectable_value(page, Page::About, "About");
                    ui.selectable_value(page, Page::Home, "Home");
                });
            });
        });
}

pub fn about(ui: &mut egui::Ui, base_url: &str) {
    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.heading("About");
        ui.add_space(10.0);
        ui.label("Create named eligibility rules and check entered data against a selection of them.");
        ui.label("Rules are stored and evaluated by the rules service.");
        ui.add_space(10.0);
        ui.label(format!("Service: {}", base_url));
    });
}
