use crate::app::BseDashApp;
use bsedash_data::FetchState;

pub fn render(ui: &mut egui::Ui, app: &mut BseDashApp) {
    ui.horizontal(|ui| {
        ui.set_height(50.0);
        ui.add_space(10.0);

        ui.heading("📈 BSE Stock Data Dashboard");

        // Outcome of the startup fetch
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(10.0);
            match &app.fetch_state {
                FetchState::Fetched(snapshot) => {
                    ui.colored_label(
                        egui::Color32::GREEN,
                        format!("✅ Bhav copy saved: {}", snapshot.path.display()),
                    );
                }
                // A holiday is expected; network trouble is not.
                FetchState::Failed(failure) if failure.is_not_available() => {
                    ui.colored_label(egui::Color32::YELLOW, format!("📅 {}", failure));
                }
                FetchState::Failed(failure) => {
                    ui.colored_label(egui::Color32::RED, format!("❌ {}", failure));
                }
                FetchState::NotFetched => {
                    ui.label("Bhav copy not fetched");
                }
            }
        });
    });

    ui.separator();
}
