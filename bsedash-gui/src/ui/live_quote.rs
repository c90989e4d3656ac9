use crate::app::BseDashApp;
use crate::ui::{change_color, price_chart};
use bsedash_data::metrics::{format_price, format_signed_percent};
use bsedash_data::quotes::provider_symbol;

pub fn render(ui: &mut egui::Ui, app: &mut BseDashApp) {
    ui.heading("🌐 Live BSE Stock");
    ui.add_space(10.0);

    if app.config.tickers.is_empty() {
        ui.label("No tickers configured.");
        return;
    }

    let mut selected = app.selected_ticker.clone();
    let mut refresh = false;
    ui.horizontal(|ui| {
        egui::ComboBox::from_id_salt("live_ticker")
            .selected_text(selected.clone())
            .show_ui(ui, |ui| {
                for ticker in &app.config.tickers {
                    ui.selectable_value(&mut selected, ticker.clone(), ticker.as_str());
                }
            });

        refresh = ui
            .add_enabled(!app.is_fetching_quote, egui::Button::new("⟳ Refresh"))
            .clicked();
    });

    let first_request = app.live_quote.is_none() && !app.is_fetching_quote;
    if selected != app.selected_ticker || refresh || first_request {
        app.request_quote(selected);
    }

    ui.add_space(10.0);

    if app.is_fetching_quote {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(format!("Fetching {}...", provider_symbol(&app.selected_ticker)));
        });
        return;
    }

    match &app.live_quote {
        Some(Ok(quote)) => match (quote.price(), quote.change_percent()) {
            (Ok(price), Ok(change)) => {
                ui.heading(format!("📡 {} (Real-Time)", app.selected_ticker));
                ui.horizontal(|ui| {
                    ui.label("Current Price");
                    ui.strong(format_price(price));
                    ui.colored_label(change_color(ui, change), format_signed_percent(change));
                });
                price_chart(ui, "live_chart", &quote.chart_points());
            }
            (Err(e), _) | (_, Err(e)) => {
                ui.colored_label(egui::Color32::RED, format!("⚠ {}", e));
            }
        },
        Some(Err(e)) => {
            ui.colored_label(
                egui::Color32::RED,
                format!(
                    "⚠ Could not fetch data for `{}`: {}",
                    provider_symbol(&app.selected_ticker),
                    e
                ),
            );
        }
        None => {}
    }
}
