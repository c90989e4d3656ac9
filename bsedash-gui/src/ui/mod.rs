pub mod bhav_copy;
pub mod live_quote;
pub mod sidebar;
pub mod top_nav;

use egui_plot::{Bar, BarChart, Legend, Plot};

/// One bar per labelled price, each in its own series so the legend names it.
pub fn price_chart(ui: &mut egui::Ui, id: &str, points: &[(&str, f64)]) {
    Plot::new(id)
        .height(250.0)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, (label, value)) in points.iter().enumerate() {
                let bar = Bar::new(i as f64, *value).width(0.6);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(*label));
            }
        });
}

pub fn change_color(ui: &egui::Ui, change: f64) -> egui::Color32 {
    if change > 0.0 {
        egui::Color32::GREEN
    } else if change < 0.0 {
        egui::Color32::RED
    } else {
        ui.style().visuals.text_color()
    }
}
