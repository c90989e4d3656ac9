use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use bsedash_data::{
    download_bhavcopy_for_today, fetch_live_quote, list_snapshots, BhavCopy, DashboardConfig,
    FetchFailure, FetchState, LiveQuote, QuoteMessage, ReqwestTransport, SnapshotFile, Transport,
};
use log::{error, info, warn};

use crate::ui::{bhav_copy, live_quote, sidebar, top_nav};

/// Which file the Bhav Copy section is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotSource {
    Sample(PathBuf),
    Dated(SnapshotFile),
}

impl SnapshotSource {
    pub fn path(&self) -> &PathBuf {
        match self {
            SnapshotSource::Sample(path) => path,
            SnapshotSource::Dated(snapshot) => &snapshot.path,
        }
    }

    pub fn label(&self) -> String {
        match self {
            SnapshotSource::Sample(_) => "Sample".to_string(),
            SnapshotSource::Dated(snapshot) => snapshot.date.format("%Y-%m-%d").to_string(),
        }
    }
}

pub struct BseDashApp {
    pub config: DashboardConfig,
    pub transport: Option<Arc<dyn Transport>>,
    pub fetch_state: FetchState,
    // Bhav Copy
    pub snapshots: Vec<SnapshotFile>,
    pub source: SnapshotSource,
    pub table: Option<Result<BhavCopy, String>>,
    pub instruments: Vec<String>,
    pub selected_instrument: Option<String>,
    // Live quotes
    pub selected_ticker: String,
    pub live_quote: Option<Result<LiveQuote, String>>,
    pub is_fetching_quote: bool,
    pub quote_receiver: Option<Receiver<QuoteMessage>>,
}

impl BseDashApp {
    /// Builds the app and runs the one startup fetch for today's snapshot.
    pub fn startup(config: DashboardConfig) -> Self {
        let transport: Option<Arc<dyn Transport>> = match ReqwestTransport::from_config(&config) {
            Ok(t) => Some(Arc::new(t)),
            Err(e) => {
                error!("Failed to create HTTP client: {}", e);
                None
            }
        };

        let fetch_state = match &transport {
            Some(t) => FetchState::from_result(&download_bhavcopy_for_today(t.as_ref(), &config)),
            None => FetchState::Failed(FetchFailure::Transport(
                "HTTP client unavailable".to_string(),
            )),
        };
        if let FetchState::Failed(failure) = &fetch_state {
            warn!("{}", failure);
        }

        Self::new(config, transport, fetch_state)
    }

    pub fn new(
        config: DashboardConfig,
        transport: Option<Arc<dyn Transport>>,
        fetch_state: FetchState,
    ) -> Self {
        let snapshots = list_snapshots(&config.data_dir).unwrap_or_else(|e| {
            warn!("Failed to list snapshots: {}", e);
            Vec::new()
        });

        // Prefer what was just fetched, then the newest file on disk.
        let source = match &fetch_state {
            FetchState::Fetched(snapshot) if snapshot.exists() => {
                SnapshotSource::Dated(snapshot.clone())
            }
            _ => snapshots
                .first()
                .cloned()
                .map(SnapshotSource::Dated)
                .unwrap_or_else(|| SnapshotSource::Sample(config.sample_file())),
        };

        let selected_ticker = config.tickers.first().cloned().unwrap_or_default();

        let mut app = Self {
            config,
            transport,
            fetch_state,
            snapshots,
            source: source.clone(),
            table: None,
            instruments: Vec::new(),
            selected_instrument: None,
            selected_ticker,
            live_quote: None,
            is_fetching_quote: false,
            quote_receiver: None,
        };
        app.load_snapshot(source);
        app
    }

    pub fn load_snapshot(&mut self, source: SnapshotSource) {
        info!("Loading snapshot: {}", source.path().display());
        self.instruments.clear();
        self.selected_instrument = None;

        self.table = Some(match BhavCopy::from_path(source.path()) {
            Ok(table) => {
                // Missing columns are reported by the section, not here.
                self.instruments = table.instruments().unwrap_or_default();
                self.selected_instrument = self.instruments.first().cloned();
                Ok(table)
            }
            Err(e) => {
                warn!("Could not load Bhav Copy: {}", e);
                Err(e.to_string())
            }
        });
        self.source = source;
    }

    pub fn request_quote(&mut self, ticker: String) {
        self.selected_ticker = ticker.clone();
        let Some(transport) = self.transport.clone() else {
            self.live_quote = Some(Err("HTTP client unavailable".to_string()));
            return;
        };

        self.live_quote = None;
        self.is_fetching_quote = true;

        let template = self.config.quote_url_template.clone();
        let (tx, rx) = mpsc::channel();
        self.quote_receiver = Some(rx);

        thread::spawn(move || {
            let result = fetch_live_quote(transport.as_ref(), &template, &ticker)
                .map_err(|e| e.to_string());
            let _ = tx.send(QuoteMessage::Done(ticker, result));
        });
    }

    /// Drains the quote channel. Results for a ticker no longer selected are dropped.
    pub fn poll_quote(&mut self) {
        let Some(rx) = &self.quote_receiver else {
            return;
        };

        match rx.try_recv() {
            Ok(QuoteMessage::Done(ticker, result)) => {
                self.is_fetching_quote = false;
                self.quote_receiver = None;
                if ticker == self.selected_ticker {
                    self.live_quote = Some(result);
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.is_fetching_quote = false;
                self.quote_receiver = None;
                self.live_quote = Some(Err("Quote thread disconnected".to_string()));
            }
        }
    }
}

impl eframe::App for BseDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_quote();
        if self.is_fetching_quote {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        egui::TopBottomPanel::top("top_nav").show(ctx, |ui| {
            top_nav::render(ui, self);
        });

        egui::SidePanel::left("sidebar")
            .exact_width(220.0)
            .show(ctx, |ui| {
                sidebar::render(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                bhav_copy::render(ui, self);
                ui.add_space(20.0);
                ui.separator();
                live_quote::render(ui, self);
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsedash_data::{FetchError, HttpResponse};
    use chrono::NaiveDate;
    use std::fs;

    struct Canned(u16, &'static str);

    impl Transport for Canned {
        fn get(&self, _url: &str) -> Result<HttpResponse, FetchError> {
            Ok(HttpResponse::new(self.0, self.1))
        }
    }

    fn config_in(dir: &std::path::Path) -> DashboardConfig {
        DashboardConfig {
            data_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn falls_back_to_sample_without_dated_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bhav_copy.CSV"),
            "FinInstrmNm,OpnPric,ClsPric\nABC LTD,100,110\nXYZ LTD,50,40\n",
        )
        .unwrap();

        let not_available = FetchState::Failed(FetchFailure::NotAvailable {
            date: NaiveDate::from_ymd_opt(2025, 7, 5).unwrap(),
            status: 404,
        });
        let app = BseDashApp::new(config_in(dir.path()), None, not_available);

        assert!(matches!(app.source, SnapshotSource::Sample(_)));
        assert!(matches!(&app.fetch_state, FetchState::Failed(f) if f.is_not_available()));
        assert_eq!(app.instruments, vec!["ABC LTD", "XYZ LTD"]);
        assert_eq!(app.selected_instrument.as_deref(), Some("ABC LTD"));
    }

    #[test]
    fn prefers_newest_dated_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("20250703.csv"), "FinInstrmNm,OpnPric,ClsPric\nOLD,1,1\n").unwrap();
        fs::write(dir.path().join("20250704.csv"), "FinInstrmNm,OpnPric,ClsPric\nNEW,1,1\n").unwrap();

        let app = BseDashApp::new(config_in(dir.path()), None, FetchState::NotFetched);

        assert_eq!(app.source.label(), "2025-07-04");
        assert_eq!(app.instruments, vec!["NEW"]);
        assert_eq!(app.snapshots.len(), 2);
    }

    #[test]
    fn missing_file_degrades_to_error() {
        let dir = tempfile::tempdir().unwrap();
        let app = BseDashApp::new(config_in(dir.path()), None, FetchState::NotFetched);

        assert!(matches!(app.table, Some(Err(_))));
        assert!(app.instruments.is_empty());
    }

    #[test]
    fn quote_result_arrives_over_channel() {
        let dir = tempfile::tempdir().unwrap();
        let transport: Arc<dyn Transport> = Arc::new(Canned(
            200,
            r#"{"chart":{"result":[{"meta":{"regularMarketPrice":110.0,"chartPreviousClose":100.0}}]}}"#,
        ));
        let mut app = BseDashApp::new(config_in(dir.path()), Some(transport), FetchState::NotFetched);

        app.request_quote("TCS".to_string());
        assert!(app.is_fetching_quote);

        for _ in 0..200 {
            app.poll_quote();
            if !app.is_fetching_quote {
                break;
            }
            thread::sleep(std::time::Duration::from_millis(10));
        }

        let quote = app.live_quote.clone().unwrap().unwrap();
        assert_eq!(quote.symbol, "TCS.BO");
        assert_eq!(format!("{:.2}", quote.change_percent().unwrap()), "10.00");
    }

    #[test]
    fn fetched_snapshot_is_selected() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let snapshot = SnapshotFile::in_dir(dir.path(), date);
        fs::write(&snapshot.path, "FinInstrmNm,OpnPric,ClsPric\nABC,1,2\n").unwrap();

        let app = BseDashApp::new(
            config_in(dir.path()),
            None,
            FetchState::Fetched(snapshot.clone()),
        );
        assert_eq!(app.source, SnapshotSource::Dated(snapshot));
    }
}
