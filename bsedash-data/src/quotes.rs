use log::{debug, warn};
use serde::Deserialize;

use crate::error::QuoteError;
use crate::http::Transport;
use crate::metrics::percent_change_or_zero;
use crate::models::LiveQuote;

/// Yahoo suffix for BSE listings.
pub const EXCHANGE_SUFFIX: &str = ".BO";

pub fn provider_symbol(ticker: &str) -> String {
    let ticker = ticker.trim().to_uppercase();
    if ticker.ends_with(EXCHANGE_SUFFIX) {
        ticker
    } else {
        format!("{}{}", ticker, EXCHANGE_SUFFIX)
    }
}

pub fn quote_url(template: &str, ticker: &str) -> String {
    template.replace("{symbol}", &provider_symbol(ticker))
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    indicators: Option<Indicators>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    regular_market_previous_close: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    regular_market_open: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<IndicatorQuote>,
}

#[derive(Debug, Deserialize)]
struct IndicatorQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
}

/// Maps a chart response body onto a `LiveQuote`. Fields the provider left
/// out stay `None`.
pub fn parse_chart_response(symbol: &str, body: &[u8]) -> Result<LiveQuote, QuoteError> {
    let response: ChartResponse = serde_json::from_slice(body)?;

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(LiveQuote {
            symbol: symbol.to_string(),
            ..Default::default()
        });
    };

    let meta = result.meta;
    let open_from_bars = result
        .indicators
        .and_then(|i| i.quote.into_iter().next())
        .and_then(|q| q.open.into_iter().flatten().next());

    Ok(LiveQuote {
        symbol: symbol.to_string(),
        current_price: meta.regular_market_price,
        previous_close: meta
            .regular_market_previous_close
            .or(meta.previous_close)
            .or(meta.chart_previous_close),
        open_price: meta.regular_market_open.or(open_from_bars),
    })
}

impl LiveQuote {
    /// Current price, or `MissingPrice` when the provider omitted it.
    pub fn price(&self) -> Result<f64, QuoteError> {
        self.current_price
            .ok_or_else(|| QuoteError::MissingPrice(self.symbol.clone()))
    }

    pub fn change_percent(&self) -> Result<f64, QuoteError> {
        Ok(percent_change_or_zero(self.previous_close, self.price()?))
    }

    /// Bars for the chart; absent values are skipped.
    pub fn chart_points(&self) -> Vec<(&'static str, f64)> {
        [
            ("Open", self.open_price),
            ("Prev Close", self.previous_close),
            ("Current", self.current_price),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }
}

/// Fetches one live quote. A quote without a current price is an error.
pub fn fetch_live_quote(
    transport: &dyn Transport,
    url_template: &str,
    ticker: &str,
) -> Result<LiveQuote, QuoteError> {
    let symbol = provider_symbol(ticker);
    let url = quote_url(url_template, ticker);
    debug!("Fetching live quote for {}", symbol);

    let response = transport.get(&url)?;
    if !response.is_ok() {
        warn!("Quote provider returned {} for {}", response.status, symbol);
        return Err(QuoteError::Status {
            symbol,
            status: response.status,
        });
    }

    let quote = parse_chart_response(&symbol, &response.body)?;
    quote.price()?;
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_QUOTE_URL_TEMPLATE;
    use crate::error::FetchError;
    use crate::http::HttpResponse;

    const CHART: &str = r#"{"chart":{"result":[{"meta":{"currency":"INR","symbol":"TCS.BO",
        "regularMarketPrice":3450.5,"chartPreviousClose":3400.0,"previousClose":3410.0},
        "indicators":{"quote":[{"open":[null,3405.0],"close":[3450.5]}]}}],"error":null}}"#;

    struct Canned(u16, String);

    impl Transport for Canned {
        fn get(&self, _url: &str) -> Result<HttpResponse, FetchError> {
            Ok(HttpResponse::new(self.0, self.1.clone()))
        }
    }

    #[test]
    fn symbol_gets_bse_suffix_once() {
        assert_eq!(provider_symbol("tcs"), "TCS.BO");
        assert_eq!(provider_symbol("TCS.BO"), "TCS.BO");
        assert_eq!(
            quote_url(DEFAULT_QUOTE_URL_TEMPLATE, "INFY"),
            "https://query1.finance.yahoo.com/v8/finance/chart/INFY.BO?range=1d&interval=1d"
        );
    }

    #[test]
    fn parses_meta_and_first_open() {
        let quote = parse_chart_response("TCS.BO", CHART.as_bytes()).unwrap();
        assert_eq!(quote.current_price, Some(3450.5));
        assert_eq!(quote.previous_close, Some(3410.0));
        assert_eq!(quote.open_price, Some(3405.0));
        assert_eq!(quote.chart_points().len(), 3);
    }

    #[test]
    fn missing_previous_close_means_zero_change() {
        let body = r#"{"chart":{"result":[{"meta":{"regularMarketPrice":10.0}}]}}"#;
        let quote = parse_chart_response("X.BO", body.as_bytes()).unwrap();
        assert_eq!(quote.change_percent().unwrap(), 0.0);
        assert_eq!(quote.chart_points(), vec![("Current", 10.0)]);
    }

    #[test]
    fn missing_price_is_distinguishable() {
        let body = r#"{"chart":{"result":[{"meta":{"chartPreviousClose":10.0}}]}}"#;
        let transport = Canned(200, body.to_string());
        let err = fetch_live_quote(&transport, "{symbol}", "SBIN").unwrap_err();
        assert!(matches!(err, QuoteError::MissingPrice(ref s) if s == "SBIN.BO"));

        let empty = Canned(200, r#"{"chart":{"result":null}}"#.to_string());
        assert!(matches!(
            fetch_live_quote(&empty, "{symbol}", "SBIN"),
            Err(QuoteError::MissingPrice(_))
        ));
    }

    #[test]
    fn non_200_and_garbage_are_errors() {
        let not_found = Canned(404, String::new());
        assert!(matches!(
            fetch_live_quote(&not_found, "{symbol}", "LT"),
            Err(QuoteError::Status { status: 404, .. })
        ));

        let garbage = Canned(200, "<html>".to_string());
        assert!(matches!(
            fetch_live_quote(&garbage, "{symbol}", "LT"),
            Err(QuoteError::Parse(_))
        ));
    }

    #[test]
    fn change_uses_previous_close() {
        let transport = Canned(200, CHART.to_string());
        let quote = fetch_live_quote(&transport, "{symbol}", "TCS").unwrap();
        let change = quote.change_percent().unwrap();
        assert_eq!(format!("{:.2}", change), "1.19");
    }
}
