use crate::fetch::FetchError;
use crate::providers::get_text;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ticker symbols the dashboard knows how to price, mapped to CoinGecko ids.
pub const SYMBOL_MAP: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("SOL", "solana"),
    ("ADA", "cardano"),
    ("DOGE", "dogecoin"),
    ("XRP", "ripple"),
    ("LTC", "litecoin"),
    ("DOT", "polkadot"),
    ("AVAX", "avalanche-2"),
    ("MATIC", "polygon"),
    ("BNB", "binancecoin"),
];

pub fn coin_id(symbol: &str) -> Option<&'static str> {
    SYMBOL_MAP
        .iter()
        .find(|(sym, _)| sym.eq_ignore_ascii_case(symbol))
        .map(|(_, id)| *id)
}

/// Ordered watch-list of ticker symbols. Insertion order is what the widget
/// renders; duplicates are suppressed and unknown symbols rejected without
/// changing the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watchlist {
    symbols: Vec<String>,
}

impl Watchlist {
    pub fn new(symbols: Vec<String>) -> Self {
        let mut list = Self::default();
        for sym in symbols {
            // Drops anything unknown from a stale or hand-edited preference.
            let _ = list.add(&sym);
        }
        list
    }

    /// Returns `Ok(true)` when the symbol was appended, `Ok(false)` when it
    /// was already present.
    pub fn add(&mut self, symbol: &str) -> Result<bool, FetchError> {
        let symbol = symbol.trim().to_ascii_uppercase();
        if symbol.is_empty() || coin_id(&symbol).is_none() {
            return Err(FetchError::UnknownSymbol(symbol));
        }
        if self.symbols.contains(&symbol) {
            return Ok(false);
        }
        self.symbols.push(symbol);
        Ok(true)
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.symbols.len();
        self.symbols.retain(|s| !s.eq_ignore_ascii_case(symbol));
        self.symbols.len() != before
    }

    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// One priced row of the markets widget. Price and change stay `None` when
/// the provider response lacks the field, rendered as a dash.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRow {
    pub symbol: String,
    pub price: Option<f64>,
    pub change_24h: Option<f64>,
}

/// Batch-price the watch-list in the given currency.
pub fn fetch_prices(
    client: &Client,
    watchlist: &Watchlist,
    currency: &str,
) -> Result<Vec<MarketRow>, FetchError> {
    let ids: Vec<&str> = watchlist
        .symbols()
        .iter()
        .filter_map(|sym| coin_id(sym))
        .collect();
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let url = format!(
        "https://api.coingecko.com/api/v3/simple/price?ids={}&vs_currencies={}&include_24hr_change=true",
        ids.join(","),
        currency.to_ascii_lowercase()
    );
    let body = get_text(client, &url)?;
    parse_price_response(&body, watchlist, currency)
}

/// Assemble rows in watch-list order from the raw provider JSON.
pub fn parse_price_response(
    body: &str,
    watchlist: &Watchlist,
    currency: &str,
) -> Result<Vec<MarketRow>, FetchError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|err| FetchError::Upstream(format!("price response: {err}")))?;
    let cur = currency.to_ascii_lowercase();
    let change_key = format!("{cur}_24h_change");

    let rows = watchlist
        .symbols()
        .iter()
        .map(|sym| {
            let entry = coin_id(sym).and_then(|id| json.get(id));
            MarketRow {
                symbol: sym.clone(),
                price: entry.and_then(|e| e.get(&cur)).and_then(Value::as_f64),
                change_24h: entry.and_then(|e| e.get(&change_key)).and_then(Value::as_f64),
            }
        })
        .collect();
    Ok(rows)
}
