use codash::fetch::FetchError;
use codash::providers::markets::{coin_id, parse_price_response, Watchlist};

#[test]
fn add_normalizes_case_and_whitespace() {
    let mut list = Watchlist::default();
    assert_eq!(list.add(" btc "), Ok(true));
    assert_eq!(list.symbols(), ["BTC"]);
}

#[test]
fn duplicate_add_is_a_no_op() {
    let mut list = Watchlist::default();
    assert_eq!(list.add("BTC"), Ok(true));
    assert_eq!(list.add("btc"), Ok(false));
    assert_eq!(list.symbols().len(), 1);
}

#[test]
fn unknown_symbol_is_rejected_without_changes() {
    let mut list = Watchlist::new(vec!["BTC".into()]);
    assert_eq!(
        list.add("WAGMI"),
        Err(FetchError::UnknownSymbol("WAGMI".into()))
    );
    assert_eq!(list.symbols(), ["BTC"]);
}

#[test]
fn insertion_order_is_preserved() {
    let mut list = Watchlist::default();
    for sym in ["SOL", "BTC", "ADA"] {
        list.add(sym).unwrap();
    }
    assert_eq!(list.symbols(), ["SOL", "BTC", "ADA"]);
}

#[test]
fn new_drops_unknown_persisted_symbols() {
    let list = Watchlist::new(vec!["BTC".into(), "JUNK".into(), "eth".into()]);
    assert_eq!(list.symbols(), ["BTC", "ETH"]);
}

#[test]
fn remove_is_case_insensitive() {
    let mut list = Watchlist::new(vec!["BTC".into(), "ETH".into()]);
    assert!(list.remove("eth"));
    assert!(!list.remove("eth"));
    assert_eq!(list.symbols(), ["BTC"]);
}

#[test]
fn symbol_map_covers_the_defaults() {
    for sym in ["BTC", "ETH", "SOL"] {
        assert!(coin_id(sym).is_some());
    }
    assert_eq!(coin_id("btc"), Some("bitcoin"));
    assert_eq!(coin_id("NOPE"), None);
}

#[test]
fn watchlist_serializes_as_a_plain_list() {
    let list = Watchlist::new(vec!["BTC".into(), "ETH".into()]);
    let json = serde_json::to_string(&list).unwrap();
    assert_eq!(json, r#"["BTC","ETH"]"#);
    let back: Watchlist = serde_json::from_str(&json).unwrap();
    assert_eq!(back, list);
}

#[test]
fn price_response_rows_follow_watchlist_order() {
    let list = Watchlist::new(vec!["ETH".into(), "BTC".into()]);
    let body = r#"{
        "bitcoin": { "eur": 50000.5, "eur_24h_change": -1.25 },
        "ethereum": { "eur": 3000.0, "eur_24h_change": 2.5 }
    }"#;
    let rows = parse_price_response(body, &list, "EUR").unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].symbol, "ETH");
    assert_eq!(rows[0].price, Some(3000.0));
    assert_eq!(rows[0].change_24h, Some(2.5));
    assert_eq!(rows[1].symbol, "BTC");
    assert_eq!(rows[1].price, Some(50000.5));
    assert_eq!(rows[1].change_24h, Some(-1.25));
}

#[test]
fn missing_fields_become_none() {
    let list = Watchlist::new(vec!["BTC".into(), "ETH".into()]);
    let body = r#"{ "bitcoin": { "usd": 60000.0 } }"#;
    let rows = parse_price_response(body, &list, "USD").unwrap();
    assert_eq!(rows[0].price, Some(60000.0));
    assert_eq!(rows[0].change_24h, None);
    assert_eq!(rows[1].price, None);
}

#[test]
fn malformed_price_body_is_an_error() {
    let list = Watchlist::new(vec!["BTC".into()]);
    assert!(matches!(
        parse_price_response("not json", &list, "EUR"),
        Err(FetchError::Upstream(_))
    ));
}
