use codash::fetch::FetchError;
use codash::i18n::Language;
use codash::providers::news::{feeds_for, parse_feed_items};

fn rss(items: &str) -> Vec<u8> {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Test Feed</title>{items}</channel></rss>"#
    )
    .into_bytes()
}

fn item(title: &str, date: &str) -> String {
    format!(
        "<item><title>{title}</title><link>https://example.org/{title}</link>\
         <pubDate>{date}</pubDate></item>"
    )
}

#[test]
fn items_are_sorted_newest_first() {
    let xml = rss(&format!(
        "{}{}{}",
        item("old", "Mon, 02 Mar 2026 08:00:00 GMT"),
        item("newest", "Mon, 02 Mar 2026 12:00:00 GMT"),
        item("middle", "Mon, 02 Mar 2026 10:00:00 GMT"),
    ));
    let items = parse_feed_items(&xml, 15).unwrap();
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, vec!["newest", "middle", "old"]);
}

#[test]
fn list_is_truncated_to_max_items() {
    let mut body = String::new();
    for i in 0..20 {
        body.push_str(&item(
            &format!("story{i}"),
            &format!("Mon, 02 Mar 2026 {:02}:00:00 GMT", i % 24),
        ));
    }
    let items = parse_feed_items(&rss(&body), 15).unwrap();
    assert_eq!(items.len(), 15);
}

#[test]
fn undated_items_sink_to_the_end() {
    let xml = rss(&format!(
        "<item><title>undated</title><link>https://example.org/u</link></item>{}",
        item("dated", "Mon, 02 Mar 2026 12:00:00 GMT"),
    ));
    let items = parse_feed_items(&xml, 15).unwrap();
    assert_eq!(items[0].title, "dated");
    assert_eq!(items[1].title, "undated");
    assert!(items[1].published.is_none());
}

#[test]
fn image_from_enclosure() {
    let xml = rss(
        "<item><title>pic</title><link>https://example.org/p</link>\
         <enclosure url=\"https://img.example.org/a.jpg\" type=\"image/jpeg\" length=\"1\"/>\
         </item>",
    );
    let items = parse_feed_items(&xml, 15).unwrap();
    assert_eq!(items[0].image.as_deref(), Some("https://img.example.org/a.jpg"));
}

#[test]
fn image_from_embedded_html() {
    let xml = rss(
        "<item><title>pic</title><link>https://example.org/p</link>\
         <description>&lt;p&gt;text&lt;/p&gt;&lt;img src=\"https://img.example.org/b.png\"&gt;</description>\
         </item>",
    );
    let items = parse_feed_items(&xml, 15).unwrap();
    assert_eq!(items[0].image.as_deref(), Some("https://img.example.org/b.png"));
}

#[test]
fn plain_item_has_no_image() {
    let xml = rss(&item("plain", "Mon, 02 Mar 2026 10:00:00 GMT"));
    let items = parse_feed_items(&xml, 15).unwrap();
    assert!(items[0].image.is_none());
}

#[test]
fn empty_feed_is_an_error() {
    let err = parse_feed_items(&rss(""), 15).unwrap_err();
    assert!(matches!(err, FetchError::Upstream(_)));
}

#[test]
fn unparseable_bytes_are_an_error() {
    let err = parse_feed_items(b"this is not xml", 15).unwrap_err();
    assert!(matches!(err, FetchError::Upstream(_)));
}

#[test]
fn feed_sets_follow_the_language() {
    let de: Vec<&str> = feeds_for(Language::De).iter().map(|f| f.name).collect();
    let en: Vec<&str> = feeds_for(Language::En).iter().map(|f| f.name).collect();
    assert_eq!(de, vec!["Tagesschau", "heise"]);
    assert_eq!(en, vec!["BBC", "NASA"]);
}
