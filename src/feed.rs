//! Support for creating the RSS feed from a list of diary entries.

use crate::date::{self, Error as DateError};
use crate::entry::Entry;
use chrono::{FixedOffset, NaiveTime, TimeZone, Utc};
use rss::extension::atom::{AtomExtension, Link};
use rss::extension::{ExtensionBuilder, ExtensionMap};
use rss::{Channel, ChannelBuilder, GuidBuilder, Image, ImageBuilder, Item, ItemBuilder};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use url::Url;

const ITUNES_NAMESPACE: &str = "http://www.itunes.com/dtds/podcast-1.0.dtd";
const MEDIA_NAMESPACE: &str = "http://search.yahoo.com/mrss/";

/// Every timestamp in the feed is rendered at UTC+9, regardless of the
/// host timezone.
const UTC_OFFSET_SECONDS: i32 = 9 * 3600;

/// Selects what the feed uses for item titles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleMode {
    /// Use the entry's stored title.
    Stored,

    /// Use the kanji transcription of the entry's date. Date-only diaries
    /// carry no titles, so the date doubles as one.
    KanjiDate,
}

/// Bundled site metadata for creating a feed.
pub struct FeedConfig {
    pub title: String,
    pub link: Url,
    pub description: String,
    pub language: String,

    /// The feed's own URL, advertised as an `atom:link rel="self"`.
    pub feed_url: Url,

    /// The channel image.
    pub image_url: Url,

    /// The base URL of the thumbnail endpoint. Each item points its
    /// `media:thumbnail` at `{thumbnail_url}/{date}`.
    pub thumbnail_url: Url,

    pub title_mode: TitleMode,
}

/// Creates a feed from some configuration ([`FeedConfig`]) and a list of
/// [`Entry`] records and writes the result to a [`std::io::Write`]. The
/// serialized form is a compatibility contract for committed output: XML
/// declaration on line one, two-space indents, no blank lines, and a
/// trailing newline.
pub fn write_feed<W: Write>(config: &FeedConfig, entries: &[Entry], mut w: W) -> Result<()> {
    let channel = channel(config, entries)?;
    w.write_all(b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
    let mut w = channel.pretty_write_to(w, b' ', 2)?;
    w.write_all(b"\n")?;
    Ok(())
}

fn channel(config: &FeedConfig, entries: &[Entry]) -> Result<Channel> {
    // Newest first; the sort is stable, so entries sharing a date keep
    // their source order.
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let now = offset().from_utc_datetime(&Utc::now().naive_utc());

    let mut namespaces = BTreeMap::new();
    namespaces.insert("itunes".to_owned(), ITUNES_NAMESPACE.to_owned());
    namespaces.insert("media".to_owned(), MEDIA_NAMESPACE.to_owned());

    let mut atom_ext = AtomExtension::default();
    atom_ext.set_links(vec![self_link(config)]);

    Ok(ChannelBuilder::default()
        .title(config.title.clone())
        .link(config.link.to_string())
        .description(config.description.clone())
        .language(Some(config.language.clone()))
        .last_build_date(Some(now.to_rfc2822()))
        .image(Some(image(config)))
        .atom_ext(Some(atom_ext))
        .namespaces(namespaces)
        .items(items(config, &sorted)?)
        .build())
}

fn items(config: &FeedConfig, entries: &[&Entry]) -> Result<Vec<Item>> {
    let mut items = Vec::with_capacity(entries.len());

    for entry in entries {
        let title = match (config.title_mode, &entry.title) {
            (TitleMode::Stored, Some(title)) => title.clone(),
            _ => date::format_kanji(&entry.date)?,
        };

        // Publish at local midnight in the fixed offset. A fixed offset
        // maps every local time to exactly one instant.
        let midnight = date::parse(&entry.date)?.and_time(NaiveTime::MIN);
        let published = midnight.and_local_timezone(offset()).unwrap();

        items.push(
            ItemBuilder::default()
                .title(Some(title))
                .link(Some(format!("{}#{}", config.link, entry.date)))
                .pub_date(Some(published.to_rfc2822()))
                .description(Some(entry.content.replace('\n', "<br />")))
                .guid(Some(
                    GuidBuilder::default()
                        .value(format!("{}#{}", config.link, entry.date))
                        .permalink(false)
                        .build(),
                ))
                .extensions(media_thumbnail(config, entry))
                .build(),
        );
    }
    Ok(items)
}

/// Builds the per-item `media:thumbnail` element pointing at the
/// thumbnail-generation endpoint for the entry's date.
fn media_thumbnail(config: &FeedConfig, entry: &Entry) -> ExtensionMap {
    let url = format!(
        "{}/{}",
        config.thumbnail_url.as_str().trim_end_matches('/'),
        entry.date,
    );
    let thumbnail = ExtensionBuilder::default()
        .name("media:thumbnail")
        .attrs(BTreeMap::from([("url".to_owned(), url)]))
        .build();
    ExtensionMap::from([(
        "media".to_owned(),
        BTreeMap::from([("thumbnail".to_owned(), vec![thumbnail])]),
    )])
}

fn image(config: &FeedConfig) -> Image {
    ImageBuilder::default()
        .url(config.image_url.to_string())
        .title(config.title.clone())
        .link(config.link.to_string())
        .build()
}

fn self_link(config: &FeedConfig) -> Link {
    Link {
        href: config.feed_url.to_string(),
        rel: "self".to_owned(),
        mime_type: Some("application/rss+xml".to_owned()),
        ..Link::default()
    }
}

fn offset() -> FixedOffset {
    // +9h is always within chrono's valid offset range.
    FixedOffset::east_opt(UTC_OFFSET_SECONDS).unwrap()
}

type Result<T> = std::result::Result<T, Error>;

/// Represents a problem creating a feed. Variants include I/O, XML
/// serialization, and date formatting issues.
#[derive(Debug)]
pub enum Error {
    /// Returned when there is a generic I/O error.
    Io(std::io::Error),

    /// Returned when there is an RSS serialization error.
    Xml(rss::Error),

    /// Returned when an entry's date cannot be formatted.
    Date(DateError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(f),
            Error::Xml(err) => err.fmt(f),
            Error::Date(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Xml(err) => Some(err),
            Error::Date(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    /// Converts [`std::io::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator in fallible feed operations.
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl From<rss::Error> for Error {
    /// Converts [`rss::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: rss::Error) -> Error {
        Error::Xml(err)
    }
}

impl From<DateError> for Error {
    /// Converts [`DateError`]s into [`Error`]. This allows us to use the
    /// `?` operator in fallible feed operations.
    fn from(err: DateError) -> Error {
        Error::Date(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn config(title_mode: TitleMode) -> FeedConfig {
        FeedConfig {
            title: "diary".to_owned(),
            link: Url::parse("https://example.org/diary/").unwrap(),
            description: "a diary".to_owned(),
            language: "ja".to_owned(),
            feed_url: Url::parse("https://example.org/diary/feed.xml").unwrap(),
            image_url: Url::parse("https://example.org/diary/icon.png").unwrap(),
            thumbnail_url: Url::parse("https://thumbs.example.org/").unwrap(),
            title_mode,
        }
    }

    fn entry(title: &str, date: &str, content: &str) -> Entry {
        Entry {
            title: Some(title.to_owned()),
            date: date.to_owned(),
            content: content.to_owned(),
        }
    }

    fn render(config: &FeedConfig, entries: &[Entry]) -> String {
        let mut out = Vec::new();
        write_feed(config, entries, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_items_sorted_by_date_descending() {
        let entries = vec![
            entry("a", "20240101", ""),
            entry("b", "20240201", ""),
            entry("c", "20240115", ""),
        ];
        let output = render(&config(TitleMode::Stored), &entries);
        let channel = Channel::read_from(output.as_bytes()).unwrap();
        let dates: Vec<&str> = channel
            .items()
            .iter()
            .map(|item| {
                let link = item.link().unwrap();
                &link[link.len() - 8..]
            })
            .collect();
        assert_eq!(vec!["20240201", "20240115", "20240101"], dates);
    }

    #[test]
    fn test_item_link_and_guid() {
        let output = render(
            &config(TitleMode::Stored),
            &[entry("A", "20240101", "hello")],
        );
        let channel = Channel::read_from(output.as_bytes()).unwrap();
        let item = &channel.items()[0];
        assert!(item.link().unwrap().ends_with("#20240101"));
        let guid = item.guid().unwrap();
        assert!(!guid.is_permalink());
        assert!(guid.value().ends_with("#20240101"));
    }

    #[test]
    fn test_description_maps_newlines_to_breaks() {
        let output = render(
            &config(TitleMode::Stored),
            &[entry("A", "20240101", "one\ntwo")],
        );
        let channel = Channel::read_from(output.as_bytes()).unwrap();
        assert_eq!(
            "one<br />two",
            channel.items()[0].description().unwrap(),
        );
    }

    #[test]
    fn test_kanji_date_titles() {
        let entries = vec![Entry {
            title: None,
            date: "20240101".to_owned(),
            content: String::new(),
        }];
        let output = render(&config(TitleMode::KanjiDate), &entries);
        let channel = Channel::read_from(output.as_bytes()).unwrap();
        assert_eq!("一月一日（月）", channel.items()[0].title().unwrap());
    }

    #[test]
    fn test_pub_date_is_midnight_at_utc_plus_nine() {
        let output = render(
            &config(TitleMode::Stored),
            &[entry("A", "20240101", "")],
        );
        let channel = Channel::read_from(output.as_bytes()).unwrap();
        assert_eq!(
            "Mon, 1 Jan 2024 00:00:00 +0900",
            channel.items()[0].pub_date().unwrap(),
        );
    }

    #[test]
    fn test_round_trip_recovers_titles_and_dates() {
        let entries = vec![
            entry("first", "20240101", "one"),
            entry("second", "20240201", "two"),
        ];
        let output = render(&config(TitleMode::Stored), &entries);
        let channel = Channel::read_from(output.as_bytes()).unwrap();
        let pairs: Vec<(String, String)> = channel
            .items()
            .iter()
            .map(|item| {
                let link = item.link().unwrap();
                (
                    link[link.len() - 8..].to_owned(),
                    item.title().unwrap().to_owned(),
                )
            })
            .collect();
        assert_eq!(
            vec![
                ("20240201".to_owned(), "second".to_owned()),
                ("20240101".to_owned(), "first".to_owned()),
            ],
            pairs,
        );
    }

    #[test]
    fn test_empty_entry_list_renders_empty_channel() {
        let output = render(&config(TitleMode::Stored), &[]);
        let channel = Channel::read_from(output.as_bytes()).unwrap();
        assert_eq!("diary", channel.title());
        assert!(channel.items().is_empty());
    }

    #[test]
    fn test_serialization_contract() {
        let output = render(
            &config(TitleMode::Stored),
            &[entry("A", "20240101", "hello")],
        );
        let mut lines = output.lines();
        assert_eq!(
            Some("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"),
            lines.next(),
        );
        assert!(output.ends_with('\n'));
        assert!(!output.contains("\n\n"));
        assert!(output.contains("\n  <channel>"));
        assert!(output.contains(MEDIA_NAMESPACE));
        assert!(output.contains(ITUNES_NAMESPACE));
    }

    #[test]
    fn test_media_thumbnail_derived_from_date() {
        let output = render(
            &config(TitleMode::Stored),
            &[entry("A", "20240101", "")],
        );
        assert!(output.contains("https://thumbs.example.org/20240101"));
    }

    #[test]
    fn test_source_text_to_feed() {
        use crate::entry::Parser;

        let entries =
            Parser::new(true).parse("---\ntitle: A\ndate: 20240101\ncontent: |\n  hello\n---");
        assert_eq!(1, entries.len());
        assert_eq!(Some("A"), entries[0].title.as_deref());
        assert_eq!("hello", entries[0].content);

        let output = render(&config(TitleMode::Stored), &entries);
        let channel = Channel::read_from(output.as_bytes()).unwrap();
        let item = &channel.items()[0];
        assert_eq!("A", item.title().unwrap());
        assert!(item.link().unwrap().ends_with("#20240101"));
        assert_eq!("hello", item.description().unwrap());
    }

    #[test]
    fn test_malformed_date_propagates() {
        let entries = vec![entry("A", "2024-01-01", "")];
        let mut out = Vec::new();
        match write_feed(&config(TitleMode::Stored), &entries, &mut out) {
            Err(Error::Date(DateError::MalformedDate(date))) => {
                assert_eq!("2024-01-01", date)
            }
            other => panic!("expected a malformed-date error, got {:?}", other.err()),
        }
    }
}
