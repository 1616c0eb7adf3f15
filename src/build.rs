//! Exports the [`build_feed`] function which stitches together the
//! high-level steps of building the feed: fetching the diary source,
//! parsing it into entries ([`crate::entry`]), and rendering the RSS
//! document to the output file ([`crate::feed`]).

use crate::config::Config;
use crate::entry::Parser;
use crate::feed::{self, Error as FeedError, TitleMode};
use crate::fetch;
use std::fmt;
use std::fs::File;
use std::path::PathBuf;

/// Fetches the diary source and writes the rendered feed to the
/// configured output path.
pub async fn build_feed(config: &Config) -> Result<()> {
    let client = fetch::client();
    let source = fetch::fetch_source(&client, &config.source_url)
        .await
        .map_err(Error::Fetch)?;
    write_feed_from_source(config, &source)
}

/// Parses `source` and renders the feed. Split out from [`build_feed`] so
/// the fetch-free path is testable and usable with a local source file.
pub fn write_feed_from_source(config: &Config, source: &str) -> Result<()> {
    let parser = Parser::new(config.title_mode() == TitleMode::Stored);
    let entries = parser.parse(source);
    tracing::info!(entries = entries.len(), "parsed diary source");

    let file = File::create(&config.output).map_err(|err| Error::Create {
        path: config.output.clone(),
        err,
    })?;
    feed::write_feed(&config.feed_config(), &entries, file)?;
    tracing::info!(output = %config.output.display(), "wrote feed");
    Ok(())
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building the feed. Errors can be during fetching,
/// creating the output file, or rendering the feed itself.
#[derive(Debug)]
pub enum Error {
    /// Returned when the diary source cannot be fetched.
    Fetch(anyhow::Error),

    /// Returned for I/O problems creating the output file.
    Create { path: PathBuf, err: std::io::Error },

    /// Returned for errors rendering the feed.
    Feed(FeedError),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Fetch(err) => write!(f, "{:#}", err),
            Error::Create { path, err } => {
                write!(f, "Creating output file '{}': {}", path.display(), err)
            }
            Error::Feed(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Fetch(_) => None,
            Error::Create { path: _, err } => Some(err),
            Error::Feed(err) => Some(err),
        }
    }
}

impl From<FeedError> for Error {
    /// Converts [`FeedError`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: FeedError) -> Error {
        Error::Feed(err)
    }
}
