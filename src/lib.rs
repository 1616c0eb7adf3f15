//! The library code for `nikki`, which turns a delimited diary source
//! document into an RSS feed and per-entry SVG thumbnails. The
//! architecture can be generally broken down into two distinct steps:
//!
//! 1. Parsing entries from the raw source text ([`crate::entry`])
//! 2. Rendering the entries into output documents: the feed
//!    ([`crate::feed`]) and the thumbnails ([`crate::thumbnail`])
//!
//! Both renderers lean on [`crate::date`] to format the 8-digit entry
//! dates, as ISO text or as the kanji calendar transcription used for
//! item titles in date-only diaries.
//!
//! Everything else is shell: [`crate::fetch`] downloads the source,
//! [`crate::build`] drives the fetch-parse-render pipeline for the feed
//! file, and [`crate::serve`] exposes thumbnails over HTTP. The core
//! never touches the network or the filesystem itself; each invocation is
//! a pure transformation of in-memory text (plus one random color draw in
//! the thumbnail renderer).

pub mod build;
pub mod config;
pub mod date;
pub mod entry;
pub mod feed;
pub mod fetch;
pub mod serve;
pub mod thumbnail;
