use crate::feed::{FeedConfig, TitleMode};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use url::Url;

const PROJECT_FILE: &str = "nikki.yaml";

/// Which diary variant the project holds. `title` diaries carry a
/// `title:` line per entry; `date` diaries don't, and the feed titles
/// items with the kanji date instead.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Title,
    Date,
}

/// Project configuration, loaded from a `nikki.yaml` file. All of the
/// site metadata the renderers need lives here; nothing is ambient.
#[derive(Deserialize)]
pub struct Config {
    /// The channel title.
    pub title: String,

    /// The site the feed links back to. Item links append the entry date
    /// as a fragment.
    pub link: Url,

    /// The channel description.
    pub description: String,

    #[serde(default = "default_language")]
    pub language: String,

    /// Where the raw diary source document is fetched from.
    pub source_url: Url,

    /// The feed's published URL, used for its `atom:link rel="self"`.
    pub feed_url: Url,

    /// The channel image.
    pub image_url: Url,

    /// The base URL of the thumbnail endpoint.
    pub thumbnail_url: Url,

    /// Where `build` writes the rendered feed.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    #[serde(default)]
    pub mode: Mode,
}

fn default_language() -> String {
    "ja".to_owned()
}

fn default_output() -> PathBuf {
    PathBuf::from("feed.xml")
}

impl Config {
    /// Loads the project file from `dir` or the nearest parent directory
    /// holding one.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        let path = dir.join(PROJECT_FILE);
        if path.exists() {
            Config::from_project_file(&path)
        } else {
            match dir.parent() {
                Some(parent) => Config::from_directory(parent),
                None => Err(anyhow!(
                    "Could not find `{}` in any parent directory",
                    PROJECT_FILE
                )),
            }
        }
    }

    pub fn from_project_file(path: &Path) -> Result<Config> {
        let file = File::open(path)
            .map_err(|e| anyhow!("Opening project file `{}`: {}", path.display(), e))?;
        serde_yaml::from_reader(file)
            .map_err(|e| anyhow!("Parsing project file `{}`: {}", path.display(), e))
    }

    pub fn title_mode(&self) -> TitleMode {
        match self.mode {
            Mode::Title => TitleMode::Stored,
            Mode::Date => TitleMode::KanjiDate,
        }
    }

    pub fn feed_config(&self) -> FeedConfig {
        FeedConfig {
            title: self.title.clone(),
            link: self.link.clone(),
            description: self.description.clone(),
            language: self.language.clone(),
            feed_url: self.feed_url.clone(),
            image_url: self.image_url.clone(),
            thumbnail_url: self.thumbnail_url.clone(),
            title_mode: self.title_mode(),
        }
    }
}
