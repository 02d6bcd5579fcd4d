//! Scene links document accepted by the `group` command.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use guzman_core::{RegionId, RegionLink};
use serde::{Deserialize, Serialize};
use tracing::{Span, field, instrument};

use super::CliError;

/// One `[first, second, junction]` entry of a scene document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord(pub i64, pub i64, pub String);

impl From<LinkRecord> for RegionLink {
    fn from(LinkRecord(first, second, via): LinkRecord) -> Self {
        Self::new(first, second, via)
    }
}

/// Region links and background of one line drawing.
///
/// Both fields may be omitted: a missing `links` array reads as empty and a
/// missing or `null` background stays unset, so the engine reports the
/// corresponding input error.
///
/// # Examples
/// ```
/// use guzman_cli::cli::SceneDocument;
/// use guzman_core::RegionId;
///
/// let scene: SceneDocument =
///     serde_json::from_str(r#"{"background": 99, "links": [[1, 2, "A"]]}"#)?;
/// assert_eq!(scene.background(), Some(RegionId::new(99)));
/// assert_eq!(scene.links().len(), 1);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDocument {
    /// Region that grouping must ignore.
    #[serde(default)]
    pub background: Option<i64>,
    /// Region links in drawing order.
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

impl SceneDocument {
    /// Reads and parses the document at `path`.
    ///
    /// # Errors
    /// Returns [`CliError::Io`] if the file cannot be opened and
    /// [`CliError::Json`] if it is not a valid scene document.
    #[instrument(name = "cli.load_scene", err, fields(path = field::Empty, links = field::Empty))]
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let span = Span::current();
        span.record("path", field::display(path.display()));
        let file = File::open(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene: Self =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| CliError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        span.record("links", scene.links.len());
        Ok(scene)
    }

    /// Returns the background region, if the document names one.
    #[must_use]
    pub fn background(&self) -> Option<RegionId> {
        self.background.map(RegionId::new)
    }

    /// Returns the document's links as engine input.
    #[must_use]
    pub fn links(&self) -> Vec<RegionLink> {
        self.links.iter().cloned().map(RegionLink::from).collect()
    }
}
