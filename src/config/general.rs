use crate::error::{Error, Result};
use dashboard::ViewId;
use serde::Deserialize;
use std::path::{Path, PathBuf};

fn data_dir() -> PathBuf {
    "data".into()
}

fn metadata_file() -> PathBuf {
    "user_metadata.csv".into()
}

fn default_user() -> String {
    "demo-user-1".into()
}

fn default_view() -> String {
    "sleep".into()
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(default = "data_dir")]
    pub(super) data_dir: PathBuf,
    #[serde(default = "metadata_file")]
    pub(super) metadata_file: PathBuf,
    #[serde(default = "default_user")]
    default_user: String,
    #[serde(default = "default_view")]
    default_view: String,
}

impl Default for General {
    fn default() -> Self {
        Self {
            data_dir: data_dir(),
            metadata_file: metadata_file(),
            default_user: default_user(),
            default_view: default_view(),
        }
    }
}

impl General {
    pub fn check(&self) -> Result<()> {
        self.default_view().map(|_| ())
    }

    /// Root of the per-view export directories.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn metadata_file(&self) -> &Path {
        &self.metadata_file
    }

    /// User shown when a request does not name one.
    pub fn default_user(&self) -> &str {
        &self.default_user
    }

    pub fn default_view(&self) -> Result<ViewId> {
        self.default_view
            .parse()
            .map_err(|e| Error::configuration(format!("default_view: {e}")))
    }
}
