use crate::error::{Error, Result};
use crate::table::Table;
use dashboard::ViewId;
use std::path::{Component, Path, PathBuf};
use tracing::trace;

/// Where raw series tables come from.
pub trait SeriesStore {
    /// Fetches the stored table for one user and view. Returns `Ok(None)` when
    /// nothing is stored for the pair.
    fn fetch(&self, view: ViewId, user_full: &str) -> Result<Option<Table>>;
}

/// A directory of exports laid out as `<root>/<view>/<user_full>.csv`.
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Path of the export for a user, or `None` if the id could escape the
    /// view directory.
    pub fn path(&self, view: ViewId, user_full: &str) -> Option<PathBuf> {
        let mut components = Path::new(user_full).components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) if name == user_full => Some(
                self.root
                    .join(view.as_str())
                    .join(format!("{user_full}.csv")),
            ),
            _ => None,
        }
    }
}

impl SeriesStore for CsvDirectory {
    fn fetch(&self, view: ViewId, user_full: &str) -> Result<Option<Table>> {
        let path = match self.path(view, user_full) {
            Some(path) => path,
            None => return Ok(None),
        };

        trace!("reading {}", path.display());

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Io { path, source }),
        };

        content
            .parse::<Table>()
            .map(Some)
            .map_err(|e| Error::MalformedSeries {
                user: user_full.to_string(),
                view,
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        let store = CsvDirectory::new("/srv/data");

        assert_eq!(
            store.path(ViewId::HeartRate, "demo-user-1"),
            Some(PathBuf::from("/srv/data/heart_rate/demo-user-1.csv"))
        );

        for bad in ["", ".", "..", "../secret", "a/b", "/etc/passwd", "./a"] {
            assert_eq!(store.path(ViewId::Sleep, bad), None, "{bad:?}");
        }
    }

    #[test]
    fn fetch_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("stress")).unwrap();
        std::fs::write(
            dir.path().join("stress").join("u1.csv"),
            "timestamp,stress\n2022-01-01 00:00:00,25\n",
        )
        .unwrap();

        let store = CsvDirectory::new(dir.path());

        let table = store.fetch(ViewId::Stress, "u1").unwrap().unwrap();
        assert_eq!(table.len(), 1);

        assert!(store.fetch(ViewId::Stress, "u2").unwrap().is_none());
        assert!(store.fetch(ViewId::Sleep, "u1").unwrap().is_none());
        assert!(store.fetch(ViewId::Stress, "../stress/u1").unwrap().is_none());
    }

    #[test]
    fn ragged_export_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sleep")).unwrap();
        std::fs::write(dir.path().join("sleep").join("u1.csv"), "timestamp,level\nt0\n").unwrap();

        let store = CsvDirectory::new(dir.path());

        assert!(matches!(
            store.fetch(ViewId::Sleep, "u1"),
            Err(Error::MalformedSeries { view: ViewId::Sleep, .. })
        ));
    }

    #[test]
    fn fetch_through_trait_object() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("heart_rate")).unwrap();
        std::fs::write(
            dir.path().join("heart_rate").join("u1.csv"),
            "timestamp,bpm\nt0,60\nt1,61\n",
        )
        .unwrap();

        let store: Box<dyn SeriesStore> = Box::new(CsvDirectory::new(dir.path()));
        let table = store.fetch(ViewId::HeartRate, "u1").unwrap().unwrap();

        assert_eq!(table.header(), &["timestamp", "bpm"]);
        assert_eq!(table.len(), 2);
    }
}
