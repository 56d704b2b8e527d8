use crate::config::Config;
use crate::error::Result;
use crate::loader::SeriesLoader;
use crate::metadata::MetadataIndex;
use crate::storage::{CsvDirectory, SeriesStore};
use dashboard::{build_comparison, build_pair, build_single, ChartPayload};
use tracing::debug;

// comparison traces are labelled with this many leading characters of the id
const LABEL_CHARS: usize = 7;

/// Request handling state: the metadata index and a series loader.
///
/// Both are read-only once constructed, so a single instance can serve any
/// number of requests.
pub struct App<S> {
    metadata: MetadataIndex,
    loader: SeriesLoader<S>,
}

impl App<CsvDirectory> {
    pub fn from_config(config: &Config) -> Result<Self> {
        let metadata = MetadataIndex::load(config.general().metadata_file())?;
        let store = CsvDirectory::new(config.general().data_dir());

        Ok(Self::new(metadata, store))
    }
}

impl<S: SeriesStore> App<S> {
    pub fn new(metadata: MetadataIndex, store: S) -> Self {
        Self {
            metadata,
            loader: SeriesLoader::new(store),
        }
    }

    pub fn metadata(&self) -> &MetadataIndex {
        &self.metadata
    }

    /// One series for one user.
    pub fn plot_user(&self, user: &str, view: &str) -> Result<ChartPayload> {
        if self.metadata.get(user).is_none() {
            debug!("user {user} is not in the metadata index");
        }

        let series = self.loader.load(user, view)?;
        let view = dashboard::get(view)?;

        debug!("single chart: {user} {}", view.id);

        Ok(build_single(&series, view))
    }

    /// Two views of one user stacked over a shared time axis.
    pub fn plot_pair(&self, user: &str, view_a: &str, view_b: &str) -> Result<ChartPayload> {
        let view_a = dashboard::get(view_a)?;
        let view_b = dashboard::get(view_b)?;

        let series_a = self.loader.load_view(user, view_a)?;
        let series_b = self.loader.load_view(user, view_b)?;

        debug!("pair chart: {user} {} + {}", view_a.id, view_b.id);

        Ok(build_pair(&series_a, view_a, &series_b, view_b))
    }

    /// The same view for two users. Comparing a user with themself yields the
    /// single series chart.
    pub fn plot_comparison(&self, user1: &str, user2: &str, view: &str) -> Result<ChartPayload> {
        if user1 == user2 {
            return self.plot_user(user1, view);
        }

        let view = dashboard::get(view)?;
        let (series1, series2) = self.loader.load_both((user1, user2), view.id)?;

        debug!("comparison chart: {user1} vs {user2} {}", view.id);

        Ok(build_comparison(
            &series1,
            &series2,
            view,
            &label(user1),
            &label(user2),
        ))
    }
}

fn label(user: &str) -> String {
    user.chars().take(LABEL_CHARS).collect()
}
