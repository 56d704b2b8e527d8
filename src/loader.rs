use crate::error::{Error, Result};
use crate::storage::SeriesStore;
use crate::table::Table;
use dashboard::{Series, View, ViewId};
use tracing::debug;

const TIMESTAMP: &str = "timestamp";

/// Resolves `(user, view)` to a parsed [`Series`].
///
/// Nothing is cached: every call reads the store again.
pub struct SeriesLoader<S> {
    store: S,
}

impl<S: SeriesStore> SeriesLoader<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn load(&self, user_full: &str, view_id: &str) -> Result<Series> {
        let view = dashboard::get(view_id)?;
        self.load_view(user_full, view)
    }

    pub fn load_view(&self, user_full: &str, view: &View) -> Result<Series> {
        let table = self
            .store
            .fetch(view.id, user_full)?
            .ok_or_else(|| Error::SeriesNotFound {
                user: user_full.to_string(),
                view: view.id,
            })?;

        let series = parse(&table, view.column).map_err(|reason| Error::MalformedSeries {
            user: user_full.to_string(),
            view: view.id,
            reason,
        })?;

        debug!(
            "loaded {} {} samples for {user_full}",
            series.len(),
            view.id
        );

        Ok(series)
    }

    /// Loads the same view for two users.
    pub fn load_both(&self, users: (&str, &str), view: ViewId) -> Result<(Series, Series)> {
        let view = view.view();
        Ok((self.load_view(users.0, view)?, self.load_view(users.1, view)?))
    }
}

fn parse(table: &Table, column: &str) -> std::result::Result<Series, String> {
    let timestamps = table
        .column(TIMESTAMP)
        .ok_or_else(|| format!("missing {TIMESTAMP:?} column"))?;
    let values = table
        .column(column)
        .ok_or_else(|| {
            format!(
                "missing {column:?} column, found: {}",
                table.header().join(", ")
            )
        })?;

    let mut series = Series::with_capacity(table.len());

    for (i, row) in table.rows().iter().enumerate() {
        let cell = &row[values];
        let value = cell
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                format!(
                    "record {}: {column} value {cell:?} is not a finite number",
                    i + 1
                )
            })?;

        series.push(row[timestamps].clone(), value);
    }

    Ok(series)
}
