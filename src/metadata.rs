use crate::error::{Error, Result};
use crate::table::Table;
use dashboard::ViewId;
use std::fmt::Write;
use std::path::Path;
use tracing::{debug, warn};

// column order of the summary table
static SUMMARY_VIEWS: [ViewId; 4] = [
    ViewId::BloodOxygenation,
    ViewId::HeartRate,
    ViewId::Sleep,
    ViewId::Stress,
];

/// Shortens long user ids for display.
///
/// Ids longer than 15 characters are cut to their first 7 characters. The
/// result is not unique: two long ids sharing a prefix produce the same slug,
/// so the full id must always travel alongside it.
pub fn slug(user_full: &str) -> String {
    if user_full.chars().count() > 15 {
        user_full.chars().take(7).collect()
    } else {
        user_full.to_string()
    }
}

/// Record counts of one user, one per view.
#[derive(Clone, Debug, PartialEq)]
pub struct UserMetadataRow {
    pub user_full: String,
    pub user_slug: String,
    counts: [u64; 4],
}

impl UserMetadataRow {
    pub fn new<T: Into<String>>(user_full: T, counts: [u64; 4]) -> Self {
        let user_full = user_full.into();
        let user_slug = slug(&user_full);

        Self {
            user_full,
            user_slug,
            counts,
        }
    }

    pub fn count(&self, view: ViewId) -> u64 {
        self.counts[view as usize]
    }

    pub fn has_data(&self, view: ViewId) -> bool {
        self.count(view) > 0
    }
}

/// Which users have records for which views.
///
/// Built once at startup and read-only afterwards. Users keep the order in
/// which they appear in the source table.
#[derive(Debug)]
pub struct MetadataIndex {
    rows: Vec<UserMetadataRow>,
}

impl MetadataIndex {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::configuration(format!("unable to read metadata file {path:?}: {e}"))
        })?;

        let table: Table = content
            .parse()
            .map_err(|e| Error::configuration(format!("metadata file {path:?}: {e}")))?;

        let index = Self::from_table(&table)?;

        debug!(
            "loaded metadata for {} users from {}",
            index.rows.len(),
            path.display()
        );

        Ok(index)
    }

    pub fn from_table(table: &Table) -> Result<Self> {
        let required = |name: &str| {
            table
                .column(name)
                .ok_or_else(|| Error::configuration(format!("metadata has no {name:?} column")))
        };

        let user_full = required("user_full")?;
        let mut view_columns = [0; 4];
        for id in ViewId::ALL {
            view_columns[id as usize] = required(id.as_str())?;
        }
        let user = table.column("user");

        let mut rows = Vec::with_capacity(table.len());

        for record in table.rows() {
            let mut counts = [0; 4];

            for id in ViewId::ALL {
                let cell = &record[view_columns[id as usize]];
                counts[id as usize] = cell.parse::<u64>().map_err(|_| {
                    Error::configuration(format!(
                        "user {:?} has an invalid {id} count: {cell:?}",
                        record[user_full]
                    ))
                })?;
            }

            let row = UserMetadataRow::new(record[user_full].clone(), counts);

            if let Some(stored) = user.map(|c| &record[c]) {
                if *stored != row.user_slug {
                    warn!(
                        "stored slug {stored:?} for user {:?} differs from derived slug {:?}",
                        row.user_full, row.user_slug
                    );
                }
            }

            rows.push(row);
        }

        Ok(Self { rows })
    }

    #[cfg(test)]
    pub fn from_rows(rows: Vec<UserMetadataRow>) -> Self {
        Self { rows }
    }

    pub fn get(&self, user_full: &str) -> Option<&UserMetadataRow> {
        self.rows.iter().find(|row| row.user_full == user_full)
    }

    /// All users as `(user_full, user_slug)` pairs.
    pub fn list_users(&self) -> Vec<(&str, &str)> {
        self.rows
            .iter()
            .map(|row| (row.user_full.as_str(), row.user_slug.as_str()))
            .collect()
    }

    /// Users with at least one record for `view_a`, and for `view_b` too when
    /// one is given.
    pub fn list_users_with_data(
        &self,
        view_a: &str,
        view_b: Option<&str>,
    ) -> Result<Vec<(&str, &str)>> {
        let view_a: ViewId = view_a.parse()?;
        let view_b: Option<ViewId> = view_b.map(str::parse::<ViewId>).transpose()?;

        Ok(self
            .rows
            .iter()
            .filter(|row| row.has_data(view_a) && view_b.is_none_or(|b| row.has_data(b)))
            .map(|row| (row.user_full.as_str(), row.user_slug.as_str()))
            .collect())
    }

    /// Plain text table of record counts per user.
    pub fn summary(&self) -> String {
        let mut header = vec!["user"];
        header.extend(SUMMARY_VIEWS.iter().map(|id| id.as_str()));

        let mut lines: Vec<Vec<String>> = vec![header.iter().map(|h| h.to_string()).collect()];
        for row in &self.rows {
            let mut line = vec![row.user_slug.clone()];
            line.extend(SUMMARY_VIEWS.iter().map(|id| row.count(*id).to_string()));
            lines.push(line);
        }

        let widths: Vec<usize> = (0..header.len())
            .map(|i| lines.iter().map(|l| l[i].chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for line in &lines {
            let mut cells = line.iter().zip(&widths).enumerate().map(|(i, (cell, width))| {
                if i == 0 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            });

            let first = cells.next().unwrap_or_default();
            let rest: Vec<String> = cells.collect();
            let _ = writeln!(out, "{first}  {}", rest.join("  "));
        }

        out
    }
}
