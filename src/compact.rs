use crate::table::Table;
use anyhow::{anyhow, Context};
use clap::{value_parser, ArgMatches, Command};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn command() -> Command {
    Command::new("compact")
        .about("Drop samples that repeat both neighbours from a series export")
        .arg(
            clap::Arg::new("FILE")
                .help("Series CSV to compact in place")
                .value_parser(value_parser!(PathBuf))
                .action(clap::ArgAction::Set)
                .required(true)
                .index(1),
        )
        .arg(
            clap::Arg::new("COLUMN")
                .long("column")
                .short('c')
                .help("Value column to compare, e.g. bpm or stress")
                .action(clap::ArgAction::Set)
                .required(true),
        )
        .arg(
            clap::Arg::new("DRY_RUN")
                .long("dry-run")
                .short('d')
                .help("Report the reduction without rewriting the file")
                .action(clap::ArgAction::SetTrue),
        )
}

pub struct Config {
    file: PathBuf,
    column: String,
    dry_run: bool,
}

impl TryFrom<&ArgMatches> for Config {
    type Error = anyhow::Error;

    fn try_from(args: &ArgMatches) -> Result<Self, Self::Error> {
        Ok(Config {
            file: args
                .get_one::<PathBuf>("FILE")
                .ok_or_else(|| anyhow!("missing input file"))?
                .clone(),
            column: args
                .get_one::<String>("COLUMN")
                .ok_or_else(|| anyhow!("missing column name"))?
                .clone(),
            dry_run: args.get_flag("DRY_RUN"),
        })
    }
}

/// Row counts before and after compaction.
#[derive(Debug, PartialEq)]
pub struct Report {
    pub original: usize,
    pub compacted: usize,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# rows original: {:>15}", thousands(self.original))?;
        writeln!(f, "# rows updated:  {:>15}", thousands(self.compacted))?;

        if self.compacted > 0 {
            // two decimals at most, without padding: 4.0x, 3.33x
            let ratio = (self.original as f64 / self.compacted as f64 * 100.0).round() / 100.0;
            write!(f, "    {ratio:?}x smaller")?;
        }

        Ok(())
    }
}

pub fn run(config: Config) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&config.file)
        .with_context(|| format!("unable to read {}", config.file.display()))?;

    let mut table: Table = content
        .parse()
        .with_context(|| format!("malformed series file {}", config.file.display()))?;

    if table.is_empty() {
        info!("{} has no records", config.file.display());
    }

    let report = compact(&mut table, &config.column)?;
    println!("{report}");

    if !config.dry_run {
        info!("rewriting {}", config.file.display());
        persist(&config.file, &table.to_csv())?;
    }

    Ok(())
}

/// Removes the interior rows of every flat run in `column`.
pub fn compact(table: &mut Table, column: &str) -> anyhow::Result<Report> {
    let index = table
        .column(column)
        .ok_or_else(|| anyhow!("no {column:?} column"))?;

    let values = table
        .rows()
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row[index]
                .parse::<f64>()
                .with_context(|| format!("record {}: {:?} is not numeric", i + 1, row[index]))
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;

    let original = table.len();
    table.retain_rows(&dashboard::plateau_mask(&values));

    Ok(Report {
        original,
        compacted: table.len(),
    })
}

// write to a sibling temporary file, then rename over the original
fn persist(path: &Path, content: &str) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut temporary = tempfile::NamedTempFile::new_in(&dir)
        .with_context(|| format!("could not open temporary file in: {}", dir.display()))?;
    temporary.write_all(content.as_bytes())?;

    // the replacement keeps the mode of the file it replaces
    let permissions = std::fs::metadata(path)
        .with_context(|| format!("unable to stat {}", path.display()))?
        .permissions();
    temporary
        .as_file()
        .set_permissions(permissions)
        .with_context(|| format!("unable to set permissions on {}", path.display()))?;

    temporary
        .persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;

    Ok(())
}

fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_runs_collapse() {
        let mut table: Table = "timestamp,bpm\nt0,60\nt1,60\nt2,60\nt3,60\nt4,61\nt5,61\n"
            .parse()
            .unwrap();

        let report = compact(&mut table, "bpm").unwrap();

        assert_eq!(
            report,
            Report {
                original: 6,
                compacted: 4
            }
        );
        assert_eq!(table.to_csv(), "timestamp,bpm\nt0,60\nt3,60\nt4,61\nt5,61\n");
    }

    #[test]
    fn bad_input() {
        let mut table: Table = "timestamp,bpm\nt0,x\n".parse().unwrap();
        assert!(compact(&mut table, "bpm").is_err());
        assert!(compact(&mut table, "stress").is_err());
    }

    #[test]
    fn report_format() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");

        let report = Report {
            original: 12000,
            compacted: 3000,
        };
        assert_eq!(
            report.to_string(),
            "# rows original:          12,000\n# rows updated:            3,000\n    4.0x smaller"
        );

        let report = Report {
            original: 10,
            compacted: 3,
        };
        assert!(report.to_string().ends_with("\n    3.33x smaller"));

        let report = Report {
            original: 25,
            compacted: 2,
        };
        assert!(report.to_string().ends_with("\n    12.5x smaller"));
    }

    #[test]
    fn rewrites_in_place_unless_dry_run() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stress.csv");
        let original = "timestamp,stress\nt0,5\nt1,5\nt2,5\n";
        std::fs::write(&file, original).unwrap();

        run(Config {
            file: file.clone(),
            column: "stress".to_string(),
            dry_run: true,
        })
        .unwrap();
        assert_eq!(std::fs::read_to_string(&file).unwrap(), original);

        run(Config {
            file: file.clone(),
            column: "stress".to_string(),
            dry_run: false,
        })
        .unwrap();
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "timestamp,stress\nt0,5\nt2,5\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("heart_rate.csv");
        std::fs::write(&file, "timestamp,bpm\nt0,60\nt1,60\nt2,60\n").unwrap();
        std::fs::set_permissions(&file, std::fs::Permissions::from_mode(0o644)).unwrap();

        run(Config {
            file: file.clone(),
            column: "bpm".to_string(),
            dry_run: false,
        })
        .unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(
            std::fs::read_to_string(&file).unwrap(),
            "timestamp,bpm\nt0,60\nt2,60\n"
        );
    }
}
