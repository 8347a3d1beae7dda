use super::table::{PolarModel, PolarSample, TargetSample};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

const BUILTIN: &str = include_str!("../../data/mayhem.pol");

#[derive(thiserror::Error, Debug)]
pub enum PolarError {
    #[error("reading polar file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("polar line {line}: {reason}")]
    Row { line: usize, reason: String },
    #[error("polar table has no target rows")]
    NoTargets,
}

impl PolarModel {
    /// Parses the row-oriented text format. Any malformed row fails the
    /// whole load.
    pub fn from_text(text: &str) -> Result<Self, PolarError> {
        let mut polar = PolarModel::default();

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let mut line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let target = line.ends_with('*');
            if target {
                line = line[..line.len() - 1].trim_end();
            }

            let cols = line
                .split_whitespace()
                .map(|col| {
                    col.parse::<f64>().map_err(|err| PolarError::Row {
                        line: line_no,
                        reason: format!("'{}': {}", col, err),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let &[tws, twa, speed, heel, lee] = cols.as_slice() else {
                return Err(PolarError::Row {
                    line: line_no,
                    reason: format!("expected 5 columns (tws twa speed heel lee), got {}", cols.len()),
                });
            };

            polar.insert_sample(tws, twa, PolarSample { speed, heel, lee });
            if target {
                polar.insert_target(tws, TargetSample { twa, speed, heel });
            }
        }

        if polar.targets.up.is_empty() && polar.targets.down.is_empty() {
            return Err(PolarError::NoTargets);
        }

        debug!(
            "polar loaded: {} wind speeds, {} upwind / {} downwind targets",
            polar.all.len(),
            polar.targets.up.len(),
            polar.targets.down.len()
        );
        Ok(polar)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PolarError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| PolarError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text)
    }

    /// The polar bundled with the crate.
    pub fn builtin() -> Result<Self, PolarError> {
        Self::from_text(BUILTIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SMALL: &str = "\
# tws twa speed heel lee
6 40 4.9 7.0 2.7
6 43.3 5.253 7.7 2.65 *

6 142.9 5.356 2.1 0.57*
8 40.4 6.104 14.8 3.19 *
";

    #[test]
    fn parses_rows_and_targets() {
        let polar = PolarModel::from_text(SMALL).unwrap();
        assert_eq!(polar.all.len(), 2);
        assert_eq!(polar.sample(6.0, 40.0).unwrap().speed, 4.9);
        assert_eq!(polar.targets.up.len(), 2);
        assert_eq!(polar.targets.down.len(), 1);
        assert_eq!(polar.target_angle(6.0, false), Some(142.9));
    }

    #[test]
    fn short_row_reports_line_number() {
        let err = PolarModel::from_text("# header\n6 40 4.9 7.0\n").unwrap_err();
        assert!(matches!(err, PolarError::Row { line: 2, .. }));
    }

    #[test]
    fn garbage_column_is_fatal() {
        let err = PolarModel::from_text("6 40 fast 7.0 2.0 *\n").unwrap_err();
        assert!(matches!(err, PolarError::Row { line: 1, .. }));
    }

    #[test]
    fn table_without_targets_is_rejected() {
        assert!(matches!(
            PolarModel::from_text("6 40 4.9 7.0 2.7\n"),
            Err(PolarError::NoTargets)
        ));
    }

    #[test]
    fn builtin_targets_match_table_exactly() {
        let polar = PolarModel::builtin().unwrap();
        assert_eq!(polar.targets.up.len(), 28);
        assert_eq!(polar.target_speed(6.0, true), Some(5.253));
        assert_eq!(polar.target_angle(10.0, false), Some(153.3));
        assert_eq!(polar.sample(6.0, 43.3).unwrap().speed, 5.253);
    }

    #[test]
    fn loads_from_path() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(SMALL.as_bytes()).unwrap();
        let polar = PolarModel::from_path(temp.path()).unwrap();
        assert_eq!(polar.target_speed(8.0, true), Some(6.104));
        assert!(matches!(
            PolarModel::from_path("/nonexistent/polar.pol"),
            Err(PolarError::Io { .. })
        ));
    }
}
