use std::io::BufRead;
use std::path::Path;

use crate::pointcloud::PointSet;

/// Error types for the `.pts` reader.
#[derive(Debug, thiserror::Error)]
pub enum PtsError {
    /// Failed to read the file.
    #[error("Failed to read PTS file")]
    Io(#[from] std::io::Error),

    /// A line does not hold three numeric coordinates.
    #[error("Malformed point on line {line}: {content}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },
}

/// Read a `.pts` file with one `x y z` point per line.
///
/// Extra columns are ignored and blank lines are skipped.
pub fn read_pts(path: impl AsRef<Path>) -> Result<PointSet, PtsError> {
    let file = std::fs::File::open(path)?;
    parse_pts(std::io::BufReader::new(file))
}

/// Parse `.pts` content from any buffered reader.
pub fn parse_pts<R: BufRead>(reader: R) -> Result<PointSet, PtsError> {
    let mut points = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut coords = trimmed.split_whitespace().map(str::parse::<f64>);
        let point = match (coords.next(), coords.next(), coords.next()) {
            (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => [x, y, z],
            _ => {
                return Err(PtsError::Parse {
                    line: idx + 1,
                    content: trimmed.to_string(),
                })
            }
        };
        points.push(point);
    }

    Ok(PointSet::new(points))
}
