use std::io::{BufRead, Write};
use std::path::Path;

use crate::pointcloud::PointSet;

/// Error types for the PLY module.
#[derive(Debug, thiserror::Error)]
pub enum PlyError {
    /// Failed to read or write the PLY file.
    #[error("Failed to read PLY file")]
    Io(#[from] std::io::Error),

    /// The header is not an ASCII vertex header.
    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    /// A vertex line does not hold three coordinates.
    #[error("Malformed vertex on line {0}")]
    MalformedVertex(usize),
}

struct PlyHeader {
    vertex_count: usize,
    // number of header lines, used for line numbers in errors
    lines: usize,
}

fn parse_header<R: BufRead>(reader: &mut R) -> Result<PlyHeader, PlyError> {
    let mut line = String::new();
    let mut vertex_count = None;
    let mut is_ascii = false;
    let mut is_ply = false;
    let mut properties = Vec::new();
    let mut lines = 0;

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::InvalidHeader("missing end_header".to_string()));
        }
        lines += 1;
        let trimmed = line.trim();

        if trimmed == "ply" {
            is_ply = true;
        } else if trimmed == "end_header" {
            break;
        } else if trimmed.starts_with("format") {
            is_ascii = trimmed.starts_with("format ascii");
        } else if trimmed.starts_with("element vertex") {
            vertex_count = trimmed
                .split_whitespace()
                .last()
                .and_then(|s| s.parse::<usize>().ok());
        } else if trimmed.starts_with("property") {
            if let Some(name) = trimmed.split_whitespace().nth(2) {
                properties.push(name.to_string());
            }
        }
    }

    if !is_ply || !is_ascii {
        return Err(PlyError::InvalidHeader(
            "expected an ascii ply file".to_string(),
        ));
    }
    if properties.len() < 3 || properties[..3] != ["x", "y", "z"] {
        return Err(PlyError::InvalidHeader(
            "vertex properties must start with x y z".to_string(),
        ));
    }
    let vertex_count =
        vertex_count.ok_or_else(|| PlyError::InvalidHeader("missing vertex count".to_string()))?;

    Ok(PlyHeader {
        vertex_count,
        lines,
    })
}

/// Write a point set as an ASCII PLY file.
///
/// When `color` is given every vertex carries it as `red green blue` bytes.
pub fn write_ply_ascii(
    path: impl AsRef<Path>,
    points: &PointSet,
    color: Option<[u8; 3]>,
) -> Result<(), PlyError> {
    let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);

    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "element vertex {}", points.len())?;
    for axis in ["x", "y", "z"] {
        writeln!(writer, "property double {axis}")?;
    }
    if color.is_some() {
        for channel in ["red", "green", "blue"] {
            writeln!(writer, "property uchar {channel}")?;
        }
    }
    writeln!(writer, "end_header")?;

    for [x, y, z] in points.points() {
        match color {
            Some([r, g, b]) => writeln!(writer, "{x} {y} {z} {r} {g} {b}")?,
            None => writeln!(writer, "{x} {y} {z}")?,
        }
    }
    writer.flush()?;

    Ok(())
}

/// Read the vertex positions of an ASCII PLY file.
///
/// Properties after `x y z` are ignored.
pub fn read_ply_ascii(path: impl AsRef<Path>) -> Result<PointSet, PlyError> {
    let mut reader = std::io::BufReader::new(std::fs::File::open(path)?);
    let header = parse_header(&mut reader)?;

    let mut points = Vec::with_capacity(header.vertex_count);
    let mut line = String::new();
    for i in 0..header.vertex_count {
        line.clear();
        let line_number = header.lines + i + 1;
        if reader.read_line(&mut line)? == 0 {
            return Err(PlyError::MalformedVertex(line_number));
        }
        let mut coords = line.split_whitespace().map(str::parse::<f64>);
        match (coords.next(), coords.next(), coords.next()) {
            (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => points.push([x, y, z]),
            _ => return Err(PlyError::MalformedVertex(line_number)),
        }
    }

    Ok(PointSet::new(points))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_colored() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("points.ply");
        let points = PointSet::new(vec![[0.0, 0.5, -1.25], [1.0, 2.0, 3.0]]);
        write_ply_ascii(&path, &points, Some([31, 119, 180]))?;

        let text = std::fs::read_to_string(&path)?;
        assert!(text.contains("element vertex 2"));
        assert!(text.contains("property uchar red"));
        assert!(text.ends_with("1 2 3 31 119 180\n"));

        assert_eq!(read_ply_ascii(&path)?, points);
        Ok(())
    }

    #[test]
    fn test_empty_point_set() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("empty.ply");
        write_ply_ascii(&path, &PointSet::default(), None)?;
        assert!(read_ply_ascii(&path)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_rejects_binary() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("binary.ply");
        std::fs::write(
            &path,
            "ply\nformat binary_little_endian 1.0\nelement vertex 0\nproperty float x\nproperty float y\nproperty float z\nend_header\n",
        )?;
        assert!(matches!(
            read_ply_ascii(&path),
            Err(PlyError::InvalidHeader(_))
        ));
        Ok(())
    }

    #[test]
    fn test_truncated_body() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("short.ply");
        std::fs::write(
            &path,
            "ply\nformat ascii 1.0\nelement vertex 2\nproperty double x\nproperty double y\nproperty double z\nend_header\n0 0 0\n",
        )?;
        assert!(matches!(
            read_ply_ascii(&path),
            Err(PlyError::MalformedVertex(9))
        ));
        Ok(())
    }
}
