use std::io::{BufRead, Write};
use std::path::Path;

use crate::pointcloud::PointSet;

/// Error types for the OBJ module.
#[derive(Debug, thiserror::Error)]
pub enum ObjError {
    /// Failed to read or write the OBJ file.
    #[error("Failed to read OBJ file")]
    Io(#[from] std::io::Error),

    /// A vertex line does not hold three coordinates.
    #[error("Malformed vertex on line {0}")]
    MalformedVertex(usize),

    /// The mesh has no vertices.
    #[error("OBJ file has no vertices")]
    NoVertices,
}

fn parse_vertex(line: &str) -> Option<[f64; 3]> {
    let mut coords = line.split_whitespace().skip(1).map(str::parse::<f64>);
    match (coords.next(), coords.next(), coords.next()) {
        (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => Some([x, y, z]),
        _ => None,
    }
}

fn is_vertex_line(line: &str) -> bool {
    line.trim_start().starts_with("v ")
}

/// Read the vertex positions (`v x y z`) of an OBJ file.
pub fn read_obj_vertices(path: impl AsRef<Path>) -> Result<PointSet, ObjError> {
    let reader = std::io::BufReader::new(std::fs::File::open(path)?);
    let mut vertices = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if is_vertex_line(&line) {
            vertices.push(parse_vertex(&line).ok_or(ObjError::MalformedVertex(idx + 1))?);
        }
    }
    Ok(PointSet::new(vertices))
}

/// Write a copy of an OBJ file translated so that its bounding-box center sits at the origin.
///
/// Only vertex positions are rewritten, every other line is copied verbatim.
///
/// # Returns
///
/// The bounding-box center that was subtracted.
pub fn write_obj_centered(
    src: impl AsRef<Path>,
    dst: impl AsRef<Path>,
) -> Result<[f64; 3], ObjError> {
    let src = src.as_ref();
    let center = read_obj_vertices(src)?
        .bounding_box_center()
        .ok_or(ObjError::NoVertices)?;

    let reader = std::io::BufReader::new(std::fs::File::open(src)?);
    let mut writer = std::io::BufWriter::new(std::fs::File::create(dst)?);
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if is_vertex_line(&line) {
            let v = parse_vertex(&line).ok_or(ObjError::MalformedVertex(idx + 1))?;
            writeln!(
                writer,
                "v {} {} {}",
                v[0] - center[0],
                v[1] - center[1],
                v[2] - center[2]
            )?;
        } else {
            writeln!(writer, "{line}")?;
        }
    }
    writer.flush()?;

    Ok(center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHIFTED_MESH: &str =
        "# shifted box\nv 1 1 1\nv 3 1 1\nv 1 5 1\nv 3 5 7\nvn 0 0 1\nf 1 2 3\n";

    #[test]
    fn test_read_obj_vertices() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let path = dir.path().join("mesh.obj");
        std::fs::write(&path, SHIFTED_MESH)?;
        let vertices = read_obj_vertices(&path)?;
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices.points()[3], [3.0, 5.0, 7.0]);
        Ok(())
    }

    #[test]
    fn test_write_obj_centered() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let src = dir.path().join("mesh.obj");
        let dst = dir.path().join("centered.obj");
        std::fs::write(&src, SHIFTED_MESH)?;

        let center = write_obj_centered(&src, &dst)?;
        assert_eq!(center, [2.0, 3.0, 4.0]);

        let centered = read_obj_vertices(&dst)?;
        assert_eq!(centered.bounding_box_center(), Some([0.0, 0.0, 0.0]));

        let text = std::fs::read_to_string(&dst)?;
        assert!(text.contains("vn 0 0 1"));
        assert!(text.contains("f 1 2 3"));
        Ok(())
    }

    #[test]
    fn test_write_obj_centered_no_vertices() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let src = dir.path().join("empty.obj");
        std::fs::write(&src, "# nothing\n")?;
        let res = write_obj_centered(&src, dir.path().join("out.obj"));
        assert!(matches!(res, Err(ObjError::NoVertices)));
        Ok(())
    }

    #[test]
    fn test_malformed_vertex() -> Result<(), Box<dyn std::error::Error>> {
        let dir = TempDir::new()?;
        let src = dir.path().join("bad.obj");
        std::fs::write(&src, "v 0 0 0\nv 1 x 2\n")?;
        assert!(matches!(
            read_obj_vertices(&src),
            Err(ObjError::MalformedVertex(2))
        ));
        Ok(())
    }
}
