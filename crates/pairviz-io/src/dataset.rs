use std::io::Write;
use std::path::Path;

use pairviz_3d::{pointcloud::PointSet, transforms::Matrix4};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::LoadError;

/// Names of the arrays a pair dataset must provide.
pub const REQUIRED_ARRAYS: [&str; 13] = [
    "in_pts1",
    "in_pts2",
    "gt_pts1",
    "gt_pts2",
    "out_pts1",
    "out_pts2",
    "out_para12_r",
    "out_para21_r",
    "out_para12_t",
    "out_para21_t",
    "gt_matrix_1",
    "gt_matrix_2",
    "pts_name",
];

/// One registration sample: two partial inputs, their ground truth and the predicted outputs.
#[derive(Debug, Clone, PartialEq)]
pub struct PairDataset {
    /// Sample identifier, used to name the comparison figure.
    pub name: String,
    /// First observed input.
    pub in_pts1: PointSet,
    /// Second observed input.
    pub in_pts2: PointSet,
    /// Ground-truth completion of the first input.
    pub gt_pts1: PointSet,
    /// Ground-truth completion of the second input.
    pub gt_pts2: PointSet,
    /// Predicted completion of the first input.
    pub out_pts1: PointSet,
    /// Predicted completion of the second input.
    pub out_pts2: PointSet,
    /// Predicted rotation from frame 1 to frame 2 as `[x, y, z, w]`.
    pub out_para12_r: [f64; 4],
    /// Predicted rotation from frame 2 to frame 1 as `[x, y, z, w]`.
    pub out_para21_r: [f64; 4],
    /// Predicted translation from frame 1 to frame 2.
    pub out_para12_t: [f64; 3],
    /// Predicted translation from frame 2 to frame 1.
    pub out_para21_t: [f64; 3],
    /// Ground-truth pose of the first input.
    pub gt_matrix_1: Matrix4,
    /// Ground-truth pose of the second input.
    pub gt_matrix_2: Matrix4,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum SampleName {
    One(String),
    Many(Vec<String>),
}

fn take<T: DeserializeOwned>(map: &mut Map<String, Value>, name: &'static str) -> Result<T, LoadError> {
    let value = map.remove(name).ok_or(LoadError::MissingArray(name))?;
    serde_json::from_value(value).map_err(|source| LoadError::InvalidArray { name, source })
}

fn take_points(map: &mut Map<String, Value>, name: &'static str) -> Result<PointSet, LoadError> {
    Ok(PointSet::new(take::<Vec<[f64; 3]>>(map, name)?))
}

impl PairDataset {
    /// Load a pair dataset from a JSON file of named arrays.
    ///
    /// # Errors
    ///
    /// Any absent array is a [`LoadError::MissingArray`]; arrays with the wrong
    /// shape are a [`LoadError::InvalidArray`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LoadError::FileDoesNotExist(path.to_path_buf()));
        }
        let reader = std::io::BufReader::new(std::fs::File::open(path)?);
        let value: Value = serde_json::from_reader(reader)?;
        let dataset = Self::from_json_value(value)?;
        log::debug!(
            "loaded sample {} from {}: {} + {} input points",
            dataset.name,
            path.display(),
            dataset.in_pts1.len(),
            dataset.in_pts2.len()
        );
        Ok(dataset)
    }

    /// Build a pair dataset from an already parsed JSON value.
    pub fn from_json_value(value: Value) -> Result<Self, LoadError> {
        let Value::Object(mut map) = value else {
            return Err(LoadError::NotAnObject);
        };

        // report the first missing array in a stable order before any shape errors
        if let Some(name) = REQUIRED_ARRAYS.iter().find(|name| !map.contains_key(**name)) {
            return Err(LoadError::MissingArray(*name));
        }

        let name = match take::<SampleName>(&mut map, "pts_name")? {
            SampleName::One(name) => name,
            SampleName::Many(names) => names.into_iter().next().ok_or_else(|| {
                LoadError::InvalidArray {
                    name: "pts_name",
                    source: serde::de::Error::custom("empty sample name array"),
                }
            })?,
        };

        Ok(Self {
            name,
            in_pts1: take_points(&mut map, "in_pts1")?,
            in_pts2: take_points(&mut map, "in_pts2")?,
            gt_pts1: take_points(&mut map, "gt_pts1")?,
            gt_pts2: take_points(&mut map, "gt_pts2")?,
            out_pts1: take_points(&mut map, "out_pts1")?,
            out_pts2: take_points(&mut map, "out_pts2")?,
            out_para12_r: take(&mut map, "out_para12_r")?,
            out_para21_r: take(&mut map, "out_para21_r")?,
            out_para12_t: take(&mut map, "out_para12_t")?,
            out_para21_t: take(&mut map, "out_para21_t")?,
            gt_matrix_1: take(&mut map, "gt_matrix_1")?,
            gt_matrix_2: take(&mut map, "gt_matrix_2")?,
        })
    }

    /// Serialize the dataset back to its JSON form.
    pub fn to_json_value(&self) -> Value {
        serde_json::json!({
            "pts_name": [self.name],
            "in_pts1": self.in_pts1.points(),
            "in_pts2": self.in_pts2.points(),
            "gt_pts1": self.gt_pts1.points(),
            "gt_pts2": self.gt_pts2.points(),
            "out_pts1": self.out_pts1.points(),
            "out_pts2": self.out_pts2.points(),
            "out_para12_r": self.out_para12_r,
            "out_para21_r": self.out_para21_r,
            "out_para12_t": self.out_para12_t,
            "out_para21_t": self.out_para21_t,
            "gt_matrix_1": self.gt_matrix_1,
            "gt_matrix_2": self.gt_matrix_2,
        })
    }

    /// Write the dataset as a JSON file.
    pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer(&mut writer, &self.to_json_value())?;
        writer.flush()?;
        Ok(())
    }
}
