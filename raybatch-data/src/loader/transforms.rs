//! Per-split transform descriptions (`transforms_<split>.json`).

use crate::error::DatasetError;
use crate::pose::Pose;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug)]
struct TransformsFile {
    #[serde(default)]
    camera_angle_x: Option<f64>,
    #[serde(default)]
    frames: Vec<JsonValue>,
}

/// One frame entry: its pose plus the raw record it came from.
#[derive(Debug, Clone)]
pub struct FrameEntry {
    pub pose: Pose,
    pub metadata: JsonValue,
}

/// A parsed transform description for one split.
#[derive(Debug, Clone)]
pub struct Transforms {
    pub path: PathBuf,
    pub camera_angle_x: Option<f64>,
    pub frames: Vec<FrameEntry>,
}

impl Transforms {
    /// The horizontal field of view, required on the train split.
    pub fn fov_x(&self) -> Result<f64, DatasetError> {
        self.camera_angle_x.ok_or_else(|| DatasetError::MissingField {
            path: self.path.clone(),
            field: "camera_angle_x",
        })
    }
}

/// Read and parse a transform description.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn read_transforms(path: &Path) -> Result<Transforms, DatasetError> {
    let file = File::open(path)?;
    let parsed: TransformsFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| DatasetError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    parse_frames(path, parsed)
}

fn parse_frames(path: &Path, parsed: TransformsFile) -> Result<Transforms, DatasetError> {
    let mut frames = Vec::with_capacity(parsed.frames.len());
    for (i, frame) in parsed.frames.into_iter().enumerate() {
        let matrix = frame
            .get("transform_matrix")
            .ok_or_else(|| DatasetError::MissingField {
                path: path.to_path_buf(),
                field: "transform_matrix",
            })?;
        let pose = Pose::from_json(matrix).map_err(|e| match e {
            DatasetError::MalformedPose(reason) => {
                DatasetError::MalformedPose(format!("frame {i} in {}: {reason}", path.display()))
            }
            other => other,
        })?;
        frames.push(FrameEntry {
            pose,
            metadata: frame,
        });
    }
    debug!("Parsed {} frames", frames.len());
    Ok(Transforms {
        path: path.to_path_buf(),
        camera_angle_x: parsed.camera_angle_x,
        frames,
    })
}
