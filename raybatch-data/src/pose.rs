//! Camera-to-world poses.

use crate::error::DatasetError;
use glam::{Mat3, Vec3};

/// Tolerance used when checking that a rotation block is orthonormal.
const RIGID_TOLERANCE: f32 = 1e-3;

/// A camera-to-world transform reduced to 3x4: rotation `R` and translation `t`.
///
/// Only the top three rows of a homogeneous 4x4 matrix are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    rotation: Mat3,
    translation: Vec3,
}

impl Pose {
    pub fn new(rotation: Mat3, translation: Vec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Mat3::IDENTITY, Vec3::ZERO)
    }

    /// Build a pose from a row-major 3x4 or 4x4 matrix.
    ///
    /// Every kept row must have exactly four finite entries. A fourth row, when
    /// present, must also have four entries but is otherwise ignored.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, DatasetError> {
        if rows.len() != 3 && rows.len() != 4 {
            return Err(DatasetError::MalformedPose(format!(
                "expected 3 or 4 rows, got {}",
                rows.len()
            )));
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != 4 {
                return Err(DatasetError::MalformedPose(format!(
                    "row {i} has {} entries, expected 4",
                    row.len()
                )));
            }
        }

        let mut m = [[0.0f32; 4]; 3];
        for (i, row) in rows.iter().take(3).enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(DatasetError::MalformedPose(format!(
                        "entry ({i}, {j}) is not finite"
                    )));
                }
                m[i][j] = value as f32;
            }
        }

        // glam matrices are column-major
        let rotation = Mat3::from_cols(
            Vec3::new(m[0][0], m[1][0], m[2][0]),
            Vec3::new(m[0][1], m[1][1], m[2][1]),
            Vec3::new(m[0][2], m[1][2], m[2][2]),
        );
        let translation = Vec3::new(m[0][3], m[1][3], m[2][3]);
        Ok(Self::new(rotation, translation))
    }

    /// Parse a pose from a JSON nested array such as a `transform_matrix` field.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, DatasetError> {
        let rows = value
            .as_array()
            .ok_or_else(|| DatasetError::MalformedPose("matrix is not an array".to_string()))?;
        let mut parsed = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let entries = row.as_array().ok_or_else(|| {
                DatasetError::MalformedPose(format!("row {i} is not an array"))
            })?;
            let values = entries
                .iter()
                .map(|v| {
                    v.as_f64().ok_or_else(|| {
                        DatasetError::MalformedPose(format!("row {i} has a non-numeric entry"))
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            parsed.push(values);
        }
        Self::from_rows(&parsed)
    }

    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    /// Camera position in world space.
    pub fn translation(&self) -> Vec3 {
        self.translation
    }

    /// Rows of the 3x4 matrix `[R | t]`.
    pub fn to_rows(&self) -> [[f32; 4]; 3] {
        let r = self.rotation.transpose();
        [
            [r.x_axis.x, r.x_axis.y, r.x_axis.z, self.translation.x],
            [r.y_axis.x, r.y_axis.y, r.y_axis.z, self.translation.y],
            [r.z_axis.x, r.z_axis.y, r.z_axis.z, self.translation.z],
        ]
    }

    /// True when the rotation block is orthonormal with determinant +1.
    ///
    /// Poses carrying scale or shear fail this check.
    pub fn is_rigid(&self) -> bool {
        let gram = self.rotation.transpose() * self.rotation;
        gram.abs_diff_eq(Mat3::IDENTITY, RIGID_TOLERANCE)
            && (self.rotation.determinant() - 1.0).abs() < RIGID_TOLERANCE
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_rows_4x4() {
        let rows = vec![
            vec![0.0, -1.0, 0.0, 1.0],
            vec![1.0, 0.0, 0.0, 2.0],
            vec![0.0, 0.0, 1.0, 3.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ];
        let pose = Pose::from_rows(&rows).unwrap();
        assert_eq!(pose.translation(), Vec3::new(1.0, 2.0, 3.0));
        // R * x = first column of the row-major matrix
        assert_eq!(pose.rotation() * Vec3::X, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(pose.rotation() * Vec3::Y, Vec3::new(-1.0, 0.0, 0.0));
        assert!(pose.is_rigid());
    }

    #[test]
    fn test_from_rows_3x4_matches_4x4() {
        let rows3 = vec![
            vec![1.0, 0.0, 0.0, 0.5],
            vec![0.0, 1.0, 0.0, -0.5],
            vec![0.0, 0.0, 1.0, 4.0],
        ];
        let mut rows4 = rows3.clone();
        rows4.push(vec![0.0, 0.0, 0.0, 1.0]);
        assert_eq!(Pose::from_rows(&rows3).unwrap(), Pose::from_rows(&rows4).unwrap());
    }

    #[test]
    fn test_to_rows_round_trip() {
        let rows = vec![
            vec![0.0, 0.0, 1.0, 7.0],
            vec![0.0, 1.0, 0.0, 8.0],
            vec![-1.0, 0.0, 0.0, 9.0],
        ];
        let pose = Pose::from_rows(&rows).unwrap();
        let back = pose.to_rows();
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                assert_eq!(back[i][j], v as f32);
            }
        }
    }

    #[test]
    fn test_rejects_wrong_shapes() {
        assert!(matches!(
            Pose::from_rows(&[vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]]),
            Err(DatasetError::MalformedPose(_))
        ));
        let short_row = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
        ];
        assert!(Pose::from_rows(&short_row).is_err());
        let bad_fourth = vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 1.0],
        ];
        assert!(Pose::from_rows(&bad_fourth).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        let rows = vec![
            vec![1.0, 0.0, 0.0, f64::NAN],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
        ];
        assert!(Pose::from_rows(&rows).is_err());
    }

    #[test]
    fn test_from_json() {
        let value = json!([[1, 0, 0, 1.5], [0, 1, 0, 0], [0, 0, 1, -2], [0, 0, 0, 1]]);
        let pose = Pose::from_json(&value).unwrap();
        assert_eq!(pose.translation(), Vec3::new(1.5, 0.0, -2.0));
        assert_eq!(pose.rotation(), Mat3::IDENTITY);

        assert!(Pose::from_json(&json!("identity")).is_err());
        assert!(Pose::from_json(&json!([[1, 0, 0, "x"], [0, 1, 0, 0], [0, 0, 1, 0]])).is_err());
        assert!(Pose::from_json(&json!([1, 0, 0, 0])).is_err());
    }

    #[test]
    fn test_scaled_pose_is_not_rigid() {
        let pose = Pose::new(Mat3::from_diagonal(Vec3::splat(2.0)), Vec3::ZERO);
        assert!(!pose.is_rigid());
        let reflected = Pose::new(Mat3::from_diagonal(Vec3::new(1.0, 1.0, -1.0)), Vec3::ZERO);
        assert!(!reflected.is_rigid());
        assert!(Pose::identity().is_rigid());
    }
}
