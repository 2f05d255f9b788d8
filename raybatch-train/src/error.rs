//! Errors raised while building ray pools or sampling from them.

use raybatch_data::{CameraIntrinsics, DatasetError, ParseSplitError, Split};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RayError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    InvalidSplit(#[from] ParseSplitError),

    #[error("{images} images but {poses} poses")]
    Alignment { images: usize, poses: usize },

    #[error("Ray basis built for {basis:?} does not match intrinsics {intrinsics:?}")]
    BasisMismatch {
        basis: CameraIntrinsics,
        intrinsics: CameraIntrinsics,
    },

    #[error("Cannot sample from the empty {0} ray pool")]
    EmptyPool(Split),

    #[error("Ray id {id} is outside the {split} pool of width {width}")]
    IdOutOfRange { split: Split, id: usize, width: usize },
}
