//! Dataset split names and per-split storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

/// A named partition of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Test,
    Val,
}

impl Split {
    /// All splits, in load order.
    pub const ALL: [Split; 3] = [Split::Train, Split::Test, Split::Val];

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
            Split::Val => "val",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a split.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid split '{0}' (expected train, test or val)")]
pub struct ParseSplitError(pub String);

impl FromStr for Split {
    type Err = ParseSplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "test" => Ok(Split::Test),
            "val" => Ok(Split::Val),
            other => Err(ParseSplitError(other.to_string())),
        }
    }
}

/// One value per split.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerSplit<T> {
    pub train: T,
    pub test: T,
    pub val: T,
}

impl<T> PerSplit<T> {
    pub fn new(train: T, test: T, val: T) -> Self {
        Self { train, test, val }
    }

    /// Build each entry with a fallible constructor, stopping at the first error.
    pub fn try_from_fn<E>(mut f: impl FnMut(Split) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            train: f(Split::Train)?,
            test: f(Split::Test)?,
            val: f(Split::Val)?,
        })
    }

    pub fn get(&self, split: Split) -> &T {
        match split {
            Split::Train => &self.train,
            Split::Test => &self.test,
            Split::Val => &self.val,
        }
    }

    pub fn get_mut(&mut self, split: Split) -> &mut T {
        match split {
            Split::Train => &mut self.train,
            Split::Test => &mut self.test,
            Split::Val => &mut self.val,
        }
    }

    /// Iterate `(split, value)` pairs in load order.
    pub fn iter(&self) -> impl Iterator<Item = (Split, &T)> {
        Split::ALL.into_iter().map(move |split| (split, self.get(split)))
    }
}

impl<T> Index<Split> for PerSplit<T> {
    type Output = T;

    fn index(&self, split: Split) -> &T {
        self.get(split)
    }
}

impl<T> IndexMut<Split> for PerSplit<T> {
    fn index_mut(&mut self, split: Split) -> &mut T {
        self.get_mut(split)
    }
}
