//! Directory listing and lazy decoding of candidate images.
//!
//! Available when the `image-io` feature is enabled. Filtering by name is left
//! to the batch runner, so every listed entry comes through.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::CandidateEntry;
use crate::image::io::load_binary_image;
use crate::image::BinaryImage;
use crate::util::{HuError, HuResult};

/// Returns the entry names of `dir` in the order the OS lists them.
///
/// Names are not sorted and are kept as `OsString` so that non-UTF-8 names
/// still resolve to their files.
pub fn list_entry_names<P: AsRef<Path>>(dir: P) -> HuResult<Vec<OsString>> {
    let dir = dir.as_ref();
    let read = fs::read_dir(dir).map_err(|err| HuError::Io {
        reason: format!("{}: {err}", dir.display()),
    })?;
    let mut names = Vec::new();
    for entry in read {
        names.push(entry?.file_name());
    }
    Ok(names)
}

/// Loads the reference image, classifying failures like any other entry.
pub fn load_reference<P: AsRef<Path>>(path: P) -> CandidateEntry<BinaryImage> {
    let path = path.as_ref();
    let label = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    classify(path, label)
}

/// Iterator over the entries of a search directory.
///
/// Each image is decoded only when the iterator reaches it, so at most one
/// candidate is held in memory during a sequential run.
pub struct DirectorySource {
    dir: PathBuf,
    names: std::vec::IntoIter<OsString>,
}

impl DirectorySource {
    /// Lists `dir` and prepares lazy decoding of its entries.
    pub fn open<P: AsRef<Path>>(dir: P) -> HuResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        let names = list_entry_names(&dir)?;
        Ok(Self {
            dir,
            names: names.into_iter(),
        })
    }

    /// Returns the directory being listed.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Iterator for DirectorySource {
    type Item = CandidateEntry<BinaryImage>;

    fn next(&mut self) -> Option<Self::Item> {
        let name = self.names.next()?;
        let label = name.to_string_lossy().into_owned();
        Some(classify(&self.dir.join(&name), label))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.names.size_hint()
    }
}

fn classify(path: &Path, name: String) -> CandidateEntry<BinaryImage> {
    if path.is_dir() {
        return CandidateEntry::Directory { name };
    }
    match load_binary_image(path) {
        Ok(image) => CandidateEntry::Image { name, image },
        Err(err) => CandidateEntry::Unreadable {
            name,
            reason: err.to_string(),
        },
    }
}
