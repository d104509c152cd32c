//! File system abstraction, for importing voxel images that do not necessarily
//! live on the file system that [`std::fs`] accesses.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// A “file” that we can load a voxel image from and which has a name,
/// without being tied to the current OS file system.
pub trait Fileish: fmt::Debug + Send + Sync {
    /// Short name of the file, suitable as the name of a layer loaded from it.
    fn document_name(&self) -> String;

    /// Path of the file, for display purposes such as in an error, not a path that can
    /// necessarily be opened.
    fn display_full_path(&self) -> String;

    /// Obtains the file contents.
    fn read(&self) -> Result<Vec<u8>, io::Error>;
}

impl Fileish for PathBuf {
    fn document_name(&self) -> String {
        match self.file_stem() {
            Some(n) => n.to_string_lossy(),
            None => self.to_string_lossy(),
        }
        .into_owned()
    }

    fn display_full_path(&self) -> String {
        self.display().to_string()
    }

    fn read(&self) -> Result<Vec<u8>, io::Error> {
        std::fs::read(self)
    }
}

/// [`Fileish`] whose contents are already in memory, such as data received over a network
/// or embedded in a test.
#[derive(Clone)]
pub struct NonDiskFile {
    name: String,
    data: Vec<u8>,
}

impl fmt::Debug for NonDiskFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { name, data } = self;
        f.debug_struct("NonDiskFile")
            .field("name", name)
            .field("len", &data.len())
            .finish_non_exhaustive()
    }
}

impl NonDiskFile {
    /// Construct a new [`NonDiskFile`] from its name and contents.
    pub fn new(name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

impl Fileish for NonDiskFile {
    fn document_name(&self) -> String {
        self.name.clone()
    }

    fn display_full_path(&self) -> String {
        self.name.clone()
    }

    fn read(&self) -> Result<Vec<u8>, io::Error> {
        Ok(self.data.clone())
    }
}
