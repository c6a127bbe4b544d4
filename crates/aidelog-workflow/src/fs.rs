//! Filesystem collaborator
//!
//! Only the four operations the pipeline needs: existence checks, the
//! atomic rename used for publishing, and whole-file read/write.

use std::io;
use std::path::Path;

/// Narrow contract for the pipeline's filesystem operations.
pub trait Filesystem {
    fn exists(&self, path: &Path) -> bool;

    /// Rename `src` to `dst`. On the real filesystem this is the atomic
    /// publish primitive, so both paths must live on the same filesystem.
    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

impl<T: Filesystem + ?Sized> Filesystem for &T {
    fn exists(&self, path: &Path) -> bool {
        (**self).exists(path)
    }

    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()> {
        (**self).rename(src, dst)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        (**self).write(path, contents)
    }
}

/// [`Filesystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFs;

impl Filesystem for SystemFs {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()> {
        std::fs::rename(src, dst)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}
