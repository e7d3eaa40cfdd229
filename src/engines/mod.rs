//! External engine interface.
//!
//! The extractor only knows how to do two things with external tools: turn a
//! PDF into page images, and turn an image into text. Each is a trait here, so
//! the tools can be swapped out (or faked in tests) without touching the
//! extractor.

use std::num::NonZeroU32;

use crate::{
    error::{ExtractError, RecognizeError},
    prelude::*,
};

pub mod poppler;
pub mod tesseract;

/// Interface to a PDF rasterizer.
#[async_trait]
pub trait Rasterizer: Send + Sync + 'static {
    /// Render every page of `pdf_path` to an image at `dpi`, in page order.
    async fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: NonZeroU32,
    ) -> Result<PageImages, ExtractError>;
}

/// Interface to an OCR engine.
#[async_trait]
pub trait Recognizer: Send + Sync + 'static {
    /// Recognize the text in a single image.
    async fn recognize(
        &self,
        image_path: &Path,
        language: &str,
    ) -> Result<String, RecognizeError>;
}

/// Page images produced by a [`Rasterizer`], in page order.
pub struct PageImages {
    /// The temporary directory holding the images. Always `Some` until
    /// [`Drop`] takes it, so it can call [`tempfile::TempDir::close`] and log
    /// any failure.
    tmpdir: Option<tempfile::TempDir>,
    /// The page image files, first page first.
    paths: Vec<PathBuf>,
}

impl PageImages {
    /// Wrap images stored in a temporary directory. The directory will be
    /// deleted when this value is dropped.
    pub fn in_tempdir(tmpdir: tempfile::TempDir, paths: Vec<PathBuf>) -> Self {
        Self {
            tmpdir: Some(tmpdir),
            paths,
        }
    }

    /// How many pages do we have?
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Did the rasterizer produce no pages at all?
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the page image paths, in page order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }
}

impl<'a> IntoIterator for &'a PageImages {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Drop for PageImages {
    fn drop(&mut self) {
        if let Some(tmpdir) = self.tmpdir.take() {
            let tmpdir_path = tmpdir.path().to_owned();
            if let Err(err) = tmpdir.close() {
                error!(
                    directory = ?tmpdir_path.display(),
                    "failed to delete temporary directory: {}",
                    err
                );
            }
        }
    }
}
