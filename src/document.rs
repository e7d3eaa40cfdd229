//! Input documents.

use std::fmt;

use mime_guess::mime;

use crate::{error::ExtractError, prelude::*};

/// MIME type reported by [`infer`] for PDF files.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A document to extract text from.
#[derive(Debug, Clone)]
pub enum Document {
    /// A PDF file on disk.
    PdfPath(PathBuf),
    /// A raster image on disk, treated as a single page.
    ImagePath(PathBuf),
    /// In-memory data which needs to be staged to disk first.
    Bytes { data: Vec<u8>, file_type: FileType },
}

impl Document {
    /// Classify a file on disk by looking at its contents.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let mime_type = get_mime_type(path)?;
        if mime_type == PDF_MIME_TYPE {
            Ok(Document::PdfPath(path.to_owned()))
        } else if mime_type.starts_with("image/") {
            Ok(Document::ImagePath(path.to_owned()))
        } else {
            Err(ExtractError::invalid_document(
                path,
                format!("unsupported content type {mime_type}"),
            ))
        }
    }
}

/// What kind of data we were handed as bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileType {
    /// A PDF document.
    Pdf,
    /// An image, with the extension we should give it on disk.
    Image { extension: String },
}

impl FileType {
    /// Parse a file type discriminator like `"pdf"`, `"png"` or `".JPG"`.
    ///
    /// We accept anything that looks like an image extension, and leave it to
    /// the image decoder to decide whether it can actually read the data.
    pub fn parse(file_type: &str) -> Result<Self, ExtractError> {
        let extension = file_type.trim().trim_start_matches('.').to_ascii_lowercase();
        if extension == "pdf" {
            return Ok(FileType::Pdf);
        }
        let is_image = !extension.is_empty()
            && mime_guess::from_ext(&extension)
                .iter()
                .any(|m| m.type_() == mime::IMAGE);
        if is_image {
            Ok(FileType::Image { extension })
        } else {
            Err(ExtractError::invalid_document(
                Path::new("<bytes>"),
                format!("unrecognized file type {file_type:?}"),
            ))
        }
    }

    /// The extension to use for a staged copy of this data.
    pub fn extension(&self) -> &str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Image { extension } => extension.as_str(),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Get the MIME type of a file from its magic bytes.
pub fn get_mime_type(path: &Path) -> Result<String, ExtractError> {
    let kind = infer::get_from_path(path).map_err(|err| {
        ExtractError::invalid_document(path, format!("cannot read file: {err}"))
    })?;
    kind.map(|kind| kind.mime_type().to_string())
        .ok_or_else(|| ExtractError::invalid_document(path, "unknown content type"))
}
