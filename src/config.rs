//! Recognition settings shared by every page of every call.

use std::num::NonZeroU32;

use clap::Args;

use crate::prelude::*;

/// Default Tesseract language. Tamil.
pub const DEFAULT_LANGUAGE: &str = "tam";

/// Default rasterization resolution.
pub const DEFAULT_DPI: NonZeroU32 = NonZeroU32::new(300).expect("300 is non-zero");

/// How to run the external tools, and what language to ask for.
#[derive(Args, Clone, Debug)]
pub struct RecognitionConfig {
    /// The Tesseract language code to recognize (for example, `tam` or
    /// `eng+tam`).
    #[clap(long = "lang", env = "OCR_LANG", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// The DPI to use when rasterizing PDF pages.
    #[clap(long, env = "OCR_DPI", default_value = "300")]
    pub dpi: NonZeroU32,

    /// Path to the `tesseract` executable.
    #[clap(long = "tesseract", env = "TESSERACT_CMD", default_value = "tesseract")]
    pub tesseract_cmd: PathBuf,

    /// Path to Poppler's `pdftocairo` executable.
    #[clap(long = "pdftocairo", env = "PDFTOCAIRO_CMD", default_value = "pdftocairo")]
    pub pdftocairo_cmd: PathBuf,

    /// Path to Poppler's `pdfinfo` executable.
    #[clap(long = "pdfinfo", env = "PDFINFO_CMD", default_value = "pdfinfo")]
    pub pdfinfo_cmd: PathBuf,

    /// Where to stage in-memory input before handing it to the tools. Defaults
    /// to the system temporary directory.
    #[clap(long, env = "OCR_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_owned(),
            dpi: DEFAULT_DPI,
            tesseract_cmd: PathBuf::from("tesseract"),
            pdftocairo_cmd: PathBuf::from("pdftocairo"),
            pdfinfo_cmd: PathBuf::from("pdfinfo"),
            staging_dir: None,
        }
    }
}
