//! Extract per-page text from PDFs and images.
//!
//! PDFs are rasterized with Poppler's `pdftocairo`, and every page image is run
//! through `tesseract`. See [`Extractor`] for the entry points.

pub mod command;
pub mod config;
pub mod document;
pub mod engines;
pub mod error;
pub mod extractor;
pub mod prelude;

pub use self::{
    config::RecognitionConfig,
    document::{Document, FileType},
    error::ExtractError,
    extractor::{ExtractionResult, Extractor, PageText},
};
