//! Extract per-page text from documents.
//!
//! PDFs are rasterized into one image per page, and each image is OCRed in
//! turn. Images are OCRed as a single page. Byte buffers are staged to a
//! temporary file first, which is always deleted before we return.
//!
//! Pages are processed strictly one at a time, in order. If any page fails,
//! the whole call fails, and we throw away the pages we already have.

use std::{
    fs,
    io::{self, BufReader, Write as _},
    num::NonZeroU32,
    sync::Arc,
};

use image::{DynamicImage, ImageFormat};
use schemars::JsonSchema;
use tempfile::{NamedTempFile, TempPath};

use crate::{
    config::RecognitionConfig,
    document::{Document, FileType, PDF_MIME_TYPE, get_mime_type},
    engines::{
        Rasterizer, Recognizer, poppler::PopplerRasterizer,
        tesseract::TesseractRecognizer,
    },
    error::ExtractError,
    prelude::*,
};

/// Prefix for staged input files.
const STAGING_PREFIX: &str = "page-ocr-";

/// MIME type reported by [`infer`] for TIFF files.
const TIFF_MIME_TYPE: &str = "image/tiff";

/// Text extracted from a single page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct PageText {
    /// The 1-based page number.
    pub page: usize,

    /// The recognized text, with surrounding whitespace trimmed. Blank pages
    /// have empty text.
    pub text: String,
}

/// Text extracted from a document, one entry per page, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ExtractionResult {
    /// Our pages, numbered `1..=N`.
    pub pages: Vec<PageText>,
}

impl ExtractionResult {
    /// Convert to `(page, text)` pairs.
    pub fn into_pairs(self) -> Vec<(usize, String)> {
        self.pages.into_iter().map(|p| (p.page, p.text)).collect()
    }
}

/// Extracts text from PDFs and images using external tools.
pub struct Extractor {
    config: RecognitionConfig,
    rasterizer: Arc<dyn Rasterizer>,
    recognizer: Arc<dyn Recognizer>,
}

impl Extractor {
    /// Create an extractor using Poppler and Tesseract.
    pub fn new(config: RecognitionConfig) -> Self {
        let rasterizer = Arc::new(PopplerRasterizer::new(
            config.pdftocairo_cmd.clone(),
            config.pdfinfo_cmd.clone(),
        ));
        let recognizer = Arc::new(TesseractRecognizer::new(config.tesseract_cmd.clone()));
        Self::with_engines(config, rasterizer, recognizer)
    }

    /// Create an extractor using the specified engines.
    pub fn with_engines(
        config: RecognitionConfig,
        rasterizer: Arc<dyn Rasterizer>,
        recognizer: Arc<dyn Recognizer>,
    ) -> Self {
        Self {
            config,
            rasterizer,
            recognizer,
        }
    }

    /// Extract text from any kind of [`Document`].
    pub async fn extract(
        &self,
        document: &Document,
    ) -> Result<ExtractionResult, ExtractError> {
        match document {
            Document::PdfPath(path) => self.extract_from_pdf(path, None).await,
            Document::ImagePath(path) => self.extract_from_image(path).await,
            Document::Bytes { data, file_type } => {
                self.extract_staged(data, file_type).await
            }
        }
    }

    /// Extract text from every page of a PDF. If `dpi` is `None`, we use the
    /// configured default.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub async fn extract_from_pdf(
        &self,
        path: &Path,
        dpi: Option<NonZeroU32>,
    ) -> Result<ExtractionResult, ExtractError> {
        let dpi = dpi.unwrap_or(self.config.dpi);

        // Catch missing and obviously-wrong files before we spawn anything.
        let mime_type = get_mime_type(path)?;
        if mime_type != PDF_MIME_TYPE {
            return Err(ExtractError::invalid_document(
                path,
                format!("expected a PDF, found {mime_type}"),
            ));
        }

        let images = self.rasterizer.rasterize(path, dpi).await?;
        if images.is_empty() {
            warn!(path = %path.display(), "PDF has no pages");
        }

        let mut pages = Vec::with_capacity(images.len());
        for (page_idx, image_path) in images.iter().enumerate() {
            let page = page_idx + 1;
            let text = self.recognize_page(image_path, page).await?;
            pages.push(PageText { page, text });
        }
        info!(path = %path.display(), pages = pages.len(), "Extracted text from PDF");
        Ok(ExtractionResult { pages })
    }

    /// Extract text from an image, treated as a single page.
    ///
    /// Multi-frame TIFFs are OCRed using only their first frame.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub async fn extract_from_image(
        &self,
        path: &Path,
    ) -> Result<ExtractionResult, ExtractError> {
        let image = decode_image(path)?;
        debug!(width = image.width(), height = image.height(), "Validated image");

        // Tesseract would OCR every frame of a TIFF into one page, so hand it
        // a copy of just the frame we decoded.
        let first_frame = if has_more_tiff_frames(path)? {
            warn!(path = %path.display(), "Ignoring all but the first TIFF frame");
            Some(self.stage_first_frame(&image)?)
        } else {
            None
        };
        let ocr_path = first_frame.as_deref().unwrap_or(path);
        let result = self.recognize_page(ocr_path, 1).await;
        if let Some(first_frame) = first_frame {
            close_staged(first_frame);
        }

        let text = result?;
        info!(path = %path.display(), "Extracted text from image");
        Ok(ExtractionResult {
            pages: vec![PageText { page: 1, text }],
        })
    }

    /// Extract text from an in-memory document. `file_type` is `"pdf"` or an
    /// image extension like `"png"`.
    #[instrument(level = "debug", skip_all, fields(file_type = %file_type, len = bytes.len()))]
    pub async fn extract_from_bytes(
        &self,
        bytes: &[u8],
        file_type: &str,
    ) -> Result<ExtractionResult, ExtractError> {
        let file_type = FileType::parse(file_type)?;
        self.extract_staged(bytes, &file_type).await
    }

    /// Stage `bytes` to a temporary file and dispatch on `file_type`.
    async fn extract_staged(
        &self,
        bytes: &[u8],
        file_type: &FileType,
    ) -> Result<ExtractionResult, ExtractError> {
        // If this future is dropped or panics, `TempPath`'s destructor deletes
        // the file instead.
        let staged = self.stage(bytes, file_type)?;
        let result = match file_type {
            FileType::Pdf => self.extract_from_pdf(&staged, None).await,
            FileType::Image { .. } => self.extract_from_image(&staged).await,
        };

        close_staged(staged);
        result
    }

    /// Write `bytes` to a uniquely named temporary file with an extension
    /// matching `file_type`.
    fn stage(
        &self,
        bytes: &[u8],
        file_type: &FileType,
    ) -> Result<TempPath, ExtractError> {
        let mut staged = self.new_staging_file(file_type.extension())?;
        staged
            .write_all(bytes)
            .map_err(|source| ExtractError::StagingFailure {
                action: "write",
                source,
            })?;
        staged
            .flush()
            .map_err(|source| ExtractError::StagingFailure {
                action: "flush",
                source,
            })?;
        debug!(path = %staged.path().display(), %file_type, "Staged input");

        // Close our handle, but keep the file until `TempPath` is dropped.
        Ok(staged.into_temp_path())
    }

    /// Write `image` to a staged PNG file.
    fn stage_first_frame(&self, image: &DynamicImage) -> Result<TempPath, ExtractError> {
        let mut staged = self.new_staging_file("png")?;
        image
            .write_to(&mut staged, ImageFormat::Png)
            .map_err(|err| ExtractError::StagingFailure {
                action: "write",
                source: io::Error::other(err),
            })?;
        debug!(path = %staged.path().display(), "Staged first TIFF frame");
        Ok(staged.into_temp_path())
    }

    /// Create an empty, uniquely named staging file ending in `.{extension}`.
    fn new_staging_file(&self, extension: &str) -> Result<NamedTempFile, ExtractError> {
        let suffix = format!(".{extension}");
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX).suffix(&suffix);
        match &self.config.staging_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|source| ExtractError::StagingFailure {
            action: "create",
            source,
        })
    }

    /// OCR a single page image.
    async fn recognize_page(
        &self,
        image_path: &Path,
        page: usize,
    ) -> Result<String, ExtractError> {
        let text = self
            .recognizer
            .recognize(image_path, &self.config.language)
            .await
            .map_err(|err| err.on_page(page))?;
        let text = text.trim().to_owned();
        debug!(page, chars = text.chars().count(), "Recognized page");
        Ok(text)
    }
}

/// Delete a staged file. A failed delete is logged, but never changes the
/// outcome of the call that staged it.
fn close_staged(staged: TempPath) {
    let staged_path = staged.to_path_buf();
    if let Err(err) = staged.close() {
        warn!(
            path = %staged_path.display(),
            "failed to delete staged file: {}",
            err
        );
    }
}

/// Make sure `path` is an image we can decode. We decode all the pixel data,
/// because a truncated or corrupt file may still have a valid header.
fn decode_image(path: &Path) -> Result<DynamicImage, ExtractError> {
    image::ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| {
            ExtractError::invalid_document(path, format!("cannot read image: {err}"))
        })?
        .decode()
        .map_err(|err| {
            ExtractError::invalid_document(path, format!("cannot decode image: {err}"))
        })
}

/// Is `path` a TIFF with more than one frame?
fn has_more_tiff_frames(path: &Path) -> Result<bool, ExtractError> {
    if get_mime_type(path)? != TIFF_MIME_TYPE {
        return Ok(false);
    }
    let file = fs::File::open(path).map_err(|err| {
        ExtractError::invalid_document(path, format!("cannot read image: {err}"))
    })?;
    let decoder = tiff::decoder::Decoder::new(BufReader::new(file)).map_err(|err| {
        ExtractError::invalid_document(path, format!("cannot decode TIFF: {err}"))
    })?;
    Ok(decoder.more_images())
}

#[cfg(test)]
mod tests {
    use std::{
        fs,
        sync::{
            Mutex,
            atomic::{AtomicUsize, Ordering},
        },
    };

    use crate::{engines::PageImages, error::RecognizeError};

    use super::*;

    /// Page content that makes [`FakeRecognizer`] fail.
    const FAIL_PAGE: &str = "FAIL";

    /// Minimal bytes that sniff as a PDF.
    const FAKE_PDF: &[u8] = b"%PDF-1.4\n%fake\n";

    /// "Rasterizes" a PDF into text files, one per page, containing the text
    /// we want [`FakeRecognizer`] to see.
    struct FakeRasterizer {
        pages: Vec<&'static str>,
        dpis: Mutex<Vec<u32>>,
    }

    impl FakeRasterizer {
        fn new(pages: &[&'static str]) -> Arc<Self> {
            Arc::new(Self {
                pages: pages.to_vec(),
                dpis: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl Rasterizer for FakeRasterizer {
        async fn rasterize(
            &self,
            _pdf_path: &Path,
            dpi: NonZeroU32,
        ) -> Result<PageImages, ExtractError> {
            self.dpis.lock().unwrap().push(dpi.get());
            let tmpdir = tempfile::TempDir::with_prefix("fake-pages").unwrap();
            let paths = self
                .pages
                .iter()
                .enumerate()
                .map(|(idx, text)| {
                    let path = tmpdir.path().join(format!("page-{}.txt", idx + 1));
                    fs::write(&path, text).unwrap();
                    path
                })
                .collect();
            Ok(PageImages::in_tempdir(tmpdir, paths))
        }
    }

    /// Returns the text stored in a fake page, or `image_text` for real images.
    struct FakeRecognizer {
        image_text: &'static str,
        calls: AtomicUsize,
        seen: Mutex<Vec<PathBuf>>,
    }

    impl FakeRecognizer {
        fn new(image_text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                image_text,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl Recognizer for FakeRecognizer {
        async fn recognize(
            &self,
            image_path: &Path,
            language: &str,
        ) -> Result<String, RecognizeError> {
            assert_eq!(language, "tam");
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(image_path.to_owned());
            let bytes = fs::read(image_path).unwrap();
            if infer::is_image(&bytes) {
                // Multi-frame TIFFs should never reach the engine.
                if infer::get(&bytes).unwrap().mime_type() == TIFF_MIME_TYPE {
                    let decoder =
                        tiff::decoder::Decoder::new(std::io::Cursor::new(&bytes)).unwrap();
                    assert!(!decoder.more_images());
                }
                return Ok(self.image_text.to_owned());
            }
            let text = String::from_utf8(bytes).unwrap();
            if text == FAIL_PAGE {
                Err(RecognizeError::Failed("engine crashed".to_owned()))
            } else {
                Ok(text)
            }
        }
    }

    fn extractor(
        rasterizer: Arc<FakeRasterizer>,
        recognizer: Arc<FakeRecognizer>,
        staging_dir: Option<&Path>,
    ) -> Extractor {
        let config = RecognitionConfig {
            staging_dir: staging_dir.map(Path::to_owned),
            ..RecognitionConfig::default()
        };
        Extractor::with_engines(config, rasterizer, recognizer)
    }

    fn blank_png() -> Vec<u8> {
        let mut bytes = vec![];
        image::GrayImage::from_pixel(16, 16, image::Luma([255]))
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    /// Pixels that don't compress well, so a PNG's `IDAT` chunk is large.
    fn noisy_image(width: u32, height: u32) -> image::GrayImage {
        let mut state = 12345u32;
        image::GrayImage::from_fn(width, height, |_, _| {
            state = state.wrapping_mul(1_103_515_245).wrapping_add(12345);
            image::Luma([(state >> 16) as u8])
        })
    }

    /// A TIFF with one gray frame per entry in `shades`.
    fn multi_frame_tiff(shades: &[u8]) -> Vec<u8> {
        use tiff::encoder::{TiffEncoder, colortype::Gray8};

        let mut bytes = vec![];
        {
            let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut bytes)).unwrap();
            for &shade in shades {
                encoder.write_image::<Gray8>(8, 8, &[shade; 64]).unwrap();
            }
        }
        bytes
    }

    fn dir_is_empty(dir: &Path) -> bool {
        fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn pdf_pages_are_numbered_in_order_and_trimmed() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("tamil.pdf");
        fs::write(&pdf_path, FAKE_PDF).unwrap();

        let rasterizer = FakeRasterizer::new(&["  வணக்கம்\n", "உலகம்\n\x0c", " \n"]);
        let extractor = extractor(rasterizer, FakeRecognizer::new(""), None);
        let result = extractor.extract_from_pdf(&pdf_path, None).await.unwrap();
        assert_eq!(
            result.into_pairs(),
            vec![
                (1, "வணக்கம்".to_owned()),
                (2, "உலகம்".to_owned()),
                (3, "".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn pdf_dpi_defaults_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("doc.pdf");
        fs::write(&pdf_path, FAKE_PDF).unwrap();

        let rasterizer = FakeRasterizer::new(&["one"]);
        let extractor = extractor(rasterizer.clone(), FakeRecognizer::new(""), None);
        extractor.extract_from_pdf(&pdf_path, None).await.unwrap();
        extractor
            .extract_from_pdf(&pdf_path, NonZeroU32::new(150))
            .await
            .unwrap();
        assert_eq!(*rasterizer.dpis.lock().unwrap(), vec![300, 150]);
    }

    #[tokio::test]
    async fn page_failure_aborts_the_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("doc.pdf");
        fs::write(&pdf_path, FAKE_PDF).unwrap();

        let recognizer = FakeRecognizer::new("");
        let rasterizer = FakeRasterizer::new(&["one", FAIL_PAGE, "three"]);
        let extractor = extractor(rasterizer, recognizer.clone(), None);
        let err = extractor.extract_from_pdf(&pdf_path, None).await.unwrap_err();
        assert!(matches!(err, ExtractError::RecognitionFailure { page: 2, .. }));
        // We don't keep going after a failure.
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_pdfs_are_invalid() {
        let extractor = extractor(FakeRasterizer::new(&[]), FakeRecognizer::new(""), None);
        let err = extractor
            .extract_from_pdf(Path::new("/nonexistent/doc.pdf"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDocument { .. }));
    }

    #[tokio::test]
    async fn images_are_a_single_page() {
        let dir = tempfile::tempdir().unwrap();
        let jpeg_path = dir.path().join("blank.jpg");
        image::RgbImage::from_pixel(32, 32, image::Rgb([255, 255, 255]))
            .save(&jpeg_path)
            .unwrap();

        let extractor =
            extractor(FakeRasterizer::new(&[]), FakeRecognizer::new("\n \x0c"), None);
        let result = extractor.extract_from_image(&jpeg_path).await.unwrap();
        assert_eq!(result.into_pairs(), vec![(1, "".to_owned())]);
    }

    #[tokio::test]
    async fn undecodable_images_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();

        let recognizer = FakeRecognizer::new("text");
        let extractor = extractor(FakeRasterizer::new(&[]), recognizer.clone(), None);
        let err = extractor.extract_from_image(&path).await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDocument { .. }));
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn truncated_image_data_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.png");
        let mut bytes = vec![];
        noisy_image(64, 64)
            .write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        // Keep the signature and `IHDR`, but cut `IDAT` short and lose `IEND`.
        bytes.truncate(bytes.len() / 2);
        fs::write(&path, &bytes).unwrap();
        assert!(image::image_dimensions(&path).is_ok());

        let recognizer = FakeRecognizer::new("text");
        let extractor = extractor(FakeRasterizer::new(&[]), recognizer.clone(), None);
        let err = extractor.extract_from_image(&path).await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDocument { .. }));
        assert_eq!(recognizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn multi_frame_tiffs_use_only_the_first_frame() {
        let staging = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tiff");
        fs::write(&path, multi_frame_tiff(&[255, 0, 128])).unwrap();

        let recognizer = FakeRecognizer::new("first frame");
        let extractor =
            extractor(FakeRasterizer::new(&[]), recognizer.clone(), Some(staging.path()));
        let result = extractor.extract_from_image(&path).await.unwrap();
        assert_eq!(result.into_pairs(), vec![(1, "first frame".to_owned())]);

        let seen = recognizer.seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 1);
        assert_ne!(seen[0], path);
        assert_eq!(seen[0].extension().unwrap(), "png");
        assert!(dir_is_empty(staging.path()));
    }

    #[tokio::test]
    async fn single_frame_tiffs_are_ocred_directly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.tiff");
        fs::write(&path, multi_frame_tiff(&[255])).unwrap();

        let recognizer = FakeRecognizer::new("only frame");
        let extractor = extractor(FakeRasterizer::new(&[]), recognizer.clone(), None);
        extractor.extract_from_image(&path).await.unwrap();
        assert_eq!(*recognizer.seen.lock().unwrap(), vec![path]);
    }

    #[tokio::test]
    async fn bytes_match_path_based_extraction() {
        let staging = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let rasterizer = FakeRasterizer::new(&["first", "", "third"]);
        let extractor =
            extractor(rasterizer, FakeRecognizer::new("image text"), Some(staging.path()));

        let pdf_path = dir.path().join("doc.pdf");
        fs::write(&pdf_path, FAKE_PDF).unwrap();
        assert_eq!(
            extractor.extract_from_bytes(FAKE_PDF, "pdf").await.unwrap(),
            extractor.extract_from_pdf(&pdf_path, None).await.unwrap(),
        );

        let png = blank_png();
        let png_path = dir.path().join("page.png");
        fs::write(&png_path, &png).unwrap();
        assert_eq!(
            extractor.extract_from_bytes(&png, "png").await.unwrap(),
            extractor.extract_from_image(&png_path).await.unwrap(),
        );

        assert!(dir_is_empty(staging.path()));
    }

    #[tokio::test]
    async fn corrupt_pdf_bytes_are_invalid_and_cleaned_up() {
        let staging = tempfile::tempdir().unwrap();
        let extractor = extractor(
            FakeRasterizer::new(&["never"]),
            FakeRecognizer::new(""),
            Some(staging.path()),
        );
        let err = extractor
            .extract_from_bytes(b"this is not a pdf", "pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDocument { .. }));
        assert!(dir_is_empty(staging.path()));
    }

    #[tokio::test]
    async fn recognition_failures_are_cleaned_up() {
        let staging = tempfile::tempdir().unwrap();
        let extractor = extractor(
            FakeRasterizer::new(&[FAIL_PAGE]),
            FakeRecognizer::new(""),
            Some(staging.path()),
        );
        let err = extractor.extract_from_bytes(FAKE_PDF, "pdf").await.unwrap_err();
        assert!(matches!(err, ExtractError::RecognitionFailure { page: 1, .. }));
        assert!(dir_is_empty(staging.path()));
    }

    #[tokio::test]
    async fn unknown_file_types_are_rejected_before_staging() {
        let staging = tempfile::tempdir().unwrap();
        let extractor = extractor(
            FakeRasterizer::new(&[]),
            FakeRecognizer::new(""),
            Some(staging.path()),
        );
        let err = extractor.extract_from_bytes(b"hello", "docx").await.unwrap_err();
        assert!(matches!(err, ExtractError::InvalidDocument { .. }));
        assert!(dir_is_empty(staging.path()));
    }

    #[tokio::test]
    async fn missing_staging_dir_is_a_staging_failure() {
        let extractor = extractor(
            FakeRasterizer::new(&[]),
            FakeRecognizer::new(""),
            Some(Path::new("/nonexistent/staging")),
        );
        let err = extractor.extract_from_bytes(FAKE_PDF, "pdf").await.unwrap_err();
        assert!(matches!(
            err,
            ExtractError::StagingFailure {
                action: "create",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn extract_dispatches_on_document_kind() {
        let extractor = extractor(
            FakeRasterizer::new(&["a", "b"]),
            FakeRecognizer::new("img"),
            None,
        );
        let document = Document::Bytes {
            data: FAKE_PDF.to_vec(),
            file_type: FileType::Pdf,
        };
        assert_eq!(extractor.extract(&document).await.unwrap().pages.len(), 2);

        let document = Document::Bytes {
            data: blank_png(),
            file_type: FileType::parse("png").unwrap(),
        };
        assert_eq!(
            extractor.extract(&document).await.unwrap().into_pairs(),
            vec![(1, "img".to_owned())]
        );
    }

    #[tokio::test]
    async fn misconfigured_tesseract_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("page.png");
        fs::write(&png_path, blank_png()).unwrap();

        let extractor = Extractor::new(RecognitionConfig {
            tesseract_cmd: PathBuf::from("/nonexistent/bin/tesseract"),
            ..RecognitionConfig::default()
        });
        let err = extractor.extract_from_image(&png_path).await.unwrap_err();
        assert!(matches!(err, ExtractError::EngineUnavailable { .. }));
    }

    #[test]
    fn results_serialize_as_page_records() {
        let result = ExtractionResult {
            pages: vec![PageText {
                page: 1,
                text: "வணக்கம்".to_owned(),
            }],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, serde_json::json!([{ "page": 1, "text": "வணக்கம்" }]));
    }
}
