//! The `ocr` subcommand.

use clap::Args;
use tokio::io::AsyncReadExt as _;

use page_ocr::{Document, Extractor, FileType, RecognitionConfig, prelude::*};

use crate::ui::{ProgressConfig, Ui};

use super::write_jsonl;

/// OCR command line arguments.
#[derive(Debug, Args)]
pub struct OcrOpts {
    /// A PDF or image to OCR. Use `-` or leave this out to read from standard
    /// input, in which case `--file-type` is required.
    pub input_path: Option<PathBuf>,

    /// The type of the input data: `pdf`, or an image extension like `png`.
    /// Only used for standard input; files are detected from their contents.
    #[clap(long)]
    pub file_type: Option<String>,

    #[clap(flatten)]
    pub config: RecognitionConfig,

    /// Output location, for JSONL output with one record per page. Defaults to
    /// standard output.
    #[clap(short = 'o', long = "out")]
    pub output_path: Option<PathBuf>,
}

impl OcrOpts {
    /// The input path, unless we're reading from standard input.
    fn input_file(&self) -> Option<&Path> {
        self.input_path
            .as_deref()
            .filter(|path| *path != Path::new("-"))
    }
}

/// The `ocr` subcommand.
#[instrument(level = "debug", skip_all)]
pub async fn cmd_ocr(ui: Ui, opts: &OcrOpts) -> Result<()> {
    let document = match opts.input_file() {
        Some(path) => Document::from_path(path)?,
        None => {
            let file_type = opts
                .file_type
                .as_deref()
                .ok_or_else(|| anyhow!("--file-type is required when reading stdin"))?;
            let file_type = FileType::parse(file_type)?;
            let mut data = vec![];
            tokio::io::stdin()
                .read_to_end(&mut data)
                .await
                .context("failed to read standard input")?;
            Document::Bytes { data, file_type }
        }
    };
    if let (Some(path), Some(file_type)) = (opts.input_file(), &opts.file_type) {
        warn!(
            path = %path.display(),
            file_type = %file_type,
            "Ignoring --file-type for file input; detecting type from contents"
        );
    }
    debug!(
        kind = document_kind(&document),
        language = %opts.config.language,
        "Starting extraction"
    );

    let spinner = ui.new_spinner(&ProgressConfig {
        emoji: "📄",
        msg: "OCRing document",
        done_msg: "OCR stopped",
    });
    let extractor = Extractor::new(opts.config.clone());
    let result = extractor
        .extract(&document)
        .await
        .context("failed to extract text")?;
    spinner.finish_with_message(format!("OCRed {} pages", result.pages.len()));

    write_jsonl(opts.output_path.as_deref(), &result.pages).await
}

/// A short description of a document, for logging.
fn document_kind(document: &Document) -> &'static str {
    match document {
        Document::PdfPath(_) => "pdf",
        Document::ImagePath(_) => "image",
        Document::Bytes {
            file_type: FileType::Pdf,
            ..
        } => "pdf bytes",
        Document::Bytes { .. } => "image bytes",
    }
}
