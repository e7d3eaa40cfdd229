//! PDF rasterization using Poppler's `pdfinfo` and `pdftocairo` CLI tools.

use std::{collections::BTreeMap, num::NonZeroU32};

use tokio::process::Command;

use crate::{
    command::{check_for_command_failure, is_error_line, run_command},
    error::ExtractError,
    prelude::*,
};

use super::{PageImages, Rasterizer};

/// Name used for the output files. `pdftocairo` appends `-<page>.png`.
const OUTPUT_STEM: &str = "page";

/// Rasterizer wrapping `pdftocairo` from `poppler-utils`.
pub struct PopplerRasterizer {
    /// Path to `pdftocairo`.
    pdftocairo_cmd: PathBuf,
    /// Path to `pdfinfo`.
    pdfinfo_cmd: PathBuf,
}

impl PopplerRasterizer {
    /// Create a new Poppler rasterizer.
    pub fn new(pdftocairo_cmd: PathBuf, pdfinfo_cmd: PathBuf) -> Self {
        Self {
            pdftocairo_cmd,
            pdfinfo_cmd,
        }
    }

    /// Get the number of pages in a PDF file.
    #[instrument(level = "debug", skip_all, fields(path = %path.display()))]
    pub async fn page_count(&self, path: &Path) -> Result<usize, ExtractError> {
        let mut cmd = Command::new(&self.pdfinfo_cmd);
        cmd.arg(path);
        let output = run_command("pdfinfo", &self.pdfinfo_cmd, &mut cmd).await?;
        check_for_command_failure("pdfinfo", &output, None).map_err(|err| {
            ExtractError::invalid_document(path, format!("{err:#}"))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_pdfinfo_page_count(&stdout)
            .map_err(|err| ExtractError::invalid_document(path, format!("{err:#}")))
    }
}

#[async_trait]
impl Rasterizer for PopplerRasterizer {
    #[instrument(level = "debug", skip_all, fields(path = %pdf_path.display(), dpi = dpi.get()))]
    async fn rasterize(
        &self,
        pdf_path: &Path,
        dpi: NonZeroU32,
    ) -> Result<PageImages, ExtractError> {
        let total_pages = self.page_count(pdf_path).await?;

        // Create a temporary directory to hold the PNG files.
        let tmpdir = tempfile::TempDir::with_prefix("pages").map_err(|err| {
            ExtractError::EngineUnavailable {
                engine: "pdftocairo".to_owned(),
                reason: format!("cannot create output directory: {err}"),
            }
        })?;

        // Run pdftocairo to convert the PDF to PNG files, one per page.
        let out_path = tmpdir.path().join(OUTPUT_STEM);
        let mut cmd = Command::new(&self.pdftocairo_cmd);
        cmd.arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg(pdf_path)
            .arg(&out_path);
        let output = run_command("pdftocairo", &self.pdftocairo_cmd, &mut cmd).await?;
        check_for_command_failure("pdftocairo", &output, Some(&is_error_line)).map_err(
            |err| ExtractError::invalid_document(pdf_path, format!("{err:#}")),
        )?;

        let paths = page_files_in_order(tmpdir.path()).map_err(|err| {
            ExtractError::invalid_document(pdf_path, format!("{err:#}"))
        })?;
        check_page_count(pdf_path, paths.len(), total_pages)?;
        debug!(pages = paths.len(), "Rasterized PDF");
        Ok(PageImages::in_tempdir(tmpdir, paths))
    }
}

/// Parse the `Pages:` field out of `pdfinfo` output.
fn parse_pdfinfo_page_count(output: &str) -> Result<usize> {
    let mut properties = BTreeMap::new();
    for line in output.lines() {
        let mut parts = line.splitn(2, ':');
        let key = parts.next().unwrap_or("").trim();
        let value = parts.next().unwrap_or("").trim();
        properties.insert(key, value);
    }

    let page_count_str = properties
        .get("Pages")
        .ok_or_else(|| anyhow!("failed to find page count in pdfinfo output"))?;
    page_count_str
        .parse::<usize>()
        .with_context(|| format!("failed to parse page count {:?}", page_count_str))
}

/// Make sure `pdftocairo` rendered as many pages as `pdfinfo` says there are.
fn check_page_count(
    pdf_path: &Path,
    rendered: usize,
    expected: usize,
) -> Result<(), ExtractError> {
    if rendered == expected {
        Ok(())
    } else {
        Err(ExtractError::invalid_document(
            pdf_path,
            format!("pdftocairo produced {rendered} pages, but pdfinfo reported {expected}"),
        ))
    }
}

/// Get the page number `pdftocairo` encoded in an output file name.
///
/// Files look like `page-7.png`, or `page-007.png` once there are enough pages
/// to need padding.
fn page_number_from_file_name(file_name: &str) -> Option<usize> {
    let stem = file_name.strip_suffix(".png")?;
    let (_, digits) = stem.rsplit_once('-')?;
    digits.parse().ok()
}

/// List the PNG files in `dir`, ordered by page number.
fn page_files_in_order(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages = dir
        .read_dir()
        .with_context(|| {
            format!("failed to read temporary directory {:?}", dir.display())
        })?
        .map(|entry| {
            let entry = entry.with_context(|| {
                format!("failed to read entry in temporary directory {:?}", dir.display())
            })?;
            let path = entry.path();
            let page = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(page_number_from_file_name)
                .ok_or_else(|| anyhow!("unexpected output file {:?}", path.display()))?;
            Ok((page, path))
        })
        .collect::<Result<Vec<_>>>()?;
    pages.sort();
    Ok(pages.into_iter().map(|(_, path)| path).collect())
}
