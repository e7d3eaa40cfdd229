//! Command-line entry points.

use tokio::{
    fs::File,
    io::{AsyncWrite, AsyncWriteExt as _, BufWriter},
};

use page_ocr::prelude::*;

pub mod ocr;
pub mod schema;

/// Create an [`AsyncWrite`] for a file or stdout.
pub async fn create_writer(
    path: Option<&Path>,
) -> Result<Box<dyn AsyncWrite + Unpin + Send + Sync + 'static>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .await
                .with_context(|| format!("Failed to create file at path: {:?}", path))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(tokio::io::stdout())),
    }
}

/// Write records as JSONL to either standard output or a file.
pub async fn write_jsonl<T: Serialize>(path: Option<&Path>, records: &[T]) -> Result<()> {
    let mut writer = BufWriter::new(create_writer(path).await?);
    for record in records {
        let json = serde_json::to_string(record).context("Failed to serialize record")?;
        writer
            .write_all(json.as_bytes())
            .await
            .context("Failed to write JSON to output")?;
        writer
            .write_all(b"\n")
            .await
            .context("Failed to write newline to output")?;
    }
    writer.flush().await.context("Failed to flush output")?;
    Ok(())
}
