//! File intake: raw selections in, fully materialized byte buffers out.
//!
//! Every selection in a batch is read concurrently and the batch completes
//! only when all reads have resolved. The first failing read aborts the whole
//! batch. No validation happens here.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use futures::future::try_join_all;

use docdesk_core::{AppError, IntakeBatchId, IntakeTag};

/// One file picked by the user.
#[derive(Debug, Clone)]
pub enum FileSelection {
    /// A file on disk; the filename is its last path component.
    Path(PathBuf),
    /// A file already in memory (e.g. handed over by an embedding UI).
    Memory { name: String, content: Bytes },
}

impl FileSelection {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        FileSelection::Path(path.into())
    }

    pub fn memory(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        FileSelection::Memory {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Name the file will carry through validation and upload.
    pub fn filename(&self) -> Result<String, AppError> {
        match self {
            FileSelection::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    AppError::InvalidInput(format!("Not a file path: {}", path.display()))
                }),
            FileSelection::Memory { name, .. } => Ok(name.clone()),
        }
    }
}

/// One read file, tagged with where it came from.
#[derive(Debug, Clone)]
pub struct IntakeRecord {
    pub tag: IntakeTag,
    pub filename: String,
    pub content: Bytes,
}

/// Result of one intake call, in selection order.
#[derive(Debug, Clone)]
pub struct IntakeBatch {
    pub id: IntakeBatchId,
    pub records: Vec<IntakeRecord>,
}

/// Reads selections and hands out a fresh generation number per call.
#[derive(Debug, Default)]
pub struct FileIntake {
    last_batch: AtomicU64,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve the next generation number. Numbers start at 1 and only grow.
    pub fn next_batch_id(&self) -> IntakeBatchId {
        IntakeBatchId(self.last_batch.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub async fn read(&self, selections: Vec<FileSelection>) -> Result<IntakeBatch, AppError> {
        let batch = self.next_batch_id();
        read_selection(batch, selections).await
    }
}

async fn read_one(
    batch: IntakeBatchId,
    position: usize,
    selection: FileSelection,
) -> Result<IntakeRecord, AppError> {
    let filename = selection.filename()?;
    let content = match selection {
        FileSelection::Path(path) => tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|source| AppError::FileRead {
                filename: filename.clone(),
                source,
            })?,
        FileSelection::Memory { content, .. } => content,
    };

    Ok(IntakeRecord {
        tag: IntakeTag { batch, position },
        filename,
        content,
    })
}

/// Read all selections concurrently under one generation number.
pub async fn read_selection(
    batch: IntakeBatchId,
    selections: Vec<FileSelection>,
) -> Result<IntakeBatch, AppError> {
    let count = selections.len();
    tracing::debug!(batch = batch.0, count, "Reading selected files");

    let reads = selections
        .into_iter()
        .enumerate()
        .map(|(position, selection)| read_one(batch, position, selection));

    let records = try_join_all(reads).await.map_err(|e| {
        tracing::warn!(batch = batch.0, error = %e, "File intake aborted");
        e
    })?;

    tracing::info!(
        batch = batch.0,
        count,
        total_bytes = records.iter().map(|r| r.content.len()).sum::<usize>(),
        "Files read"
    );

    Ok(IntakeBatch { id: batch, records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[tokio::test]
    async fn test_reads_files_in_selection_order() {
        let dir = tempfile::tempdir().unwrap();
        let big = vec![b'x'; 256 * 1024];
        let a = write_file(&dir, "a.pdf", &big);
        let b = write_file(&dir, "b.txt", b"small");
        let c = write_file(&dir, "c", b"");

        let intake = FileIntake::new();
        let batch = intake
            .read(vec![
                FileSelection::path(&a),
                FileSelection::path(&b),
                FileSelection::path(&c),
            ])
            .await
            .unwrap();

        let names: Vec<_> = batch.records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["a.pdf", "b.txt", "c"]);
        assert_eq!(batch.records[0].content.len(), 256 * 1024);
        assert_eq!(&batch.records[1].content[..], b"small");
        assert!(batch.records[2].content.is_empty());
        let positions: Vec<_> = batch.records.iter().map(|r| r.tag.position).collect();
        assert_eq!(positions, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_duplicate_names_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(&dir, "a.pdf", b"1");

        let batch = FileIntake::new()
            .read(vec![FileSelection::path(&a), FileSelection::path(&a)])
            .await
            .unwrap();
        assert_eq!(batch.records.len(), 2);
    }

    #[tokio::test]
    async fn test_one_unreadable_file_aborts_batch() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(&dir, "a.pdf", b"1");
        let missing = dir.path().join("missing.pdf");

        let err = FileIntake::new()
            .read(vec![FileSelection::path(&a), FileSelection::path(&missing)])
            .await
            .unwrap_err();

        match err {
            AppError::FileRead { filename, .. } => assert_eq!(filename, "missing.pdf"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_selection() {
        let batch = FileIntake::new().read(Vec::new()).await.unwrap();
        assert!(batch.records.is_empty());
    }

    #[test]
    fn test_memory_selection() {
        let batch = tokio_test::block_on(read_selection(
            IntakeBatchId(9),
            vec![FileSelection::memory("notes.md", "# hi")],
        ))
        .unwrap();
        assert_eq!(batch.id, IntakeBatchId(9));
        assert_eq!(batch.records[0].filename, "notes.md");
        assert_eq!(batch.records[0].tag.batch, IntakeBatchId(9));
    }

    #[test]
    fn test_batch_ids_increase() {
        let intake = FileIntake::new();
        assert_eq!(intake.next_batch_id(), IntakeBatchId(1));
        assert_eq!(intake.next_batch_id(), IntakeBatchId(2));
    }

    #[test]
    fn test_path_without_file_name_is_invalid() {
        assert!(matches!(
            FileSelection::path("/").filename(),
            Err(AppError::InvalidInput(_))
        ));
    }
}
