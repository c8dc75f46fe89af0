//! CSV file implementation of the record store

use crate::storage::schema::{ensure_store_file, open_for_append, FAILED_HEADER, MOVIES_HEADER};
use crate::storage::traits::{RecordStore, StorageError, StorageResult};
use crate::storage::{FailedRecord, MovieRecord};
use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const MOVIE_FIELDS: usize = 3;
const FAILED_FIELDS: usize = 2;

/// Record store backed by two CSV files
#[derive(Debug, Clone)]
pub struct CsvStore {
    movies_path: PathBuf,
    failed_path: PathBuf,
}

impl CsvStore {
    /// Creates a store over the given files
    ///
    /// Nothing is touched on disk until [`RecordStore::init`] or a write.
    pub fn new(movies_path: impl Into<PathBuf>, failed_path: impl Into<PathBuf>) -> Self {
        Self {
            movies_path: movies_path.into(),
            failed_path: failed_path.into(),
        }
    }

    pub fn movies_path(&self) -> &Path {
        &self.movies_path
    }

    pub fn failed_path(&self) -> &Path {
        &self.failed_path
    }
}

impl RecordStore for CsvStore {
    fn init(&self) -> StorageResult<()> {
        if ensure_store_file(&self.movies_path, MOVIES_HEADER)? {
            tracing::info!("Created {}", self.movies_path.display());
        }
        if ensure_store_file(&self.failed_path, FAILED_HEADER)? {
            tracing::info!("Created {}", self.failed_path.display());
        }
        Ok(())
    }

    fn read_movies(&self) -> StorageResult<Vec<MovieRecord>> {
        read_rows(&self.movies_path, MOVIE_FIELDS, |row| MovieRecord {
            title: field(row, 0),
            detail_url: field(row, 1),
            download_link: Some(field(row, 2)).filter(|link| !link.is_empty()),
        })
    }

    fn append_movies(&self, records: &[MovieRecord]) -> StorageResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        ensure_store_file(&self.movies_path, MOVIES_HEADER)?;
        let file = open_for_append(&self.movies_path)?;
        write_rows(&self.movies_path, file, records.iter().map(movie_row))?;
        Ok(())
    }

    fn rewrite_movies(&self, records: &[MovieRecord]) -> StorageResult<()> {
        let dir = self
            .movies_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir)?;
        writeln!(tmp, "{}", MOVIES_HEADER)?;
        let mut tmp = write_rows(&self.movies_path, tmp, records.iter().map(movie_row))?;
        tmp.flush()?;

        // Temporary files are created owner-only; keep the store's mode
        if let Ok(meta) = std::fs::metadata(&self.movies_path) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.as_file().sync_all()?;

        tmp.persist(&self.movies_path)
            .map_err(|e| StorageError::Persist {
                path: self.movies_path.clone(),
                source: e.error,
            })?;

        tracing::debug!(
            "Rewrote {} with {} records",
            self.movies_path.display(),
            records.len()
        );
        Ok(())
    }

    fn read_failed(&self) -> StorageResult<Vec<FailedRecord>> {
        read_rows(&self.failed_path, FAILED_FIELDS, |row| FailedRecord {
            title: field(row, 0),
            detail_url: field(row, 1),
        })
    }

    fn append_failed(&self, record: &FailedRecord) -> StorageResult<()> {
        ensure_store_file(&self.failed_path, FAILED_HEADER)?;
        let file = open_for_append(&self.failed_path)?;
        let row = [record.title.as_str(), record.detail_url.as_str()];
        write_rows(&self.failed_path, file, std::iter::once(row))?;
        Ok(())
    }
}

fn movie_row(record: &MovieRecord) -> [&str; 3] {
    [
        record.title.as_str(),
        record.detail_url.as_str(),
        record.download_link.as_deref().unwrap_or(""),
    ]
}

/// Field `index` of a row, or empty if the row is short
fn field(row: &StringRecord, index: usize) -> String {
    row.get(index).unwrap_or("").to_string()
}

/// Reads all data rows of a store file; a missing file reads as empty
///
/// Rows are read flexibly so short or over-long historical lines are kept
/// rather than rejected. Rows that are not `width` fields wide are logged,
/// since fields past `width` are not carried into the record.
fn read_rows<T>(
    path: &Path,
    width: usize,
    map: impl Fn(&StringRecord) -> T,
) -> StorageResult<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let csv_error = |source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result.map_err(csv_error)?;
        if row.len() != width {
            tracing::warn!(
                "{} line {}: expected {} fields, found {}",
                path.display(),
                row.position().map_or(0, |pos| pos.line()),
                width,
                row.len()
            );
        }
        rows.push(map(&row));
    }

    Ok(rows)
}

/// Writes fully-quoted, `\n`-terminated rows and hands the writer back
fn write_rows<W, R>(path: &Path, out: W, rows: impl IntoIterator<Item = R>) -> StorageResult<W>
where
    W: Write,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    for row in rows {
        writer.write_record(row).map_err(|source| StorageError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| StorageError::Io(std::io::Error::new(e.error().kind(), e.error().to_string())))
}
