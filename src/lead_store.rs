use crate::errors::AppError;
use crate::models::{LeadRecord, LEAD_RECORD_HEADER};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Append-only CSV store of qualifying leads.
///
/// The handle only holds the path. Each append opens, writes one row and
/// closes the file. Concurrent appends are not serialised against each
/// other; relative row order across requests is undefined.
#[derive(Debug, Clone)]
pub struct LeadStore {
    path: PathBuf,
}

impl LeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the file with its header row if it does not exist yet.
    pub async fn init(&self) -> Result<(), AppError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), AppError> {
            if write_rows(&path, None)? {
                tracing::info!("Created lead store at {}", path.display());
            }
            Ok(())
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Lead store task failed: {}", e)))?
    }

    /// Appends one record, writing the header first if the file was missing.
    pub async fn append(&self, record: LeadRecord) -> Result<(), AppError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), AppError> {
            write_rows(&path, Some(&record))?;
            tracing::info!(
                "Stored lead '{}' with score {} in {}",
                record.company,
                record.score,
                path.display()
            );
            Ok(())
        })
        .await
        .map_err(|e| AppError::InternalError(format!("Lead store task failed: {}", e)))?
    }
}

/// Writes `record` (if any) to the store at `path`. Returns whether the file
/// was created by this call.
///
/// A missing file is published in one step: header and record are staged in
/// a temporary file next to `path` and linked into place without clobbering,
/// so no reader or concurrent appender ever sees the file without its header.
/// An existing file gets the encoded row in a single append write.
fn write_rows(path: &Path, record: Option<&LeadRecord>) -> Result<bool, AppError> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            std::fs::create_dir_all(parent)?;
            parent.to_path_buf()
        }
        None => PathBuf::from("."),
    };

    if !path.exists() {
        let mut staged = tempfile::NamedTempFile::new_in(&dir)?;
        staged.write_all(&encode(true, record)?)?;
        staged.flush()?;
        match staged.persist_noclobber(path) {
            Ok(_) => return Ok(true),
            // Another writer created it first; append below like any other row.
            Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => return Err(e.error.into()),
        }
    }

    if let Some(record) = record {
        let bytes = encode(false, Some(record))?;
        let mut file = OpenOptions::new().append(true).open(path)?;
        file.write_all(&bytes)?;
    }
    Ok(false)
}

/// Encodes the optional header row and record as CSV bytes.
fn encode(header: bool, record: Option<&LeadRecord>) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    if header {
        writer.write_record(LEAD_RECORD_HEADER)?;
    }
    if let Some(record) = record {
        writer.serialize(record)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Storage(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(company: &str, score: i64) -> LeadRecord {
        LeadRecord {
            timestamp: "2026-10-16T09:30:00.000000Z".to_string(),
            title: "CTO".to_string(),
            company: company.to_string(),
            industry: "Retail".to_string(),
            website: "https://shop.example".to_string(),
            score,
            reason: "Fits, but \"budget\" unclear, maybe".to_string(),
            goals_summary: "Wants to expand online.\nSecond line.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_init_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadStore::new(dir.path().join("leads.csv"));

        store.init().await.unwrap();
        store.init().await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(
            content,
            "timestamp,title,company,industry,website,score,reason,goals_summary\n"
        );
    }

    #[tokio::test]
    async fn test_init_keeps_existing_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.csv");
        std::fs::write(&path, "timestamp,title\nold,row\n").unwrap();

        LeadStore::new(&path).init().await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "timestamp,title\nold,row\n"
        );
    }

    #[tokio::test]
    async fn test_append_creates_parent_dirs_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadStore::new(dir.path().join("data/nested/leads.csv"));

        store.append(record("Acme", 80)).await.unwrap();

        let mut reader = csv::Reader::from_path(store.path()).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), LEAD_RECORD_HEADER.to_vec());
        let rows: Vec<LeadRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, vec![record("Acme", 80)]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_appends_to_missing_file_keep_header_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadStore::new(dir.path().join("leads.csv"));

        let mut handles = vec![];
        for i in 0..32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.append(record(&format!("Co {}", i), i)).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let content = std::fs::read_to_string(store.path()).unwrap();
        let header = "timestamp,title,company,industry,website,score,reason,goals_summary\n";
        assert!(content.starts_with(header));
        assert_eq!(content.matches(header).count(), 1);

        let mut reader = csv::Reader::from_path(store.path()).unwrap();
        let mut scores: Vec<i64> = reader
            .deserialize::<LeadRecord>()
            .map(|r| r.unwrap().score)
            .collect();
        scores.sort();
        assert_eq!(scores, (0..32).collect::<Vec<i64>>());
    }

    #[tokio::test]
    async fn test_no_staging_files_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadStore::new(dir.path().join("leads.csv"));

        store.append(record("Acme", 80)).await.unwrap();
        store.append(record("Globex", 20)).await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_append_quotes_commas_quotes_and_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let store = LeadStore::new(dir.path().join("leads.csv"));
        store.init().await.unwrap();

        store.append(record("Acme, Inc.", 91)).await.unwrap();
        store.append(record("Globex", 12)).await.unwrap();

        let mut reader = csv::Reader::from_path(store.path()).unwrap();
        let rows: Vec<LeadRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], record("Acme, Inc.", 91));
        assert_eq!(rows[1].company, "Globex");
        assert_eq!(rows[1].goals_summary, "Wants to expand online.\nSecond line.");
    }
}
