//! [`WorkbookSource`]: the spreadsheet implementation of [`DatasetSource`].

use std::{
  io::Cursor,
  path::{Path, PathBuf},
  sync::Arc,
  time::SystemTime,
};

use calamine::{Reader as _, open_workbook_auto_from_rs};
use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tracing::{debug, info};
use trialwatch_core::{
  dataset::{Datasets, Snapshot},
  source::DatasetSource,
};

use crate::{
  Error, Result,
  decode::{self, Sheet},
};

// ─── File set ────────────────────────────────────────────────────────────────

/// Locations of the four oversight workbooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
  pub subjects:  PathBuf,
  pub sites:     PathBuf,
  pub countries: PathBuf,
  pub regions:   PathBuf,
}

impl DataFiles {
  pub const SUBJECTS: &'static str = "interim_unified_subject.xlsx";
  pub const SITES: &'static str = "Site_Oversight_Final_Report.xlsx";
  pub const COUNTRIES: &'static str = "interim_unified_country.xlsx";
  pub const REGIONS: &'static str = "interim_unified_region.xlsx";

  /// The default file names inside `dir`.
  pub fn in_dir(dir: impl AsRef<Path>) -> Self {
    let dir = dir.as_ref();
    Self {
      subjects:  dir.join(Self::SUBJECTS),
      sites:     dir.join(Self::SITES),
      countries: dir.join(Self::COUNTRIES),
      regions:   dir.join(Self::REGIONS),
    }
  }

  fn all(&self) -> [&Path; 4] {
    [&self.subjects, &self.sites, &self.countries, &self.regions]
  }
}

// ─── Cache key ───────────────────────────────────────────────────────────────

/// What a file looked like on disk when it was last read.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FileStamp {
  modified: SystemTime,
  len:      u64,
}

async fn stamp(path: &Path) -> Result<FileStamp> {
  let meta = tokio::fs::metadata(path).await.map_err(|source| {
    if source.kind() == std::io::ErrorKind::NotFound {
      Error::Missing(path.to_path_buf())
    } else {
      Error::Io { path: path.to_path_buf(), source }
    }
  })?;
  let modified = meta
    .modified()
    .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
  Ok(FileStamp { modified, len: meta.len() })
}

struct Cached {
  stamps:   Vec<FileStamp>,
  snapshot: Arc<Snapshot>,
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// Oversight datasets read from `.xlsx` workbooks, memoized per file stamp.
///
/// Cloning is cheap; clones share one cache.
#[derive(Clone)]
pub struct WorkbookSource {
  files: Arc<DataFiles>,
  cache: Arc<Mutex<Option<Cached>>>,
}

impl WorkbookSource {
  pub fn new(files: DataFiles) -> Self {
    Self { files: Arc::new(files), cache: Arc::new(Mutex::new(None)) }
  }

  pub fn files(&self) -> &DataFiles { &self.files }

  async fn stamps(&self) -> Result<Vec<FileStamp>> {
    let mut stamps = Vec::with_capacity(4);
    for path in self.files.all() {
      stamps.push(stamp(path).await?);
    }
    Ok(stamps)
  }
}

impl DatasetSource for WorkbookSource {
  type Error = Error;

  async fn load(&self) -> Result<Arc<Snapshot>> {
    // Held across the read so concurrent callers wait for one load.
    let mut cache = self.cache.lock().await;
    let stamps = self.stamps().await?;

    if let Some(cached) = cache.as_ref()
      && cached.stamps == stamps
    {
      debug!(version = %cached.snapshot.version, "reusing cached datasets");
      return Ok(Arc::clone(&cached.snapshot));
    }

    let files = Arc::clone(&self.files);
    let snapshot = Arc::new(tokio::task::spawn_blocking(move || read_snapshot(&files)).await??);
    info!(
      version = %snapshot.version,
      subjects = snapshot.datasets.subjects.len(),
      sites = snapshot.datasets.sites.len(),
      countries = snapshot.datasets.countries.len(),
      regions = snapshot.datasets.regions.len(),
      "loaded datasets"
    );

    *cache = Some(Cached { stamps, snapshot: Arc::clone(&snapshot) });
    Ok(snapshot)
  }

  async fn invalidate(&self) {
    if self.cache.lock().await.take().is_some() {
      debug!("dataset cache invalidated");
    }
  }
}

// ─── Blocking reads ──────────────────────────────────────────────────────────

fn read_sheet(path: &Path, hasher: &mut Sha256) -> Result<Sheet> {
  let bytes = std::fs::read(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
  hasher.update(&bytes);
  decode_sheet(path, bytes)
}

/// Decode the first worksheet of an in-memory workbook. `path` only labels
/// errors; the file is not reopened, so the decoded rows always match the
/// hashed bytes.
pub(crate) fn decode_sheet(path: &Path, bytes: Vec<u8>) -> Result<Sheet> {
  let workbook_err = |source: calamine::Error| Error::Workbook { path: path.to_path_buf(), source };
  let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(workbook_err)?;
  let first = workbook
    .sheet_names()
    .first()
    .cloned()
    .ok_or_else(|| Error::NoWorksheet(path.to_path_buf()))?;
  let range = workbook.worksheet_range(&first).map_err(workbook_err)?;
  Ok(Sheet::from_range(path, &range))
}

fn read_snapshot(files: &DataFiles) -> Result<Snapshot> {
  let mut hasher = Sha256::new();
  let subjects = decode::subjects(&read_sheet(&files.subjects, &mut hasher)?)?;
  let sites = decode::sites(&read_sheet(&files.sites, &mut hasher)?)?;
  let countries = decode::countries(&read_sheet(&files.countries, &mut hasher)?)?;
  let regions = decode::regions(&read_sheet(&files.regions, &mut hasher)?)?;

  Ok(Snapshot {
    datasets:  Datasets::assemble(subjects, sites, countries, regions),
    version:   hex::encode(hasher.finalize()),
    loaded_at: Utc::now(),
  })
}
