//! Question Record Sources
//!
//! Loading is the only asynchronous step of a session: records are fetched
//! once, validated, and handed to the coach. The delimited text format has a
//! header row naming the columns; see [`parse_records`].

use crate::record::QuestionRecord;
use async_trait::async_trait;
use csv::StringRecord;
use std::path::PathBuf;
use tracing::{debug, info};

/// Errors raised while fetching or parsing question records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {0}: {1}")]
    Io(String, #[source] std::io::Error),
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP error! status: {0}")]
    Http(reqwest::StatusCode),
    #[error("Malformed question file: {0}")]
    Csv(#[from] csv::Error),
    #[error("Question file is missing the required '{0}' column")]
    MissingColumn(&'static str),
    #[error("Question file is empty or malformed")]
    Empty,
}

/// Anything that can supply the full set of question records for a session.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Loads every record the source holds.
    ///
    /// Sources are read once per process; the records are kept by the caller
    /// and rebuilt into a fresh bank for each session, so `load` is not
    /// called again on restart.
    ///
    /// # Returns
    ///
    /// The records in source order, or a [`SourceError`] when the origin is
    /// unreachable, lacks the `Content` or `Stage` column, or has no rows.
    async fn load(&self) -> Result<Vec<QuestionRecord>, SourceError>;

    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

/// Column positions resolved from the header row.
struct Columns {
    width: usize,
    content: usize,
    stage: usize,
    translation: Option<usize>,
    intent: Option<usize>,
    is_follow_up: Option<usize>,
    parent_intent: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, SourceError> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        Ok(Self {
            width: headers.len(),
            content: find("Content").ok_or(SourceError::MissingColumn("Content"))?,
            stage: find("Stage").ok_or(SourceError::MissingColumn("Stage"))?,
            translation: find("Translation"),
            intent: find("Intent"),
            is_follow_up: find("IsFollowUp"),
            parent_intent: find("ParentIntent"),
        })
    }

    fn record(&self, row: &StringRecord) -> QuestionRecord {
        let field = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        QuestionRecord {
            content: field(Some(self.content)).unwrap_or_default(),
            translation: field(self.translation),
            stage: field(Some(self.stage)),
            intent: field(self.intent),
            is_follow_up: field(self.is_follow_up).as_deref() == Some("1"),
            parent_intent: field(self.parent_intent),
        }
    }
}

/// Parses delimited question text.
///
/// The header row must name `Content` and `Stage`; `Translation`, `Intent`,
/// `IsFollowUp` and `ParentIntent` are optional and other columns are ignored.
/// Fields are trimmed and may be quoted to contain commas. A row may omit its
/// last field; shorter rows are skipped.
pub fn parse_records(text: &str) -> Result<Vec<QuestionRecord>, SourceError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let columns = Columns::resolve(reader.headers()?)?;
    let mut records = Vec::new();

    for (index, row) in reader.records().enumerate() {
        let row = row?;
        if row.len() + 1 < columns.width {
            debug!(line = index + 2, fields = row.len(), "Skipping short row");
            continue;
        }
        records.push(columns.record(&row));
    }

    if records.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(records)
}

/// Reads records from a file on disk.
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl QuestionSource for CsvFileSource {
    async fn load(&self) -> Result<Vec<QuestionRecord>, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(self.path.display().to_string(), e))?;
        info!(path = %self.path.display(), bytes = text.len(), "Question file read");
        parse_records(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches records over HTTP(S).
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl QuestionSource for HttpSource {
    async fn load(&self) -> Result<Vec<QuestionRecord>, SourceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http(status));
        }
        let text = response.text().await?;
        info!(url = %self.url, bytes = text.len(), "Question file downloaded");
        parse_records(&text)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves a fixed, in-memory set of records.
pub struct StaticSource {
    records: Vec<QuestionRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<QuestionRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl QuestionSource for StaticSource {
    async fn load(&self) -> Result<Vec<QuestionRecord>, SourceError> {
        if self.records.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory records", self.records.len())
    }
}

/// Picks an [`HttpSource`] for http(s) URLs and a [`CsvFileSource`] otherwise.
pub fn from_location(location: &str) -> Box<dyn QuestionSource> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(CsvFileSource::new(location))
    }
}
