//! Flat-file storage collaborator.
//!
//! Collections are plain CSV files in one data directory. Reads soft-fail:
//! an absent or unreadable file logs a warning and loads as an empty
//! collection, so callers cannot distinguish "no data yet" from
//! "unavailable" and never fail a computation over it. The activity log is
//! append-only with no idempotency guarantee; two racing appends both land,
//! last write wins.

mod records;

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::auth::StudentRecord;
use crate::career::{CareerQuestion, StreamRecommendation};
use crate::progress::ActivityRecord;
use crate::quiz::domain::Question;

use records::{ActivityRow, CareerQuestionRow, QuestionRow, StreamRow, StudentRow};

pub const STUDENTS_FILE: &str = "students.csv";
pub const QUESTIONS_FILE: &str = "questions.csv";
pub const CAREER_QUIZ_FILE: &str = "career_quiz.csv";
pub const STREAMS_FILE: &str = "streams.csv";
pub const ACTIVITY_FILE: &str = "user_progress.csv";

/// Error enumeration for storage write failures. Reads never error; they
/// degrade to empty collections.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode record: {0}")]
    Encode(#[from] csv::Error),
    #[error("failed to encode details payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Append-only view of the activity log, so services can run against an
/// in-memory double in tests and demos.
pub trait ActivityLog: Send + Sync {
    fn append(&self, record: ActivityRecord) -> Result<(), StoreError>;
    fn for_user(&self, user_id: &str) -> Result<Vec<ActivityRecord>, StoreError>;
}

/// CSV-backed store rooted at one data directory.
#[derive(Debug, Clone)]
pub struct DataStore {
    dir: PathBuf,
}

impl DataStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load_students(&self) -> Vec<StudentRecord> {
        self.read_rows::<StudentRow>(STUDENTS_FILE)
            .into_iter()
            .map(StudentRow::into_domain)
            .collect()
    }

    pub fn load_questions(&self) -> Vec<Question> {
        self.read_rows::<QuestionRow>(QUESTIONS_FILE)
            .into_iter()
            .filter_map(QuestionRow::into_domain)
            .collect()
    }

    pub fn load_career_questions(&self) -> Vec<CareerQuestion> {
        self.read_rows::<CareerQuestionRow>(CAREER_QUIZ_FILE)
            .into_iter()
            .filter_map(CareerQuestionRow::into_domain)
            .collect()
    }

    pub fn load_streams(&self) -> Vec<StreamRecommendation> {
        self.read_rows::<StreamRow>(STREAMS_FILE)
            .into_iter()
            .map(StreamRow::into_domain)
            .collect()
    }

    /// The full activity log across users, in file order.
    pub fn load_activity(&self) -> Vec<ActivityRecord> {
        self.read_rows::<ActivityRow>(ACTIVITY_FILE)
            .into_iter()
            .filter_map(ActivityRow::into_domain)
            .collect()
    }

    pub fn activity_for_user(&self, user_id: &str) -> Vec<ActivityRecord> {
        self.load_activity()
            .into_iter()
            .filter(|record| record.user_id == user_id)
            .collect()
    }

    /// Appends one record, creating the file with headers when it does not
    /// exist yet. Duplicate submissions append duplicate rows.
    pub fn append_activity(&self, record: &ActivityRecord) -> Result<(), StoreError> {
        let path = self.dir.join(ACTIVITY_FILE);
        let new_file = !path.exists();

        if new_file {
            std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
                path: self.dir.display().to_string(),
                source,
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| StoreError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(new_file)
            .from_writer(file);
        writer.serialize(ActivityRow::from_record(record)?)?;
        writer.flush().map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Ok(())
    }

    fn read_rows<T: DeserializeOwned>(&self, file_name: &str) -> Vec<T> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            warn!(file = %path.display(), "data file not found; loading empty collection");
            return Vec::new();
        }

        let mut reader = match csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
        {
            Ok(reader) => reader,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "unreadable data file; loading empty collection");
                return Vec::new();
            }
        };

        let mut rows = Vec::new();
        for row in reader.deserialize::<T>() {
            match row {
                Ok(row) => rows.push(row),
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "skipping malformed row");
                }
            }
        }
        rows
    }
}

impl ActivityLog for DataStore {
    fn append(&self, record: ActivityRecord) -> Result<(), StoreError> {
        self.append_activity(&record)
    }

    fn for_user(&self, user_id: &str) -> Result<Vec<ActivityRecord>, StoreError> {
        Ok(self.activity_for_user(user_id))
    }
}
