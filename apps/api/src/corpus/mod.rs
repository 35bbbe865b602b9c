//! Job corpus — the immutable catalog of postings the matcher ranks against.
//!
//! Loaded once at startup from a CSV file and shared read-only through `AppState`.
//! Normalization happens here, so scoring only ever sees well-typed `JobPosting`s.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::models::job::JobPosting;

const REQUIRED_COLUMNS: [&str; 3] = ["title", "company", "description"];

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("Failed to open job corpus '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Job corpus is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// Raw CSV row. Every cell is read as text, so numeric cells keep their textual form.
#[derive(Debug, Deserialize)]
struct JobRecord {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    company: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<JobRecord> for JobPosting {
    fn from(record: JobRecord) -> Self {
        JobPosting {
            title: record.title.unwrap_or_default(),
            company: record.company.unwrap_or_default(),
            description: record.description.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobCorpus {
    postings: Vec<JobPosting>,
}

impl JobCorpus {
    #[allow(dead_code)]
    pub fn from_postings(postings: Vec<JobPosting>) -> Self {
        Self { postings }
    }

    /// Loads the corpus from a CSV file with a header row.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let path = path.as_ref();
        info!("Loading job corpus from {}", path.display());

        let file = std::fs::File::open(path).map_err(|source| CorpusError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let corpus = Self::from_reader(file)?;

        info!("Job corpus loaded: {} postings", corpus.len());
        Ok(corpus)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CorpusError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(CorpusError::MissingColumn(column));
            }
        }

        let mut postings = Vec::new();
        for record in reader.deserialize::<JobRecord>() {
            postings.push(JobPosting::from(record?));
        }
        debug!("Parsed {} job rows", postings.len());

        Ok(Self { postings })
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}
