use std::fmt;

use crate::InvalidMaxResults;

/// How many leads a scrape job may collect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MaxResults {
    Twenty,
    #[default]
    Thirty,
    Fifty,
    Hundred,
}

impl MaxResults {
    pub const ALL: [MaxResults; 4] = [
        MaxResults::Twenty,
        MaxResults::Thirty,
        MaxResults::Fifty,
        MaxResults::Hundred,
    ];

    pub fn get(self) -> u32 {
        match self {
            MaxResults::Twenty => 20,
            MaxResults::Thirty => 30,
            MaxResults::Fifty => 50,
            MaxResults::Hundred => 100,
        }
    }
}

impl TryFrom<u32> for MaxResults {
    type Error = InvalidMaxResults;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        MaxResults::ALL
            .into_iter()
            .find(|candidate| candidate.get() == value)
            .ok_or(InvalidMaxResults(value))
    }
}

impl fmt::Display for MaxResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Parameters of a scrape job. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    query: String,
    city: String,
    country: String,
    max_results: MaxResults,
}

impl JobRequest {
    pub fn new(
        query: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
        max_results: MaxResults,
    ) -> Self {
        Self {
            query: query.into(),
            city: city.into(),
            country: country.into(),
            max_results,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn max_results(&self) -> MaxResults {
        self.max_results
    }
}

/// Identifies a job accepted by the agent service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    job_id: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// First eight characters of the job id, for display.
    pub fn short_id(&self) -> &str {
        match self.job_id.char_indices().nth(8) {
            Some((idx, _)) => &self.job_id[..idx],
            None => &self.job_id,
        }
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.job_id)
    }
}

/// Latest status reported by the agent service for a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Completed { leads_qualified: u32 },
    Failed { error_message: String },
}
