use serde::{Deserialize, Serialize};

use crate::models::job::Job;

/// Seeker view: one job with its score and explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub job: Job,
    pub match_score: u8, // 0 – 100
    pub match_reason: String,
}

/// Employer view of one application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantMatchResult {
    pub application_id: i64,
    pub match_score: u8,
    pub match_reason: String,
    pub matching_skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRef {
    pub id: String,
    pub title: String,
}

impl From<&Job> for JobRef {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
        }
    }
}

/// Employer view of a talent-pool seeker, scored against their best job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentPoolMatchResult {
    pub seeker_id: i64,
    pub match_score: u8,
    pub match_reason: String,
    pub matching_skills: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_matching_job: Option<JobRef>,
}
