use serde::{Deserialize, Serialize};

use crate::models::job::{null_as_default, JobDetails};

/// The parts of a seeker's profile that matching reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Option<String>,
    #[serde(default)]
    pub education: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Only used by the keyword fallback.
    #[serde(default)]
    pub location: Option<String>,
}

/// An application as seen by the employer: the applicant plus the job applied to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    #[serde(default)]
    pub seeker_details: Profile,
    pub job_details: JobDetails,
}

/// A seeker listed in the employer's talent pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TalentSeeker {
    pub id: i64,
    #[serde(flatten)]
    pub profile: Profile,
}
