//! Content hashes used as cache validity keys.
//!
//! Each hash covers only the fields that change a ranking. Volatile fields
//! (applicant counts, timestamps, salary) are left out so they don't force a
//! recompute. The digest is SHA-256 truncated to 64 bits: a collision can only
//! serve a stale ranking for one request, never a wrong type or a crash.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::{Application, Job, Profile, TalentSeeker};

const HASH_HEX_LEN: usize = 16;

#[derive(Serialize)]
struct ProfileFields<'a> {
    skills: &'a [String],
    experience: Option<&'a str>,
    education: Option<&'a str>,
    bio: Option<&'a str>,
}

impl<'a> From<&'a Profile> for ProfileFields<'a> {
    fn from(p: &'a Profile) -> Self {
        Self {
            skills: &p.skills,
            experience: p.experience.as_deref(),
            education: p.education.as_deref(),
            bio: p.bio.as_deref(),
        }
    }
}

#[derive(Serialize)]
struct SeekerJobFields<'a> {
    id: &'a str,
    title: &'a str,
    requirements: &'a [String],
    description: &'a str,
}

#[derive(Serialize)]
struct ApplicationFields<'a> {
    id: i64,
    seeker: ProfileFields<'a>,
    job: ApplicationJobFields<'a>,
}

#[derive(Serialize)]
struct ApplicationJobFields<'a> {
    title: &'a str,
    requirements: &'a [String],
}

#[derive(Serialize)]
struct TalentSeekerFields<'a> {
    id: i64,
    skills: &'a [String],
    experience: Option<&'a str>,
    education: Option<&'a str>,
}

#[derive(Serialize)]
struct TalentJobFields<'a> {
    id: &'a str,
    title: &'a str,
    requirements: &'a [String],
}

/// Hex digest of the canonical JSON form of `value`.
pub fn content_hash<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let bytes = serde_json::to_vec(value)?;
    let digest = Sha256::digest(&bytes);
    let mut hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    hex.truncate(HASH_HEX_LEN);
    Ok(hex)
}

/// Profile skills/experience/education/bio plus each job's id/title/requirements/description.
///
/// Job location and type are not part of the hash even though the fallback
/// scores them; callers clear the cache when a job is edited.
pub fn seeker_recommendations_hash(
    profile: &Profile,
    jobs: &[Job],
) -> Result<String, serde_json::Error> {
    let jobs: Vec<SeekerJobFields<'_>> = jobs
        .iter()
        .map(|j| SeekerJobFields {
            id: &j.id,
            title: &j.title,
            requirements: &j.requirements,
            description: &j.description,
        })
        .collect();
    content_hash(&(ProfileFields::from(profile), jobs))
}

/// Per application: id, applicant profile fields, job title and requirements.
pub fn applicant_scores_hash(applications: &[Application]) -> Result<String, serde_json::Error> {
    let applications: Vec<ApplicationFields<'_>> = applications
        .iter()
        .map(|a| ApplicationFields {
            id: a.id,
            seeker: ProfileFields::from(&a.seeker_details),
            job: ApplicationJobFields {
                title: &a.job_details.title,
                requirements: &a.job_details.requirements,
            },
        })
        .collect();
    content_hash(&applications)
}

/// Seeker id/skills/experience/education plus each job's id/title/requirements.
pub fn talent_pool_hash(seekers: &[TalentSeeker], jobs: &[Job]) -> Result<String, serde_json::Error> {
    let seekers: Vec<TalentSeekerFields<'_>> = seekers
        .iter()
        .map(|s| TalentSeekerFields {
            id: s.id,
            skills: &s.profile.skills,
            experience: s.profile.experience.as_deref(),
            education: s.profile.education.as_deref(),
        })
        .collect();
    let jobs: Vec<TalentJobFields<'_>> = jobs
        .iter()
        .map(|j| TalentJobFields {
            id: &j.id,
            title: &j.title,
            requirements: &j.requirements,
        })
        .collect();
    content_hash(&(seekers, jobs))
}
