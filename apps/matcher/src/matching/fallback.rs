//! Fallback Heuristic Matcher: keyword overlap scoring used whenever the
//! embedding service is unavailable.
//!
//! Every function here is synchronous, deterministic and total. Missing or
//! empty lists contribute zero instead of failing.
//!
//! Score = 30 base
//!       + up to 50 for the fraction of requirements covered by the candidate's skills
//!       + 10 when locations overlap (seeker path)
//!       + 5 for remote jobs (seeker path)
//!       + 10 for applicants listing more than 5 skills (employer path)

use std::collections::BTreeMap;

use crate::matching::reasons::{count_label, find_matching_skills};
use crate::matching::sort_by_score_desc;
use crate::models::{
    Application, ApplicantMatchResult, Job, JobRef, MatchResult, Profile, TalentPoolMatchResult,
    TalentSeeker,
};

const BASE_SCORE: f64 = 30.0;
const SKILL_WEIGHT: f64 = 50.0;
const LOCATION_BONUS: f64 = 10.0;
const REMOTE_BONUS: f64 = 5.0;
const DOCUMENTED_PROFILE_BONUS: f64 = 10.0;
const DOCUMENTED_PROFILE_MIN_SKILLS: usize = 5;

/// Keyword scores for every job, best first (stable for equal scores).
pub fn fallback_seeker_scores(profile: &Profile, jobs: &[Job]) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = jobs
        .iter()
        .map(|job| {
            let mut reasons = Vec::new();

            let matched = find_matching_skills(&profile.skills, &job.requirements).len();
            let mut score = BASE_SCORE + skill_bonus(matched, job.requirements.len());
            if matched > 0 {
                reasons.push(format!("{} match", count_label(matched, "skill")));
            }

            if locations_overlap(profile.location.as_deref(), &job.location) {
                score += LOCATION_BONUS;
                reasons.push("Location matches".to_string());
            }

            if job.is_remote() {
                score += REMOTE_BONUS;
            }

            MatchResult {
                job: job.clone(),
                match_score: finalize(score),
                match_reason: if reasons.is_empty() {
                    "Potential opportunity".to_string()
                } else {
                    reasons.join(". ")
                },
            }
        })
        .collect();

    sort_by_score_desc(&mut results, |r| r.match_score);
    results
}

/// Keyword scores keyed by application id.
pub fn fallback_applicant_scores(applications: &[Application]) -> BTreeMap<i64, ApplicantMatchResult> {
    applications
        .iter()
        .map(|app| {
            let skills = &app.seeker_details.skills;
            let requirements = &app.job_details.requirements;
            let matching_skills = find_matching_skills(skills, requirements);

            let mut score = BASE_SCORE + skill_bonus(matching_skills.len(), requirements.len());
            if skills.len() > DOCUMENTED_PROFILE_MIN_SKILLS {
                score += DOCUMENTED_PROFILE_BONUS;
            }

            let match_reason = if matching_skills.is_empty() {
                "Profile under review".to_string()
            } else {
                format!(
                    "{} match requirements",
                    count_label(matching_skills.len(), "skill")
                )
            };

            (
                app.id,
                ApplicantMatchResult {
                    application_id: app.id,
                    match_score: finalize(score),
                    match_reason,
                    matching_skills,
                },
            )
        })
        .collect()
}

/// Keyword scores for each seeker against their best job.
///
/// A later job only replaces the current best on a strictly higher score, so
/// ties go to the earlier job. The first job is the default best at the base score.
pub fn fallback_talent_pool_scores(
    seekers: &[TalentSeeker],
    jobs: &[Job],
) -> BTreeMap<i64, TalentPoolMatchResult> {
    seekers
        .iter()
        .map(|seeker| {
            let mut best_score = BASE_SCORE;
            let mut best_job = jobs.first();
            let mut best_skills = Vec::new();

            for job in jobs {
                let matching = find_matching_skills(&seeker.profile.skills, &job.requirements);
                let score = BASE_SCORE + skill_bonus(matching.len(), job.requirements.len());
                if score > best_score {
                    best_score = score;
                    best_job = Some(job);
                    best_skills = matching;
                }
            }

            let title = best_job.map(|j| j.title.as_str()).unwrap_or_default();
            let match_reason = if best_skills.is_empty() {
                format!("Potential for {title}")
            } else {
                format!("{} skills match {title}", best_skills.len())
            };

            (
                seeker.id,
                TalentPoolMatchResult {
                    seeker_id: seeker.id,
                    match_score: finalize(best_score),
                    match_reason,
                    matching_skills: best_skills,
                    best_matching_job: best_job.map(JobRef::from),
                },
            )
        })
        .collect()
}

/// Up to `SKILL_WEIGHT`, proportional to the share of requirements matched.
fn skill_bonus(matched: usize, requirement_count: usize) -> f64 {
    if requirement_count == 0 {
        return 0.0;
    }
    let ratio = (matched as f64 / requirement_count as f64).min(1.0);
    ratio * SKILL_WEIGHT
}

fn locations_overlap(seeker_location: Option<&str>, job_location: &str) -> bool {
    let seeker = seeker_location.unwrap_or_default().trim().to_lowercase();
    let job = job_location.trim().to_lowercase();
    !seeker.is_empty() && !job.is_empty() && (job.contains(&seeker) || seeker.contains(&job))
}

fn finalize(score: f64) -> u8 {
    score.round().clamp(0.0, 100.0) as u8
}
