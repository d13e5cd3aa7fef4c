//! Orchestrators: the public matching entry points.
//!
//! Each call runs
//! ```text
//! empty input? ─► empty result
//! cache hit?   ─► reconcile with current entities ─► return
//! summarize ─► embed ─┬─ ok  ─► score ─► explain ─► store in cache ─► return
//!                     └─ err ─► keyword fallback ─► return (cache untouched)
//! ```
//! The AI pass is a plain `Result`; the entry points match on it and never
//! surface an error to their caller.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::cache::content_hash::{
    applicant_scores_hash, seeker_recommendations_hash, talent_pool_hash,
};
use crate::cache::{CacheDirection, MatchCache};
use crate::embedding_client::{Embedder, EmbeddingVector};
use crate::matching::fallback::{
    fallback_applicant_scores, fallback_seeker_scores, fallback_talent_pool_scores,
};
use crate::matching::reasons::{
    explain_applicant_match, explain_seeker_match, explain_talent_pool_match,
    find_matching_skills,
};
use crate::matching::similarity::{cosine_similarity, to_match_score};
use crate::matching::summarizer::{
    summarize_job, summarize_job_details, summarize_job_requirements, summarize_profile,
};
use crate::matching::{sort_by_score_desc, MatchError};
use crate::models::{
    Application, ApplicantMatchResult, Job, JobDetails, JobRef, MatchResult, Profile,
    TalentPoolMatchResult, TalentSeeker,
};

/// Score and reason used for talent-pool seekers when the employer has no jobs yet.
const NO_JOBS_SCORE: u8 = 50;
const NO_JOBS_REASON: &str = "Add jobs to see AI match scores";

#[derive(Clone)]
pub struct Matcher {
    embedder: Arc<dyn Embedder>,
    cache: MatchCache,
}

impl Matcher {
    pub fn new(embedder: Arc<dyn Embedder>, cache: MatchCache) -> Self {
        Self { embedder, cache }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Seeker → jobs
    // ────────────────────────────────────────────────────────────────────────

    /// Ranks `jobs` for `profile`, best first.
    pub async fn get_ai_job_recommendations(&self, profile: &Profile, jobs: &[Job]) -> Vec<MatchResult> {
        if jobs.is_empty() {
            return Vec::new();
        }

        let direction = CacheDirection::SeekerRecommendations;
        let hash = hash_or_bypass(seeker_recommendations_hash(profile, jobs));

        if let Some(hash) = hash.as_deref() {
            if let Some(cached) = self.cache.lookup::<Vec<MatchResult>>(direction, hash).await {
                return reconcile_with_current(cached, jobs);
            }
        }

        match self.score_jobs(profile, jobs).await {
            Ok(results) => {
                if let Some(hash) = hash.as_deref() {
                    self.cache.store(direction, hash, &results).await;
                }
                results
            }
            Err(e) => {
                warn!("AI job recommendations failed, using keyword fallback: {e}");
                fallback_seeker_scores(profile, jobs)
            }
        }
    }

    async fn score_jobs(&self, profile: &Profile, jobs: &[Job]) -> Result<Vec<MatchResult>, MatchError> {
        let mut texts = Vec::with_capacity(jobs.len() + 1);
        texts.push(summarize_profile(profile));
        texts.extend(jobs.iter().map(summarize_job));

        let embeddings = self.embed_batch(&texts).await?;
        let (profile_embedding, job_embeddings) = split_anchor(&embeddings)?;

        let mut results = jobs
            .iter()
            .zip(job_embeddings)
            .map(|(job, job_embedding)| -> Result<MatchResult, MatchError> {
                let match_score = to_match_score(cosine_similarity(profile_embedding, job_embedding)?);
                Ok(MatchResult {
                    job: job.clone(),
                    match_score,
                    match_reason: explain_seeker_match(profile, job, match_score),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        sort_by_score_desc(&mut results, |r| r.match_score);
        info!("Scored {} jobs with embeddings", results.len());
        Ok(results)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Employer → applicants
    // ────────────────────────────────────────────────────────────────────────

    /// Scores every application against the job it was made for.
    pub async fn get_applicant_match_scores(
        &self,
        applications: &[Application],
    ) -> BTreeMap<i64, ApplicantMatchResult> {
        if applications.is_empty() {
            return BTreeMap::new();
        }

        let direction = CacheDirection::ApplicantScores;
        let hash = hash_or_bypass(applicant_scores_hash(applications));

        if let Some(hash) = hash.as_deref() {
            if let Some(cached) = self
                .cache
                .lookup::<BTreeMap<i64, ApplicantMatchResult>>(direction, hash)
                .await
            {
                return cached;
            }
        }

        match self.score_applicants(applications).await {
            Ok(results) => {
                if let Some(hash) = hash.as_deref() {
                    self.cache.store(direction, hash, &results).await;
                }
                results
            }
            Err(e) => {
                warn!("AI applicant scoring failed, using keyword fallback: {e}");
                fallback_applicant_scores(applications)
            }
        }
    }

    /// One embedding batch per distinct job payload: `[job, applicant...]`.
    async fn score_applicants(
        &self,
        applications: &[Application],
    ) -> Result<BTreeMap<i64, ApplicantMatchResult>, MatchError> {
        let mut results = BTreeMap::new();

        for (job, group) in group_by_job(applications)? {
            let mut texts = Vec::with_capacity(group.len() + 1);
            texts.push(summarize_job_details(job));
            texts.extend(group.iter().map(|app| summarize_profile(&app.seeker_details)));

            let embeddings = self.embed_batch(&texts).await?;
            let (job_embedding, applicant_embeddings) = split_anchor(&embeddings)?;

            for (app, applicant_embedding) in group.iter().zip(applicant_embeddings) {
                let match_score = to_match_score(cosine_similarity(job_embedding, applicant_embedding)?);
                let matching_skills = find_matching_skills(&app.seeker_details.skills, &job.requirements);
                let match_reason =
                    explain_applicant_match(&app.seeker_details, job, match_score, &matching_skills);

                results.insert(
                    app.id,
                    ApplicantMatchResult {
                        application_id: app.id,
                        match_score,
                        match_reason,
                        matching_skills,
                    },
                );
            }
        }

        info!("Scored {} applications with embeddings", results.len());
        Ok(results)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Employer → talent pool
    // ────────────────────────────────────────────────────────────────────────

    /// Scores each seeker against every employer job and keeps the best one.
    pub async fn get_talent_pool_match_scores(
        &self,
        seekers: &[TalentSeeker],
        jobs: &[Job],
    ) -> BTreeMap<i64, TalentPoolMatchResult> {
        if seekers.is_empty() {
            return BTreeMap::new();
        }

        if jobs.is_empty() {
            return seekers
                .iter()
                .map(|s| {
                    (
                        s.id,
                        TalentPoolMatchResult {
                            seeker_id: s.id,
                            match_score: NO_JOBS_SCORE,
                            match_reason: NO_JOBS_REASON.to_string(),
                            matching_skills: Vec::new(),
                            best_matching_job: None,
                        },
                    )
                })
                .collect();
        }

        let direction = CacheDirection::TalentPool;
        let hash = hash_or_bypass(talent_pool_hash(seekers, jobs));

        if let Some(hash) = hash.as_deref() {
            if let Some(cached) = self
                .cache
                .lookup::<BTreeMap<i64, TalentPoolMatchResult>>(direction, hash)
                .await
            {
                return cached;
            }
        }

        match self.score_talent_pool(seekers, jobs).await {
            Ok(results) => {
                if let Some(hash) = hash.as_deref() {
                    self.cache.store(direction, hash, &results).await;
                }
                results
            }
            Err(e) => {
                warn!("AI talent pool scoring failed, using keyword fallback: {e}");
                fallback_talent_pool_scores(seekers, jobs)
            }
        }
    }

    /// One batch: `[job..., seeker...]`. Ties keep the earlier job.
    async fn score_talent_pool(
        &self,
        seekers: &[TalentSeeker],
        jobs: &[Job],
    ) -> Result<BTreeMap<i64, TalentPoolMatchResult>, MatchError> {
        let mut texts = Vec::with_capacity(jobs.len() + seekers.len());
        texts.extend(jobs.iter().map(summarize_job_requirements));
        texts.extend(seekers.iter().map(|s| summarize_profile(&s.profile)));

        let embeddings = self.embed_batch(&texts).await?;
        let (job_embeddings, seeker_embeddings) = embeddings.split_at(jobs.len());

        let mut results = BTreeMap::new();
        for (seeker, seeker_embedding) in seekers.iter().zip(seeker_embeddings) {
            let mut best_score = 0_u8;
            let mut best_index = 0_usize;

            for (index, job_embedding) in job_embeddings.iter().enumerate() {
                let score = to_match_score(cosine_similarity(seeker_embedding, job_embedding)?);
                if score > best_score {
                    best_score = score;
                    best_index = index;
                }
            }

            let best_job = &jobs[best_index];
            let matching_skills = find_matching_skills(&seeker.profile.skills, &best_job.requirements);
            results.insert(
                seeker.id,
                TalentPoolMatchResult {
                    seeker_id: seeker.id,
                    match_score: best_score,
                    match_reason: explain_talent_pool_match(&best_job.title, best_score, &matching_skills),
                    matching_skills,
                    best_matching_job: Some(JobRef::from(best_job)),
                },
            );
        }

        info!(
            "Scored {} talent pool seekers against {} jobs with embeddings",
            results.len(),
            jobs.len()
        );
        Ok(results)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Cache control and health
    // ────────────────────────────────────────────────────────────────────────

    /// Call when the seeker's profile or the job list it was ranked from is edited.
    pub async fn clear_seeker_recommendations_cache(&self) {
        self.cache.invalidate(CacheDirection::SeekerRecommendations).await;
    }

    pub async fn clear_applicant_scores_cache(&self) {
        self.cache.invalidate(CacheDirection::ApplicantScores).await;
    }

    pub async fn clear_talent_pool_cache(&self) {
        self.cache.invalidate(CacheDirection::TalentPool).await;
    }

    pub async fn check_ai_service_health(&self) -> bool {
        self.embedder.probe().await
    }

    /// Embeds `texts` and checks that one vector came back per text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, MatchError> {
        let embeddings = self.embedder.embed(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(MatchError::MissingEmbedding {
                index: embeddings.len().min(texts.len()),
            });
        }
        Ok(embeddings)
    }
}

/// First vector is the anchor (profile or job), the rest are its candidates.
fn split_anchor(embeddings: &[EmbeddingVector]) -> Result<(&EmbeddingVector, &[EmbeddingVector]), MatchError> {
    embeddings
        .split_first()
        .ok_or(MatchError::MissingEmbedding { index: 0 })
}

fn hash_or_bypass(hash: Result<String, serde_json::Error>) -> Option<String> {
    match hash {
        Ok(hash) => Some(hash),
        Err(e) => {
            warn!("Could not hash matching inputs, bypassing cache: {e}");
            None
        }
    }
}

/// Re-attaches cached results to the caller's current jobs by id.
///
/// Results whose job has since disappeared are dropped; the rest keep their
/// cached order and carry the current job snapshot.
pub fn reconcile_with_current(cached: Vec<MatchResult>, jobs: &[Job]) -> Vec<MatchResult> {
    let mut current: HashMap<&str, &Job> = HashMap::with_capacity(jobs.len());
    for job in jobs {
        current.entry(job.id.as_str()).or_insert(job);
    }
    cached
        .into_iter()
        .filter_map(|result| {
            current.get(result.job.id.as_str()).map(|job| MatchResult {
                job: (*job).clone(),
                ..result
            })
        })
        .collect()
}

/// Groups applications by their exact job payload, in first-seen order.
fn group_by_job(applications: &[Application]) -> Result<Vec<(&JobDetails, Vec<&Application>)>, MatchError> {
    let mut index_by_key: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(&JobDetails, Vec<&Application>)> = Vec::new();

    for app in applications {
        let key = canonical_json(&app.job_details)?;
        match index_by_key.get(&key) {
            Some(&i) => groups[i].1.push(app),
            None => {
                index_by_key.insert(key, groups.len());
                groups.push((&app.job_details, vec![app]));
            }
        }
    }

    Ok(groups)
}

fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}
