//! Renders profiles and jobs into the single strings that get embedded.
//!
//! Output is a pure function of the input struct. The cache hash and the
//! embeddings both rely on that, so field order and separators are fixed.

use crate::models::{Job, JobDetails, Profile};

const SEPARATOR: &str = ". ";
pub const EMPTY_PROFILE: &str = "No profile information available";
pub const EMPTY_JOB: &str = "No job information available";

/// Collects `Label: value` fragments, skipping blank values.
#[derive(Default)]
struct Fragments(Vec<String>);

impl Fragments {
    fn text(&mut self, label: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.0.push(format!("{label}: {v}"));
        }
        self
    }

    fn list(&mut self, label: &str, values: &[String]) -> &mut Self {
        let items: Vec<&str> = values
            .iter()
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .collect();
        if !items.is_empty() {
            self.0.push(format!("{label}: {}", items.join(", ")));
        }
        self
    }

    fn finish(&self, sentinel: &str) -> String {
        if self.0.is_empty() {
            sentinel.to_string()
        } else {
            self.0.join(SEPARATOR)
        }
    }
}

/// Skills, Experience, Education, About.
pub fn summarize_profile(profile: &Profile) -> String {
    Fragments::default()
        .list("Skills", &profile.skills)
        .text("Experience", profile.experience.as_deref())
        .text("Education", profile.education.as_deref())
        .text("About", profile.bio.as_deref())
        .finish(EMPTY_PROFILE)
}

/// Job Title, Company, Description, Requirements, Type, Location.
pub fn summarize_job(job: &Job) -> String {
    Fragments::default()
        .text("Job Title", Some(job.title.as_str()))
        .text("Company", Some(job.company.as_str()))
        .text("Description", Some(job.description.as_str()))
        .list("Requirements", &job.requirements)
        .text("Type", Some(job.job_type.as_str()))
        .text("Location", Some(job.location.as_str()))
        .finish(EMPTY_JOB)
}

/// `summarize_job` without the company: what an employer's job asks of a candidate.
pub fn summarize_job_requirements(job: &Job) -> String {
    Fragments::default()
        .text("Job Title", Some(job.title.as_str()))
        .text("Description", Some(job.description.as_str()))
        .list("Requirements", &job.requirements)
        .text("Type", Some(job.job_type.as_str()))
        .text("Location", Some(job.location.as_str()))
        .finish(EMPTY_JOB)
}

/// Same layout as `summarize_job_requirements`, for an application's job payload.
pub fn summarize_job_details(job: &JobDetails) -> String {
    Fragments::default()
        .text("Job Title", Some(job.title.as_str()))
        .text("Description", job.description.as_deref())
        .list("Requirements", &job.requirements)
        .text("Type", job.job_type.as_deref())
        .text("Location", job.location.as_deref())
        .finish(EMPTY_JOB)
}
