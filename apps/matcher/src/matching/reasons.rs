//! Reason Generator: short human-readable explanations for a match score.
//!
//! Triggers are checked in order (skill overlap, experience level) and joined
//! with ". ". Score banding is used only when no trigger fired.

use crate::models::{Job, JobDetails, Profile};

const REASON_SEPARATOR: &str = ". ";
/// How many matching skills are named in a reason.
const MAX_SKILLS_SHOWN: usize = 3;

const SEEKER_LEVEL_KEYWORDS: &[&str] = &["senior", "junior", "mid", "lead", "principal", "entry"];
const APPLICANT_LEVEL_KEYWORDS: &[&str] = &[
    "senior",
    "junior",
    "mid",
    "lead",
    "principal",
    "entry",
    "manager",
];

/// Seeker skills that overlap any requirement, in the seeker's order.
///
/// The test is a case-insensitive substring check in both directions, so
/// "React" matches "React.js" and "Node.js experience" matches "Node.js".
/// Blank skills and requirements never match.
pub fn find_matching_skills(skills: &[String], requirements: &[String]) -> Vec<String> {
    let requirements: Vec<String> = requirements
        .iter()
        .map(|r| r.trim().to_lowercase())
        .filter(|r| !r.is_empty())
        .collect();

    skills
        .iter()
        .filter(|skill| {
            let skill = skill.trim().to_lowercase();
            !skill.is_empty()
                && requirements
                    .iter()
                    .any(|req| req.contains(&skill) || skill.contains(req.as_str()))
        })
        .cloned()
        .collect()
}

/// Explains a seeker → job score.
pub fn explain_seeker_match(profile: &Profile, job: &Job, score: u8) -> String {
    let mut reasons = Vec::new();

    let matching = find_matching_skills(&profile.skills, &job.requirements);
    if !matching.is_empty() {
        reasons.push(format!(
            "Your skills ({}) match this role",
            shown_skills(&matching)
        ));
    }

    if let Some(experience) = profile.experience.as_deref() {
        if shares_level_keyword(experience, &job.description, SEEKER_LEVEL_KEYWORDS) {
            reasons.push("Experience level matches".to_string());
        }
    }

    if reasons.is_empty() {
        reasons.push(seeker_band(score).to_string());
    }

    reasons.join(REASON_SEPARATOR)
}

/// Explains an application's score from the employer's side.
pub fn explain_applicant_match(
    seeker: &Profile,
    job: &JobDetails,
    score: u8,
    matching_skills: &[String],
) -> String {
    let mut reasons = Vec::new();

    if !matching_skills.is_empty() {
        reasons.push(format!("Skills match: {}", shown_skills(matching_skills)));
    }

    if let Some(experience) = seeker.experience.as_deref() {
        let requirements = job.requirements.join(" ");
        if shares_level_keyword(experience, &requirements, APPLICANT_LEVEL_KEYWORDS) {
            reasons.push("Experience level aligns".to_string());
        }
    }

    if reasons.is_empty() {
        reasons.push(applicant_band(score).to_string());
    }

    reasons.join(REASON_SEPARATOR)
}

/// Explains a talent-pool seeker's score against the job that fit them best.
pub fn explain_talent_pool_match(job_title: &str, score: u8, matching_skills: &[String]) -> String {
    if !matching_skills.is_empty() {
        format!(
            "{} match for {job_title}",
            count_label(matching_skills.len(), "skill")
        )
    } else if score >= 70 {
        format!("Strong fit for {job_title}")
    } else if score >= 50 {
        format!("Potential fit for {job_title}")
    } else {
        format!("Consider for {job_title}")
    }
}

/// "1 skill", "3 skills".
pub(crate) fn count_label(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn shown_skills(skills: &[String]) -> String {
    skills
        .iter()
        .take(MAX_SKILLS_SHOWN)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn shares_level_keyword(candidate_text: &str, job_text: &str, vocabulary: &[&str]) -> bool {
    let candidate_text = candidate_text.to_lowercase();
    let job_text = job_text.to_lowercase();
    vocabulary
        .iter()
        .any(|kw| candidate_text.contains(kw) && job_text.contains(kw))
}

fn seeker_band(score: u8) -> &'static str {
    match score {
        80.. => "Excellent profile-job alignment detected by AI",
        60..=79 => "Good compatibility based on your background",
        40..=59 => "Moderate match - could be a growth opportunity",
        _ => "Explore this role for career diversification",
    }
}

fn applicant_band(score: u8) -> &'static str {
    match score {
        80.. => "Excellent candidate match",
        60..=79 => "Good profile alignment",
        40..=59 => "Potential fit with some gaps",
        _ => "May require additional training",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn job(requirements: &[&str], description: &str) -> Job {
        Job {
            id: "1".to_string(),
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: String::new(),
            description: description.to_string(),
            requirements: strings(requirements),
            job_type: "full-time".to_string(),
            extra: Map::new(),
        }
    }

    fn details(requirements: &[&str]) -> JobDetails {
        JobDetails {
            title: "Engineer".to_string(),
            description: None,
            requirements: strings(requirements),
            job_type: None,
            location: None,
            extra: Map::new(),
        }
    }

    #[test]
    fn test_matching_is_bidirectional_and_case_insensitive() {
        let skills = strings(&["react", "Node.js experience", "Go"]);
        let reqs = strings(&["React.js", "node.js", "Kubernetes"]);
        assert_eq!(
            find_matching_skills(&skills, &reqs),
            strings(&["react", "Node.js experience"])
        );
    }

    #[test]
    fn test_blank_entries_never_match() {
        let skills = strings(&["", "  "]);
        let reqs = strings(&["Rust", ""]);
        assert!(find_matching_skills(&skills, &reqs).is_empty());
        assert!(find_matching_skills(&strings(&["Rust"]), &strings(&[" "])).is_empty());
    }

    #[test]
    fn test_seeker_reason_names_matching_skills() {
        let profile = Profile {
            skills: strings(&["React", "Node.js"]),
            ..Profile::default()
        };
        let reason = explain_seeker_match(&profile, &job(&["React", "TypeScript"], ""), 55);
        assert_eq!(reason, "Your skills (React) match this role");
    }

    #[test]
    fn test_seeker_reason_caps_skills_at_three() {
        let profile = Profile {
            skills: strings(&["A1", "B2", "C3", "D4"]),
            ..Profile::default()
        };
        let reason = explain_seeker_match(&profile, &job(&["a1 b2 c3 d4"], ""), 90);
        assert_eq!(reason, "Your skills (A1, B2, C3) match this role");
    }

    #[test]
    fn test_seeker_reason_joins_skill_and_level() {
        let profile = Profile {
            skills: strings(&["Rust"]),
            experience: Some("Senior backend engineer".to_string()),
            ..Profile::default()
        };
        let reason = explain_seeker_match(
            &profile,
            &job(&["Rust"], "We are hiring a senior engineer"),
            70,
        );
        assert_eq!(
            reason,
            "Your skills (Rust) match this role. Experience level matches"
        );
    }

    #[test]
    fn test_seeker_reason_falls_back_to_bands() {
        let profile = Profile::default();
        let j = job(&[], "");
        assert_eq!(
            explain_seeker_match(&profile, &j, 80),
            "Excellent profile-job alignment detected by AI"
        );
        assert_eq!(
            explain_seeker_match(&profile, &j, 60),
            "Good compatibility based on your background"
        );
        assert_eq!(
            explain_seeker_match(&profile, &j, 40),
            "Moderate match - could be a growth opportunity"
        );
        assert_eq!(
            explain_seeker_match(&profile, &j, 39),
            "Explore this role for career diversification"
        );
    }

    #[test]
    fn test_manager_only_counts_for_applicants() {
        let seeker = Profile {
            experience: Some("Engineering manager".to_string()),
            ..Profile::default()
        };
        let reason = explain_applicant_match(&seeker, &details(&["Manager of 5+ people"]), 20, &[]);
        assert_eq!(reason, "Experience level aligns");

        let reason = explain_seeker_match(&seeker, &job(&[], "Manager of 5+ people"), 20);
        assert_eq!(reason, "Explore this role for career diversification");
    }

    #[test]
    fn test_applicant_reason_lists_skills_then_bands() {
        let seeker = Profile::default();
        let skills = strings(&["Go", "SQL"]);
        assert_eq!(
            explain_applicant_match(&seeker, &details(&["Go", "SQL"]), 10, &skills),
            "Skills match: Go, SQL"
        );
        assert_eq!(
            explain_applicant_match(&seeker, &details(&[]), 85, &[]),
            "Excellent candidate match"
        );
        assert_eq!(
            explain_applicant_match(&seeker, &details(&[]), 65, &[]),
            "Good profile alignment"
        );
        assert_eq!(
            explain_applicant_match(&seeker, &details(&[]), 45, &[]),
            "Potential fit with some gaps"
        );
        assert_eq!(
            explain_applicant_match(&seeker, &details(&[]), 5, &[]),
            "May require additional training"
        );
    }

    #[test]
    fn test_talent_pool_reason_wording() {
        assert_eq!(
            explain_talent_pool_match("SRE", 10, &strings(&["Linux"])),
            "1 skill match for SRE"
        );
        assert_eq!(
            explain_talent_pool_match("SRE", 10, &strings(&["Linux", "Bash"])),
            "2 skills match for SRE"
        );
        assert_eq!(explain_talent_pool_match("SRE", 70, &[]), "Strong fit for SRE");
        assert_eq!(explain_talent_pool_match("SRE", 50, &[]), "Potential fit for SRE");
        assert_eq!(explain_talent_pool_match("SRE", 49, &[]), "Consider for SRE");
    }
}
