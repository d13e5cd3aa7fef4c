pub mod job;
pub mod match_result;
pub mod profile;

pub use job::{Job, JobDetails};
pub use match_result::{ApplicantMatchResult, JobRef, MatchResult, TalentPoolMatchResult};
pub use profile::{Application, Profile, TalentSeeker};
