use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A job posting as returned by the board's backend.
///
/// Only the listed fields take part in matching. Everything else the backend
/// sends (salary, posted_by, applicant counts, ...) is kept in `extra` so the
/// job can be handed back to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
    /// full-time | part-time | contract | remote
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub job_type: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    pub fn is_remote(&self) -> bool {
        self.job_type.trim().eq_ignore_ascii_case("remote")
    }
}

/// The job payload embedded in an application (`job_details`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Job ids arrive as strings from some endpoints and integers from others.
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_accepts_numeric_id_and_null_requirements() {
        let job: Job = serde_json::from_value(json!({
            "id": 42,
            "title": "Backend Engineer",
            "company": "Acme",
            "requirements": null,
            "type": "remote"
        }))
        .unwrap();

        assert_eq!(job.id, "42");
        assert!(job.requirements.is_empty());
        assert!(job.is_remote());
        assert_eq!(job.location, "");
    }

    #[test]
    fn test_job_round_trips_unknown_backend_fields() {
        let raw = json!({
            "id": "7",
            "title": "Designer",
            "company": "Studio",
            "location": "Berlin",
            "description": "Design things",
            "requirements": ["Figma"],
            "type": "full-time",
            "salary": "60k",
            "applicantCount": 12
        });
        let job: Job = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(job.extra.get("applicantCount"), Some(&json!(12)));
        assert_eq!(serde_json::to_value(&job).unwrap(), raw);
    }

    #[test]
    fn test_job_details_defaults_missing_fields() {
        let details: JobDetails = serde_json::from_value(json!({"title": "QA"})).unwrap();
        assert!(details.requirements.is_empty());
        assert!(details.description.is_none());
        assert!(details.job_type.is_none());
    }
}
