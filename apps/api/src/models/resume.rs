use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Resume document stored in the `resumes` container, partitioned by `user_id`.
///
/// Structured sections are kept as the editor sends them: JSON-encoded arrays
/// (`experience`, `education`, `projects`, `certifications`, `academic`,
/// `volunteer`, `activities`) or comma-separated values (`skills`, `soft_skills`).
/// They are decoded only when a PDF is composed, see `pdf::sections`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Resume {
    pub id: String,
    #[serde(alias = "UserId")]
    pub user_id: String,
    pub template_id: i32,
    pub title: String,

    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linked_in: String,
    pub website: String,

    pub summary: String,
    pub experience: String,
    pub education: String,
    pub skills: String,
    pub projects: String,
    pub soft_skills: String,
    pub certifications: String,
    pub academic: String,
    pub volunteer: String,
    pub activities: String,

    pub profile_image_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Default for Resume {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            user_id: String::new(),
            template_id: 0,
            title: "Untitled Resume".to_string(),
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            linked_in: String::new(),
            website: String::new(),
            summary: String::new(),
            experience: "[]".to_string(),
            education: "[]".to_string(),
            skills: String::new(),
            projects: "[]".to_string(),
            soft_skills: String::new(),
            certifications: "[]".to_string(),
            academic: "[]".to_string(),
            volunteer: "[]".to_string(),
            activities: "[]".to_string(),
            profile_image_url: None,
            created_at: now,
            updated_at: now,
        }
    }
}

// Section entries. Keys are PascalCase because that is how the editor serialises them.

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(rename = "GPA")]
    pub gpa: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct ProjectEntry {
    pub name: String,
    pub description: String,
    pub technologies: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct CertificationEntry {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub link: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct AcademicEntry {
    pub name: String,
    pub course: String,
    pub grade: String,
    pub description: String,
}

/// Shared by the volunteer and activities sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase", default)]
pub struct InvolvementEntry {
    pub organization: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied_to_sparse_body() {
        let resume: Resume = serde_json::from_str(r#"{"userId":"u1","fullName":"Ada"}"#).unwrap();
        assert_eq!(resume.user_id, "u1");
        assert_eq!(resume.title, "Untitled Resume");
        assert_eq!(resume.experience, "[]");
        assert!(resume.id.is_empty());
    }

    #[test]
    fn test_legacy_partition_key_alias() {
        let resume: Resume = serde_json::from_str(r#"{"id":"r1","UserId":"u9"}"#).unwrap();
        assert_eq!(resume.user_id, "u9");
    }

    #[test]
    fn test_education_gpa_key() {
        let entry: EducationEntry =
            serde_json::from_str(r#"{"Institution":"MIT","GPA":"3.9"}"#).unwrap();
        assert_eq!(entry.gpa, "3.9");
        assert_eq!(entry.degree, "");
    }
}
