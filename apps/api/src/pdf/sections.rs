//! Decodes the string-encoded resume sections into typed content for the composer.

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::models::resume::{
    AcademicEntry, CertificationEntry, EducationEntry, ExperienceEntry, InvolvementEntry,
    ProjectEntry, Resume,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResumeContent {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linked_in: String,
    pub website: String,
    pub summary: String,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    pub certifications: Vec<CertificationEntry>,
    pub academic: Vec<AcademicEntry>,
    pub volunteer: Vec<InvolvementEntry>,
    pub activities: Vec<InvolvementEntry>,
}

impl ResumeContent {
    pub fn from_resume(resume: &Resume) -> Self {
        Self {
            full_name: resume.full_name.trim().to_string(),
            email: resume.email.trim().to_string(),
            phone: resume.phone.trim().to_string(),
            address: resume.address.trim().to_string(),
            linked_in: resume.linked_in.trim().to_string(),
            website: resume.website.trim().to_string(),
            summary: resume.summary.trim().to_string(),
            experience: decode_entries("experience", &resume.experience),
            education: decode_entries("education", &resume.education),
            skills: split_csv(&resume.skills),
            soft_skills: split_csv(&resume.soft_skills),
            projects: decode_entries("projects", &resume.projects),
            certifications: decode_entries("certifications", &resume.certifications),
            academic: decode_entries("academic", &resume.academic),
            volunteer: decode_entries("volunteer", &resume.volunteer),
            activities: decode_entries("activities", &resume.activities),
        }
    }

    /// Upper-cased first letter of the name, `U` when there is none.
    pub fn initial(&self) -> String {
        self.full_name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }

    pub fn has_contact(&self) -> bool {
        [&self.email, &self.phone, &self.address, &self.linked_in, &self.website]
            .iter()
            .any(|s| !s.is_empty())
    }
}

/// Decodes a JSON array section. Values that do not look like an array, or
/// fail to parse, produce no entries.
fn decode_entries<T: DeserializeOwned>(section: &'static str, raw: &str) -> Vec<T> {
    let raw = raw.trim();
    if !raw.starts_with('[') {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<T>>(raw) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(section, error = %e, "Skipping malformed section");
            Vec::new()
        }
    }
}

/// Splits a comma-separated list, trimming items and dropping blanks.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Joins two dates as `start - end`. With `require_both`, a missing side
/// hides the range entirely; otherwise whichever side is present is shown.
pub fn date_range(start: &str, end: &str, require_both: bool) -> Option<String> {
    let (start, end) = (start.trim(), end.trim());
    match (start.is_empty(), end.is_empty()) {
        (false, false) => Some(format!("{start} - {end}")),
        (true, true) => None,
        _ if require_both => None,
        (false, true) => Some(start.to_string()),
        (true, false) => Some(end.to_string()),
    }
}

/// Turns user-entered links into absolute URIs. Bare hosts get `https://`,
/// e-mail addresses get `mailto:`. Returns `None` for anything unparseable.
pub fn normalize_link(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() || raw.chars().any(char::is_whitespace) {
        return None;
    }
    let candidate = if raw.starts_with("mailto:") || raw.contains("://") {
        raw.to_string()
    } else if looks_like_email(raw) {
        format!("mailto:{raw}")
    } else {
        format!("https://{raw}")
    };
    let url = Url::parse(&candidate).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some_and(|h| h.contains('.') || h == "localhost") => {
            Some(url.into())
        }
        "mailto" => Some(url.into()),
        _ => None,
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !s.contains('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume() -> Resume {
        Resume {
            full_name: "  ada lovelace ".into(),
            skills: "Rust, , SQL ,Go,".into(),
            experience: r#"[{"Company":"Acme","Position":"Engineer","StartDate":"2020","EndDate":"2022"}]"#
                .into(),
            education: "[{not json".into(),
            projects: "not an array".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_decodes_valid_sections() {
        let content = ResumeContent::from_resume(&resume());
        assert_eq!(content.experience.len(), 1);
        assert_eq!(content.experience[0].company, "Acme");
        assert_eq!(content.experience[0].location, "");
    }

    #[test]
    fn test_malformed_sections_are_skipped() {
        let content = ResumeContent::from_resume(&resume());
        assert!(content.education.is_empty());
        assert!(content.projects.is_empty());
        assert!(content.certifications.is_empty());
    }

    #[test]
    fn test_skills_trimmed_and_blanks_dropped() {
        let content = ResumeContent::from_resume(&resume());
        assert_eq!(content.skills, vec!["Rust", "SQL", "Go"]);
        assert!(content.soft_skills.is_empty());
    }

    #[test]
    fn test_initial() {
        assert_eq!(ResumeContent::from_resume(&resume()).initial(), "A");
        assert_eq!(ResumeContent::default().initial(), "U");
    }

    #[test]
    fn test_date_range() {
        assert_eq!(date_range("2020", "2022", false).as_deref(), Some("2020 - 2022"));
        assert_eq!(date_range("2020", " ", false).as_deref(), Some("2020"));
        assert_eq!(date_range("2020", "", true), None);
        assert_eq!(date_range("", "", false), None);
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(
            normalize_link("github.com/ada").as_deref(),
            Some("https://github.com/ada")
        );
        assert_eq!(
            normalize_link("https://linkedin.com/in/ada").as_deref(),
            Some("https://linkedin.com/in/ada")
        );
        assert_eq!(
            normalize_link("ada@example.com").as_deref(),
            Some("mailto:ada@example.com")
        );
        assert_eq!(normalize_link("not a url"), None);
        assert_eq!(normalize_link("ada"), None);
        assert_eq!(normalize_link(""), None);
    }
}
