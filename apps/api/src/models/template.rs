//! Static template catalog. Seeded at compile time, never persisted.

use serde::Serialize;

/// How the page is split into columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrangement {
    SingleColumn,
    /// Narrow column on the left carrying photo, contact, education and skills.
    LeftSidebar,
    /// Main column with a narrow right column for education, skills and certifications.
    RightColumn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderStyle {
    /// Name left-aligned with contact lines beneath.
    Plain,
    Centered,
    /// Full-width band in the theme colour with white text.
    Banner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStyle {
    /// Coloured title over a thin grey rule.
    Rule,
    /// White title on a filled strip.
    Band,
    /// Short vertical bar to the left of the title.
    AccentBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStyle {
    Pills,
    Bullets,
    /// Single wrapped line separated by middots.
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TemplateStyle {
    pub arrangement: Arrangement,
    pub header: HeaderStyle,
    pub heading: HeadingStyle,
    pub skills: SkillStyle,
    /// Secondary colour for heading bands; the theme colour is used when absent.
    pub accent: Option<&'static str>,
    /// Sidebar fill; a light tint of the theme colour is used when absent.
    pub sidebar: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResumeTemplate {
    pub id: i32,
    pub name: &'static str,
    pub description: &'static str,
    pub color: &'static str,
    pub style: TemplateStyle,
}

impl ResumeTemplate {
    /// Whether the preset has a slot for the profile photo (or its initial fallback).
    pub fn shows_photo(&self) -> bool {
        self.style.arrangement == Arrangement::LeftSidebar
            || self.style.header == HeaderStyle::Banner
    }
}

const fn style(
    arrangement: Arrangement,
    header: HeaderStyle,
    heading: HeadingStyle,
    skills: SkillStyle,
) -> TemplateStyle {
    TemplateStyle {
        arrangement,
        header,
        heading,
        skills,
        accent: None,
        sidebar: None,
    }
}

static TEMPLATES: [ResumeTemplate; 9] = [
    ResumeTemplate {
        id: 1,
        name: "Modern Template",
        description: "Clean and professional design with blue accents",
        color: "#2563EB",
        style: style(
            Arrangement::SingleColumn,
            HeaderStyle::Plain,
            HeadingStyle::Rule,
            SkillStyle::Pills,
        ),
    },
    ResumeTemplate {
        id: 2,
        name: "Executive Template",
        description: "Bold and sophisticated with navy color scheme",
        color: "#1e3a8a",
        style: style(
            Arrangement::SingleColumn,
            HeaderStyle::Banner,
            HeadingStyle::Rule,
            SkillStyle::Pills,
        ),
    },
    ResumeTemplate {
        id: 3,
        name: "Creative Template",
        description: "Vibrant and eye-catching with purple theme",
        color: "#7c3aed",
        style: style(
            Arrangement::LeftSidebar,
            HeaderStyle::Plain,
            HeadingStyle::Band,
            SkillStyle::Pills,
        ),
    },
    ResumeTemplate {
        id: 4,
        name: "Minimal Template",
        description: "Simple and elegant with dark gray accents",
        color: "#374151",
        style: style(
            Arrangement::SingleColumn,
            HeaderStyle::Centered,
            HeadingStyle::Rule,
            SkillStyle::Inline,
        ),
    },
    ResumeTemplate {
        id: 5,
        name: "Tech Template",
        description: "Modern tech-focused with teal highlights",
        color: "#0d9488",
        style: style(
            Arrangement::SingleColumn,
            HeaderStyle::Plain,
            HeadingStyle::Band,
            SkillStyle::Pills,
        ),
    },
    ResumeTemplate {
        id: 6,
        name: "Professional Template",
        description: "Traditional business style with green accents",
        color: "#059669",
        style: style(
            Arrangement::RightColumn,
            HeaderStyle::Plain,
            HeadingStyle::Rule,
            SkillStyle::Bullets,
        ),
    },
    ResumeTemplate {
        id: 7,
        name: "Sidebar Template",
        description: "Grey sidebar with maroon header band and gold section ribbons",
        color: "#800000",
        style: TemplateStyle {
            arrangement: Arrangement::LeftSidebar,
            header: HeaderStyle::Banner,
            heading: HeadingStyle::Band,
            skills: SkillStyle::Bullets,
            accent: Some("#D4AF37"),
            sidebar: Some("#EBEBEB"),
        },
    },
    ResumeTemplate {
        id: 8,
        name: "Elegant Template",
        description: "Centered header with amber accent bars",
        color: "#b45309",
        style: style(
            Arrangement::SingleColumn,
            HeaderStyle::Centered,
            HeadingStyle::AccentBar,
            SkillStyle::Inline,
        ),
    },
    ResumeTemplate {
        id: 9,
        name: "Bold Template",
        description: "Dark banner header with solid section strips",
        color: "#0f172a",
        style: style(
            Arrangement::SingleColumn,
            HeaderStyle::Banner,
            HeadingStyle::Band,
            SkillStyle::Bullets,
        ),
    },
];

/// Read-only view over the template catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateCatalog;

impl TemplateCatalog {
    pub fn all(&self) -> &'static [ResumeTemplate] {
        &TEMPLATES
    }

    pub fn get(&self, id: i32) -> Option<&'static ResumeTemplate> {
        TEMPLATES.iter().find(|t| t.id == id)
    }

    /// Looks up `id`, falling back to the first template for unknown ids.
    pub fn resolve(&self, id: i32) -> &'static ResumeTemplate {
        self.get(id).unwrap_or(&TEMPLATES[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_has_nine_unique_templates() {
        let catalog = TemplateCatalog;
        let ids: HashSet<i32> = catalog.all().iter().map(|t| t.id).collect();
        assert_eq!(catalog.all().len(), 9);
        assert_eq!(ids.len(), 9);
        assert_eq!(catalog.all()[0].id, 1);
    }

    #[test]
    fn test_resolve_known_id() {
        assert_eq!(TemplateCatalog.resolve(7).name, "Sidebar Template");
    }

    #[test]
    fn test_resolve_unknown_id_falls_back_to_first() {
        assert_eq!(TemplateCatalog.resolve(0).id, 1);
        assert_eq!(TemplateCatalog.resolve(42).id, 1);
        assert!(TemplateCatalog.get(42).is_none());
    }

    #[test]
    fn test_photo_slots() {
        let catalog = TemplateCatalog;
        assert!(!catalog.resolve(1).shows_photo());
        assert!(catalog.resolve(2).shows_photo());
        assert!(catalog.resolve(3).shows_photo());
        assert!(catalog.resolve(7).shows_photo());
    }

    #[test]
    fn test_all_template_colors_are_hex() {
        for t in TemplateCatalog.all() {
            assert!(t.color.starts_with('#') && t.color.len() == 7, "{}", t.color);
        }
    }
}
