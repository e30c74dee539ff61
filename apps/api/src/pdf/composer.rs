//! Builds the page-description tree for a resume under a template preset.
//!
//! Every preset renders the same sections in the same order; presets only
//! differ in where a section goes (main column or side column) and how
//! headers, headings and skill lists are drawn. See [`TemplateStyle`].

use std::sync::Arc;

use crate::models::resume::{
    AcademicEntry, CertificationEntry, EducationEntry, ExperienceEntry, InvolvementEntry,
    ProjectEntry, Resume,
};
use crate::models::template::{
    Arrangement, HeaderStyle, HeadingStyle, ResumeTemplate, SkillStyle,
};
use crate::pdf::color::{palette, Rgb};
use crate::pdf::document::{
    auto, fixed, inline, relative, row, Backdrop, ColumnBuilder, Container, Document, HAlign,
    Insets, Node, PageSetup, RasterImage, Text,
};
use crate::pdf::sections::{date_range, normalize_link, ResumeContent};

/// 0.75in page padding used by the single-column presets.
const LINEAR_MARGIN: f32 = 54.0;
/// Top and bottom breathing room for pages after the first on edge-to-edge presets.
const FLUSH_CONTINUATION_INSET: f32 = 36.0;
const SIDEBAR_WIDTH: f32 = 220.0;
const RIGHT_COLUMN_WIDTH: f32 = 170.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Experience,
    Education,
    TechnicalSkills,
    SoftSkills,
    Projects,
    Certifications,
    Academic,
    Volunteer,
    Activities,
}

impl Section {
    pub const ORDER: [Section; 10] = [
        Section::Summary,
        Section::Experience,
        Section::Education,
        Section::TechnicalSkills,
        Section::SoftSkills,
        Section::Projects,
        Section::Certifications,
        Section::Academic,
        Section::Volunteer,
        Section::Activities,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::Summary => "PROFESSIONAL SUMMARY",
            Section::Experience => "EXPERIENCE",
            Section::Education => "EDUCATION",
            Section::TechnicalSkills => "TECHNICAL SKILLS",
            Section::SoftSkills => "SOFT SKILLS",
            Section::Projects => "PROJECTS",
            Section::Certifications => "CERTIFICATIONS",
            Section::Academic => "ACADEMIC ACHIEVEMENTS",
            Section::Volunteer => "VOLUNTEER EXPERIENCE",
            Section::Activities => "ACTIVITIES & INTERESTS",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Theme {
    primary: Rgb,
    /// Heading bands.
    accent: Rgb,
    /// Side column fill.
    panel: Rgb,
}

/// Composes `resume` under `template`. `photo` is only used by presets with a photo slot.
pub fn compose(
    resume: &Resume,
    template: &ResumeTemplate,
    photo: Option<RasterImage>,
) -> Document {
    let content = ResumeContent::from_resume(resume);
    let photo_size = photo.as_ref().map(|p| (p.width, p.height));
    let composer = Composer::new(&content, template, photo_size);
    let root = composer.root();
    let mut doc = Document::new(composer.page_setup(), root);
    if composer.uses_photo() {
        if let Some(photo) = photo {
            doc.images.push(Arc::new(photo));
        }
    }
    if template.style.arrangement == Arrangement::LeftSidebar {
        doc.backdrops.push(Backdrop {
            x: 0.0,
            width: SIDEBAR_WIDTH,
            color: composer.theme.panel,
        });
    }
    doc
}

struct Composer<'a> {
    content: &'a ResumeContent,
    template: &'a ResumeTemplate,
    theme: Theme,
    /// Pixel size of the fetched photo, if any.
    photo_size: Option<(u32, u32)>,
}

impl<'a> Composer<'a> {
    fn new(
        content: &'a ResumeContent,
        template: &'a ResumeTemplate,
        photo_size: Option<(u32, u32)>,
    ) -> Self {
        let primary = Rgb::from_hex(template.color);
        let style = &template.style;
        let theme = Theme {
            primary,
            accent: style.accent.map(Rgb::from_hex).unwrap_or(primary),
            panel: style
                .sidebar
                .map(Rgb::from_hex)
                .unwrap_or_else(|| primary.with_alpha(24)),
        };
        Self {
            content,
            template,
            theme,
            photo_size,
        }
    }

    fn uses_photo(&self) -> bool {
        self.template.shows_photo() && self.photo_size.is_some()
    }

    fn page_setup(&self) -> PageSetup {
        match self.template.style.arrangement {
            Arrangement::LeftSidebar => PageSetup::letter(Insets::default(), FLUSH_CONTINUATION_INSET),
            _ => PageSetup::letter(Insets::all(LINEAR_MARGIN), 0.0),
        }
    }

    /// Whether `section` goes in the narrow column of a two-column preset.
    fn in_side_column(&self, section: Section) -> bool {
        match self.template.style.arrangement {
            Arrangement::SingleColumn => false,
            Arrangement::LeftSidebar => matches!(
                section,
                Section::Education | Section::TechnicalSkills | Section::SoftSkills
            ),
            Arrangement::RightColumn => matches!(
                section,
                Section::Education
                    | Section::TechnicalSkills
                    | Section::SoftSkills
                    | Section::Certifications
            ),
        }
    }

    /// The name band of the sidebar preset carries the summary itself.
    fn summary_in_header(&self) -> bool {
        self.template.style.arrangement == Arrangement::LeftSidebar
            && self.template.style.header == HeaderStyle::Banner
    }

    fn boxed_certifications(&self) -> bool {
        self.summary_in_header()
    }

    fn section_title(&self, section: Section) -> &'static str {
        match section {
            Section::Experience if self.summary_in_header() => "EMPLOYMENT HISTORY",
            Section::Certifications if self.summary_in_header() => "CERTIFICATIONS AND TRAINING",
            Section::TechnicalSkills if self.template.style.arrangement == Arrangement::LeftSidebar => {
                "SKILLS"
            }
            other => other.title(),
        }
    }

    fn root(&self) -> Node {
        match self.template.style.arrangement {
            Arrangement::SingleColumn => self.single_column(),
            Arrangement::RightColumn => self.right_column(),
            Arrangement::LeftSidebar => self.left_sidebar(),
        }
    }

    // ── arrangements ────────────────────────────────────────────────────────

    fn single_column(&self) -> Node {
        let mut col = ColumnBuilder::new(15.0);
        col.push(self.header());
        for section in Section::ORDER {
            col.push_opt(self.main_section(section));
        }
        col.build()
    }

    fn right_column(&self) -> Node {
        let mut main = ColumnBuilder::new(15.0);
        let mut side = ColumnBuilder::new(15.0);
        for section in Section::ORDER {
            if self.in_side_column(section) {
                side.push_opt(self.side_section(section));
            } else {
                main.push_opt(self.main_section(section));
            }
        }
        let mut col = ColumnBuilder::new(15.0);
        col.push(self.header());
        col.push(row(
            24.0,
            vec![relative(1.0, main.build()), fixed(RIGHT_COLUMN_WIDTH, side.build())],
        ));
        col.build()
    }

    fn left_sidebar(&self) -> Node {
        let mut side = ColumnBuilder::new(25.0);
        side.push(self.portrait());
        if self.content.has_contact() {
            side.push(self.contact_box());
        }
        for section in Section::ORDER {
            if self.in_side_column(section) {
                side.push_opt(self.side_section(section));
            }
        }
        let sidebar = Container::new(side.build()).padding(Insets::all(20.0));

        let mut body = ColumnBuilder::new(20.0);
        for section in Section::ORDER {
            if self.in_side_column(section)
                || (section == Section::Summary && self.summary_in_header())
            {
                continue;
            }
            body.push_opt(self.main_section(section));
        }

        let mut main = ColumnBuilder::new(0.0);
        main.push(self.sidebar_name_block());
        if !body.is_empty() {
            main.push(Container::new(body.build()).padding(Insets::all(25.0)));
        }

        row(
            0.0,
            vec![fixed(SIDEBAR_WIDTH, sidebar), relative(1.0, main.build())],
        )
    }

    // ── headers ─────────────────────────────────────────────────────────────

    fn header(&self) -> Node {
        match self.template.style.header {
            HeaderStyle::Plain => self.plain_header(HAlign::Left),
            HeaderStyle::Centered => self.plain_header(HAlign::Center),
            HeaderStyle::Banner => self.banner_header(),
        }
    }

    fn plain_header(&self, align: HAlign) -> Node {
        let mut col = ColumnBuilder::new(0.0);
        col.push(
            Text::new(&self.content.full_name)
                .size(24.0)
                .bold()
                .color(palette::BLACK)
                .line_height(1.0)
                .align(align),
        );
        let (primary_line, web_line) = self.contact_lines(palette::GREY_DARKEN1, self.theme.primary);
        if !primary_line.is_empty() {
            col.push(
                Container::new(contact_flow(primary_line, align)).padding(Insets::only_top(8.0)),
            );
        }
        if !web_line.is_empty() {
            col.push(Container::new(contact_flow(web_line, align)).padding(Insets::only_top(5.0)));
        }
        col.build()
    }

    fn banner_header(&self) -> Node {
        let mut text = ColumnBuilder::new(0.0);
        text.push(
            Text::new(&self.content.full_name)
                .size(24.0)
                .bold()
                .color(palette::WHITE)
                .line_height(1.0),
        );
        let (primary_line, web_line) = self.contact_lines(palette::WHITE, palette::WHITE);
        let contacts: Vec<Node> = primary_line.into_iter().chain(web_line).collect();
        if !contacts.is_empty() {
            text.push(
                Container::new(contact_flow(contacts, HAlign::Left)).padding(Insets::only_top(8.0)),
            );
        }
        let band = row(
            16.0,
            vec![fixed(64.0, self.banner_portrait()), relative(1.0, text.build())],
        );
        Container::new(band)
            .background(self.theme.primary)
            .padding(Insets::all(20.0))
            .into()
    }

    /// Name block heading the main column of sidebar presets.
    fn sidebar_name_block(&self) -> Node {
        if self.summary_in_header() {
            let mut band = ColumnBuilder::new(0.0);
            band.push(
                Text::new(self.content.full_name.to_uppercase())
                    .size(32.0)
                    .bold()
                    .color(palette::WHITE)
                    .letter_spacing(0.1)
                    .line_height(1.1)
                    .align(HAlign::Center),
            );
            if !self.content.summary.is_empty() {
                band.push(
                    Container::new(
                        Text::new(&self.content.summary)
                            .color(palette::WHITE)
                            .line_height(1.4)
                            .align(HAlign::Center),
                    )
                    .padding(Insets::only_top(15.0)),
                );
            }
            Container::new(band.build())
                .background(self.theme.primary)
                .padding(Insets::all(25.0))
                .into()
        } else {
            Container::new(
                Text::new(&self.content.full_name)
                    .size(24.0)
                    .bold()
                    .color(palette::BLACK)
                    .line_height(1.0),
            )
            .padding(Insets {
                top: 25.0,
                right: 25.0,
                bottom: 0.0,
                left: 25.0,
            })
            .into()
        }
    }

    /// Photo or initial box at the top of the sidebar.
    fn portrait(&self) -> Node {
        if self.uses_photo() {
            photo_node(120.0, self.photo_aspect())
        } else {
            self.initial_box(80.0, 100.0, 50.0, self.theme.primary)
        }
    }

    fn banner_portrait(&self) -> Node {
        if self.uses_photo() {
            photo_node(64.0, self.photo_aspect())
        } else {
            self.initial_box(56.0, 70.0, 34.0, self.theme.accent_on_primary())
        }
    }

    /// Height over width, clamped so a panorama or a strip never dominates the column.
    fn photo_aspect(&self) -> f32 {
        match self.photo_size {
            Some((w, h)) if w > 0 => (h as f32 / w as f32).clamp(0.5, 1.5),
            _ => 1.0,
        }
    }

    fn initial_box(&self, width: f32, height: f32, size: f32, fill: Rgb) -> Node {
        Container::new(
            Text::new(self.content.initial())
                .size(size)
                .bold()
                .color(palette::WHITE)
                .line_height(1.0)
                .align(HAlign::Center),
        )
        .size(width, height)
        .border(3.0, palette::WHITE)
        .background(fill)
        .align(HAlign::Center)
        .middle()
        .into()
    }

    // ── contact ─────────────────────────────────────────────────────────────

    /// Contact items split into (email, phone, address) and (LinkedIn, website).
    fn contact_lines(&self, text_color: Rgb, link_color: Rgb) -> (Vec<Node>, Vec<Node>) {
        let c = self.content;
        let item = |value: &str, link: Option<String>, color: Rgb| -> Option<Node> {
            if value.is_empty() {
                return None;
            }
            Some(row(
                4.0,
                vec![
                    auto(Text::new("\u{2022}").bold().color(self.theme.marker_on(text_color))),
                    auto(Text::new(value).color(color).link(link)),
                ],
            ))
        };
        let first = [
            item(&c.email, normalize_link(&c.email), text_color),
            item(&c.phone, None, text_color),
            item(&c.address, None, text_color),
        ];
        let second = [
            item(&c.linked_in, normalize_link(&c.linked_in), link_color),
            item(&c.website, normalize_link(&c.website), link_color),
        ];
        (
            first.into_iter().flatten().collect(),
            second.into_iter().flatten().collect(),
        )
    }

    fn contact_box(&self) -> Node {
        let c = self.content;
        let mut col = ColumnBuilder::new(8.0);
        col.push(self.side_heading("CONTACT"));
        let entries = [
            (&c.email, normalize_link(&c.email)),
            (&c.phone, None),
            (&c.address, None),
            (&c.linked_in, normalize_link(&c.linked_in)),
            (&c.website, normalize_link(&c.website)),
        ];
        for (value, link) in entries {
            if value.is_empty() {
                continue;
            }
            col.push(row(
                0.0,
                vec![
                    fixed(15.0, Text::new("\u{2022}").bold().color(self.theme.primary)),
                    relative(
                        1.0,
                        Container::new(Text::new(value.as_str()).size(9.0).link(link))
                            .padding(Insets::only_left(5.0)),
                    ),
                ],
            ));
        }
        Container::new(col.build())
            .border(2.0, palette::GREY_LIGHTEN1)
            .padding(Insets::all(10.0))
            .into()
    }

    // ── headings ────────────────────────────────────────────────────────────

    fn heading(&self, title: &str, gap: f32) -> Node {
        match self.template.style.heading {
            HeadingStyle::Rule => {
                let mut col = ColumnBuilder::new(2.0);
                col.push(
                    Text::new(title)
                        .size(12.0)
                        .bold()
                        .color(self.theme.primary)
                        .letter_spacing(0.05),
                );
                col.push(Node::Rule {
                    thickness: 1.0,
                    color: palette::GREY_LIGHTEN2,
                });
                Container::new(col.build())
                    .padding(Insets::only_bottom(gap))
                    .into()
            }
            HeadingStyle::Band => Container::new(
                Container::new(
                    Text::new(title)
                        .size(14.0)
                        .bold()
                        .color(palette::WHITE)
                        .letter_spacing(0.05),
                )
                .background(self.theme.accent)
                .padding(Insets::symmetric(3.0, 10.0)),
            )
            .padding(Insets::only_bottom(gap))
            .into(),
            HeadingStyle::AccentBar => Container::new(row(
                8.0,
                vec![
                    fixed(
                        4.0,
                        Container::empty().size(4.0, 14.4).background(self.theme.primary),
                    ),
                    relative(
                        1.0,
                        Text::new(title)
                            .size(12.0)
                            .bold()
                            .color(palette::BLACK)
                            .letter_spacing(0.05),
                    ),
                ],
            ))
            .padding(Insets::only_bottom(gap))
            .into(),
        }
    }

    fn side_heading(&self, title: &str) -> Node {
        Text::new(title)
            .size(14.0)
            .bold()
            .color(self.theme.primary)
            .into()
    }

    // ── sections ────────────────────────────────────────────────────────────

    fn main_section(&self, section: Section) -> Option<Node> {
        let c = self.content;
        let title = self.section_title(section);
        let gap = match section {
            Section::TechnicalSkills | Section::SoftSkills => 8.0,
            _ => 5.0,
        };
        let body: Vec<Node> = match section {
            Section::Summary => non_empty(&c.summary)
                .map(|s| vec![Text::new(s).line_height(1.5).into()])
                .unwrap_or_default(),
            Section::Experience => c.experience.iter().map(experience_entry).collect(),
            Section::Education => c.education.iter().map(education_entry).collect(),
            Section::TechnicalSkills => self.skills(&c.skills, 10.0).into_iter().collect(),
            Section::SoftSkills => self.skills(&c.soft_skills, 10.0).into_iter().collect(),
            Section::Projects => c
                .projects
                .iter()
                .map(|p| project_entry(p, self.theme.primary))
                .collect(),
            Section::Certifications if self.boxed_certifications() => c
                .certifications
                .iter()
                .map(|cert| certification_box(cert, self.theme.primary))
                .collect(),
            Section::Certifications => c
                .certifications
                .iter()
                .map(|cert| certification_entry(cert, self.theme.primary))
                .collect(),
            Section::Academic => c.academic.iter().map(academic_entry).collect(),
            Section::Volunteer => c.volunteer.iter().map(involvement_entry).collect(),
            Section::Activities => c.activities.iter().map(involvement_entry).collect(),
        };
        if body.is_empty() {
            return None;
        }
        let mut col = ColumnBuilder::new(0.0);
        col.push(self.heading(title, gap));
        for node in body {
            col.push(node);
        }
        Some(col.build())
    }

    fn side_section(&self, section: Section) -> Option<Node> {
        let c = self.content;
        let sidebar = self.template.style.arrangement == Arrangement::LeftSidebar;
        let body: Vec<Node> = match section {
            Section::Education => c.education.iter().map(compact_education_entry).collect(),
            Section::TechnicalSkills => self.skills(&c.skills, 9.0).into_iter().collect(),
            Section::SoftSkills => self.skills(&c.soft_skills, 9.0).into_iter().collect(),
            Section::Certifications => c
                .certifications
                .iter()
                .map(|cert| certification_entry(cert, self.theme.primary))
                .collect(),
            _ => return self.main_section(section),
        };
        if body.is_empty() {
            return None;
        }
        let mut col = ColumnBuilder::new(5.0);
        if sidebar {
            col.push(self.side_heading(self.section_title(section)));
        } else {
            col.push(self.heading(self.section_title(section), 3.0));
        }
        for node in body {
            col.push(node);
        }
        Some(col.build())
    }

    fn skills(&self, skills: &[String], size: f32) -> Option<Node> {
        if skills.is_empty() {
            return None;
        }
        let node = match self.template.style.skills {
            SkillStyle::Pills => inline(
                8.0,
                8.0,
                skills
                    .iter()
                    .map(|skill| {
                        Container::new(Text::new(skill).size(9.0).color(self.theme.primary))
                            .background(self.theme.primary.with_alpha(32))
                            .padding(Insets::symmetric(3.0, 8.0))
                            .into()
                    })
                    .collect(),
            ),
            SkillStyle::Bullets => {
                let mut col = ColumnBuilder::new(3.0);
                for skill in skills {
                    col.push(Text::new(format!("\u{2022} {skill}")).size(size));
                }
                col.build()
            }
            SkillStyle::Inline => Text::new(skills.join("  \u{00B7}  "))
                .size(size)
                .line_height(1.4)
                .into(),
        };
        Some(node)
    }
}

impl Theme {
    /// Initial-box fill that stays visible on a primary-coloured banner.
    fn accent_on_primary(&self) -> Rgb {
        if self.accent == self.primary {
            self.primary.with_alpha(160)
        } else {
            self.accent
        }
    }

    /// Contact bullet colour: theme colour on white, white on a banner.
    fn marker_on(&self, text_color: Rgb) -> Rgb {
        if text_color == palette::WHITE {
            palette::WHITE
        } else {
            self.primary
        }
    }
}

// ── entry blocks ────────────────────────────────────────────────────────────

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn entry_title(title: &str) -> Text {
    Text::new(title).size(11.0).bold().color(palette::BLACK)
}

fn description(text: &str) -> Option<Node> {
    non_empty(text).map(|d| {
        Container::new(Text::new(d).line_height(1.4))
            .padding(Insets::only_top(2.0))
            .into()
    })
}

fn title_with_date(title: Text, date: Option<Text>) -> Node {
    match date {
        Some(date) => row(10.0, vec![relative(1.0, title), auto(date)]),
        None => title.into(),
    }
}

fn entry(col: ColumnBuilder, bottom: f32) -> Node {
    Container::new(col.build())
        .padding(Insets::only_bottom(bottom))
        .into()
}

fn link_line(link: &str, color: Rgb) -> Option<Node> {
    non_empty(link).map(|l| {
        Text::new(l)
            .size(9.0)
            .color(color)
            .link(normalize_link(l))
            .into()
    })
}

fn experience_entry(e: &ExperienceEntry) -> Node {
    let title = match non_empty(&e.location) {
        Some(location) => format!("{}, {}", e.company.trim(), location),
        None => e.company.trim().to_string(),
    };
    let date = date_range(&e.start_date, &e.end_date, false).map(|d| Text::new(d).bold());
    let mut col = ColumnBuilder::new(0.0);
    col.push(title_with_date(entry_title(&title), date));
    col.push_opt(non_empty(&e.position).map(|p| Text::new(p).size(10.5).italic().into()));
    col.push_opt(description(&e.description));
    entry(col, 10.0)
}

fn education_entry(e: &EducationEntry) -> Node {
    let date = date_range(&e.start_date, &e.end_date, false).map(|d| Text::new(d).bold());
    let mut details: Vec<String> = [&e.degree, &e.field_of_study]
        .into_iter()
        .filter_map(|s| non_empty(s))
        .map(str::to_string)
        .collect();
    if let Some(gpa) = non_empty(&e.gpa) {
        details.push(format!("GPA: {gpa}"));
    }
    let mut col = ColumnBuilder::new(0.0);
    col.push(title_with_date(entry_title(e.institution.trim()), date));
    if !details.is_empty() {
        col.push(Text::new(details.join(" \u{2022} ")));
    }
    entry(col, 8.0)
}

fn compact_education_entry(e: &EducationEntry) -> Node {
    let mut col = ColumnBuilder::new(0.0);
    col.push_opt(non_empty(&e.degree).map(|d| Text::new(d).bold().into()));
    col.push_opt(non_empty(&e.institution).map(|i| Text::new(i).size(9.0).into()));
    col.push_opt(
        date_range(&e.start_date, &e.end_date, false)
            .map(|d| Text::new(d).size(8.0).italic().into()),
    );
    entry(col, 10.0)
}

fn project_entry(p: &ProjectEntry, link_color: Rgb) -> Node {
    let mut col = ColumnBuilder::new(0.0);
    col.push(entry_title(p.name.trim()));
    col.push_opt(
        non_empty(&p.technologies)
            .map(|t| Text::new(format!("Technologies: {t}")).size(9.0).italic().into()),
    );
    col.push_opt(description(&p.description));
    col.push_opt(link_line(&p.link, link_color));
    entry(col, 10.0)
}

fn certification_entry(c: &CertificationEntry, link_color: Rgb) -> Node {
    let date = non_empty(&c.date).map(Text::new);
    let mut col = ColumnBuilder::new(0.0);
    col.push(title_with_date(entry_title(c.name.trim()), date));
    col.push_opt(non_empty(&c.issuer).map(|i| Text::new(i).into()));
    col.push_opt(link_line(&c.link, link_color));
    entry(col, 8.0)
}

fn certification_box(c: &CertificationEntry, fill: Rgb) -> Node {
    let meta: Vec<&str> = [&c.issuer, &c.date]
        .into_iter()
        .filter_map(|s| non_empty(s))
        .collect();
    let mut col = ColumnBuilder::new(0.0);
    col.push(Text::new(c.name.trim()).bold().color(palette::WHITE));
    if !meta.is_empty() {
        col.push(Text::new(meta.join(" | ")).size(9.0).color(palette::WHITE));
    }
    col.push_opt(non_empty(&c.link).map(|l| {
        Text::new(l)
            .size(9.0)
            .color(palette::WHITE)
            .link(normalize_link(l))
            .into()
    }));
    Container::new(
        Container::new(col.build())
            .background(fill)
            .padding(Insets::all(10.0)),
    )
    .padding(Insets::only_top(2.0))
    .into()
}

fn academic_entry(a: &AcademicEntry) -> Node {
    let mut col = ColumnBuilder::new(0.0);
    col.push(entry_title(a.name.trim()));
    col.push_opt(non_empty(&a.course).map(|c| Text::new(c).into()));
    col.push_opt(non_empty(&a.grade).map(|g| Text::new(format!("Grade: {g}")).italic().into()));
    col.push_opt(description(&a.description));
    entry(col, 8.0)
}

fn involvement_entry(v: &InvolvementEntry) -> Node {
    let date = date_range(&v.start_date, &v.end_date, true).map(Text::new);
    let mut col = ColumnBuilder::new(0.0);
    col.push(title_with_date(entry_title(v.organization.trim()), date));
    col.push_opt(non_empty(&v.role).map(|r| Text::new(r).size(10.5).italic().into()));
    col.push_opt(description(&v.description));
    entry(col, 10.0)
}

fn contact_flow(items: Vec<Node>, align: HAlign) -> Node {
    Node::Inline {
        spacing: 15.0,
        line_spacing: 5.0,
        align,
        items,
    }
}

fn photo_node(width: f32, aspect: f32) -> Node {
    Node::Image {
        image: 0,
        width,
        height: width * aspect,
        align: HAlign::Center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::TemplateCatalog;
    use crate::pdf::layout::{layout_document, DrawOp};

    fn sample() -> Resume {
        Resume {
            full_name: "Grace Hopper".into(),
            email: "grace@example.com".into(),
            phone: "555-0100".into(),
            linked_in: "linkedin.com/in/grace".into(),
            summary: "Compiler pioneer.".into(),
            experience: r#"[{"Company":"Navy","Position":"Rear Admiral","Location":"Arlington","StartDate":"1943","EndDate":"1986","Description":"Led COBOL work."}]"#.into(),
            education: r#"[{"Institution":"Yale","Degree":"PhD","FieldOfStudy":"Mathematics","GPA":"4.0"}]"#.into(),
            skills: "COBOL, FLOW-MATIC, ".into(),
            soft_skills: "Teaching".into(),
            certifications: r#"[{"Name":"Distinguished Service","Issuer":"DoD","Date":"1986"}]"#.into(),
            volunteer: r#"[{"Organization":"ACM","Role":"Speaker","StartDate":"1970"}]"#.into(),
            ..Default::default()
        }
    }

    fn texts(doc: &Document) -> Vec<String> {
        layout_document(doc)
            .iter()
            .flat_map(|page| page.texts().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    fn photo() -> RasterImage {
        RasterImage {
            width: 10,
            height: 12,
            rgb: vec![128; 10 * 12 * 3],
        }
    }

    #[test]
    fn test_every_template_renders_name_and_sections() {
        for template in TemplateCatalog.all() {
            let doc = compose(&sample(), template, None);
            let all = texts(&doc).join(" ");
            assert!(
                all.to_uppercase().contains("GRACE HOPPER"),
                "template {} lost the name",
                template.id
            );
            assert!(all.contains("Rear Admiral"), "template {} lost experience", template.id);
            assert!(all.contains("COBOL"), "template {} lost skills", template.id);
            assert!(all.contains("Teaching"), "template {} lost soft skills", template.id);
            assert!(all.contains("Distinguished Service"), "template {} lost certifications", template.id);
        }
    }

    #[test]
    fn test_sections_follow_fixed_order() {
        let doc = compose(&sample(), TemplateCatalog.resolve(1), None);
        let all = texts(&doc);
        let position = |needle: &str| all.iter().position(|t| t == needle).unwrap();
        let order = [
            "PROFESSIONAL SUMMARY",
            "EXPERIENCE",
            "EDUCATION",
            "TECHNICAL SKILLS",
            "SOFT SKILLS",
            "CERTIFICATIONS",
            "VOLUNTEER EXPERIENCE",
        ];
        for pair in order.windows(2) {
            assert!(position(pair[0]) < position(pair[1]), "{} before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_empty_sections_are_omitted() {
        let doc = compose(&sample(), TemplateCatalog.resolve(1), None);
        let all = texts(&doc);
        assert!(!all.iter().any(|t| t == "PROJECTS"));
        assert!(!all.iter().any(|t| t == "ACADEMIC ACHIEVEMENTS"));
        assert!(!all.iter().any(|t| t == "ACTIVITIES & INTERESTS"));
    }

    #[test]
    fn test_entry_details() {
        let all = texts(&compose(&sample(), TemplateCatalog.resolve(1), None));
        assert!(all.iter().any(|t| t == "Navy, Arlington"));
        assert!(all.iter().any(|t| t == "1943 - 1986"));
        assert!(all.iter().any(|t| t == "PhD \u{2022} Mathematics \u{2022} GPA: 4.0"));
        // Volunteer dates need both ends.
        assert!(!all.iter().any(|t| t.starts_with("1970")));
    }

    #[test]
    fn test_sidebar_template_falls_back_to_initial() {
        let doc = compose(&sample(), TemplateCatalog.resolve(7), None);
        let all = texts(&doc);
        assert!(all.iter().any(|t| t == "G"));
        assert!(all.iter().any(|t| t == "EMPLOYMENT HISTORY"));
        assert!(all.iter().any(|t| t == "CERTIFICATIONS AND TRAINING"));
        assert!(all.iter().any(|t| t == "CONTACT"));
        assert!(doc.images.is_empty());
        assert_eq!(doc.backdrops.len(), 1);
        assert_eq!(doc.page.margin, Insets::default());
    }

    #[test]
    fn test_initial_for_unnamed_resume() {
        let resume = Resume::default();
        let all = texts(&compose(&resume, TemplateCatalog.resolve(7), None));
        assert!(all.iter().any(|t| t == "U"));
    }

    #[test]
    fn test_photo_replaces_initial_when_slot_exists() {
        let doc = compose(&sample(), TemplateCatalog.resolve(7), Some(photo()));
        assert_eq!(doc.images.len(), 1);
        let pages = layout_document(&doc);
        assert!(pages[0].ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
        assert!(!pages[0].texts().any(|t| t == "G"));
    }

    #[test]
    fn test_photo_ignored_without_slot() {
        let doc = compose(&sample(), TemplateCatalog.resolve(1), Some(photo()));
        assert!(doc.images.is_empty());
    }

    #[test]
    fn test_contact_links() {
        let doc = compose(&sample(), TemplateCatalog.resolve(1), None);
        let uris: Vec<String> = layout_document(&doc)
            .into_iter()
            .flat_map(|p| p.links.into_iter().map(|l| l.uri))
            .collect();
        assert!(uris.contains(&"mailto:grace@example.com".to_string()));
        assert!(uris.contains(&"https://linkedin.com/in/grace".to_string()));
    }

    #[test]
    fn test_pills_keep_each_skill_on_one_line() {
        let skills = ["Rust", "Python", "Docker", "AWS", "Git", "Kubernetes", "Terraform"];
        let resume = Resume {
            phone: "Python".into(),
            skills: skills.join(", "),
            ..sample()
        };
        for id in [1, 2, 3, 5] {
            let all = texts(&compose(&resume, TemplateCatalog.resolve(id), None));
            for skill in skills {
                assert!(
                    all.iter().any(|t| t == skill),
                    "template {id}: {skill} not drawn whole in {all:?}"
                );
                assert!(
                    !all.iter().any(|t| t.len() >= 2 && t.len() < skill.len() && skill.starts_with(t.as_str())),
                    "template {id}: {skill} split in {all:?}"
                );
            }
        }
    }

    #[test]
    fn test_long_resume_paginates() {
        let jobs: Vec<String> = (0..25)
            .map(|i| {
                format!(
                    r#"{{"Company":"Company {i}","Position":"Engineer","StartDate":"2000","EndDate":"2001","Description":"{}"}}"#,
                    "Built and shipped things. ".repeat(8)
                )
            })
            .collect();
        let resume = Resume {
            experience: format!("[{}]", jobs.join(",")),
            ..sample()
        };
        for id in [1, 6, 7] {
            let pages = layout_document(&compose(&resume, TemplateCatalog.resolve(id), None));
            assert!(pages.len() >= 2, "template {id} did not paginate");
        }
    }
}
