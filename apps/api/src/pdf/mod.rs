//! Resume PDF rendering: compose → layout → write.
//!
//! Everything below this module is synchronous and CPU-bound. Callers run
//! [`render_resume`] inside `tokio::task::spawn_blocking`.

pub mod color;
pub mod composer;
pub mod document;
pub mod font_metrics;
pub mod image;
pub mod layout;
pub mod sections;
pub mod writer;

use thiserror::Error;
use tracing::debug;

use crate::models::resume::Resume;
use crate::models::template::ResumeTemplate;
use crate::pdf::document::RasterImage;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF serialisation failed: {0}")]
    Serialize(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders `resume` with `template`. `photo` fills the photo slot of presets that have one.
pub fn render_resume(
    resume: &Resume,
    template: &ResumeTemplate,
    photo: Option<RasterImage>,
) -> Result<Vec<u8>, PdfError> {
    let doc = composer::compose(resume, template, photo);
    let pages = layout::layout_document(&doc);
    debug!(
        resume_id = %resume.id,
        template_id = template.id,
        pages = pages.len(),
        "Laid out resume"
    );
    let title = if resume.full_name.trim().is_empty() {
        resume.title.as_str()
    } else {
        resume.full_name.trim()
    };
    writer::write_pdf(&doc, &pages, title)
}
