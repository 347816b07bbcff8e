pub mod draft;
pub mod template;

pub use draft::{DraftField, NewTemplateRow, TagRow, TemplateDraft};
pub use template::{Template, TemplateId, TemplateSummary};
