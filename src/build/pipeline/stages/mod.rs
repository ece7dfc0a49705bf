//! Default pipeline stages.
//!
//! The standard project processing pipeline consists of:
//!
//! 1. **ExtractStage** - Pull features and technology tags from the README
//! 2. **DocsStage** - Load every configured document and render it to HTML
//! 3. **TemplateStage** - Assemble the snapshot page
//! 4. **WriteStage** - Write the page, docs and manifest to the output directory

mod docs;
mod extract;
mod template;
mod write;

pub use docs::DocsStage;
pub use extract::ExtractStage;
pub use template::TemplateStage;
pub use write::WriteStage;
