mod builder;
mod document;
mod extract;
mod highlight;
mod markdown;
pub mod output;
pub mod pipeline;
mod render;
pub mod source;

pub use builder::Builder;
pub use render::Renderer;
