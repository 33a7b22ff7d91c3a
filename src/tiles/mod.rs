pub mod loader;
pub mod source;

// Re-exports for convenience
pub use loader::TileLoader;
pub use source::{TemplateSource, TileSource};
