//! Metadata extraction
//!
//! Type-dispatches raw files to format-specific readers and produces the
//! normalized metadata record the rule evaluator consumes. Extraction is
//! infallible by contract: unreadable or foreign-format input degrades to
//! `MediaKind::Unknown` because metadata absence is evaluator input, not an
//! exceptional condition.

mod extractor;
pub mod image_reader;
pub mod video_reader;

pub use extractor::MetadataExtractor;
