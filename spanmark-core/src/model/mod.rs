pub mod record;
pub mod span;
pub mod text_range;

pub use record::AnnotationRecord;
pub use span::{Label, Span};
pub use text_range::TextRange;
