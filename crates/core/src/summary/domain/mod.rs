pub mod summarizer;
pub mod template;
pub mod truncation;
