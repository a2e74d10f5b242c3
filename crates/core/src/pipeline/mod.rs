pub mod derived_text_writer;
pub mod run_summary;
pub mod summarize_use_case;
pub mod transcribe_batch_use_case;
