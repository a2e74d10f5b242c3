/// Domain interface for the external summarization capability.
///
/// Takes the full transcript text; implementations own their prompt
/// construction and context-window budgeting. An empty result is a valid
/// outcome and means "nothing worth persisting".
pub trait TextSummarizer: Send {
    fn summarize(&self, text: &str) -> Result<String, Box<dyn std::error::Error>>;
}
