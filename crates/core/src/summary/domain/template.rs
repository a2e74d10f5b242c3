use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("template file not found: {path}")]
    Missing { path: PathBuf },
    #[error("template file is empty: {path}")]
    Empty { path: PathBuf },
    #[error("failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Prompt template for the summarization capability.
///
/// Loaded and validated once at startup; a missing or blank template is a
/// configuration error that stops the process before any pipeline work.
#[derive(Clone, Debug)]
pub struct SummaryTemplate {
    text: String,
}

impl SummaryTemplate {
    pub const PLACEHOLDER: &'static str = "${text}";

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        if !path.exists() {
            return Err(TemplateError::Missing {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|e| TemplateError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(TemplateError::Empty {
                path: path.to_path_buf(),
            });
        }
        Ok(Self { text })
    }

    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn render(&self, body: &str) -> String {
        self.text.replace(Self::PLACEHOLDER, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_substitutes_placeholder() {
        let template = SummaryTemplate::new("Summarize this call:\n${text}\nBe brief.");
        assert_eq!(
            template.render("hello"),
            "Summarize this call:\nhello\nBe brief."
        );
    }

    #[test]
    fn test_load_trims_and_accepts_valid_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("template.txt");
        fs::write(&path, "  Summarize: ${text}  \n").unwrap();
        let template = SummaryTemplate::load(&path).unwrap();
        assert_eq!(template.render("x"), "Summarize: x");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = SummaryTemplate::load(Path::new("/nonexistent/template.txt")).unwrap_err();
        assert!(matches!(err, TemplateError::Missing { .. }));
    }

    #[test]
    fn test_load_blank_file_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("template.txt");
        fs::write(&path, "   \n\t\n").unwrap();
        let err = SummaryTemplate::load(&path).unwrap_err();
        assert!(matches!(err, TemplateError::Empty { .. }));
    }
}
