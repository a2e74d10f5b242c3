use std::num::NonZeroU32;
use std::path::Path;

use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel, Special};
use llama_cpp_2::sampling::LlamaSampler;

use crate::summary::domain::summarizer::TextSummarizer;
use crate::summary::domain::template::SummaryTemplate;
use crate::summary::domain::truncation::truncate_middle;

const CONTEXT_SIZE: u32 = 4096;
/// Generation cap, kept proportional to the context window.
const MAX_SUMMARY_TOKENS: usize = 512;
/// Context share reserved for the rendered template and chat scaffolding.
const TEMPLATE_RESERVE: usize = 256;

/// Summarization capability backed by a local GGUF model via llama.cpp.
///
/// The backend and model load once; a fresh context is created per call.
/// Transcripts that exceed the context budget are bounded with
/// `truncate_middle` before the prompt is rendered.
pub struct LlamaSummarizer {
    backend: LlamaBackend,
    model: LlamaModel,
    template: SummaryTemplate,
}

// Safety: the backend and model are immutable after initialization; each
// summarize call builds its own context.
unsafe impl Send for LlamaSummarizer {}

impl LlamaSummarizer {
    pub fn from_file(
        model_path: &Path,
        template: SummaryTemplate,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if !model_path.exists() {
            return Err(format!("summary model not found: {}", model_path.display()).into());
        }
        let backend = LlamaBackend::init()
            .map_err(|e| format!("failed to initialize llama backend: {e:?}"))?;
        let model =
            LlamaModel::load_from_file(&backend, model_path, &LlamaModelParams::default())
                .map_err(|e| format!("failed to load GGUF model: {e:?}"))?;
        Ok(Self {
            backend,
            model,
            template,
        })
    }

    /// Re-encode `text` so the prompt fits the context window, dropping the
    /// middle of over-long transcripts.
    fn bounded_text(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
        let tokens = self
            .model
            .str_to_token(text, AddBos::Never)
            .map_err(|e| format!("failed to tokenize transcript: {e:?}"))?;
        let budget = CONTEXT_SIZE as usize - MAX_SUMMARY_TOKENS - TEMPLATE_RESERVE;
        if tokens.len() <= budget {
            return Ok(text.to_string());
        }

        let kept = truncate_middle(&tokens, budget);
        log::debug!(
            "transcript truncated from {} to {} tokens",
            tokens.len(),
            kept.len()
        );
        let mut rebuilt = String::new();
        for token in &kept {
            if let Ok(piece) = self.model.token_to_str(*token, Special::Tokenize) {
                rebuilt.push_str(&piece);
            }
        }
        Ok(rebuilt)
    }
}

impl TextSummarizer for LlamaSummarizer {
    fn summarize(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
        let body = self.bounded_text(text)?;
        let prompt = format!(
            "<|im_start|>user\n{}<|im_end|>\n<|im_start|>assistant\n",
            self.template.render(&body)
        );

        let ctx_params = LlamaContextParams::default().with_n_ctx(NonZeroU32::new(CONTEXT_SIZE));
        let mut ctx = self
            .model
            .new_context(&self.backend, ctx_params)
            .map_err(|e| format!("failed to create context: {e:?}"))?;

        let tokens = self
            .model
            .str_to_token(&prompt, AddBos::Always)
            .map_err(|e| format!("failed to tokenize prompt: {e:?}"))?;

        let mut batch = LlamaBatch::new(CONTEXT_SIZE as usize, 1);
        let last_index = tokens.len() - 1;
        for (i, token) in tokens.iter().enumerate() {
            batch
                .add(*token, i as i32, &[0], i == last_index)
                .map_err(|e| format!("failed to add prompt token: {e:?}"))?;
        }
        ctx.decode(&mut batch)
            .map_err(|e| format!("failed to decode prompt: {e:?}"))?;

        let mut sampler = LlamaSampler::chain_simple([
            LlamaSampler::temp(0.6),
            LlamaSampler::top_k(50),
            LlamaSampler::top_p(0.9, 1),
            LlamaSampler::dist(42),
        ]);

        let mut output = String::new();
        let mut n_cur = tokens.len() as i32;
        for _ in 0..MAX_SUMMARY_TOKENS {
            let token = sampler.sample(&ctx, batch.n_tokens() - 1);
            sampler.accept(token);

            if self.model.is_eog_token(token) {
                break;
            }
            let piece = self
                .model
                .token_to_str(token, Special::Tokenize)
                .unwrap_or_default();
            if piece.contains("<|im_end|>") || piece.contains("<|endoftext|>") {
                break;
            }
            output.push_str(&piece);

            batch.clear();
            batch
                .add(token, n_cur, &[0], true)
                .map_err(|e| format!("failed to add generated token: {e:?}"))?;
            n_cur += 1;
            ctx.decode(&mut batch)
                .map_err(|e| format!("failed to decode: {e:?}"))?;
        }

        Ok(output.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_file_missing_model_errors() {
        let result = LlamaSummarizer::from_file(
            Path::new("/nonexistent/model.gguf"),
            SummaryTemplate::new("Summarize: ${text}"),
        );
        let err = result.err().expect("expected missing-model error");
        assert!(err.to_string().contains("not found"));
    }
}
