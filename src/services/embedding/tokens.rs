//! Token accounting for embedding batches.

use tokenizers::Tokenizer;

/// Counts tokens the way the embedding model will see them.
pub struct TokenCounter {
    tokenizer: Tokenizer,
}

impl TokenCounter {
    /// Load a tokenizer from the Hugging Face hub.
    ///
    /// Blocks on network and disk; call from a blocking context.
    pub fn from_pretrained(identifier: &str) -> Result<Self, tokenizers::Error> {
        let tokenizer = Tokenizer::from_pretrained(identifier, None)?;
        Ok(Self { tokenizer })
    }

    pub fn from_tokenizer(tokenizer: Tokenizer) -> Self {
        Self { tokenizer }
    }

    /// Total tokens across `texts`, without special tokens.
    pub fn count(&self, texts: &[String]) -> Result<usize, tokenizers::Error> {
        texts.iter().try_fold(0, |total, text| -> Result<usize, tokenizers::Error> {
            let encoding = self.tokenizer.encode(text.as_str(), false)?;
            Ok(total + encoding.get_ids().len())
        })
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const WORD_LEVEL: &str = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"[UNK]": 0, "const": 1, "a": 2, "=": 3},
            "unk_token": "[UNK]"
        }
    }"#;

    fn word_counter() -> TokenCounter {
        TokenCounter::from_tokenizer(Tokenizer::from_str(WORD_LEVEL).unwrap())
    }

    #[test]
    fn test_count_sums_chunks() {
        let counter = word_counter();
        let texts = vec!["const a = 1".to_string(), "a".to_string()];
        assert_eq!(counter.count(&texts).unwrap(), 5);
    }

    #[test]
    fn test_count_empty() {
        assert_eq!(word_counter().count(&[]).unwrap(), 0);
    }
}
