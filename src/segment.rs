//! Sentence and word segmentation seams.
//!
//! Segmenters are consumed as black boxes by the colloquial pipeline, so
//! they sit behind traits and are injected at construction — no module-level
//! default instances. The bundled implementations cover ordinary Persian
//! prose.

use anyhow::{Context, Result};
use regex::Regex;

use crate::chars::ZWNJ;

pub trait SentenceSegmenter: Send + Sync {
    fn sentences(&self, text: &str) -> Vec<String>;
}

pub trait WordSegmenter: Send + Sync {
    fn words(&self, sentence: &str) -> Vec<String>;
}

/// Splits sentences after runs of sentence-ending punctuation.
pub struct RuleSentenceSegmenter {
    boundary: Regex,
}

impl RuleSentenceSegmenter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            boundary: Regex::new(r"([!\.\?⸮؟]+)[ \n]+")
                .context("failed to compile sentence boundary pattern")?,
        })
    }
}

impl SentenceSegmenter for RuleSentenceSegmenter {
    fn sentences(&self, text: &str) -> Vec<String> {
        let marked = self.boundary.replace_all(text, "${1}\n\n");
        marked
            .split("\n\n")
            .map(|sentence| sentence.replace('\n', " ").trim().to_string())
            .filter(|sentence| !sentence.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Word,
    Punctuation,
    Whitespace,
}

fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Whitespace
    } else if c.is_alphanumeric()
        || c == ZWNJ
        || c == '\u{200e}'
        // combining marks stay glued to their base letter
        || ('\u{064B}'..='\u{0670}').contains(&c)
    {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

/// Splits a sentence into word and punctuation tokens by character class,
/// keeping half-spaces inside words.
pub struct ClassWordSegmenter;

impl WordSegmenter for ClassWordSegmenter {
    fn words(&self, sentence: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut current_class = CharClass::Whitespace;

        for c in sentence.chars() {
            let class = classify(c);
            if class != current_class && !current.is_empty() {
                if current_class != CharClass::Whitespace {
                    tokens.push(std::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            current.push(c);
            current_class = class;
        }
        if !current.is_empty() && current_class != CharClass::Whitespace {
            tokens.push(current);
        }

        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentences_split_on_ending_punctuation() {
        let segmenter = RuleSentenceSegmenter::new().unwrap();
        assert_eq!(
            segmenter.sentences("جدا کردن ساده است. تقریبا البته!"),
            vec!["جدا کردن ساده است.", "تقریبا البته!"]
        );
    }

    #[test]
    fn trailing_punctuation_stays_with_its_sentence() {
        let segmenter = RuleSentenceSegmenter::new().unwrap();
        let sentences = segmenter.sentences("اول؟ دوم.");
        assert_eq!(sentences, vec!["اول؟", "دوم."]);
    }

    #[test]
    fn words_split_off_punctuation() {
        let segmenter = ClassWordSegmenter;
        assert_eq!(
            segmenter.words("سلام، دنیا!"),
            vec!["سلام", "،", "دنیا", "!"]
        );
    }

    #[test]
    fn half_space_stays_inside_token() {
        let segmenter = ClassWordSegmenter;
        assert_eq!(
            segmenter.words(&format!("می{ZWNJ}روم خانه")),
            vec![format!("می{ZWNJ}روم"), "خانه".to_string()]
        );
    }

    #[test]
    fn guillemets_are_separate_tokens() {
        let segmenter = ClassWordSegmenter;
        assert_eq!(segmenter.words("«کتاب»"), vec!["«", "کتاب", "»"]);
    }
}
