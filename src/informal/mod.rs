//! Colloquial-register normalization.
//!
//! Pipeline: formal normalization first, then sentence and word
//! segmentation, then per-token analysis into ordered candidate lists.
//! When space recovery is on, run-together tokens are split against the
//! known-word vocabulary before morphological analysis.

mod morph;
mod splitter;

pub use morph::MorphAnalyzer;
pub use splitter::TokenSplitter;

use std::sync::Arc;

use anyhow::Result;

use crate::config::InformalConfig;
use crate::lexicon::{InformalLexicon, VerbLexicon, WordLexicon};
use crate::normalizer::Normalizer;
use crate::segment::{
    ClassWordSegmenter, RuleSentenceSegmenter, SentenceSegmenter, WordSegmenter,
};
use crate::types::{CandidateList, NormalizedSentences};

pub struct InformalNormalizer {
    normalizer: Normalizer,
    morph: MorphAnalyzer,
    splitter: Option<TokenSplitter>,
    sentence_segmenter: Box<dyn SentenceSegmenter>,
    word_segmenter: Box<dyn WordSegmenter>,
}

impl InformalNormalizer {
    /// Engine with default options and the bundled lexicons.
    pub fn new() -> Result<Self> {
        Self::with_config(InformalConfig::default())
    }

    pub fn with_config(config: InformalConfig) -> Result<Self> {
        let words = Arc::new(WordLexicon::bundled()?);
        let verbs = Arc::new(VerbLexicon::bundled()?);
        let informal = Arc::new(InformalLexicon::bundled()?);
        Self::with_lexicons(config, words, verbs, informal)
    }

    /// Engine over already-loaded lexicons; the formal normalizer shares
    /// them, so nothing is loaded twice.
    pub fn with_lexicons(
        config: InformalConfig,
        words: Arc<WordLexicon>,
        verbs: Arc<VerbLexicon>,
        informal: Arc<InformalLexicon>,
    ) -> Result<Self> {
        let normalizer = Normalizer::with_lexicons(
            config.normalizer.clone(),
            Some(verbs.clone()),
            Some(words.clone()),
        )?;
        let splitter = config
            .recover_missing_spaces
            .then(|| TokenSplitter::new(&words, &verbs, &informal));
        let morph = MorphAnalyzer::new(words, verbs, informal);

        Ok(Self {
            normalizer,
            morph,
            splitter,
            sentence_segmenter: Box::new(RuleSentenceSegmenter::new()?),
            word_segmenter: Box::new(ClassWordSegmenter),
        })
    }

    /// Swap in caller-provided segmenters.
    pub fn with_segmenters(
        mut self,
        sentences: Box<dyn SentenceSegmenter>,
        words: Box<dyn WordSegmenter>,
    ) -> Self {
        self.sentence_segmenter = sentences;
        self.word_segmenter = words;
        self
    }

    /// Normalize colloquial text into sentences of tokens, each token
    /// carrying its ordered formal candidate renderings.
    pub fn normalize(&self, text: &str) -> NormalizedSentences {
        let text = self.normalizer.normalize(text);
        self.sentence_segmenter
            .sentences(&text)
            .iter()
            .map(|sentence| {
                self.word_segmenter
                    .words(sentence)
                    .iter()
                    .map(|token| self.token_candidates(token))
                    .collect()
            })
            .collect()
    }

    /// Candidate renderings for one already-normalized token.
    pub fn token_candidates(&self, token: &str) -> CandidateList {
        if let Some(splitter) = &self.splitter {
            let split = splitter.split(token);
            if split != token {
                let mut list = CandidateList::single(split);
                list.push(token);
                return list;
            }
        }
        self.morph.candidates(token)
    }

    /// The formal engine this pipeline runs first.
    pub fn formal(&self) -> &Normalizer {
        &self.normalizer
    }
}
