//! Persian text normalization for formal and colloquial registers.
//!
//! Two engines share one frozen set of lexicons:
//!
//! - [`Normalizer`] canonicalizes formal text through a fixed-order rule
//!   pipeline: character-map translation, spacing cleanup, Persian
//!   typography, digit localization, diacritic/special-character removal,
//!   affix and punctuation spacing, ligature expansion, repeated-character
//!   collapsing, and می/نمی prefix separation.
//! - [`InformalNormalizer`] runs the formal pipeline, segments the text,
//!   and renders each colloquial token as an ordered list of formal
//!   candidates via morphological analysis — with optional recovery of
//!   missing spaces in run-together tokens.
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! let normalizer = paknevis::Normalizer::new()?;
//! assert_eq!(
//!     normalizer.normalize("نمیدانم چه میگفت"),
//!     "نمی\u{200c}دانم چه می\u{200c}گفت"
//! );
//!
//! let informal = paknevis::InformalNormalizer::new()?;
//! let sentences = informal.normalize("می‌رم خونه");
//! assert!(sentences[0][0].contains("می\u{200c}روم"));
//! # Ok(())
//! # }
//! ```
//!
//! Lexicons load once at construction (bundled tables or caller-supplied
//! files) and are immutable afterwards; every engine is `Send + Sync` and
//! every `normalize` call is a pure function of the input and that frozen
//! state.

mod chars;
mod config;
mod informal;
mod lexicon;
mod normalizer;
mod rules;
mod segment;
mod types;

pub use config::{InformalConfig, NormalizerConfig};
pub use informal::{InformalNormalizer, MorphAnalyzer, TokenSplitter};
pub use lexicon::{InformalLexicon, VerbLexicon, WordLexicon};
pub use normalizer::Normalizer;
pub use segment::{
    ClassWordSegmenter, RuleSentenceSegmenter, SentenceSegmenter, WordSegmenter,
};
pub use types::{CandidateList, NormalizedSentences};
