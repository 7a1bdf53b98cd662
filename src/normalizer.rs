//! Formal-register normalization engine.
//!
//! Composes the character maps, the regex rule stages, the ligature
//! expander, and the verb lexicon behind one `normalize` call. The engine is
//! reusable: every pattern and table is built once at construction, and
//! `normalize` is a pure function over that frozen state.
//!
//! Stage order is fixed regardless of which stages are enabled:
//! 1. character-map canonicalization (always)
//! 2. extra-space/half-space cleanup
//! 3. Persian typography
//! 4. digit localization
//! 5. diacritic removal
//! 6. affix spacing (compound join + half-space rules)
//! 7. punctuation spacing
//! 8. ligature expansion
//! 9. special-character removal
//! 10. repeated-character collapse (3+ down to 2)
//! 11. می/نمی prefix separation

use std::sync::Arc;

use anyhow::Result;
use regex::Regex;

use crate::chars;
use crate::config::NormalizerConfig;
use crate::lexicon::{VerbLexicon, WordLexicon};
use crate::rules::{self, LigatureExpander, RuleGroup};

pub struct Normalizer {
    config: NormalizerConfig,
    extra_space_rules: RuleGroup,
    style_rules: RuleGroup,
    diacritic_rules: RuleGroup,
    special_char_rules: RuleGroup,
    punctuation_rules: RuleGroup,
    affix_rules: RuleGroup,
    ligatures: LigatureExpander,
    mi_matcher: Regex,
    verbs: Option<Arc<VerbLexicon>>,
    words: Option<Arc<WordLexicon>>,
}

impl Normalizer {
    /// Engine with every stage enabled and the bundled lexicons.
    pub fn new() -> Result<Self> {
        Self::with_config(NormalizerConfig::default())
    }

    pub fn with_config(config: NormalizerConfig) -> Result<Self> {
        let verbs = if config.separate_mi {
            Some(Arc::new(VerbLexicon::bundled()?))
        } else {
            None
        };
        let words = if config.affix_spacing {
            Some(Arc::new(WordLexicon::bundled()?))
        } else {
            None
        };
        Self::with_lexicons(config, verbs, words)
    }

    /// Engine sharing already-loaded lexicons. The verb lexicon feeds the
    /// mi-separation stage, the word lexicon the compound-join pass; either
    /// stage degrades to a no-op without its lexicon.
    pub fn with_lexicons(
        config: NormalizerConfig,
        verbs: Option<Arc<VerbLexicon>>,
        words: Option<Arc<WordLexicon>>,
    ) -> Result<Self> {
        Ok(Self {
            config,
            extra_space_rules: rules::extra_spaces()?,
            style_rules: rules::persian_style()?,
            diacritic_rules: rules::diacritics()?,
            special_char_rules: rules::special_chars()?,
            punctuation_rules: rules::punctuation_spacing()?,
            affix_rules: rules::affix_spacing()?,
            ligatures: LigatureExpander::new()?,
            mi_matcher: Regex::new(&format!(
                "ن?می[{}]+",
                chars::PERSIAN_LETTERS
            ))?,
            verbs,
            words,
        })
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize `text`. Pure and idempotent on its own output.
    pub fn normalize(&self, text: &str) -> String {
        let mut text = chars::canonicalize(text);

        if self.config.remove_extra_spaces {
            text = self.remove_extra_spaces(&text);
        }
        if self.config.persian_style {
            text = self.persian_style(&text);
        }
        if self.config.persian_numbers {
            text = self.persian_numbers(&text);
        }
        if self.config.remove_diacritics {
            text = self.remove_diacritics(&text);
        }
        if self.config.affix_spacing {
            text = self.affix_spacing(&text);
        }
        if self.config.punctuation_spacing {
            text = self.punctuation_spacing(&text);
        }
        if self.config.unicode_replacement {
            text = self.unicode_replacement(&text);
        }
        if self.config.remove_special_chars {
            text = self.remove_special_chars(&text);
        }
        if self.config.decrease_repeated_chars {
            text = self.decrease_repeated_chars(&text);
        }
        if self.config.separate_mi {
            text = self.separate_mi(&text);
        }

        text
    }

    /// Collapse duplicate whitespace and stray half-spaces, drop kashida.
    pub fn remove_extra_spaces(&self, text: &str) -> String {
        self.extra_space_rules.apply(text)
    }

    /// Guillemets, momayez, ellipsis.
    pub fn persian_style(&self, text: &str) -> String {
        self.style_rules.apply(text)
    }

    /// Persian digits and percent sign.
    pub fn persian_numbers(&self, text: &str) -> String {
        chars::localize_digits(text)
    }

    pub fn remove_diacritics(&self, text: &str) -> String {
        self.diacritic_rules.apply(text)
    }

    pub fn remove_special_chars(&self, text: &str) -> String {
        self.special_char_rules.apply(text)
    }

    /// Collapse letters repeated 3+ times down to 2. Two repeats survive:
    /// telling a meaningful double from emphatic stretching needs semantics,
    /// so 2 is the safe floor.
    pub fn decrease_repeated_chars(&self, text: &str) -> String {
        chars::collapse_repeated(text, 2, true)
    }

    /// Fix spacing around affixes: join lexicon compounds with a half-space,
    /// then apply the half-space rules.
    pub fn affix_spacing(&self, text: &str) -> String {
        let joined = self.join_compounds(text);
        self.affix_rules.apply(&joined)
    }

    pub fn punctuation_spacing(&self, text: &str) -> String {
        self.punctuation_rules.apply(text)
    }

    /// Expand honorific/religious ligature codepoints to their word forms.
    pub fn unicode_replacement(&self, text: &str) -> String {
        self.ligatures.expand(text)
    }

    /// Detach می/نمی from the verb that follows, with a half-space.
    ///
    /// A rewrite is kept only when the resulting surface is a known verb
    /// form; otherwise the match is left untouched, so words that merely
    /// start with می (e.g. میدان) survive.
    pub fn separate_mi(&self, text: &str) -> String {
        let Some(verbs) = &self.verbs else {
            return text.to_string();
        };

        let mut result = text.to_string();
        for m in self.mi_matcher.find_iter(text) {
            let matched = m.as_str();
            let rewritten = if let Some(rest) = matched.strip_prefix("نمی") {
                format!("نمی\u{200c}{rest}")
            } else if let Some(rest) = matched.strip_prefix("می") {
                format!("می\u{200c}{rest}")
            } else {
                continue;
            };
            if verbs.is_mi_verb(&rewritten) {
                result = result.replace(matched, &rewritten);
            }
        }
        result
    }

    /// Join adjacent words with a half-space when the joined form is a known
    /// lexicon compound: زمین لرزه -> زمین‌لرزه.
    fn join_compounds(&self, text: &str) -> String {
        let Some(words) = &self.words else {
            return text.to_string();
        };

        let mut joined: Vec<String> = Vec::new();
        for part in text.split(' ') {
            if let Some(previous) = joined.last_mut() {
                if words.has_compound(previous, part) {
                    previous.push('\u{200c}');
                    previous.push_str(part);
                    continue;
                }
            }
            joined.push(part.to_string());
        }
        joined.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> Normalizer {
        Normalizer::new().unwrap()
    }

    #[test]
    fn full_pipeline() {
        let result = normalizer()
            .normalize("اِعلام کَرد : « زمین لرزه ای به بُزرگیِ 6 دهم ریشتر ...»");
        assert_eq!(
            result,
            "اعلام کرد: «زمین\u{200c}لرزه\u{200c}ای به بزرگی ۶ دهم ریشتر…»"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let normalizer = normalizer();
        for text in [
            "اِعلام کَرد : « زمین لرزه ای به بُزرگیِ 6 دهم ریشتر ...»",
            "نمیدانم چه میگفت",
            "اصلاح نويسه ها و استفاده از نیم‌فاصله پردازش را آسان مي كند",
            "سلامممم   سلامممممم!",
            "5% رشد داشته است.",
        ] {
            let once = normalizer.normalize(text);
            assert_eq!(normalizer.normalize(&once), once, "not a fixed point: {text}");
        }
    }

    #[test]
    fn separate_mi_needs_a_known_verb() {
        let normalizer = normalizer();
        assert_eq!(
            normalizer.separate_mi("نمیدانم چه میگفت"),
            "نمی\u{200c}دانم چه می\u{200c}گفت"
        );
        // میدان is a noun, not a می verb
        assert_eq!(normalizer.separate_mi("میدان آزادی"), "میدان آزادی");
    }

    #[test]
    fn repeated_chars_collapse_to_two_not_one() {
        let normalizer = normalizer();
        assert_eq!(
            normalizer.decrease_repeated_chars("سلامممم سلامممممم سلامم"),
            "سلامم سلامم سلامم"
        );
        // distinct from the splitter policy, which collapses to one
        assert_eq!(chars::collapse_repeated("سلامممم", 1, false), "سلام");
    }

    #[test]
    fn digit_localization() {
        let normalizer = normalizer();
        assert_eq!(normalizer.normalize("5% رشد داشته است."), "۵٪ رشد داشته است.");
    }

    #[test]
    fn affix_spacing_examples() {
        let normalizer = normalizer();
        assert_eq!(normalizer.affix_spacing("خانه ی پدری"), "خانه\u{200c}ی پدری");
        assert_eq!(normalizer.affix_spacing("می روم"), "می\u{200c}روم");
        assert_eq!(
            normalizer.affix_spacing("محبوب ترین ها"),
            "محبوب\u{200c}ترین\u{200c}ها"
        );
    }

    #[test]
    fn compound_join_is_lexicon_gated() {
        let normalizer = normalizer();
        assert_eq!(normalizer.affix_spacing("زمین لرزه"), "زمین\u{200c}لرزه");
        // no such compound in the lexicon: untouched
        assert_eq!(normalizer.affix_spacing("کتاب لرزه"), "کتاب لرزه");
    }

    #[test]
    fn character_canonicalization_runs_first() {
        let normalizer = normalizer();
        assert!(normalizer.config().separate_mi);
        assert_eq!(normalizer.normalize("اصلاح كرد"), "اصلاح کرد");
    }

    #[test]
    fn disabled_stage_leaves_text_alone() {
        let config = NormalizerConfig {
            persian_numbers: false,
            ..NormalizerConfig::default()
        };
        let normalizer = Normalizer::with_config(config).unwrap();
        assert_eq!(normalizer.normalize("5 کتاب"), "5 کتاب");

        let config = NormalizerConfig {
            separate_mi: false,
            ..NormalizerConfig::default()
        };
        let normalizer = Normalizer::with_config(config).unwrap();
        assert_eq!(normalizer.normalize("نمیدانم"), "نمیدانم");
    }

    #[test]
    fn ligature_expansion() {
        let normalizer = normalizer();
        assert_eq!(
            normalizer.normalize("حضرت \u{FDF4} صلوات الله علیه"),
            "حضرت محمد صلوات الله علیه"
        );
    }
}
