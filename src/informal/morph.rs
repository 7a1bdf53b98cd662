//! Morphological analysis of single colloquial tokens.
//!
//! Resolution order, first hit wins:
//! 1. exception table (idiomatic high-frequency forms)
//! 2. verb analysis: exact past-stem hit, then suffix/prefix decomposition
//!    validated against the verb lexicons
//! 3. noun analysis: direct lexicon hit, then suffix stripping (two levels)
//!    with formal suffix reattachment
//! 4. the literal token
//!
//! Verb endings are tried before noun suffixes because they overlap: a verb
//! reading like می‌رم must not be decomposed as noun + possessive.

use std::collections::HashMap;
use std::sync::Arc;

use crate::chars::{self, ZWNJ};
use crate::lexicon::{InformalLexicon, VerbLexicon, WordLexicon};
use crate::types::CandidateList;

/// Verb endings by priority: compound endings strictly before their bare
/// tails, so the most specific strip wins a slot early in candidate order.
const VERB_ENDINGS: [&str; 22] = [
    "یم", "دم", "دیم", "ید", "دی", "دید", "ند", "دن", "دند", "ین", "دین",
    "ست", "ستم", "ستی", "ستیم", "ستید", "ستند", "م", "ی", "ه", "د", "ن",
];

/// Noun/word suffixes by priority, longest and most specific first.
const WORD_ENDINGS: [&str; 35] = [
    "هاست", "هایی", "هایم", "ترین", "ایی", "انی", "شان", "شون", "است",
    "تان", "تون", "مان", "مون", "هام", "هاش", "های", "طور", "ها", "تر",
    "ئی", "یی", "یم", "ام", "ای", "ان", "هم", "رو", "یت", "ه", "ی", "ش",
    "و", "ا", "ت", "م",
];

/// Idiomatic informal forms mapped straight to their formal renderings.
/// These would be mishandled by the generic rules: most are either
/// ambiguous contractions or proper nouns that look like conjugations.
const EXCEPTION_ENTRIES: &[(&str, &[&str])] = &[
    ("ب", &["به"]),
    ("ک", &["که"]),
    ("ش", &["اش"]),
    ("بش", &["بهش"]),
    ("رو", &["را", "رو"]),
    ("پایتون", &["پایتون"]),
    ("دست", &["دست"]),
    ("دستی", &["دستی"]),
    ("دستم", &["دستم"]),
    ("دین", &["دین"]),
    ("شین", &["شین"]),
    ("سراتو", &["سراتو"]),
    ("فالو", &["فالو"]),
    ("هرجا", &["هرجا"]),
    ("میدان", &["میدان"]),
    ("میدون", &["میدان"]),
    ("کفا", &["کفا"]),
    ("ویا", &["و یا"]),
    ("نشد", &["نشد"]),
    ("شو", &["شو"]),
    ("مشیا", &["مشیا"]),
    ("پلاسما", &["پلاسما"]),
    ("فیلیمو", &["فیلیمو"]),
    ("پاشو", &["پاشو"]),
    ("میر", &["میر"]),
    ("بارم", &["بار هم", "بارم"]),
    ("برند", &["برند"]),
    ("کنه", &["کند"]),
    ("بتونه", &["بتواند"]),
    ("باشه", &["باشد"]),
    ("بخوان", &["بخوان"]),
    ("بدم", &["بدم"]),
    ("برم", &["برم"]),
    ("بده", &["بده"]),
    ("نده", &["نده"]),
    ("شهرو", &["شهرو"]),
    ("شیرو", &["شیرو"]),
    ("نگذاشته", &["نگذاشته"]),
    ("نگرفته", &["نگرفته"]),
    ("نمیشناخته", &["نمی\u{200c}شناخته"]),
    ("نمی\u{200c}شناخته", &["نمی\u{200c}شناخته"]),
    ("بشین", &["بشین"]),
    ("هارو", &["ها را"]),
    ("مارو", &["ما را"]),
    ("میخواسته", &["می\u{200c}خواسته"]),
    ("می\u{200c}خواسته", &["می\u{200c}خواسته"]),
    ("نمیخواسته", &["نمی\u{200c}خواسته"]),
    ("نمی\u{200c}خواسته", &["نمی\u{200c}خواسته"]),
    ("میتوانسته", &["می\u{200c}توانسته"]),
    ("می\u{200c}توانسته", &["می\u{200c}توانسته"]),
    ("میرفته", &["می\u{200c}رفته"]),
    ("می\u{200c}رفته", &["می\u{200c}رفته"]),
    ("نشین", &["نشین"]),
    ("انا", &["انا"]),
    ("خونی", &["خونی"]),
    ("خون", &["خون"]),
    ("یالا", &["یالا"]),
    ("میخواند", &["می\u{200c}خواند"]),
    ("می\u{200c}خواند", &["می\u{200c}خواند"]),
    ("نمیخواند", &["نمی\u{200c}خواند"]),
    ("نمی\u{200c}خواند", &["نمی\u{200c}خواند"]),
    ("میده", &["می\u{200c}دهد"]),
    ("می\u{200c}ده", &["می\u{200c}دهد"]),
    ("میشه", &["می\u{200c}شود"]),
    ("می\u{200c}شه", &["می\u{200c}شود"]),
    ("میشد", &["می\u{200c}شد"]),
    ("می\u{200c}شد", &["می\u{200c}شد"]),
    ("میشدم", &["می\u{200c}شدم"]),
    ("می\u{200c}شدم", &["می\u{200c}شدم"]),
    ("نمیشد", &["نمی\u{200c}شد"]),
    ("نمی\u{200c}شد", &["نمی\u{200c}شد"]),
    ("بردم", &["بردم"]),
    ("بره", &["بره", "برود"]),
    ("شم", &["بشوم"]),
    ("اوست", &["اوست"]),
    ("بیا", &["بیا"]),
    ("نیا", &["نیا"]),
    ("میاد", &["می\u{200c}آید"]),
    ("نشدی", &["نشدی"]),
    ("بخواند", &["بخواند"]),
    ("سیا", &["سیا"]),
    ("میدید", &["می\u{200c}دید"]),
    ("می\u{200c}دید", &["می\u{200c}دید"]),
    ("وا", &["وا"]),
    ("برگشته", &["برگشته"]),
    ("میخواست", &["می\u{200c}خواست"]),
    ("می\u{200c}خواست", &["می\u{200c}خواست"]),
];

lazy_static::lazy_static! {
    static ref EXCEPTIONS: HashMap<&'static str, &'static [&'static str]> =
        EXCEPTION_ENTRIES.iter().copied().collect();
}

/// One way of reading a token as prefix + root + ending.
#[derive(Debug, Clone)]
struct VerbReading {
    root: String,
    prefix: &'static str,
    ending: &'static str,
}

pub struct MorphAnalyzer {
    words: Arc<WordLexicon>,
    verbs: Arc<VerbLexicon>,
    informal: Arc<InformalLexicon>,
}

impl MorphAnalyzer {
    pub fn new(
        words: Arc<WordLexicon>,
        verbs: Arc<VerbLexicon>,
        informal: Arc<InformalLexicon>,
    ) -> Self {
        Self {
            words,
            verbs,
            informal,
        }
    }

    /// Ordered formal candidate renderings for one token.
    ///
    /// Never empty: the literal token is the last-resort fallback, unless an
    /// exception-table or exact past-stem hit fully supersedes it.
    pub fn candidates(&self, word: &str) -> CandidateList {
        if let Some(forms) = EXCEPTIONS.get(word) {
            return forms.iter().map(|form| form.to_string()).collect();
        }

        if let Some(past) = self.verbs.past(word) {
            return CandidateList::single(past);
        }

        let verb_candidates = self.analyze_verb(word);
        if !verb_candidates.is_empty() {
            let mut list: CandidateList = verb_candidates.into_iter().collect();
            list.push(word);
            return list;
        }

        let (mut list, direct_hit) = self.analyze_noun(word);
        if direct_hit {
            return list;
        }
        if list.contains(word) {
            list.demote(word);
        } else {
            list.push(word);
        }
        list
    }

    /// Decompose `word` as an informal verb and reconstruct formal surfaces.
    ///
    /// Returns nothing when `word` cannot be a verb: it is a mapped informal
    /// word, or a lexicon word that does not end in ن (so no infinitive or
    /// colloquial plural reading).
    fn analyze_verb(&self, word: &str) -> Vec<String> {
        if self.informal.has_word(word) {
            return Vec::new();
        }
        if self.words.contains(word) && !word.ends_with('ن') {
            return Vec::new();
        }

        // Every matching ending contributes a reading; the bare word rides
        // along with an empty ending.
        let mut readings: Vec<(String, &'static str)> = Vec::new();
        for ending in VERB_ENDINGS {
            if let Some(stem) = word.strip_suffix(ending) {
                match ending {
                    // colloquial second plural: دارین -> دارید
                    "ین" => readings.push((stem.to_string(), "ید")),
                    // ambiguous: plural marker or third plural
                    "ن" => {
                        readings.push((stem.to_string(), "ن"));
                        readings.push((stem.to_string(), "ند"));
                    }
                    // a root-final د already marks past tense; do not stack
                    "ه" => {
                        if !stem.is_empty() && !stem.ends_with('د') {
                            readings.push((stem.to_string(), "د"));
                        }
                        readings.push((stem.to_string(), "ه"));
                    }
                    _ => readings.push((stem.to_string(), ending)),
                }
            }
        }
        readings.push((word.to_string(), ""));

        let mut analyses: Vec<VerbReading> = Vec::new();
        let mut fallbacks: Vec<VerbReading> = Vec::new();
        for (stem, ending) in readings {
            analyses.push(Self::read_prefix(stem, ending, &mut fallbacks));
        }
        // The ambiguous single-letter prefixes may be part of the root; their
        // undecomposed readings are retried after the prefixed ones.
        analyses.extend(fallbacks);

        let mut candidates: Vec<String> = Vec::new();
        for reading in &analyses {
            let root = reading.root.trim_start_matches([ZWNJ, '\u{200e}']);
            if root.is_empty() {
                continue;
            }
            let mut roots: Vec<&str> = Vec::new();
            if let Some(past) = self.verbs.past(root) {
                roots.push(past);
            }
            if let Some(present) = self.verbs.present(root) {
                roots.push(present);
            }
            for mapped in roots {
                let mut surface = String::from(reading.prefix);
                if reading.prefix.ends_with("می") {
                    surface.push(ZWNJ);
                }
                surface.push_str(mapped);
                surface.push_str(reading.ending);
                if !candidates.contains(&surface) {
                    candidates.push(surface);
                }
            }
        }
        candidates
    }

    /// Strip a verb prefix off `stem`. بر compounds with the other prefixes
    /// and is examined recursively; for the ambiguous ن/ب (and bare بر) a
    /// fallback reading without the prefix is queued.
    fn read_prefix(
        stem: String,
        ending: &'static str,
        fallbacks: &mut Vec<VerbReading>,
    ) -> VerbReading {
        if let Some(rest) = stem.strip_prefix("بر") {
            let (prefix, inner) = if let Some(inner) = rest.strip_prefix("نمی") {
                ("برنمی", inner)
            } else if let Some(inner) = rest.strip_prefix("می") {
                ("برمی", inner)
            } else if let Some(inner) = rest.strip_prefix("ن") {
                ("برن", inner)
            } else if let Some(inner) = rest.strip_prefix("بی") {
                ("بربی", inner)
            } else if let Some(inner) = rest.strip_prefix("ب") {
                ("برب", inner)
            } else {
                fallbacks.push(VerbReading {
                    root: stem.clone(),
                    prefix: "",
                    ending,
                });
                ("بر", rest)
            };
            let root = if inner.is_empty() { stem.clone() } else { inner.to_string() };
            return VerbReading {
                root,
                prefix,
                ending,
            };
        }

        if let Some(rest) = stem.strip_prefix("نمی") {
            return VerbReading {
                root: rest.to_string(),
                prefix: "نمی",
                ending,
            };
        }
        if let Some(rest) = stem.strip_prefix("می") {
            return VerbReading {
                root: rest.to_string(),
                prefix: "می",
                ending,
            };
        }
        if let Some(rest) = stem.strip_prefix("ن") {
            fallbacks.push(VerbReading {
                root: stem.clone(),
                prefix: "",
                ending,
            });
            return VerbReading {
                root: rest.to_string(),
                prefix: "ن",
                ending,
            };
        }
        if let Some(rest) = stem.strip_prefix("بی") {
            return VerbReading {
                root: rest.to_string(),
                prefix: "بی",
                ending,
            };
        }
        if let Some(rest) = stem.strip_prefix("ب") {
            fallbacks.push(VerbReading {
                root: stem.clone(),
                prefix: "",
                ending,
            });
            return VerbReading {
                root: rest.to_string(),
                prefix: "ب",
                ending,
            };
        }

        VerbReading {
            root: stem,
            prefix: "",
            ending,
        }
    }

    /// Noun/word analysis: direct hit, then suffix stripping two levels deep
    /// for stacked suffixes (plural + possessive).
    ///
    /// The boolean marks a direct dictionary hit, which supersedes the
    /// literal-input fallback.
    fn analyze_noun(&self, word: &str) -> (CandidateList, bool) {
        let word = word.trim_end_matches([ZWNJ, '\u{200e}']);

        let mut stems: Vec<(String, Vec<&'static str>)> = Vec::new();

        if self.words.contains(word) || self.informal.has_word(word) {
            if self.words.contains(word) {
                stems.push((word.to_string(), Vec::new()));
            }
            if let Some(formal) = self.informal.word(word) {
                stems.push((formal.to_string(), Vec::new()));
            }
            return (self.reattach_all(stems), true);
        }

        let mut unresolved: Vec<(String, Vec<&'static str>)> = Vec::new();
        for ending in WORD_ENDINGS {
            if let Some(stem) = word.strip_suffix(ending) {
                if self.words.contains(stem) || self.informal.has_word(stem) {
                    if self.words.contains(stem) {
                        stems.push((stem.to_string(), vec![ending]));
                    }
                    if let Some(formal) = self.informal.word(stem) {
                        stems.push((formal.to_string(), vec![ending]));
                    }
                } else {
                    unresolved.push((stem.to_string(), vec![ending]));
                }
            }
        }

        for ending in WORD_ENDINGS {
            for (mid_stem, mid_endings) in &unresolved {
                if let Some(stem) = mid_stem.strip_suffix(ending) {
                    let chain = |first: &'static str| {
                        let mut chain = vec![first];
                        chain.extend(mid_endings.iter().copied());
                        chain
                    };
                    if self.words.contains(stem) {
                        stems.push((stem.to_string(), chain(ending)));
                    }
                    if let Some(formal) = self.informal.word(stem) {
                        stems.push((formal.to_string(), chain(ending)));
                    }
                }
            }
        }

        (self.reattach_all(stems), false)
    }

    fn reattach_all(&self, stems: Vec<(String, Vec<&'static str>)>) -> CandidateList {
        let mut list = CandidateList::new();
        for (stem, suffixes) in stems {
            for candidate in reattach_suffixes(&stem, &suffixes) {
                list.push(candidate);
            }
        }
        list
    }
}

/// Rebuild the formal surface from a stem and its stripped suffix chain
/// (inner suffix first).
///
/// Informal suffix spellings are rewritten to formal ones; a half-space is
/// inserted before ها/هایم when the stem's last letter joins forward; the
/// ambiguous outermost ا, و, رو and ه expand to their alternative readings.
fn reattach_suffixes(stem: &str, suffixes: &[&'static str]) -> Vec<String> {
    let mut suffixes: Vec<&str> = suffixes.to_vec();
    if suffixes.len() > 1 {
        if suffixes[0] == "ه" && suffixes[1] == "ا" {
            suffixes[0] = "ها";
            suffixes.remove(1);
        } else if suffixes[0] == "ه" && suffixes[1] == "است" {
            suffixes[0] = "هاست";
            suffixes.remove(1);
        } else if suffixes[0] == "ت" && suffixes[1] == "ا" {
            suffixes[0] = "تا";
            suffixes.remove(1);
        }
    }

    let last = suffixes.last().copied().unwrap_or("");
    let mut main = stem.to_string();
    let mut second: Option<String> = None;
    let mut third: Option<String> = None;

    for suffix in &suffixes {
        match *suffix {
            "شون" => main.push_str("شان"),
            "تون" => main.push_str("تان"),
            "مون" => main.push_str("مان"),
            "هام" => {
                push_plural_joint(&mut main);
                main.push_str("هایم");
            }
            "ها" => {
                push_plural_joint(&mut main);
                main.push_str("ها");
            }
            "ا" if last == "ا" && !main.ends_with('ه') => {
                push_plural_joint(&mut main);
                main.push_str("ها");
            }
            "و" if last == "و" => {
                second = Some(format!("{main} و"));
                main.push_str(" را");
            }
            "رو" if last == "رو" => main.push_str(" را"),
            "ه" if last == "ه" => {
                second = Some(format!("{main}ه"));
                third = Some(format!("{main} است"));
                main.push_str("ه است");
            }
            other => main.push_str(other),
        }
    }

    let mut out = vec![main];
    out.extend(second);
    out.extend(third);
    out
}

fn push_plural_joint(main: &mut String) {
    if main.chars().last().is_some_and(chars::joins_following) {
        main.push(ZWNJ);
    }
}
