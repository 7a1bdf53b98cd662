//! Ordered regex rule stages for the formal pipeline.
//!
//! Every pattern is compiled at construction time; a compile failure is a
//! construction error, never a call-time one. Stage contents mirror standard
//! Persian orthography fixes: spacing cleanup, typography, diacritic and
//! special-character removal, punctuation and affix spacing, and ligature
//! expansion.

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use regex::Regex;

use crate::chars::PERSIAN_LETTERS;

/// Punctuation that attaches to the preceding word (no space before it).
const PUNC_AFTER: &str = r"\.:!،؛؟»\]\)\}";
/// Punctuation that attaches to the following word (no space after it).
const PUNC_BEFORE: &str = r"«\[\(\{";

/// Combining marks outside the ordinary diacritic set: Arabic superscripts,
/// subscripts, Quranic annotation signs, and ornament codepoints.
const SPECIAL_CHARS_CLASS: &str = "\u{0605}\u{0653}\u{0654}\u{0655}\u{0656}\u{0657}\u{0658}\u{0659}\u{065A}\u{065B}\u{065C}\u{065D}\u{065E}\u{065F}\u{0670}\u{0610}\u{0611}\u{0612}\u{0613}\u{0614}\u{0615}\u{0616}\u{0618}\u{0619}\u{061A}\u{061E}\u{06D4}\u{06D6}\u{06D7}\u{06D8}\u{06D9}\u{06DA}\u{06DB}\u{06DC}\u{06DD}\u{06DE}\u{06DF}\u{06E0}\u{06E1}\u{06E2}\u{06E3}\u{06E4}\u{06E5}\u{06E6}\u{06E7}\u{06E8}\u{06E9}\u{06EA}\u{06EB}\u{06EC}\u{06ED}\u{06FD}\u{06FE}\u{08AD}\u{08D4}\u{08D5}\u{08D6}\u{08D7}\u{08D8}\u{08D9}\u{08DA}\u{08DB}\u{08DC}\u{08DD}\u{08DE}\u{08DF}\u{08E0}\u{08E1}\u{08E2}\u{08E3}\u{08E4}\u{08E5}\u{08E6}\u{08E7}\u{08E8}\u{08E9}\u{08EA}\u{08EB}\u{08EC}\u{08ED}\u{08EE}\u{08EF}\u{08F0}\u{08F1}\u{08F2}\u{08F3}\u{08F4}\u{08F5}\u{08F6}\u{08F7}\u{08F8}\u{08F9}\u{08FA}\u{08FB}\u{08FC}\u{08FD}\u{08FE}\u{08FF}\u{FBB2}\u{FBB3}\u{FBB4}\u{FBB5}\u{FBB6}\u{FBB7}\u{FBB8}\u{FBB9}\u{FBBA}\u{FBBB}\u{FBBC}\u{FBBD}\u{FBBE}\u{FBBF}\u{FBC0}\u{FBC1}\u{FC5E}\u{FC5F}\u{FC60}\u{FC61}\u{FC62}\u{FC63}\u{FCF2}\u{FCF3}\u{FCF4}\u{FD3E}\u{FD3F}\u{FE70}\u{FE71}\u{FE72}\u{FE76}\u{FE77}\u{FE78}\u{FE79}\u{FE7A}\u{FE7B}\u{FE7C}\u{FE7D}\u{FE7E}\u{FE7F}\u{FDFA}\u{FDFB}";

/// A single pattern/replacement rewrite.
pub struct NormalizationRule {
    pattern: Regex,
    replacement: String,
    /// Re-apply until the text stops changing. Needed where the original
    /// rule relied on zero-width context: the regex crate has no look-around,
    /// so the context character is consumed and chained affixes only settle
    /// in a later pass.
    repeat: bool,
}

impl NormalizationRule {
    fn new(pattern: &str, replacement: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .with_context(|| format!("invalid rule pattern: {pattern}"))?,
            replacement: replacement.to_string(),
            repeat: false,
        })
    }

    fn repeated(pattern: &str, replacement: &str) -> Result<Self> {
        let mut rule = Self::new(pattern, replacement)?;
        rule.repeat = true;
        Ok(rule)
    }

    pub fn apply(&self, text: &str) -> String {
        let mut current = self
            .pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned();
        while self.repeat {
            let next = self
                .pattern
                .replace_all(&current, self.replacement.as_str())
                .into_owned();
            if next == current {
                break;
            }
            current = next;
        }
        current
    }
}

/// A named, ordered group of rules. Groups can be toggled individually but
/// their relative order in the pipeline is fixed.
pub struct RuleGroup {
    name: &'static str,
    rules: Vec<NormalizationRule>,
}

impl RuleGroup {
    fn new(name: &'static str, rules: Vec<NormalizationRule>) -> Self {
        Self { name, rules }
    }

    pub fn apply(&self, text: &str) -> String {
        let result = self
            .rules
            .iter()
            .fold(text.to_string(), |text, rule| rule.apply(&text));
        if result != text {
            tracing::trace!(stage = self.name, "rule stage rewrote text");
        }
        result
    }
}

/// Extra spaces, newlines, stray half-spaces, kashida, carriage returns.
pub fn extra_spaces() -> Result<RuleGroup> {
    Ok(RuleGroup::new(
        "extra_spaces",
        vec![
            NormalizationRule::new(" {2,}", " ")?,
            NormalizationRule::new("\n{3,}", "\n\n")?,
            NormalizationRule::new("\u{200c}{2,}", "\u{200c}")?,
            NormalizationRule::new("\u{200c}+ ", " ")?,
            NormalizationRule::new(" \u{200c}+", " ")?,
            NormalizationRule::new("[ـ\r]", "")?,
        ],
    ))
}

/// Persian typography: guillemets, momayez decimal separator, ellipsis.
pub fn persian_style() -> Result<RuleGroup> {
    Ok(RuleGroup::new(
        "persian_style",
        vec![
            NormalizationRule::new("\"([^\n\"]+)\"", "«${1}»")?,
            NormalizationRule::new(r"(\d)\.(\d)", "${1}٫${2}")?,
            NormalizationRule::new(r" ?\.\.\.", "…")?,
        ],
    ))
}

/// Fathatan through sukun (U+064B..U+0652).
pub fn diacritics() -> Result<RuleGroup> {
    Ok(RuleGroup::new(
        "diacritics",
        vec![NormalizationRule::new("[\u{064B}-\u{0652}]", "")?],
    ))
}

/// Arabic annotation/ornament marks with no use in text processing.
pub fn special_chars() -> Result<RuleGroup> {
    Ok(RuleGroup::new(
        "special_chars",
        vec![NormalizationRule::new(
            &format!("[{SPECIAL_CHARS_CLASS}]"),
            "",
        )?],
    ))
}

/// Spacing around punctuation marks.
pub fn punctuation_spacing() -> Result<RuleGroup> {
    Ok(RuleGroup::new(
        "punctuation_spacing",
        vec![
            // despace straight-quoted spans
            NormalizationRule::new("\" ([^\n\"]+) \"", "\"${1}\"")?,
            // no space before attaching punctuation
            NormalizationRule::new(&format!(" ([{PUNC_AFTER}])"), "${1}")?,
            // no space after opening punctuation
            NormalizationRule::new(&format!("([{PUNC_BEFORE}]) "), "${1}")?,
            // space after . and : unless punctuation or a digit follows
            NormalizationRule::new(
                &format!("([\\.:])([^ {PUNC_AFTER}\\d۰۱۲۳۴۵۶۷۸۹])"),
                "${1} ${2}",
            )?,
            // space after the remaining closing punctuation
            NormalizationRule::new(
                &format!("([!،؛؟»\\]\\)\\}}])([^ {PUNC_AFTER}])"),
                "${1} ${2}",
            )?,
            // space before opening punctuation
            NormalizationRule::new(
                &format!("([^ {PUNC_BEFORE}])([{PUNC_BEFORE}])"),
                "${1} ${2}",
            )?,
            // space between digits and letters: ۹متر -> ۹ متر
            NormalizationRule::new(&format!(r"(\d)([{PERSIAN_LETTERS}])"), "${1} ${2}")?,
            NormalizationRule::new(&format!(r"([{PERSIAN_LETTERS}])(\d)"), "${1} ${2}")?,
        ],
    ))
}

/// Spacing around prefixes and suffixes: the half-space rules.
pub fn affix_spacing() -> Result<RuleGroup> {
    Ok(RuleGroup::new(
        "affix_spacing",
        vec![
            // خانه ی -> خانه‌ی
            NormalizationRule::new("([^ ]ه) ی ", "${1}\u{200c}ی ")?,
            // می روم -> می‌روم
            NormalizationRule::new("(^| )(ن?می) ", "${1}${2}\u{200c}")?,
            // half-space before تر/ترین/گر/گری/ها/های
            NormalizationRule::repeated(
                &format!(
                    "([^ \n\\d{PUNC_AFTER}{PUNC_BEFORE}]{{2}}) (تر(?:ین?)?|گری?|های?)([ \n{PUNC_AFTER}{PUNC_BEFORE}]|$)"
                ),
                "${1}\u{200c}${2}${3}",
            )?,
            // join ام/ایم/اش/اند/ای/اید/ات after ه
            NormalizationRule::repeated(
                &format!("([^ ]ه) (ا(?:م|یم|ش|ند|ی|ید|ت))([ \n{PUNC_AFTER}]|$)"),
                "${1}\u{200c}${2}${3}",
            )?,
            // شنبهها -> شنبه‌ها
            NormalizationRule::new("(ه)(ها)", "${1}\u{200c}${2}")?,
        ],
    ))
}

/// Honorific and religious ligature codepoints expanded to word sequences.
///
/// A fixed literal pattern set, so this is a multi-pattern replacement
/// rather than a regex stage.
pub struct LigatureExpander {
    searcher: AhoCorasick,
    replacements: Vec<&'static str>,
}

const LIGATURES: &[(&str, &str)] = &[
    ("\u{FDFD}", "بسم الله الرحمن الرحیم"),
    ("\u{FDFC}", "ریال"),
    ("\u{FDF0}", "صلی"),
    ("\u{FDF9}", "صلی"),
    ("\u{FDF2}", "الله"),
    ("\u{FDF3}", "اکبر"),
    ("\u{FDF4}", "محمد"),
    ("\u{FDF5}", "صلعم"),
    ("\u{FDF6}", "رسول"),
    ("\u{FDF7}", "علیه"),
    ("\u{FDF8}", "وسلم"),
    ("\u{FEF5}", "لا"),
    ("\u{FEF6}", "لا"),
    ("\u{FEF7}", "لا"),
    ("\u{FEF8}", "لا"),
    ("\u{FEF9}", "لا"),
    ("\u{FEFA}", "لا"),
    ("\u{FEFB}", "لا"),
    ("\u{FEFC}", "لا"),
];

impl LigatureExpander {
    pub fn new() -> Result<Self> {
        let searcher = AhoCorasick::new(LIGATURES.iter().map(|(pattern, _)| pattern))
            .context("failed to build ligature matcher")?;
        Ok(Self {
            searcher,
            replacements: LIGATURES.iter().map(|(_, replacement)| *replacement).collect(),
        })
    }

    pub fn expand(&self, text: &str) -> String {
        self.searcher.replace_all(text, &self.replacements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extra_spaces_collapse() {
        let group = extra_spaces().unwrap();
        assert_eq!(group.apply("سلام     به همه"), "سلام به همه");
        assert_eq!(group.apply("ســـــلام"), "سلام");
        assert_eq!(group.apply("الف\n\n\n\nب"), "الف\n\nب");
    }

    #[test]
    fn stray_half_spaces_removed() {
        let group = extra_spaces().unwrap();
        assert_eq!(group.apply("الف\u{200c} ب"), "الف ب");
        assert_eq!(group.apply("الف \u{200c}ب"), "الف ب");
        assert_eq!(group.apply("الف\u{200c}\u{200c}ب"), "الف\u{200c}ب");
    }

    #[test]
    fn persian_style_substitutions() {
        let group = persian_style().unwrap();
        assert_eq!(group.apply("\"نرمال‌سازی\""), "«نرمال‌سازی»");
        assert_eq!(group.apply("3.14"), "3٫14");
        assert_eq!(group.apply("ادامه ..."), "ادامه…");
    }

    #[test]
    fn diacritics_removed() {
        let group = diacritics().unwrap();
        assert_eq!(group.apply("حَذفِ اِعراب"), "حذف اعراب");
    }

    #[test]
    fn punctuation_spacing_rules() {
        let group = punctuation_spacing().unwrap();
        assert_eq!(group.apply("اصلاح ( پرانتزها ) در متن ."), "اصلاح (پرانتزها) در متن.");
        // time and decimal contexts keep their punctuation tight
        assert_eq!(
            group.apply("نسخه 0.5 در ساعت 22:00 تهران،1396"),
            "نسخه 0.5 در ساعت 22:00 تهران، 1396"
        );
        assert_eq!(group.apply("اتریش ۷.۹ میلیون."), "اتریش ۷.۹ میلیون.");
    }

    #[test]
    fn digit_letter_spacing() {
        let group = punctuation_spacing().unwrap();
        assert_eq!(group.apply("به طول ۹متر"), "به طول ۹ متر");
        assert_eq!(group.apply("به طول۹"), "به طول ۹");
    }

    #[test]
    fn affix_spacing_rules() {
        let group = affix_spacing().unwrap();
        assert_eq!(group.apply("خانه ی پدری"), "خانه\u{200c}ی پدری");
        assert_eq!(group.apply("می روم"), "می\u{200c}روم");
        assert_eq!(group.apply("حرفه ای"), "حرفه\u{200c}ای");
        assert_eq!(group.apply("شنبهها"), "شنبه\u{200c}ها");
    }

    #[test]
    fn chained_affixes_settle() {
        let group = affix_spacing().unwrap();
        assert_eq!(
            group.apply("محبوب ترین ها"),
            "محبوب\u{200c}ترین\u{200c}ها"
        );
        assert_eq!(
            group.apply("فاصله میان پیشوند ها و پسوند ها را اصلاح می کند."),
            "فاصله میان پیشوند\u{200c}ها و پسوند\u{200c}ها را اصلاح می\u{200c}کند."
        );
    }

    #[test]
    fn ligatures_expand_to_words() {
        let expander = LigatureExpander::new().unwrap();
        assert_eq!(expander.expand("حضرت \u{FDF4}"), "حضرت محمد");
        assert_eq!(expander.expand("\u{FEFB}"), "لا");
    }

    #[test]
    fn special_chars_removed() {
        let group = special_chars().unwrap();
        assert_eq!(group.apply("پیامبر اکرم \u{FDFA}"), "پیامبر اکرم ");
    }
}
