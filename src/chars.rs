//! Character-level translation tables.
//!
//! Canonicalizes Arabic-presentation glyph variants to standard Persian
//! letters and localizes digits, ahead of any regex rule stage. The maps are
//! process-wide immutable tables; translation is a single pass over the text.

use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;

/// Zero-width non-joiner, the Persian half-space.
pub const ZWNJ: char = '\u{200c}';

/// The Persian alphabet as used in rule character classes.
pub const PERSIAN_LETTERS: &str = "آابپتثجچحخدذرزژسشصضطظعغفقکگلمنوهی";

// Parallel source/destination alphabets; zipped into CHAR_MAP below.
const TRANSLATION_SRC: &str = "ؠػػؽؾؿكيٮٯٷٸٹٺٻټٽٿڀځٵٶٷٸٹٺٻټٽٿڀځڂڅڇڈډڊڋڌڍڎڏڐڑڒړڔڕږڗڙښڛڜڝڞڟڠڡڢڣڤڥڦڧڨڪګڬڭڮڰڱڲڳڴڵڶڷڸڹںڻڼڽھڿہۂۃۄۅۆۇۈۉۊۋۏۍێېۑےۓەۮۯۺۻۼۿݐݑݒݓݔݕݖݗݘݙݚݛݜݝݞݟݠݡݢݣݤݥݦݧݨݩݪݫݬݭݮݯݰݱݲݳݴݵݶݷݸݹݺݻݼݽݾݿࢠࢡࢢࢣࢤࢥࢦࢧࢨࢩࢪࢫࢮࢯࢰࢱࢬࢲࢳࢴࢶࢷࢸࢹࢺࢻࢼࢽﭐﭑﭒﭓﭔﭕﭖﭗﭘﭙﭚﭛﭜﭝﭞﭟﭠﭡﭢﭣﭤﭥﭦﭧﭨﭩﭮﭯﭰﭱﭲﭳﭴﭵﭶﭷﭸﭹﭺﭻﭼﭽﭾﭿﮀﮁﮂﮃﮄﮅﮆﮇﮈﮉﮊﮋﮌﮍﮎﮏﮐﮑﮒﮓﮔﮕﮖﮗﮘﮙﮚﮛﮜﮝﮞﮟﮠﮡﮢﮣﮤﮥﮦﮧﮨﮩﮪﮫﮬﮭﮮﮯﮰﮱ\u{FE80}\u{FE81}\u{FE83}\u{FE84}\u{FE85}\u{FE86}\u{FE87}\u{FE88}\u{FE89}\u{FE8A}\u{FE8B}\u{FE8C}\u{FE8D}\u{FE8E}\u{FE8F}\u{FE90}\u{FE91}\u{FE92}\u{FE95}\u{FE96}\u{FE97}\u{FE98}\u{FE99}\u{FE9A}\u{FE9B}\u{FE9C}\u{FE9D}\u{FE9E}\u{FE9F}\u{FEA0}\u{FEA1}\u{FEA2}\u{FEA3}\u{FEA4}\u{FEA5}\u{FEA6}\u{FEA7}\u{FEA8}\u{FEA9}\u{FEAA}\u{FEAB}\u{FEAC}\u{FEAD}\u{FEAE}\u{FEAF}\u{FEB0}\u{FEB1}\u{FEB2}\u{FEB3}\u{FEB4}\u{FEB5}\u{FEB6}\u{FEB7}\u{FEB8}\u{FEB9}\u{FEBA}\u{FEBB}\u{FEBC}\u{FEBD}\u{FEBE}\u{FEBF}\u{FEC0}\u{FEC1}\u{FEC2}\u{FEC3}\u{FEC4}\u{FEC5}\u{FEC6}\u{FEC7}\u{FEC8}\u{FEC9}\u{FECA}\u{FECB}\u{FECC}\u{FECD}\u{FECE}\u{FECF}\u{FED0}\u{FED1}\u{FED2}\u{FED3}\u{FED4}\u{FED5}\u{FED6}\u{FED7}\u{FED8}\u{FED9}\u{FEDA}\u{FEDB}\u{FEDC}\u{FEDD}\u{FEDE}\u{FEDF}\u{FEE0}\u{FEE1}\u{FEE2}\u{FEE3}\u{FEE4}\u{FEE5}\u{FEE6}\u{FEE7}\u{FEE8}\u{FEE9}\u{FEEA}\u{FEEB}\u{FEEC}\u{FEED}\u{FEEE}\u{FEEF}\u{FEF0}\u{FEF1}\u{FEF2}\u{FEF3}\u{FEF4}ىكي“”\u{00A0}";
const TRANSLATION_DST: &str = "یککیییکیبقویتتبتتتبحاوویتتبتتتبحححچدددددددددررررررررسسسصصطعففففففققکککککگگگگگللللنننننهچهههوووووووووییییییهدرشضغهبببببببححددرسعععففکککممنننلررسححسرحاایییووییحسسکببجطفقلمییرودصگویزعکبپتریفقنااببببپپپپببببتتتتتتتتتتتتففففححححححححچچچچچچچچددددددددژژررککککگگگگگگگگگگگگننننننههههههههههییییءاااووااییییااببببتتتتثثثثججججححححخخخخددذذررززسسسسششششصصصصضضضضططططظظظظععععغغغغففففققققککککللللممممننننههههوویییییییکی\"\" ";

lazy_static::lazy_static! {
    /// Glyph variants (Arabic presentation forms, Urdu/Pashto letters,
    /// ligature codepoints) mapped to canonical Persian letters.
    static ref CHAR_MAP: HashMap<char, char> = {
        let src: Vec<char> = TRANSLATION_SRC.chars().collect();
        let dst: Vec<char> = TRANSLATION_DST.chars().collect();
        debug_assert_eq!(src.len(), dst.len());
        src.into_iter().zip(dst).collect()
    };

    /// Latin and Arabic-Indic digits (and the percent sign) mapped to their
    /// Persian forms.
    static ref DIGIT_MAP: HashMap<char, char> = {
        let src: Vec<char> = "0123456789%٠١٢٣٤٥٦٧٨٩".chars().collect();
        let dst: Vec<char> = "۰۱۲۳۴۵۶۷۸۹٪۰۱۲۳۴۵۶۷۸۹".chars().collect();
        src.into_iter().zip(dst).collect()
    };
}

fn translate(text: &str, map: &HashMap<char, char>) -> String {
    text.chars()
        .map(|c| map.get(&c).copied().unwrap_or(c))
        .collect()
}

/// NFC-normalize and map glyph variants to canonical Persian letters.
///
/// Runs once, first, before any rule stage.
pub fn canonicalize(text: &str) -> String {
    let composed: String = text.nfc().collect();
    translate(&composed, &CHAR_MAP)
}

/// Replace Latin/Arabic-Indic digits and `%` with Persian forms.
///
/// Stable: applying it twice yields the same result as applying it once.
pub fn localize_digits(text: &str) -> String {
    translate(text, &DIGIT_MAP)
}

pub fn is_persian_letter(c: char) -> bool {
    PERSIAN_LETTERS.contains(c)
}

/// Whether `c` visually joins a following letter.
///
/// Decides half-space insertion when reattaching suffixes: after a joining
/// letter the suffix needs a ZWNJ to keep its detached shape.
pub fn joins_following(c: char) -> bool {
    "بپتثجچحخسشصضعغفقکگلمنهی".contains(c)
}

/// Collapse runs of the same character repeated three or more times down to
/// `keep` occurrences.
///
/// With `persian_only`, runs of non-Persian characters are left untouched.
/// The formal pipeline collapses to 2 (doubled letters can be meaningful);
/// the token splitter collapses to 1 (it only needs word-boundary recovery).
pub fn collapse_repeated(text: &str, keep: usize, persian_only: bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let mut run = 1;
        while chars.peek() == Some(&c) {
            chars.next();
            run += 1;
        }
        let emit = if run >= 3 && (!persian_only || is_persian_letter(c)) {
            keep
        } else {
            run
        };
        for _ in 0..emit {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_arabic_letters_to_persian() {
        assert_eq!(canonicalize("كيك"), "کیک");
        assert_eq!(canonicalize("علي"), "علی");
    }

    #[test]
    fn map_presentation_forms() {
        // Isolated/final presentation forms of beh and heh
        assert_eq!(canonicalize("ﺏﻪ"), "به");
    }

    #[test]
    fn localize_latin_and_arabic_digits() {
        assert_eq!(localize_digits("25%"), "۲۵٪");
        assert_eq!(localize_digits("٤٢"), "۴۲");
    }

    #[test]
    fn digit_localization_is_stable() {
        let once = localize_digits("نسخه 0.5 و ٤٢");
        assert_eq!(localize_digits(&once), once);
    }

    #[test]
    fn collapse_to_two_keeps_meaningful_doubles() {
        assert_eq!(
            collapse_repeated("سلامممم سلامممممم سلامم", 2, true),
            "سلامم سلامم سلامم"
        );
    }

    #[test]
    fn collapse_to_one_is_more_aggressive() {
        assert_eq!(collapse_repeated("سلامممم", 1, false), "سلام");
        assert_ne!(
            collapse_repeated("سلامممم", 1, false),
            collapse_repeated("سلامممم", 2, true)
        );
    }

    #[test]
    fn collapse_persian_only_ignores_other_runs() {
        assert_eq!(collapse_repeated("سلام!!!!", 2, true), "سلام!!!!");
        assert_eq!(collapse_repeated("سلام!!!!", 1, false), "سلام!");
    }

    #[test]
    fn joining_predicate() {
        assert!(joins_following('ه'));
        assert!(joins_following('م'));
        assert!(!joins_following('ا'));
        assert!(!joins_following('د'));
        assert!(!joins_following('و'));
    }
}
