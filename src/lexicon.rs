//! Lexicon loading and conjugation tables.
//!
//! Every lexicon follows a load-then-freeze lifecycle: parsed once from
//! line-oriented UTF-8 tables (bundled or caller-supplied), then held
//! immutable for the life of the process and shared across engines with
//! `Arc`. A malformed or missing table fails construction; a partial load is
//! never exposed.
//!
//! Table formats:
//! - informal verb table: `formalPast#presentStem informalStem flag`
//! - default verb table:  `formalPast#presentStem`
//! - informal word table: `informalWord formalWord`
//! - word list: one word per line (first column wins)

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use crate::chars::ZWNJ;

const DEFAULT_WORDS: &str = include_str!("../data/words.dat");
const DEFAULT_VERBS: &str = include_str!("../data/verbs.dat");
const DEFAULT_INFORMAL_VERBS: &str = include_str!("../data/iverbs.dat");
const DEFAULT_INFORMAL_WORDS: &str = include_str!("../data/iwords.dat");

/// Person/number endings of the informal present paradigm. The third slot
/// is filled per stem (ه, or د after a final ا).
const INFORMAL_ENDS: [&str; 5] = ["م", "ی", "یم", "ین", "ن"];
/// Person/number endings of the formal present paradigm.
const PRESENT_ENDS: [&str; 6] = ["م", "ی", "د", "یم", "ید", "ند"];
/// Person/number endings of the formal past paradigm (third singular bare).
const PAST_ENDS: [&str; 6] = ["م", "ی", "", "یم", "ید", "ند"];

/// One parsed line of an informal verb table.
#[derive(Debug, Clone)]
struct VerbEntry {
    past: String,
    present: String,
    informal: String,
    /// Conjugation-class flag: when unset, the simple-present block of the
    /// informal paradigm is excluded from the derived mapping (those
    /// surfaces collide with ordinary words).
    full_paradigm: bool,
}

impl VerbEntry {
    fn parse(line: &str) -> Result<Self> {
        let mut fields = line.split(' ').filter(|f| !f.is_empty());
        let formal = fields.next().ok_or_else(|| anyhow!("empty verb entry"))?;
        let informal = fields
            .next()
            .ok_or_else(|| anyhow!("missing informal stem"))?;
        let flag = fields.next().ok_or_else(|| anyhow!("missing flag"))?;
        let (past, present) = formal
            .split_once('#')
            .ok_or_else(|| anyhow!("missing '#' in stem pair {formal:?}"))?;
        Ok(Self {
            past: past.to_string(),
            present: present.to_string(),
            informal: informal.to_string(),
            full_paradigm: flag != "0",
        })
    }
}

/// The six informal simple-present surface forms of a stem.
fn informal_simples(stem: &str) -> Vec<String> {
    let third = if stem.ends_with('ا') {
        format!("{stem}د")
    } else {
        format!("{stem}ه")
    };
    vec![
        format!("{stem}{}", INFORMAL_ENDS[0]),
        format!("{stem}{}", INFORMAL_ENDS[1]),
        third,
        format!("{stem}{}", INFORMAL_ENDS[2]),
        format!("{stem}{}", INFORMAL_ENDS[3]),
        format!("{stem}{}", INFORMAL_ENDS[4]),
    ]
}

/// All 36 informal surface conjugations of a present stem: the six simple
/// forms crossed with {plain, negated, imperfect, negated imperfect,
/// subjunctive, negated subjunctive}.
pub(crate) fn informal_conjugations(stem: &str) -> Vec<String> {
    let simples = informal_simples(stem);
    let imperfects: Vec<String> = simples
        .iter()
        .map(|form| format!("می{ZWNJ}{form}"))
        .collect();
    let subjunctives: Vec<String> = simples
        .iter()
        .map(|form| {
            if form.starts_with('ب') {
                form.clone()
            } else {
                format!("ب{form}")
            }
        })
        .collect();

    let mut forms = simples.clone();
    forms.extend(simples.iter().map(|form| format!("ن{form}")));
    forms.extend(imperfects.iter().cloned());
    forms.extend(imperfects.iter().map(|form| format!("ن{form}")));
    forms.extend(subjunctives);
    forms.extend(simples.iter().map(|form| format!("ن{form}")));
    forms
}

/// The formal present-tense block structurally aligned with
/// [`informal_conjugations`]: zip both to map informal surfaces onto their
/// formal renderings.
pub(crate) fn formal_present_conjugations(present: &str) -> Vec<String> {
    let simples: Vec<String> = PRESENT_ENDS
        .iter()
        .map(|end| format!("{present}{end}"))
        .collect();
    let imperfects: Vec<String> = simples
        .iter()
        .map(|form| format!("می{ZWNJ}{form}"))
        .collect();
    let subjunctives: Vec<String> = simples
        .iter()
        .map(|form| {
            if form.starts_with('ب') {
                form.clone()
            } else {
                format!("ب{form}")
            }
        })
        .collect();

    let mut forms = simples.clone();
    forms.extend(simples.iter().map(|form| format!("ن{form}")));
    forms.extend(imperfects.iter().cloned());
    forms.extend(imperfects.iter().map(|form| format!("ن{form}")));
    forms.extend(subjunctives);
    forms.extend(simples.iter().map(|form| format!("ن{form}")));
    forms
}

/// Formal surface forms of one verb across tenses, used for mi-prefix
/// validation and the splitter vocabulary.
fn formal_surfaces(past: &str, present: &str) -> Vec<String> {
    let mut forms = Vec::new();
    let past_simples: Vec<String> =
        PAST_ENDS.iter().map(|end| format!("{past}{end}")).collect();
    for form in &past_simples {
        forms.push(form.clone());
        forms.push(format!("ن{form}"));
        forms.push(format!("می{ZWNJ}{form}"));
        forms.push(format!("نمی{ZWNJ}{form}"));
    }
    // perfect participle and infinitive
    forms.push(format!("{past}ه"));
    forms.push(format!("{past}ن"));
    forms.extend(formal_present_conjugations(present));
    forms
}

/// Canonical present/past verb stems plus derived validation sets.
///
/// `present` maps informal present stems onto their formal rendering (and
/// every canonical present stem onto itself); `past` holds canonical past
/// stems. Both are what the morphological analyzer validates candidate
/// roots against.
#[derive(Debug)]
pub struct VerbLexicon {
    present_map: HashMap<String, String>,
    past_map: HashMap<String, String>,
    /// Formal imperfect surfaces (می‌/نمی‌ + stem + ending) accepted by the
    /// mi-separation stage.
    mi_verbs: HashSet<String>,
    /// All generated formal surfaces, for known-word membership checks.
    surfaces: HashSet<String>,
}

impl VerbLexicon {
    pub fn bundled() -> Result<Self> {
        Self::from_tables(DEFAULT_INFORMAL_VERBS, DEFAULT_VERBS)
    }

    pub fn from_files(informal_verbs: &Path, default_verbs: &Path) -> Result<Self> {
        let informal = std::fs::read_to_string(informal_verbs).with_context(|| {
            format!("failed to read verb table {}", informal_verbs.display())
        })?;
        let default = std::fs::read_to_string(default_verbs).with_context(|| {
            format!("failed to read verb table {}", default_verbs.display())
        })?;
        Self::from_tables(&informal, &default)
    }

    pub fn from_tables(informal_table: &str, default_table: &str) -> Result<Self> {
        let mut present_map = HashMap::new();
        let mut past_map = HashMap::new();
        let mut mi_verbs = HashSet::new();
        let mut surfaces = HashSet::new();

        for (index, line) in non_empty_lines(informal_table) {
            let entry = VerbEntry::parse(line)
                .with_context(|| format!("informal verb table, line {}", index + 1))?;
            present_map.insert(entry.informal.clone(), entry.present.clone());
            past_map.insert(entry.past.clone(), entry.past.clone());
        }

        for (index, line) in non_empty_lines(default_table) {
            let (past, present) = line
                .split_once('#')
                .ok_or_else(|| anyhow!("missing '#' in stem pair {line:?}"))
                .with_context(|| format!("default verb table, line {}", index + 1))?;
            present_map.insert(present.to_string(), present.to_string());
            past_map.insert(past.to_string(), past.to_string());

            for end in PAST_ENDS {
                mi_verbs.insert(format!("می{ZWNJ}{past}{end}"));
                mi_verbs.insert(format!("نمی{ZWNJ}{past}{end}"));
            }
            // past narrative: می‌رفته
            mi_verbs.insert(format!("می{ZWNJ}{past}ه"));
            mi_verbs.insert(format!("نمی{ZWNJ}{past}ه"));
            for end in PRESENT_ENDS {
                mi_verbs.insert(format!("می{ZWNJ}{present}{end}"));
                mi_verbs.insert(format!("نمی{ZWNJ}{present}{end}"));
            }
            surfaces.extend(formal_surfaces(past, present));
        }

        tracing::debug!(
            present = present_map.len(),
            past = past_map.len(),
            mi = mi_verbs.len(),
            "verb lexicon loaded"
        );

        Ok(Self {
            present_map,
            past_map,
            mi_verbs,
            surfaces,
        })
    }

    /// Formal present stem for a candidate root, if the root is known.
    pub fn present(&self, root: &str) -> Option<&str> {
        self.present_map.get(root).map(String::as_str)
    }

    /// Canonical past stem for a candidate root, if the root is known.
    pub fn past(&self, root: &str) -> Option<&str> {
        self.past_map.get(root).map(String::as_str)
    }

    /// Whether `surface` is an accepted می‌/نمی‌ verb form.
    pub fn is_mi_verb(&self, surface: &str) -> bool {
        self.mi_verbs.contains(surface)
    }

    pub fn surface_forms(&self) -> &HashSet<String> {
        &self.surfaces
    }
}

/// Informal→formal word and conjugated-verb mappings.
pub struct InformalLexicon {
    word_map: HashMap<String, String>,
    verb_map: HashMap<String, String>,
}

impl InformalLexicon {
    pub fn bundled() -> Result<Self> {
        Self::from_tables(DEFAULT_INFORMAL_WORDS, DEFAULT_INFORMAL_VERBS)
    }

    pub fn from_files(informal_words: &Path, informal_verbs: &Path) -> Result<Self> {
        let words = std::fs::read_to_string(informal_words).with_context(|| {
            format!("failed to read word table {}", informal_words.display())
        })?;
        let verbs = std::fs::read_to_string(informal_verbs).with_context(|| {
            format!("failed to read verb table {}", informal_verbs.display())
        })?;
        Self::from_tables(&words, &verbs)
    }

    pub fn from_tables(words_table: &str, verbs_table: &str) -> Result<Self> {
        let mut word_map = HashMap::new();
        for (index, line) in non_empty_lines(words_table) {
            let (informal, formal) = line
                .split_once(' ')
                .ok_or_else(|| anyhow!("missing formal rendering for {line:?}"))
                .with_context(|| format!("informal word table, line {}", index + 1))?;
            word_map.insert(informal.to_string(), formal.trim().to_string());
        }

        let mut verb_map = HashMap::new();
        for (index, line) in non_empty_lines(verbs_table) {
            let entry = VerbEntry::parse(line)
                .with_context(|| format!("informal verb table, line {}", index + 1))?;
            let informal = informal_conjugations(&entry.informal);
            let formal = formal_present_conjugations(&entry.present);
            // Without the full-paradigm flag the simple-present block is
            // skipped: those surfaces collide with ordinary words.
            let skip = if entry.full_paradigm { 0 } else { 8 };
            for (surface, rendering) in informal.iter().zip(&formal).skip(skip) {
                insert_surface_variants(&mut verb_map, surface, rendering);
            }
        }

        tracing::debug!(
            words = word_map.len(),
            verb_surfaces = verb_map.len(),
            "informal lexicon loaded"
        );

        Ok(Self { word_map, verb_map })
    }

    /// Formal rendering of an informal word, if mapped.
    pub fn word(&self, informal: &str) -> Option<&str> {
        self.word_map.get(informal).map(String::as_str)
    }

    pub fn has_word(&self, informal: &str) -> bool {
        self.word_map.contains_key(informal)
    }

    /// Formal rendering of an informal conjugated verb surface, if mapped.
    pub fn verb_surface(&self, informal: &str) -> Option<&str> {
        self.verb_map.get(informal).map(String::as_str)
    }

    pub(crate) fn word_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.word_map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn verb_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.verb_map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Register an informal surface with its spacing variants: the half-space
/// form, the fused form, the spaced form, and the ین→ید second-plural
/// correspondence.
fn insert_surface_variants(map: &mut HashMap<String, String>, surface: &str, rendering: &str) {
    map.insert(surface.to_string(), rendering.to_string());
    if surface.contains(ZWNJ) {
        map.insert(surface.replace(ZWNJ, ""), rendering.to_string());
        map.insert(surface.replace(ZWNJ, " "), rendering.to_string());
    }
    if let Some(stripped) = surface.strip_suffix('ن') {
        if stripped.ends_with('ی') {
            map.insert(format!("{stripped}د"), rendering.to_string());
        }
    }
}

/// The main word list.
pub struct WordLexicon {
    words: HashSet<String>,
}

impl WordLexicon {
    pub fn bundled() -> Result<Self> {
        Self::from_table(DEFAULT_WORDS)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let table = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read word list {}", path.display()))?;
        Self::from_table(&table)
    }

    pub fn from_table(table: &str) -> Result<Self> {
        let mut words = HashSet::new();
        for (index, line) in non_empty_lines(table) {
            let word = line
                .split_whitespace()
                .next()
                .ok_or_else(|| anyhow!("word list, line {}: empty entry", index + 1))?;
            words.insert(word.to_string());
        }
        if words.is_empty() {
            bail!("word list is empty");
        }
        tracing::debug!(words = words.len(), "word lexicon loaded");
        Ok(Self { words })
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Whether joining `first` and `second` with a half-space yields a known
    /// compound. Gates the compound-join pass of affix spacing.
    pub fn has_compound(&self, first: &str, second: &str) -> bool {
        self.words.contains(&format!("{first}{ZWNJ}{second}"))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

fn non_empty_lines(table: &str) -> impl Iterator<Item = (usize, &str)> {
    table
        .lines()
        .enumerate()
        .map(|(index, line)| (index, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn informal_conjugation_count_and_shape() {
        let forms = informal_conjugations("خور");
        assert_eq!(forms.len(), 36);
        assert!(forms.contains(&"خورم".to_string()));
        assert!(forms.contains(&"خوره".to_string()));
        assert!(forms.contains(&"نخوره".to_string()));
        assert!(forms.contains(&format!("می{ZWNJ}خوره")));
        assert!(forms.contains(&format!("نمی{ZWNJ}خورن")));
        assert!(forms.contains(&"بخورم".to_string()));
    }

    #[test]
    fn alef_final_stem_takes_dal_in_third_singular() {
        let forms = informal_conjugations("خوا");
        assert!(forms.contains(&"خواد".to_string()));
        assert!(!forms.contains(&"خواه".to_string()));
    }

    #[test]
    fn subjunctive_keeps_existing_be_prefix() {
        let forms = informal_conjugations("بر");
        // ببرم would double the prefix; برم is already subjunctive-shaped
        assert!(forms.contains(&"برم".to_string()));
        assert!(!forms.contains(&"ببرم".to_string()));
    }

    #[test]
    fn formal_block_aligns_with_informal() {
        let informal = informal_conjugations("ر");
        let formal = formal_present_conjugations("رو");
        assert_eq!(informal.len(), formal.len());
        let map: HashMap<_, _> = informal.into_iter().zip(formal).collect();
        assert_eq!(map.get("رم").map(String::as_str), Some("روم"));
        assert_eq!(
            map.get(&format!("می{ZWNJ}رم")).map(String::as_str),
            Some(&*format!("می{ZWNJ}روم"))
        );
        assert_eq!(map.get("برم").map(String::as_str), Some("بروم"));
    }

    #[test]
    fn verb_lexicon_maps_stems() {
        let lexicon = VerbLexicon::from_tables("رفت#رو ر 1\n", "دانست#دان\nگفت#گو\n").unwrap();
        assert_eq!(lexicon.present("ر"), Some("رو"));
        assert_eq!(lexicon.present("دان"), Some("دان"));
        assert_eq!(lexicon.past("رفت"), Some("رفت"));
        assert_eq!(lexicon.past("گفت"), Some("گفت"));
        assert_eq!(lexicon.present("خور"), None);
    }

    #[test]
    fn mi_surfaces_cover_past_and_present() {
        let lexicon = VerbLexicon::from_tables("", "دانست#دان\nگفت#گو\n").unwrap();
        assert!(lexicon.is_mi_verb(&format!("نمی{ZWNJ}دانم")));
        assert!(lexicon.is_mi_verb(&format!("می{ZWNJ}گفت")));
        assert!(!lexicon.is_mi_verb(&format!("می{ZWNJ}دان")));
    }

    #[test]
    fn malformed_verb_line_fails_loudly() {
        let missing_hash = VerbLexicon::from_tables("رفت رو 1\n", "");
        assert!(missing_hash.is_err());
        let error = format!("{:#}", missing_hash.unwrap_err());
        assert!(error.contains("line 1"), "unexpected error: {error}");

        assert!(VerbLexicon::from_tables("", "دانست دان\n").is_err());
        assert!(InformalLexicon::from_tables("واسه\n", "").is_err());
    }

    #[test]
    fn informal_lexicon_derives_surface_map() {
        let lexicon = InformalLexicon::from_tables("واسه برای\n", "رفت#رو ر 1\n").unwrap();
        assert_eq!(lexicon.word("واسه"), Some("برای"));
        assert_eq!(
            lexicon.verb_surface(&format!("می{ZWNJ}رم")),
            Some(&*format!("می{ZWNJ}روم"))
        );
        // fused and spaced spellings of the half-space surface
        assert_eq!(lexicon.verb_surface("میرم"), Some(&*format!("می{ZWNJ}روم")));
        assert_eq!(lexicon.verb_surface("می رم"), Some(&*format!("می{ZWNJ}روم")));
        // second-plural correspondence رین -> رید
        assert_eq!(lexicon.verb_surface("رید"), Some("روید"));
    }

    #[test]
    fn partial_paradigm_skips_simple_block() {
        let lexicon = InformalLexicon::from_tables("", "خواند#خوان خون 0\n").unwrap();
        // the bare simple form stays unmapped (collides with a real word)
        assert_eq!(lexicon.verb_surface("خونه"), None);
        // the imperfect block is still mapped
        assert_eq!(
            lexicon.verb_surface(&format!("می{ZWNJ}خونه")),
            Some(&*format!("می{ZWNJ}خواند"))
        );
    }

    #[test]
    fn word_lexicon_membership_and_compounds() {
        let lexicon =
            WordLexicon::from_table(&format!("کتاب\nزمین{ZWNJ}لرزه\nجمهوری\n")).unwrap();
        assert!(lexicon.contains("کتاب"));
        assert!(!lexicon.contains("کتابی"));
        assert!(lexicon.has_compound("زمین", "لرزه"));
        assert!(!lexicon.has_compound("کتاب", "جمهوری"));
    }

    #[test]
    fn lexicons_load_from_files() {
        let mut verbs = tempfile::NamedTempFile::new().unwrap();
        writeln!(verbs, "رفت#رو ر 1").unwrap();
        let mut defaults = tempfile::NamedTempFile::new().unwrap();
        writeln!(defaults, "گفت#گو").unwrap();
        let lexicon = VerbLexicon::from_files(verbs.path(), defaults.path()).unwrap();
        assert_eq!(lexicon.present("ر"), Some("رو"));

        let missing = Path::new("/nonexistent/verbs.dat");
        assert!(VerbLexicon::from_files(missing, defaults.path()).is_err());
    }

    #[test]
    fn bundled_tables_parse() {
        assert!(WordLexicon::bundled().is_ok());
        assert!(VerbLexicon::bundled().is_ok());
        assert!(InformalLexicon::bundled().is_ok());
    }
}
