//! Whitespace recovery for run-together tokens.
//!
//! Cuts a token after the letters that cannot join a following letter
//! (ا د ذ ر ز ژ و) and after digits, then enumerates every ordered
//! partition reachable by splitting or merging at those cuts. The first
//! partition — fewest pieces first, generation order breaking ties — whose
//! every piece is a known word wins; otherwise the token stays unsplit.
//!
//! The enumeration is exponential in the number of cuts, which is fine for
//! natural words but still bounded defensively.

use std::collections::HashSet;

use crate::chars;
use crate::lexicon::{InformalLexicon, VerbLexicon, WordLexicon};

/// Letters that never join the letter after them inside a stem.
const SPLIT_AFTER: [char; 7] = ['ا', 'د', 'ذ', 'ر', 'ز', 'ژ', 'و'];

/// Cut counts above this skip the partition search entirely.
const MAX_PIECES: usize = 16;

pub struct TokenSplitter {
    vocabulary: HashSet<String>,
}

impl TokenSplitter {
    /// Build the known-word vocabulary from the main lexicon, both sides of
    /// the informal word and verb maps, and every formal verb surface.
    pub fn new(
        words: &WordLexicon,
        verbs: &VerbLexicon,
        informal: &InformalLexicon,
    ) -> Self {
        let mut vocabulary: HashSet<String> = HashSet::new();
        vocabulary.extend(words.iter().map(str::to_string));
        vocabulary.extend(verbs.surface_forms().iter().cloned());
        for (surface, rendering) in informal.word_entries() {
            vocabulary.insert(surface.to_string());
            vocabulary.insert(rendering.to_string());
        }
        for (surface, rendering) in informal.verb_entries() {
            vocabulary.insert(surface.to_string());
            vocabulary.insert(rendering.to_string());
        }
        tracing::debug!(entries = vocabulary.len(), "splitter vocabulary built");
        Self { vocabulary }
    }

    /// Space-joined segmentation of `token`, or `token` itself when no
    /// partition of known words exists.
    pub fn split(&self, token: &str) -> String {
        let collapsed = chars::collapse_repeated(token, 1, false);
        let pieces = cut(&collapsed);
        if pieces.len() > MAX_PIECES {
            tracing::debug!(token, pieces = pieces.len(), "partition search skipped");
            return token.to_string();
        }

        for partition in partitions(&pieces) {
            if partition.iter().all(|piece| self.is_known(piece)) {
                return partition.join(" ");
            }
        }
        token.to_string()
    }

    fn is_known(&self, piece: &str) -> bool {
        self.vocabulary.contains(piece)
    }
}

/// Cut `token` after every non-joining letter and digit.
fn cut(token: &str) -> Vec<String> {
    let mut pieces = vec![String::new()];
    for c in token.chars() {
        pieces.last_mut().expect("pieces is never empty").push(c);
        if SPLIT_AFTER.contains(&c) || c.is_numeric() {
            pieces.push(String::new());
        }
    }
    pieces.retain(|piece| !piece.is_empty());
    pieces
}

/// Every ordered partition reachable by keeping or merging each cut,
/// fewest pieces first; ties keep generation order.
fn partitions(pieces: &[String]) -> Vec<Vec<String>> {
    if pieces.len() <= 1 {
        return vec![pieces.to_vec()];
    }
    let tails = partitions(&pieces[1..]);
    let mut result = Vec::with_capacity(tails.len() * 2);
    for tail in tails {
        let mut kept = Vec::with_capacity(tail.len() + 1);
        kept.push(pieces[0].clone());
        kept.extend(tail.iter().cloned());
        result.push(kept);

        let mut merged = tail.clone();
        merged[0] = format!("{}{}", pieces[0], tail[0]);
        result.push(merged);
    }
    result.sort_by_key(|partition| partition.len());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter() -> TokenSplitter {
        TokenSplitter::new(
            &WordLexicon::bundled().unwrap(),
            &VerbLexicon::bundled().unwrap(),
            &InformalLexicon::bundled().unwrap(),
        )
    }

    #[test]
    fn cut_points_follow_non_joining_letters() {
        assert_eq!(cut("صداوسیماجمهوری").len(), 7);
        assert_eq!(cut("کتاب"), ["کتا", "ب"]);
    }

    #[test]
    fn partitions_prefer_fewer_pieces() {
        let pieces: Vec<String> = ["ا", "ب", "ج"].iter().map(|s| s.to_string()).collect();
        let all = partitions(&pieces);
        assert_eq!(all.len(), 4);
        assert_eq!(all[0], ["ابج"]);
        assert_eq!(all.last().unwrap().len(), 3);
    }

    #[test]
    fn recovers_missing_space() {
        assert_eq!(splitter().split("صداوسیماجمهوری"), "صداوسیما جمهوری");
    }

    #[test]
    fn splits_run_together_phrase() {
        assert_eq!(splitter().split("تورادوست"), "تو را دوست");
    }

    #[test]
    fn unknown_token_stays_unsplit() {
        assert_eq!(splitter().split("قاعقلنمش"), "قاعقلنمش");
    }

    #[test]
    fn known_word_is_returned_whole() {
        assert_eq!(splitter().split("کتاب"), "کتاب");
    }

    #[test]
    fn repeats_collapse_to_one_before_search() {
        // the splitter policy: runs of 3+ collapse to a single letter,
        // unlike the formal stage's collapse-to-two
        assert_eq!(splitter().split("کتاااااب"), "کتاب");
        assert_ne!(
            chars::collapse_repeated("کتاااااب", 1, false),
            chars::collapse_repeated("کتاااااب", 2, true)
        );
    }

    #[test]
    fn oversized_tokens_skip_the_search() {
        let token = "دودودودودودودودودودودودودودودودودو";
        assert_eq!(splitter().split(token), token);
    }
}
