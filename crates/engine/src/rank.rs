//! Scores a (query, candidate-basename) pair and exposes the word-start
//! segmentation the rest of the engine builds its acceleration structures
//! from.

use regex::Regex;
use smallvec::SmallVec;

/// The ordered sequence of word-start letters of a basename, preserving
/// input case. Most basenames have a handful of word starts, so this is
/// inlined up to 8 before spilling to the heap.
pub type StartLetters = SmallVec<[char; 8]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Upper,
    Lower,
    Digit,
    Delim,
    Other,
}

fn classify(c: char) -> CharClass {
    match c {
        '_' | '-' | '.' => CharClass::Delim,
        c if c.is_ascii_digit() || (c.is_numeric() && !c.is_alphabetic()) => CharClass::Digit,
        c if c.is_uppercase() => CharClass::Upper,
        c if c.is_lowercase() => CharClass::Lower,
        c if c.is_alphabetic() => CharClass::Lower,
        _ => CharClass::Other,
    }
}

#[inline]
fn is_letter(class: CharClass) -> bool {
    matches!(class, CharClass::Upper | CharClass::Lower)
}

/// Split `basename` into word segments and return the first character of
/// each segment that isn't itself a bare delimiter.
///
/// Boundaries are opened (in priority order, any one is sufficient):
/// - a non-letter followed by a letter (includes delimiter/digit/other to
///   letter transitions);
/// - a lowercase letter followed by an uppercase letter (camelCase);
/// - the character immediately after a `_`, `-`, or `.` delimiter;
/// - a transition into a digit run from a non-digit.
///
/// Example: `get_start_letters("FooBar_baz2qux.txt")` is `[F, B, b, 2, q,
/// t]`.
pub fn get_start_letters(basename: &str) -> StartLetters {
    let chars: Vec<char> = basename.chars().collect();
    let mut starts = StartLetters::new();

    if chars.is_empty() {
        return starts;
    }

    let classes: Vec<CharClass> = chars.iter().copied().map(classify).collect();

    let mut segment_start = 0usize;
    let boundary_at = |i: usize| -> bool {
        if i == 0 {
            return true;
        }
        let prev = classes[i - 1];
        let cur = classes[i];
        (is_letter(cur) && !is_letter(prev))
            || (cur == CharClass::Upper && prev == CharClass::Lower)
            || (prev == CharClass::Delim)
            || (cur == CharClass::Digit && prev != CharClass::Digit)
    };

    for i in 1..=chars.len() {
        let is_boundary = i == chars.len() || boundary_at(i);
        if is_boundary {
            let seg_first = chars[segment_start];
            if classify(seg_first) != CharClass::Delim {
                starts.push(seg_first);
            }
            segment_start = i;
        }
    }

    starts
}

/// Quality tiers, ordered worst to best so `#[derive(Ord)]` gives the right
/// comparison for free. Only `WordStartCamel` and above are considered
/// high-quality: a match at that tier or better is reliable enough that the
/// superfuzzy fallback stage should not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Superfuzzy,
    Substring,
    WordStartCamel,
    WordStartDelimited,
    WordStartPrefix,
    WordStartEqual,
    ExactIgnoreCase,
    ExactCase,
}

impl MatchTier {
    pub fn is_high_quality(self) -> bool {
        self >= MatchTier::WordStartCamel
    }
}

const TIER_STRIDE: u32 = 100_000;
const MAX_LEN_PENALTY: u32 = TIER_STRIDE / 4 - 1;
const MAX_POS_PENALTY: u32 = 999;

fn score(tier: MatchTier, candidate_len: usize, match_pos: usize) -> u32 {
    let tier_base = (tier as u32 + 1) * TIER_STRIDE;
    let len_penalty = (candidate_len as u32).min(MAX_LEN_PENALTY) * 4;
    let pos_penalty = (match_pos as u32).min(MAX_POS_PENALTY);
    tier_base - len_penalty - pos_penalty
}

/// Build a case-insensitive regex matching `query`'s characters as
/// underscore/hyphen/dot-delimited word starts, e.g. query `mci` matches
/// `my_class_impl` (word starts separated by explicit delimiters) anywhere
/// it appears as a path component.
pub fn delimited_word_start_filter(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    let mut chars = query.chars();
    let first = regex::escape(&chars.next()?.to_string());
    let mut pattern = format!(r"(?i)(?:^|.*[_\-.]){first}");
    for c in chars {
        pattern.push_str(&format!(r".*[_\-.]{}", regex::escape(&c.to_string())));
    }
    Regex::new(&pattern).ok()
}

/// Build a case-sensitive regex matching `query`'s (uppercased) characters
/// as camelCase word starts, e.g. query `mci` matches `MyClassImpl`.
pub fn camel_word_start_filter(query: &str) -> Option<Regex> {
    if query.is_empty() {
        return None;
    }
    let upper: Vec<char> = query.to_uppercase().chars().collect();
    let mut chars = upper.iter();
    let first = regex::escape(&chars.next()?.to_string());
    let mut pattern = format!(r"[^A-Z\n]?{first}");
    for c in chars {
        pattern.push_str(&format!(r"[^A-Z\n]*{}", regex::escape(&c.to_string())));
    }
    Regex::new(&pattern).ok()
}

/// Characters of `query` appear in `candidate`, in order, with arbitrary
/// filler in between. Returns the index of the first matched character
/// when it does.
fn superfuzzy_match(query_lower: &str, candidate_lower: &str) -> Option<usize> {
    if query_lower.is_empty() {
        return None;
    }
    let mut needle = query_lower.chars();
    let mut want = needle.next();
    let mut first_pos = None;

    for (pos, c) in candidate_lower.char_indices() {
        let Some(w) = want else { break };
        if c == w {
            if first_pos.is_none() {
                first_pos = Some(pos);
            }
            want = needle.next();
        }
    }

    if want.is_none() { first_pos } else { None }
}

/// Classify and score `candidate` against `query`, returning both the tier
/// it matched at and the final comparable score. Returns `None` if
/// `candidate` does not match `query` under any tier.
pub fn classify(query: &str, candidate: &str) -> Option<(MatchTier, u32)> {
    if query.is_empty() {
        return None;
    }

    let len = candidate.chars().count();

    if candidate == query {
        return Some((MatchTier::ExactCase, score(MatchTier::ExactCase, len, 0)));
    }

    let query_lower = query.to_lowercase();
    let candidate_lower = candidate.to_lowercase();

    if candidate_lower == query_lower {
        let tier = MatchTier::ExactIgnoreCase;
        return Some((tier, score(tier, len, 0)));
    }

    let start_letters = get_start_letters(candidate);
    let start_letters_lower: String = start_letters.iter().flat_map(|c| c.to_lowercase()).collect();

    if !start_letters_lower.is_empty() && start_letters_lower == query_lower {
        let tier = MatchTier::WordStartEqual;
        return Some((tier, score(tier, len, 0)));
    }

    if start_letters_lower.starts_with(&query_lower) {
        let tier = MatchTier::WordStartPrefix;
        return Some((tier, score(tier, len, 0)));
    }

    if let Some(re) = delimited_word_start_filter(query)
        && let Some(m) = re.find(candidate)
    {
        let tier = MatchTier::WordStartDelimited;
        return Some((tier, score(tier, len, m.start())));
    }

    if let Some(re) = camel_word_start_filter(query)
        && let Some(m) = re.find(candidate)
    {
        let tier = MatchTier::WordStartCamel;
        return Some((tier, score(tier, len, m.start())));
    }

    if let Some(pos) = candidate_lower.find(&query_lower) {
        let tier = MatchTier::Substring;
        return Some((tier, score(tier, len, pos)));
    }

    if let Some(pos) = superfuzzy_match(&query_lower, &candidate_lower) {
        let tier = MatchTier::Superfuzzy;
        return Some((tier, score(tier, len, pos)));
    }

    None
}

/// Score `candidate` against `query`. Returns `None` if `candidate` does
/// not match `query` under any tier.
pub fn rank(query: &str, candidate: &str) -> Option<u32> {
    classify(query, candidate).map(|(_, s)| s)
}

#[cfg(test)]
#[path = "rank_tests.rs"]
mod tests;
