//! Heuristic chapter counting for free-text passage references.
//!
//! Reading plans write passages the way people do (`"Gn 3-5"`,
//! `"Ag 1-2; Zc 1-2"`, `"Sl 119"`), not in a formal grammar. Each
//! `;`-separated clause is classified by an ordered chain of matchers
//! (range, list, single number, bare book name) and the first match decides
//! how many chapters the clause is worth. Parsing never fails: the worst case
//! is an undercount.

use std::sync::LazyLock;

use regex::Regex;

//
// ─── PATTERNS ──────────────────────────────────────────────────────────────────
//

static RE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)(?::([0-9]+))?\s*-\s*([0-9]+)(?::([0-9]+))?")
        .expect("range pattern is valid")
});

static RE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\s*,\s*[0-9]+)+").expect("list pattern is valid"));

/// Books read in a single day when the clause names no chapter at all.
///
/// Matched as substrings of the lower-cased clause, first hit wins. These are
/// conventions of the plan's abbreviations, not a scripture chapter table.
const WHOLE_BOOK_CHAPTERS: &[(&str, u32)] = &[
    ("jn", 4),
    ("fm", 1),
    ("jd", 1),
    ("2 jo", 1),
    ("3 jo", 1),
];

const DEFAULT_BAREWORD_CHAPTERS: u32 = 1;

//
// ─── CLAUSES ───────────────────────────────────────────────────────────────────
//

/// Classification of a single passage clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassageClause {
    /// `start[:verse]-end[:verse]`; `end` is already normalized to the start
    /// chapter for verse-only ranges such as `14:21-25`.
    Range { start: u32, end: u32 },
    /// A comma-separated run of two or more chapters.
    List { chapters: Vec<u32> },
    /// Any other clause that names a number.
    Single,
    /// A clause without digits: a whole (short) book.
    Bareword { chapters: u32 },
}

impl PassageClause {
    /// Classify one clause. Returns `None` for blank input.
    #[must_use]
    pub fn classify(clause: &str) -> Option<Self> {
        let clause = clause.trim();
        if clause.is_empty() {
            return None;
        }
        MATCHERS.iter().find_map(|matcher| matcher(clause))
    }

    /// Number of chapters this clause represents.
    #[must_use]
    pub fn chapter_count(&self) -> u32 {
        match self {
            Self::Range { start, end } if start == end => 1,
            Self::Range { start, end } => start.abs_diff(*end).saturating_add(1),
            Self::List { chapters } => u32::try_from(chapters.len()).unwrap_or(u32::MAX),
            Self::Single => 1,
            Self::Bareword { chapters } => *chapters,
        }
    }
}

type Matcher = fn(&str) -> Option<PassageClause>;

/// Precedence order: a range also contains digits a later matcher would
/// accept, so it must be tried first.
const MATCHERS: [Matcher; 4] = [match_range, match_list, match_single, match_bareword];

fn match_range(clause: &str) -> Option<PassageClause> {
    let caps = RE_RANGE.captures(clause)?;
    let start = caps.get(1)?.as_str().parse::<u32>().ok()?;
    let start_has_verse = caps.get(2).is_some();
    let end = caps.get(3)?.as_str().parse::<u32>().ok()?;
    let end_has_verse = caps.get(4).is_some();

    // `14:21-25` reads as verses 21..25 of chapter 14.
    let end = if start_has_verse && !end_has_verse {
        start
    } else {
        end
    };
    Some(PassageClause::Range { start, end })
}

fn match_list(clause: &str) -> Option<PassageClause> {
    let run = RE_LIST.find(clause)?;
    let chapters = run
        .as_str()
        .split(',')
        .map(|n| n.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;
    Some(PassageClause::List { chapters })
}

fn match_single(clause: &str) -> Option<PassageClause> {
    clause
        .chars()
        .any(|c| c.is_ascii_digit())
        .then_some(PassageClause::Single)
}

fn match_bareword(clause: &str) -> Option<PassageClause> {
    let lowered = clause.to_lowercase();
    let chapters = WHOLE_BOOK_CHAPTERS
        .iter()
        .find(|(abbrev, _)| lowered.contains(abbrev))
        .map_or(DEFAULT_BAREWORD_CHAPTERS, |(_, chapters)| *chapters);
    Some(PassageClause::Bareword { chapters })
}

//
// ─── PASSAGE ───────────────────────────────────────────────────────────────────
//

/// A parsed passage reference: the classified clauses of one plan entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Passage {
    clauses: Vec<PassageClause>,
}

impl Passage {
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let clauses = text.split(';').filter_map(PassageClause::classify).collect();
        Self { clauses }
    }

    #[must_use]
    pub fn clauses(&self) -> &[PassageClause] {
        &self.clauses
    }

    /// Sum of clause counts; 0 when there are no clauses.
    #[must_use]
    pub fn raw_chapter_count(&self) -> u32 {
        self.clauses
            .iter()
            .map(PassageClause::chapter_count)
            .fold(0, u32::saturating_add)
    }

    /// Chapter count clamped to at least 1 so callers can divide by it.
    #[must_use]
    pub fn chapter_count(&self) -> u32 {
        self.raw_chapter_count().max(1)
    }
}

/// Number of chapters a passage reference represents (always >= 1).
#[must_use]
pub fn count_chapters(passage: &str) -> u32 {
    Passage::parse(passage).chapter_count()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
