//! Right-to-left text normalization for generated marketing copy.
//!
//! Generated Farsi text mixes two writing directions and two digit scripts.
//! [`TextNormalizer`] turns it into text that renders correctly inside an RTL
//! paragraph: ASCII digits, canonical English month names, `%` glued to its
//! number, consistent punctuation spacing, and left-to-right isolation marks
//! around every embedded number or month name.
//!
//! Each rule is a pure `fn(&str) -> String`, applied in the order of [`STEPS`].
//! Isolation marks are stripped first and only re-added by the last step, so
//! normalizing already-normalized text is a no-op.

use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};

use super::date::MONTHS;

/// LEFT-TO-RIGHT ISOLATE
pub const LRI: char = '\u{2066}';
/// POP DIRECTIONAL ISOLATE
pub const PDI: char = '\u{2069}';

const PERSIAN_DIGITS: &str = "۰۱۲۳۴۵۶۷۸۹";
const ARABIC_INDIC_DIGITS: &str = "٠١٢٣٤٥٦٧٨٩";
const ASCII_DIGITS: &str = "0123456789";

/// Marks after which no space is inserted before them and one space follows.
const CLOSING_PUNCTUATION: &[char] = &[',', '،', ';', '؛', '.', '?', '؟', '!', '»', '”', ')'];
/// Marks that attach to the word after them.
const OPENING_PUNCTUATION: &[char] = &['«', '“', '('];

/// A number with optional `.`/`,` groups (`7`, `12.5`, `1,000`, `3.53.5`).
/// Every rule that reads numbers matches this whole token, never a tail of it.
const NUMBER_PATTERN: &str = r"[0-9]+(?:[.,][0-9]+)*";

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static LATIN_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z]+").unwrap());
static NUMBER_THEN_PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"({NUMBER_PATTERN})\s*[%٪]+")).unwrap());
static PERCENT_THEN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"(^|[^0-9])[%٪]+\s*({NUMBER_PATTERN})")).unwrap());
static PERCENTAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{NUMBER_PATTERN}%")).unwrap());
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(NUMBER_PATTERN).unwrap());
static ISOLATION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("[A-Za-z]+|{NUMBER_PATTERN}%?")).unwrap());

/// A single normalization rule
pub type Step = fn(&str) -> String;

/// Discount-independent rules, in application order.
///
/// Digit conversion runs before the percent rule because the latter matches
/// ASCII digits only. Months come last: dropping a stray percent sign can join
/// two Latin fragments into a new word.
pub const STEPS: &[(&str, Step)] = &[
    ("strip_directional_marks", strip_directional_marks),
    ("convert_digits", convert_digits),
    ("collapse_whitespace", collapse_whitespace),
    ("normalize_percentages", normalize_percentages),
    ("normalize_punctuation", normalize_punctuation),
    ("canonicalize_months", canonicalize_months),
];

/// Normalizer for generated text, optionally pinned to a requested discount.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    discount: Option<String>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin every percentage in the output to the number found in
    /// `discount_type` (e.g. `"30% off"` → `30`). Descriptions without a number
    /// leave percentages untouched.
    pub fn with_discount(discount_type: &str) -> Self {
        Self {
            discount: discount_number(discount_type),
        }
    }

    pub fn discount(&self) -> Option<&str> {
        self.discount.as_deref()
    }

    /// All rules except directional isolation. The result contains no
    /// directional marks and is suitable for embedding in a prompt.
    pub fn clean(&self, text: &str) -> String {
        let cleaned = STEPS
            .iter()
            .fold(text.to_string(), |acc, (_, step)| step(&acc));

        match &self.discount {
            Some(discount) => override_discount(&cleaned, discount),
            None => cleaned,
        }
    }

    /// Full normalization for display in an RTL paragraph.
    pub fn normalize(&self, text: &str) -> String {
        isolate_ltr_runs(&self.clean(text))
    }
}

/// Remove embedding, override and isolate controls plus LRM/RLM marks.
pub fn strip_directional_marks(text: &str) -> String {
    text.chars()
        .filter(|c| !is_directional_mark(*c))
        .collect()
}

fn is_directional_mark(c: char) -> bool {
    matches!(c, '\u{200E}' | '\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

/// Map Perso-Arabic and Arabic-Indic digits to ASCII.
pub fn convert_digits(text: &str) -> String {
    text.chars().map(to_ascii_digit).collect()
}

fn to_ascii_digit(c: char) -> char {
    [PERSIAN_DIGITS, ARABIC_INDIC_DIGITS]
        .iter()
        .find_map(|digits| digits.chars().position(|d| d == c))
        .and_then(|index| ASCII_DIGITS.chars().nth(index))
        .unwrap_or(c)
}

/// Any whitespace run becomes one space; ends are trimmed.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Replace month names in any casing, or spelled backwards, with the
/// canonical capitalized English name.
pub fn canonicalize_months(text: &str) -> String {
    LATIN_WORD
        .replace_all(text, |caps: &Captures| {
            let word = &caps[0];
            canonical_month(word).unwrap_or(word).to_string()
        })
        .into_owned()
}

/// Canonical month for a whole Latin word, if it names one.
fn canonical_month(word: &str) -> Option<&'static str> {
    if !(3..=9).contains(&word.len()) {
        return None;
    }

    MONTHS.iter().copied().find(|month| {
        month.eq_ignore_ascii_case(word) || is_reversed_month(month, word)
    })
}

/// Workaround: some RTL renderers upstream of the model reverse embedded
/// Latin words, so "June" comes back as "enuJ". Only the exact reversal of the
/// canonical spelling is accepted.
fn is_reversed_month(month: &str, word: &str) -> bool {
    month.len() == word.len() && month.chars().rev().eq(word.chars())
}

/// Glue percent signs to the number before them.
///
/// `50 ٪` and `50 %` become `50%`, a leading `%50` becomes `50%`, and percent
/// signs attached to no number (including repeats such as `50%%`) are dropped.
pub fn normalize_percentages(text: &str) -> String {
    let attached = NUMBER_THEN_PERCENT.replace_all(text, "$1%");
    let swapped = PERCENT_THEN_NUMBER.replace_all(&attached, "${1}${2}%");
    collapse_whitespace(&drop_orphan_percents(&swapped))
}

/// Keep a percent sign only directly after an ASCII digit, as `%`.
fn drop_orphan_percents(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if !matches!(c, '%' | '٪') {
            out.push(c);
        } else if out.ends_with(|prev: char| prev.is_ascii_digit()) {
            out.push('%');
        }
    }
    out
}

/// Closing marks: no space before, one space after (none before another closing
/// mark or at the end). Opening marks: one space before, none after. A `.`, `,`
/// or `،` inside a Latin token (`2.5`, `1,000`, `example.com`) is left alone.
pub fn normalize_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if CLOSING_PUNCTUATION.contains(&c) && !is_inline_separator(&chars, i) {
            trim_trailing_spaces(&mut out);
            out.push(c);
            i = skip_whitespace(&chars, i + 1);
            if i < chars.len() && !CLOSING_PUNCTUATION.contains(&chars[i]) {
                out.push(' ');
            }
            continue;
        }

        if OPENING_PUNCTUATION.contains(&c) {
            let needs_space = out
                .chars()
                .last()
                .is_some_and(|prev| !prev.is_whitespace() && !OPENING_PUNCTUATION.contains(&prev));
            if needs_space {
                out.push(' ');
            }
            out.push(c);
            i = skip_whitespace(&chars, i + 1);
            continue;
        }

        out.push(c);
        i += 1;
    }

    out.trim().to_string()
}

fn is_inline_separator(chars: &[char], i: usize) -> bool {
    matches!(chars[i], '.' | ',' | '،')
        && i > 0
        && chars[i - 1].is_ascii_alphanumeric()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_alphanumeric())
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}

fn trim_trailing_spaces(out: &mut String) {
    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
}

/// Rewrite every percentage in `text` to `discount%`. The whole number before
/// the sign is replaced (`1,000%` → `30%`).
pub fn override_discount(text: &str, discount: &str) -> String {
    let replacement = format!("{discount}%");
    PERCENTAGE
        .replace_all(text, NoExpand(&replacement))
        .into_owned()
}

/// Number of a discount description, with digits in ASCII. A number carrying
/// a percent sign wins over any earlier number (`"buy 2, 30% off"` → `30`).
pub fn discount_number(discount_type: &str) -> Option<String> {
    let ascii = convert_digits(discount_type);
    NUMBER_THEN_PERCENT
        .captures(&ascii)
        .map(|caps| caps[1].to_string())
        .or_else(|| NUMBER.find(&ascii).map(|m| m.as_str().to_string()))
}

/// Wrap every number, `number%` and canonical month name in LRI … PDI.
/// Grouped numbers (`1,000`, `12.5%`) are wrapped as one run.
pub fn isolate_ltr_runs(text: &str) -> String {
    ISOLATION_TOKEN
        .replace_all(text, |caps: &Captures| {
            let token = &caps[0];
            let is_number = token.starts_with(|c: char| c.is_ascii_digit());
            if is_number || MONTHS.contains(&token) {
                format!("{LRI}{token}{PDI}")
            } else {
                token.to_string()
            }
        })
        .into_owned()
}
