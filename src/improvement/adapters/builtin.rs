//! Built-in improvers seeded into every registry.
//!
//! - `default`: trims, capitalises and terminates the sentence
//! - `professional`: swaps casual words for formal ones, then formats
//! - `creative`: swaps plain adjectives for livelier ones and ends with `!`

use crate::improvement::{
    domain::ImprovementContext, error::ImproverResult, ports::MessageImprover,
};
use async_trait::async_trait;

/// Registry name of [`ProfessionalImprover`].
pub const PROFESSIONAL_IMPROVER: &str = "professional";

/// Registry name of [`CreativeImprover`].
pub const CREATIVE_IMPROVER: &str = "creative";

const TERMINAL_PUNCTUATION: [char; 3] = ['.', '!', '?'];

const PROFESSIONAL_WORDS: &[(&str, &str)] = &[
    ("gonna", "going to"),
    ("wanna", "want to"),
    ("gotta", "have to"),
    ("yeah", "yes"),
    ("yep", "yes"),
    ("nope", "no"),
    ("hey", "hello"),
    ("thx", "thank you"),
    ("thanks", "thank you"),
    ("u", "you"),
    ("ur", "your"),
    ("pls", "please"),
    ("asap", "as soon as possible"),
];

const CREATIVE_WORDS: &[(&str, &str)] = &[
    ("good", "wonderful"),
    ("bad", "challenging"),
    ("big", "enormous"),
    ("small", "tiny"),
    ("happy", "delighted"),
    ("nice", "delightful"),
    ("great", "magnificent"),
];

/// Trims, capitalises the first character and appends `.` unless the text
/// already ends in `.`, `!` or `?`.
///
/// Blank input yields an empty string.
///
/// # Examples
///
/// ```
/// use parley::improvement::adapters::builtin::format_sentence;
///
/// assert_eq!(format_sentence("hi there"), "Hi there.");
/// assert_eq!(format_sentence("  really?  "), "Really?");
/// ```
#[must_use]
pub fn format_sentence(text: &str) -> String {
    let mut sentence = capitalise_first(text.trim());
    if !sentence.is_empty() && !sentence.ends_with(TERMINAL_PUNCTUATION) {
        sentence.push('.');
    }
    sentence
}

fn capitalise_first(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Replaces whole words found in `table`, matching case-insensitively.
///
/// Trailing punctuation stays attached to the replacement, and a capitalised
/// source word yields a capitalised replacement. Runs of whitespace collapse
/// to single spaces.
#[must_use]
pub fn substitute_words(text: &str, table: &[(&str, &str)]) -> String {
    text.split_whitespace()
        .map(|token| substitute_token(token, table))
        .collect::<Vec<_>>()
        .join(" ")
}

fn substitute_token(token: &str, table: &[(&str, &str)]) -> String {
    let word = token.trim_end_matches(|c: char| c.is_ascii_punctuation());
    let suffix = token.get(word.len()..).unwrap_or_default();

    let Some((_, replacement)) = table
        .iter()
        .find(|(from, _)| from.eq_ignore_ascii_case(word))
    else {
        return token.to_owned();
    };

    let starts_upper = word.chars().next().is_some_and(char::is_uppercase);
    let mut rewritten = if starts_upper {
        capitalise_first(replacement)
    } else {
        (*replacement).to_owned()
    };
    rewritten.push_str(suffix);
    rewritten
}

/// The `default` improver; see [`format_sentence`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultImprover;

#[async_trait]
impl MessageImprover for DefaultImprover {
    async fn improve(&self, text: &str, _context: &ImprovementContext) -> ImproverResult<String> {
        Ok(format_sentence(text))
    }
}

/// The `professional` improver.
///
/// # Examples
///
/// ```
/// use parley::improvement::adapters::builtin::{ProfessionalImprover, professional};
///
/// assert_eq!(professional("hey, u gonna call?"), "Hello, you going to call?");
/// # let _ = ProfessionalImprover;
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfessionalImprover;

/// Applies the professional substitutions followed by [`format_sentence`].
#[must_use]
pub fn professional(text: &str) -> String {
    format_sentence(&substitute_words(text, PROFESSIONAL_WORDS))
}

#[async_trait]
impl MessageImprover for ProfessionalImprover {
    async fn improve(&self, text: &str, _context: &ImprovementContext) -> ImproverResult<String> {
        Ok(professional(text))
    }
}

/// The `creative` improver.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreativeImprover;

/// Applies the creative substitutions, capitalises, and ends unterminated
/// text with `!`.
///
/// # Examples
///
/// ```
/// use parley::improvement::adapters::builtin::creative;
///
/// assert_eq!(creative("a good day"), "A wonderful day!");
/// assert_eq!(creative("is it big?"), "Is it enormous?");
/// ```
#[must_use]
pub fn creative(text: &str) -> String {
    let mut decorated = capitalise_first(&substitute_words(text, CREATIVE_WORDS));
    if !decorated.is_empty() && !decorated.ends_with(TERMINAL_PUNCTUATION) {
        decorated.push('!');
    }
    decorated
}

#[async_trait]
impl MessageImprover for CreativeImprover {
    async fn improve(&self, text: &str, _context: &ImprovementContext) -> ImproverResult<String> {
        Ok(creative(text))
    }
}
