//! # Treebank Word Tokenizer
//!
//! Splits a sentence into Penn Treebank style word tokens: punctuation and
//! brackets become their own tokens, double quotes become `` and '', and
//! clitics such as `n't` and `'s` are split from their host word.

use regex::Regex;

use crate::error::Result;

/// A token extracted from a sentence with positional information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// The token text content
    pub text: String,
    /// Start byte position in the original string
    pub start: usize,
    /// End byte position in the original string
    pub end: usize,
    /// Token index in the sequence
    pub index: usize,
}

/// Rewrite rules applied before the text is padded with spaces.
const STARTING_QUOTES: &[(&str, &str)] = &[
    (r#"^""#, "``"),
    (r"(``)", " ${1} "),
    (r#"([ (\[{<])("|'')"#, "${1} `` "),
];

const PUNCTUATION: &[(&str, &str)] = &[
    (r"([:,])([^\d])", " ${1} ${2}"),
    (r"([:,])$", " ${1} "),
    (r"\.\.\.", " ... "),
    (r"[;@#$%&]", " ${0} "),
    (r#"([^\.])(\.)([\]\)}>"']*)\s*$"#, "${1} ${2}${3} "),
    (r"[?!]", " ${0} "),
    (r"([^'])' ", "${1} ' "),
];

const PARENS: &[(&str, &str)] = &[(r"[\]\[\(\)\{\}<>]", " ${0} "), (r"--", " -- ")];

/// Rewrite rules applied after padding, which rely on a trailing space.
const ENDING_QUOTES: &[(&str, &str)] = &[
    (r#"""#, " '' "),
    (r"(\S)('')", "${1} ${2} "),
    (r"([^' ])('[sS]|'[mM]|'[dD]|') ", "${1} ${2} "),
    (r"([^' ])('ll|'LL|'re|'RE|'ve|'VE|n't|N'T) ", "${1} ${2} "),
];

const CONTRACTIONS: &[(&str, &str)] = &[
    (r"(?i)\b(can)(not)\b", " ${1} ${2} "),
    (r"(?i)\b(d)('ye)\b", " ${1} ${2} "),
    (r"(?i)\b(gim)(me)\b", " ${1} ${2} "),
    (r"(?i)\b(gon)(na)\b", " ${1} ${2} "),
    (r"(?i)\b(got)(ta)\b", " ${1} ${2} "),
    (r"(?i)\b(lem)(me)\b", " ${1} ${2} "),
    (r"(?i)\b(more)('n)\b", " ${1} ${2} "),
    (r"(?i)\b(wan)(na)\s", " ${1} ${2} "),
];

/// Tokenizer for English sentences.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    before_padding: Vec<(Regex, &'static str)>,
    after_padding: Vec<(Regex, &'static str)>,
}

impl Tokenizer {
    /// Create a new tokenizer instance with pre-compiled rewrite rules.
    ///
    /// # Errors
    ///
    /// Returns `HmmError::Regex` if any pattern fails to compile
    /// (should never happen with the static patterns defined here).
    pub fn new() -> Result<Self> {
        Ok(Self {
            before_padding: compile(&[STARTING_QUOTES, PUNCTUATION, PARENS])?,
            after_padding: compile(&[ENDING_QUOTES, CONTRACTIONS])?,
        })
    }

    /// Tokenize a sentence into a sequence of tokens.
    ///
    /// # Examples
    /// ```
    /// use hmmpos_core::text::Tokenizer;
    ///
    /// let tokenizer = Tokenizer::new().unwrap();
    /// let tokens = tokenizer.tokenize("They don't bark.");
    /// let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    /// assert_eq!(texts, ["They", "do", "n't", "bark", "."]);
    /// ```
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        let mut text = input.to_string();
        for (re, rep) in &self.before_padding {
            text = re.replace_all(&text, *rep).into_owned();
        }
        text = format!(" {text} ");
        for (re, rep) in &self.after_padding {
            text = re.replace_all(&text, *rep).into_owned();
        }

        let mut tokens = Vec::new();
        let mut cursor = 0;
        for (index, piece) in text.split_whitespace().enumerate() {
            let (start, end) = locate(input, cursor, piece).unwrap_or((cursor, cursor));
            cursor = end;
            tokens.push(Token {
                text: piece.to_string(),
                start,
                end,
                index,
            });
        }
        tokens
    }

    /// Tokenize and keep only the token texts.
    pub fn words(&self, input: &str) -> Vec<String> {
        self.tokenize(input).into_iter().map(|t| t.text).collect()
    }
}

fn compile(groups: &[&[(&str, &'static str)]]) -> Result<Vec<(Regex, &'static str)>> {
    let mut rules = Vec::new();
    for group in groups {
        for &(pattern, rep) in *group {
            rules.push((Regex::new(pattern)?, rep));
        }
    }
    Ok(rules)
}

/// Finds the span of `piece` in `input` at or after `from`.
///
/// Converted quote tokens are matched against the `"` they replaced.
fn locate(input: &str, from: usize, piece: &str) -> Option<(usize, usize)> {
    let rest = input.get(from..)?;
    let hit = |needle: &str| {
        rest.find(needle)
            .map(|pos| (from + pos, from + pos + needle.len()))
    };

    let direct = hit(piece);
    if !matches!(piece, "``" | "''") {
        return direct;
    }
    match (direct, hit("\"")) {
        (Some(a), Some(b)) => Some(if b.0 < a.0 { b } else { a }),
        (a, b) => a.or(b),
    }
}
