//! Tokenizer for prefixed command input.
//!
//! Splits `!name pos1 "quoted pos" --key=value -flag` into a command token,
//! ordered positional arguments and a bag of named arguments:
//! - Whitespace-separated words
//! - Quoted spans using the configured quote character
//! - Escape sequences within quotes
//! - Named arguments introduced by the configured separator

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::config::ParserOptions;

/// Value of a named argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Bare `-flag` with no value.
    Flag,
    /// `-key=value`.
    Text(String),
}

impl ArgValue {
    /// Returns the text value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            ArgValue::Flag => None,
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, ArgValue::Flag)
    }
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ArgValue::Flag => serializer.serialize_bool(true),
            ArgValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Arguments that follow the command token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Args {
    /// Positional arguments in input order.
    pub positional: Vec<String>,
    /// Named arguments; a repeated key keeps its last value.
    pub named: BTreeMap<String, ArgValue>,
}

impl Args {
    /// Looks up a named argument.
    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.named.get(key)
    }

    /// Returns true if the named argument is present, with or without a value.
    pub fn has(&self, key: &str) -> bool {
        self.named.contains_key(key)
    }
}

/// Result of parsing one prefixed input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    /// Leading token after the prefix. Empty when nothing follows the prefix.
    pub command: String,
    pub args: Args,
}

/// A whitespace-delimited word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    /// The word opened with a quote, so it is never read as a named argument.
    pub quoted: bool,
}

/// Tokenizer bound to one set of parser options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenizer {
    options: ParserOptions,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl Tokenizer {
    pub fn new(options: ParserOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Returns true if `input` starts with the configured prefix.
    pub fn has_prefix(&self, input: &str) -> bool {
        !self.options.prefix.is_empty() && input.starts_with(&self.options.prefix)
    }

    /// Parses a prefixed input. Returns `None` when the prefix is missing.
    pub fn parse(&self, input: &str) -> Option<ParsedCommand> {
        if !self.has_prefix(input) {
            return None;
        }
        let body = &input[self.options.prefix.len()..];

        let mut words = self.split_words(body).into_iter();
        let command = words.next().map(|w| w.text).unwrap_or_default();

        let mut args = Args::default();
        for word in words {
            match self.named_pair(&word) {
                Some((key, value)) => {
                    args.named.insert(key, value);
                }
                None => args.positional.push(word.text),
            }
        }

        Some(ParsedCommand { command, args })
    }

    /// Splits text into words, keeping quoted spans together.
    pub fn split_words(&self, input: &str) -> Vec<Word> {
        let mut words = Vec::new();
        let mut chars = input.chars().peekable();

        while let Some(&c) = chars.peek() {
            // Skip whitespace
            if c.is_whitespace() {
                chars.next();
                continue;
            }

            let quoted = self.options.use_quotes && c == self.options.quote_char;
            let text = self.collect_word(&mut chars);
            words.push(Word { text, quoted });
        }

        words
    }

    /// Collects a word, handling quoted spans anywhere inside it.
    fn collect_word(&self, chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
        let mut result = String::new();

        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }

            chars.next();
            if self.options.use_quotes && c == self.options.quote_char {
                result.push_str(&collect_quoted(chars, c));
                continue;
            }

            result.push(c);
        }

        result
    }

    /// Reads `word` as a named argument if it starts with the separator.
    fn named_pair(&self, word: &Word) -> Option<(String, ArgValue)> {
        let separator = self.options.named_separator.as_str();
        if word.quoted || separator.is_empty() || !word.text.starts_with(separator) {
            return None;
        }

        // Negative numbers stay positional
        if word.text.parse::<f64>().is_ok() {
            return None;
        }

        let rest = word.text.trim_start_matches(separator);
        if rest.is_empty() {
            return None;
        }

        match rest.split_once('=') {
            Some(("", _)) => None,
            Some((key, value)) => Some((key.to_string(), ArgValue::Text(value.to_string()))),
            None => Some((rest.to_string(), ArgValue::Flag)),
        }
    }
}

/// Collects characters inside quotes, handling escape sequences.
fn collect_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) -> String {
    let mut result = String::new();
    let mut escaped = false;

    for c in chars.by_ref() {
        if escaped {
            match c {
                'n' => result.push('\n'),
                't' => result.push('\t'),
                'r' => result.push('\r'),
                '\\' => result.push('\\'),
                c if c == quote => result.push(c),
                _ => {
                    // Unknown escape, keep as-is
                    result.push('\\');
                    result.push(c);
                }
            }
            escaped = false;
            continue;
        }

        if c == '\\' {
            escaped = true;
            continue;
        }

        if c == quote {
            break; // End of quoted string
        }

        result.push(c);
    }

    result
}
