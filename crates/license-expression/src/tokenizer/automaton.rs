//! Multi-word tokenizer backed by an Aho-Corasick automaton.
//!
//! Patterns and expressions are both normalized by [`normalize_pattern`]:
//! split into words and parentheses, lowercased and joined with single
//! spaces. `"GNU  General Public"`, `"gnu general public"` and
//! `"a(b)"` / `"a (b)"` therefore meet on the same text.
//!
//! A match only counts when it starts and ends on a word or parenthesis
//! boundary. From each word, the longest such match wins.

use std::collections::{HashMap, HashSet};

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};

use super::simple::{fragments, Fragment};
use super::{Keyword, Token, TokenValue};
use crate::error::{LicenseError, LicenseResult};
use crate::symbol::{LicenseSymbol, Symbol};

/// Automaton tokenizer over keywords, registered keys and aliases.
#[derive(Debug, Clone)]
pub(crate) struct AdvancedTokenizer {
    automaton: AhoCorasick,
    /// Token value of each pattern, indexed by `PatternID`.
    values: Vec<TokenValue>,
}

/// Distinct normalized patterns in registration order.
#[derive(Debug, Default)]
struct PatternSet {
    patterns: Vec<String>,
    values: Vec<TokenValue>,
    seen: HashSet<String>,
}

impl PatternSet {
    /// The first value registered for a pattern wins.
    fn add(&mut self, pattern: &str, value: TokenValue) {
        let normalized = normalize_pattern(pattern);
        if normalized.is_empty() || !self.seen.insert(normalized.clone()) {
            return;
        }
        self.patterns.push(normalized);
        self.values.push(value);
    }
}

impl AdvancedTokenizer {
    /// Creates a tokenizer that knows the keywords only.
    #[cfg(test)]
    pub(crate) fn new() -> LicenseResult<Self> {
        Self::from_symbols(std::iter::empty())
    }

    /// Creates a tokenizer for the keywords plus every key and alias of
    /// `symbols`.
    pub(crate) fn from_symbols<'a>(
        symbols: impl IntoIterator<Item = &'a LicenseSymbol>,
    ) -> LicenseResult<Self> {
        let mut set = PatternSet::default();
        for keyword in Keyword::ALL {
            set.add(keyword.as_str(), TokenValue::Keyword(keyword));
        }
        for symbol in symbols {
            let value = TokenValue::Symbol(Symbol::License(symbol.clone()));
            set.add(symbol.key(), value.clone());
            for alias in symbol.aliases() {
                set.add(alias, value.clone());
            }
        }

        // Overlapping search needs the standard match kind; the longest
        // boundary-aligned match is picked afterwards.
        let automaton = AhoCorasickBuilder::new()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&set.patterns)
            .map_err(|e| LicenseError::Matcher(e.to_string()))?;

        Ok(Self {
            automaton,
            values: set.values,
        })
    }

    /// Number of distinct patterns, keywords included.
    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    /// Tokenizes `expression`. Text matching no pattern is kept as tokens
    /// without a value, one per word, as is whitespace.
    pub(crate) fn tokenize(&self, expression: &str) -> LicenseResult<Vec<Token>> {
        let fragments = fragments(expression)?;
        let words = Words::new(&fragments);
        let longest = self.longest_matches(&words);

        let mut tokens = Vec::with_capacity(fragments.len());
        let mut i = 0;
        while i < fragments.len() {
            let (start, kind, text) = fragments[i];
            let matched = words.index_of_fragment[i].and_then(|word| longest[word]);

            match (kind, matched) {
                (Fragment::Space, _) | (_, None) => {
                    tokens.push(Token::new(start, text, None));
                    i += 1;
                }
                (_, Some((last_word, pattern))) => {
                    let last = words.fragment_of_word[last_word];
                    let (last_start, _, last_text) = fragments[last];
                    let end = last_start + last_text.len();
                    let value = self.values[pattern].clone();
                    tokens.push(Token::new(start, &expression[start..end], Some(value)));
                    i = last + 1;
                }
            }
        }

        Ok(tokens)
    }

    /// For each word, the last word and pattern of the longest
    /// boundary-aligned match starting there.
    fn longest_matches(&self, words: &Words) -> Vec<Option<(usize, usize)>> {
        let mut longest: Vec<Option<(usize, usize)>> = vec![None; words.fragment_of_word.len()];

        for found in self.automaton.find_overlapping_iter(words.text.as_str()) {
            let (Some(&first), Some(&last)) = (
                words.word_starting_at.get(&found.start()),
                words.word_ending_at.get(&found.end()),
            ) else {
                continue;
            };
            let pattern = found.pattern().as_usize();
            match longest[first] {
                Some((best_last, _)) if best_last >= last => {}
                _ => longest[first] = Some((last, pattern)),
            }
        }

        longest
    }
}

/// The non-space fragments of an expression joined into normalized text,
/// with the maps needed to go back to fragments.
struct Words {
    text: String,
    fragment_of_word: Vec<usize>,
    index_of_fragment: Vec<Option<usize>>,
    word_starting_at: HashMap<usize, usize>,
    word_ending_at: HashMap<usize, usize>,
}

impl Words {
    fn new(fragments: &[(usize, Fragment, &str)]) -> Self {
        let mut words = Words {
            text: String::new(),
            fragment_of_word: Vec::new(),
            index_of_fragment: vec![None; fragments.len()],
            word_starting_at: HashMap::new(),
            word_ending_at: HashMap::new(),
        };

        for (index, (_, kind, text)) in fragments.iter().enumerate() {
            if *kind == Fragment::Space {
                continue;
            }
            let word = words.fragment_of_word.len();
            if word > 0 {
                words.text.push(' ');
            }
            words.word_starting_at.insert(words.text.len(), word);
            words.text.push_str(&text.to_lowercase());
            words.word_ending_at.insert(words.text.len(), word);
            words.fragment_of_word.push(index);
            words.index_of_fragment[index] = Some(word);
        }

        words
    }
}

/// Lowercases `text` and rewrites it as its words and parentheses joined
/// by single spaces.
///
/// Two keys or aliases with the same normalized form are indistinguishable
/// to the tokenizer.
pub(crate) fn normalize_pattern(text: &str) -> String {
    let lowered = text.to_lowercase();
    match fragments(&lowered) {
        Ok(fragments) => fragments
            .into_iter()
            .filter(|(_, kind, _)| *kind != Fragment::Space)
            .map(|(_, _, text)| text)
            .collect::<Vec<_>>()
            .join(" "),
        Err(_) => String::new(),
    }
}
