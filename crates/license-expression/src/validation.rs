//! Consistency checks for a set of known license symbols.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::symbol::LicenseSymbol;
use crate::tokenizer::automaton::normalize_pattern;
use crate::tokenizer::Keyword;

/// Problems found in a set of license symbols.
///
/// `errors` make the set unusable as a registry; `warnings` do not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValidationReport {
    /// Non-blocking problems, such as duplicated or blank aliases.
    pub warnings: Vec<String>,
    /// Blocking problems.
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// True when no errors were found.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when there is nothing to report at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Checks a set of symbols for use as a registry.
///
/// Every problem is reported, not just the first:
///
/// - two keys equal ignoring case,
/// - one alias claimed by two different keys (a key is also an alias of
///   itself),
/// - an alias that is a keyword,
/// - an exception key registered twice.
///
/// Duplicated or blank aliases of one symbol are warnings.
///
/// # Example
///
/// ```rust
/// use license_expression::{validate_symbols, LicenseSymbol};
///
/// let symbols = vec![
///     LicenseSymbol::new("MIT").unwrap(),
///     LicenseSymbol::new("mit").unwrap(),
/// ];
/// let report = validate_symbols(&symbols);
/// assert!(!report.is_valid());
/// assert_eq!(report.errors, vec!["Invalid duplicated license key: mit.".to_string()]);
/// ```
pub fn validate_symbols<'a>(symbols: impl IntoIterator<Item = &'a LicenseSymbol>) -> ValidationReport {
    let mut warnings = Vec::new();

    let mut seen_keys: BTreeSet<String> = BTreeSet::new();
    // lowercase alias -> (lowercase key, key as registered)
    let mut seen_aliases: HashMap<String, (String, String)> = HashMap::new();
    let mut seen_exceptions: BTreeSet<String> = BTreeSet::new();

    let mut dupe_keys: BTreeSet<String> = BTreeSet::new();
    let mut dupe_aliases: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut dupe_exceptions: BTreeSet<String> = BTreeSet::new();
    let mut aliases_as_keywords: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for symbol in symbols {
        let key = symbol.key();
        let key_lower = key.to_lowercase();

        if !seen_keys.insert(key_lower.clone()) {
            dupe_keys.insert(key.to_string());
        }

        let mut aliases: BTreeSet<String> = symbol
            .aliases()
            .iter()
            .map(|a| normalize_pattern(a))
            .filter(|a| !a.is_empty())
            .collect();
        if aliases.len() != symbol.aliases().len() {
            warnings.push(format!(
                "Duplicated or empty aliases ignored for license key: {:?}.",
                key
            ));
        }
        aliases.insert(normalize_pattern(key));

        for alias in aliases {
            if let Some((owner_lower, owner)) = seen_aliases.get(&alias) {
                if *owner_lower != key_lower {
                    let keys = dupe_aliases.entry(alias.clone()).or_default();
                    keys.insert(owner.clone());
                    keys.insert(key.to_string());
                }
            }
            if Keyword::is_reserved(&alias) {
                aliases_as_keywords
                    .entry(key.to_string())
                    .or_default()
                    .insert(alias.clone());
            }
            seen_aliases
                .entry(alias)
                .or_insert_with(|| (key_lower.clone(), key.to_string()));
        }

        if symbol.is_exception() && !seen_exceptions.insert(key_lower.clone()) {
            dupe_exceptions.insert(key_lower);
        }
    }

    let mut errors = Vec::new();
    for key in dupe_keys {
        errors.push(format!("Invalid duplicated license key: {}.", key));
    }
    for (alias, keys) in dupe_aliases {
        errors.push(format!(
            "Invalid duplicated alias pointing to multiple keys: {} point to keys: {}.",
            alias,
            keys.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }
    for key in dupe_exceptions {
        errors.push(format!("Invalid duplicated license exception key: {}.", key));
    }
    for (key, aliases) in aliases_as_keywords {
        errors.push(format!(
            "Invalid aliases: an alias cannot be an expression keyword. key: {:?}, aliases: {}.",
            key,
            aliases.into_iter().collect::<Vec<_>>().join(", ")
        ));
    }

    ValidationReport { warnings, errors }
}
