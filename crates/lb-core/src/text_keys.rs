//! Localization key normalization.
//!
//! Bot texts were historically stored under keys with a removable prefix
//! (`text_welcome`) and later looked up without it (`welcome`). Callers may
//! pass either form and must get the same text, so every key is reduced to
//! its normalized form before storage and lookup.

use std::collections::{BTreeMap, HashMap};

/// Strip the first matching prefix from `key`.
///
/// A key that consists only of a prefix is returned unchanged, so normalizing
/// never produces an empty key.
pub fn normalize_key<'a>(key: &'a str, prefixes: &[String]) -> &'a str {
    prefixes
        .iter()
        .find_map(|p| key.strip_prefix(p.as_str()).filter(|rest| !rest.is_empty()))
        .unwrap_or(key)
}

/// A prefixed key that will be stored under its normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRename {
    pub from: String,
    pub to: String,
}

/// Two source keys that normalize to the same key but carry different text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyConflict {
    /// Normalized key both entries map to
    pub key: String,
    /// Entry that keeps its text
    pub kept: String,
    /// Entry whose text is discarded
    pub dropped: String,
}

/// Result of normalizing a set of localization entries.
#[derive(Debug, Clone, Default)]
pub struct KeyRenamePlan {
    pub renames: Vec<KeyRename>,
    pub conflicts: Vec<KeyConflict>,
    /// Entries under their normalized keys
    pub normalized: BTreeMap<String, String>,
}

impl KeyRenamePlan {
    /// True when nothing needs renaming.
    pub fn is_noop(&self) -> bool {
        self.renames.is_empty() && self.conflicts.is_empty()
    }
}

/// Compute the renames that bring `entries` to normalized keys.
///
/// Unprefixed keys are authoritative: when a prefixed key collides with an
/// existing unprefixed one, the unprefixed text is kept and a conflict is
/// recorded if the texts differ. Identical duplicates merge silently.
pub fn plan_key_renames(entries: &BTreeMap<String, String>, prefixes: &[String]) -> KeyRenamePlan {
    let mut plan = KeyRenamePlan::default();
    let mut origin: HashMap<String, String> = HashMap::new();

    let (unprefixed, prefixed): (Vec<_>, Vec<_>) = entries
        .iter()
        .partition(|(k, _)| normalize_key(k, prefixes) == k.as_str());

    for (key, text) in unprefixed {
        plan.normalized.insert(key.clone(), text.clone());
        origin.insert(key.clone(), key.clone());
    }

    for (key, text) in prefixed {
        let target = normalize_key(key, prefixes).to_string();
        plan.renames.push(KeyRename {
            from: key.clone(),
            to: target.clone(),
        });
        match plan.normalized.get(&target) {
            Some(existing) if existing != text => {
                let kept = origin.get(&target).cloned().unwrap_or_else(|| target.clone());
                log::warn!("Text key '{key}' conflicts with '{kept}'; keeping '{kept}'");
                plan.conflicts.push(KeyConflict {
                    key: target,
                    kept,
                    dropped: key.clone(),
                });
            }
            Some(_) => {}
            None => {
                plan.normalized.insert(target.clone(), text.clone());
                origin.insert(target, key.clone());
            }
        }
    }

    plan
}

/// Text lookup that accepts prefixed and unprefixed keys alike.
#[derive(Debug, Clone, Default)]
pub struct TextCatalog {
    prefixes: Vec<String>,
    texts: BTreeMap<String, String>,
}

impl TextCatalog {
    /// Build a catalog from raw entries, normalizing their keys.
    pub fn new(entries: &BTreeMap<String, String>, prefixes: &[String]) -> Self {
        let plan = plan_key_renames(entries, prefixes);
        Self {
            prefixes: prefixes.to_vec(),
            texts: plan.normalized,
        }
    }

    /// Resolve `key` in either form.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        self.texts
            .get(normalize_key(key, &self.prefixes))
            .map(String::as_str)
    }

    /// Normalized keys, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.texts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}

#[cfg(test)]
#[path = "text_keys_test.rs"]
mod tests;
