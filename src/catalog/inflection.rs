//! String inflection for column synonyms.
//!
//! Planners refer to columns the way people talk ("order date", "customers"),
//! so the builder derives spaced and singular/plural forms of column names.
//! Uses the `inflector` crate with a short list of irregular plurals that
//! show up in spreadsheet headers.

use inflector::Inflector;

static IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("analysis", "analyses"),
    ("criterion", "criteria"),
    ("datum", "data"),
    ("medium", "media"),
    ("index", "indices"),
    ("status", "statuses"),
];

/// Pluralize a word, handling irregulars first then falling back to inflector.
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *singular || lower == *plural {
            return plural.to_string();
        }
    }

    word.to_plural()
}

/// Singularize a word, handling irregulars first then falling back to inflector.
pub fn singularize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    for (singular, plural) in IRREGULAR_PLURALS {
        if lower == *plural || lower == *singular {
            return singular.to_string();
        }
    }

    word.to_singular()
}

/// `order_date`, `OrderDate` and `order-date` all become `order date`.
pub fn humanize(name: &str) -> String {
    name.to_snake_case().replace('_', " ")
}

/// Derived synonyms for a column name, excluding the name itself.
pub(crate) fn derive_synonyms(name: &str) -> Vec<String> {
    let spaced = humanize(name);
    let mut words: Vec<&str> = spaced.split(' ').filter(|w| !w.is_empty()).collect();
    let Some(last) = words.pop() else {
        return Vec::new();
    };

    let singular = singularize(last);
    let other_number = if singular == last {
        pluralize(last)
    } else {
        singular
    };

    words.push(&other_number);
    let inflected = words.join(" ");

    let mut synonyms: Vec<String> = Vec::new();
    for candidate in [spaced.clone(), inflected] {
        if !candidate.eq_ignore_ascii_case(name) && !synonyms.contains(&candidate) {
            synonyms.push(candidate);
        }
    }
    synonyms
}
