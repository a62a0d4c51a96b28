//! Drug name normalizer.
//!
//! Handles:
//! - Case folding (Unicode lowercase)
//! - Punctuation stripping (every non-alphanumeric character becomes a space)
//! - Whitespace collapsing
//! - Trailing dosage-form / pharmacopoeia suffix removal ("tablets", "injection", "usp")

use std::collections::HashSet;

/// Normalizer for registry drug names.
pub struct Normalizer {
    /// Tokens dropped from the end of a name
    suffixes: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a new normalizer with the default suffix list.
    pub fn new() -> Self {
        Self {
            suffixes: Self::default_suffixes(),
        }
    }

    /// Normalize a raw drug name.
    ///
    /// Total: never fails, blank or punctuation-only input yields `""`.
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned: String = raw
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();

        let mut tokens: Vec<&str> = cleaned.split_whitespace().collect();

        // Never strip a name down to nothing
        while tokens.len() > 1 && tokens.last().is_some_and(|t| self.suffixes.contains(*t)) {
            tokens.pop();
        }

        tokens.join(" ")
    }

    /// Whether a token is treated as a removable suffix.
    pub fn is_suffix(&self, token: &str) -> bool {
        self.suffixes.contains(&token.to_lowercase())
    }

    /// Add a custom suffix token.
    pub fn add_suffix(&mut self, suffix: &str) {
        self.suffixes.insert(suffix.to_lowercase());
    }

    /// Default suffix tokens.
    fn default_suffixes() -> HashSet<String> {
        let mut set = HashSet::new();

        // Solid oral forms
        for s in ["tablet", "tablets", "tab", "tabs", "capsule", "capsules", "cap", "caps"] {
            set.insert(s.to_string());
        }

        // Parenterals
        for s in ["injection", "injectable", "inj", "infusion", "vial", "vials"] {
            set.insert(s.to_string());
        }

        // Liquids
        for s in ["solution", "suspension", "syrup", "drops", "elixir", "emulsion"] {
            set.insert(s.to_string());
        }

        // Topicals
        for s in ["cream", "ointment", "gel", "lotion", "patch"] {
            set.insert(s.to_string());
        }

        // Pharmacopoeia marks and connectors left dangling by the forms above
        for s in ["usp", "ip", "bp", "ep", "for"] {
            set.insert(s.to_string());
        }

        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_punctuation() {
        let normalizer = Normalizer::new();

        assert_eq!(normalizer.normalize("Aspirin"), "aspirin");
        assert_eq!(normalizer.normalize("Acetyl-Salicylic  Acid"), "acetyl salicylic acid");
        assert_eq!(
            normalizer.normalize("Amoxicillin + Clavulanate (Potassium)"),
            "amoxicillin clavulanate potassium"
        );
    }

    #[test]
    fn test_suffix_removal() {
        let normalizer = Normalizer::new();

        assert_eq!(normalizer.normalize("Aspirin 100mg Tablets"), "aspirin 100mg");
        assert_eq!(normalizer.normalize("Insulin (Human) Injection USP"), "insulin human");
        assert_eq!(normalizer.normalize("Ceftriaxone for Injection"), "ceftriaxone");

        // Suffix tokens only drop from the end
        assert_eq!(normalizer.normalize("Tablet Press Aspirin"), "tablet press aspirin");
    }

    #[test]
    fn test_never_strips_to_empty() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("Tablets"), "tablets");
        assert_eq!(normalizer.normalize("Cream USP"), "cream");
    }

    #[test]
    fn test_blank_input() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize(""), "");
        assert_eq!(normalizer.normalize("   "), "");
        assert_eq!(normalizer.normalize("--/()"), "");
    }

    #[test]
    fn test_unicode_letters_survive() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("Bléomycine"), "bléomycine");
    }

    #[test]
    fn test_custom_suffix() {
        let mut normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize("Heparin Sodium"), "heparin sodium");

        normalizer.add_suffix("Sodium");
        assert!(normalizer.is_suffix("SODIUM"));
        assert_eq!(normalizer.normalize("Heparin Sodium"), "heparin");
    }
}
