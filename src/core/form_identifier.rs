use regex::{Regex, RegexBuilder};

use crate::core::model::FormType;
use crate::error::{Result, TaxsegError};

/// Canonical titles printed in the top-left corner of each known form, in
/// match order. Schedules come before the bare `Form 1040` title, which would
/// otherwise claim every `SCHEDULE X (Form 1040)` page.
///
/// Forms outside the scored set are listed too: recognising them is what ends
/// the preceding form's segment.
pub const IRS_FORM_TITLES: &[(&str, &str)] = &[
    ("f1040s1", "SCHEDULE 1 (Form 1040)"),
    ("f1040s2", "SCHEDULE 2 (Form 1040)"),
    ("f1040s3", "SCHEDULE 3 (Form 1040)"),
    ("f1040sa", "SCHEDULE A (Form 1040)"),
    ("f1040sb", "SCHEDULE B (Form 1040)"),
    ("f1040sc", "SCHEDULE C (Form 1040)"),
    ("f1040sd", "SCHEDULE D (Form 1040)"),
    ("f1040se", "SCHEDULE E (Form 1040)"),
    ("f1040s8812", "SCHEDULE 8812 (Form 1040)"),
    ("1040f", "Form 1040"),
    ("f8889", "Form 8889"),
    ("f8879", "Form 8879"),
    ("f1116", "Form 1116"),
    ("f4952", "Form 4952"),
    ("f8949", "Form 8949"),
    ("f8995", "Form 8995"),
    ("f8959", "Form 8959"),
    ("f8960", "Form 8960"),
    ("f8582", "Form 8582"),
    ("f8863", "Form 8863"),
    ("f8812", "Form 8812"),
    ("f2441", "Form 2441"),
];

/// One registry entry: a form type and the case-insensitive matcher that
/// recognises it in a page's corner text.
#[derive(Debug, Clone)]
pub struct FormPattern {
    label: FormType,
    matcher: Regex,
}

impl FormPattern {
    /// Builds a pattern from a canonical title such as `SCHEDULE C (Form 1040)`.
    ///
    /// Each space in the title matches any run of whitespace, since text
    /// extraction often splits or doubles the gaps. A title ending in a word
    /// character must end on a word boundary, so `Form 1040` does not match
    /// `Form 10400`.
    pub fn from_title(label: impl Into<FormType>, title: &str) -> Result<Self> {
        Self::from_regex(label, &title_regex(title)?)
    }

    pub fn from_regex(label: impl Into<FormType>, pattern: &str) -> Result<Self> {
        let label = label.into();
        let matcher = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|err| {
                TaxsegError::InvalidConfig(format!("pattern for '{label}' does not compile: {err}"))
            })?;
        Ok(Self { label, matcher })
    }

    pub fn label(&self) -> &FormType {
        &self.label
    }

    pub fn matches(&self, region_text: &str) -> bool {
        self.matcher.is_match(region_text)
    }
}

fn title_regex(title: &str) -> Result<String> {
    let words: Vec<String> = title.split_whitespace().map(regex::escape).collect();
    if words.is_empty() {
        return Err(TaxsegError::InvalidConfig("form title is empty".into()));
    }
    let mut pattern = words.join(r"\s+");
    if title
        .trim_end()
        .chars()
        .last()
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
    {
        pattern.push_str(r"\b");
    }
    Ok(pattern)
}

/// Ordered list of form patterns. Scanned top to bottom; the first pattern
/// that matches decides the label.
#[derive(Debug, Clone)]
pub struct FormRegistry {
    patterns: Vec<FormPattern>,
}

impl FormRegistry {
    pub fn new(patterns: Vec<FormPattern>) -> Result<Self> {
        if patterns.is_empty() {
            return Err(TaxsegError::InvalidConfig(
                "form registry needs at least one pattern".into(),
            ));
        }
        Ok(Self { patterns })
    }

    /// Registry built from [`IRS_FORM_TITLES`].
    pub fn irs_default() -> Self {
        let patterns = IRS_FORM_TITLES
            .iter()
            .map(|(label, title)| {
                FormPattern::from_title(*label, title).expect("built-in form titles are valid")
            })
            .collect();
        Self { patterns }
    }

    pub fn identify(&self, region_text: &str) -> Option<&FormType> {
        self.patterns
            .iter()
            .find(|pattern| pattern.matches(region_text))
            .map(FormPattern::label)
    }
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self::irs_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn label_of(registry: &FormRegistry, text: &str) -> Option<String> {
        registry.identify(text).map(|t| t.to_string())
    }

    #[test]
    fn identifies_main_form() {
        let registry = FormRegistry::irs_default();
        assert_eq!(
            label_of(&registry, "Form 1040\nDepartment of the Treasury"),
            Some("1040f".into())
        );
    }

    #[test]
    fn schedule_title_wins_over_bare_form_title() {
        let registry = FormRegistry::irs_default();
        assert_eq!(
            label_of(&registry, "SCHEDULE C\n(Form 1040)\n2023"),
            Some("f1040sc".into())
        );
    }

    #[test]
    fn tolerates_case_and_irregular_whitespace() {
        let registry = FormRegistry::irs_default();
        assert_eq!(
            label_of(&registry, "schedule   e \t (form\n1040)"),
            Some("f1040se".into())
        );
        assert_eq!(label_of(&registry, "FORM\u{a0}8949"), Some("f8949".into()));
    }

    #[test]
    fn form_number_needs_word_boundary() {
        let registry = FormRegistry::irs_default();
        assert_eq!(label_of(&registry, "Form 10400"), None);
        assert_eq!(label_of(&registry, "Form 1040-SR"), Some("1040f".into()));
    }

    #[test]
    fn no_match_returns_none() {
        let registry = FormRegistry::irs_default();
        assert_eq!(label_of(&registry, ""), None);
        assert_eq!(label_of(&registry, "Continuation sheet"), None);
    }

    #[test]
    fn earlier_pattern_takes_precedence() {
        let registry = FormRegistry::new(vec![
            FormPattern::from_title("first", "Form 8889").unwrap(),
            FormPattern::from_title("second", "Form 8949").unwrap(),
        ])
        .unwrap();
        assert_eq!(
            label_of(&registry, "Form 8949 attach to Form 8889"),
            Some("first".into())
        );

        let reversed = FormRegistry::new(vec![
            FormPattern::from_title("second", "Form 8949").unwrap(),
            FormPattern::from_title("first", "Form 8889").unwrap(),
        ])
        .unwrap();
        assert_eq!(
            label_of(&reversed, "Form 8949 attach to Form 8889"),
            Some("second".into())
        );
    }

    #[test]
    fn title_parentheses_are_literal() {
        assert_eq!(
            title_regex("SCHEDULE C (Form 1040)").unwrap(),
            r"SCHEDULE\s+C\s+\(Form\s+1040\)"
        );
        assert_eq!(title_regex("Form 8889").unwrap(), r"Form\s+8889\b");
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(FormPattern::from_regex("x", "(unclosed").is_err());
        assert!(FormPattern::from_title("x", "   ").is_err());
        assert!(FormRegistry::new(Vec::new()).is_err());
    }

    #[test]
    fn identification_is_deterministic() {
        let registry = FormRegistry::irs_default();
        let text = "SCHEDULE D (Form 1040) and Form 8949";
        let first = label_of(&registry, text);
        for _ in 0..10 {
            assert_eq!(label_of(&registry, text), first);
        }
        assert_eq!(first, Some("f1040sd".into()));
    }
}
