//! Flat form input and the pre-build validation boundary.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::Error;
use crate::model::{Evaluation, ReportData, Section, Summary};
use crate::schema::{RECOMMENDATION_FIELD_LABEL, RECOMMENDATION_KEY, SECTIONS, SUMMARY_FIELDS};

/// Field name to raw string value, as submitted by the form.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct FormInput(HashMap<String, String>);

impl FormInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn from_json(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(|e| Error::Form(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormInput {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Labels of every missing mandatory field, in form order: text fields first,
/// then section evaluations.
pub fn missing_fields(input: &FormInput) -> Vec<String> {
    let mut missing: Vec<String> = SUMMARY_FIELDS
        .iter()
        .filter(|f| f.required && is_blank(input.get(f.key)))
        .map(|f| f.label.to_string())
        .collect();

    for def in &SECTIONS {
        if is_blank(input.get(&def.narrative_key())) {
            missing.push(format!("Narrativa S{}", def.ordinal));
        }
    }
    if is_blank(input.get(RECOMMENDATION_KEY)) {
        missing.push(RECOMMENDATION_FIELD_LABEL.to_string());
    }

    for def in &SECTIONS {
        if Evaluation::from_label(input.get(&def.eval_key())).is_none() {
            missing.push(format!("Evaluación S{}", def.ordinal));
        }
    }
    missing
}

/// Check every mandatory field at once and build the report data.
pub fn validate(input: &FormInput) -> Result<ReportData, Error> {
    let missing = missing_fields(input);
    if !missing.is_empty() {
        log::debug!("form validation failed: {} missing field(s)", missing.len());
        return Err(Error::Validation { missing });
    }
    Ok(ReportData::from_form(input))
}

impl ReportData {
    /// Build report data without validating; blanks stay blank and unknown
    /// evaluations become unset.
    pub fn from_form(input: &FormInput) -> Self {
        let mut summary = Summary::default();
        for f in &SUMMARY_FIELDS {
            (f.set)(&mut summary, input.get(f.key).to_string());
        }
        let sections = SECTIONS
            .iter()
            .map(|def| Section {
                ordinal: def.ordinal,
                title: def.title,
                question: def.question,
                narrative: input.get(&def.narrative_key()).to_string(),
                evaluation: Evaluation::from_label(input.get(&def.eval_key())),
            })
            .collect();
        ReportData {
            summary,
            sections,
            recommendation: input.get(RECOMMENDATION_KEY).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormInput {
        let mut f = FormInput::new();
        for field in &SUMMARY_FIELDS {
            f.set(field.key, "x");
        }
        for def in &SECTIONS {
            f.set(def.narrative_key(), "n");
            f.set(def.eval_key(), "Medio aceptable");
        }
        f.set(RECOMMENDATION_KEY, "ok");
        f
    }

    #[test]
    fn complete_form_validates() {
        let data = validate(&filled()).unwrap();
        assert_eq!(data.sections.len(), 7);
        assert!(data.sections.iter().all(|s| s.evaluation == Some(Evaluation::MediumAcceptable)));
    }

    #[test]
    fn risk_file_is_optional() {
        let mut f = filled();
        f.remove("risk_file");
        assert!(validate(&f).is_ok());
    }

    #[test]
    fn whitespace_counts_as_blank() {
        let mut f = filled();
        f.set("score", "   \n");
        assert_eq!(missing_fields(&f), vec!["Score".to_string()]);
    }

    #[test]
    fn unknown_evaluation_is_unset() {
        let mut f = filled();
        f.set("s5_eval", "Muy bueno");
        assert_eq!(missing_fields(&f), vec!["Evaluación S5".to_string()]);
    }

    #[test]
    fn json_object_maps_to_fields() {
        let f = FormInput::from_json(r#"{"nombre_cliente": "ACME", "s3_eval": "Bien mitigado"}"#)
            .unwrap();
        assert_eq!(f.get("nombre_cliente"), "ACME");
        assert_eq!(f.get("absent"), "");
        assert!(matches!(FormInput::from_json("[1, 2]"), Err(Error::Form(_))));
    }
}
