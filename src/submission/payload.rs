//! Submission payload

use crate::state::schema;
use crate::validation::digits_only;
use chrono::{DateTime, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;
use uuid::Uuid;

/// Snapshot of the form at submit time plus derived metadata.
///
/// Serializes to a flat JSON object: one key per field id, then
/// `timestamp`, `submission_date`, `submission_time` and `filename`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    #[serde(skip)]
    attempt_id: Uuid,
    #[serde(flatten)]
    fields: BTreeMap<String, String>,
    timestamp: String,
    submission_date: String,
    submission_time: String,
    filename: String,
}

impl SubmissionPayload {
    /// Build from trimmed field values at local time `now`
    pub fn build<Tz>(fields: BTreeMap<String, String>, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let name = fields.get(schema::NAME).map(String::as_str).unwrap_or("");
        let cpf = fields.get(schema::CPF).map(String::as_str).unwrap_or("");
        let filename = derive_filename(name, cpf, now.date_naive());

        Self {
            attempt_id: Uuid::new_v4(),
            timestamp: now
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
            submission_date: now.format("%d/%m/%Y").to_string(),
            submission_time: now.format("%H:%M:%S").to_string(),
            filename,
            fields,
        }
    }

    /// Identifies this attempt in logs; never sent
    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    #[allow(dead_code)]
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    #[allow(dead_code)]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// `Anamnese_<name>_<cpf digits>_<DD-MM-YYYY>.pdf`
///
/// Whitespace runs in the name become a single underscore; characters that
/// are awkward in file names are dropped.
pub fn derive_filename(name: &str, cpf: &str, date: NaiveDate) -> String {
    let name = name
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '.'))
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    format!(
        "Anamnese_{}_{}_{}.pdf",
        name,
        digits_only(cpf),
        date.format("%d-%m-%Y")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use pretty_assertions::assert_eq;

    fn values() -> BTreeMap<String, String> {
        [
            (schema::NAME, "Maria da Silva"),
            (schema::CPF, "529.982.247-25"),
            (schema::EMAIL, "maria@example.com"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn sao_paulo_time() -> DateTime<FixedOffset> {
        FixedOffset::west_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 7, 14, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_metadata_formats() {
        let payload = SubmissionPayload::build(values(), &sao_paulo_time());
        assert_eq!(payload.timestamp(), "2024-03-07T17:05:09.000Z");
        assert_eq!(payload.submission_date, "07/03/2024");
        assert_eq!(payload.submission_time, "14:05:09");
        assert_eq!(
            payload.filename(),
            "Anamnese_Maria_da_Silva_52998224725_07-03-2024.pdf"
        );
    }

    #[test]
    fn test_json_is_flat() {
        let payload = SubmissionPayload::build(values(), &sao_paulo_time());
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3 + schema::METADATA_KEYS.len());
        assert_eq!(object["nome"], "Maria da Silva");
        assert_eq!(object["cpf"], "529.982.247-25");
        for key in schema::METADATA_KEYS {
            assert!(object.contains_key(key), "{key} missing");
        }
        assert!(!object.contains_key("attempt_id"));
    }

    #[test]
    fn test_attempts_get_distinct_ids() {
        let a = SubmissionPayload::build(values(), &sao_paulo_time());
        let b = SubmissionPayload::build(values(), &sao_paulo_time());
        assert_ne!(a.attempt_id(), b.attempt_id());
    }

    #[test]
    fn test_filename_collapses_whitespace() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(
            derive_filename("  João   Pedro\tSouza ", "123.456.789-09", date),
            "Anamnese_João_Pedro_Souza_12345678909_31-12-2024.pdf"
        );
    }

    #[test]
    fn test_filename_drops_path_characters() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            derive_filename("Ana/..\\Maria", "", date),
            "Anamnese_Ana..Maria__02-01-2024.pdf"
        );
    }

    #[test]
    fn test_missing_name_and_cpf() {
        let payload = SubmissionPayload::build(BTreeMap::new(), &sao_paulo_time());
        assert_eq!(payload.filename(), "Anamnese___07-03-2024.pdf");
        assert!(payload.fields().is_empty());
    }
}
