//! The anamnesis questionnaire: sections, fields and follow-up relations
//!
//! Field ids double as JSON keys in the submitted payload, so they follow
//! the names the receiving script expects.

use super::conditional::ConditionalRelation;
use super::field::FormField;
use super::form_state::Section;
use crate::validation::MaskKind;

pub const NAME: &str = "nome";
pub const CPF: &str = "cpf";
pub const BIRTH_DATE: &str = "data_nascimento";
pub const PHONE: &str = "telefone";
pub const EMAIL: &str = "email";
pub const CEP: &str = "cep";
pub const ADDRESS: &str = "endereco";
pub const CONSENT: &str = "consentimento";
pub const SIGNATURE: &str = "assinatura";

/// Keys the submission adds on top of the field ids
#[allow(dead_code)]
pub const METADATA_KEYS: [&str; 4] = [
    "timestamp",
    "submission_date",
    "submission_time",
    "filename",
];

/// Complete description of a form
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub sections: Vec<Section>,
    pub fields: Vec<FormField>,
    pub relations: Vec<ConditionalRelation>,
}

/// Yes/no question with a revealed "details" follow-up
fn question_with_details(
    fields: &mut Vec<FormField>,
    relations: &mut Vec<ConditionalRelation>,
    id: &str,
    question: &str,
    details: &str,
) -> [String; 2] {
    let details_id = format!("{id}_detalhes");
    fields.push(FormField::choice(id, question).required());
    fields.push(FormField::text(&details_id, details).hidden());
    relations.push(ConditionalRelation::on_yes(id, &details_id));
    [id.to_string(), details_id]
}

impl FormSchema {
    /// Dental anamnesis: identification, general health, dental history,
    /// consent and signature.
    pub fn anamnesis() -> Self {
        let mut fields = Vec::new();
        let mut relations = Vec::new();
        let mut sections = Vec::new();

        // Identification
        fields.extend([
            FormField::text(NAME, "Nome completo").required(),
            FormField::masked(CPF, "CPF", MaskKind::Cpf).required(),
            FormField::masked(BIRTH_DATE, "Data de nascimento", MaskKind::BirthDate).required(),
            FormField::masked(PHONE, "Telefone", MaskKind::Phone).required(),
            FormField::email(EMAIL, "E-mail").required(),
            FormField::masked(CEP, "CEP", MaskKind::Cep),
            FormField::text(ADDRESS, "Endereço"),
        ]);
        sections.push(Section::new(
            "identificacao",
            "Identificação",
            &[NAME, CPF, BIRTH_DATE, PHONE, EMAIL, CEP, ADDRESS],
        ));

        // General health
        let mut health: Vec<String> = Vec::new();
        for (id, question, details) in [
            (
                "em_tratamento",
                "Está em tratamento médico?",
                "Qual tratamento?",
            ),
            (
                "medicamentos",
                "Faz uso de algum medicamento?",
                "Quais medicamentos?",
            ),
            (
                "alergias",
                "Possui alergia a algum medicamento ou material?",
                "Quais alergias?",
            ),
            (
                "cirurgias",
                "Já passou por alguma cirurgia?",
                "Qual cirurgia e quando?",
            ),
        ] {
            health.extend(question_with_details(
                &mut fields,
                &mut relations,
                id,
                question,
                details,
            ));
        }
        for (id, question) in [
            ("cardiopatia", "Possui problemas cardíacos?"),
            ("hipertensao", "Tem pressão alta?"),
            ("diabetes", "Tem diabetes?"),
            ("fumante", "É fumante?"),
        ] {
            fields.push(FormField::choice(id, question).required());
            health.push(id.to_string());
        }
        fields.push(FormField::choice("gestante", "Está grávida?"));
        fields.push(
            FormField::text("gestante_semanas", "Quantas semanas?").hidden(),
        );
        relations.push(ConditionalRelation::on_yes("gestante", "gestante_semanas"));
        health.extend(["gestante".to_string(), "gestante_semanas".to_string()]);
        let health: Vec<&str> = health.iter().map(String::as_str).collect();
        sections.push(Section::new("saude", "Saúde geral", &health));

        // Dental history
        fields.push(
            FormField::multiline("motivo_consulta", "Motivo da consulta").required(),
        );
        fields.push(FormField::text(
            "ultima_consulta",
            "Última consulta ao dentista",
        ));
        let mut dental = vec!["motivo_consulta".to_string(), "ultima_consulta".to_string()];
        for (id, question) in [
            ("sangramento_gengival", "Sua gengiva sangra com frequência?"),
            ("sensibilidade", "Tem sensibilidade nos dentes?"),
            ("bruxismo", "Range ou aperta os dentes?"),
        ] {
            fields.push(FormField::choice(id, question).required());
            dental.push(id.to_string());
        }
        dental.extend(question_with_details(
            &mut fields,
            &mut relations,
            "reacao_anestesia",
            "Já teve reação à anestesia?",
            "Descreva a reação",
        ));
        fields.push(FormField::multiline("observacoes", "Observações"));
        dental.push("observacoes".to_string());
        let dental: Vec<&str> = dental.iter().map(String::as_str).collect();
        sections.push(Section::new(
            "odontologico",
            "Histórico odontológico",
            &dental,
        ));

        // Consent and signature are checked by the submit guard, not as
        // required fields
        fields.push(FormField::checkbox(
            CONSENT,
            "Declaro que as informações acima são verdadeiras",
        ));
        fields.push(FormField::signature(SIGNATURE, "Assinatura"));
        sections.push(Section::new(
            "assinatura",
            "Termo e assinatura",
            &[CONSENT, SIGNATURE],
        ));

        Self {
            sections,
            fields,
            relations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_section_field_exists() {
        let schema = FormSchema::anamnesis();
        let ids: HashSet<&str> = schema.fields.iter().map(|f| f.id.as_str()).collect();
        for section in &schema.sections {
            for id in &section.field_ids {
                assert!(ids.contains(id.as_str()), "{id} missing");
            }
        }
    }

    #[test]
    fn test_every_field_belongs_to_one_section() {
        let schema = FormSchema::anamnesis();
        let placed: Vec<&str> = schema
            .sections
            .iter()
            .flat_map(|s| s.field_ids.iter().map(String::as_str))
            .collect();
        let unique: HashSet<&str> = placed.iter().copied().collect();
        assert_eq!(placed.len(), unique.len());
        assert_eq!(placed.len(), schema.fields.len());
    }

    #[test]
    fn test_relation_targets_start_hidden() {
        let schema = FormSchema::anamnesis();
        for relation in &schema.relations {
            let target = schema
                .fields
                .iter()
                .find(|f| f.id == relation.target)
                .unwrap();
            assert!(!target.is_visible);
            assert!(!target.is_required);
        }
    }

    #[test]
    fn test_field_ids_do_not_collide_with_metadata() {
        let schema = FormSchema::anamnesis();
        for key in METADATA_KEYS {
            assert!(schema.fields.iter().all(|f| f.id != key));
        }
    }

    #[test]
    fn test_consent_is_not_a_required_field() {
        let schema = FormSchema::anamnesis();
        let consent = schema.fields.iter().find(|f| f.id == CONSENT).unwrap();
        assert!(!consent.is_required);
    }

    #[test]
    fn test_signature_is_last_section() {
        let schema = FormSchema::anamnesis();
        let last = schema.sections.last().unwrap();
        assert!(last.field_ids.iter().any(|id| id == SIGNATURE));
        assert!(last.field_ids.iter().any(|id| id == CONSENT));
    }
}
