//! Quote requests.
//!
//! A valid request is turned into a pre-filled `WhatsApp` message. The site
//! hands the link to the browser and never learns whether it was sent.

use buffet_simone_core::validation::{
    FieldErrors, validate_allergy_details, validate_email, validate_guest_count, validate_name,
    validate_phone,
};
use serde::Deserialize;

/// Base of the `WhatsApp` click-to-chat link.
pub const WHATSAPP_SEND_URL: &str = "https://api.whatsapp.com/send";

/// Quote form as submitted. Field names follow the site's form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "tipoEvento")]
    pub event_type: String,
    #[serde(rename = "dataEvento")]
    pub event_date: String,
    #[serde(rename = "numConvidados")]
    pub guest_count: String,
    #[serde(rename = "detalhes")]
    pub details: String,
    #[serde(rename = "temAlergia", deserialize_with = "yes_no")]
    pub has_allergy: bool,
    #[serde(rename = "alergias")]
    pub allergies: String,
}

/// Accepts `true`/`false` as well as the form's `"sim"`/`"não"`.
fn yes_no<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(value) => value,
        Raw::Text(text) => matches!(text.trim().to_lowercase().as_str(), "sim" | "true"),
    })
}

impl QuoteRequest {
    /// Run every field validator; all failures are reported at once.
    ///
    /// # Errors
    ///
    /// Returns the failing fields keyed by their form names.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.check("nome", validate_name(&self.name));
        errors.check("telefone", validate_phone(&self.phone));
        errors.check("email", validate_email(&self.email));
        errors.check("numConvidados", validate_guest_count(&self.guest_count));
        errors.check(
            "alergias",
            validate_allergy_details(&self.allergies, self.has_allergy),
        );
        errors.into_result()
    }

    /// The message sent to the buffet.
    #[must_use]
    pub fn message(&self) -> String {
        let allergy = if self.has_allergy {
            format!("sim ({})", self.allergies)
        } else {
            "não".to_owned()
        };

        [
            "Olá, quero solicitar um orçamento:".to_owned(),
            format!("- Nome: {}", self.name),
            format!("- Telefone: {}", self.phone),
            format!("- E-mail: {}", self.email),
            format!("- Tipo de Evento: {}", self.event_type),
            format!("- Data do Evento: {}", self.event_date),
            format!("- Número de Convidados: {}", self.guest_count),
            format!("- Detalhes: {}", self.details),
            format!("- Possui alergia: {allergy}"),
        ]
        .join("\n")
    }
}

/// Click-to-chat link opening a conversation with `number` and `text`.
#[must_use]
pub fn whatsapp_url(number: &str, text: &str) -> String {
    format!(
        "{WHATSAPP_SEND_URL}?phone={number}&text={}",
        urlencoding::encode(text)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use buffet_simone_core::validation::ValidationError;

    use super::*;

    fn valid() -> QuoteRequest {
        QuoteRequest {
            name: "Maria Souza".into(),
            phone: "(11) 99999-9999".into(),
            email: "maria@example.com".into(),
            event_type: "Casamento".into(),
            event_date: "2026-12-12".into(),
            guest_count: "120".into(),
            details: "Buffet completo".into(),
            has_allergy: false,
            allergies: String::new(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_reports_every_failing_field() {
        let request = QuoteRequest {
            name: "Al".into(),
            phone: String::new(),
            email: "maria@".into(),
            guest_count: "0".into(),
            has_allergy: true,
            ..valid()
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get("nome"), Some(ValidationError::NameTooShort));
        assert_eq!(errors.get("telefone"), Some(ValidationError::PhoneRequired));
        assert_eq!(errors.get("email"), Some(ValidationError::EmailFormat));
        assert_eq!(
            errors.get("numConvidados"),
            Some(ValidationError::GuestCountNotPositive)
        );
        assert_eq!(
            errors.get("alergias"),
            Some(ValidationError::AllergyDetailsRequired)
        );
    }

    #[test]
    fn test_message_lines() {
        let mut request = valid();
        assert!(request.message().ends_with("- Possui alergia: não"));

        request.has_allergy = true;
        request.allergies = "camarão".into();
        let message = request.message();
        assert!(message.starts_with("Olá, quero solicitar um orçamento:\n- Nome: Maria Souza"));
        assert!(message.ends_with("- Possui alergia: sim (camarão)"));
    }

    #[test]
    fn test_whatsapp_url_encodes_text() {
        let url = whatsapp_url("5511960882764", "Olá & até\nlogo");
        assert_eq!(
            url,
            "https://api.whatsapp.com/send?phone=5511960882764&text=Ol%C3%A1%20%26%20at%C3%A9%0Alogo"
        );
    }

    #[test]
    fn test_deserializes_form_names() {
        let request: QuoteRequest = serde_json::from_value(serde_json::json!({
            "nome": "Maria Souza",
            "temAlergia": "sim",
            "alergias": "glúten"
        }))
        .unwrap();
        assert!(request.has_allergy);
        assert_eq!(request.allergies, "glúten");
        assert!(request.email.is_empty());

        let request: QuoteRequest =
            serde_json::from_value(serde_json::json!({ "temAlergia": "não" })).unwrap();
        assert!(!request.has_allergy);
    }
}
