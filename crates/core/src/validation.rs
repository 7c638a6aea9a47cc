//! Field validators for the public quote form and the admin forms.
//!
//! Every validator is a pure function returning `Ok(())` when the value is
//! acceptable and a [`ValidationError`] otherwise. The error's `Display` is
//! the message shown next to the field, in Portuguese.
//!
//! Forms run every validator and collect all failures into [`FieldErrors`];
//! they never stop at the first error.

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Brazilian phone: optional parenthesised area code, optional space,
/// 4 or 5 digits, optional hyphen, 4 digits.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(?[0-9]{2}\)?\s?[0-9]{4,5}-?[0-9]{4}$").expect("Invalid regex")
});

/// Loose `local@domain.tld` shape.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

/// Minimum number of characters in a full name.
pub const MIN_NAME_CHARS: usize = 3;

/// A single field validation failure.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Por favor, insira seu nome completo.")]
    NameRequired,
    #[error("O nome parece muito curto.")]
    NameTooShort,
    #[error("Telefone é obrigatório.")]
    PhoneRequired,
    #[error("Formato inválido. Ex: (11) 99999-9999")]
    PhoneFormat,
    #[error("E-mail é obrigatório.")]
    EmailRequired,
    #[error("Digite um e-mail válido.")]
    EmailFormat,
    #[error("Digite apenas números.")]
    GuestCountNotNumeric,
    #[error("O número de convidados deve ser positivo.")]
    GuestCountNotPositive,
    #[error("Por favor, informe quais são as alergias.")]
    AllergyDetailsRequired,
    /// A required admin form field is blank.
    #[error("Preencha todos os campos!")]
    Required,
    #[error("Preço inválido.")]
    InvalidPrice,
    #[error("O preço máximo é R$ 1.000.000,00.")]
    PriceTooHigh,
}

/// Validate a full name.
///
/// # Errors
///
/// Blank input, or fewer than [`MIN_NAME_CHARS`] characters once trimmed.
pub fn validate_name(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if trimmed.chars().count() < MIN_NAME_CHARS {
        return Err(ValidationError::NameTooShort);
    }
    Ok(())
}

/// Validate a phone number such as `(11) 99999-9999` or `11999999999`.
///
/// # Errors
///
/// Blank input, or input not matching the phone pattern.
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::PhoneRequired);
    }
    if !PHONE_RE.is_match(value) {
        return Err(ValidationError::PhoneFormat);
    }
    Ok(())
}

/// Validate an email address.
///
/// # Errors
///
/// Blank input, or input not shaped like `local@domain.tld`.
pub fn validate_email(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmailRequired);
    }
    if !EMAIL_RE.is_match(value) {
        return Err(ValidationError::EmailFormat);
    }
    Ok(())
}

/// Validate the optional guest count.
///
/// An empty value is accepted. Surrounding whitespace is ignored and a
/// whitespace-only value counts as zero.
///
/// # Errors
///
/// Non-numeric input, or a number below one.
pub fn validate_guest_count(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let trimmed = value.trim();
    let count = if trimmed.is_empty() {
        0.0
    } else {
        trimmed
            .parse::<f64>()
            .ok()
            .filter(|n| !n.is_nan())
            .ok_or(ValidationError::GuestCountNotNumeric)?
    };
    if count < 1.0 {
        return Err(ValidationError::GuestCountNotPositive);
    }
    Ok(())
}

/// Validate the allergy details, required only when the guest declared an
/// allergy.
///
/// # Errors
///
/// `has_allergy` is set and the details are blank.
pub fn validate_allergy_details(value: &str, has_allergy: bool) -> Result<(), ValidationError> {
    if has_allergy && value.trim().is_empty() {
        return Err(ValidationError::AllergyDetailsRequired);
    }
    Ok(())
}

/// Require a non-blank value.
///
/// # Errors
///
/// Returns `ValidationError::Required` for blank input.
pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required);
    }
    Ok(())
}

/// Ordered collection of per-field validation failures.
///
/// Serializes as a JSON object mapping field name to message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: Vec<(&'static str, ValidationError)>,
}

impl FieldErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record the outcome of a validator for `field`. `Ok` results are
    /// ignored; a field keeps only its first error.
    pub fn check(&mut self, field: &'static str, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.insert(field, error);
        }
    }

    /// Record an error for `field` unless one is already present.
    pub fn insert(&mut self, field: &'static str, error: ValidationError) {
        if self.get(field).is_none() {
            self.errors.push((field, error));
        }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<ValidationError> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, error)| *error)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, ValidationError)> + '_ {
        self.errors.iter().copied()
    }

    /// `Ok(())` when no field failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, (field, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, error) in &self.errors {
            map.serialize_entry(field, &error.to_string())?;
        }
        map.end()
    }
}
