// src/models/validators.rs
//
// Validadores customizados usados nos payloads (`#[validate(custom(function = ...))]`).
// O `message` de cada erro é o código traduzido pelo I18nStore ("field.<código>").

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

use crate::common::format::{cnpj_valido, cpf_valido, only_digits};

fn error(code: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(code));
    err
}

pub fn validate_cnpj(value: &str) -> Result<(), ValidationError> {
    if cnpj_valido(value) { Ok(()) } else { Err(error("invalid_cnpj")) }
}

pub fn validate_documento(value: &str) -> Result<(), ValidationError> {
    if cpf_valido(value) || cnpj_valido(value) {
        Ok(())
    } else {
        Err(error("invalid_document"))
    }
}

/// Código de banco COMPE: de 1 a 3 dígitos.
pub fn is_bank_code(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.len() <= 3 && trimmed.chars().all(|c| c.is_ascii_digit())
}

pub fn validate_banco(value: &str) -> Result<(), ValidationError> {
    if is_bank_code(value) { Ok(()) } else { Err(error("invalid_bank")) }
}

pub fn validate_tipo_conta(value: &str) -> Result<(), ValidationError> {
    match value.trim().to_uppercase().as_str() {
        "CC" | "PP" => Ok(()),
        _ => Err(error("invalid_account_type")),
    }
}

pub fn validate_uf(value: &str) -> Result<(), ValidationError> {
    let uf = value.trim();
    if uf.len() == 2 && uf.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(error("invalid_uf"))
    }
}

pub fn validate_valor_positivo(value: &Decimal) -> Result<(), ValidationError> {
    if *value > Decimal::ZERO { Ok(()) } else { Err(error("invalid_amount")) }
}

pub fn validate_digits(value: &str) -> Result<(), ValidationError> {
    if !value.trim().is_empty() && only_digits(value).len() == value.trim().len() {
        Ok(())
    } else {
        Err(error("invalid_number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bank_codes_have_up_to_three_digits() {
        assert!(is_bank_code("1"));
        assert!(is_bank_code(" 001 "));
        assert!(!is_bank_code("0001"));
        assert!(!is_bank_code("BB"));
        assert!(!is_bank_code(""));
    }

    #[test]
    fn errors_carry_the_translation_code() {
        let err = validate_tipo_conta("XX").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("invalid_account_type"));
        assert!(validate_tipo_conta("pp").is_ok());
    }
}
