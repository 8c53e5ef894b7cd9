// src/common/validation.rs

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use validator::ValidateEmail;

use crate::{
    common::formatters::{expiry_is_future, format_date_to_iso, luhn_check, only_digits, parse_currency},
    models::billing::{BillingForm, CardForm},
};

// Validação reativa dos formulários do checkout: recalculada a cada
// mudança, devolve campo -> mensagem. A regra de exibição é a do
// formulário original:
//   - campo vazio e nunca tocado: nenhum erro;
//   - campo vazio já tocado: erro de obrigatório;
//   - campo com conteúdo inválido: erro de formato, tocado ou não.

fn require(
    errors: &mut HashMap<String, String>,
    touched: &HashSet<String>,
    field: &str,
    value: &str,
    message: &str,
) -> bool {
    if value.trim().is_empty() {
        if touched.contains(field) {
            errors.insert(field.to_string(), message.to_string());
        }
        return false; // vazio: sem checagem de formato
    }
    true
}

/// Erros campo a campo do formulário de cobrança.
pub fn validate_billing_form(
    form: &BillingForm,
    touched: &HashSet<String>,
) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    require(&mut errors, touched, "name", &form.name, "Nome é obrigatório");

    if require(&mut errors, touched, "email", &form.email, "E-mail é obrigatório")
        && !form.email.validate_email()
    {
        errors.insert("email".to_string(), "E-mail inválido".to_string());
    }

    if require(&mut errors, touched, "cpfCnpj", &form.cpf_cnpj, "CPF/CNPJ é obrigatório") {
        let digits = only_digits(&form.cpf_cnpj);
        if digits.len() != 11 && digits.len() != 14 {
            errors.insert(
                "cpfCnpj".to_string(),
                "CPF/CNPJ deve ter 11 ou 14 dígitos".to_string(),
            );
        }
    }

    if require(&mut errors, touched, "phone", &form.phone, "Telefone é obrigatório")
        && only_digits(&form.phone).len() < 8
    {
        errors.insert("phone".to_string(), "Telefone inválido".to_string());
    }

    if require(&mut errors, touched, "postalCode", &form.postal_code, "CEP é obrigatório")
        && only_digits(&form.postal_code).len() != 8
    {
        errors.insert("postalCode".to_string(), "CEP deve ter 8 dígitos".to_string());
    }

    require(&mut errors, touched, "city", &form.city, "Cidade é obrigatória");

    // Data de nascimento: obrigatória apenas para CPF (pessoa física)
    let is_cpf = only_digits(&form.cpf_cnpj).len() == 11;
    let has_birth_date = if is_cpf {
        require(
            &mut errors,
            touched,
            "birthDate",
            &form.birth_date,
            "Data de nascimento é obrigatória para CPF",
        )
    } else {
        !form.birth_date.trim().is_empty()
    };
    if has_birth_date {
        let valid = format_date_to_iso(&form.birth_date)
            .and_then(|iso| NaiveDate::parse_from_str(&iso, "%Y-%m-%d").ok())
            .is_some();
        if !valid {
            errors.insert("birthDate".to_string(), "Data inválida (DD/MM/AAAA)".to_string());
        }
    }

    if require(
        &mut errors,
        touched,
        "incomeValue",
        &form.income_value,
        "Renda mensal é obrigatória",
    ) && !parse_currency(&form.income_value)
        .map(|v| v > rust_decimal::Decimal::ZERO)
        .unwrap_or(false)
    {
        errors.insert(
            "incomeValue".to_string(),
            "Valor da renda mensal deve ser maior que zero".to_string(),
        );
    }

    errors
}

/// Erros campo a campo do formulário de cartão.
/// `today` entra por parâmetro para a validade ser testável.
pub fn validate_card_form(
    form: &CardForm,
    touched: &HashSet<String>,
    today: NaiveDate,
) -> HashMap<String, String> {
    let mut errors = HashMap::new();

    require(
        &mut errors,
        touched,
        "holderName",
        &form.holder_name,
        "Nome impresso no cartão é obrigatório",
    );

    if require(&mut errors, touched, "number", &form.number, "Número do cartão é obrigatório") {
        let digits = only_digits(&form.number);
        if !(12..=19).contains(&digits.len()) || !luhn_check(&digits) {
            errors.insert("number".to_string(), "Número do cartão inválido".to_string());
        }
    }

    if require(&mut errors, touched, "expiry", &form.expiry, "Validade é obrigatória")
        && !expiry_is_future(&form.expiry, today)
    {
        errors.insert("expiry".to_string(), "Validade expirada ou inválida".to_string());
    }

    if require(&mut errors, touched, "ccv", &form.ccv, "CCV é obrigatório") {
        let digits = only_digits(&form.ccv);
        if !(3..=4).contains(&digits.len()) {
            errors.insert("ccv".to_string(), "CCV deve ter 3 ou 4 dígitos".to_string());
        }
    }

    errors
}
