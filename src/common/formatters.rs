// src/common/formatters.rs

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

// Funções puras de máscara e validação usadas pelo formulário de cobrança.
// Todas recebem o texto como o usuário digitou e devolvem o texto mascarado;
// nenhuma delas falha: entrada lixo vira máscara parcial ou string vazia.

/// Remove tudo que não for dígito.
pub fn only_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Checksum de Luhn (mod-10, dobrando um dígito sim um não a partir da direita).
/// Entrada vazia ou com qualquer caractere não numérico reprova direto.
pub fn luhn_check(digits: &str) -> bool {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let mut sum: u32 = 0;
    for (i, c) in digits.chars().rev().enumerate() {
        let mut d = c.to_digit(10).unwrap_or(0);
        if i % 2 == 1 {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
    }
    sum % 10 == 0
}

// Helper interno: aplica uma máscara progressiva.
// `seps` mapeia posição do dígito -> separador inserido ANTES daquele dígito.
fn progressive_mask(digits: &str, cap: usize, seps: &[(usize, &str)]) -> String {
    let mut out = String::new();
    for (i, c) in digits.chars().take(cap).enumerate() {
        if let Some((_, sep)) = seps.iter().find(|(pos, _)| *pos == i) {
            out.push_str(sep);
        }
        out.push(c);
    }
    out
}

/// Máscara de CPF (000.000.000-00) ou CNPJ (00.000.000/0000-00).
/// Até 11 dígitos tratamos como CPF; do 12º em diante vira máscara de CNPJ.
pub fn format_cpf_cnpj(s: &str) -> String {
    let digits = only_digits(s);
    if digits.len() <= 11 {
        progressive_mask(&digits, 11, &[(3, "."), (6, "."), (9, "-")])
    } else {
        progressive_mask(&digits, 14, &[(2, "."), (5, "."), (8, "/"), (12, "-")])
    }
}

/// Máscara do número do cartão: grupos de 4, máximo 16 dígitos.
pub fn format_card_number(s: &str) -> String {
    progressive_mask(&only_digits(s), 16, &[(4, " "), (8, " "), (12, " ")])
}

/// Máscara de validade MM/AA.
pub fn format_expiry(s: &str) -> String {
    progressive_mask(&only_digits(s), 4, &[(2, "/")])
}

/// Máscara de telefone brasileiro: (00) 0000-0000 ou (00) 00000-0000.
pub fn format_phone(s: &str) -> String {
    let digits = only_digits(s);
    if digits.is_empty() {
        return String::new();
    }
    // Com 11 dígitos (celular) o hífen desloca uma posição.
    if digits.len() <= 10 {
        progressive_mask(&digits, 10, &[(0, "("), (2, ") "), (6, "-")])
    } else {
        progressive_mask(&digits, 11, &[(0, "("), (2, ") "), (7, "-")])
    }
}

/// Máscara de CEP: 00000-000.
pub fn format_postal_code(s: &str) -> String {
    progressive_mask(&only_digits(s), 8, &[(5, "-")])
}

/// Máscara de data de nascimento: DD/MM/AAAA.
pub fn format_birth_date(s: &str) -> String {
    progressive_mask(&only_digits(s), 8, &[(2, "/"), (4, "/")])
}

/// Máscara de moeda: trata os dígitos como centavos e exibe com vírgula
/// e separador de milhar ("123456" -> "1.234,56"). Sem limite de dígitos.
pub fn format_currency(s: &str) -> String {
    let digits = only_digits(s);
    if digits.is_empty() {
        return String::new();
    }

    // Remove zeros à esquerda, mas garante ao menos 3 dígitos (0,0X)
    let trimmed = digits.trim_start_matches('0');
    let mut cents = format!("{:0>3}", trimmed);

    let frac = cents.split_off(cents.len() - 2);
    let whole = cents;

    // Agrupa a parte inteira de 3 em 3 com ponto
    let mut grouped = String::new();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{},{}", grouped, frac)
}

/// Caminho inverso da máscara de moeda: os dígitos viram centavos.
/// "1.234,56" -> 1234.56. Sem dígitos (ou estouro) -> None.
pub fn parse_currency(s: &str) -> Option<Decimal> {
    let digits = only_digits(s);
    if digits.is_empty() {
        return None;
    }
    let cents: i64 = digits.parse().ok()?;
    Some(Decimal::new(cents, 2))
}

/// Converte "DD/MM/YYYY" para "YYYY-MM-DD" (formato da API).
/// Só aceita a máscara completa; entrada parcial ou fora do padrão vira None.
pub fn format_date_to_iso(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    if !s.is_ascii() || bytes.len() != 10 || bytes[2] != b'/' || bytes[5] != b'/' {
        return None;
    }
    let (dd, mm, yyyy) = (&s[0..2], &s[3..5], &s[6..10]);
    if dd.chars().all(|c| c.is_ascii_digit())
        && mm.chars().all(|c| c.is_ascii_digit())
        && yyyy.chars().all(|c| c.is_ascii_digit())
    {
        Some(format!("{}-{}-{}", yyyy, mm, dd))
    } else {
        None
    }
}

/// Resolve "MM/AA" contra uma data de referência: a validade precisa ser
/// o mês corrente ou um mês futuro. Anos de 2 dígitos viram 20AA.
pub fn expiry_is_future(expiry: &str, today: NaiveDate) -> bool {
    let digits = only_digits(expiry);
    if digits.len() != 4 {
        return false;
    }
    let month: u32 = match digits[0..2].parse() {
        Ok(m) if (1..=12).contains(&m) => m,
        _ => return false,
    };
    let year: i32 = match digits[2..4].parse::<i32>() {
        Ok(y) => 2000 + y,
        Err(_) => return false,
    };

    year > today.year() || (year == today.year() && month >= today.month())
}
