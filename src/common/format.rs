// src/common/format.rs
//
// Formatação de documentos, telefones, datas e valores no padrão brasileiro.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

pub fn only_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Remove acentos e cedilha, mantendo o restante do texto.
pub fn strip_accents(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ç' => 'c',
            'Ç' => 'C',
            'ñ' => 'n',
            'Ñ' => 'N',
            other => other,
        })
        .collect()
}

pub fn format_cpf(value: &str) -> Option<String> {
    let d = only_digits(value);
    if d.len() != 11 {
        return None;
    }
    Some(format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]))
}

pub fn format_cnpj(value: &str) -> Option<String> {
    let d = only_digits(value);
    if d.len() != 14 {
        return None;
    }
    Some(format!(
        "{}.{}.{}/{}-{}",
        &d[0..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..14]
    ))
}

/// Aplica a máscara de CPF ou CNPJ conforme a quantidade de dígitos; senão devolve o texto original.
pub fn format_documento(value: &str) -> String {
    format_cpf(value)
        .or_else(|| format_cnpj(value))
        .unwrap_or_else(|| value.trim().to_string())
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    let rest = sum % 11;
    if rest < 2 { 0 } else { 11 - rest }
}

fn to_digit_vec(value: &str) -> Vec<u32> {
    only_digits(value).chars().filter_map(|c| c.to_digit(10)).collect()
}

pub fn cpf_valido(value: &str) -> bool {
    let d = to_digit_vec(value);
    if d.len() != 11 || d.iter().all(|x| *x == d[0]) {
        return false;
    }
    let dv1 = check_digit(&d[..9], &[10, 9, 8, 7, 6, 5, 4, 3, 2]);
    let dv2 = check_digit(&d[..10], &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2]);
    d[9] == dv1 && d[10] == dv2
}

pub fn cnpj_valido(value: &str) -> bool {
    let d = to_digit_vec(value);
    if d.len() != 14 || d.iter().all(|x| *x == d[0]) {
        return false;
    }
    let dv1 = check_digit(&d[..12], &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    let dv2 = check_digit(&d[..13], &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2]);
    d[12] == dv1 && d[13] == dv2
}

pub fn format_telefone(value: &str) -> String {
    let d = only_digits(value);
    match d.len() {
        11 => format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..11]),
        10 => format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..10]),
        _ => value.trim().to_string(),
    }
}

/// Data no formato usado pelos registros CNAB (DDMMYYYY).
pub fn format_data_cnab(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}

pub fn format_data_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Converte valores digitados em planilha ("R$ 1.234,56", "1234,5", "1234.56") para `Decimal`.
///
/// Quando há ponto e vírgula, o separador que aparece por último é o decimal.
/// Um único ponto seguido de exatamente três dígitos é tratado como milhar.
pub fn parse_valor(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    let last_comma = cleaned.rfind(',');
    let last_dot = cleaned.rfind('.');

    let normalized = match (last_comma, last_dot) {
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => {
            if cleaned.matches(',').count() > 1 {
                cleaned.replace(',', "")
            } else {
                cleaned.replace(',', ".")
            }
        }
        (None, Some(d)) => {
            let decimals = cleaned.len() - d - 1;
            if cleaned.matches('.').count() > 1 || decimals == 3 {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    let body = normalized.strip_prefix('-').unwrap_or(&normalized);
    if body.is_empty()
        || body.starts_with('.')
        || body.ends_with('.')
        || !body.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}

pub fn format_valor_br(value: Decimal) -> String {
    let text = format!("{:.2}", value.round_dp(2));
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest.to_string()),
        None => (false, text),
    };
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    format!("{}R$ {},{}", if negative { "-" } else { "" }, grouped, frac_part)
}

/// Código de banco com três dígitos ("1" -> "001"), usado nas comparações e ordenações.
pub fn pad_banco(value: &str) -> String {
    let digits = only_digits(value);
    if digits.len() >= 3 {
        digits
    } else {
        format!("{:0>3}", digits)
    }
}

/// Separa o dígito verificador de agência/conta: "1234-5" -> ("1234", Some("5")).
pub fn split_dv(value: &str) -> (String, Option<String>) {
    match value.trim().rsplit_once('-') {
        Some((number, dv)) if !dv.trim().is_empty() => {
            (only_digits(number), Some(dv.trim().to_uppercase()))
        }
        _ => (only_digits(value), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_dates_in_both_layouts() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_data_cnab(date), "05032024");
        assert_eq!(format_data_br(date), "05/03/2024");
    }

    #[test]
    fn masks_cpf_and_cnpj() {
        assert_eq!(format_documento("52998224725"), "529.982.247-25");
        assert_eq!(format_documento("11222333000181"), "11.222.333/0001-81");
        assert_eq!(format_documento(" 123 "), "123");
    }

    #[test]
    fn checks_document_digits() {
        assert!(cpf_valido("529.982.247-25"));
        assert!(!cpf_valido("529.982.247-26"));
        assert!(!cpf_valido("111.111.111-11"));
        assert!(cnpj_valido("11.222.333/0001-81"));
        assert!(!cnpj_valido("11.222.333/0001-82"));
    }

    #[test]
    fn masks_phone_numbers() {
        assert_eq!(format_telefone("11999998888"), "(11) 99999-8888");
        assert_eq!(format_telefone("1133334444"), "(11) 3333-4444");
        assert_eq!(format_telefone("123"), "123");
    }

    #[test]
    fn parses_brazilian_currency() {
        assert_eq!(parse_valor("R$ 1.234,56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_valor("1234,5"), Some(Decimal::new(12345, 1)));
        assert_eq!(parse_valor("1234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_valor("1.234"), Some(Decimal::from(1234)));
        assert_eq!(parse_valor("1,234.56"), Some(Decimal::new(123456, 2)));
        assert_eq!(parse_valor("-10,00"), Some(Decimal::new(-1000, 2)));
        assert_eq!(parse_valor("abc"), None);
        assert_eq!(parse_valor(""), None);
        assert_eq!(parse_valor("12,"), None);
    }

    #[test]
    fn formats_currency_with_thousand_groups() {
        assert_eq!(format_valor_br(Decimal::new(123456789, 2)), "R$ 1.234.567,89");
        assert_eq!(format_valor_br(Decimal::new(5, 1)), "R$ 0,50");
        assert_eq!(format_valor_br(Decimal::new(-100, 0)), "-R$ 100,00");
    }

    #[test]
    fn pads_bank_codes_and_splits_check_digits() {
        assert_eq!(pad_banco("1"), "001");
        assert_eq!(pad_banco("237"), "237");
        assert_eq!(split_dv("1234-5"), ("1234".to_string(), Some("5".to_string())));
        assert_eq!(split_dv("98765-x"), ("98765".to_string(), Some("X".to_string())));
        assert_eq!(split_dv("4321"), ("4321".to_string(), None));
    }
}
