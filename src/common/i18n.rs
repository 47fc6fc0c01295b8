// src/common/i18n.rs

use std::collections::HashMap;

const DEFAULT_LANG: &str = "pt";

// Catálogo de mensagens, carregado uma vez e compartilhado pelo AppState
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<&'static str, HashMap<&'static str, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("pt", PT.iter().copied().collect());
        catalogs.insert("en", EN.iter().copied().collect());
        Self { catalogs }
    }

    /// Busca a mensagem no idioma pedido, caindo para o português e, por fim, para a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    // Substitui {0}, {1}... pelos argumentos
    pub fn translate_with(&self, lang: &str, key: &str, args: &[&str]) -> String {
        let mut message = self.translate(lang, key);
        for (i, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{}}}", i), arg);
        }
        message
    }
}

const PT: &[(&str, &str)] = &[
    ("error.validation", "Um ou mais campos são inválidos."),
    ("error.email_exists", "Este e-mail já está em uso."),
    ("error.invalid_credentials", "E-mail ou senha inválidos."),
    ("error.invalid_token", "Token de autenticação inválido ou ausente. Faça login para continuar."),
    ("error.user_not_found", "Usuário não encontrado."),
    ("error.not_found", "{0} não encontrado(a)."),
    ("error.conflict", "Registro duplicado."),
    ("error.wizard", "Operação não permitida nesta etapa da importação."),
    ("error.cnab", "Não foi possível montar ou ler o arquivo CNAB240."),
    ("error.internal", "Ocorreu um erro inesperado."),
    ("resource.empresa", "Empresa"),
    ("resource.favorecido", "Favorecido"),
    ("resource.grupo", "Grupo"),
    ("resource.membro", "Membro do grupo"),
    ("resource.importacao", "Importação"),
    ("resource.preferencia", "Preferência"),
    ("field.required", "Campo obrigatório."),
    ("field.invalid_email", "E-mail inválido."),
    ("field.invalid_cnpj", "CNPJ inválido."),
    ("field.invalid_document", "CPF/CNPJ inválido."),
    ("field.invalid_bank", "Código de banco inválido."),
    ("field.invalid_uf", "UF deve ter 2 letras."),
    ("field.invalid_account_type", "Tipo de conta deve ser CC ou PP."),
    ("field.invalid_amount", "Valor deve ser maior que zero."),
    ("field.too_long", "Texto maior que o permitido."),
    ("field.password_too_short", "A senha deve ter no mínimo 6 caracteres."),
    ("field.payment_date_required", "Informe a data de pagamento."),
    ("field.no_members", "O grupo não possui favorecidos."),
    ("field.agency_required", "Agência obrigatória para gerar o arquivo."),
    ("field.account_required", "Conta obrigatória para gerar o arquivo."),
    ("field.invalid_key", "Chave de preferência desconhecida."),
    ("field.invalid_number", "Informe apenas números."),
    ("field.pix_type_required", "Informe o tipo da chave PIX."),
];

const EN: &[(&str, &str)] = &[
    ("error.validation", "One or more fields are invalid."),
    ("error.email_exists", "This e-mail is already in use."),
    ("error.invalid_credentials", "Invalid e-mail or password."),
    ("error.invalid_token", "Missing or invalid authentication token. Log in to continue."),
    ("error.user_not_found", "User not found."),
    ("error.not_found", "{0} not found."),
    ("error.conflict", "Duplicate record."),
    ("error.wizard", "Operation not allowed at this import step."),
    ("error.cnab", "Could not build or read the CNAB240 file."),
    ("error.internal", "An unexpected error occurred."),
    ("resource.empresa", "Company"),
    ("resource.favorecido", "Beneficiary"),
    ("resource.grupo", "Group"),
    ("resource.membro", "Group member"),
    ("resource.importacao", "Import"),
    ("resource.preferencia", "Preference"),
    ("field.required", "Required field."),
    ("field.invalid_email", "Invalid e-mail."),
    ("field.invalid_cnpj", "Invalid CNPJ."),
    ("field.invalid_document", "Invalid CPF/CNPJ."),
    ("field.invalid_bank", "Invalid bank code."),
    ("field.invalid_uf", "State must have 2 letters."),
    ("field.invalid_account_type", "Account type must be CC or PP."),
    ("field.invalid_amount", "Amount must be greater than zero."),
    ("field.too_long", "Text is longer than allowed."),
    ("field.password_too_short", "Password must have at least 6 characters."),
    ("field.payment_date_required", "Payment date is required."),
    ("field.no_members", "The group has no beneficiaries."),
    ("field.agency_required", "Agency is required to generate the file."),
    ("field.account_required", "Account is required to generate the file."),
    ("field.invalid_key", "Unknown preference key."),
    ("field.invalid_number", "Digits only."),
    ("field.pix_type_required", "PIX key type is required."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_portuguese_then_key() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "error.conflict"), "Duplicate record.");
        assert_eq!(store.translate("fr", "error.conflict"), "Registro duplicado.");
        assert_eq!(store.translate("pt", "chave.inexistente"), "chave.inexistente");
    }

    #[test]
    fn interpolates_positional_arguments() {
        let store = I18nStore::new();
        assert_eq!(
            store.translate_with("en", "error.not_found", &["Group"]),
            "Group not found."
        );
    }
}
