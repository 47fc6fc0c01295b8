// src/common/schema.rs

/// Descrição declarativa de uma tabela.
///
/// As colunas seguem o `snake_case` do banco; o `FromRow` lê pelos mesmos nomes e o
/// `serde(rename_all = "camelCase")` do model cuida do JSON. Assim existe uma única
/// lista de colunas por entidade, usada em todos os SELECT/RETURNING dos repositórios.
pub trait Entity {
    const TABLE: &'static str;
    const COLUMNS: &'static [&'static str];

    fn column_list() -> String {
        Self::COLUMNS.join(", ")
    }

    fn select_sql() -> String {
        format!("SELECT {} FROM {}", Self::column_list(), Self::TABLE)
    }

    fn returning_sql() -> String {
        format!("RETURNING {}", Self::column_list())
    }

    /// Colunas qualificadas com um alias (ex.: `f.nome`), para JOINs.
    fn qualified_columns(alias: &str) -> String {
        Self::COLUMNS
            .iter()
            .map(|c| format!("{}.{}", alias, c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Exemplo;

    impl Entity for Exemplo {
        const TABLE: &'static str = "exemplos";
        const COLUMNS: &'static [&'static str] = &["id", "nome"];
    }

    #[test]
    fn builds_sql_fragments_from_columns() {
        assert_eq!(Exemplo::select_sql(), "SELECT id, nome FROM exemplos");
        assert_eq!(Exemplo::returning_sql(), "RETURNING id, nome");
        assert_eq!(Exemplo::qualified_columns("e"), "e.id, e.nome");
    }
}
