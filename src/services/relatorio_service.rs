// src/services/relatorio_service.rs

use chrono::NaiveDate;
use genpdf::{elements, style, Element};
use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        format::{format_data_br, format_documento, format_telefone, format_valor_br, pad_banco},
    },
    models::{empresa::Empresa, importacao::RowData},
    services::importacao::ordenacao::Pagavel,
};

// Linha já formatada para a tabela do relatório
#[derive(Debug, Clone, PartialEq)]
pub struct LinhaRelatorio {
    pub nome: String,
    pub inscricao: String,
    pub banco: String,
    pub conta: String,
    pub tipo: String,
    pub valor: String,
}

pub fn linhas_relatorio(rows: &[RowData]) -> (Vec<LinhaRelatorio>, Decimal) {
    let mut total = Decimal::ZERO;
    let linhas = rows
        .iter()
        .map(|r| {
            let valor = r.valor();
            total += valor;
            LinhaRelatorio {
                nome: r.nome.trim().to_string(),
                inscricao: format_documento(&r.inscricao),
                banco: pad_banco(&r.banco),
                conta: format!("{} / {}", r.agencia.trim(), r.conta.trim()),
                tipo: r.tipo.trim().to_uppercase(),
                valor: format_valor_br(valor),
            }
        })
        .collect();
    (linhas, total)
}

#[derive(Clone)]
pub struct RelatorioService {
    fonts_dir: String,
}

impl RelatorioService {
    pub fn new(fonts_dir: String) -> Self {
        Self { fonts_dir }
    }

    /// Relatório dos pagamentos, na ordem recebida.
    pub fn gerar_pdf(
        &self,
        empresa: Option<&Empresa>,
        data_pagamento: Option<NaiveDate>,
        rows: &[RowData],
    ) -> Result<Vec<u8>, AppError> {
        let (linhas, total) = linhas_relatorio(rows);

        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None)
            .map_err(|e| AppError::RelatorioError(format!("fonte não encontrada em {}: {}", self.fonts_dir, e)))?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title("Relatório de pagamentos");
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        // --- CABEÇALHO ---
        let titulo = empresa
            .map(|e| e.razao_social.clone())
            .unwrap_or_else(|| "Relatório de pagamentos".to_string());
        doc.push(elements::Paragraph::new(titulo).styled(style::Style::new().bold().with_font_size(16)));

        if let Some(empresa) = empresa {
            let mut contato = format!("CNPJ: {}", format_documento(&empresa.cnpj));
            if let Some(telefone) = empresa.telefone.as_deref().filter(|t| !t.trim().is_empty()) {
                contato.push_str(&format!("  Tel.: {}", format_telefone(telefone)));
            }
            doc.push(elements::Paragraph::new(contato).styled(style::Style::new().with_font_size(10)));
        }
        if let Some(data) = data_pagamento {
            doc.push(elements::Paragraph::new(format!("Data de pagamento: {}", format_data_br(data))));
        }
        doc.push(elements::Break::new(1.5));

        // --- TABELA ---
        let mut table = elements::TableLayout::new(vec![4, 2, 1, 2, 1, 2]);
        table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        table
            .row()
            .element(elements::Paragraph::new("Favorecido").styled(style_bold))
            .element(elements::Paragraph::new("CPF/CNPJ").styled(style_bold))
            .element(elements::Paragraph::new("Banco").styled(style_bold))
            .element(elements::Paragraph::new("Agência / Conta").styled(style_bold))
            .element(elements::Paragraph::new("Tipo").styled(style_bold))
            .element(elements::Paragraph::new("Valor").styled(style_bold))
            .push()
            .map_err(|e| AppError::RelatorioError(e.to_string()))?;

        for linha in linhas {
            table
                .row()
                .element(elements::Paragraph::new(linha.nome))
                .element(elements::Paragraph::new(linha.inscricao))
                .element(elements::Paragraph::new(linha.banco))
                .element(elements::Paragraph::new(linha.conta))
                .element(elements::Paragraph::new(linha.tipo))
                .element(elements::Paragraph::new(linha.valor))
                .push()
                .map_err(|e| AppError::RelatorioError(e.to_string()))?;
        }

        doc.push(table);
        doc.push(elements::Break::new(2));

        // --- TOTAIS ---
        let mut total_paragraph = elements::Paragraph::new(format!(
            "{} pagamento(s) - TOTAL: {}",
            rows.len(),
            format_valor_br(total)
        ));
        total_paragraph.set_alignment(genpdf::Alignment::Right);
        doc.push(total_paragraph.styled(style::Style::new().bold().with_font_size(12)));

        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::RelatorioError(e.to_string()))?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::row;

    #[test]
    fn formats_rows_and_sums_total() {
        let (linhas, total) = linhas_relatorio(&[
            row(1, "Ana", "1", "1.234,56"),
            row(2, "Bia", "237", "10"),
        ]);
        assert_eq!(total, Decimal::new(124456, 2));
        assert_eq!(linhas[0].banco, "001");
        assert_eq!(linhas[0].valor, "R$ 1.234,56");
        assert_eq!(linhas[0].inscricao, "529.982.247-25");
        assert_eq!(linhas[1].valor, "R$ 10,00");
    }

    #[test]
    fn missing_fonts_are_reported() {
        let service = RelatorioService::new("/caminho/inexistente".into());
        let err = service.gerar_pdf(None, None, &[row(1, "Ana", "1", "10")]).unwrap_err();
        assert!(matches!(err, AppError::RelatorioError(_)));
    }
}
