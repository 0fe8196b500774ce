// qualis-core/src/infrastructure/sink/console.rs

use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::io::Write;

use crate::domain::diagnostic::Severity;
use crate::domain::report::FinalReport;
use crate::error::QualisError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::ReportSink;

/// Summary and diagnostics as terminal tables on stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    min_severity: Severity,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self {
            min_severity: Severity::Info,
        }
    }
}

impl ConsoleSink {
    pub fn new(min_severity: Severity) -> Self {
        Self { min_severity }
    }

    pub fn render(&self, report: &FinalReport) -> String {
        let summary = &report.resumo_execucao;
        let mut head = Table::new();
        head.load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Execução", "Tabelas", "Análises", "Alertas", "Críticos"])
            .add_row(vec![
                summary.data_execucao.clone(),
                summary.total_tabelas.to_string(),
                summary.total_analises_executadas.to_string(),
                summary.total_alertas.to_string(),
                summary.total_criticos.to_string(),
            ]);

        let mut out = head.to_string();

        let mut records = report.records_at_least(self.min_severity).peekable();
        if records.peek().is_none() {
            out.push_str("\nNenhum diagnóstico registrado.");
            return out;
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["ID", "Severidade", "Tabela", "Coluna", "Mensagem", "Detalhe"]);
        for r in records {
            table.add_row(vec![
                r.id_diagnostico.clone(),
                r.severidade.to_string(),
                r.tabela.clone(),
                r.coluna.clone(),
                r.mensagem_curta.clone(),
                r.detalhe_tecnico.clone(),
            ]);
        }
        out.push('\n');
        out.push_str(&table.to_string());
        out
    }
}

impl ReportSink for ConsoleSink {
    fn describe(&self) -> String {
        "stdout".to_string()
    }

    fn deliver(&self, report: &FinalReport) -> Result<(), QualisError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", self.render(report)).map_err(|e| QualisError::ReportSink {
            sink: self.describe(),
            source: InfrastructureError::Io(e),
        })
    }
}
