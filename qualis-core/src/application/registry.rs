// qualis-core/src/application/registry.rs

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::catalog::HandlerCatalog;
use crate::domain::error::HandlerResolutionError;
use crate::domain::ports::{AnalysisHandler, DiagnosticHandler};
use crate::domain::rule::RuleSet;

/// Rule id (`tipo_analise`) → bound handlers. Immutable once built.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    analysis: HashMap<String, Arc<dyn AnalysisHandler>>,
    diagnostic: HashMap<String, Arc<dyn DiagnosticHandler>>,
}

impl HandlerRegistry {
    /// Binds every rule against the catalog. An unresolvable handler skips only that
    /// binding and is reported back; a rule id already bound keeps its first handler.
    pub fn build(catalog: &HandlerCatalog, rules: &RuleSet) -> (Self, Vec<HandlerResolutionError>) {
        let mut registry = Self::default();
        let mut problems = Vec::new();

        for rule in rules.rules() {
            let id = rule.tipo_analise.as_str();

            let Some(namespace) = rule.modulo.as_deref().filter(|m| !m.trim().is_empty()) else {
                let err = HandlerResolutionError::MissingNamespace {
                    rule: id.to_string(),
                };
                warn!(rule = id, "{}", err);
                problems.push(err);
                continue;
            };

            if let Some(name) = rule.funcao_analise.as_deref()
                && !registry.analysis.contains_key(id)
            {
                match catalog.resolve_analysis(id, namespace, name) {
                    Ok(handler) => {
                        debug!(rule = id, handler = name, "Analysis handler bound");
                        registry.analysis.insert(id.to_string(), handler);
                    }
                    Err(err) => {
                        warn!(rule = id, "{}. Rule skipped in the analysis phase", err);
                        problems.push(err);
                    }
                }
            }

            if let Some(name) = rule.funcao_diagnostico.as_deref()
                && !registry.diagnostic.contains_key(id)
            {
                match catalog.resolve_diagnostic(id, namespace, name) {
                    Ok(handler) => {
                        debug!(rule = id, handler = name, "Diagnostic handler bound");
                        registry.diagnostic.insert(id.to_string(), handler);
                    }
                    Err(err) => {
                        warn!(rule = id, "{}. Rule skipped in the diagnostic phase", err);
                        problems.push(err);
                    }
                }
            }
        }

        (registry, problems)
    }

    pub fn analysis(&self, rule: &str) -> Option<&dyn AnalysisHandler> {
        self.analysis.get(rule).map(|h| h.as_ref())
    }

    pub fn diagnostic(&self, rule: &str) -> Option<&dyn DiagnosticHandler> {
        self.diagnostic.get(rule).map(|h| h.as_ref())
    }

    pub fn analysis_count(&self) -> usize {
        self.analysis.len()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostic.len()
    }
}
