// qualis-core/src/application/catalog.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::application::handlers::{
    self, FnAnalysis, FnDiagnostic, INTEGRITY_NAMESPACE, MagnitudeDiagnostic, NUMERIC_NAMESPACE,
};
use crate::domain::diagnostic::{self, MagnitudeRules};
use crate::domain::error::HandlerResolutionError;
use crate::domain::ports::{AnalysisHandler, DiagnosticHandler, Handler};

// --- DTOs ---
// What `qualis handlers` displays.

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub namespace: String,
    pub name: String,
    pub capability: &'static str,
}

/// Startup-time handler catalog: namespace → name → tagged handler.
/// Populated explicitly; a name registered twice in a namespace keeps its first handler.
#[derive(Debug, Clone, Default)]
pub struct HandlerCatalog {
    namespaces: BTreeMap<String, BTreeMap<String, Handler>>,
}

impl HandlerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `integridade` and `numericas` namespaces.
    pub fn builtin(magnitude_rules: MagnitudeRules) -> Self {
        let mut catalog = Self::new();

        catalog.register_analysis(
            INTEGRITY_NAMESPACE,
            Arc::new(FnAnalysis::new("validacao_chave_primaria", handlers::primary_key)),
        );
        catalog.register_diagnostic(
            INTEGRITY_NAMESPACE,
            Arc::new(FnDiagnostic::new(
                "diagnostico_chave_primaria",
                diagnostic::diagnose_primary_key,
            )),
        );

        let analyses: [(&'static str, handlers::AnalysisFn); 4] = [
            ("estatisticas_descritivas", handlers::descriptive),
            ("teste_de_outliers_iqr", handlers::iqr),
            ("teste_de_outliers_zscore", handlers::zscore),
            ("analise_de_correlacao", handlers::correlation),
        ];
        for (name, run) in analyses {
            catalog.register_analysis(NUMERIC_NAMESPACE, Arc::new(FnAnalysis::new(name, run)));
        }

        catalog.register_diagnostic(
            NUMERIC_NAMESPACE,
            Arc::new(MagnitudeDiagnostic::new(magnitude_rules)),
        );
        let diagnostics: [(&'static str, handlers::DiagnosticFn); 3] = [
            ("diagnostico_outliers_iqr", diagnostic::diagnose_iqr),
            ("diagnostico_outliers_zscore", diagnostic::diagnose_zscore),
            ("diagnostico_correlacao", diagnostic::diagnose_correlation),
        ];
        for (name, run) in diagnostics {
            catalog.register_diagnostic(NUMERIC_NAMESPACE, Arc::new(FnDiagnostic::new(name, run)));
        }

        catalog
    }

    /// Returns `false` when the name is already taken in that namespace.
    pub fn register(&mut self, namespace: impl Into<String>, handler: Handler) -> bool {
        let entries = self.namespaces.entry(namespace.into()).or_default();
        let name = handler.name().to_string();
        if entries.contains_key(&name) {
            return false;
        }
        entries.insert(name, handler);
        true
    }

    pub fn register_analysis(
        &mut self,
        namespace: impl Into<String>,
        handler: Arc<dyn AnalysisHandler>,
    ) -> bool {
        self.register(namespace, Handler::Analysis(handler))
    }

    pub fn register_diagnostic(
        &mut self,
        namespace: impl Into<String>,
        handler: Arc<dyn DiagnosticHandler>,
    ) -> bool {
        self.register(namespace, Handler::Diagnostic(handler))
    }

    pub fn has_namespace(&self, namespace: &str) -> bool {
        self.namespaces.contains_key(namespace)
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&Handler> {
        self.namespaces.get(namespace)?.get(name)
    }

    /// Namespace order, then name order.
    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.namespaces
            .iter()
            .flat_map(|(ns, handlers)| {
                handlers.iter().map(move |(name, h)| CatalogEntry {
                    namespace: ns.clone(),
                    name: name.clone(),
                    capability: h.capability(),
                })
            })
            .collect()
    }

    pub fn resolve_analysis(
        &self,
        rule: &str,
        namespace: &str,
        name: &str,
    ) -> Result<Arc<dyn AnalysisHandler>, HandlerResolutionError> {
        match self.lookup(rule, namespace, name)? {
            Handler::Analysis(h) => Ok(Arc::clone(h)),
            Handler::Diagnostic(_) => Err(HandlerResolutionError::CapabilityMismatch {
                rule: rule.to_string(),
                name: name.to_string(),
                expected: "analysis",
            }),
        }
    }

    pub fn resolve_diagnostic(
        &self,
        rule: &str,
        namespace: &str,
        name: &str,
    ) -> Result<Arc<dyn DiagnosticHandler>, HandlerResolutionError> {
        match self.lookup(rule, namespace, name)? {
            Handler::Diagnostic(h) => Ok(Arc::clone(h)),
            Handler::Analysis(_) => Err(HandlerResolutionError::CapabilityMismatch {
                rule: rule.to_string(),
                name: name.to_string(),
                expected: "diagnostic",
            }),
        }
    }

    fn lookup(
        &self,
        rule: &str,
        namespace: &str,
        name: &str,
    ) -> Result<&Handler, HandlerResolutionError> {
        let handlers =
            self.namespaces
                .get(namespace)
                .ok_or_else(|| HandlerResolutionError::UnknownNamespace {
                    rule: rule.to_string(),
                    namespace: namespace.to_string(),
                })?;
        handlers
            .get(name)
            .ok_or_else(|| HandlerResolutionError::UnknownHandler {
                rule: rule.to_string(),
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_layout() {
        let catalog = HandlerCatalog::builtin(MagnitudeRules::default());
        let entries = catalog.entries();
        assert_eq!(entries.len(), 10);
        assert!(catalog.has_namespace("integridade"));
        assert!(catalog.has_namespace("numericas"));
        assert_eq!(entries[0].namespace, "integridade");
        assert!(matches!(
            catalog.get("numericas", "analise_de_correlacao"),
            Some(Handler::Analysis(_))
        ));
    }

    #[test]
    fn test_first_registration_wins() {
        let mut catalog = HandlerCatalog::new();
        assert!(catalog.register_analysis("x", Arc::new(FnAnalysis::new("h", handlers::iqr))));
        assert!(!catalog.register_analysis("x", Arc::new(FnAnalysis::new("h", handlers::zscore))));
        assert_eq!(catalog.entries().len(), 1);
    }

    #[test]
    fn test_resolution_failures() {
        let catalog = HandlerCatalog::builtin(MagnitudeRules::default());

        let err = catalog.resolve_analysis("r", "texto", "x").err();
        assert!(matches!(err, Some(HandlerResolutionError::UnknownNamespace { .. })));

        let err = catalog.resolve_analysis("r", "numericas", "nao_existe").err();
        assert!(matches!(err, Some(HandlerResolutionError::UnknownHandler { .. })));

        let err = catalog
            .resolve_analysis("r", "numericas", "diagnostico_correlacao")
            .err();
        assert!(matches!(
            err,
            Some(HandlerResolutionError::CapabilityMismatch { expected: "analysis", .. })
        ));

        assert!(
            catalog
                .resolve_diagnostic("r", "integridade", "diagnostico_chave_primaria")
                .is_ok()
        );
    }
}
