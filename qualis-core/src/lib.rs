// qualis-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)]

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contrat de sortie du rapport (ReportSink).
pub mod ports;

// 2. Domain (Cœur du métier)
// Dataset, statistiques, intégrité, diagnostics, règles, rapport.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Fichiers de config, lecture CSV/Excel, sinks du rapport.
pub mod infrastructure;

// 4. Application (Use Cases)
// Catalogue de handlers, registre, orchestrateur.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::QualisError;
