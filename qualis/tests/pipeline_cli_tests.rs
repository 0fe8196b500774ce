use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const TABLES: &str = r#"{
  "tabelas": [
    {
      "nome_tabela": "clientes",
      "caminho_arquivo": "data/clientes.csv",
      "tipo_arquivo": "csv",
      "chave_primaria": "id_cliente",
      "colunas_numericas": ["idade", "renda_mensal"]
    },
    {
      "nome_tabela": "fantasma",
      "caminho_arquivo": "data/fantasma.csv",
      "tipo_arquivo": "csv",
      "chave_primaria": "id"
    }
  ]
}"#;

const RULES: &str = r#"{
  "regras_globais_eda": [
    {
      "tipo_analise": "integridade_pk",
      "modulo": "integridade",
      "funcao_analise": "validacao_chave_primaria",
      "funcao_diagnostico": "diagnostico_chave_primaria",
      "alvo_tipo": "chave_primaria"
    },
    {
      "tipo_analise": "estatisticas_basicas",
      "modulo": "numericas",
      "funcao_analise": "estatisticas_descritivas",
      "funcao_diagnostico": "diagnostico_estatistico",
      "alvo_tipo": ["colunas_numericas"],
      "parametros": {"percentis": [0.1, 0.9]}
    }
  ]
}"#;

// One duplicated pair and one null in the key, one negative income.
const CLIENTES: &str = "\
id_cliente;idade;renda_mensal
1;25;3000
2;40;-100
2;33;4500
;51;5200
5;29;3900
";

/// Self-contained project directory for one CLI invocation.
struct QualisTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl QualisTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().join("projeto");
        fs::create_dir_all(root.join("config"))?;
        fs::create_dir_all(root.join("data"))?;

        fs::write(root.join("config/eda_tabelas.json"), TABLES)?;
        fs::write(root.join("config/eda_analises.json"), RULES)?;
        fs::write(root.join("data/clientes.csv"), CLIENTES)?;

        Ok(Self { _tmp: tmp, root })
    }

    fn qualis(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("qualis"));
        cmd.current_dir(&self.root);
        cmd.env_remove("QUALIS_OUTPUT_PATH");
        cmd.env_remove("QUALIS_CONCURRENCY");
        cmd
    }

    fn report(&self) -> Result<serde_json::Value> {
        let raw = fs::read_to_string(self.root.join("relatorio_eda_final.json"))
            .context("Report not written")?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[test]
fn test_run_writes_the_expected_report() -> Result<()> {
    let env = QualisTestEnv::new()?;

    env.qualis()
        .arg("run")
        .assert()
        .success()
        .stdout(predicate::str::contains("PK_INTEGRIDADE_001"));

    let report = env.report()?;
    let summary = &report["resumo_execucao"];
    assert_eq!(summary["total_tabelas"], 2);
    assert_eq!(summary["total_analises_executadas"], 2);
    assert_eq!(summary["total_criticos"], 2);
    assert_eq!(summary["total_alertas"], 1);

    let ids: Vec<&str> = report["diagnosticos_registrados"]
        .as_array()
        .context("records must be an array")?
        .iter()
        .filter_map(|r| r["id_diagnostico"].as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["PK_INTEGRIDADE_001", "PK_INTEGRIDADE_002", "ESTAT_MAGNITUDE_001"]
    );

    let magnitude = &report["diagnosticos_registrados"][2];
    assert_eq!(magnitude["coluna"], "renda_mensal");
    assert_eq!(magnitude["severidade"], "CRÍTICO");
    assert_eq!(magnitude["evidencia"]["min_encontrado"], -100.0);
    Ok(())
}

#[test]
fn test_fail_on_critical_exit_code() -> Result<()> {
    let env = QualisTestEnv::new()?;

    env.qualis()
        .args(["run", "--fail-on-critical", "--output", "out/report.json"])
        .assert()
        .code(2);

    // The report is delivered before the exit.
    assert!(env.root.join("out/report.json").is_file());
    Ok(())
}

#[test]
fn test_missing_rules_file_is_fatal() -> Result<()> {
    let env = QualisTestEnv::new()?;
    fs::remove_file(env.root.join("config/eda_analises.json"))?;

    env.qualis()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rules"));
    assert!(!env.root.join("relatorio_eda_final.json").exists());
    Ok(())
}

#[test]
fn test_validate_strict_reports_missing_files() -> Result<()> {
    let env = QualisTestEnv::new()?;

    env.qualis()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("fantasma"));

    env.qualis().args(["validate", "--strict"]).assert().failure();
    Ok(())
}

#[test]
fn test_handlers_lists_the_catalog() -> Result<()> {
    let env = QualisTestEnv::new()?;

    let output = env.qualis().args(["handlers", "--json"]).output()?;
    assert!(output.status.success());
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(entries.as_array().map(Vec::len), Some(10));
    assert_eq!(entries[0]["namespace"], "integridade");
    Ok(())
}

#[test]
fn test_generate_infers_numeric_roles() -> Result<()> {
    let env = QualisTestEnv::new()?;
    fs::remove_file(env.root.join("config/eda_tabelas.json"))?;

    env.qualis()
        .args(["generate", "--infer-roles"])
        .assert()
        .success();

    let raw = fs::read_to_string(env.root.join("config/eda_tabelas.json"))?;
    let catalog: serde_json::Value = serde_json::from_str(&raw)?;
    let table = &catalog["tabelas"][0];
    assert_eq!(table["caminho_arquivo"], "data/clientes.csv");
    assert_eq!(table["tipo_arquivo"], "csv");
    assert_eq!(
        table["colunas_numericas"],
        serde_json::json!(["id_cliente", "idade", "renda_mensal"])
    );
    Ok(())
}
