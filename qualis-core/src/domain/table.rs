// qualis-core/src/domain/table.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use tracing::debug;
use validator::Validate;

use crate::domain::rule::OneOrMany;

/// One entry of `tabelas`. Every other key holding a column name or a list of
/// column names is a role tag; keys holding anything else are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TableMetadata {
    #[validate(length(min = 1, message = "nome_tabela cannot be empty"))]
    pub nome_tabela: String,

    #[validate(length(min = 1, message = "caminho_arquivo cannot be empty"))]
    pub caminho_arquivo: String,

    pub tipo_arquivo: String,

    #[serde(flatten, deserialize_with = "role_entries")]
    pub roles: BTreeMap<String, OneOrMany>,
}

impl TableMetadata {
    pub fn new(
        nome_tabela: impl Into<String>,
        caminho_arquivo: impl Into<String>,
        tipo_arquivo: impl Into<String>,
    ) -> Self {
        Self {
            nome_tabela: nome_tabela.into(),
            caminho_arquivo: caminho_arquivo.into(),
            tipo_arquivo: tipo_arquivo.into(),
            roles: BTreeMap::new(),
        }
    }

    pub fn role(mut self, tag: impl Into<String>, columns: impl Into<OneOrMany>) -> Self {
        self.roles.insert(tag.into(), columns.into());
        self
    }

    /// Columns bound to the given roles: role order, then column order, first occurrence kept.
    pub fn resolve_columns(&self, roles: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for column in roles
            .iter()
            .filter_map(|tag| self.roles.get(tag))
            .flat_map(OneOrMany::iter)
        {
            if !out.contains(column) {
                out.push(column.clone());
            }
        }
        out
    }
}

fn role_entries<'de, D>(deserializer: D) -> Result<BTreeMap<String, OneOrMany>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| match role_columns(value) {
            Some(columns) => Some((key, columns)),
            None => {
                debug!(key = %key, "Table key is not a column role, ignored");
                None
            }
        })
        .collect())
}

fn role_columns(value: Value) -> Option<OneOrMany> {
    match value {
        Value::String(column) => Some(OneOrMany::One(column)),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(column) => Some(column),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(OneOrMany::Many),
        _ => None,
    }
}

/// Root of the table metadata file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct TableCatalog {
    #[validate(nested)]
    #[serde(default)]
    pub tabelas: Vec<TableMetadata>,
}

impl TableCatalog {
    pub fn new(tables: Vec<TableMetadata>) -> Self {
        Self { tabelas: tables }
    }

    pub fn tables(&self) -> &[TableMetadata] {
        &self.tabelas
    }

    pub fn len(&self) -> usize {
        self.tabelas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabelas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_roles_are_every_other_key() -> Result<()> {
        let json = r#"{"tabelas": [{
            "nome_tabela": "clientes",
            "caminho_arquivo": "data/clientes.csv",
            "tipo_arquivo": "csv",
            "chave_primaria": "id_cliente",
            "colunas_numericas": ["idade", "renda_mensal"]
        }]}"#;
        let catalog: TableCatalog = serde_yaml::from_str(json)?;
        catalog.validate()?;

        let t = &catalog.tables()[0];
        assert_eq!(t.roles.len(), 2);
        assert_eq!(t.resolve_columns(&["chave_primaria".into()]), vec!["id_cliente"]);
        Ok(())
    }

    #[test]
    fn test_non_column_keys_are_ignored() -> Result<()> {
        let json = r#"{"tabelas": [{
            "nome_tabela": "vendas",
            "caminho_arquivo": "data/vendas.csv",
            "tipo_arquivo": "csv",
            "linhas_esperadas": 100,
            "observacao": null,
            "origem": {"sistema": "erp"},
            "mistura": ["valor", 3],
            "colunas_numericas": ["valor", "quantidade"]
        }]}"#;
        let catalog: TableCatalog = serde_yaml::from_str(json)?;

        let t = &catalog.tables()[0];
        assert_eq!(t.roles.len(), 1);
        assert_eq!(
            t.resolve_columns(&["colunas_numericas".into(), "linhas_esperadas".into()]),
            vec!["valor", "quantidade"]
        );
        Ok(())
    }

    #[test]
    fn test_resolution_order_and_dedup() {
        let t = TableMetadata::new("t", "t.csv", "csv")
            .role("a", vec!["x", "y"])
            .role("b", vec!["z", "x"])
            .role("c", "w");
        let roles = ["b", "missing", "a", "c"].map(String::from);
        assert_eq!(t.resolve_columns(&roles), vec!["z", "x", "y", "w"]);
        assert!(t.resolve_columns(&["missing".into()]).is_empty());
    }
}
