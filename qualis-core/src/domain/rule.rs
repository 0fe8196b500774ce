// qualis-core/src/domain/rule.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::params::RuleParams;

/// A string or a list of strings, as written in the configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl OneOrMany {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        match self {
            Self::One(s) => std::slice::from_ref(s).iter(),
            Self::Many(v) => v.iter(),
        }
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.iter().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(_) => false,
            Self::Many(v) => v.is_empty(),
        }
    }
}

impl From<&str> for OneOrMany {
    fn from(s: &str) -> Self {
        Self::One(s.to_string())
    }
}

impl From<Vec<&str>> for OneOrMany {
    fn from(v: Vec<&str>) -> Self {
        Self::Many(v.into_iter().map(String::from).collect())
    }
}

/// One entry of `regras_globais_eda`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnalysisRule {
    #[validate(length(min = 1, message = "tipo_analise cannot be empty"))]
    pub tipo_analise: String,

    /// Handler namespace.
    #[serde(default)]
    pub modulo: Option<String>,

    #[serde(default)]
    pub funcao_analise: Option<String>,

    #[serde(default)]
    pub funcao_diagnostico: Option<String>,

    /// Role tags selecting the target columns of each table.
    #[serde(default)]
    pub alvo_tipo: OneOrMany,

    #[serde(default)]
    pub parametros: RuleParams,
}

impl AnalysisRule {
    pub fn new(tipo_analise: impl Into<String>, modulo: impl Into<String>) -> Self {
        Self {
            tipo_analise: tipo_analise.into(),
            modulo: Some(modulo.into()),
            funcao_analise: None,
            funcao_diagnostico: None,
            alvo_tipo: OneOrMany::default(),
            parametros: RuleParams::default(),
        }
    }

    pub fn analysis(mut self, name: impl Into<String>) -> Self {
        self.funcao_analise = Some(name.into());
        self
    }

    pub fn diagnostic(mut self, name: impl Into<String>) -> Self {
        self.funcao_diagnostico = Some(name.into());
        self
    }

    pub fn targets(mut self, roles: impl Into<OneOrMany>) -> Self {
        self.alvo_tipo = roles.into();
        self
    }

    pub fn params(mut self, params: RuleParams) -> Self {
        self.parametros = params;
        self
    }

    pub fn target_roles(&self) -> Vec<String> {
        self.alvo_tipo.to_vec()
    }
}

/// Root of the rule configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RuleSet {
    #[validate(nested)]
    #[serde(default)]
    pub regras_globais_eda: Vec<AnalysisRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<AnalysisRule>) -> Self {
        Self {
            regras_globais_eda: rules,
        }
    }

    pub fn rules(&self) -> &[AnalysisRule] {
        &self.regras_globais_eda
    }

    pub fn len(&self) -> usize {
        self.regras_globais_eda.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regras_globais_eda.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_rule_file_shape() -> Result<()> {
        let json = r#"{
            "regras_globais_eda": [
                {
                    "tipo_analise": "estatisticas_basicas",
                    "modulo": "numericas",
                    "funcao_analise": "estatisticas_descritivas",
                    "funcao_diagnostico": "diagnostico_estatistico",
                    "alvo_tipo": ["colunas_numericas"],
                    "parametros": {"percentis": [0.1, 0.9]}
                },
                {
                    "tipo_analise": "integridade_pk",
                    "modulo": "integridade",
                    "funcao_analise": "validacao_chave_primaria",
                    "alvo_tipo": "chave_primaria"
                }
            ]
        }"#;
        let set: RuleSet = serde_yaml::from_str(json)?;
        set.validate()?;

        assert_eq!(set.len(), 2);
        assert_eq!(set.rules()[0].target_roles(), vec!["colunas_numericas"]);
        assert_eq!(set.rules()[1].target_roles(), vec!["chave_primaria"]);
        assert_eq!(set.rules()[1].funcao_diagnostico, None);
        assert!(set.rules()[1].parametros.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_rule_id_fails_validation() {
        let set = RuleSet::new(vec![AnalysisRule::new("", "numericas")]);
        assert!(set.validate().is_err());
    }
}
