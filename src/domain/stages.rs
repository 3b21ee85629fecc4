//! Pipeline stages. Stored as lowercase Portuguese tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    #[default]
    Novo,
    Qualificado,
    Contatado,
    Proposta,
    Fechado,
}

impl Stage {
    /// All stages in pipeline order.
    pub const ALL: [Stage; 5] = [
        Stage::Novo,
        Stage::Qualificado,
        Stage::Contatado,
        Stage::Proposta,
        Stage::Fechado,
    ];

    /// Token written to storage and CSV.
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Novo => "novo",
            Stage::Qualificado => "qualificado",
            Stage::Contatado => "contatado",
            Stage::Proposta => "proposta",
            Stage::Fechado => "fechado",
        }
    }

    /// Human-friendly label for menus and tables.
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Novo => "Novo Lead",
            Stage::Qualificado => "Qualificado",
            Stage::Contatado => "Contatado",
            Stage::Proposta => "Proposta Enviada",
            Stage::Fechado => "Fechado",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| DomainError::Validation(format!("unknown stage: {}", s)))
    }
}
