// src/models/preco.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::loja::Estado;
use super::marca::Marca;

/// Tarifa legada por marca e estado. Existe no máximo um registro por
/// par (marca, estado); o upsert do repositório garante isso.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preco {
    pub id: String,
    pub marca_id: String,
    pub estado: Estado,
    /// Valor da bateria de 40Ah, único item tarifado pelo modelo legado.
    #[serde(rename = "bateria_40ah")]
    pub bateria_40ah: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Tarifas de uma marca separadas por estado. `None` indica que o
/// estado ainda não foi tarifado.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecosMarca {
    pub pr: Option<Preco>,
    pub sp: Option<Preco>,
}

impl PrecosMarca {
    pub fn por_estado(&self, estado: Estado) -> Option<&Preco> {
        match estado {
            Estado::PR => self.pr.as_ref(),
            Estado::SP => self.sp.as_ref(),
        }
    }
}

/// Visão agregada usada na tela de preços: cada marca com suas tarifas.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecosDaMarca {
    pub marca: Marca,
    pub precos: PrecosMarca,
}
