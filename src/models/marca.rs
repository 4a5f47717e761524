// src/models/marca.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::store::ArquivoRemoto;
use crate::models::loja::Estado;

/// Marca cadastrada no painel. Cada loja pertence a exatamente uma marca,
/// e o slug é único entre todas as marcas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marca {
    pub id: String,
    pub nome: String,
    pub slug: String,
    pub descricao: String,
    /// Marcas inativas continuam listadas no painel, apenas sinalizadas.
    pub ativa: bool,
    /// Valor padrão sugerido para lojas do Paraná.
    pub valor_padrao_pr: Decimal,
    /// Valor padrão sugerido para lojas de São Paulo.
    pub valor_padrao_sp: Decimal,
    pub meta_title: String,
    pub meta_description: String,
    pub logo: Option<ArquivoRemoto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Marca {
    /// Valor padrão da marca para o estado dado. O formulário de loja usa
    /// isso para pré-preencher o preço inicial; a persistência nunca aplica
    /// o padrão por conta própria.
    pub fn valor_padrao(&self, estado: Estado) -> Decimal {
        match estado {
            Estado::PR => self.valor_padrao_pr,
            Estado::SP => self.valor_padrao_sp,
        }
    }
}

/// Payload do formulário de marca (criação e edição).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DadosMarca {
    #[validate(length(min = 1, message = "O nome da marca é obrigatório."))]
    pub nome: String,

    #[validate(regex(
        path = *crate::models::SLUG_RE,
        message = "O slug deve conter apenas letras minúsculas, números e hífen."
    ))]
    pub slug: String,

    pub descricao: Option<String>,

    /// Omitido no formulário de criação; o padrão é marca ativa.
    pub ativa: Option<bool>,

    #[serde(default)]
    #[validate(custom(function = crate::models::validar_nao_negativo))]
    pub valor_padrao_pr: Decimal,

    #[serde(default)]
    #[validate(custom(function = crate::models::validar_nao_negativo))]
    pub valor_padrao_sp: Decimal,

    pub meta_title: Option<String>,
    pub meta_description: Option<String>,

    /// Conteúdo do logo enviado pelo formulário, quando houver troca.
    #[serde(skip)]
    pub logo_arquivo: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use validator::Validate;

    use super::*;

    fn marca_exemplo() -> Marca {
        Marca {
            id: "m1".to_string(),
            nome: "Rede Única".to_string(),
            slug: "rede-unica".to_string(),
            descricao: String::new(),
            ativa: true,
            valor_padrao_pr: Decimal::from(289),
            valor_padrao_sp: Decimal::from(319),
            meta_title: String::new(),
            meta_description: String::new(),
            logo: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn dados_exemplo() -> DadosMarca {
        DadosMarca {
            nome: "Rede Única".to_string(),
            slug: "rede-unica".to_string(),
            descricao: None,
            ativa: None,
            valor_padrao_pr: Decimal::ZERO,
            valor_padrao_sp: Decimal::ZERO,
            meta_title: None,
            meta_description: None,
            logo_arquivo: None,
        }
    }

    #[test]
    fn valor_padrao_resolve_pelo_estado() {
        let marca = marca_exemplo();
        assert_eq!(marca.valor_padrao(Estado::PR), Decimal::from(289));
        assert_eq!(marca.valor_padrao(Estado::SP), Decimal::from(319));
    }

    #[test]
    fn payload_rejeita_slug_fora_do_padrao() {
        let mut dados = dados_exemplo();
        dados.slug = "Rede Única!".to_string();
        assert!(dados.validate().is_err());
    }

    #[test]
    fn payload_rejeita_valor_padrao_negativo() {
        let mut dados = dados_exemplo();
        dados.valor_padrao_pr = Decimal::from(-1);
        assert!(dados.validate().is_err());
    }

    #[test]
    fn payload_completo_passa() {
        assert!(dados_exemplo().validate().is_ok());
    }
}
