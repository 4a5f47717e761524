// src/models/loja.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::db::store::ArquivoRemoto;

/// Estados atendidos pelo painel. O valor persistido é sempre a sigla
/// em maiúsculas ("PR" / "SP").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Estado {
    PR,
    SP,
}

impl Estado {
    /// Sigla como persistida na coleção remota.
    pub fn as_str(&self) -> &'static str {
        match self {
            Estado::PR => "PR",
            Estado::SP => "SP",
        }
    }

    /// Aceita a sigla em qualquer caixa, como vem das planilhas.
    pub fn parse(valor: &str) -> Option<Estado> {
        match valor.trim().to_uppercase().as_str() {
            "PR" => Some(Estado::PR),
            "SP" => Some(Estado::SP),
            _ => None,
        }
    }
}

/// Variante de popup exibida na página pública da loja.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupTipo {
    Whatsapp,
    Raspadinha,
    Simples,
}

impl PopupTipo {
    pub fn as_str(&self) -> &'static str {
        match self {
            PopupTipo::Whatsapp => "whatsapp",
            PopupTipo::Raspadinha => "raspadinha",
            PopupTipo::Simples => "simples",
        }
    }

    /// Aceita o valor em qualquer caixa, como vem das planilhas.
    pub fn parse(valor: &str) -> Option<PopupTipo> {
        match valor.trim().to_lowercase().as_str() {
            "whatsapp" => Some(PopupTipo::Whatsapp),
            "raspadinha" => Some(PopupTipo::Raspadinha),
            "simples" => Some(PopupTipo::Simples),
            _ => None,
        }
    }
}

/// Loja vinculada a uma marca. O slug é único apenas dentro da marca,
/// então duas marcas podem ter lojas "centro" sem conflito.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loja {
    pub id: String,
    pub slug: String,
    pub cidade: String,
    pub estado: Estado,
    pub telefone: String,
    pub preco_inicial: Decimal,
    pub marca_id: String,
    /// Lojas importadas por planilha podem não ter os campos opcionais;
    /// o formulário sempre grava ao menos a string vazia.
    pub link_whatsapp: Option<String>,
    pub link_maps: Option<String>,
    pub popup_tipo: Option<PopupTipo>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub ativa: bool,
    pub imagem_produto: Option<ArquivoRemoto>,
    pub imagem_loja: Option<ArquivoRemoto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha da planilha de importação, com as células já aparadas.
/// Célula vazia vira `None`; a validação da importação decide o que é
/// obrigatório, então aqui tudo é opcional e textual.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LinhaImportacao {
    pub slug: Option<String>,
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub telefone: Option<String>,
    pub preco_inicial: Option<String>,
    pub link_whatsapp: Option<String>,
    pub link_maps: Option<String>,
    pub popup_tipo: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
}

/// Payload do formulário de loja (criação e edição).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DadosLoja {
    #[validate(regex(
        path = *crate::models::SLUG_RE,
        message = "O slug deve conter apenas letras minúsculas, números e hífen."
    ))]
    pub slug: String,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub cidade: String,

    pub estado: Estado,

    #[validate(regex(
        path = *crate::models::TELEFONE_RE,
        message = "Formato de telefone inválido. Use (XX) XXXXX-XXXX."
    ))]
    pub telefone: String,

    #[serde(default)]
    #[validate(custom(function = crate::models::validar_nao_negativo))]
    pub preco_inicial: Decimal,

    #[validate(length(min = 1, message = "A loja precisa estar vinculada a uma marca."))]
    pub marca_id: String,

    pub link_whatsapp: Option<String>,
    pub link_maps: Option<String>,
    pub popup_tipo: Option<PopupTipo>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,

    /// Omitido no formulário de criação; o padrão é loja ativa.
    pub ativa: Option<bool>,

    /// Imagens enviadas pelo formulário, quando houver troca.
    #[serde(skip)]
    pub imagem_produto_arquivo: Option<Vec<u8>>,
    #[serde(skip)]
    pub imagem_loja_arquivo: Option<Vec<u8>>,
}
