// src/db/store.rs

//! Contrato do armazenamento remoto de documentos.
//!
//! O painel não implementa o banco remoto: ele consome um serviço de
//! documentos (coleções nomeadas, consultas filtradas, upload de arquivos)
//! através deste trait. Os repositórios traduzem `Documento` <-> structs
//! tipadas na fronteira deles; este é o único ponto do crate onde os campos
//! são dinâmicos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Falhas do serviço remoto, vistas pelo painel.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("objeto não encontrado")]
    NaoEncontrado,

    #[error("falha remota: {0}")]
    Remoto(String),
}

/// Referência a um arquivo já salvo no armazenamento de objetos.
///
/// O upload em si (`DocumentStore::salvar_arquivo`) é responsabilidade do
/// serviço remoto; o painel só guarda e repassa a referência.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArquivoRemoto {
    pub nome: String,
    pub url: String,
}

/// Documento dinâmico de uma coleção remota.
///
/// `id`, `created_at` e `updated_at` são mantidos pelo serviço remoto:
/// um documento recém-construído não tem nenhum dos três, e `save`
/// devolve o documento com eles preenchidos.
#[derive(Debug, Clone, Default)]
pub struct Documento {
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    campos: Map<String, Value>,
}

impl Documento {
    pub fn novo() -> Self {
        Self::default()
    }

    pub fn get(&self, campo: &str) -> Option<&Value> {
        self.campos.get(campo)
    }

    pub fn get_str(&self, campo: &str) -> Option<&str> {
        self.campos.get(campo).and_then(Value::as_str)
    }

    pub fn get_bool(&self, campo: &str) -> Option<bool> {
        self.campos.get(campo).and_then(Value::as_bool)
    }

    pub fn get_decimal(&self, campo: &str) -> Option<Decimal> {
        self.campos
            .get(campo)
            .cloned()
            .and_then(|valor| serde_json::from_value(valor).ok())
    }

    pub fn get_arquivo(&self, campo: &str) -> Option<ArquivoRemoto> {
        self.campos
            .get(campo)
            .cloned()
            .and_then(|valor| serde_json::from_value(valor).ok())
    }

    pub fn set(&mut self, campo: impl Into<String>, valor: impl Into<Value>) {
        self.campos.insert(campo.into(), valor.into());
    }

    pub fn set_decimal(&mut self, campo: impl Into<String>, valor: Decimal) {
        let valor = serde_json::to_value(valor).unwrap_or(Value::Null);
        self.campos.insert(campo.into(), valor);
    }

    pub fn set_arquivo(&mut self, campo: impl Into<String>, arquivo: &ArquivoRemoto) {
        let valor = serde_json::to_value(arquivo).unwrap_or(Value::Null);
        self.campos.insert(campo.into(), valor);
    }
}

/// Direção de ordenação de uma consulta.
#[derive(Debug, Clone)]
pub enum Ordenacao {
    Ascendente(String),
    Descendente(String),
}

/// Descrição imutável de uma consulta sobre uma coleção.
///
/// Montada de forma fluente, no espelho da API consumida:
/// `Consulta::nova("Lojas").equal_to("marca_id", id).descending("createdAt")`.
/// Os campos de ordenação aceitam os pseudocampos `createdAt`/`updatedAt`
/// mantidos pelo serviço remoto, além dos campos de dados.
#[derive(Debug, Clone)]
pub struct Consulta {
    colecao: String,
    igualdades: Vec<(String, Value)>,
    desigualdades: Vec<(String, Value)>,
    ordenacao: Option<Ordenacao>,
    limite: Option<usize>,
}

impl Consulta {
    pub fn nova(colecao: impl Into<String>) -> Self {
        Self {
            colecao: colecao.into(),
            igualdades: Vec::new(),
            desigualdades: Vec::new(),
            ordenacao: None,
            limite: None,
        }
    }

    pub fn equal_to(mut self, campo: impl Into<String>, valor: impl Into<Value>) -> Self {
        self.igualdades.push((campo.into(), valor.into()));
        self
    }

    /// Exclui documentos com o valor dado; `not_equal_to("objectId", id)`
    /// é como uma edição se exclui da própria checagem de slug.
    pub fn not_equal_to(mut self, campo: impl Into<String>, valor: impl Into<Value>) -> Self {
        self.desigualdades.push((campo.into(), valor.into()));
        self
    }

    pub fn ascending(mut self, campo: impl Into<String>) -> Self {
        self.ordenacao = Some(Ordenacao::Ascendente(campo.into()));
        self
    }

    pub fn descending(mut self, campo: impl Into<String>) -> Self {
        self.ordenacao = Some(Ordenacao::Descendente(campo.into()));
        self
    }

    pub fn limit(mut self, limite: usize) -> Self {
        self.limite = Some(limite);
        self
    }

    // Acessores para quem implementa `DocumentStore`.

    pub fn colecao(&self) -> &str {
        &self.colecao
    }

    pub fn igualdades(&self) -> &[(String, Value)] {
        &self.igualdades
    }

    pub fn desigualdades(&self) -> &[(String, Value)] {
        &self.desigualdades
    }

    pub fn ordenacao(&self) -> Option<&Ordenacao> {
        self.ordenacao.as_ref()
    }

    pub fn limite(&self) -> Option<usize> {
        self.limite
    }
}

/// Interface do serviço remoto de documentos, consumida pelos repositórios.
///
/// Toda persistência do painel passa por aqui; nenhuma outra parte do crate
/// conhece o cliente concreto.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Executa a consulta e devolve os documentos encontrados.
    async fn find(&self, consulta: &Consulta) -> Result<Vec<Documento>, StoreError>;

    /// Devolve o primeiro documento da consulta, se houver.
    async fn first(&self, consulta: &Consulta) -> Result<Option<Documento>, StoreError>;

    /// Conta os documentos que a consulta alcança, sem trazê-los.
    async fn count(&self, consulta: &Consulta) -> Result<u64, StoreError>;

    /// Busca um documento pelo id; `StoreError::NaoEncontrado` se ausente.
    async fn get(&self, colecao: &str, id: &str) -> Result<Documento, StoreError>;

    /// Cria (documento sem id) ou atualiza (documento com id) e devolve o
    /// documento com id e carimbos preenchidos.
    async fn save(&self, colecao: &str, documento: Documento) -> Result<Documento, StoreError>;

    /// Remove o documento pelo id; `StoreError::NaoEncontrado` se ausente.
    async fn destroy(&self, colecao: &str, id: &str) -> Result<(), StoreError>;

    /// Sobe um arquivo para o armazenamento de objetos e devolve a
    /// referência com URL.
    async fn salvar_arquivo(&self, nome: &str, dados: Vec<u8>) -> Result<ArquivoRemoto, StoreError>;
}
