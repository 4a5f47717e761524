// src/lib.rs

//! Núcleo do painel administrativo de marcas e lojas.
//!
//! O crate concentra o que o painel tem de lógica: repositórios tipados
//! sobre um armazenamento remoto de documentos (contrato em [`db::store`]),
//! o pipeline de importação de lojas por planilha CSV e o modelo legado de
//! tarifas por marca e estado. A interface (formulários, navegação,
//! autenticação) vive fora daqui e consome os serviços via [`AppState`].

pub mod common;
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod services;

pub use common::error::AppError;
pub use config::{AppState, ConfigRemoto};
pub use db::{
    Consulta, DocumentStore, Documento, LojasRepository, MarcasRepository, MemoriaStore,
    PrecosRepository,
};
pub use models::{
    DadosLoja, DadosMarca, Estado, LinhaImportacao, Loja, Marca, PopupTipo, Preco, Sessao,
};
pub use services::{ImportacaoService, LojasService, MarcasService, PrecosService};
