// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;

use crate::{
    db::{DocumentStore, LojasRepository, MarcasRepository, PrecosRepository},
    services::{ImportacaoService, LojasService, MarcasService, PrecosService},
};

/// Credenciais do serviço remoto de documentos, lidas do ambiente.
/// O cliente concreto é de quem hospeda o painel; aqui só se garante que a
/// configuração exista e esteja completa antes de qualquer conexão.
#[derive(Debug, Clone)]
pub struct ConfigRemoto {
    pub server_url: String,
    pub app_id: String,
    pub api_key: String,
}

impl ConfigRemoto {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let server_url =
            env::var("PAINEL_SERVER_URL").context("PAINEL_SERVER_URL deve ser definida")?;
        let app_id = env::var("PAINEL_APP_ID").context("PAINEL_APP_ID deve ser definido")?;
        let api_key = env::var("PAINEL_API_KEY").context("PAINEL_API_KEY deve ser definida")?;

        Ok(Self {
            server_url,
            app_id,
            api_key,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub marcas_service: MarcasService,
    pub lojas_service: LojasService,
    pub precos_service: PrecosService,
    pub importacao_service: ImportacaoService,
}

impl AppState {
    /// Monta o painel inteiro sobre um armazenamento já conectado.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        // --- Monta o gráfico de dependências ---
        let marcas_repo = MarcasRepository::new(store.clone());
        let lojas_repo = LojasRepository::new(store.clone());
        let precos_repo = PrecosRepository::new(store.clone());

        let marcas_service = MarcasService::new(marcas_repo.clone(), lojas_repo.clone());
        let lojas_service = LojasService::new(lojas_repo.clone());
        let precos_service = PrecosService::new(precos_repo, marcas_repo);
        let importacao_service = ImportacaoService::new(lojas_repo);

        Self {
            store,
            marcas_service,
            lojas_service,
            precos_service,
            importacao_service,
        }
    }
}
