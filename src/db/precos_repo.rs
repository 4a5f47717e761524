// src/db/precos_repo.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::store::{Consulta, DocumentStore, Documento},
    models::{Estado, Preco, PrecosMarca},
};

/// Coleção remota do modelo legado de tarifas.
pub const COLECAO_PRECOS: &str = "Precos";

#[derive(Clone)]
pub struct PrecosRepository {
    store: Arc<dyn DocumentStore>,
}

impl PrecosRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Todas as tarifas cadastradas, sem ordem garantida; quem agrupa por
    /// marca é o serviço.
    pub async fn listar_precos(&self) -> Result<Vec<Preco>, AppError> {
        let documentos = self.store.find(&Consulta::nova(COLECAO_PRECOS)).await?;
        documentos.iter().map(preco_de_documento).collect()
    }

    /// Tarifas de uma marca separadas por estado.
    pub async fn precos_da_marca(&self, marca_id: &str) -> Result<PrecosMarca, AppError> {
        let consulta = Consulta::nova(COLECAO_PRECOS).equal_to("marca_id", marca_id);
        let documentos = self.store.find(&consulta).await?;

        let mut precos = PrecosMarca::default();
        for documento in &documentos {
            let preco = preco_de_documento(documento)?;
            match preco.estado {
                Estado::PR => precos.pr = Some(preco),
                Estado::SP => precos.sp = Some(preco),
            }
        }

        Ok(precos)
    }

    /// Grava a tarifa de uma marca num estado. Com `objeto_id` atualiza
    /// direto; sem ele procura o registro do par (marca, estado) e só cria
    /// um novo se nenhum existir, mantendo no máximo um registro por par.
    pub async fn salvar_preco(
        &self,
        marca_id: &str,
        estado: Estado,
        objeto_id: Option<&str>,
        bateria_40ah: Decimal,
    ) -> Result<Preco, AppError> {
        let mut documento = match objeto_id {
            Some(id) => self.store.get(COLECAO_PRECOS, id).await?,
            None => {
                let consulta = Consulta::nova(COLECAO_PRECOS)
                    .equal_to("marca_id", marca_id)
                    .equal_to("estado", estado.as_str());

                match self.store.first(&consulta).await? {
                    Some(existente) => existente,
                    None => {
                        let mut novo = Documento::novo();
                        novo.set("marca_id", marca_id);
                        novo.set("estado", estado.as_str());
                        novo
                    }
                }
            }
        };

        documento.set_decimal("bateria_40ah", bateria_40ah);

        let salvo = self.store.save(COLECAO_PRECOS, documento).await?;
        preco_de_documento(&salvo)
    }

    /// Histórico de alterações: as tarifas mais recentemente atualizadas
    /// primeiro, com filtro opcional por marca.
    pub async fn historico(
        &self,
        marca_id: Option<&str>,
        limite: usize,
    ) -> Result<Vec<Preco>, AppError> {
        let mut consulta = Consulta::nova(COLECAO_PRECOS)
            .descending("updatedAt")
            .limit(limite);

        if let Some(marca_id) = marca_id {
            consulta = consulta.equal_to("marca_id", marca_id);
        }

        let documentos = self.store.find(&consulta).await?;
        documentos.iter().map(preco_de_documento).collect()
    }
}

fn preco_de_documento(documento: &Documento) -> Result<Preco, AppError> {
    let id = documento
        .id
        .clone()
        .ok_or_else(|| campo_ausente("objectId"))?;

    let estado = documento
        .get_str("estado")
        .ok_or_else(|| campo_ausente("estado"))?;
    let estado = Estado::parse(estado).ok_or_else(|| {
        AppError::DadosInvalidos(format!("tarifa com estado fora do domínio: '{estado}'"))
    })?;

    Ok(Preco {
        id,
        marca_id: documento
            .get_str("marca_id")
            .ok_or_else(|| campo_ausente("marca_id"))?
            .to_string(),
        estado,
        bateria_40ah: documento.get_decimal("bateria_40ah").unwrap_or_default(),
        created_at: documento.created_at.ok_or_else(|| campo_ausente("createdAt"))?,
        updated_at: documento.updated_at.ok_or_else(|| campo_ausente("updatedAt"))?,
    })
}

fn campo_ausente(campo: &str) -> AppError {
    AppError::DadosInvalidos(format!("tarifa sem o campo '{campo}'"))
}
