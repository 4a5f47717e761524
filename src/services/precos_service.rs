// src/services/precos_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    common::error::AppError,
    db::{MarcasRepository, PrecosRepository},
    models::{Estado, Preco, PrecosDaMarca, PrecosMarca, Sessao},
};

/// Falha ao aplicar uma tarifa a uma das marcas, identificada pelo nome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErroAplicacao {
    pub marca: String,
    pub erro: String,
}

/// Agregado da aplicação de uma tarifa a todas as marcas ativas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoAplicacao {
    pub sucesso: usize,
    pub falhas: usize,
    pub erros: Vec<ErroAplicacao>,
}

/// Falha ao copiar a tarifa de um estado entre marcas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErroCopia {
    pub estado: Estado,
    pub erro: String,
}

/// Agregado da cópia de tarifas entre duas marcas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoCopia {
    pub sucesso: usize,
    pub falhas: usize,
    pub erros: Vec<ErroCopia>,
}

/// Linha do histórico de alterações de tarifas, já com o nome da marca
/// resolvido para exibição.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricoPreco {
    pub id: String,
    pub marca: String,
    pub estado: Estado,
    #[serde(rename = "bateria_40ah")]
    pub bateria_40ah: Decimal,
    pub data_atualizacao: DateTime<Utc>,
    pub data_criacao: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PrecosService {
    precos: PrecosRepository,
    marcas: MarcasRepository,
}

impl PrecosService {
    pub fn new(precos: PrecosRepository, marcas: MarcasRepository) -> Self {
        Self { precos, marcas }
    }

    /// Visão da tela de preços: cada marca que tem ao menos uma tarifa,
    /// em ordem alfabética de nome. Tarifa cuja marca sumiu é ignorada.
    pub async fn listar_precos_por_marca(&self) -> Result<Vec<PrecosDaMarca>, AppError> {
        let precos = self.precos.listar_precos().await?;
        let marcas = self.marcas.listar_marcas(false).await?;

        let mapa: HashMap<String, _> = marcas
            .into_iter()
            .map(|marca| (marca.id.clone(), marca))
            .collect();

        let mut por_marca: HashMap<String, PrecosDaMarca> = HashMap::new();
        for preco in precos {
            let Some(marca) = mapa.get(&preco.marca_id) else {
                continue;
            };

            let entrada = por_marca
                .entry(preco.marca_id.clone())
                .or_insert_with(|| PrecosDaMarca {
                    marca: marca.clone(),
                    precos: PrecosMarca::default(),
                });

            match preco.estado {
                Estado::PR => entrada.precos.pr = Some(preco),
                Estado::SP => entrada.precos.sp = Some(preco),
            }
        }

        let mut lista: Vec<PrecosDaMarca> = por_marca.into_values().collect();
        lista.sort_by(|a, b| a.marca.nome.cmp(&b.marca.nome));

        Ok(lista)
    }

    pub async fn precos_da_marca(&self, marca_id: &str) -> Result<PrecosMarca, AppError> {
        self.precos.precos_da_marca(marca_id).await
    }

    pub async fn salvar_preco_marca(
        &self,
        marca_id: &str,
        estado: Estado,
        objeto_id: Option<&str>,
        bateria_40ah: Decimal,
        sessao: &Sessao,
    ) -> Result<Preco, AppError> {
        let preco = self
            .precos
            .salvar_preco(marca_id, estado, objeto_id, bateria_40ah)
            .await?;

        tracing::info!(
            "💰 Tarifa {} da marca {} gravada em {} por {}",
            preco.bateria_40ah,
            preco.marca_id,
            preco.estado.as_str(),
            sessao.email
        );

        Ok(preco)
    }

    /// Aplica a mesma tarifa a todas as marcas ativas num estado. Cada marca
    /// é tentada por conta própria; o agregado volta sempre inteiro.
    pub async fn aplicar_preco_todas_marcas(
        &self,
        estado: Estado,
        bateria_40ah: Decimal,
        sessao: &Sessao,
    ) -> Result<ResultadoAplicacao, AppError> {
        let marcas = self.marcas.listar_marcas(true).await?;

        let mut resultados = ResultadoAplicacao::default();
        for marca in &marcas {
            match self
                .precos
                .salvar_preco(&marca.id, estado, None, bateria_40ah)
                .await
            {
                Ok(_) => resultados.sucesso += 1,
                Err(erro) => {
                    resultados.falhas += 1;
                    resultados.erros.push(ErroAplicacao {
                        marca: marca.nome.clone(),
                        erro: erro.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Tarifa {} aplicada em {} para {} marca(s) por {}",
            bateria_40ah,
            estado.as_str(),
            resultados.sucesso,
            sessao.email
        );

        Ok(resultados)
    }

    /// Histórico das tarifas mais recentemente alteradas, com filtro
    /// opcional por marca.
    pub async fn historico_precos(
        &self,
        marca_id: Option<&str>,
        limite: usize,
    ) -> Result<Vec<HistoricoPreco>, AppError> {
        let precos = self.precos.historico(marca_id, limite).await?;
        let marcas = self.marcas.listar_marcas(false).await?;

        let nomes: HashMap<String, String> = marcas
            .into_iter()
            .map(|marca| (marca.id, marca.nome))
            .collect();

        Ok(precos
            .into_iter()
            .map(|preco| HistoricoPreco {
                id: preco.id,
                marca: nomes
                    .get(&preco.marca_id)
                    .cloned()
                    .unwrap_or_else(|| "Marca não encontrada".to_string()),
                estado: preco.estado,
                bateria_40ah: preco.bateria_40ah,
                data_atualizacao: preco.updated_at,
                data_criacao: preco.created_at,
            })
            .collect())
    }

    /// Copia as tarifas de uma marca para outra, estado a estado. Estado sem
    /// tarifa na origem (ou com tarifa zerada) não é copiado.
    pub async fn copiar_precos(
        &self,
        marca_origem_id: &str,
        marca_destino_id: &str,
        sessao: &Sessao,
    ) -> Result<ResultadoCopia, AppError> {
        let origem = self.precos.precos_da_marca(marca_origem_id).await?;

        let mut resultados = ResultadoCopia::default();
        for estado in [Estado::PR, Estado::SP] {
            let Some(preco) = origem.por_estado(estado) else {
                continue;
            };
            if preco.bateria_40ah.is_zero() {
                continue;
            }

            match self
                .precos
                .salvar_preco(marca_destino_id, estado, None, preco.bateria_40ah)
                .await
            {
                Ok(_) => resultados.sucesso += 1,
                Err(erro) => {
                    resultados.falhas += 1;
                    resultados.erros.push(ErroCopia {
                        estado,
                        erro: erro.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Tarifas copiadas da marca {} para a marca {} por {} ({} estado(s))",
            marca_origem_id,
            marca_destino_id,
            sessao.email,
            resultados.sucesso
        );

        Ok(resultados)
    }
}
