// src/services/marcas_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{LojasRepository, MarcasRepository},
    models::{DadosMarca, Marca, Sessao},
};

/// Resultado da atualização de valores padrão de uma marca.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultadoValoresPadrao {
    pub marca_atualizada: bool,
    pub lojas_atualizadas: u64,
}

#[derive(Clone)]
pub struct MarcasService {
    marcas: MarcasRepository,
    lojas: LojasRepository,
}

impl MarcasService {
    pub fn new(marcas: MarcasRepository, lojas: LojasRepository) -> Self {
        Self { marcas, lojas }
    }

    pub async fn listar_marcas(&self, apenas_ativas: bool) -> Result<Vec<Marca>, AppError> {
        self.marcas.listar_marcas(apenas_ativas).await
    }

    pub async fn obter_marca(&self, id: &str) -> Result<Marca, AppError> {
        self.marcas.obter_marca(id).await
    }

    pub async fn verificar_slug_existente(
        &self,
        slug: &str,
        excluir_id: Option<&str>,
    ) -> Result<bool, AppError> {
        self.marcas.verificar_slug_existente(slug, excluir_id).await
    }

    /// LÓGICA DE NEGÓCIO: valida o payload do formulário, garante que o slug
    /// não colide com outra marca e só então grava.
    pub async fn salvar_marca(
        &self,
        id: Option<&str>,
        dados: &DadosMarca,
        sessao: &Sessao,
    ) -> Result<Marca, AppError> {
        dados.validate()?;

        let slug_em_uso = self
            .marcas
            .verificar_slug_existente(&dados.slug, id)
            .await?;

        if slug_em_uso {
            return Err(AppError::SlugDuplicado(dados.slug.to_lowercase()));
        }

        let marca = self.marcas.salvar_marca(id, dados).await?;

        tracing::info!(
            "✅ Marca '{}' salva por {}",
            marca.slug,
            sessao.email
        );

        Ok(marca)
    }

    pub async fn alternar_status(&self, id: &str, sessao: &Sessao) -> Result<Marca, AppError> {
        let marca = self.marcas.alternar_status(id).await?;

        tracing::info!(
            "Marca '{}' agora está {} (por {})",
            marca.slug,
            if marca.ativa { "ativa" } else { "inativa" },
            sessao.email
        );

        Ok(marca)
    }

    pub async fn excluir_marca(&self, id: &str, sessao: &Sessao) -> Result<(), AppError> {
        self.marcas.excluir_marca(id).await?;
        tracing::info!("🗑️ Marca {} excluída por {}", id, sessao.email);
        Ok(())
    }

    /// Atualiza os valores padrão da marca e, se pedido, propaga o valor do
    /// estado de cada loja para o preço inicial de todas as lojas da marca.
    /// As duas gravações não são atômicas: se a propagação falhar no meio, a
    /// marca já ficou com os valores novos e a operação pode ser repetida.
    pub async fn atualizar_valores_padrao(
        &self,
        marca_id: &str,
        valor_pr: Decimal,
        valor_sp: Decimal,
        aplicar_todas_lojas: bool,
        sessao: &Sessao,
    ) -> Result<ResultadoValoresPadrao, AppError> {
        // 1. Atualiza a marca
        self.marcas
            .atualizar_valores(marca_id, valor_pr, valor_sp)
            .await?;

        // 2. Propaga para as lojas, se solicitado
        let mut lojas_atualizadas = 0;
        if aplicar_todas_lojas {
            lojas_atualizadas = self
                .lojas
                .aplicar_valores_padrao(marca_id, valor_pr, valor_sp)
                .await?;
        }

        tracing::info!(
            "Valores padrão da marca {} atualizados por {} ({} loja(s) afetada(s))",
            marca_id,
            sessao.email,
            lojas_atualizadas
        );

        Ok(ResultadoValoresPadrao {
            marca_atualizada: true,
            lojas_atualizadas,
        })
    }
}
