// src/services/lojas_service.rs

use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::LojasRepository,
    models::{DadosLoja, Estado, Loja, Sessao},
};

#[derive(Clone)]
pub struct LojasService {
    lojas: LojasRepository,
}

impl LojasService {
    pub fn new(lojas: LojasRepository) -> Self {
        Self { lojas }
    }

    pub async fn listar_por_marca(
        &self,
        marca_id: &str,
        estado: Option<Estado>,
    ) -> Result<Vec<Loja>, AppError> {
        self.lojas.listar_por_marca(marca_id, estado).await
    }

    pub async fn obter_loja(&self, id: &str) -> Result<Loja, AppError> {
        self.lojas.obter_loja(id).await
    }

    pub async fn verificar_slug_existente(
        &self,
        slug: &str,
        marca_id: &str,
        excluir_id: Option<&str>,
    ) -> Result<bool, AppError> {
        self.lojas
            .verificar_slug_existente(slug, marca_id, excluir_id)
            .await
    }

    /// LÓGICA DE NEGÓCIO: valida o payload do formulário, garante que o slug
    /// não colide com outra loja da mesma marca e só então grava.
    pub async fn salvar_loja(
        &self,
        id: Option<&str>,
        dados: &DadosLoja,
        sessao: &Sessao,
    ) -> Result<Loja, AppError> {
        dados.validate()?;

        let slug_em_uso = self
            .lojas
            .verificar_slug_existente(&dados.slug, &dados.marca_id, id)
            .await?;

        if slug_em_uso {
            return Err(AppError::SlugDuplicado(dados.slug.to_lowercase()));
        }

        let loja = self.lojas.salvar_loja(id, dados).await?;

        tracing::info!(
            "✅ Loja '{}' ({}) salva por {}",
            loja.slug,
            loja.cidade,
            sessao.email
        );

        Ok(loja)
    }

    pub async fn alternar_status(&self, id: &str, sessao: &Sessao) -> Result<Loja, AppError> {
        let loja = self.lojas.alternar_status(id).await?;

        tracing::info!(
            "Loja '{}' agora está {} (por {})",
            loja.slug,
            if loja.ativa { "ativa" } else { "inativa" },
            sessao.email
        );

        Ok(loja)
    }

    pub async fn excluir_loja(&self, id: &str, sessao: &Sessao) -> Result<(), AppError> {
        self.lojas.excluir_loja(id).await?;
        tracing::info!("🗑️ Loja {} excluída por {}", id, sessao.email);
        Ok(())
    }

    /// Reajusta o preço inicial das lojas selecionadas na tela de preços.
    pub async fn atualizar_precos_lojas(
        &self,
        marca_id: &str,
        lojas_ids: &[String],
        valor_pr: Decimal,
        valor_sp: Decimal,
        sessao: &Sessao,
    ) -> Result<u64, AppError> {
        let atualizadas = self
            .lojas
            .atualizar_precos_lojas(marca_id, lojas_ids, valor_pr, valor_sp)
            .await?;

        tracing::info!(
            "Preços de {} loja(s) da marca {} reajustados por {}",
            atualizadas,
            marca_id,
            sessao.email
        );

        Ok(atualizadas)
    }
}
