// src/db/marcas_repo.rs

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::lojas_repo::COLECAO_LOJAS,
    db::store::{Consulta, DocumentStore, Documento},
    models::{DadosMarca, Marca},
};

/// Coleção remota das marcas.
pub const COLECAO_MARCAS: &str = "Marcas";

#[derive(Clone)]
pub struct MarcasRepository {
    store: Arc<dyn DocumentStore>,
}

impl MarcasRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Lista as marcas em ordem alfabética de nome.
    pub async fn listar_marcas(&self, apenas_ativas: bool) -> Result<Vec<Marca>, AppError> {
        let mut consulta = Consulta::nova(COLECAO_MARCAS);

        if apenas_ativas {
            consulta = consulta.equal_to("ativa", true);
        }

        let documentos = self.store.find(&consulta.ascending("nome")).await?;
        documentos.iter().map(marca_de_documento).collect()
    }

    /// Busca uma marca pelo id.
    pub async fn obter_marca(&self, id: &str) -> Result<Marca, AppError> {
        let documento = self.store.get(COLECAO_MARCAS, id).await?;
        marca_de_documento(&documento)
    }

    /// Cria (sem id) ou atualiza (com id) uma marca. A validação do payload
    /// e a checagem de slug acontecem antes, no serviço; aqui só se monta o
    /// documento e se grava.
    pub async fn salvar_marca(
        &self,
        id: Option<&str>,
        dados: &DadosMarca,
    ) -> Result<Marca, AppError> {
        let mut documento = match id {
            Some(id) => self.store.get(COLECAO_MARCAS, id).await?,
            None => Documento::novo(),
        };

        let slug = dados.slug.to_lowercase();

        // Campos obrigatórios
        documento.set("nome", dados.nome.clone());
        documento.set("slug", slug.clone());
        documento.set("descricao", dados.descricao.clone().unwrap_or_default());
        documento.set("ativa", dados.ativa.unwrap_or(true));

        // Valores padrão por estado
        documento.set_decimal("valor_padrao_pr", dados.valor_padrao_pr);
        documento.set_decimal("valor_padrao_sp", dados.valor_padrao_sp);

        // Campos de SEO
        documento.set("meta_title", dados.meta_title.clone().unwrap_or_default());
        documento.set(
            "meta_description",
            dados.meta_description.clone().unwrap_or_default(),
        );

        // Logo: só troca quando o formulário mandou um arquivo novo.
        if let Some(conteudo) = &dados.logo_arquivo {
            let arquivo = self
                .store
                .salvar_arquivo(&format!("logo_{slug}.jpg"), conteudo.clone())
                .await?;
            documento.set_arquivo("logo", &arquivo);
        }

        let salvo = self.store.save(COLECAO_MARCAS, documento).await?;
        marca_de_documento(&salvo)
    }

    /// Inverte o flag `ativa` da marca e persiste.
    pub async fn alternar_status(&self, id: &str) -> Result<Marca, AppError> {
        let mut documento = self.store.get(COLECAO_MARCAS, id).await?;
        let ativa = documento.get_bool("ativa").unwrap_or(true);
        documento.set("ativa", !ativa);

        let salvo = self.store.save(COLECAO_MARCAS, documento).await?;
        marca_de_documento(&salvo)
    }

    /// Atualiza apenas os valores padrão por estado, preservando o resto do
    /// documento.
    pub async fn atualizar_valores(
        &self,
        id: &str,
        valor_pr: Decimal,
        valor_sp: Decimal,
    ) -> Result<Marca, AppError> {
        let mut documento = self.store.get(COLECAO_MARCAS, id).await?;
        documento.set_decimal("valor_padrao_pr", valor_pr);
        documento.set_decimal("valor_padrao_sp", valor_sp);

        let salvo = self.store.save(COLECAO_MARCAS, documento).await?;
        marca_de_documento(&salvo)
    }

    /// Exclui a marca, desde que nenhuma loja aponte para ela.
    pub async fn excluir_marca(&self, id: &str) -> Result<(), AppError> {
        let vinculadas = self
            .store
            .count(&Consulta::nova(COLECAO_LOJAS).equal_to("marca_id", id))
            .await?;

        if vinculadas > 0 {
            return Err(AppError::PossuiDependentes(vinculadas));
        }

        self.store.destroy(COLECAO_MARCAS, id).await?;
        Ok(())
    }

    /// Diz se já existe marca com o slug dado. Em edição, `excluir_id` tira
    /// a própria marca da checagem.
    pub async fn verificar_slug_existente(
        &self,
        slug: &str,
        excluir_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let mut consulta =
            Consulta::nova(COLECAO_MARCAS).equal_to("slug", slug.to_lowercase());

        if let Some(id) = excluir_id {
            consulta = consulta.not_equal_to("objectId", id);
        }

        Ok(self.store.first(&consulta).await?.is_some())
    }
}

/// Traduz o documento remoto para a struct tipada. `nome` e `slug` são
/// obrigatórios; os campos de apresentação ausentes viram string vazia,
/// como o formulário sempre gravou.
pub(crate) fn marca_de_documento(documento: &Documento) -> Result<Marca, AppError> {
    let id = documento
        .id
        .clone()
        .ok_or_else(|| campo_ausente("objectId"))?;

    Ok(Marca {
        id,
        nome: documento
            .get_str("nome")
            .ok_or_else(|| campo_ausente("nome"))?
            .to_string(),
        slug: documento
            .get_str("slug")
            .ok_or_else(|| campo_ausente("slug"))?
            .to_string(),
        descricao: documento.get_str("descricao").unwrap_or_default().to_string(),
        ativa: documento.get_bool("ativa").unwrap_or(true),
        valor_padrao_pr: documento.get_decimal("valor_padrao_pr").unwrap_or_default(),
        valor_padrao_sp: documento.get_decimal("valor_padrao_sp").unwrap_or_default(),
        meta_title: documento.get_str("meta_title").unwrap_or_default().to_string(),
        meta_description: documento
            .get_str("meta_description")
            .unwrap_or_default()
            .to_string(),
        logo: documento.get_arquivo("logo"),
        created_at: documento.created_at.ok_or_else(|| campo_ausente("createdAt"))?,
        updated_at: documento.updated_at.ok_or_else(|| campo_ausente("updatedAt"))?,
    })
}

fn campo_ausente(campo: &str) -> AppError {
    AppError::DadosInvalidos(format!("marca sem o campo '{campo}'"))
}
