// src/db/lojas_repo.rs

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::store::{Consulta, DocumentStore, Documento},
    models::{DadosLoja, Estado, LinhaImportacao, Loja, PopupTipo},
};

/// Coleção remota das lojas.
pub const COLECAO_LOJAS: &str = "Lojas";

#[derive(Clone)]
pub struct LojasRepository {
    store: Arc<dyn DocumentStore>,
}

impl LojasRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Lista as lojas de uma marca, das mais recentes para as mais antigas,
    /// com filtro opcional por estado.
    pub async fn listar_por_marca(
        &self,
        marca_id: &str,
        estado: Option<Estado>,
    ) -> Result<Vec<Loja>, AppError> {
        let mut consulta = Consulta::nova(COLECAO_LOJAS).equal_to("marca_id", marca_id);

        if let Some(estado) = estado {
            consulta = consulta.equal_to("estado", estado.as_str());
        }

        let documentos = self.store.find(&consulta.descending("createdAt")).await?;
        documentos.iter().map(loja_de_documento).collect()
    }

    /// Listagem global, da época em que o painel era de marca única.
    #[deprecated(note = "use listar_por_marca; a listagem sem marca ficou da era de marca única")]
    pub async fn listar_lojas(&self, estado: Option<Estado>) -> Result<Vec<Loja>, AppError> {
        let mut consulta = Consulta::nova(COLECAO_LOJAS);

        if let Some(estado) = estado {
            consulta = consulta.equal_to("estado", estado.as_str());
        }

        let documentos = self.store.find(&consulta.descending("createdAt")).await?;
        documentos.iter().map(loja_de_documento).collect()
    }

    /// Busca uma loja pelo id.
    pub async fn obter_loja(&self, id: &str) -> Result<Loja, AppError> {
        let documento = self.store.get(COLECAO_LOJAS, id).await?;
        loja_de_documento(&documento)
    }

    /// Cria (sem id) ou atualiza (com id) uma loja a partir do formulário.
    /// Os opcionais não preenchidos são gravados como string vazia e o popup
    /// cai no padrão "whatsapp"; a importação por planilha NÃO passa por
    /// aqui justamente para não herdar esses padrões.
    pub async fn salvar_loja(
        &self,
        id: Option<&str>,
        dados: &DadosLoja,
    ) -> Result<Loja, AppError> {
        let mut documento = match id {
            Some(id) => self.store.get(COLECAO_LOJAS, id).await?,
            None => Documento::novo(),
        };

        let slug = dados.slug.to_lowercase();

        // Campos obrigatórios
        documento.set("slug", slug.clone());
        documento.set("cidade", dados.cidade.clone());
        documento.set("estado", dados.estado.as_str());
        documento.set("telefone", dados.telefone.clone());
        documento.set_decimal("preco_inicial", dados.preco_inicial);
        documento.set("marca_id", dados.marca_id.clone());

        // Campos opcionais
        documento.set("link_whatsapp", dados.link_whatsapp.clone().unwrap_or_default());
        documento.set("link_maps", dados.link_maps.clone().unwrap_or_default());
        documento.set(
            "popup_tipo",
            dados.popup_tipo.unwrap_or(PopupTipo::Whatsapp).as_str(),
        );
        documento.set("meta_title", dados.meta_title.clone().unwrap_or_default());
        documento.set(
            "meta_description",
            dados.meta_description.clone().unwrap_or_default(),
        );
        documento.set("ativa", dados.ativa.unwrap_or(true));

        // Imagens: só trocam quando o formulário mandou arquivo novo.
        if let Some(conteudo) = &dados.imagem_produto_arquivo {
            let arquivo = self
                .store
                .salvar_arquivo(&format!("imagem_produto_{slug}.jpg"), conteudo.clone())
                .await?;
            documento.set_arquivo("imagem_produto", &arquivo);
        }

        if let Some(conteudo) = &dados.imagem_loja_arquivo {
            let arquivo = self
                .store
                .salvar_arquivo(&format!("imagem_loja_{slug}.jpg"), conteudo.clone())
                .await?;
            documento.set_arquivo("imagem_loja", &arquivo);
        }

        let salvo = self.store.save(COLECAO_LOJAS, documento).await?;
        loja_de_documento(&salvo)
    }

    /// Cria uma loja a partir de uma linha de planilha já validada. Os
    /// opcionais ausentes ficam fora do documento, e a loja nasce ativa.
    pub async fn criar_importada(
        &self,
        linha: &LinhaImportacao,
        marca_id: &str,
    ) -> Result<Loja, AppError> {
        let slug = linha
            .slug
            .as_deref()
            .ok_or_else(|| AppError::DadosInvalidos("linha de planilha sem slug".into()))?
            .to_lowercase();
        let cidade = linha
            .cidade
            .as_deref()
            .ok_or_else(|| AppError::DadosInvalidos("linha de planilha sem cidade".into()))?;
        let estado = linha
            .estado
            .as_deref()
            .and_then(Estado::parse)
            .ok_or_else(|| AppError::DadosInvalidos("linha de planilha sem estado válido".into()))?;
        let telefone = linha
            .telefone
            .as_deref()
            .ok_or_else(|| AppError::DadosInvalidos("linha de planilha sem telefone".into()))?;

        // Preço que não parseia vira zero, como a planilha sempre tolerou.
        let preco = linha
            .preco_inicial
            .as_deref()
            .and_then(|valor| Decimal::from_str(valor.trim()).ok())
            .unwrap_or_default();

        let mut documento = Documento::novo();
        documento.set("slug", slug);
        documento.set("cidade", cidade);
        documento.set("estado", estado.as_str());
        documento.set("telefone", telefone);
        documento.set_decimal("preco_inicial", preco);
        documento.set("marca_id", marca_id);

        if let Some(link) = &linha.link_whatsapp {
            documento.set("link_whatsapp", link.clone());
        }
        if let Some(link) = &linha.link_maps {
            documento.set("link_maps", link.clone());
        }
        if let Some(popup) = linha.popup_tipo.as_deref().and_then(PopupTipo::parse) {
            documento.set("popup_tipo", popup.as_str());
        }
        if let Some(titulo) = &linha.meta_title {
            documento.set("meta_title", titulo.clone());
        }
        if let Some(descricao) = &linha.meta_description {
            documento.set("meta_description", descricao.clone());
        }

        documento.set("ativa", true);

        let salvo = self.store.save(COLECAO_LOJAS, documento).await?;
        loja_de_documento(&salvo)
    }

    /// Inverte o flag `ativa` da loja e persiste.
    pub async fn alternar_status(&self, id: &str) -> Result<Loja, AppError> {
        let mut documento = self.store.get(COLECAO_LOJAS, id).await?;
        let ativa = documento.get_bool("ativa").unwrap_or(true);
        documento.set("ativa", !ativa);

        let salvo = self.store.save(COLECAO_LOJAS, documento).await?;
        loja_de_documento(&salvo)
    }

    /// Exclui a loja. Diferente da marca, não há dependentes a checar.
    pub async fn excluir_loja(&self, id: &str) -> Result<(), AppError> {
        self.store.destroy(COLECAO_LOJAS, id).await?;
        Ok(())
    }

    /// Diz se já existe loja com o slug dado dentro da marca. Em edição,
    /// `excluir_id` tira a própria loja da checagem.
    pub async fn verificar_slug_existente(
        &self,
        slug: &str,
        marca_id: &str,
        excluir_id: Option<&str>,
    ) -> Result<bool, AppError> {
        let mut consulta = Consulta::nova(COLECAO_LOJAS)
            .equal_to("slug", slug.to_lowercase())
            .equal_to("marca_id", marca_id);

        if let Some(id) = excluir_id {
            consulta = consulta.not_equal_to("objectId", id);
        }

        Ok(self.store.first(&consulta).await?.is_some())
    }

    /// Atualiza o preço inicial das lojas listadas, aplicando o valor do
    /// estado de cada uma. Loja de outra marca é pulada em silêncio; valor
    /// zerado não sobrescreve o preço atual.
    pub async fn atualizar_precos_lojas(
        &self,
        marca_id: &str,
        lojas_ids: &[String],
        valor_pr: Decimal,
        valor_sp: Decimal,
    ) -> Result<u64, AppError> {
        let mut atualizadas = 0u64;

        for id in lojas_ids {
            let mut documento = self.store.get(COLECAO_LOJAS, id).await?;

            // Nunca mexe em loja que pertence a outra marca.
            if documento.get_str("marca_id") != Some(marca_id) {
                continue;
            }

            let novo_valor = match documento.get_str("estado") {
                Some("PR") if valor_pr > Decimal::ZERO => valor_pr,
                Some("SP") if valor_sp > Decimal::ZERO => valor_sp,
                _ => continue,
            };

            documento.set_decimal("preco_inicial", novo_valor);
            self.store.save(COLECAO_LOJAS, documento).await?;
            atualizadas += 1;
        }

        Ok(atualizadas)
    }

    /// Propaga os valores padrão da marca para todas as suas lojas. Toda
    /// loja é regravada e contada; uma loja com estado fora de PR/SP passa
    /// sem alteração de preço, comportamento a rever se um terceiro estado
    /// entrar no domínio.
    pub async fn aplicar_valores_padrao(
        &self,
        marca_id: &str,
        valor_pr: Decimal,
        valor_sp: Decimal,
    ) -> Result<u64, AppError> {
        let consulta = Consulta::nova(COLECAO_LOJAS).equal_to("marca_id", marca_id);
        let documentos = self.store.find(&consulta).await?;

        let mut atualizadas = 0u64;
        for mut documento in documentos {
            match documento.get_str("estado") {
                Some("PR") => documento.set_decimal("preco_inicial", valor_pr),
                Some("SP") => documento.set_decimal("preco_inicial", valor_sp),
                _ => {}
            }

            self.store.save(COLECAO_LOJAS, documento).await?;
            atualizadas += 1;
        }

        Ok(atualizadas)
    }
}

/// Traduz o documento remoto para a struct tipada. Estado ou popup fora do
/// domínio é erro, nunca um padrão silencioso.
pub(crate) fn loja_de_documento(documento: &Documento) -> Result<Loja, AppError> {
    let id = documento
        .id
        .clone()
        .ok_or_else(|| campo_ausente("objectId"))?;

    let estado = documento
        .get_str("estado")
        .ok_or_else(|| campo_ausente("estado"))?;
    let estado = Estado::parse(estado).ok_or_else(|| {
        AppError::DadosInvalidos(format!("loja com estado fora do domínio: '{estado}'"))
    })?;

    let popup_tipo = match documento.get_str("popup_tipo") {
        None => None,
        Some(valor) => Some(PopupTipo::parse(valor).ok_or_else(|| {
            AppError::DadosInvalidos(format!("loja com popup fora do domínio: '{valor}'"))
        })?),
    };

    Ok(Loja {
        id,
        slug: documento
            .get_str("slug")
            .ok_or_else(|| campo_ausente("slug"))?
            .to_string(),
        cidade: documento
            .get_str("cidade")
            .ok_or_else(|| campo_ausente("cidade"))?
            .to_string(),
        estado,
        telefone: documento
            .get_str("telefone")
            .ok_or_else(|| campo_ausente("telefone"))?
            .to_string(),
        preco_inicial: documento.get_decimal("preco_inicial").unwrap_or_default(),
        marca_id: documento
            .get_str("marca_id")
            .ok_or_else(|| campo_ausente("marca_id"))?
            .to_string(),
        link_whatsapp: documento.get_str("link_whatsapp").map(str::to_string),
        link_maps: documento.get_str("link_maps").map(str::to_string),
        popup_tipo,
        meta_title: documento.get_str("meta_title").map(str::to_string),
        meta_description: documento.get_str("meta_description").map(str::to_string),
        ativa: documento.get_bool("ativa").unwrap_or(true),
        imagem_produto: documento.get_arquivo("imagem_produto"),
        imagem_loja: documento.get_arquivo("imagem_loja"),
        created_at: documento.created_at.ok_or_else(|| campo_ausente("createdAt"))?,
        updated_at: documento.updated_at.ok_or_else(|| campo_ausente("updatedAt"))?,
    })
}

fn campo_ausente(campo: &str) -> AppError {
    AppError::DadosInvalidos(format!("loja sem o campo '{campo}'"))
}
