// src/db/memoria.rs

//! Implementação em memória do contrato `DocumentStore`.
//!
//! Serve de dublê nos testes de integração e de referência executável da
//! semântica esperada do serviço remoto (filtros, ordenação, carimbos,
//! upsert por id). Não persiste nada entre execuções e descarta os bytes
//! de arquivos, guardando apenas a referência gerada.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::store::{
    ArquivoRemoto, Consulta, DocumentStore, Documento, Ordenacao, StoreError,
};

#[derive(Default)]
pub struct MemoriaStore {
    colecoes: RwLock<HashMap<String, Vec<Documento>>>,
}

impl MemoriaStore {
    pub fn novo() -> Self {
        Self::default()
    }
}

/// Valor de um campo para fins de filtro, cobrindo o pseudocampo
/// `objectId` que o serviço remoto expõe nas consultas.
fn valor_para_filtro(documento: &Documento, campo: &str) -> Option<Value> {
    match campo {
        "objectId" => documento.id.clone().map(Value::String),
        "createdAt" => documento.created_at.map(|dt| Value::String(dt.to_rfc3339())),
        "updatedAt" => documento.updated_at.map(|dt| Value::String(dt.to_rfc3339())),
        _ => documento.get(campo).cloned(),
    }
}

fn atende_filtros(documento: &Documento, consulta: &Consulta) -> bool {
    let igual = consulta
        .igualdades()
        .iter()
        .all(|(campo, valor)| valor_para_filtro(documento, campo).as_ref() == Some(valor));

    let diferente = consulta
        .desigualdades()
        .iter()
        .all(|(campo, valor)| valor_para_filtro(documento, campo).as_ref() != Some(valor));

    igual && diferente
}

/// Ordena os índices dos documentos pelo campo pedido, com o índice de
/// inserção como desempate na direção da ordenação (dois documentos criados
/// no mesmo instante saem em ordem estável).
fn ordenar(indices: &mut [usize], documentos: &[Documento], ordenacao: &Ordenacao) {
    let (campo, descendente) = match ordenacao {
        Ordenacao::Ascendente(campo) => (campo.as_str(), false),
        Ordenacao::Descendente(campo) => (campo.as_str(), true),
    };

    indices.sort_by(|&a, &b| {
        let ordem = comparar_campo(&documentos[a], &documentos[b], campo).then(a.cmp(&b));
        if descendente { ordem.reverse() } else { ordem }
    });
}

fn comparar_campo(a: &Documento, b: &Documento, campo: &str) -> std::cmp::Ordering {
    use std::cmp::Ordering;

    match campo {
        "createdAt" => a.created_at.cmp(&b.created_at),
        "updatedAt" => a.updated_at.cmp(&b.updated_at),
        _ => match (a.get(campo), b.get(campo)) {
            (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
            (Some(Value::Number(x)), Some(Value::Number(y))) => x
                .as_f64()
                .partial_cmp(&y.as_f64())
                .unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            _ => Ordering::Equal,
        },
    }
}

fn aplicar_consulta(documentos: &[Documento], consulta: &Consulta) -> Vec<Documento> {
    let mut indices: Vec<usize> = documentos
        .iter()
        .enumerate()
        .filter(|(_, doc)| atende_filtros(doc, consulta))
        .map(|(indice, _)| indice)
        .collect();

    if let Some(ordenacao) = consulta.ordenacao() {
        ordenar(&mut indices, documentos, ordenacao);
    }

    if let Some(limite) = consulta.limite() {
        indices.truncate(limite);
    }

    indices
        .into_iter()
        .map(|indice| documentos[indice].clone())
        .collect()
}

#[async_trait]
impl DocumentStore for MemoriaStore {
    async fn find(&self, consulta: &Consulta) -> Result<Vec<Documento>, StoreError> {
        let colecoes = self.colecoes.read().await;
        let documentos = colecoes
            .get(consulta.colecao())
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(aplicar_consulta(documentos, consulta))
    }

    async fn first(&self, consulta: &Consulta) -> Result<Option<Documento>, StoreError> {
        Ok(self.find(consulta).await?.into_iter().next())
    }

    async fn count(&self, consulta: &Consulta) -> Result<u64, StoreError> {
        let colecoes = self.colecoes.read().await;
        let total = colecoes
            .get(consulta.colecao())
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter(|doc| atende_filtros(doc, consulta))
            .count();
        Ok(total as u64)
    }

    async fn get(&self, colecao: &str, id: &str) -> Result<Documento, StoreError> {
        let colecoes = self.colecoes.read().await;
        colecoes
            .get(colecao)
            .and_then(|documentos| {
                documentos
                    .iter()
                    .find(|doc| doc.id.as_deref() == Some(id))
                    .cloned()
            })
            .ok_or(StoreError::NaoEncontrado)
    }

    async fn save(&self, colecao: &str, mut documento: Documento) -> Result<Documento, StoreError> {
        let agora = Utc::now();
        let mut colecoes = self.colecoes.write().await;
        let documentos = colecoes.entry(colecao.to_string()).or_default();

        match documento.id.clone() {
            None => {
                documento.id = Some(Uuid::new_v4().to_string());
                documento.created_at = Some(agora);
                documento.updated_at = Some(agora);
                documentos.push(documento.clone());
                Ok(documento)
            }
            Some(id) => {
                let existente = documentos
                    .iter_mut()
                    .find(|doc| doc.id.as_deref() == Some(id.as_str()))
                    .ok_or(StoreError::NaoEncontrado)?;
                documento.created_at = existente.created_at;
                documento.updated_at = Some(agora);
                *existente = documento.clone();
                Ok(documento)
            }
        }
    }

    async fn destroy(&self, colecao: &str, id: &str) -> Result<(), StoreError> {
        let mut colecoes = self.colecoes.write().await;
        let documentos = colecoes.get_mut(colecao).ok_or(StoreError::NaoEncontrado)?;

        let antes = documentos.len();
        documentos.retain(|doc| doc.id.as_deref() != Some(id));
        if documentos.len() == antes {
            return Err(StoreError::NaoEncontrado);
        }
        Ok(())
    }

    async fn salvar_arquivo(&self, nome: &str, _dados: Vec<u8>) -> Result<ArquivoRemoto, StoreError> {
        Ok(ArquivoRemoto {
            nome: nome.to_string(),
            url: format!("memoria://arquivos/{}/{}", Uuid::new_v4(), nome),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(campos: &[(&str, &str)]) -> Documento {
        let mut documento = Documento::novo();
        for (campo, valor) in campos {
            documento.set(*campo, *valor);
        }
        documento
    }

    #[tokio::test]
    async fn save_cria_com_id_e_carimbos() {
        let store = MemoriaStore::novo();

        let salvo = store.save("Lojas", doc(&[("slug", "centro")])).await.unwrap();

        assert!(salvo.id.is_some());
        assert!(salvo.created_at.is_some());
        assert_eq!(salvo.created_at, salvo.updated_at);
    }

    #[tokio::test]
    async fn save_atualiza_preservando_criacao() {
        let store = MemoriaStore::novo();

        let criado = store.save("Lojas", doc(&[("slug", "centro")])).await.unwrap();
        let mut editado = criado.clone();
        editado.set("slug", "norte");

        let atualizado = store.save("Lojas", editado).await.unwrap();

        assert_eq!(atualizado.id, criado.id);
        assert_eq!(atualizado.created_at, criado.created_at);
        assert!(atualizado.updated_at >= criado.updated_at);
        assert_eq!(atualizado.get_str("slug"), Some("norte"));
    }

    #[tokio::test]
    async fn save_com_id_desconhecido_erra() {
        let store = MemoriaStore::novo();

        let mut fantasma = doc(&[("slug", "x")]);
        fantasma.id = Some("nao-existe".to_string());

        let erro = store.save("Lojas", fantasma).await.unwrap_err();
        assert!(matches!(erro, StoreError::NaoEncontrado));
    }

    #[tokio::test]
    async fn find_filtra_por_igualdade_e_desigualdade() {
        let store = MemoriaStore::novo();

        let a = store
            .save("Lojas", doc(&[("slug", "a"), ("estado", "PR")]))
            .await
            .unwrap();
        store
            .save("Lojas", doc(&[("slug", "b"), ("estado", "SP")]))
            .await
            .unwrap();

        let consulta = Consulta::nova("Lojas")
            .equal_to("estado", "PR")
            .not_equal_to("objectId", "outro-id");
        let encontrados = store.find(&consulta).await.unwrap();

        assert_eq!(encontrados.len(), 1);
        assert_eq!(encontrados[0].id, a.id);

        let excluindo_a = Consulta::nova("Lojas")
            .equal_to("estado", "PR")
            .not_equal_to("objectId", a.id.clone().unwrap());
        assert!(store.find(&excluindo_a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn find_ordena_descendente_por_criacao_com_limite() {
        let store = MemoriaStore::novo();

        store.save("Lojas", doc(&[("slug", "primeira")])).await.unwrap();
        store.save("Lojas", doc(&[("slug", "segunda")])).await.unwrap();
        store.save("Lojas", doc(&[("slug", "terceira")])).await.unwrap();

        let consulta = Consulta::nova("Lojas").descending("createdAt").limit(2);
        let pagina = store.find(&consulta).await.unwrap();

        assert_eq!(pagina.len(), 2);
        assert_eq!(pagina[0].get_str("slug"), Some("terceira"));
        assert_eq!(pagina[1].get_str("slug"), Some("segunda"));
    }

    #[tokio::test]
    async fn get_e_destroy_sinalizam_ausencia() {
        let store = MemoriaStore::novo();

        let salvo = store.save("Marcas", doc(&[("nome", "Moura")])).await.unwrap();
        let id = salvo.id.clone().unwrap();

        assert!(store.get("Marcas", &id).await.is_ok());
        store.destroy("Marcas", &id).await.unwrap();
        assert!(matches!(
            store.get("Marcas", &id).await.unwrap_err(),
            StoreError::NaoEncontrado
        ));
        assert!(matches!(
            store.destroy("Marcas", &id).await.unwrap_err(),
            StoreError::NaoEncontrado
        ));
    }

    #[tokio::test]
    async fn contagem_respeita_filtros() {
        let store = MemoriaStore::novo();

        store
            .save("Lojas", doc(&[("marca_id", "m1"), ("slug", "a")]))
            .await
            .unwrap();
        store
            .save("Lojas", doc(&[("marca_id", "m1"), ("slug", "b")]))
            .await
            .unwrap();
        store
            .save("Lojas", doc(&[("marca_id", "m2"), ("slug", "c")]))
            .await
            .unwrap();

        let consulta = Consulta::nova("Lojas").equal_to("marca_id", "m1");
        assert_eq!(store.count(&consulta).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn salvar_arquivo_devolve_referencia_com_url() {
        let store = MemoriaStore::novo();

        let arquivo = store
            .salvar_arquivo("logo_moura.jpg", vec![1, 2, 3])
            .await
            .unwrap();

        assert_eq!(arquivo.nome, "logo_moura.jpg");
        assert!(arquivo.url.starts_with("memoria://arquivos/"));
        assert!(arquivo.url.ends_with("/logo_moura.jpg"));
    }
}
