// src/common/error.rs

use thiserror::Error;

use crate::db::store::StoreError;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante corresponde a uma falha que as páginas do painel
// sabem apresentar ao operador.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    Validacao(#[from] validator::ValidationErrors),

    #[error("Já existe um registro com o slug '{0}'")]
    SlugDuplicado(String),

    #[error("Registro não encontrado")]
    NaoEncontrado,

    #[error("Não é possível excluir a marca. Existem {0} loja(s) vinculada(s) a ela.")]
    PossuiDependentes(u64),

    #[error("Falha ao processar o arquivo CSV")]
    Csv(#[from] csv::Error),

    // Um documento veio do armazenamento remoto com um campo fora do
    // domínio (ex.: estado desconhecido). Nunca mascaramos isso como
    // um valor padrão.
    #[error("Documento remoto com dados inválidos: {0}")]
    DadosInvalidos(String),

    // Variante genérica para qualquer falha opaca do armazenamento
    // remoto (rede, autenticação do servidor etc.).
    #[error("Erro no armazenamento remoto")]
    Remoto(#[source] StoreError),
}

// `get(id)` ausente no remoto é um `NaoEncontrado` do domínio; o resto
// permanece opaco.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NaoEncontrado => AppError::NaoEncontrado,
            outro => AppError::Remoto(outro),
        }
    }
}
