// src/models/sessao.rs

use serde::{Deserialize, Serialize};

/// Sessão do operador autenticado no painel. A autenticação acontece
/// fora daqui; os serviços recebem a sessão explicitamente e a usam
/// para atribuir as mutações nos logs de auditoria.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sessao {
    pub usuario_id: String,
    pub email: String,
}

impl Sessao {
    pub fn nova(usuario_id: impl Into<String>, email: impl Into<String>) -> Self {
        Sessao {
            usuario_id: usuario_id.into(),
            email: email.into(),
        }
    }
}
