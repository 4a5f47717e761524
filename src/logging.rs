// src/logging.rs

use tracing_subscriber::EnvFilter;

/// Inicializa o logger do painel. Pode ser chamada mais de uma vez (os
/// testes fazem isso); apenas a primeira chamada vence.
pub fn iniciar() {
    let filtro = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filtro)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}
