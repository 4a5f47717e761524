// src/models.rs

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

pub mod loja;
pub mod marca;
pub mod preco;
pub mod sessao;

pub use loja::{DadosLoja, Estado, LinhaImportacao, Loja, PopupTipo};
pub use marca::{DadosMarca, Marca};
pub use preco::{Preco, PrecosDaMarca, PrecosMarca};
pub use sessao::Sessao;

/// Padrão compartilhado de slug: apenas letras minúsculas, números e hífen.
/// Vale globalmente para marcas e por marca para lojas.
pub static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("padrão de slug válido"));

/// Telefone no formato brasileiro exibido no painel: (XX) XXXXX-XXXX.
pub static TELEFONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{2}\) \d{4,5}-\d{4}$").expect("padrão de telefone válido"));

// ---
// Validação customizada compartilhada pelos payloads de formulário
// ---
pub fn validar_nao_negativo(valor: &Decimal) -> Result<(), ValidationError> {
    if valor.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}
