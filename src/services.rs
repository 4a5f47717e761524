pub mod importacao_service;
pub use importacao_service::ImportacaoService;
pub mod lojas_service;
pub use lojas_service::LojasService;
pub mod marcas_service;
pub use marcas_service::MarcasService;
pub mod precos_service;
pub use precos_service::PrecosService;
