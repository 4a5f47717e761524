pub mod store;
pub use store::{ArquivoRemoto, Consulta, DocumentStore, Documento, Ordenacao, StoreError};
pub mod memoria;
pub use memoria::MemoriaStore;
pub mod marcas_repo;
pub use marcas_repo::MarcasRepository;
pub mod lojas_repo;
pub use lojas_repo::LojasRepository;
pub mod precos_repo;
pub use precos_repo::PrecosRepository;
