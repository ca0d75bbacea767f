pub mod analysis_client;
pub mod chunk_decoder;
pub mod input_provider;
pub mod session_delegate;
