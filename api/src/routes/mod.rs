pub mod create_embeddings;
pub mod health_check;
pub mod recommendations;
