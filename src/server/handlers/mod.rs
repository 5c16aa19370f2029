pub mod embed;
pub mod health;
pub mod rag;
