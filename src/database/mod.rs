pub mod document_store;
pub mod local_storage;
pub mod pool;
