pub mod chat_stream;
pub mod entries;
pub mod health;
pub mod importer;
pub mod memories;
pub mod relationships;
pub mod search;
