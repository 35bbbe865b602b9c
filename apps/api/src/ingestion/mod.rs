// Resume ingestion: uploaded document → raw text → chunks.

pub mod extract;
pub mod handlers;
