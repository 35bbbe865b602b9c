// Job matching: chunking, lexical ranking, prompt assembly, and the match pipeline.
// All generation calls go through llm_client::GenerationBackend.

pub mod chunker;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
pub mod ranker;
