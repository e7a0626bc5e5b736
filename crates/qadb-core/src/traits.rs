/// External natural-language generator.
///
/// Receives the user's query and, when retrieval found a confident match, the
/// retrieved answer as a hint. Output is opaque text and is never parsed.
pub trait Generator: Send + Sync {
    fn generate(&self, query: &str, hint: Option<&str>) -> anyhow::Result<String>;
}
