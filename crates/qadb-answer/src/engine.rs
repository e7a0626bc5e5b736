use tracing::{debug, info, warn};

use qadb_core::config::{Config, ResolverSettings, TokenizerSettings};
use qadb_core::error::{Error, Result};
use qadb_core::traits::Generator;
use qadb_core::types::{Confidence, CorpusEntry, Neighbor, Reply, Resolution};
use qadb_text::TfidfVectorizer;
use qadb_vector::{is_zero_vector, FlatIndex};

/// Immutable question-answering context: corpus, fitted vectorizer and index.
///
/// Built once and only read afterwards; every method takes `&self`, so one
/// engine can serve any number of threads. A changed corpus means a new engine.
pub struct QaEngine {
    entries: Vec<CorpusEntry>,
    vectorizer: TfidfVectorizer,
    index: FlatIndex,
    tokenizer: TokenizerSettings,
    resolver: ResolverSettings,
}

impl QaEngine {
    pub fn build(entries: Vec<CorpusEntry>, tokenizer: &TokenizerSettings, resolver: ResolverSettings) -> Result<Self> {
        tokenizer.validate()?;
        resolver.validate()?;
        let questions: Vec<&str> = entries.iter().map(|e| e.question.as_str()).collect();
        let (vectorizer, matrix) = TfidfVectorizer::fit(&questions, tokenizer)?;
        let index = FlatIndex::build(&matrix)?;
        info!(entries = entries.len(), vocabulary = vectorizer.dim(), max_distance = ?resolver.max_distance, "question index ready");
        Ok(Self { entries, vectorizer, index, tokenizer: tokenizer.clone(), resolver })
    }

    pub fn from_config(config: &Config, entries: Vec<CorpusEntry>) -> Result<Self> {
        Self::build(entries, &config.tokenizer()?, config.resolver()?)
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Vocabulary size; the length of every stored and query vector.
    pub fn dimension(&self) -> usize { self.vectorizer.dim() }

    pub fn entries(&self) -> &[CorpusEntry] { &self.entries }

    pub fn entry(&self, position: usize) -> Option<&CorpusEntry> { self.entries.get(position) }

    pub fn vectorizer(&self) -> &TfidfVectorizer { &self.vectorizer }

    pub fn index(&self) -> &FlatIndex { &self.index }

    pub fn tokenizer_settings(&self) -> &TokenizerSettings { &self.tokenizer }

    pub fn resolver_settings(&self) -> &ResolverSettings { &self.resolver }

    /// Answer of the corpus question nearest to `query`.
    ///
    /// Always yields an entry; check [`Resolution::confidence`] before
    /// presenting it as a real match.
    pub fn resolve(&self, query: &str) -> Result<Resolution> {
        self.resolve_top(query, 1)?.into_iter().next().ok_or(Error::EmptyIndex)
    }

    /// Up to `k` resolutions, nearest first.
    pub fn resolve_top(&self, query: &str, k: usize) -> Result<Vec<Resolution>> {
        let query_vec = self.vectorizer.transform(query);
        let recognized = !is_zero_vector(&query_vec);
        if !recognized { warn!(query, "query has no term in the vocabulary; answer is a best-effort pick"); }
        let hits = self.index.search(&query_vec, k)?;
        let resolutions = hits.into_iter().map(|hit| self.to_resolution(hit, recognized)).collect::<Result<Vec<_>>>()?;
        if let Some(best) = resolutions.first() {
            debug!(query, position = best.position, distance = best.distance, confidence = ?best.confidence, "resolved query");
        }
        Ok(resolutions)
    }

    /// Resolves `query` and hands it to `generator`, passing the retrieved
    /// answer as a hint only when the match is confident.
    pub fn answer_with<G: Generator + ?Sized>(&self, generator: &G, query: &str) -> Result<Reply> {
        let resolution = self.resolve(query)?;
        let hint = resolution.is_confident().then_some(resolution.answer.as_str());
        let text = generator.generate(query, hint).map_err(|e| {
            warn!(query, error = %e, "generator failed");
            Error::GenerationFailed(format!("{e:#}"))
        })?;
        Ok(Reply { text, resolution })
    }

    fn to_resolution(&self, hit: Neighbor, recognized: bool) -> Result<Resolution> {
        let entry = self.entries.get(hit.position).ok_or_else(|| Error::NotFound(format!("corpus position {}", hit.position)))?;
        let confidence = match self.resolver.max_distance {
            _ if !recognized => Confidence::NoRecognizedTerms,
            Some(max) if hit.distance > max => Confidence::BeyondThreshold,
            _ => Confidence::Match,
        };
        if confidence == Confidence::BeyondThreshold { warn!(position = hit.position, distance = hit.distance, "nearest question beyond max_distance"); }
        Ok(Resolution {
            position: hit.position,
            question: entry.question.clone(),
            answer: entry.answer.clone(),
            distance: hit.distance,
            confidence,
        })
    }
}
