//! TF-IDF vectorizer over a fixed set of corpus questions.
//!
//! `fit` is the only constructor, so a vectorizer always carries a frozen
//! vocabulary and `transform` can never grow or reweight it.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::debug;

use qadb_core::config::TokenizerSettings;
use qadb_core::error::{Error, Result};

use crate::tantivy_utils::Analyzer;

/// Distinct corpus terms, their column positions and idf weights.
///
/// Columns follow lexicographic term order so refitting the same corpus
/// reproduces the same space.
#[derive(Debug, Clone)]
pub struct Vocabulary {
	columns: HashMap<String, usize>,
	terms: Vec<String>,
	idf: Vec<f32>,
	doc_count: usize,
}

impl Vocabulary {
	fn from_document_frequencies(df: BTreeMap<String, usize>, doc_count: usize) -> Self {
		let n = doc_count as f64;
		let mut columns = HashMap::with_capacity(df.len());
		let mut terms = Vec::with_capacity(df.len());
		let mut idf = Vec::with_capacity(df.len());
		for (column, (term, freq)) in df.into_iter().enumerate() {
			// smoothed: a term present in every question still weighs 1.0
			idf.push((((1.0 + n) / (1.0 + freq as f64)).ln() + 1.0) as f32);
			columns.insert(term.clone(), column);
			terms.push(term);
		}
		Self { columns, terms, idf, doc_count }
	}

	pub fn len(&self) -> usize { self.terms.len() }

	pub fn is_empty(&self) -> bool { self.terms.is_empty() }

	/// Number of questions the vocabulary was fitted on.
	pub fn doc_count(&self) -> usize { self.doc_count }

	pub fn column(&self, term: &str) -> Option<usize> { self.columns.get(term).copied() }

	pub fn term(&self, column: usize) -> Option<&str> { self.terms.get(column).map(String::as_str) }

	pub fn idf(&self, column: usize) -> Option<f32> { self.idf.get(column).copied() }

	/// `(term, idf)` pairs in column order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
		self.terms.iter().map(String::as_str).zip(self.idf.iter().copied())
	}
}

#[derive(Clone)]
pub struct TfidfVectorizer {
	analyzer: Analyzer,
	vocabulary: Vocabulary,
}

impl TfidfVectorizer {
	/// Learns the vocabulary from `questions` and returns it with one
	/// L2-normalised row per question, in input order.
	pub fn fit<S: AsRef<str>>(questions: &[S], settings: &TokenizerSettings) -> Result<(Self, Vec<Vec<f32>>)> {
		if questions.is_empty() { return Err(Error::EmptyCorpus); }
		let analyzer = Analyzer::new(settings);
		let tokenized: Vec<Vec<String>> = questions.iter().map(|q| analyzer.tokens(q.as_ref())).collect();

		let mut df: BTreeMap<String, usize> = BTreeMap::new();
		for tokens in &tokenized {
			let distinct: BTreeSet<&String> = tokens.iter().collect();
			for term in distinct { *df.entry(term.clone()).or_insert(0) += 1; }
		}
		if df.is_empty() { return Err(Error::EmptyVocabulary); }

		let vocabulary = Vocabulary::from_document_frequencies(df, questions.len());
		debug!(questions = questions.len(), terms = vocabulary.len(), "fitted tf-idf vocabulary");
		let vectorizer = Self { analyzer, vocabulary };
		let matrix = tokenized.iter().map(|tokens| vectorizer.weigh(tokens)).collect();
		Ok((vectorizer, matrix))
	}

	/// Projects `text` into the fitted space. Unknown terms are ignored, so a
	/// text with no known term yields the zero vector.
	pub fn transform(&self, text: &str) -> Vec<f32> {
		self.weigh(&self.analyzer.tokens(text))
	}

	/// Known terms of `text`, in order of appearance.
	pub fn recognized_terms(&self, text: &str) -> Vec<String> {
		self.analyzer.tokens(text).into_iter().filter(|t| self.vocabulary.column(t).is_some()).collect()
	}

	pub fn dim(&self) -> usize { self.vocabulary.len() }

	pub fn vocabulary(&self) -> &Vocabulary { &self.vocabulary }

	fn weigh(&self, tokens: &[String]) -> Vec<f32> {
		let mut v = vec![0f32; self.vocabulary.len()];
		for token in tokens {
			if let Some(column) = self.vocabulary.column(token) { v[column] += 1.0; }
		}
		for (x, idf) in v.iter_mut().zip(&self.vocabulary.idf) { *x *= idf; }
		let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
		if norm > 0.0 { for x in &mut v { *x /= norm; } }
		v
	}
}
