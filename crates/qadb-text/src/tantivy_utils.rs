use tantivy::tokenizer::{LowerCaser, SimpleTokenizer, StopWordFilter, TextAnalyzer, Token, TokenStream};

use qadb_core::config::TokenizerSettings;

/// Tantivy analyzer plus the character-length window applied to its output.
///
/// Splits on every non-alphanumeric character, lower-cases, drops configured
/// stop words, then keeps tokens whose length lies in `min_len..=max_len`.
#[derive(Clone)]
pub struct Analyzer {
	inner: TextAnalyzer,
	min_len: usize,
	max_len: usize,
}

impl Analyzer {
	pub fn new(settings: &TokenizerSettings) -> Self {
		let stop_words: Vec<String> = settings.stop_words.iter().map(|w| w.to_lowercase()).collect();
		let inner = TextAnalyzer::builder(SimpleTokenizer::default())
			.filter(LowerCaser)
			.filter(StopWordFilter::remove(stop_words))
			.build();
		Self { inner, min_len: settings.min_token_len, max_len: settings.max_token_len }
	}

	/// Tokens of `text` in order of appearance, repeats included.
	pub fn tokens(&self, text: &str) -> Vec<String> {
		// token_stream takes &mut self
		let mut analyzer = self.inner.clone();
		let mut stream = analyzer.token_stream(text);
		let (min_len, max_len) = (self.min_len, self.max_len);
		let mut tokens = Vec::new();
		stream.process(&mut |token: &Token| {
			let len = token.text.chars().count();
			if len >= min_len && len <= max_len { tokens.push(token.text.clone()); }
		});
		tokens
	}
}

impl Default for Analyzer {
	fn default() -> Self { Self::new(&TokenizerSettings::default()) }
}
