use std::sync::Mutex;

use qadb_answer::{QaEngine, SharedEngine};
use qadb_core::config::{ResolverSettings, TokenizerSettings};
use qadb_core::traits::Generator;
use qadb_core::{Confidence, CorpusEntry, Error};

const RESET_ANSWER: &str = "Use the app's 'Forgot password' link.";

fn bank_corpus() -> Vec<CorpusEntry> {
    vec![
        CorpusEntry::new("What are your branch hours?", "9am-5pm weekdays."),
        CorpusEntry::new("How do I reset my password?", RESET_ANSWER),
    ]
}

fn faq_corpus() -> Vec<CorpusEntry> {
    vec![
        CorpusEntry::new("How can I open a savings account?", "Visit any branch with your ID."),
        CorpusEntry::new("What documents are needed for a loan application?", "ID, payslips and bank statements."),
        CorpusEntry::new("How do I block a lost card?", "Call the 24/7 card hotline."),
        CorpusEntry::new("What is the interest rate on savings?", "2.5% per year."),
        CorpusEntry::new("Can I apply for a car loan online?", "Yes, through the credit simulator."),
    ]
}

fn engine(entries: Vec<CorpusEntry>) -> QaEngine {
    QaEngine::build(entries, &TokenizerSettings::default(), ResolverSettings::default()).expect("engine")
}

#[test]
fn resolves_password_question_by_shared_terms() {
    let engine = engine(bank_corpus());
    let resolution = engine.resolve("how to reset password").expect("resolve");
    assert_eq!(resolution.answer, RESET_ANSWER);
    assert_eq!(resolution.position, 1);
    assert_eq!(resolution.confidence, Confidence::Match);
    assert!(resolution.distance < 2.0);
}

#[test]
fn every_corpus_question_resolves_to_its_own_answer() {
    let engine = engine(faq_corpus());
    for (i, entry) in engine.entries().iter().enumerate() {
        let resolution = engine.resolve(&entry.question).expect("resolve");
        assert_eq!(resolution.position, i, "question {i} should find itself");
        assert_eq!(resolution.answer, entry.answer);
        assert_eq!(resolution.distance, 0.0);
    }
}

#[test]
fn repeated_queries_are_deterministic() {
    let engine = engine(faq_corpus());
    for q in ["loan", "savings interest", "lost card abroad", "completely unrelated"] {
        let first = engine.resolve(q).expect("resolve");
        for _ in 0..10 { assert_eq!(engine.resolve(q).expect("resolve"), first); }
    }
}

#[test]
fn case_variants_tie_and_lowest_position_wins() {
    let engine = engine(vec![
        CorpusEntry::new("lost card", "Call the hotline."),
        CorpusEntry::new("What are your opening hours?", "first"),
        CorpusEntry::new("WHAT ARE YOUR OPENING HOURS?", "second"),
    ]);
    let rows = (engine.index().vector(1).expect("row 1"), engine.index().vector(2).expect("row 2"));
    assert_eq!(rows.0, rows.1);
    for _ in 0..5 {
        let resolution = engine.resolve("opening hours").expect("resolve");
        assert_eq!(resolution.position, 1);
        assert_eq!(resolution.answer, "first");
    }
}

#[test]
fn query_without_known_terms_is_flagged_not_failed() {
    let engine = engine(bank_corpus());
    let resolution = engine.resolve("zzqzzqzzq_not_a_real_word").expect("zero query still resolves");
    assert_eq!(resolution.confidence, Confidence::NoRecognizedTerms);
    assert!(!resolution.is_confident());
    assert_eq!(resolution.position, 0, "equidistant from every row, so the first entry is picked");
    assert!((resolution.distance - 1.0).abs() < 1e-5);
}

#[test]
fn dimension_matches_vocabulary_everywhere() {
    let engine = engine(faq_corpus());
    assert_eq!(engine.dimension(), engine.vectorizer().vocabulary().len());
    assert_eq!(engine.index().dim(), engine.dimension());
    assert_eq!(engine.vectorizer().transform("anything at all").len(), engine.dimension());
    assert_eq!(engine.len(), 5);
}

#[test]
fn max_distance_marks_far_matches() {
    let resolver = ResolverSettings { max_distance: Some(0.0), ..ResolverSettings::default() };
    let engine = QaEngine::build(bank_corpus(), &TokenizerSettings::default(), resolver).expect("engine");

    let exact = engine.resolve("How do I reset my password?").expect("resolve");
    assert_eq!(exact.confidence, Confidence::Match);

    let loose = engine.resolve("reset password").expect("resolve");
    assert_eq!(loose.confidence, Confidence::BeyondThreshold);
    assert_eq!(loose.answer, RESET_ANSWER, "the nearest answer is still reported");
}

#[test]
fn resolve_top_ranks_and_caps() {
    let engine = engine(faq_corpus());
    let ranked = engine.resolve_top("savings account", 3).expect("resolve_top");
    assert_eq!(ranked.len(), 3);
    assert_eq!(ranked[0].position, 0);
    assert!(ranked.windows(2).all(|w| w[0].distance <= w[1].distance));
    assert_eq!(engine.resolve_top("savings", 50).expect("resolve_top").len(), 5);
    assert!(matches!(engine.resolve_top("savings", 0), Err(Error::InvalidArgument(_))));
}

#[test]
fn build_failures_are_fatal() {
    let err = QaEngine::build(Vec::new(), &TokenizerSettings::default(), ResolverSettings::default()).err().expect("empty corpus");
    assert!(matches!(err, Error::EmptyCorpus));
    assert!(err.is_fatal());

    let err = QaEngine::build(vec![CorpusEntry::new("?", "x")], &TokenizerSettings::default(), ResolverSettings::default()).err().expect("no terms");
    assert!(matches!(err, Error::EmptyVocabulary));

    let bad = TokenizerSettings { min_token_len: 0, ..TokenizerSettings::default() };
    let err = QaEngine::build(bank_corpus(), &bad, ResolverSettings::default()).err().expect("bad settings");
    assert!(matches!(err, Error::InvalidConfig(_)));
}

struct RecordingGenerator { hints: Mutex<Vec<Option<String>>> }

impl Generator for RecordingGenerator {
    fn generate(&self, query: &str, hint: Option<&str>) -> anyhow::Result<String> {
        self.hints.lock().unwrap().push(hint.map(str::to_string));
        Ok(format!("generated for '{query}'"))
    }
}

struct FailingGenerator;

impl Generator for FailingGenerator {
    fn generate(&self, _query: &str, _hint: Option<&str>) -> anyhow::Result<String> {
        Err(anyhow::anyhow!("upstream timed out"))
    }
}

#[test]
fn generator_receives_hint_only_for_confident_matches() {
    let engine = engine(bank_corpus());
    let generator = RecordingGenerator { hints: Mutex::new(Vec::new()) };

    let reply = engine.answer_with(&generator, "how to reset password").expect("reply");
    assert_eq!(reply.text, "generated for 'how to reset password'");
    assert_eq!(reply.resolution.answer, RESET_ANSWER);

    let reply = engine.answer_with(&generator, "qwertyuiop").expect("reply");
    assert_eq!(reply.resolution.confidence, Confidence::NoRecognizedTerms);

    let hints = generator.hints.lock().unwrap().clone();
    assert_eq!(hints, vec![Some(RESET_ANSWER.to_string()), None]);
}

#[test]
fn generator_gets_no_hint_beyond_max_distance() {
    let resolver = ResolverSettings { max_distance: Some(0.0), ..ResolverSettings::default() };
    let engine = QaEngine::build(bank_corpus(), &TokenizerSettings::default(), resolver).expect("engine");
    let generator = RecordingGenerator { hints: Mutex::new(Vec::new()) };

    let reply = engine.answer_with(&generator, "reset password").expect("reply");
    assert_eq!(reply.resolution.confidence, Confidence::BeyondThreshold);
    assert_eq!(reply.resolution.answer, RESET_ANSWER);

    let hints = generator.hints.lock().unwrap().clone();
    assert_eq!(hints, vec![None]);
}

#[test]
fn generator_failure_is_reported_distinctly() {
    let engine = engine(bank_corpus());
    let err = engine.answer_with(&FailingGenerator, "how to reset password").unwrap_err();
    match &err {
        Error::GenerationFailed(msg) => assert!(msg.contains("upstream timed out")),
        other => panic!("expected GenerationFailed, got {other:?}"),
    }
    assert!(!err.is_fatal());
}

#[test]
fn shared_engine_swaps_only_after_successful_rebuild() {
    let shared = SharedEngine::new(engine(bank_corpus()));
    let before = shared.current();

    assert!(matches!(shared.reload(Vec::new()), Err(Error::EmptyCorpus)));
    assert!(std::sync::Arc::ptr_eq(&before, &shared.current()), "failed reload keeps the serving engine");

    let fresh = shared.reload(faq_corpus()).expect("reload");
    assert_eq!(fresh.len(), 5);
    assert_eq!(shared.resolve("lost card").expect("resolve").answer, "Call the 24/7 card hotline.");
    // a snapshot taken before the reload still answers from the old corpus
    assert_eq!(before.resolve("how to reset password").expect("resolve").answer, RESET_ANSWER);

    let replaced = shared.swap(engine(bank_corpus()));
    assert_eq!(replaced.len(), 5);
    assert_eq!(shared.current().len(), 2);
}

#[test]
fn concurrent_readers_agree() {
    let shared = SharedEngine::new(engine(faq_corpus()));
    let expected = shared.resolve("car loan").expect("resolve");
    std::thread::scope(|s| {
        for _ in 0..8 {
            let shared = shared.clone();
            let expected = expected.clone();
            s.spawn(move || {
                for _ in 0..100 { assert_eq!(shared.resolve("car loan").expect("resolve"), expected); }
            });
        }
    });
}
