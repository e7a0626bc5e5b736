use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use qadb_answer::QaEngine;
use qadb_core::config::{resolve_with_base, Config};
use qadb_core::corpus::CorpusLoader;

#[derive(Parser)]
#[command(name = "qadb", about = "Answer questions from a fixed question/answer corpus")]
struct Cli {
    /// Corpus file or directory (overrides corpus.path)
    #[arg(short, long)]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a query to the answer of the nearest known question
    Ask {
        query: String,
        /// Number of ranked candidates to print
        #[arg(long, default_value_t = 1)]
        top: usize,
    },
    /// Verify that every corpus question resolves to its own answer
    Check,
    /// Print corpus and vocabulary statistics
    Stats {
        /// Number of highest and lowest idf terms to list
        #[arg(long, default_value_t = 10)]
        terms: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load().context("loading configuration")?;
    let corpus_path = match cli.corpus {
        Some(path) => path,
        None => resolve_with_base(&env::current_dir()?, config.corpus()?.path),
    };
    let entries = CorpusLoader::new()
        .load(&corpus_path)
        .with_context(|| format!("loading corpus from {}", corpus_path.display()))?;
    let engine = QaEngine::from_config(&config, entries).context("building question index")?;

    match cli.command {
        Commands::Ask { query, top } => ask(&engine, &query, top)?,
        Commands::Check => check(&engine)?,
        Commands::Stats { terms } => stats(&engine, terms),
    }
    Ok(())
}

fn ask(engine: &QaEngine, query: &str, top: usize) -> anyhow::Result<()> {
    let ranked = engine.resolve_top(query, top)?;
    let Some(best) = ranked.first() else { bail!("index returned no candidates") };
    if best.is_confident() {
        println!("{}", best.answer);
    } else {
        println!("{}", engine.resolver_settings().fallback_answer);
    }
    if top > 1 || !best.is_confident() {
        for (i, r) in ranked.iter().enumerate() {
            println!("  {}. distance={:.4}  confidence={:?}  question={}", i + 1, r.distance, r.confidence, r.question);
        }
    }
    Ok(())
}

fn check(engine: &QaEngine) -> anyhow::Result<()> {
    let index = engine.index();
    let (mut shadowed, mut failed) = (0usize, 0usize);
    for (i, entry) in engine.entries().iter().enumerate() {
        let resolution = engine.resolve(&entry.question)?;
        if resolution.position == i { continue; }
        if index.vector(resolution.position) == index.vector(i) {
            warn!(position = i, shadowed_by = resolution.position, question = %entry.question, "question vectorizes like an earlier one");
            shadowed += 1;
        } else {
            warn!(position = i, resolved_to = resolution.position, question = %entry.question, "question does not resolve to itself");
            failed += 1;
        }
    }
    info!(entries = engine.len(), shadowed, failed, "self-resolution check finished");
    println!("{} entries, {} shadowed by earlier duplicates, {} failed", engine.len(), shadowed, failed);
    if failed > 0 { bail!("{failed} corpus questions do not resolve to their own answer"); }
    Ok(())
}

fn stats(engine: &QaEngine, terms: usize) {
    let vocab = engine.vectorizer().vocabulary();
    println!("entries:    {}", engine.len());
    println!("vocabulary: {}", vocab.len());
    let mut weighted: Vec<(&str, f32)> = vocab.iter().collect();
    weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(b.0)));
    println!("\nmost specific terms:");
    for (term, idf) in weighted.iter().take(terms) { println!("  {idf:.4}  {term}"); }
    println!("\nmost common terms:");
    for (term, idf) in weighted.iter().rev().take(terms) { println!("  {idf:.4}  {term}"); }
}
