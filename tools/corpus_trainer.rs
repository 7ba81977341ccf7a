/// Corpus Trainer — builds a Markov chain from text files and saves it as RON.
///
/// Usage: corpus_trainer [--prefix-len <n>] [--strip-tags] [--no-units] --output <chain.ron> [FILE]...
///
/// Each input file is one logical unit and is followed by the end-of-unit
/// marker. With no files, stdin is read as a single unit.
use anyhow::{Context, Result};
use clap::Parser;
use markov_press::core::chain::{save_chain, Chain};
use markov_press::core::config::EngineConfig;
use markov_press::core::corpus::{strip_tags, CorpusBuilder};
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "corpus_trainer", about = "Train a Markov chain from text corpora")]
struct Args {
    /// Text files to ingest, one unit each. Reads stdin when empty.
    inputs: Vec<PathBuf>,

    /// Where to write the trained chain.
    #[arg(long, short)]
    output: PathBuf,

    /// RON engine config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Words per prefix key.
    #[arg(long)]
    prefix_len: Option<usize>,

    /// End-of-unit marker token.
    #[arg(long)]
    end_marker: Option<String>,

    /// Replace `<...>` markup with spaces before ingesting.
    #[arg(long)]
    strip_tags: bool,

    /// Ingest the inputs as one continuous text without unit markers.
    #[arg(long)]
    no_units: bool,
}

fn main() -> Result<()> {
    setup_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load_from_ron(path)
            .with_context(|| format!("loading config '{}'", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(prefix_len) = args.prefix_len {
        config.prefix_len = prefix_len;
    }
    if let Some(marker) = args.end_marker {
        config.end_marker = marker;
    }
    config.validate()?;

    let mut units = Vec::new();
    if args.inputs.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("reading stdin")?;
        units.push(text);
    } else {
        for path in &args.inputs {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading input '{}'", path.display()))?;
            units.push(text);
        }
    }

    let mut corpus = CorpusBuilder::new(config.end_marker.clone()).strip_tags(args.strip_tags);
    corpus.extend(&units);
    let text = if args.no_units {
        let joined = units.join("\n");
        if args.strip_tags {
            strip_tags(&joined)
        } else {
            joined
        }
    } else {
        corpus.render()
    };

    println!(
        "Training chain with prefix length {} from {} unit(s)...",
        config.prefix_len,
        corpus.len()
    );
    let mut chain = Chain::new(config.prefix_len)?;
    let tokens = chain.build(text.as_bytes());
    println!(
        "Chain trained: {} tokens, {} unique prefixes, {} transitions",
        tokens,
        chain.len(),
        chain.transition_count()
    );

    save_chain(&chain, &args.output)
        .with_context(|| format!("saving chain to '{}'", args.output.display()))?;
    println!("Chain saved to '{}'", args.output.display());
    Ok(())
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
