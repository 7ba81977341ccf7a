/// Markov Generate — produce text from a saved chain or straight from a corpus.
///
/// Usage:
///   markov_generate --chain <chain.ron> [--max-words <n>] [--seed <n>] [--unbounded]
///   markov_generate --corpus <file.txt>... [--prefix-len <n>] [--strip-tags]
use anyhow::{bail, Context, Result};
use clap::Parser;
use markov_press::core::chain::{load_chain, Chain};
use markov_press::core::config::EngineConfig;
use markov_press::core::generator::generate;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "markov_generate", about = "Generate text from a Markov chain")]
struct Args {
    /// Trained chain (RON) produced by corpus_trainer.
    #[arg(long, conflicts_with = "corpus")]
    chain: Option<PathBuf>,

    /// Text files to train on before generating, one unit each.
    #[arg(long, num_args = 1..)]
    corpus: Vec<PathBuf>,

    /// RON engine config; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Words per prefix key when training from --corpus.
    #[arg(long)]
    prefix_len: Option<usize>,

    /// Upper bound on generated words.
    #[arg(long, short = 'n')]
    max_words: Option<usize>,

    /// End-of-unit marker token.
    #[arg(long)]
    end_marker: Option<String>,

    /// Token appended when the word budget cuts generation off.
    #[arg(long)]
    truncation_marker: Option<String>,

    /// Ignore unit boundaries and walk from the start of the corpus.
    #[arg(long)]
    unbounded: bool,

    /// Replace `<...>` markup with spaces when training from --corpus.
    #[arg(long)]
    strip_tags: bool,

    /// RNG seed; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of passages to generate.
    #[arg(long, default_value_t = 1)]
    count: usize,
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
    if let Some(max_words) = args.max_words {
        config.max_words = max_words;
    }
    if let Some(marker) = &args.end_marker {
        config.end_marker = marker.clone();
    }
    if let Some(marker) = &args.truncation_marker {
        config.truncation_marker = marker.clone();
    }
    if args.unbounded {
        config.single_unit = false;
    }
    config.validate()?;

    let chain = load(&args, &config)?;
    let options = config.generate_options();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    for _ in 0..args.count {
        let passage = generate(&chain, &options, &mut rng)?;
        tracing::info!(words = passage.word_count(), stop = ?passage.stop, "generated");
        println!("{passage}");
    }
    Ok(())
}

fn load(args: &Args, config: &EngineConfig) -> Result<Chain> {
    if let Some(path) = &args.chain {
        return load_chain(path).with_context(|| format!("loading chain '{}'", path.display()));
    }
    if args.corpus.is_empty() {
        bail!("either --chain or --corpus is required");
    }

    let mut units = Vec::with_capacity(args.corpus.len());
    for path in &args.corpus {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading corpus '{}'", path.display()))?;
        units.push(if args.strip_tags {
            markov_press::core::corpus::strip_tags(&text)
        } else {
            text
        });
    }
    let mut chain = Chain::new(config.prefix_len)?;
    chain.build_units(&units, &config.end_marker);
    Ok(chain)
}

fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
