//! hmmpos command-line tagger
//!
//! Trains (or reuses) an HMM part-of-speech model and tags sentences given on
//! the command line or read from stdin.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use hmmpos_core::{EstimatorConfig, HmmError, HmmModel, ModelStore, PosTagger, TaggedWord};
use hmmpos_trainer::{
    CorpusFormat, DEFAULT_TRAIN_SIZE, Evaluation, TrainingConfig, TrainingOutcome, default_model_path,
    evaluate, load_corpus, train_or_load,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "hmmpos")]
#[command(about = "Part-of-speech tagging with a Hidden Markov Model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Model file
    #[arg(short, long, env = "HMMPOS_MODEL", global = true)]
    model: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a model, or reuse the stored one
    Train {
        /// Tagged training corpus
        #[arg(short, long, env = "HMMPOS_CORPUS")]
        corpus: PathBuf,

        /// Corpus format (detected from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<CorpusFormat>,

        /// Number of training sentences
        #[arg(short = 'n', long, default_value_t = DEFAULT_TRAIN_SIZE)]
        train_size: usize,

        /// Retrain even if a stored model exists
        #[arg(short, long)]
        retrain: bool,

        /// Shuffle the corpus with this seed before splitting
        #[arg(long)]
        seed: Option<u64>,

        /// Lidstone smoothing constant
        #[arg(long, default_value_t = hmmpos_core::hmm::estimator::DEFAULT_SMOOTHING)]
        smoothing: f64,

        /// Fold words seen fewer times than this into the unknown-word class
        #[arg(long, default_value_t = 1)]
        unk_threshold: usize,
    },
    /// Tag sentences (arguments, or one per stdin line)
    Tag {
        /// Sentences to tag
        sentences: Vec<String>,

        /// Print one JSON object per sentence
        #[arg(long)]
        json: bool,

        /// Corpus to train from when no model is stored
        #[arg(short, long, env = "HMMPOS_CORPUS")]
        corpus: Option<PathBuf>,
    },
    /// Score the stored model against a gold corpus
    Evaluate {
        /// Tagged gold corpus
        #[arg(short, long, env = "HMMPOS_CORPUS")]
        corpus: PathBuf,

        /// Corpus format (detected from the extension when omitted)
        #[arg(short, long, value_enum)]
        format: Option<CorpusFormat>,
    },
    /// Show information about the stored model
    Info,
}

#[derive(Serialize)]
struct JsonToken<'a> {
    word: &'a str,
    tag: &'a str,
    label: &'a str,
}

#[derive(Serialize)]
struct JsonSentence<'a> {
    input: &'a str,
    tokens: Vec<JsonToken<'a>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let model_path = cli.model.unwrap_or_else(default_model_path);
    debug!(path = %model_path.display(), "model location");

    match cli.command {
        Commands::Train {
            corpus,
            format,
            train_size,
            retrain,
            seed,
            smoothing,
            unk_threshold,
        } => {
            let config = TrainingConfig::new()
                .with_corpus(corpus)
                .with_format(format)
                .with_train_size(train_size)
                .with_retrain(retrain)
                .with_shuffle_seed(seed)
                .with_model_path(&model_path)
                .with_estimator(
                    EstimatorConfig::new()
                        .with_emission_smoothing(smoothing)
                        .with_transition_smoothing(smoothing)
                        .with_unknown_word_threshold(unk_threshold),
                );
            run_train(&config).map(|_| ())
        }
        Commands::Tag {
            sentences,
            json,
            corpus,
        } => {
            let model = load_or_train(&model_path, corpus)?;
            run_tag(model, &sentences, json)
        }
        Commands::Evaluate { corpus, format } => {
            println!("{}", run_evaluate(&model_path, &corpus, format)?);
            Ok(())
        }
        Commands::Info => run_info(&model_path),
    }
}

fn run_train(config: &TrainingConfig) -> Result<TrainingOutcome> {
    let outcome = train_or_load(config)?;
    let model = outcome.model();
    match &outcome {
        TrainingOutcome::Loaded(_) => println!(
            "Using stored model at {} (pass --retrain to train again)",
            config.model_path.display()
        ),
        TrainingOutcome::Trained { .. } => println!(
            "Trained model saved to {}",
            config.model_path.display()
        ),
    }
    println!(
        "{} tags, {} known words",
        model.num_tags(),
        model.vocab_size()
    );

    if !outcome.held_out().is_empty() {
        info!(sentences = outcome.held_out().len(), "evaluating on held-out sentences");
        println!("{}", evaluate(model, outcome.held_out())?);
    }
    Ok(outcome)
}

fn run_evaluate(model_path: &Path, corpus: &Path, format: Option<CorpusFormat>) -> Result<Evaluation> {
    let model = load_model(model_path)?;
    let gold = load_corpus(corpus, format)?;
    Ok(evaluate(&model, &gold)?)
}

fn load_model(path: &Path) -> Result<HmmModel> {
    ModelStore::new(path).load().with_context(|| {
        format!(
            "failed to load model from {} (run `hmmpos train` first)",
            path.display()
        )
    })
}

fn load_or_train(path: &Path, corpus: Option<PathBuf>) -> Result<HmmModel> {
    match corpus {
        Some(corpus) => {
            let config = TrainingConfig::new()
                .with_corpus(corpus)
                .with_model_path(path);
            Ok(train_or_load(&config)?.into_model())
        }
        None => load_model(path),
    }
}

fn run_tag(model: HmmModel, sentences: &[String], json: bool) -> Result<()> {
    let tagger = PosTagger::new(model)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut tag_one = |input: &str| -> Result<()> {
        let tagged = match tagger.tag_text(input) {
            Ok(tagged) => tagged,
            Err(HmmError::InvalidInput(_)) => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        if json {
            serde_json::to_writer(&mut out, &json_sentence(&tagger, input, &tagged))?;
            writeln!(out)?;
        } else {
            writeln!(out, "{}\n", tagger.describe(&tagged))?;
        }
        Ok(())
    };

    if sentences.is_empty() {
        for line in io::stdin().lock().lines() {
            tag_one(&line.context("failed to read stdin")?)?;
        }
    } else {
        for sentence in sentences {
            tag_one(sentence)?;
        }
    }
    Ok(())
}

fn json_sentence<'a>(
    tagger: &'a PosTagger,
    input: &'a str,
    tagged: &'a [TaggedWord],
) -> JsonSentence<'a> {
    JsonSentence {
        input,
        tokens: tagged
            .iter()
            .map(|t| JsonToken {
                word: &t.word,
                tag: &t.tag,
                label: tagger.labels().expand(&t.tag),
            })
            .collect(),
    }
}

fn run_info(path: &Path) -> Result<()> {
    if !ModelStore::new(path).exists() {
        bail!("no model at {}", path.display());
    }
    let model = load_model(path)?;
    let tags: Vec<&str> = model.tagset().iter().collect();

    println!("Model:      {}", path.display());
    println!("Tags:       {}", model.num_tags());
    println!("Vocabulary: {} words", model.vocab_size());
    println!("Tagset:     {}", tags.join(" "));
    Ok(())
}
