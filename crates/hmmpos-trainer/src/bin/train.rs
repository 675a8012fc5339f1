use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use hmmpos_trainer::{
    CorpusFormat, DEFAULT_TRAIN_SIZE, TrainingConfig, default_model_path, evaluate, train_or_load,
};
use tracing_subscriber::EnvFilter;

/// Train an HMM tagger from a tagged corpus and store it.
#[derive(Parser)]
#[command(name = "train")]
#[command(version)]
struct Args {
    /// Tagged corpus file
    corpus: PathBuf,

    /// Corpus format (detected from the extension when omitted)
    #[arg(short, long, value_enum)]
    format: Option<CorpusFormat>,

    /// Output model path
    #[arg(short, long, env = "HMMPOS_MODEL")]
    model: Option<PathBuf>,

    /// Number of training sentences
    #[arg(short = 'n', long, default_value_t = DEFAULT_TRAIN_SIZE)]
    train_size: usize,

    /// Shuffle the corpus with this seed before splitting
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Training failed: {e:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = TrainingConfig::new()
        .with_corpus(args.corpus)
        .with_format(args.format)
        .with_train_size(args.train_size)
        .with_retrain(true)
        .with_shuffle_seed(args.seed)
        .with_model_path(args.model.unwrap_or_else(default_model_path));

    let outcome = train_or_load(&config)?;
    let model = outcome.model();
    println!(
        "Model saved to {} ({} tags, {} words)",
        config.model_path.display(),
        model.num_tags(),
        model.vocab_size()
    );
    if !outcome.held_out().is_empty() {
        println!("{}", evaluate(model, outcome.held_out())?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hmmpos_core::ModelStore;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["train", "wsj.pos", "-n", "500", "--seed", "9"]).unwrap();
        assert_eq!(args.corpus, PathBuf::from("wsj.pos"));
        assert_eq!(args.train_size, 500);
        assert_eq!(args.seed, Some(9));
        assert!(args.format.is_none());
    }

    #[test]
    fn test_run_always_retrains() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = dir.path().join("toy.pos");
        let model_path = dir.path().join("hmm.json");
        let args = |corpus: &std::path::Path| Args {
            corpus: corpus.to_path_buf(),
            format: None,
            model: Some(model_path.clone()),
            train_size: 1,
            seed: None,
        };

        std::fs::write(&corpus, "fish/NN\nfish/NN\n").unwrap();
        run(args(&corpus)).unwrap();
        let first = ModelStore::new(&model_path).load().unwrap();
        assert_eq!(first.tag(&["fish"]).unwrap()[0].tag, "NN");

        std::fs::write(&corpus, "fish/VB\n").unwrap();
        run(args(&corpus)).unwrap();
        let second = ModelStore::new(&model_path).load().unwrap();
        assert_eq!(second.tag(&["fish"]).unwrap()[0].tag, "VB");
    }
}
