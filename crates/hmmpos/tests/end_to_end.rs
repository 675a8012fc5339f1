use std::fs;

use hmmpos::{HmmError, PosTagger, TrainingConfig, train_or_load};

#[test]
fn train_store_reload_and_tag() {
    let dir = tempfile::tempdir().unwrap();
    let corpus = dir.path().join("toy.pos");
    fs::write(
        &corpus,
        "The/DT dog/NN runs/VBZ ./.\nA/DT cat/NN sleeps/VBZ ./.\nThe/DT cat/NN does/VBZ n't/RB bark/VB ./.\n",
    )
    .unwrap();
    let config = TrainingConfig::new()
        .with_corpus(&corpus)
        .with_model_path(dir.path().join("hmm_pos_tagger.json"));

    let trained = train_or_load(&config).unwrap();
    assert!(trained.is_trained());
    let loaded = train_or_load(&config).unwrap();
    assert!(!loaded.is_trained());

    let tagger = PosTagger::new(loaded.into_model()).unwrap();
    let tagged = tagger.tag_text("The elephant runs.").unwrap();
    let tags: Vec<_> = tagged.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(tags, ["DT", "NN", "VBZ", "."]);

    let rendered = tagger.describe(&tagged);
    assert!(rendered.starts_with("The             → Determiner"));
    assert!(rendered.ends_with(".               → ."));

    assert!(matches!(tagger.tag_text("   "), Err(HmmError::InvalidInput(_))));
}
