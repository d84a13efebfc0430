#![allow(missing_docs)]

use subword_bpe::{Encoder, Model, TrainerOptions, Vocabulary};

fn decode_line(line: &str) -> String {
    line.chars()
        .filter(|&c| c != ' ')
        .map(|c| if c == subword_bpe::TERMINAL_MARKER { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

#[test]
fn low_lower_newest_widest_first_merge_frequency() {
    let corpus = "low low low low low lower lower newest newest newest newest newest newest widest widest widest\n";
    let mut vocab = Vocabulary::new();
    vocab.ingest_text(std::io::Cursor::new(corpus)).unwrap();

    let report = TrainerOptions::new(20).init().train(&mut vocab);
    let first = report.model.operations()[0].clone();
    assert_eq!(first, (compact_str::CompactString::new("E"), compact_str::CompactString::new("S")));
}

#[test]
fn aaaa_corpus_exact_three_merges() {
    let mut vocab = Vocabulary::new();
    vocab.ingest_text(std::io::Cursor::new("aaaa\n")).unwrap();

    let report = TrainerOptions::new(20).init().train(&mut vocab);
    assert_eq!(report.model.len(), 3);
    assert!(!report.stopped_early);

    let ops = report.model.operations();
    assert_eq!(ops[0], (compact_str::CompactString::new("A"), compact_str::CompactString::new("A")));
    assert_eq!(ops[1], (compact_str::CompactString::new("AA"), compact_str::CompactString::new("AA")));
    assert_eq!(ops[2], (compact_str::CompactString::new("AAAA"), compact_str::CompactString::new("_")));
}

#[test]
fn single_token_hello_round_trips_through_decode() {
    let mut vocab = Vocabulary::new();
    vocab.ingest_text(std::io::Cursor::new("HELLO\n")).unwrap();

    let report = TrainerOptions::new(20).init().train(&mut vocab);
    assert!(report.model.len() <= 5);

    let mut encoder = Encoder::new(&report.model);
    let encoded = encoder.encode_line("HELLO");
    assert_eq!(decode_line(&encoded), "HELLO");
}

#[test]
fn vocabulary_file_round_trip() {
    let mut vocab = Vocabulary::new();
    vocab
        .ingest_text(std::io::Cursor::new("low low low low low lower lower newest newest\n"))
        .unwrap();

    let mut buf = Vec::new();
    vocab.write_vocab_file(&mut buf).unwrap();

    let mut reloaded = Vocabulary::new();
    reloaded.ingest_vocab_file(std::io::Cursor::new(buf)).unwrap();

    assert_eq!(reloaded.len(), vocab.len());
    for (token, word) in vocab.iter() {
        assert_eq!(reloaded.get(token).unwrap().weight, word.weight);
    }
    assert_eq!(reloaded.alphabet_size(), vocab.alphabet_size());
}

#[test]
fn model_file_round_trip() {
    let mut vocab = Vocabulary::new();
    vocab.ingest_text(std::io::Cursor::new("low lower newest widest\n")).unwrap();
    let report = TrainerOptions::new(30).init().train(&mut vocab);

    let mut buf = Vec::new();
    report.model.write(&mut buf).unwrap();

    let reloaded = Model::load(std::io::Cursor::new(buf)).unwrap();
    assert_eq!(reloaded.operations(), report.model.operations());
}

#[test]
fn encode_decode_round_trip_for_english_sentence() {
    let mut vocab = Vocabulary::new();
    vocab
        .ingest_text(std::io::Cursor::new("hello world hello there world\n"))
        .unwrap();
    let report = TrainerOptions::new(50).init().train(&mut vocab);

    let mut encoder = Encoder::new(&report.model);
    let encoded = encoder.encode_line("Hello, world.");
    assert_eq!(decode_line(&encoded), "HELLO WORLD");
}

#[test]
fn vocabulary_and_model_survive_a_real_file_round_trip() {
    tempdir::TempDir::new("subword_bpe_test")
        .and_then(|dir| {
            let vocab_path = dir.path().join("vocab.txt");
            let model_path = dir.path().join("model.txt");

            let mut vocab = Vocabulary::new();
            vocab.ingest_text(std::io::Cursor::new("low lower newest widest\n")).unwrap();
            std::fs::write(&vocab_path, {
                let mut buf = Vec::new();
                vocab.write_vocab_file(&mut buf).unwrap();
                buf
            })?;

            let mut reloaded = Vocabulary::new();
            reloaded.ingest_vocab_file(std::io::BufReader::new(std::fs::File::open(&vocab_path)?)).unwrap();
            assert_eq!(reloaded.len(), vocab.len());

            let report = TrainerOptions::new(30).init().train(&mut reloaded);
            std::fs::write(&model_path, {
                let mut buf = Vec::new();
                report.model.write(&mut buf).unwrap();
                buf
            })?;

            let reloaded_model = Model::load(std::io::BufReader::new(std::fs::File::open(&model_path)?)).unwrap();
            assert_eq!(reloaded_model.operations(), report.model.operations());

            Ok(())
        })
        .unwrap();
}

#[test]
fn applying_a_model_twice_is_idempotent() {
    let mut vocab = Vocabulary::new();
    vocab.ingest_text(std::io::Cursor::new("widest widest widest newest\n")).unwrap();
    let report = TrainerOptions::new(30).init().train(&mut vocab);

    let mut symbols: Vec<compact_str::CompactString> =
        "WIDEST".chars().map(|c| compact_str::CompactString::new(c.to_string())).collect();
    symbols.push(compact_str::CompactString::new("_"));

    report.model.apply(&mut symbols);
    let once = symbols.clone();
    report.model.apply(&mut symbols);
    assert_eq!(symbols, once);
}
