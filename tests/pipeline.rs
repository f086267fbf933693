use std::fs;
use std::path::Path;

use sense_projection::{
    AlignmentQualityAnalyzer, AlignmentStore, AnalyzerConfig, InputPaths, LoadError,
    ProjectionEngine, ProjectionRecord, QualityReport, ReportFormat, Snapshot, TokenCorpus,
    save_tsv,
};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn fixture(dir: &Path) -> InputPaths {
    InputPaths {
        annotations: write(
            dir,
            "tokens.tsv",
            "sentence_id\tinstance_id\traw_text\n\
             d0.s0\t\tThe\n\
             d0.s0\td0.s0.t0\tcat\n\
             d0.s0\td0.s0.t1\tsat\n\
             d0.s1\td0.s1.t0\tBank\n\
             d0.s1\tNone\t's\n\
             d0.s1\td0.s1.t1\tloan\n\
             d0.s1\td0.s1.t1\tloan\n",
        ),
        key: write(
            dir,
            "key.txt",
            "d0.s0.t0 bn:00015267n\n\
             d0.s0.t1 bn:00083181v\n\
             d0.s1.t0 bn:00008364n\n\
             d0.s1.t0 bn:00008363n\n\
             d0.s1.t1 bn:00051323n\n",
        ),
        alignments: write(dir, "align.txt", "0\t0-0 1-2 2-1\n1\t0-0 1-1 2-2 3-2 x-y\n"),
        source: write(dir, "en.txt", "The cat sat\nBank s loan loan\n"),
        target: write(dir, "zh.txt", "那只 坐 猫\n银行 的 贷款\n"),
        substitutions: Some(write(dir, "subs.tsv", "s\t's\n")),
    }
}

#[test]
fn projection_run_writes_expected_tsv() {
    let temp = TempDir::new().expect("tempdir");
    let paths = fixture(temp.path());

    let snapshot = Snapshot::load(&paths).expect("load snapshot");
    let engine = ProjectionEngine::new(&snapshot);
    let projection = engine.project_all();

    // sentence 1: Bank has two gold senses, loan is mentioned twice
    assert_eq!(
        projection.records,
        vec![
            ProjectionRecord::new("bn:00015267n", "猫"),
            ProjectionRecord::new("bn:00083181v", "坐"),
        ]
    );
    assert_eq!(projection.stats.no_sense, 1);
    assert_eq!(projection.stats.duplicate_mention, 2);
    assert_eq!(snapshot.senses.ambiguous_count(), 1);

    let out = temp.path().join("senses.tsv");
    save_tsv(&projection.records, &out).expect("save");
    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "bn:00015267n\t猫\nbn:00083181v\t坐\n"
    );
}

#[test]
fn missing_input_file_fails_the_load() {
    let temp = TempDir::new().expect("tempdir");
    let mut paths = fixture(temp.path());
    paths.key = temp.path().join("does-not-exist.txt");

    let err = Snapshot::load(&paths).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }));
}

#[test]
fn quality_report_from_files() {
    let temp = TempDir::new().expect("tempdir");
    let paths = fixture(temp.path());
    let other = write(temp.path(), "other.txt", "0\t0-0 1-2 2-1\n\n");

    let alignments = AlignmentStore::load(&paths.alignments).unwrap();
    let source = TokenCorpus::load(&paths.source).unwrap();
    let target = TokenCorpus::load(&paths.target).unwrap();
    let other = AlignmentStore::load(&other).unwrap();
    let config = AnalyzerConfig::default();
    let analyzer = AlignmentQualityAnalyzer::new(&alignments, &source, &target, &config);

    let report = QualityReport::build(&analyzer, Some((&other, "argmax")));
    assert_eq!(report.basic.total_links, 7);
    assert_eq!(report.topology.total(), 7);
    assert_eq!(report.crossings.crossing_sentences, 1);

    // sentence 0 agrees fully, sentence 1 is one-sided and scores 0
    let agreement = report.agreement.as_ref().unwrap();
    assert_eq!(agreement.scored_sentences(), 2);
    assert!((agreement.mean_jaccard.unwrap() - 0.5).abs() < 1e-9);

    let text = report.render(ReportFormat::Text).unwrap();
    assert!(text.contains("Total alignments: 7"));
}
