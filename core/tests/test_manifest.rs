#[cfg(test)]
mod manifest_tests {
    use std::fs;
    use std::path::Path;

    use dictbench_core::bench::{load_corpus_dir, load_manifest, parse_manifest, parse_record, BenchConfig};
    use dictbench_core::types::BenchError;

    #[static_init::constructor(0)]
    extern "C" fn _log_init() {
        log_init::init();
    }

    #[test]
    fn parses_a_plain_record() {
        let rec = parse_record(3, "https://a.test/x.css{{{{text/css; charset=utf-8}}}}1234").unwrap();
        assert_eq!(rec.index, 3);
        assert_eq!(rec.path, "https://a.test/x.css");
        assert_eq!(rec.content_type, "text/css");
        assert_eq!(rec.declared_len, Some(1234));
    }

    #[test]
    fn last_opening_delimiter_wins() {
        let rec = parse_record(0, "https://a.test/{{{{weird}}}}/p{{{{application/json}}}}7").unwrap();
        assert_eq!(rec.path, "https://a.test/{{{{weird}}}}/p");
        assert_eq!(rec.content_type, "application/json");
    }

    #[test]
    fn length_is_optional() {
        let rec = parse_record(0, "/index.html{{{{text/html}}}}").unwrap();
        assert_eq!(rec.declared_len, None);
    }

    #[test]
    fn malformed_records_are_rejected() {
        assert!(parse_record(0, "no delimiters here").is_err());
        assert!(parse_record(0, "/x{{{{text/html").is_err());
        assert!(parse_record(0, "/x{{{{text/html}}}}12ab").is_err());
    }

    #[test]
    fn malformed_lines_are_skipped_but_keep_their_index() {
        let text = "/a{{{{text/html}}}}10\n\ngarbage line\n/c{{{{text/css}}}}4\r\n";
        let records = parse_manifest(text, Path::new("manifest"));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].index, 0);
        assert_eq!(records[1].index, 2);
        assert_eq!(records[1].path, "/c");
        assert_eq!(records[1].declared_len, Some(4));
    }

    #[test]
    fn missing_manifest_is_a_manifest_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(load_manifest(dir.path()), Err(BenchError::Manifest { .. })));
    }

    #[test]
    fn corpus_dir_reads_assets_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("manifest"),
            "/a{{{{text/html}}}}5\n/b{{{{text/css}}}}3\n/c{{{{text/css}}}}99\n",
        )
        .unwrap();
        fs::write(dir.path().join("0"), b"hello").unwrap();
        // asset 1 is missing on disk
        fs::write(dir.path().join("2"), b"abc").unwrap();

        let corpus = load_corpus_dir(dir.path()).unwrap();
        assert_eq!(corpus.assets.len(), 2);
        assert_eq!(corpus.missing, vec![1]);
        assert_eq!(corpus.assets[0].content.as_ref(), b"hello");
        assert_eq!(corpus.assets[1].index, 2);
        // declared length mismatch only warns
        assert_eq!(corpus.assets[1].content.len(), 3);
    }

    #[test]
    fn default_config_paths_match_the_layout() {
        let cfg = BenchConfig::default();
        assert_eq!(cfg.dataset_dir, Path::new("./dataset/"));
        assert_eq!(cfg.dict_dir, Path::new("./dicts/"));
    }
}
