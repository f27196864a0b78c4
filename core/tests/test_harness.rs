#[cfg(test)]
mod harness_tests {
    use std::fs;
    use std::path::Path;

    use dictbench_core::bench::{BenchConfig, CsvSink, Harness, MemorySink, QualityRange, ResultRow, ResultSink};
    use dictbench_core::compression::{provider, CompressionCodec};
    use dictbench_core::strategy::{DictionaryTable, StrategyKind};
    use dictbench_core::types::{Asset, BenchError};

    #[static_init::constructor(0)]
    extern "C" fn _log_init() {
        log_init::init();
    }

    fn write_site(root: &Path, name: &str, assets: &[(&str, &[u8])]) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        let mut manifest = String::new();
        for (i, (ct, content)) in assets.iter().enumerate() {
            manifest.push_str(&format!("https://{name}/{i}{{{{{{{{{ct}}}}}}}}}{}\n", content.len()));
            fs::write(dir.join(i.to_string()), content).unwrap();
        }
        fs::write(dir.join("manifest"), manifest).unwrap();
    }

    fn dataset() -> tempfile::TempDir {
        let root = tempfile::tempdir().unwrap();
        write_site(
            root.path(),
            "site-b",
            &[
                ("text/html", b"<html><body><p>hello from b</p></body></html>"),
                ("text/css", b"body { margin: 0; padding: 0 }"),
                ("text/html", b"<html><body><p>second page of b</p></body></html>"),
            ],
        );
        write_site(
            root.path(),
            "site-a",
            &[
                ("application/json", b"{\"a\": 1, \"b\": [1, 2, 3]}"),
                ("application/json", b"{\"a\": 2, \"b\": [4, 5, 6]}"),
            ],
        );
        write_site(root.path(), "tiny", &[("text/plain", b"only one")]);
        fs::write(root.path().join("stray-file"), b"not a directory").unwrap();
        root
    }

    fn config(root: &Path, workers: usize) -> BenchConfig {
        let mut cfg = BenchConfig {
            dataset_dir: root.to_path_buf(),
            dict_dir: root.join("no-dicts-here"),
            dictionary_size: 1024,
            skip_threshold: 1,
            codecs: vec![CompressionCodec::Zstd, CompressionCodec::Deflate],
            strategies: vec![StrategyKind::S0, StrategyKind::S2, StrategyKind::S5],
            workers,
            ..BenchConfig::default()
        };
        cfg.set_quality_range(CompressionCodec::Zstd, QualityRange::new(1, 2));
        cfg.set_quality_range(CompressionCodec::Deflate, QualityRange::new(5, 6));
        cfg
    }

    #[test]
    fn runs_sorted_directories_and_skips_small_ones() {
        let root = dataset();
        let harness = Harness::new(config(root.path(), 2)).unwrap();
        let mut sink = MemorySink::default();
        let summary = harness.run(&mut sink).unwrap();

        assert_eq!(summary.directories_run, 2);
        assert_eq!(summary.directories_skipped, 1);
        assert_eq!(summary.assets, 5);
        assert_eq!(summary.failed_replays, 0);
        assert_eq!(sink.rows.len(), 2 * 2 * 3);

        let order: Vec<(&str, CompressionCodec, StrategyKind)> = sink
            .rows
            .iter()
            .map(|r| (r.directory.as_str(), r.codec, r.strategy))
            .collect();
        assert_eq!(order[0], ("site-a", CompressionCodec::Zstd, StrategyKind::S0));
        assert_eq!(order[2], ("site-a", CompressionCodec::Zstd, StrategyKind::S5));
        assert_eq!(order[3], ("site-a", CompressionCodec::Deflate, StrategyKind::S0));
        assert_eq!(order[6], ("site-b", CompressionCodec::Zstd, StrategyKind::S0));

        for row in &sink.rows {
            assert_eq!(row.cells.len(), 2);
            assert!(row.cells.iter().all(|(_, v)| v.is_some()));
        }
    }

    #[test]
    fn s0_cells_match_independent_compression() {
        let root = dataset();
        let harness = Harness::new(config(root.path(), 1)).unwrap();
        let mut sink = MemorySink::default();
        harness.run(&mut sink).unwrap();

        let json: [&[u8]; 2] = [b"{\"a\": 1, \"b\": [1, 2, 3]}", b"{\"a\": 2, \"b\": [4, 5, 6]}"];
        let zstd = provider(CompressionCodec::Zstd);
        let expected: u64 = json.iter().map(|c| zstd.compress(c, None, 2).unwrap().len() as u64).sum();

        let row = &sink.rows[0];
        assert_eq!(row.strategy, StrategyKind::S0);
        assert_eq!(row.cell(2), Some(expected));

        // empty static table: S5 never gets a dictionary
        assert_eq!(sink.rows[2].cells, row.cells);
    }

    #[test]
    fn results_do_not_depend_on_worker_count() {
        let root = dataset();
        let mut one = MemorySink::default();
        let mut many = MemorySink::default();
        Harness::new(config(root.path(), 1)).unwrap().run(&mut one).unwrap();
        Harness::new(config(root.path(), 6)).unwrap().run(&mut many).unwrap();
        assert_eq!(one.rows, many.rows);
    }

    #[test]
    fn static_table_feeds_s5() {
        let assets = vec![
            Asset::new(0, "/0", "text/html", b"<html>shared boilerplate shared boilerplate</html>".to_vec()),
            Asset::new(1, "/1", "text/html", b"<html>shared boilerplate again</html>".to_vec()),
        ];
        let table: DictionaryTable =
            [("text/html".to_string(), bytes::Bytes::from_static(b"<html>shared boilerplate</html>"))]
                .into_iter()
                .collect();

        let mut cfg = config(Path::new("."), 1);
        cfg.codecs = vec![CompressionCodec::Deflate];
        cfg.strategies = vec![StrategyKind::S0, StrategyKind::S5];
        let report = Harness::with_table(cfg, table).unwrap().run_assets("mem", &assets).unwrap();

        assert_eq!(report.rows.len(), 2);
        let plain = report.rows[0].cell(6).unwrap();
        let primed = report.rows[1].cell(6).unwrap();
        assert!(primed < plain, "{primed} !< {plain}");
        assert_eq!(report.telemetry.counters.dict_hits, 2 * 2);
    }

    #[test]
    fn invalid_config_fails_before_running() {
        let mut cfg = BenchConfig::default();
        cfg.dictionary_size = 0;
        assert!(matches!(Harness::new(cfg), Err(BenchError::Config(_))));
    }

    #[test]
    fn missing_dataset_is_an_error() {
        let root = tempfile::tempdir().unwrap();
        let harness = Harness::new(config(&root.path().join("absent"), 1)).unwrap();
        let mut sink = MemorySink::default();
        assert!(matches!(harness.run(&mut sink), Err(BenchError::Path { .. })));
    }

    #[test]
    fn csv_sink_writes_header_and_empty_cells() {
        let rows = vec![
            ResultRow {
                directory: "site-a".into(),
                codec: CompressionCodec::Zstd,
                strategy: StrategyKind::S3,
                cells: vec![(1, Some(120)), (2, None)],
            },
            ResultRow {
                directory: "site-a".into(),
                codec: CompressionCodec::Deflate,
                strategy: StrategyKind::S0,
                cells: vec![(2, Some(99))],
            },
        ];
        let mut sink = CsvSink::from_writer(Vec::new(), vec![2, 1, 2]);
        sink.write_directory(&rows).unwrap();
        sink.finish().unwrap();
        let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();

        assert_eq!(
            text,
            "codec,strategy,website,q1,q2\nzstd,S3,site-a,120,\ndeflate,S0,site-a,,99\n"
        );
    }

    #[test]
    fn csv_file_is_written_incrementally() {
        let root = dataset();
        let out = root.path().join("out.csv");
        let harness = Harness::new(config(root.path(), 2)).unwrap();
        let mut sink = CsvSink::create(&out, harness.qualities()).unwrap();
        harness.run(&mut sink).unwrap();
        drop(sink);

        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("codec,strategy,website,q1,q2,q5,q6"));
        assert_eq!(lines.count(), 12);
    }

    #[test]
    fn worker_pool_is_sized() {
        let root = tempfile::tempdir().unwrap();
        let h = Harness::new(config(root.path(), 3)).unwrap();
        assert_eq!(h.profile().worker_count, 3);
        let auto = Harness::new(config(root.path(), 0)).unwrap();
        assert!(auto.profile().worker_count >= 1);
    }
}
