#[cfg(test)]
mod strategy_engine_tests {
    use std::ops::RangeInclusive;
    use std::sync::Arc;

    use bytes::Bytes;
    use dictbench_core::compression::codecs::ZstdCodec;
    use dictbench_core::compression::{CodecError, CodecProvider, CompressionCodec, Compressor, Decompressor};
    use dictbench_core::strategy::{
        build_policy, replay, replay_with, total_compressed_size, DictionaryTable, StrategyContext, StrategyKind,
    };
    use dictbench_core::types::Asset;
    use proptest::prelude::*;

    #[static_init::constructor(0)]
    extern "C" fn _log_init() {
        log_init::init();
    }

    const DICT: usize = 64;

    fn asset(index: usize, ct: &str, content: &[u8]) -> Asset {
        Asset::new(index, format!("https://example.test/{index}"), ct, content.to_vec())
    }

    fn decisions(kind: StrategyKind, assets: &[Asset], ctx: &StrategyContext) -> Vec<Option<Vec<u8>>> {
        let mut seen = Vec::new();
        replay_with(kind, assets, &ZstdCodec, 1, ctx, |step| {
            seen.push(step.dictionary.map(<[u8]>::to_vec));
        })
        .unwrap();
        seen
    }

    fn head(b: &[u8]) -> Vec<u8> {
        b[..b.len().min(DICT)].to_vec()
    }

    fn tail(b: &[u8]) -> Vec<u8> {
        b[b.len().saturating_sub(DICT)..].to_vec()
    }

    fn mixed_assets() -> Vec<Asset> {
        vec![
            asset(0, "text/html; charset=utf-8", &[b'h'; 100]),
            asset(1, "text/css", b"body { margin: 0 }"),
            asset(2, "text/html", b"<p>second page</p>"),
            asset(3, "application/javascript", &[b'j'; 80]),
            asset(4, "text/css", b"p { color: red }"),
        ]
    }

    fn table() -> DictionaryTable {
        [
            ("text/html".to_string(), Bytes::from(vec![b'T'; 200])),
            ("text/css".to_string(), Bytes::from_static(b"static-css")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn parse_and_display_kinds() {
        assert_eq!("S3".parse::<StrategyKind>().unwrap(), StrategyKind::S3);
        assert_eq!("s7".parse::<StrategyKind>().unwrap(), StrategyKind::S7);
        assert_eq!("0".parse::<StrategyKind>().unwrap(), StrategyKind::S0);
        assert!("S8".parse::<StrategyKind>().is_err());
        assert!("fast".parse::<StrategyKind>().is_err());
        assert_eq!(StrategyKind::S5.to_string(), "S5");
        assert!(StrategyKind::S6.uses_static_table());
        assert!(!StrategyKind::S4.uses_static_table());
    }

    #[test]
    fn s0_never_uses_a_dictionary() {
        let ctx = StrategyContext::new(DICT, Arc::new(table()));
        assert!(decisions(StrategyKind::S0, &mixed_assets(), &ctx).iter().all(Option::is_none));
    }

    #[test]
    fn s1_fixes_the_first_head() {
        let assets = mixed_assets();
        let d = decisions(StrategyKind::S1, &assets, &StrategyContext::without_table(DICT));
        assert_eq!(d[0], None);
        let first = head(&assets[0].content);
        assert_eq!(first.len(), DICT);
        for later in &d[1..] {
            assert_eq!(later.as_deref(), Some(first.as_slice()));
        }
    }

    #[test]
    fn s2_uses_the_previous_asset() {
        let assets = mixed_assets();
        let d = decisions(StrategyKind::S2, &assets, &StrategyContext::without_table(DICT));
        assert_eq!(d[0], None);
        for i in 1..assets.len() {
            assert_eq!(d[i], Some(head(&assets[i - 1].content)));
        }
    }

    #[test]
    fn s3_window_is_tail_of_everything_seen() {
        let assets = mixed_assets();
        let d = decisions(StrategyKind::S3, &assets, &StrategyContext::without_table(DICT));
        assert_eq!(d[0], None);
        let mut concat = Vec::new();
        for i in 1..assets.len() {
            concat.extend_from_slice(&head(&assets[i - 1].content));
            assert_eq!(d[i], Some(tail(&concat)), "asset {i}");
        }
    }

    #[test]
    fn s4_prefers_same_type_then_first() {
        let assets = mixed_assets();
        let d = decisions(StrategyKind::S4, &assets, &StrategyContext::without_table(DICT));
        let first = head(&assets[0].content);
        assert_eq!(d[0], None);
        // css: no css yet, falls back to the first asset
        assert_eq!(d[1], Some(first.clone()));
        // html: previous html is asset 0 (parameters stripped)
        assert_eq!(d[2], Some(first.clone()));
        assert_eq!(d[3], Some(first));
        assert_eq!(d[4], Some(head(&assets[1].content)));
    }

    #[test]
    fn s5_reads_only_the_static_table() {
        let assets = mixed_assets();
        let d = decisions(StrategyKind::S5, &assets, &StrategyContext::new(DICT, Arc::new(table())));
        assert_eq!(d[0], Some(vec![b'T'; DICT]));
        assert_eq!(d[1].as_deref(), Some(&b"static-css"[..]));
        assert_eq!(d[2], Some(vec![b'T'; DICT]));
        assert_eq!(d[3], None);
        assert_eq!(d[4].as_deref(), Some(&b"static-css"[..]));
    }

    #[test]
    fn saved_table_loads_back_tail_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let long: Vec<u8> = (0..200u8).collect();
        let mut saved = DictionaryTable::default();
        saved.insert("text/html", long.clone());
        saved.insert("application/json", b"{\"k\": 1}".to_vec());
        saved.save(dir.path()).unwrap();

        assert!(dir.path().join("text__html.dict").is_file());
        assert!(dir.path().join("application__json.dict").is_file());

        let loaded = DictionaryTable::load(dir.path(), DICT).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("text/html").unwrap().as_ref(), tail(&long).as_slice());
        assert_eq!(loaded.get("application/json").unwrap().as_ref(), b"{\"k\": 1}");
        assert!(loaded.get("text/css").is_none());
    }

    #[test]
    fn s6_replaces_static_entry_with_previous_of_type() {
        let assets = mixed_assets();
        let d = decisions(StrategyKind::S6, &assets, &StrategyContext::new(DICT, Arc::new(table())));
        assert_eq!(d[0], Some(vec![b'T'; DICT]));
        assert_eq!(d[1].as_deref(), Some(&b"static-css"[..]));
        assert_eq!(d[2], Some(head(&assets[0].content)));
        assert_eq!(d[3], None);
        assert_eq!(d[4], Some(head(&assets[1].content)));
    }

    #[test]
    fn s7_extends_static_entry_into_a_window() {
        let assets = mixed_assets();
        let d = decisions(StrategyKind::S7, &assets, &StrategyContext::new(DICT, Arc::new(table())));
        assert_eq!(d[1].as_deref(), Some(&b"static-css"[..]));

        let mut html = vec![b'T'; 200];
        html.extend_from_slice(&head(&assets[0].content));
        assert_eq!(d[2], Some(tail(&html)));

        let mut css = b"static-css".to_vec();
        css.extend_from_slice(&assets[1].content);
        assert_eq!(d[4], Some(tail(&css)));
        assert_eq!(d[3], None);
    }

    #[test]
    fn fresh_state_for_every_replay() {
        let assets = mixed_assets();
        let ctx = StrategyContext::without_table(DICT);
        let a = decisions(StrategyKind::S3, &assets, &ctx);
        let b = decisions(StrategyKind::S3, &assets, &ctx);
        assert_eq!(a, b);

        let policy = build_policy(StrategyKind::S2, &ctx);
        assert_eq!(policy.kind(), StrategyKind::S2);
        assert!(policy.select(&assets[3]).is_none());
    }

    #[test]
    fn empty_corpus_totals_zero() {
        let ctx = StrategyContext::new(DICT, Arc::new(table()));
        for kind in StrategyKind::ALL {
            assert_eq!(total_compressed_size(kind, &[], &ZstdCodec, 5, &ctx).unwrap(), 0);
        }
    }

    #[test]
    fn total_is_sum_of_per_asset_sizes() {
        let assets = mixed_assets();
        let ctx = StrategyContext::without_table(DICT);
        let outcome = replay(StrategyKind::S0, &assets, &ZstdCodec, 3, &ctx).unwrap();

        let expected: u64 = assets
            .iter()
            .map(|a| ZstdCodec.compress(&a.content, None, 3).unwrap().len() as u64)
            .sum();
        assert_eq!(outcome.total_compressed, expected);
        assert_eq!(outcome.sizes.len(), assets.len());
        assert_eq!(outcome.failures, 0);
        assert_eq!(outcome.telemetry.counters.assets, assets.len() as u64);
        assert_eq!(outcome.telemetry.counters.dict_hits, 0);
    }

    #[test]
    fn quality_is_checked_once_up_front() {
        let ctx = StrategyContext::without_table(DICT);
        let err = replay(StrategyKind::S2, &mixed_assets(), &ZstdCodec, 40, &ctx).unwrap_err();
        assert!(err.is_configuration());
    }

    /// Delegates to zstd but fails any asset whose content starts with `FAIL`.
    struct Flaky;

    impl CodecProvider for Flaky {
        fn codec(&self) -> CompressionCodec {
            CompressionCodec::Zstd
        }
        fn quality_range(&self) -> RangeInclusive<i32> {
            ZstdCodec.quality_range()
        }
        fn new_compressor(&self, quality: i32) -> Result<Box<dyn Compressor>, CodecError> {
            ZstdCodec.new_compressor(quality)
        }
        fn new_decompressor(&self) -> Result<Box<dyn Decompressor>, CodecError> {
            ZstdCodec.new_decompressor()
        }
        fn compress(&self, raw: &[u8], dictionary: Option<&[u8]>, quality: i32) -> Result<Vec<u8>, CodecError> {
            if raw.starts_with(b"FAIL") {
                return Err(CodecError::Resource { codec: "flaky", msg: "injected".into() });
            }
            ZstdCodec.compress(raw, dictionary, quality)
        }
    }

    #[test]
    fn failed_asset_is_absent_but_still_observed() {
        let assets = vec![
            asset(0, "text/plain", b"hello hello hello"),
            asset(1, "text/plain", b"FAIL on purpose"),
            asset(2, "text/plain", b"after the failure"),
        ];
        let ctx = StrategyContext::without_table(DICT);
        let mut dicts = Vec::new();
        let outcome = replay_with(StrategyKind::S2, &assets, &Flaky, 3, &ctx, |step| {
            dicts.push(step.dictionary.map(<[u8]>::to_vec));
        })
        .unwrap();

        assert_eq!(outcome.failures, 1);
        assert!(outcome.sizes[0].is_some());
        assert_eq!(outcome.sizes[1], None);
        assert_eq!(
            outcome.total_compressed,
            (outcome.sizes[0].unwrap() + outcome.sizes[2].unwrap()) as u64
        );
        assert_eq!(dicts[2].as_deref(), Some(&b"FAIL on purpose"[..]));
        assert_eq!(outcome.telemetry.counters.assets_failed, 1);
    }

    fn arb_assets(max_len: usize) -> impl Strategy<Value = Vec<Asset>> {
        let types = prop_oneof![Just("text/html"), Just("text/css"), Just("image/png")];
        proptest::collection::vec((types, proptest::collection::vec(any::<u8>(), 0..max_len)), 0..12).prop_map(
            |items| {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, (ct, content))| asset(i, ct, &content))
                    .collect()
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn every_dictionary_respects_the_bound(
            assets in arb_assets(300),
            dictionary_size in 1usize..128,
            kind_id in 0u8..8,
        ) {
            let kind = StrategyKind::ALL[kind_id as usize];
            let ctx = StrategyContext::new(dictionary_size, Arc::new(table()));
            let mut worst = 0;
            replay_with(kind, &assets, &ZstdCodec, 1, &ctx, |step| {
                worst = worst.max(step.dictionary.map_or(0, <[u8]>::len));
            }).unwrap();
            prop_assert!(worst <= dictionary_size);
        }

        #[test]
        fn s1_dictionary_never_changes(assets in arb_assets(200)) {
            let d = decisions(StrategyKind::S1, &assets, &StrategyContext::without_table(DICT));
            if let Some(first) = assets.first() {
                for later in d.iter().skip(1) {
                    prop_assert_eq!(later.clone(), Some(head(&first.content)));
                }
            }
        }

        #[test]
        fn rolling_windows_hold_the_tail(assets in arb_assets(DICT)) {
            // assets no longer than the dictionary: heads equal contents
            let ctx = StrategyContext::without_table(DICT);
            let s3 = decisions(StrategyKind::S3, &assets, &ctx);
            let s7 = decisions(StrategyKind::S7, &assets, &ctx);

            let mut all = Vec::new();
            for (i, a) in assets.iter().enumerate() {
                if i > 0 {
                    prop_assert_eq!(s3[i].clone(), Some(tail(&all)));
                }
                let same: Vec<u8> = assets[..i]
                    .iter()
                    .filter(|p| p.content_type == a.content_type)
                    .flat_map(|p| p.content.iter().copied())
                    .collect();
                let seen_type = assets[..i].iter().any(|p| p.content_type == a.content_type);
                prop_assert_eq!(s7[i].clone(), if seen_type { Some(tail(&same)) } else { None });
                all.extend_from_slice(&a.content);
            }
        }
    }
}
