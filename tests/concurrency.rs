use std::thread;

use pdf_filters::{FilterEngine, FilterKind, FilterRegistry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const THREADS: u64 = 8;

fn inputs(seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..20)
        .map(|_| {
            let len = rng.gen_range(0..20_000);
            (0..len).map(|_| rng.gen_range(0..16u8)).collect()
        })
        .collect()
}

#[test]
fn test_concurrent_decode_on_shared_codec() {
    let registry = FilterRegistry::default();

    for kind in [
        FilterKind::FlateDecode,
        FilterKind::LzwDecode,
        FilterKind::Ascii85Decode,
        FilterKind::RunLengthDecode,
    ] {
        let codec = registry.create(kind).unwrap();

        // Encode sequentially first so each thread has its own expected answer
        let work: Vec<Vec<(Vec<u8>, Vec<u8>)>> = (0..THREADS)
            .map(|t| {
                inputs(t)
                    .into_iter()
                    .map(|plain| (codec.encode(&plain).unwrap(), plain))
                    .collect()
            })
            .collect();

        thread::scope(|s| {
            for streams in &work {
                s.spawn(move || {
                    for _ in 0..5 {
                        for (encoded, plain) in streams {
                            assert_eq!(&codec.decode(encoded, None).unwrap(), plain);
                        }
                    }
                });
            }
        });
    }
}

#[test]
fn test_engines_per_thread_share_one_codec() {
    let registry = FilterRegistry::default();
    let codec = registry.create(FilterKind::FlateDecode).unwrap();

    let outputs: Vec<(Vec<u8>, Vec<u8>)> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                s.spawn(move || {
                    let plain: Vec<u8> = inputs(100 + t).concat();
                    let mut engine = FilterEngine::new(codec);
                    engine.begin_encode(Vec::<u8>::new()).unwrap();
                    for chunk in plain.chunks(777) {
                        engine.encode_block(chunk).unwrap();
                    }
                    (engine.end_encode().unwrap(), plain)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (encoded, plain) in outputs {
        assert_eq!(codec.encode(&plain).unwrap(), encoded);
        assert_eq!(codec.decode(&encoded, None).unwrap(), plain);
    }
}
