use pdf_filters::{FilterEngine, FilterKind, FilterRegistry};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn encode_in_chunks(kind: FilterKind, input: &[u8], rng: &mut StdRng, max_chunk: usize) -> Vec<u8> {
    let codec = FilterRegistry::global().create(kind).unwrap();
    let mut engine = FilterEngine::new(codec);
    engine.begin_encode(Vec::<u8>::new()).unwrap();

    let mut rest = input;
    while !rest.is_empty() {
        let n = rng.gen_range(0..=max_chunk).min(rest.len());
        engine.encode_block(&rest[..n]).unwrap();
        rest = &rest[n..];
    }
    engine.end_encode().unwrap()
}

#[test]
fn test_chunk_boundaries_do_not_change_output() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(1);

    let kinds = [
        FilterKind::AsciiHexDecode,
        FilterKind::Ascii85Decode,
        FilterKind::LzwDecode,
        FilterKind::FlateDecode,
        FilterKind::RunLengthDecode,
    ];

    for kind in kinds {
        let codec = FilterRegistry::global().create(kind).unwrap();
        for len in [0usize, 1, 3, 4, 5, 127, 128, 129, 4095, 4096, 4097, 40_000] {
            let input: Vec<u8> = (0..len).map(|_| rng.gen_range(0..4u8)).collect();
            let whole = codec.encode(&input).unwrap();

            for max_chunk in [1usize, 3, 7, 100, 5000] {
                let chunked = encode_in_chunks(kind, &input, &mut rng, max_chunk);
                assert_eq!(chunked, whole, "{} len {} max chunk {}", kind, len, max_chunk);
            }
        }
    }
}

#[test]
fn test_caller_buffer_can_be_reused_between_blocks() {
    let codec = FilterRegistry::global().create(FilterKind::Ascii85Decode).unwrap();
    let mut engine = FilterEngine::new(codec);
    engine.begin_encode(Vec::<u8>::new()).unwrap();

    // The same buffer is overwritten after every block
    let mut block = [0u8; 3];
    for chunk in b"Man is distinguished".chunks(3) {
        block[..chunk.len()].copy_from_slice(chunk);
        engine.encode_block(&block[..chunk.len()]).unwrap();
        block.fill(0xEE);
    }
    let encoded = engine.end_encode().unwrap();
    assert_eq!(codec.decode(&encoded, None).unwrap(), b"Man is distinguished");
}
