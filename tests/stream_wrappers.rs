//! Integration tests mixing the auxiliary streams with the sparse stream

use sparse_stream_rs::{
    read_to_vec, Block, ByteStream, NullSink, ReadLimited, SeekOrigin, SparseStream,
    StreamOptions, ZeroStream,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Decode length-prefixed records, looping until each record is complete
fn decode_records(input: &mut dyn ByteStream) -> sparse_stream_rs::Result<Vec<Vec<u8>>> {
    let mut records = Vec::new();
    loop {
        let mut len = [0u8; 1];
        if input.read(&mut len)? == 0 {
            return Ok(records);
        }
        let mut record = vec![0u8; len[0] as usize];
        let mut filled = 0;
        while filled < record.len() {
            let n = input.read(&mut record[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        records.push(record);
    }
}

#[test]
fn test_decoder_survives_short_reads() {
    init_tracing();

    let mut encoded = SparseStream::new();
    for record in [&b"alpha"[..], &b"be"[..], &b"gamma-delta"[..]] {
        encoded.write(&[record.len() as u8]).unwrap();
        encoded.write(record).unwrap();
    }
    encoded.seek(0, SeekOrigin::Begin).unwrap();

    for max_read in 1..6 {
        let mut input = ReadLimited::new(encoded.clone(), max_read).unwrap();
        let records = decode_records(&mut input).unwrap();
        assert_eq!(
            records,
            vec![b"alpha".to_vec(), b"be".to_vec(), b"gamma-delta".to_vec()],
            "max_read = {}",
            max_read
        );
    }
}

#[test]
fn test_zero_stream_matches_empty_sparse_stream() {
    let mut zeros = ZeroStream::new(4096);
    let mut sparse = SparseStream::new();
    sparse.set_len(4096).unwrap();
    sparse.make_read_only().unwrap();

    assert_eq!(read_to_vec(&mut zeros).unwrap(), read_to_vec(&mut sparse).unwrap());
}

#[test]
fn test_copy_sparse_into_sink() {
    let mut source =
        SparseStream::from_blocks(vec![Block::new(1000, vec![1; 10])], 5000).unwrap();
    let mut sink = NullSink::new();

    let mut buf = [0u8; 333];
    loop {
        let n = source.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        sink.write_from(&buf, 0, n).unwrap();
    }
    assert_eq!(sink.bytes_written(), 5000);
}

#[test]
fn test_options_from_toml_build_limited() -> anyhow::Result<()> {
    init_tracing();

    let options = StreamOptions::from_toml_str("length = 64\nmax_read = 5\nread_only = true")?;
    let mut stream = options.build_limited(vec![Block::new(0, b"0123456789".to_vec())])?;

    assert!(!stream.can_write());
    let mut buf = [0u8; 64];
    assert_eq!(stream.read(&mut buf)?, 5);
    assert_eq!(&buf[..5], b"01234");
    assert_eq!(read_to_vec(&mut stream)?.len(), 59);
    Ok(())
}
