#![no_main]
use libfuzzer_sys::{fuzz_target, arbitrary::{Arbitrary, Unstructured}};
use sparse_stream_rs::{SeekOrigin, SparseStream};

#[derive(Debug, Arbitrary)]
enum Op {
    WriteAt { pos: u16, data: Vec<u8> },
    Write { data: Vec<u8> },
    Read { len: u16 },
    SetLen { len: u16 },
    Seek { offset: i16, origin: u8 },
    MakeReadOnly,
}

// Random op sequences checked against a dense Vec<u8> copy of the stream
fuzz_target!(|input: &[u8]| {
    let mut u = Unstructured::new(input);

    let ops: Vec<Op> = match u.arbitrary() {
        Ok(ops) => ops,
        Err(_) => return,
    };

    let mut stream = SparseStream::new();
    let mut model: Vec<u8> = Vec::new();

    for op in ops.iter().take(64) {
        match op {
            Op::WriteAt { pos, data } => {
                if stream.write_at(*pos as u64, data).is_ok() && !data.is_empty() {
                    let end = *pos as usize + data.len();
                    if model.len() < end {
                        model.resize(end, 0);
                    }
                    model[*pos as usize..end].copy_from_slice(data);
                }
            }
            Op::Write { data } => {
                let pos = stream.position().unwrap() as usize;
                if stream.write(data).is_ok() && !data.is_empty() {
                    let end = pos + data.len();
                    if model.len() < end {
                        model.resize(end, 0);
                    }
                    model[pos..end].copy_from_slice(data);
                }
            }
            Op::Read { len } => {
                let pos = stream.position().unwrap() as usize;
                let mut buf = vec![0u8; *len as usize];
                let n = stream.read(&mut buf).unwrap();
                assert_eq!(&buf[..n], &model[pos..pos + n]);
            }
            Op::SetLen { len } => {
                if stream.set_len(*len as u64).is_ok() {
                    model.resize(*len as usize, 0);
                }
            }
            Op::Seek { offset, origin } => {
                let origin = match SeekOrigin::try_from(*origin as i32 % 4) {
                    Ok(origin) => origin,
                    Err(_) => continue,
                };
                if stream.seek(*offset as i64, origin).is_ok() {
                    let len = stream.len().unwrap() as usize;
                    if model.len() < len {
                        model.resize(len, 0);
                    }
                }
            }
            Op::MakeReadOnly => stream.make_read_only().unwrap(),
        }

        assert_eq!(stream.len().unwrap(), model.len() as u64);
    }

    let mut all = vec![0u8; model.len()];
    stream.read_at(0, &mut all).unwrap();
    assert_eq!(all, model);
});
