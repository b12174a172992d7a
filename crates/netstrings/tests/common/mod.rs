#![allow(dead_code)]

use bytes::Bytes;
use netstrings::FrameError;

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::level_filters::LevelFilter::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

/// One recorded session: the bytes on the wire, the frames they decode to,
/// and whether decoding ends with a malformed-frame error.
pub struct Case {
    pub name: &'static str,
    pub data: Vec<u8>,
    pub frames: Vec<Vec<u8>>,
    pub malformed: bool,
}

impl Case {
    fn new(name: &'static str, data: &[u8], frames: &[&[u8]], malformed: bool) -> Self {
        Self {
            name,
            data: data.to_vec(),
            frames: frames.iter().map(|frame| frame.to_vec()).collect(),
            malformed,
        }
    }
}

pub fn cases() -> Vec<Case> {
    let mut big = b"1000000:".to_vec();
    big.extend(std::iter::repeat(b'$').take(1_000_000));
    big.push(b',');
    let big_twice = [big.as_slice(), big.as_slice()].concat();
    let dollars = vec![b'$'; 1_000_000];

    vec![
        Case::new("bad", b"bad", &[], true),
        Case::new("wrong terminator", b"10:almost good,", &[], true),
        Case::new("spaces", b"11:       good,", &[b"       good"], false),
        Case::new("incomplete", b"12:almost good,", &[], false),
        Case::new("good then bad", b"4:good,bad", &[b"good"], true),
        Case::new("nested", b"13:13:recursive1,", &[b"13:recursive1"], false),
        Case::new("nested comma", b"14:14:recursive2,,", &[b"14:recursive2,"], false),
        Case::new("foo", b"3:foo,", &[b"foo"], false),
        Case::new(
            "json",
            br#"46:{"id": 0, "method": "hello", "jsonrpc": "2.0"},"#,
            &[br#"{"id": 0, "method": "hello", "jsonrpc": "2.0"}"#],
            false,
        ),
        Case::new("large", &big_twice, &[&dollars, &dollars], false),
    ]
}

/// Collect frames until the first error.
pub fn collect_until_error<I>(items: I) -> (Vec<Bytes>, Option<FrameError>)
where
    I: IntoIterator<Item = netstrings::Result<Bytes>>,
{
    let mut frames = Vec::new();
    for item in items {
        match item {
            Ok(frame) => frames.push(frame),
            Err(err) => return (frames, Some(err)),
        }
    }
    (frames, None)
}

pub fn check(case: &Case, frames: &[Bytes], err: Option<FrameError>) {
    assert_eq!(frames.len(), case.frames.len(), "{}: frame count", case.name);
    for (got, want) in frames.iter().zip(&case.frames) {
        assert!(got.as_ref() == want.as_slice(), "{}: frame mismatch", case.name);
    }
    match err {
        None => assert!(!case.malformed, "{}: expected a malformed frame", case.name),
        Some(err) => assert!(
            case.malformed && err.is_malformed(),
            "{}: unexpected error {err}",
            case.name
        ),
    }
}

pub fn chunked(data: &[u8], size: usize) -> Vec<std::io::Result<Vec<u8>>> {
    data.chunks(size).map(|chunk| Ok(chunk.to_vec())).collect()
}
