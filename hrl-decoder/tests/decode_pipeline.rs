//! End-to-end pipeline tests: files on disk through ingestion, block
//! segmentation, checksum gating, frame decoding and statistics.

use byteorder::{BigEndian, ByteOrder};
use std::fs;
use std::path::PathBuf;

use hrl_decoder::{
    DecodedEvent, Decoder, DecoderConfig, DecoderError, RenderedValue, BLOCK_SIZE, FRAME_LEN,
};

fn frame_bytes(counting: u8, op: u16, payload: [u8; 8]) -> [u8; FRAME_LEN] {
    let mut bytes = [0u8; FRAME_LEN];
    bytes[0] = counting;
    BigEndian::write_u16(&mut bytes[1..3], op);
    bytes[3..].copy_from_slice(&payload);
    bytes
}

/// Assemble a sealed block; unused frame slots are 0xFF control markers
fn build_block(frames: &[[u8; FRAME_LEN]]) -> Vec<u8> {
    let mut block = vec![0xFFu8; BLOCK_SIZE];
    for (i, frame) in frames.iter().enumerate() {
        block[i * FRAME_LEN..(i + 1) * FRAME_LEN].copy_from_slice(frame);
    }
    let crc = !crc32fast::hash(&block[..BLOCK_SIZE - 5]);
    BigEndian::write_u32(&mut block[BLOCK_SIZE - 5..BLOCK_SIZE - 1], crc);
    block[BLOCK_SIZE - 1] = 0xFF;
    block
}

/// Write a file with a dummy header block plus the given payload blocks
fn write_file(dir: &std::path::Path, name: &str, blocks: &[Vec<u8>]) -> PathBuf {
    let mut data = vec![0u8; BLOCK_SIZE];
    for block in blocks {
        data.extend_from_slice(block);
    }
    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

fn records_only() -> DecoderConfig {
    DecoderConfig::new().with_control_frames(false)
}

#[test]
fn decodes_a_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "000000005e0a1be0.HRL",
        &[build_block(&[
            frame_bytes(0x01, 0x1D28, [0x5E, 0x0A, 0x1B, 0xE0, 0, 0, 0, 0]),
            frame_bytes(0x02, 0x3C05, [0x10, 0, 0, 0, 0, b'5', b'Y', b'J']),
        ])],
    );

    let decoder = Decoder::new();
    let mut session = decoder.decode_files(&[path], records_only()).unwrap();

    let events: Vec<DecodedEvent> = (&mut session).map(|e| e.unwrap()).collect();
    assert_eq!(events.len(), 4);

    match &events[0] {
        DecodedEvent::FileStart { name, byte_len, created } => {
            assert_eq!(name, "000000005e0a1be0.HRL");
            assert_eq!(*byte_len, 2 * BLOCK_SIZE);
            assert_eq!(
                created.format("%Y-%m-%d %H:%M:%S").to_string(),
                "2019-12-30 15:46:40"
            );
        }
        other => panic!("expected file start, got {other:?}"),
    }
    match &events[2] {
        DecodedEvent::Record { value, .. } => {
            assert_eq!(format!("{value}"), "2019-12-30 15:46:40 GMT");
        }
        other => panic!("expected record, got {other:?}"),
    }
    match &events[3] {
        DecodedEvent::Record { value, .. } => {
            assert_eq!(*value, RenderedValue::Manufacturer("5YJ".to_string()));
        }
        other => panic!("expected record, got {other:?}"),
    }

    let summary = session.stats().summary();
    assert_eq!(summary.len(), 2);
}

#[test]
fn multi_file_sessions_decode_in_timestamp_order() {
    let dir = tempfile::tempdir().unwrap();
    // Later timestamp written (and passed) first
    let newer = write_file(
        dir.path(),
        "000000005e0a1be0.hrl",
        &[build_block(&[frame_bytes(0x01, 0x0B0B, [0; 8])])],
    );
    let older = write_file(
        dir.path(),
        "000000005e0a1bc0.hrl",
        &[build_block(&[frame_bytes(0x01, 0x0A0A, [0; 8])])],
    );

    let decoder = Decoder::new();
    let session = decoder.decode_files(&[newer, older], records_only()).unwrap();

    let file_names: Vec<String> = session
        .filter_map(|e| match e.unwrap() {
            DecodedEvent::FileStart { name, .. } => Some(name),
            _ => None,
        })
        .collect();
    assert_eq!(
        file_names,
        vec!["000000005e0a1bc0.hrl", "000000005e0a1be0.hrl"]
    );
}

#[test]
fn bad_filename_fails_the_whole_request() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_file(
        dir.path(),
        "000000005e0a1be0.hrl",
        &[build_block(&[frame_bytes(0x01, 0x0100, [0; 8])])],
    );
    let bad = write_file(dir.path(), "not-a-timestamp.hrl", &[]);

    let decoder = Decoder::new();
    let result = decoder.decode_files(&[good, bad], records_only());
    assert!(matches!(
        result,
        Err(DecoderError::InvalidFilenameTimestamp(_))
    ));
}

#[test]
fn corrupt_block_abandons_only_the_affected_file() {
    let dir = tempfile::tempdir().unwrap();

    let mut corrupt = build_block(&[frame_bytes(0x01, 0x0100, [0; 8])]);
    corrupt[100] ^= 0x01;
    let first = write_file(dir.path(), "000000005e0a1bc0.hrl", &[corrupt]);
    let second = write_file(
        dir.path(),
        "000000005e0a1be0.hrl",
        &[build_block(&[frame_bytes(0x01, 0x0200, [0; 8])])],
    );

    let decoder = Decoder::new();
    let session = decoder.decode_files(&[first, second], records_only()).unwrap();

    let mut errors = 0;
    let mut ops = Vec::new();
    for event in session {
        match event {
            Ok(DecodedEvent::Record { op, .. }) => ops.push(op),
            Ok(_) => {}
            Err(DecoderError::CorruptBlock { file, .. }) => {
                assert_eq!(file, "000000005e0a1bc0.hrl");
                errors += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(errors, 1);
    assert_eq!(ops, vec![0x0200]);
}

#[test]
fn decoding_twice_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "000000005e0a1be0.hrl",
        &[
            build_block(&[
                frame_bytes(0x01, 0x2222, [7; 8]),
                frame_bytes(0x02, 0x1111, [7; 8]),
                frame_bytes(0x02, 0x1111, [9; 8]),
            ]),
            build_block(&[frame_bytes(0x01, 0x2222, [7; 8])]),
        ],
    );

    let decoder = Decoder::new();
    let run = || {
        let mut session = decoder
            .decode_files(std::slice::from_ref(&path), records_only())
            .unwrap();
        let events: Vec<String> = (&mut session).map(|e| format!("{e:?}")).collect();
        (events, format!("{:?}", session.stats().summary()))
    };

    let (events_a, stats_a) = run();
    let (events_b, stats_b) = run();
    assert_eq!(events_a, events_b);
    assert_eq!(stats_a, stats_b);

    // 0x1111 and 0x2222 tie on totals; ascending op-code breaks the tie
    let mut session = decoder
        .decode_files(std::slice::from_ref(&path), records_only())
        .unwrap();
    for _ in &mut session {}
    let ops: Vec<u16> = session.stats().summary().iter().map(|s| s.op).collect();
    assert_eq!(ops, vec![0x1111, 0x2222]);
}
