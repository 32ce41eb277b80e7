//! Corpus filter over a file on disk.

use search_bench_corpus::{sampling_buckets, CorpusTransformer};
use std::fs::{self, File};
use std::io::BufReader;

#[test]
fn test_file_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("corpus.jsonl");
    let urls: Vec<String> = (0..50).map(|i| format!("https://en.wikipedia.org/wiki/Page_{i}")).collect();

    let mut lines: Vec<String> = urls
        .iter()
        .map(|url| serde_json::json!({"url": url, "body": "Some TEXT, 42 times."}).to_string())
        .collect();
    lines.insert(10, "{\"url\": ".to_string());
    lines.insert(20, serde_json::json!({"url": "", "body": "dropped"}).to_string());
    fs::write(&path, lines.join("\n")).unwrap();

    let transformer = CorpusTransformer::new().unwrap();
    let mut output = Vec::new();
    let stats = transformer
        .transform_stream(BufReader::new(File::open(&path).unwrap()), &mut output)
        .unwrap();

    assert_eq!(stats.lines, 52);
    assert_eq!(stats.written, 50);
    assert_eq!(stats.malformed, 1);
    assert_eq!(stats.skipped, 1);

    let written: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    for (doc, url) in written.iter().zip(&urls) {
        assert_eq!(doc["id"], url.as_str());
        assert_eq!(doc["text"], "some text times ");
        let expected = sampling_buckets(url);
        match doc.get("filter") {
            Some(filter) => assert_eq!(filter, &serde_json::json!(expected)),
            None => assert!(expected.is_empty()),
        }
    }
}
