use std::fs::File;
use std::io::{BufReader, Write};

use recency_cli::{OutputFormat, Session};
use tempfile::NamedTempFile;

#[test]
fn test_script_file() {
    let mut script = NamedTempFile::new().unwrap();
    writeln!(script, "# fill, touch 1, overflow").unwrap();
    writeln!(script, "put 1 100").unwrap();
    writeln!(script, "put 2 200").unwrap();
    writeln!(script, "put 3 300").unwrap();
    writeln!(script, "get 1").unwrap();
    writeln!(script, "put 4 400").unwrap();
    writeln!(script, "keys").unwrap();
    writeln!(script, "stats").unwrap();
    script.flush().unwrap();

    let mut session = Session::new(3).unwrap();
    let mut out = Vec::new();
    let reader = BufReader::new(File::open(script.path()).unwrap());
    let summary = session.run(reader, &mut out, OutputFormat::Text).unwrap();

    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(&lines[..6], &["OK", "OK", "OK", "100", "OK", "4 1 3"]);
    assert!(lines[6].contains("evictions=1"));
    assert_eq!(summary.commands, 7);
    assert_eq!(session.cache().len(), 3);
    session.cache().check_invariants().unwrap();
}

#[test]
fn test_stats_json() {
    let mut session = Session::new(1).unwrap();
    let mut out = Vec::new();
    session
        .run("PUT 1 1\nPUT 2 2\nGET 1\nSTATS\n".as_bytes(), &mut out, OutputFormat::Json)
        .unwrap();

    let out = String::from_utf8(out).unwrap();
    let last = out.lines().last().unwrap();
    let stats: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(stats["reply"], "stats");
    assert_eq!(stats["evictions"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["len"], 1);
}
