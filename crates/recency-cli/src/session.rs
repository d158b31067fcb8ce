//! Command session: executes script commands against one cache

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use recency::LruCache;
use tracing::{debug, warn};

use crate::command::{parse_line, Command, ParseError};
use crate::reply::{Reply, StatsReport};

/// Built-in scenario: capacity-2 cache touched in a fixed order
pub const DEMO_SCRIPT: &str = "\
# capacity 2
PUT 1 1
PUT 2 2
GET 1        # 1
PUT 3 3      # evicts key 2
GET 2        # (nil)
PUT 4 4      # evicts key 1
GET 1        # (nil)
GET 3        # 3
GET 4        # 4
";

/// How replies are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One plain-text reply per line
    Text,
    /// One JSON object per line
    Json,
}

/// Line counters for a finished run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Commands executed
    pub commands: usize,
    /// Lines rejected by the parser
    pub errors: usize,
}

/// A cache plus the commands that drive it
pub struct Session {
    cache: LruCache<i64, i64>,
}

impl Session {
    /// Create a session over an empty cache
    pub fn new(capacity: i64) -> Result<Self> {
        let cache = LruCache::try_from_signed(capacity)
            .context("failed to create cache")?;
        Ok(Self { cache })
    }

    /// Access the underlying cache
    pub fn cache(&self) -> &LruCache<i64, i64> {
        &self.cache
    }

    /// Execute one command
    pub fn execute(&mut self, command: Command) -> Reply {
        match command {
            Command::Put(key, value) => {
                self.cache.put(key, value);
                Reply::Ok
            }
            Command::Get(key) => Reply::Value {
                value: self.cache.get(&key).copied(),
            },
            Command::Peek(key) => Reply::Value {
                value: self.cache.peek(&key).copied(),
            },
            Command::Del(key) => Reply::Integer {
                value: u64::from(self.cache.remove(&key).is_some()),
            },
            Command::Len => Reply::Integer {
                value: self.cache.len() as u64,
            },
            Command::Keys => Reply::Keys {
                keys: self.cache.keys().copied().collect(),
            },
            Command::Clear => {
                self.cache.clear();
                Reply::Ok
            }
            Command::Stats => Reply::Stats(StatsReport::capture(&self.cache)),
        }
    }

    /// Parse and execute every line of `input`, writing replies to `out`
    ///
    /// Lines that fail to parse produce an error reply and the run continues.
    pub fn run<R, W>(&mut self, mut input: R, out: &mut W, format: OutputFormat) -> Result<RunSummary>
    where
        R: BufRead,
        W: Write,
    {
        let mut summary = RunSummary::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            let n = input
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("failed to read line {}", line_no + 1))?;
            if n == 0 {
                break;
            }
            line_no += 1;

            let reply = match parse_raw_line(&buf) {
                Ok(Some(command)) => {
                    debug!(line = line_no, ?command, "executing");
                    summary.commands += 1;
                    self.execute(command)
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!(line = line_no, "parse error: {}", e);
                    summary.errors += 1;
                    Reply::Error {
                        message: e.to_string(),
                    }
                }
            };

            write_reply(out, &reply, format)?;
        }

        Ok(summary)
    }

    /// Release the cache
    pub fn close(self) {
        self.cache.destroy();
    }
}

/// Parse one raw line, including its terminator
fn parse_raw_line(raw: &[u8]) -> std::result::Result<Option<Command>, ParseError> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = std::str::from_utf8(raw).map_err(|_| ParseError::InvalidUtf8)?;
    parse_line(line)
}

/// Write a single reply in the chosen format
pub fn write_reply<W: Write>(out: &mut W, reply: &Reply, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{}", reply)?,
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, reply)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_text(session: &mut Session, script: &str) -> (String, RunSummary) {
        let mut out = Vec::new();
        let summary = session
            .run(script.as_bytes(), &mut out, OutputFormat::Text)
            .unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn test_demo_script() {
        let mut session = Session::new(2).unwrap();
        let (out, summary) = run_text(&mut session, DEMO_SCRIPT);

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec!["OK", "OK", "1", "OK", "(nil)", "OK", "(nil)", "3", "4"]
        );
        assert_eq!(summary.commands, 9);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn test_invalid_capacity() {
        assert!(Session::new(0).is_err());
        assert!(Session::new(-4).is_err());
    }

    #[test]
    fn test_parse_errors_continue() {
        let mut session = Session::new(2).unwrap();
        let (out, summary) = run_text(&mut session, "PUT 1\nFROB\nPUT 1 5\nGET 1\n");

        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("ERR wrong arguments"));
        assert_eq!(lines[1], "ERR unknown command 'FROB'");
        assert_eq!(&lines[2..], &["OK", "5"]);
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.commands, 2);
    }

    #[test]
    fn test_keys_del_len() {
        let mut session = Session::new(3).unwrap();
        let (out, _) = run_text(
            &mut session,
            "PUT 1 10\nPUT 2 20\nPEEK 1\nKEYS\nDEL 2\nDEL 2\nLEN\nCLEAR\nKEYS\n",
        );

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec!["OK", "OK", "10", "2 1", "1", "0", "1", "OK", "(empty)"]
        );
    }

    #[test]
    fn test_invalid_utf8_line_continues() {
        let mut session = Session::new(2).unwrap();
        let mut out = Vec::new();
        let summary = session
            .run(&b"PUT 1 1\nGET \xff\xfe\nGET 1\n"[..], &mut out, OutputFormat::Text)
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["OK", "ERR invalid UTF-8", "1"]);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.commands, 2);
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let mut session = Session::new(2).unwrap();
        let (out, summary) = run_text(&mut session, "PUT 1 1\r\nGET 1");

        assert_eq!(out.lines().collect::<Vec<_>>(), vec!["OK", "1"]);
        assert_eq!(summary.errors, 0);
    }

    #[test]
    fn test_json_output() {
        let mut session = Session::new(2).unwrap();
        let mut out = Vec::new();
        session
            .run("PUT 7 -1\nGET 7\nGET 8\n".as_bytes(), &mut out, OutputFormat::Json)
            .unwrap();

        let replies: Vec<serde_json::Value> = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(replies[0]["reply"], "ok");
        assert_eq!(replies[1]["value"], -1);
        assert!(replies[2]["value"].is_null());
    }
}
