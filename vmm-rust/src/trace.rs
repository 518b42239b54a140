use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::NUM_PROCESSES;
use crate::error::TraceError;

/// One memory reference from the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub pid: usize,
    pub address: u64,
}

impl Access {
    pub fn new(pid: usize, address: u64) -> Access {
        Access { pid, address }
    }

    #[inline]
    pub fn vpage(&self, page_size: u64) -> u64 {
        self.address / page_size
    }
}

struct LineParser {
    pattern: Regex,
}

impl LineParser {
    fn new() -> LineParser {
        LineParser {
            pattern: Regex::new(r"^\s*(\d+)\s*,\s*(\d+)\s*$").expect("trace line pattern is valid"),
        }
    }

    /// `Ok(None)` for blank and comment lines.
    fn parse(&self, line_no: usize, line: &str) -> Result<Option<Access>, TraceError> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Ok(None);
        }

        let malformed = || TraceError::Malformed {
            line: line_no,
            content: trimmed.to_string(),
        };
        let caps = self.pattern.captures(trimmed).ok_or_else(malformed)?;
        let pid: usize = caps[1].parse().map_err(|_| malformed())?;
        let address: u64 = caps[2].parse().map_err(|_| malformed())?;

        if pid >= NUM_PROCESSES {
            return Err(TraceError::ProcessOutOfRange { line: line_no, pid });
        }

        Ok(Some(Access { pid, address }))
    }
}

/// Parse a whole trace held in memory. Line numbers in errors are 1-based.
pub fn parse_trace(content: &str) -> Result<Vec<Access>, TraceError> {
    let parser = LineParser::new();
    let mut accesses = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if let Some(access) = parser.parse(idx + 1, line)? {
            accesses.push(access);
        }
    }
    Ok(accesses)
}

pub fn read_trace_file<P: AsRef<Path>>(path: P) -> Result<Vec<Access>, TraceError> {
    let path = path.as_ref();
    let io_error = |source| TraceError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(io_error)?;
    let mut reader = BufReader::new(file);
    let parser = LineParser::new();

    let mut line = String::new();
    let mut line_no = 0;
    let mut accesses = Vec::new();
    while reader.read_line(&mut line).map_err(io_error)? > 0 {
        line_no += 1;
        if let Some(access) = parser.parse(line_no, &line)? {
            accesses.push(access);
        }
        line.clear();
    }

    log::debug!("read {} accesses from {}", accesses.len(), path.display());
    Ok(accesses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_trace() {
        let trace = parse_trace("0,0\n0,4096\n3,8192\n").unwrap();
        assert_eq!(
            trace,
            vec![Access::new(0, 0), Access::new(0, 4096), Access::new(3, 8192)]
        );
    }

    #[test]
    fn test_whitespace_comments_and_blank_lines() {
        let trace = parse_trace("# header\n\n  1 , 100  \r\n\t2,200\n").unwrap();
        assert_eq!(trace, vec![Access::new(1, 100), Access::new(2, 200)]);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let err = parse_trace("0,0\n\n1;4096\n").unwrap_err();
        match err {
            TraceError::Malformed { line, content } => {
                assert_eq!(line, 3);
                assert_eq!(content, "1;4096");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_rejects_negative_and_missing_fields() {
        assert!(matches!(
            parse_trace("0,-5"),
            Err(TraceError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_trace("0,"),
            Err(TraceError::Malformed { line: 1, .. })
        ));
        assert!(matches!(
            parse_trace("0,12,4"),
            Err(TraceError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_address_overflow_is_malformed() {
        assert!(matches!(
            parse_trace("0,99999999999999999999999"),
            Err(TraceError::Malformed { line: 1, .. })
        ));
    }

    #[test]
    fn test_process_out_of_range() {
        assert!(matches!(
            parse_trace("0,1\n4,4096\n"),
            Err(TraceError::ProcessOutOfRange { line: 2, pid: 4 })
        ));
    }

    #[test]
    fn test_vpage_uses_integer_division() {
        let access = Access::new(0, 8191);
        assert_eq!(access.vpage(4096), 1);
        assert_eq!(Access::new(0, 8192).vpage(4096), 2);
        assert_eq!(Access::new(0, 7).vpage(1), 7);
    }

    #[test]
    fn test_missing_file() {
        let err = read_trace_file("/nonexistent/vmm-rust/trace.txt").unwrap_err();
        assert!(matches!(err, TraceError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/vmm-rust/trace.txt"));
    }
}
