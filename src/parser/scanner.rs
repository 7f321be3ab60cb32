// src/parser/scanner.rs
use std::io::{self, BufRead};
use tracing::{debug, trace};

use crate::error::{MakesError, MakesResult};

/// Line that opens the files section of `make -p` output
pub const FILES_MARKER: &str = "# Files";

/// Name given to a block that has no lines at all
pub const EMPTY_BLOCK_NAME: &str = "# Not a target:";

/// One blank-line-delimited entry of the files section, not yet interpreted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBlock {
    lines: Vec<String>,
}

impl RawBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text before the first `:` of the first line
    pub fn name(&self) -> &str {
        match self.lines.first() {
            Some(line) => line.split(':').next().unwrap_or_default(),
            None => EMPTY_BLOCK_NAME,
        }
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}

/// Scanned database dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dump {
    pub version: String,
    pub blocks: Vec<RawBlock>,
}

/// Scan a `make -n -p` dump into its version line and raw blocks.
///
/// Every block closed by a blank line is returned, including empty ones and
/// ones that will not survive classification. A trailing block with no blank
/// line after it is dropped. Lines before the files section are matched as
/// raw bytes, so the environment make prints there need not be UTF-8.
pub fn scan<R: BufRead>(mut reader: R) -> MakesResult<Dump> {
    let mut buf = Vec::new();

    let version = if read_line(&mut reader, &mut buf)? {
        decode(&buf)?.replacen("# ", "", 1)
    } else {
        String::new()
    };
    debug!("Dump version line: {:?}", version);

    let mut found_marker = false;
    while read_line(&mut reader, &mut buf)? {
        if buf == FILES_MARKER.as_bytes() {
            found_marker = true;
            break;
        }
    }

    if !found_marker {
        debug!("No files section in dump");
        return Ok(Dump { version, blocks: Vec::new() });
    }

    // separator line right after the marker
    if !read_line(&mut reader, &mut buf)? {
        return Err(MakesError::UnexpectedEof);
    }

    let mut blocks = Vec::new();
    let mut current = RawBlock::default();
    while read_line(&mut reader, &mut buf)? {
        if buf.is_empty() {
            trace!("Closing block {:?}", current.name());
            blocks.push(std::mem::take(&mut current));
            continue;
        }
        current.push(decode(&buf)?);
    }

    if !current.is_empty() {
        trace!("Dropping unterminated block {:?}", current.name());
    }

    debug!("Scanned {} blocks", blocks.len());
    Ok(Dump { version, blocks })
}

/// Read one line into `buf` without its `\n` or `\r\n`; false at end of input
fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}

fn decode(line: &[u8]) -> io::Result<String> {
    std::str::from_utf8(line)
        .map(str::to_owned)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_str(input: &str) -> MakesResult<Dump> {
        scan(input.as_bytes())
    }

    #[test]
    fn test_version_line_strips_marker() {
        let dump = scan_str("# GNU Make 4.3\n").unwrap();
        assert_eq!(dump.version, "GNU Make 4.3");
        assert!(dump.blocks.is_empty());
    }

    #[test]
    fn test_version_line_without_marker_is_kept() {
        let dump = scan_str("GNU Make 4.3\n").unwrap();
        assert_eq!(dump.version, "GNU Make 4.3");
    }

    #[test]
    fn test_empty_input_yields_no_blocks() {
        let dump = scan_str("").unwrap();
        assert_eq!(dump, Dump::default());
    }

    #[test]
    fn test_missing_files_section_yields_no_blocks() {
        let dump = scan_str("# GNU Make 4.3\nfoo: bar\n\nbaz:\n\n").unwrap();
        assert!(dump.blocks.is_empty());
    }

    #[test]
    fn test_eof_after_marker_is_an_error() {
        let err = scan_str("# GNU Make 4.3\n# Files\n").unwrap_err();
        assert!(matches!(err, MakesError::UnexpectedEof));
        assert_eq!(err.to_string(), "unexpected end of input");
    }

    #[test]
    fn test_groups_lines_into_blocks() {
        let input = "# GNU Make 4.3\n\
                     # Files\n\
                     \n\
                     build: foo.o\n\
                     #  Last modified 2024-01-02 03:04:05\n\
                     \n\
                     clean:\n\
                     #  Phony target (prerequisite of .PHONY)\n\
                     \n";
        let dump = scan_str(input).unwrap();
        assert_eq!(dump.blocks.len(), 2);
        assert_eq!(dump.blocks[0].name(), "build");
        assert_eq!(dump.blocks[0].lines().len(), 2);
        assert_eq!(dump.blocks[1].name(), "clean");
    }

    #[test]
    fn test_consecutive_blank_lines_close_empty_blocks() {
        let dump = scan_str("v\n# Files\nsep\n\n\nfoo:\n\n").unwrap();
        assert_eq!(dump.blocks.len(), 3);
        assert!(dump.blocks[0].is_empty());
        assert!(dump.blocks[1].is_empty());
        assert_eq!(dump.blocks[2].name(), "foo");
    }

    #[test]
    fn test_separator_line_is_discarded_even_if_not_blank() {
        let dump = scan_str("v\n# Files\nfirst:\nsecond:\n\n").unwrap();
        assert_eq!(dump.blocks.len(), 1);
        assert_eq!(dump.blocks[0].lines(), ["second:".to_string()]);
    }

    #[test]
    fn test_unterminated_trailing_block_is_dropped() {
        let dump = scan_str("v\n# Files\n\nfoo:\n\nbar:").unwrap();
        assert_eq!(dump.blocks.len(), 1);
        assert_eq!(dump.blocks[0].name(), "foo");
    }

    #[test]
    fn test_crlf_line_endings() {
        let dump = scan_str("# v\r\n# Files\r\n\r\nfoo: bar\r\n\r\n").unwrap();
        assert_eq!(dump.version, "v");
        assert_eq!(dump.blocks.len(), 1);
        assert_eq!(dump.blocks[0].name(), "foo");
    }

    #[test]
    fn test_empty_block_name() {
        assert_eq!(RawBlock::default().name(), EMPTY_BLOCK_NAME);
        assert_eq!(RawBlock::new(vec!["no colon here".into()]).name(), "no colon here");
        assert_eq!(RawBlock::new(vec![":x".into()]).name(), "");
    }

    #[test]
    fn test_invalid_utf8_before_files_section_is_ignored() {
        let bytes: &[u8] = b"# GNU Make 4.3\n# environment\nLANG = caf\xe9\n# Files\n\nfoo:\n\n";
        let dump = scan(bytes).unwrap();
        assert_eq!(dump.blocks.len(), 1);
        assert_eq!(dump.blocks[0].name(), "foo");
    }

    #[test]
    fn test_invalid_utf8_is_a_read_error() {
        let bytes: &[u8] = b"v\n# Files\n\nfoo\xff:\n\n";
        let err = scan(bytes).unwrap_err();
        assert!(matches!(err, MakesError::Io(_)));
    }
}
