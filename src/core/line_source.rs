// src/core/line_source.rs
use crate::error::LexiconError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Reads a dictionary file one meaningful line at a time.
///
/// Blank lines, lines starting with `#` or `<!`, inline `#` comments and
/// `<!-- ... -->` spans (also across lines) are dropped. Only one comment
/// span per line is recognised. Returned lines keep their leading
/// whitespace; trailing whitespace is removed.
pub struct LineSource<R> {
    reader: Option<R>,
    file_name: String,
    line_number: usize,
}

impl LineSource<BufReader<File>> {
    /// Opens `path`. `kind` names the dictionary in the error message.
    pub fn open(path: &Path, kind: &'static str) -> Result<Self, LexiconError> {
        let file = File::open(path).map_err(|source| LexiconError::FileNotFound {
            kind,
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_reader(BufReader::new(file), path.display().to_string()))
    }
}

impl<R> LineSource<R> {
    pub fn from_reader(reader: R, file_name: impl Into<String>) -> Self {
        Self { reader: Some(reader), file_name: file_name.into(), line_number: 0 }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// 1-based number of the last physical line read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Releases the underlying reader. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.reader.take().is_some() {
            tracing::debug!(file = %self.file_name, lines = self.line_number, "closed dictionary file");
        }
    }
}

impl<R: BufRead> LineSource<R> {
    /// Next cleaned line, or `None` at end of input (also when a comment
    /// is left open at end of file).
    pub fn next_line(&mut self) -> Result<Option<String>, LexiconError> {
        loop {
            let Some(raw) = self.read_raw()? else {
                return Ok(None);
            };
            // a comment opening the line may run over several lines
            let raw = match raw.trim_start().strip_prefix(COMMENT_OPEN) {
                Some(after_open) => match after_open.find(COMMENT_CLOSE) {
                    Some(close) => after_open[close + COMMENT_CLOSE.len()..].to_string(),
                    None => match self.skip_to_comment_close()? {
                        Some(rest) => rest,
                        None => return Ok(None),
                    },
                },
                None => raw,
            };
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("<!") {
                continue;
            }

            let mut line = match raw.find('#') {
                Some(pos) => raw[..pos].to_string(),
                None => raw,
            };

            if let Some(open) = line.find(COMMENT_OPEN) {
                let after_open = &line[open + COMMENT_OPEN.len()..];
                let tail = match after_open.find(COMMENT_CLOSE) {
                    Some(close) => after_open[close + COMMENT_CLOSE.len()..].to_string(),
                    None => match self.skip_to_comment_close()? {
                        Some(rest) => rest,
                        None => return Ok(None),
                    },
                };
                line.truncate(open);
                line.push_str(&tail);
            }

            if !line.trim().is_empty() {
                let end = line.trim_end().len();
                line.truncate(end);
                return Ok(Some(line));
            }
        }
    }

    /// Consumes lines until one contains `-->`; returns the text after it.
    fn skip_to_comment_close(&mut self) -> Result<Option<String>, LexiconError> {
        while let Some(raw) = self.read_raw()? {
            if let Some(close) = raw.find(COMMENT_CLOSE) {
                return Ok(Some(raw[close + COMMENT_CLOSE.len()..].to_string()));
            }
        }
        tracing::warn!(file = %self.file_name, "comment left open at end of file");
        Ok(None)
    }

    fn read_raw(&mut self) -> Result<Option<String>, LexiconError> {
        let Some(reader) = self.reader.as_mut() else {
            return Ok(None);
        };
        let mut buf = String::new();
        let read = reader.read_line(&mut buf).map_err(|source| LexiconError::Read {
            file: self.file_name.clone(),
            line: self.line_number,
            source,
        })?;
        if read == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        let end = buf.trim_end_matches(['\n', '\r']).len();
        buf.truncate(end);
        Ok(Some(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn lines(text: &str) -> Vec<String> {
        let mut source = LineSource::from_reader(Cursor::new(text.to_string()), "test");
        let mut out = Vec::new();
        while let Some(line) = source.next_line().unwrap() {
            out.push(line);
        }
        out
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "# header\n\n   \n<!-- one liner -->\nGRANT [070] # jw 11/14/91\n";
        assert_eq!(lines(text), vec!["GRANT [070]"]);
    }

    #[test]
    fn strips_inline_xml_comment() {
        assert_eq!(lines("some <!-- note --> more\n"), vec!["some  more"]);
    }

    #[test]
    fn multi_line_comment_resumes_after_close() {
        let text = "KEEP <!-- start\nhidden\nstill hidden --> TAIL\nNEXT\n";
        assert_eq!(lines(text), vec!["KEEP  TAIL", "NEXT"]);
    }

    #[test]
    fn comment_block_opening_a_line_is_skipped() {
        let text = "<!-- header block\nSPY [~SPY]\n-->\nPRESIDENT [~GOVPRS]\n  <!-- a\nb --> TAIL\n";
        assert_eq!(lines(text), vec!["PRESIDENT [~GOVPRS]", " TAIL"]);
    }

    #[test]
    fn unclosed_comment_ends_input() {
        assert_eq!(lines("A\nB <!-- never closed\nC\n"), vec!["A"]);
    }

    #[test]
    fn leading_tab_is_preserved_and_lines_counted() {
        let mut source = LineSource::from_reader(Cursor::new("\n\t[AFGGOV 791227-861124]\n"), "actors");
        assert_eq!(source.next_line().unwrap().as_deref(), Some("\t[AFGGOV 791227-861124]"));
        assert_eq!(source.line_number(), 2);
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn close_is_idempotent() {
        let mut source = LineSource::from_reader(Cursor::new("A\n"), "x");
        source.close();
        source.close();
        assert_eq!(source.next_line().unwrap(), None);
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = LineSource::open(Path::new("/definitely/not/here.verbs"), "verb").err().unwrap();
        assert!(matches!(err, LexiconError::FileNotFound { kind: "verb", .. }));
    }
}
