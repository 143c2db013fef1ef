use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// A log file that could not be opened, or failed part way through reading.
#[derive(Debug, Error)]
#[error("failed to load file '{}': {source}", .path.display())]
pub struct FileLoadError {
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl FileLoadError {
    pub fn new(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self { path: path.into(), source }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file simply doesn't exist, as opposed to any other I/O failure.
    pub fn is_not_found(&self) -> bool {
        self.source.kind() == io::ErrorKind::NotFound
    }
}

/// Lazily reads a log file one trimmed line at a time.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. The file handle lives as long as the `LineSource`.
/// After the first read error the source yields that error once and then stops.
pub struct LineSource {
    path: PathBuf,
    reader: Option<BufReader<File>>,
}

impl LineSource {
    /// Open the file at `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FileLoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|error| FileLoadError::new(path, error))?;
        Ok(Self {
            path: path.to_owned(),
            reader: Some(BufReader::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for LineSource {
    type Item = Result<String, FileLoadError>;

    fn next(&mut self) -> Option<Self::Item> {
        match read_line(self.reader.as_mut()?) {
            Ok(Some(line)) => Some(Ok(line.trim().to_owned())),
            Ok(None) => {
                self.reader = None;
                None
            }
            Err(error) => {
                // Drop the reader so the handle is released and nothing more is yielded
                self.reader = None;
                Some(Err(FileLoadError::new(&self.path, error)))
            }
        }
    }
}

/// Read one line terminated by `\n`, `\r\n` or `\r`, without the terminator.
/// Returns `None` at end of file.
fn read_line(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    loop {
        let (terminator, used) = {
            let available = reader.fill_buf()?;
            if available.is_empty() {
                // End of file: the last line may have no terminator
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(end) => {
                    line.extend_from_slice(&available[..end]);
                    (Some(available[end]), end + 1)
                }
                None => {
                    line.extend_from_slice(available);
                    (None, available.len())
                }
            }
        };
        reader.consume(used);
        match terminator {
            Some(b'\r') => {
                // Swallow the \n of a \r\n pair, which may start the next buffer
                if reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                break;
            }
            Some(_) => break,
            None => {}
        }
    }
    String::from_utf8(line).map(Some).map_err(|error| io::Error::new(io::ErrorKind::InvalidData, error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn log_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn test_yields_trimmed_lines_in_order() {
        let file = log_file(
            b"2025-03-28 12:44:46,000 INFO django.request: GET /api/v1/reviews/ 204 OK [192.168.1.59]\r\n  \
              padded line \t\n\nlast",
        );
        let lines: Vec<_> = LineSource::open(file.path()).unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(
            lines,
            vec![
                "2025-03-28 12:44:46,000 INFO django.request: GET /api/v1/reviews/ 204 OK [192.168.1.59]",
                "padded line",
                "",
                "last",
            ]
        );
    }

    #[test]
    fn test_splits_on_every_line_ending() {
        let file = log_file(b"a\rb\r\nc\n");
        let lines: Vec<_> = LineSource::open(file.path()).unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_carriage_return_only_log() {
        let file = log_file(b"INFO GET /api/v1/a/ 200\rERROR GET /api/v1/b/ 500\rWARNING GET /api/v1/a/ 404\r");
        let lines: Vec<_> = LineSource::open(file.path()).unwrap().map(|l| l.unwrap()).collect();
        assert_eq!(
            lines,
            vec!["INFO GET /api/v1/a/ 200", "ERROR GET /api/v1/b/ 500", "WARNING GET /api/v1/a/ 404"]
        );
    }

    #[test]
    fn test_blank_lines_between_mixed_endings() {
        let mut reader = io::Cursor::new(&b"a\r\r\nb\n\nc\r"[..]);
        let mut lines = Vec::new();
        while let Some(line) = read_line(&mut reader).unwrap() {
            lines.push(line);
        }
        assert_eq!(lines, vec!["a", "", "b", "", "c"]);
    }

    #[test]
    fn test_crlf_split_across_buffers() {
        // A two byte buffer puts the \r and \n of "a\r\n" in separate fills
        let mut reader = BufReader::with_capacity(2, &b"a\r\ncd"[..]);
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("a"));
        assert_eq!(read_line(&mut reader).unwrap().as_deref(), Some("cd"));
        assert_eq!(read_line(&mut reader).unwrap(), None);
    }

    #[test]
    fn test_first_line_has_log_shape() {
        let file = log_file(b"2025-03-28 12:40:47,000 CRITICAL django.core.management: DatabaseError: Deadlock\n");
        let line = LineSource::open(file.path()).unwrap().next().unwrap().unwrap();
        let tokens: Vec<_> = line.split_whitespace().collect();
        assert!(tokens.len() >= 4);
        assert_eq!(tokens[2], "CRITICAL");
    }

    #[test]
    fn test_empty_file_yields_nothing() {
        let file = log_file(b"");
        assert!(LineSource::open(file.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app1.lo");
        let error = LineSource::open(&path).err().unwrap();
        assert!(error.is_not_found());
        assert_eq!(error.path(), path);
        assert!(error.to_string().contains("app1.lo"));
    }

    #[test]
    fn test_directory_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        // Depending on the platform, opening a directory fails either at open or at the first read
        match LineSource::open(dir.path()) {
            Err(error) => assert!(!error.is_not_found()),
            Ok(mut source) => assert!(matches!(source.next(), Some(Err(_)))),
        }
    }

    #[test]
    fn test_stops_after_invalid_utf8() {
        let file = log_file(b"first\n\xff\xfe broken\nthird\n");
        let mut source = LineSource::open(file.path()).unwrap();
        assert_eq!(source.path(), file.path());
        assert_eq!(source.next().unwrap().unwrap(), "first");
        let error = source.next().unwrap().unwrap_err();
        assert_eq!(error.path(), file.path());
        assert!(source.next().is_none());
    }
}
