//! Frame sources and landmark extraction
//!
//! Camera capture and keypoint detection live outside Kelp. The runtime sees
//! them through two seams:
//! - `FrameSource` yields raw frames until end of stream
//! - `LandmarkExtractor` turns an admitted frame into `FrameLandmarks`
//!
//! The bundled implementations replay extractor output recorded as JSON
//! lines, one captured frame per line.

use std::fs::File;
use std::io::{BufRead, BufReader, Stdin, StdinLock};
use std::path::Path;

use tracing::debug;

use kelp_core::{FrameLandmarks, KelpError, KelpResult};

/// Produces captured frames
pub trait FrameSource {
    type Frame;

    /// Next frame, `Ok(None)` at end of stream
    ///
    /// An `Err` is a failed read; the capture loop stops on it.
    fn read_frame(&mut self) -> KelpResult<Option<Self::Frame>>;
}

/// Finds landmarks in a frame
///
/// Never fails: anything it cannot make sense of is "no detection".
pub trait LandmarkExtractor<F> {
    fn extract(&mut self, frame: &F) -> FrameLandmarks;
}

/// One raw line of extractor output, line terminator stripped
///
/// Kept as bytes; a line that is not UTF-8 is still a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandmarkRecord {
    /// 1-based line number
    pub line: u64,
    pub bytes: Vec<u8>,
}

impl LandmarkRecord {
    pub fn new(line: u64, bytes: impl Into<Vec<u8>>) -> Self {
        LandmarkRecord {
            line,
            bytes: bytes.into(),
        }
    }
}

/// Reads one record per line from any buffered reader
pub struct JsonLinesSource<R> {
    reader: R,
    line: u64,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn from_reader(reader: R) -> Self {
        JsonLinesSource { reader, line: 0 }
    }

    /// Lines read so far
    pub fn lines_read(&self) -> u64 {
        self.line
    }
}

impl JsonLinesSource<BufReader<File>> {
    /// Open a recording; failure here is a startup error
    pub fn open(path: &Path) -> KelpResult<Self> {
        let file = File::open(path).map_err(|e| {
            KelpError::CaptureUnavailable(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl JsonLinesSource<StdinLock<'static>> {
    /// Read records piped in on stdin
    pub fn stdin() -> Self {
        let stdin: Stdin = std::io::stdin();
        Self::from_reader(stdin.lock())
    }
}

impl<R: BufRead> FrameSource for JsonLinesSource<R> {
    type Frame = LandmarkRecord;

    fn read_frame(&mut self) -> KelpResult<Option<LandmarkRecord>> {
        let mut bytes = Vec::new();
        let read = self
            .reader
            .read_until(b'\n', &mut bytes)
            .map_err(|e| KelpError::FrameReadFailed(e.to_string()))?;

        if read == 0 {
            return Ok(None);
        }

        self.line += 1;
        while matches!(bytes.last(), Some(b'\n' | b'\r')) {
            bytes.pop();
        }

        Ok(Some(LandmarkRecord::new(self.line, bytes)))
    }
}

/// Parses `LandmarkRecord`s as `FrameLandmarks` JSON
///
/// Blank lines, non-UTF-8 lines and unparsable records count as frames with
/// no detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLandmarkExtractor;

impl LandmarkExtractor<LandmarkRecord> for JsonLandmarkExtractor {
    fn extract(&mut self, record: &LandmarkRecord) -> FrameLandmarks {
        let text = match std::str::from_utf8(&record.bytes) {
            Ok(text) => text.trim(),
            Err(e) => {
                debug!("Line {}: not UTF-8, treating as no detection: {}", record.line, e);
                return FrameLandmarks::empty();
            }
        };
        if text.is_empty() {
            return FrameLandmarks::empty();
        }

        match serde_json::from_str(text) {
            Ok(landmarks) => landmarks,
            Err(e) => {
                debug!("Line {}: unreadable landmarks, treating as no detection: {}", record.line, e);
                FrameLandmarks::empty()
            }
        }
    }
}

/// Source over any iterator of frames
pub struct IterSource<I> {
    frames: I,
}

impl<I: Iterator> IterSource<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(frames: T) -> Self {
        IterSource {
            frames: frames.into_iter(),
        }
    }
}

impl<I: Iterator> FrameSource for IterSource<I> {
    type Frame = I::Item;

    fn read_frame(&mut self) -> KelpResult<Option<I::Item>> {
        Ok(self.frames.next())
    }
}

/// Extractor for sources that already yield landmarks
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughExtractor;

impl LandmarkExtractor<FrameLandmarks> for PassthroughExtractor {
    fn extract(&mut self, frame: &FrameLandmarks) -> FrameLandmarks {
        frame.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_json_lines_source_reads_until_eof() {
        let mut source = JsonLinesSource::from_reader(Cursor::new("{}\n\n{\"hands\": []}\r\n"));

        let first = source.read_frame().unwrap().unwrap();
        assert_eq!(first, LandmarkRecord::new(1, "{}"));

        let blank = source.read_frame().unwrap().unwrap();
        assert!(blank.bytes.is_empty());

        let third = source.read_frame().unwrap().unwrap();
        assert_eq!(third.bytes, b"{\"hands\": []}");

        assert!(source.read_frame().unwrap().is_none());
        assert_eq!(source.lines_read(), 3);
    }

    #[test]
    fn test_open_missing_file_is_capture_error() {
        let result = JsonLinesSource::open(Path::new("/nonexistent/landmarks.jsonl"));
        assert!(matches!(result, Err(KelpError::CaptureUnavailable(_))));
    }

    #[test]
    fn test_extractor_defaults_to_no_detection() {
        let mut extractor = JsonLandmarkExtractor;

        for text in ["", "   ", "not json", r#"{"pose": [1, 2, 3]}"#] {
            let record = LandmarkRecord::new(1, text);
            assert!(extractor.extract(&record).is_empty(), "{:?}", text);
        }
    }

    #[test]
    fn test_non_utf8_line_is_a_frame() {
        let mut source = JsonLinesSource::from_reader(Cursor::new(b"\xff\xfe\n{}\n".to_vec()));

        let bad = source.read_frame().unwrap().unwrap();
        assert_eq!(bad, LandmarkRecord::new(1, vec![0xff, 0xfe]));
        assert!(JsonLandmarkExtractor.extract(&bad).is_empty());

        assert_eq!(source.read_frame().unwrap().unwrap().line, 2);
    }

    #[test]
    fn test_iter_source() {
        let mut source = IterSource::new(vec![FrameLandmarks::empty(); 2]);
        assert!(source.read_frame().unwrap().is_some());
        assert!(source.read_frame().unwrap().is_some());
        assert!(source.read_frame().unwrap().is_none());
    }
}
