//! Line-oriented readers for recorded game results.
//!
//! Two historical layouts are accepted and adapted to [`GameRecord`]:
//! one packed state per line, or a packed state followed by
//! whitespace-separated auxiliary integers (`state moves`). Blank lines are
//! skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::board::Board;
use crate::error::StatsError;
use crate::record::GameRecord;

#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Record { line: usize, source: StatsError },
    #[error("line {line}: auxiliary field {value:?} is not an unsigned integer")]
    Aux { line: usize, value: String },
    #[error("no input files found under {}", .0.display())]
    NoInputs(PathBuf),
}

/// Parse one line; `Ok(None)` for a blank line.
pub fn parse_record(line: usize, text: &str) -> Result<Option<GameRecord>, InputError> {
    let mut fields = text.split_whitespace();
    let Some(state) = fields.next() else {
        return Ok(None);
    };
    let state: Board = state.parse().map_err(|source| InputError::Record { line, source })?;
    let aux = fields
        .map(|field| {
            field
                .parse::<u64>()
                .map_err(|_| InputError::Aux { line, value: field.to_string() })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Some(GameRecord::with_aux(state, aux)))
}

/// Iterator over the records of a reader, with 1-based line numbers in errors.
pub struct RecordReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: 0 }
    }

    /// Last line number consumed.
    pub fn line(&self) -> usize {
        self.line
    }
}

impl RecordReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        let f = File::open(path)?;
        Ok(Self::new(BufReader::new(f)))
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<GameRecord, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let text = match self.lines.next()? {
                Ok(text) => text,
                Err(e) => return Some(Err(e.into())),
            };
            self.line += 1;
            match parse_record(self.line, &text) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Read every record of a file, failing on the first bad line.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<Vec<GameRecord>, InputError> {
    RecordReader::open(path)?.collect()
}

/// Resolve an input path: a file is used as-is, a directory is walked
/// recursively for files ending in `extension`, sorted by path.
pub fn collect_inputs<P: AsRef<Path>>(path: P, extension: &str) -> Result<Vec<PathBuf>, InputError> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(InputError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some(extension))
        .collect();
    files.sort();
    if files.is_empty() {
        return Err(InputError::NoInputs(path.to_path_buf()));
    }
    Ok(files)
}
