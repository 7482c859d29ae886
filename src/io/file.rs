//! Input/Output file handling with [`InputFile`] and [`OutputFile`].
//!
//! These types abstract over reading/writing both plaintext and gzip-compressed
//! input/output.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Check if a file is a gzipped by looking for the magic numbers
fn is_gzipped_file(file_path: impl AsRef<Path>) -> io::Result<bool> {
    let file = File::open(file_path.as_ref())?;
    let mut buffer = Vec::with_capacity(2);
    // files shorter than the magic number are just not gzipped
    file.take(2).read_to_end(&mut buffer)?;
    Ok(buffer == [0x1f, 0x8b])
}

/// Represents an input file.
///
/// This abstracts how data is read in, allowing for both plaintext and gzip-compressed input
/// to be read through a common interface.
#[derive(Clone, Debug)]
pub struct InputFile {
    pub filepath: PathBuf,
}

impl InputFile {
    /// Constructs a new `InputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - the path to the file. Gzip-compressed files are detected by their
    /// magic number, and uncompressed automatically.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            filepath: filepath.into(),
        }
    }

    /// Opens the file and returns a buffered reader.
    ///
    /// # Returns
    ///
    /// A result containing a `BufReader<Box<dyn Read>>` on success, or an `io::Error` on
    /// failure.
    pub fn reader(&self) -> io::Result<BufReader<Box<dyn Read>>> {
        let file = File::open(&self.filepath)?;
        let is_gzipped = is_gzipped_file(&self.filepath)?;
        let reader: Box<dyn Read> = if is_gzipped {
            Box::new(GzDecoder::new(file))
        } else {
            Box::new(file)
        };
        Ok(BufReader::new(reader))
    }

    /// Read the whole (possibly decompressed) file into a `String`.
    pub fn read_to_string(&self) -> io::Result<String> {
        let mut contents = String::new();
        self.reader()?.read_to_string(&mut contents)?;
        Ok(contents)
    }
}

enum OutputDestination {
    File(PathBuf),
    Stdout,
}

/// Represents an output file.
///
/// This struct is used to handle operations on an output file, such as writing to the file.
/// This abstracts writing both plaintext and gzip-compressed files.
pub struct OutputFile {
    destination: OutputDestination,
}

impl OutputFile {
    /// Constructs a new `OutputFile`.
    ///
    /// # Arguments
    ///
    /// * `filepath` - the path to the file. If the file extension is `.gz`, `OutputFile`
    /// will automatically write gzip-compressed output.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self {
            destination: OutputDestination::File(filepath.into()),
        }
    }

    /// Constructs a new [`OutputFile`] for standard output.
    pub fn new_stdout() -> Self {
        Self {
            destination: OutputDestination::Stdout,
        }
    }

    /// Opens the file and returns a writer.
    ///
    /// # Returns
    ///
    /// A result containing a `Box<dyn Write>` on success, or an `io::Error` on failure.
    pub fn writer(&self) -> io::Result<Box<dyn Write>> {
        let writer: Box<dyn Write> = match &self.destination {
            OutputDestination::File(path) => {
                let is_gzip = path.extension().map_or(false, |ext| ext == "gz");
                if is_gzip {
                    Box::new(BufWriter::new(GzEncoder::new(
                        File::create(path)?,
                        Compression::default(),
                    )))
                } else {
                    Box::new(BufWriter::new(File::create(path)?))
                }
            }
            OutputDestination::Stdout => Box::new(BufWriter::new(io::stdout())),
        };
        Ok(writer)
    }
}
