
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::fs::File;
use std::path::Path;

fn is_gzipped(filename: &Path) -> bool {
    filename.extension().unwrap_or_default() == "gz"
}

/// Helper function that loads a file into some type, helpful generic
/// # Arguments
/// * `filename` - the file path to open and parse
/// # Errors
/// * if the file does not open properly
/// * if the deserialization throws errors
pub fn load_json<T: serde::de::DeserializeOwned>(filename: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let fp = open_text_reader(filename)?;
    let result: T = serde_json::from_reader(fp)?;
    Ok(result)
}

/// This will save a generic serializable struct to JSON.
/// # Arguments
/// * `data` - the data in memory
/// * `out_filename` - user provided path to write to
/// # Errors
/// * if opening or writing to the file throw errors
/// * if JSON serialization throws errors
pub fn save_json<T: serde::Serialize>(data: &T, out_filename: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = create_text_writer(out_filename)?;
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    Ok(())
}

/// Opens a buffered reader for a plain or gzipped text file.
/// # Arguments
/// * `filename` - the file to open, decompressed when it ends with ".gz"
/// # Errors
/// * if the file does not open properly
pub fn open_text_reader(filename: &Path) -> Result<Box<dyn BufRead>, Box<dyn std::error::Error>> {
    let file = File::open(filename)?;
    let reader: Box<dyn BufRead> = if is_gzipped(filename) {
        Box::new(BufReader::new(flate2::read::MultiGzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };
    Ok(reader)
}

/// Creates a buffered writer for a plain or gzipped text file.
/// # Arguments
/// * `out_filename` - the file to create, compressed when it ends with ".gz"
/// # Errors
/// * if the file cannot be created
pub fn create_text_writer(out_filename: &Path) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    let file = File::create(out_filename)?;
    let writer: Box<dyn Write> = if is_gzipped(out_filename) {
        Box::new(BufWriter::new(
            flate2::write::GzEncoder::new(file, flate2::Compression::best())
        ))
    } else {
        Box::new(BufWriter::new(file))
    };
    Ok(writer)
}
