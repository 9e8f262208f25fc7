use crate::constants::GZIP_MAGIC_BYTES;
use crate::Error;
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Reads a text source from disk, transparently decompressing it when it is
/// gzip-compressed.
///
/// Fails with `Error::FileNotFound` if the path does not exist, and with
/// `Error::InvalidInput` if it is not a regular file or is not valid UTF-8.
pub fn read_text_file(path: &Path) -> Result<String, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    if !path.is_file() {
        return Err(Error::InvalidInput(format!(
            "'{}' is not a regular file",
            path.display()
        )));
    }

    let bytes = fs::read(path)?;

    decode_text_bytes(&bytes).map_err(|err| match err {
        Error::InvalidInput(msg) => Error::InvalidInput(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// Reads a text source from any reader, transparently decompressing it when
/// it is gzip-compressed.
pub fn read_text_reader<R: Read>(mut reader: R) -> Result<String, Error> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    decode_text_bytes(&bytes)
}

/// Decodes raw bytes as UTF-8 text, decompressing them first if they carry
/// the gzip magic header.
pub fn decode_text_bytes(bytes: &[u8]) -> Result<String, Error> {
    if bytes.starts_with(&GZIP_MAGIC_BYTES) {
        let mut decoder = GzDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder.read_to_end(&mut decompressed)?;

        return String::from_utf8(decompressed)
            .map_err(|e| Error::InvalidInput(format!("Decompressed content is not UTF-8: {}", e)));
    }

    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::InvalidInput(format!("Content is not UTF-8: {}", e)))
}
