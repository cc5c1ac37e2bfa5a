use std::fs;
use std::io;
use std::path::Path;

use log::warn;

use crate::error::ErrorKind;

/// Reads a whole file as UTF-8 text, classifying failures.
pub fn load_text(path: &str) -> Result<String, ErrorKind> {
    let p = Path::new(path);

    match fs::metadata(p) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            warn!("{}: not a regular file", path);
            return Err(ErrorKind::FileNotFound);
        }
        Err(e) => return Err(classify(path, &e)),
    }

    let bytes = fs::read(p).map_err(|e| classify(path, &e))?;

    String::from_utf8(bytes).map_err(|e| {
        warn!("{}: invalid UTF-8 at byte {}", path, e.utf8_error().valid_up_to());
        ErrorKind::DecodeFailed
    })
}

fn classify(path: &str, err: &io::Error) -> ErrorKind {
    warn!("{}: {}", path, err);
    match err.kind() {
        io::ErrorKind::NotFound => ErrorKind::FileNotFound,
        _ => ErrorKind::ReadFailed,
    }
}
