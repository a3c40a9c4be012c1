use crate::{statics::ESCAPED_NEW_LINE, types::Error};
use encoding_rs::Encoding;
use log::warn;
use serde::Serialize;
use std::{
    fs::{read, read_dir, write, DirEntry},
    path::{Path, PathBuf},
};

/// Decodes game text. Files are UTF-8 (possibly with a BOM), older builds shipped GB18030.
/// Returns the encoding that decoded the bytes cleanly, or `None` when neither did and the
/// text was decoded lossily.
pub fn decode_text(bytes: &[u8]) -> (String, Option<&'static Encoding>) {
    for encoding in [encoding_rs::UTF_8, encoding_rs::GB18030] {
        let (decoded, _, had_errors): (_, &'static Encoding, bool) = encoding.decode(bytes);

        if !had_errors {
            return (decoded.into_owned(), Some(encoding));
        }
    }

    (String::from_utf8_lossy(bytes).into_owned(), None)
}

pub fn read_game_text(path: &Path) -> Result<String, Error> {
    let bytes: Vec<u8> = read(path).map_err(|err| Error::ReadFileFailed {
        file: path.to_path_buf(),
        err,
    })?;

    let (text, encoding) = decode_text(&bytes);

    match encoding {
        Some(encoding) if encoding != encoding_rs::UTF_8 => {
            warn!("{}: not valid UTF-8, decoded as {}", path.display(), encoding.name());
        }
        None => warn!("{}: neither UTF-8 nor GB18030, invalid bytes replaced", path.display()),
        Some(_) => {}
    }

    Ok(text)
}

/// Splits text the way the game indexes it: on `\n`, with the `\n` escape sequence
/// expanded into a real line break inside each line. A trailing `\r` is dropped.
pub fn split_game_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line: &str| {
            line.strip_suffix('\r')
                .unwrap_or(line)
                .replace(ESCAPED_NEW_LINE, "\n")
        })
        .collect()
}

/// Lists `*.txt` files of `dir` (non-recursive), sorted by file name.
pub fn list_txt_files(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let entries = read_dir(dir).map_err(|err| Error::ReadDirFailed {
        dir: dir.to_path_buf(),
        err,
    })?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .filter(|entry: &DirEntry| entry.file_type().is_ok_and(|file_type| file_type.is_file()))
        .map(|entry: DirEntry| entry.path())
        .filter(|path: &PathBuf| path.extension().is_some_and(|extension| extension == "txt"))
        .collect();

    files.sort_by(|a: &PathBuf, b: &PathBuf| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn write_text(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), Error> {
    write(path, contents).map_err(|err| Error::WriteFileFailed {
        file: path.to_path_buf(),
        err,
    })
}

/// Writes `value` as two-space indented JSON, keeping map insertion order.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Error> {
    let json: String = sonic_rs::to_string_pretty(value).map_err(|err| Error::JSONSerializeFailed {
        file: path.to_path_buf(),
        err,
    })?;

    write_text(path, json)
}
