//! Store file layout
//!
//! Header lines are written unquoted; every data line has all fields
//! double-quoted with embedded quotes doubled.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Header line of the primary store
pub const MOVIES_HEADER: &str = "Title,DetailUrl,DownloadLink";

/// Header line of the failed store
pub const FAILED_HEADER: &str = "Title,DetailUrl";

/// Creates the file with its header line if it does not exist yet
///
/// Returns true if the file was created.
pub fn ensure_store_file(path: &Path, header: &str) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    writeln!(file, "{}", header)?;
    file.sync_all()?;
    Ok(true)
}

/// Opens a store file for appending, terminating a dangling last line first
///
/// Files rewritten by older tools may lack a final newline; appending to
/// them directly would glue the new record onto the last one.
pub fn open_for_append(path: &Path) -> io::Result<File> {
    let mut file = OpenOptions::new().read(true).append(true).open(path)?;

    let len = file.metadata()?.len();
    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            file.write_all(b"\n")?;
        }
    }

    Ok(file)
}
