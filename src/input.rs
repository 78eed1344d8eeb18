use std::io::{self, BufRead};

/// Reads one raw line, newline included. `None` at end of input.
///
/// Invalid UTF-8 is replaced rather than rejected; the bytes only ever end up
/// as program arguments or file names.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buf = Vec::new();

    match reader.read_until(b'\n', &mut buf)? {
        0 => Ok(None),
        _ => Ok(Some(String::from_utf8_lossy(&buf).into_owned())),
    }
}
