use std::io::Write;

use crate::error::Result;

use super::model::Package;

/// Render packages as pretty-printed JSON documents, each followed by a
/// newline.
///
/// `<`, `>` and `&` are written literally, not as `\u003c`-style escapes.
pub fn render_packages(packages: &[Package]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    for package in packages {
        serde_json::to_writer_pretty(&mut buf, package)?;
        buf.push(b'\n');
    }
    Ok(buf)
}

pub fn write_packages<W: Write>(packages: &[Package], writer: &mut W) -> Result<()> {
    let buf = render_packages(packages)?;
    writer.write_all(&buf)?;
    writer.flush()?;
    Ok(())
}
