use std::io::{self, Write};

pub fn write_stdout_text(text: &str) -> io::Result<()> {
    write_tolerant(&mut io::stdout().lock(), text, false)
}

pub fn write_stdout_line(text: &str) -> io::Result<()> {
    write_tolerant(&mut io::stdout().lock(), text, true)
}

pub fn write_stderr_line(text: &str) -> io::Result<()> {
    write_tolerant(&mut io::stderr().lock(), text, true)
}

/// Writes and flushes, treating a closed pipe (`alugueis ... | head`) as success.
fn write_tolerant(writer: &mut dyn Write, text: &str, newline: bool) -> io::Result<()> {
    let written = writer
        .write_all(text.as_bytes())
        .and_then(|()| if newline { writer.write_all(b"\n") } else { Ok(()) })
        .and_then(|()| writer.flush());
    match written {
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}
