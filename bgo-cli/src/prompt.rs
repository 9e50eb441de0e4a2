use std::io::{self, BufRead, Write};

/// Print `message`, then offer the full error chain behind a `[y/N]` prompt.
pub fn handle_error<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    err: &anyhow::Error,
    message: &str,
) -> io::Result<()> {
    writeln!(out, "{message}")?;
    write!(out, "Do you want to see the full error? [y/N]: ")?;
    out.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    if answer.trim().eq_ignore_ascii_case("y") {
        writeln!(out, "{err:#}")?;
    }

    Ok(())
}
