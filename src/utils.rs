use std::fmt::Formatter;

/// `Debug` helper for error enums: prints the error, followed by every
/// `source()` in the chain. Shows up in logs via `error.cause_chain=?e`.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }
    Ok(())
}
