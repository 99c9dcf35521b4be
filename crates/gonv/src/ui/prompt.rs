use anyhow::{Result, bail};
use console::{Term, style};

/// Ask a yes/no question on the terminal. Refuses when there is no
/// terminal to ask on.
pub fn confirm(question: &str) -> Result<bool> {
    let term = Term::stderr();
    if !term.is_term() {
        bail!("{question}: no terminal to confirm on; pass --force");
    }
    term.write_str(&format!("{} {question} [y/N] ", style("?").yellow().bold()))?;
    let answer = term.read_line()?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
