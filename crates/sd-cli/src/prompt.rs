use std::io::{self, BufRead, Write};

/// Asks a y/N question on stdin. Anything but `y`/`yes` declines.
pub fn confirm(question: &str) -> Result<bool, String> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    confirm_with(question, &mut stdin.lock(), &mut stdout.lock())
}

pub fn confirm_with<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> Result<bool, String> {
    write!(output, "{} (y/N): ", question)
        .and_then(|_| output.flush())
        .map_err(|e| format!("Failed to write prompt: {}", e))?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| format!("Failed to read answer: {}", e))?;

    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
