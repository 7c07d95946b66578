// crates/catalog-sync-cli/src/prompt.rs
// ============================================================================
// Module: Confirmation Prompt
// Description: Yes/no confirmation over arbitrary reader and writer handles.
// Purpose: Resolve the proceed decision before the engine is invoked.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Only `y` or `Y` (surrounding whitespace ignored) confirms. Anything else,
//! including end of input, declines.

use std::io;
use std::io::BufRead;
use std::io::Write;

/// Suffix appended to every question.
const CHOICES: &str = "[y/N]";

/// Asks `question` on `output` and reads one answer line from `input`.
///
/// # Errors
///
/// Returns IO errors from writing the question or reading the answer.
pub fn confirm<R, W>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool>
where
    R: BufRead + ?Sized,
    W: Write + ?Sized,
{
    write!(output, "{question} {CHOICES} ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y"))
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use std::io::Cursor;

    use super::confirm;

    fn answer(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let confirmed = confirm("Remove BYE?", &mut Cursor::new(input), &mut output).expect("prompt");
        (confirmed, String::from_utf8(output).expect("utf-8"))
    }

    #[test]
    fn lowercase_and_uppercase_y_confirm() {
        assert!(answer("y\n").0);
        assert!(answer("Y\r\n").0);
        assert!(answer("  y  \n").0);
    }

    #[test]
    fn other_answers_and_eof_decline() {
        assert!(!answer("yes\n").0);
        assert!(!answer("n\n").0);
        assert!(!answer("\n").0);
        assert!(!answer("").0);
    }

    #[test]
    fn question_is_written_with_choices() {
        assert_eq!(answer("n\n").1, "Remove BYE? [y/N] ");
    }
}
