//! Interactive input/output for commands
//!
//! Commands print through [`Console::out`] and prompt through
//! [`Console::ask`] / [`Console::confirm`], so tests can drive them with
//! in-memory buffers.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};

pub struct Console<R, W> {
    input: R,
    pub out: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    /// Print `prompt` and read one trimmed line
    pub fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            bail!("failed to read input: end of input");
        }
        Ok(line.trim().to_string())
    }

    /// Yes/no question defaulting to no
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self
            .ask(&format!("{question} (y/N): "))
            .context("failed to read confirmation")?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) type TestConsole = Console<Cursor<Vec<u8>>, Vec<u8>>;

    pub(crate) fn console(input: &str) -> TestConsole {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    pub(crate) fn output(console: &TestConsole) -> String {
        String::from_utf8_lossy(&console.out).into_owned()
    }

    #[test]
    fn test_ask_trims_and_echoes_prompt() {
        let mut c = console("  my-config  \nnext\n");
        assert_eq!(c.ask("Name: ").unwrap(), "my-config");
        assert_eq!(c.ask("Again: ").unwrap(), "next");
        assert_eq!(output(&c), "Name: Again: ");
    }

    #[test]
    fn test_ask_fails_at_end_of_input() {
        let mut c = console("");
        assert!(c.ask("Name: ").is_err());
    }

    #[test]
    fn test_confirm_answers() {
        for (input, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false), ("sure\n", false)] {
            let mut c = console(input);
            assert_eq!(c.confirm("Continue?").unwrap(), expected, "input {input:?}");
        }
    }

    #[test]
    fn test_confirm_formats_question() {
        let mut c = console("y\n");
        c.confirm("Continue?").unwrap();
        assert_eq!(output(&c), "Continue? (y/N): ");
    }
}
