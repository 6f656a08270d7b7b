use crate::domain::ports::Confirm;
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// 從輸入串流讀取 y/N 回答，只有 `y` 或 `Y` 視為同意
pub struct StdinConfirm<R, W> {
    input: R,
    output: W,
}

impl StdinConfirm<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> StdinConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Confirm for StdinConfirm<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{} [y/N] ", question)?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(input: &str) -> (bool, String) {
        let mut output = Vec::new();
        let answer = StdinConfirm::new(input.as_bytes(), &mut output)
            .confirm("Do you want to proceed with the transfer?")
            .unwrap();
        (answer, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_only_y_confirms() {
        assert!(ask("y\n").0);
        assert!(ask("Y\n").0);
        assert!(!ask("yes\n").0);
        assert!(!ask("\n").0);
        assert!(!ask("").0);
    }

    #[test]
    fn test_prompt_text() {
        let (_, prompt) = ask("n\n");
        assert_eq!(prompt, "Do you want to proceed with the transfer? [y/N] ");
    }
}
