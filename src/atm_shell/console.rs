use std::{
    fmt::Display,
    io::{BufRead, Lines, Write},
};

use anyhow::{Context, Result};

/// Line-oriented prompt/answer channel over any reader and writer.
pub struct Console<'w, R, W> {
    lines: Lines<R>,
    output: &'w mut W,
}

impl<'w, R, W> Console<'w, R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: &'w mut W) -> Self {
        Self {
            lines: input.lines(),
            output,
        }
    }

    /// Prints `text` without a newline and reads the trimmed answer.
    /// `None` means the input is exhausted.
    pub fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush().context("Failed to flush output")?;
        let line = self
            .lines
            .next()
            .transpose()
            .context("Failed to read input")?;
        Ok(line.map(|line| line.trim().to_string()))
    }

    pub fn say(&mut self, text: impl Display) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    pub fn output(&mut self) -> &mut W {
        &mut *self.output
    }
}
