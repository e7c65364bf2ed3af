//! The IO seam.
//!
//! Human-readable output goes to a writer pair and interactive input comes
//! from a line reader. Process stdio by default, injectable for tests and
//! for hosts that style or capture the stream themselves.

use std::io::{self, BufRead, BufReader, Write};

pub struct Io {
    out: Box<dyn Write>,
    err: Box<dyn Write>,
    input: Box<dyn BufRead>,
}

impl Default for Io {
    fn default() -> Self {
        Self {
            out: Box::new(io::stdout()),
            err: Box::new(io::stderr()),
            input: Box::new(BufReader::new(io::stdin())),
        }
    }
}

impl Io {
    pub fn new(out: Box<dyn Write>, err: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        Self { out, err, input }
    }

    pub fn out_mut(&mut self) -> &mut dyn Write {
        self.out.as_mut()
    }

    pub fn err_mut(&mut self) -> &mut dyn Write {
        self.err.as_mut()
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }

    pub fn error_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.err, "{line}")?;
        self.err.flush()
    }

    /// Read one raw input line, trailing newline stripped. Returns an
    /// empty string at end of input.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(line)
    }

    /// Write a prompt without a newline and read the answer line.
    pub fn prompt(&mut self, question: &str) -> io::Result<String> {
        write!(self.out, "{question} ")?;
        self.out.flush()?;
        self.read_line()
    }
}
