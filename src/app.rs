use std::io::{self, BufRead, Write};

use log::debug;

use crate::cli::Args;
use crate::data::{apply_filter, calculate_aggregate, load_file_as};
use crate::error::Error;
use crate::render::{aggregate_line, render_table, OutputFormatter, NO_DATA, NO_MATCHES};
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// One-shot mode
// ---------------------------------------------------------------------------

/// One pipeline pass: load, filter, then print either the aggregate line or
/// the remaining rows.
pub fn run_once<W: Write>(args: &Args, out: &mut W) -> crate::error::Result<()> {
    let rows = load_file_as(&args.file, args.source_format())?;
    let rows = apply_filter(&rows, args.condition.as_deref())?;
    let outcome = calculate_aggregate(&rows, args.aggregate.as_deref())?;

    if let Some(line) = aggregate_line(&outcome) {
        writeln!(out, "{line}")?;
    } else if rows.is_empty() {
        writeln!(out, "{NO_MATCHES}")?;
    } else {
        OutputFormatter::new(args.format.unwrap_or_default()).write(&rows, out)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Where interactive command lines come from.
pub trait LineSource {
    /// The next line, or `None` once input is finished.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Lines from any buffered reader, e.g. piped stdin. Invalid UTF-8 is
/// replaced so a bad line becomes an invalid command instead of a read error.
pub struct ScriptInput<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> ScriptInput<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> LineSource for ScriptInput<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&self.buf).into_owned()))
    }
}

// ---------------------------------------------------------------------------
// Command grammar
// ---------------------------------------------------------------------------

/// One line of interactive input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `filter <condition>`
    Filter(String),
    /// `aggregate <column=operation>`
    Aggregate(String),
    Show,
    Reset,
    Help,
    Exit,
    /// Blank line
    Empty,
    /// Unknown word, or a known one missing its argument
    Invalid(String),
}

impl Command {
    /// Parse a line. The first word selects the command; for `filter` and
    /// `aggregate` the rest of the line (trimmed) is the argument. Words after
    /// an argument-less command are ignored.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "filter" if !rest.is_empty() => Command::Filter(rest.to_string()),
            "aggregate" if !rest.is_empty() => Command::Aggregate(rest.to_string()),
            "show" => Command::Show,
            "reset" => Command::Reset,
            "help" => Command::Help,
            "exit" => Command::Exit,
            _ => Command::Invalid(line.to_string()),
        }
    }
}

/// Whether the loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

const MENU: &str = "\
Available commands:
1. filter [condition]         e.g. filter price>150
2. aggregate [column=op]      op is avg, min or max
3. show                       Display current data
4. reset                      Reset to original data
5. help                       Show this list
6. exit                       Quit the program";

// ---------------------------------------------------------------------------
// Session controller
// ---------------------------------------------------------------------------

/// Read-eval-print loop over a [`SessionState`].
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new(state: SessionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run commands from `input` until `exit` or end of input. Results go to
    /// `out`, command errors to `err`.
    pub fn run<S, W, E>(&mut self, input: &mut S, out: &mut W, err: &mut E) -> io::Result<()>
    where
        S: LineSource,
        W: Write,
        E: Write,
    {
        writeln!(out, "Loaded: {} ({})", self.state.source().display(), self.state.rows())?;
        writeln!(out, "{MENU}")?;

        loop {
            out.flush()?;
            let Some(line) = input.next_line()? else {
                return self.execute(Command::Exit, out, err).map(|_| ());
            };

            if self.execute(Command::parse(&line), out, err)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Execute one command. Evaluation errors are written to `err` and the
    /// session carries on with its rows untouched; only I/O failures are
    /// returned.
    pub fn execute<W: Write, E: Write>(
        &mut self,
        command: Command,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<Flow> {
        debug!("command: {command:?}");
        match self.dispatch(command, out) {
            Ok(flow) => Ok(flow),
            Err(Error::Io(e)) => Err(e),
            Err(e) => {
                writeln!(err, "Error: {e}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch<W: Write>(&mut self, command: Command, out: &mut W) -> crate::error::Result<Flow> {
        match command {
            Command::Filter(condition) => {
                let count = self.state.filter(&condition)?;
                writeln!(out, "Found {count} matching records")?;
                self.show(out)?;
            }
            Command::Aggregate(spec) => {
                let outcome = self.state.aggregate(&spec)?;
                if let Some(line) = aggregate_line(&outcome) {
                    writeln!(out, "{line}")?;
                }
            }
            Command::Show => self.show(out)?,
            Command::Reset => {
                self.state.reset()?;
                writeln!(out, "Data reset to original")?;
            }
            Command::Help => writeln!(out, "{MENU}")?,
            Command::Exit => {
                writeln!(out, "Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Empty => {}
            Command::Invalid(_) => writeln!(out, "Invalid command. Try again.")?,
        }
        Ok(Flow::Continue)
    }

    fn show<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let rows = self.state.rows();
        if rows.is_empty() {
            writeln!(out, "{NO_DATA}")
        } else {
            writeln!(out, "{}", render_table(rows))
        }
    }
}
