use std::fs::File;
use std::io::{self, BufRead, BufReader};

use crate::catalog::QueryResult;
use crate::error::{Error, Result};
use crate::session::{Reply, Session};

/// Where the next input line comes from. At most one script can be
/// active; when it runs out the loop falls back to the terminal.
enum Source {
    Interactive,
    Script(BufReader<File>),
}

/// Read-eval-print loop driving a [Session].
///
/// Lines are read from the current source, fed to the session, and the
/// replies rendered to stdout. Session errors are fatal: the loop stops
/// and the error is returned. The one recoverable failure is a `SCRIPT`
/// file that cannot be opened, which is reported and skipped.
pub struct Repl {
    session: Session,
    source: Source,
}

impl Repl {
    /// A repl reading from the terminal.
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            source: Source::Interactive,
        }
    }

    /// A repl that starts by replaying the script at `path`, then
    /// falls back to the terminal.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub fn with_script(path: &str) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            session: Session::new(),
            source: Source::Script(BufReader::new(file)),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until the session quits, input is exhausted, or a fatal
    /// error occurs.
    pub fn run(&mut self) -> Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.read_line(&mut line)? == 0 {
                if self.revert_source() {
                    continue;
                }
                return Ok(());
            }
            if line.ends_with('\n') {
                line.pop();
                if line.ends_with('\r') {
                    line.pop();
                }
            }
            match self.session.feed_line(&line)? {
                Reply::None => {}
                Reply::Echo(text) => println!("{text}"),
                Reply::TableNames(names) => {
                    for name in names {
                        println!("{name}");
                    }
                }
                Reply::Rows(result) => print_result(&result),
                Reply::Script(path) => self.open_script(&path)?,
                Reply::Quit => return Ok(()),
            }
        }
    }

    fn read_line(&mut self, line: &mut String) -> Result<usize> {
        let read = match &mut self.source {
            Source::Interactive => io::stdin().lock().read_line(line)?,
            Source::Script(reader) => reader.read_line(line)?,
        };
        Ok(read)
    }

    /// Drops an exhausted script source. Returns false when the
    /// terminal itself ran dry, which ends the loop.
    fn revert_source(&mut self) -> bool {
        match self.source {
            Source::Script(_) => {
                self.source = Source::Interactive;
                println!("Finished reading script");
                true
            }
            Source::Interactive => false,
        }
    }

    fn open_script(&mut self, path: &str) -> Result<()> {
        if matches!(self.source, Source::Script(_)) {
            return Err(Error::Script(
                "cannot open script while another script is running".into(),
            ));
        }
        match File::open(path) {
            Ok(file) => {
                println!("Reading script {path}");
                self.source = Source::Script(BufReader::new(file));
            }
            Err(_) => println!("Failed opening script {path}"),
        }
        Ok(())
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

fn print_result(result: &QueryResult) {
    println!(
        "======================={}=======================",
        result.table
    );
    println!("{}", result.columns.join(" | "));
    for row in &result.rows {
        let cells: Vec<String> = row.iter().map(|value| value.to_string()).collect();
        println!("{}", cells.join(" | "));
    }
}
