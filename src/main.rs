use std::io::{self, IsTerminal};

use anyhow::Result;
use clap::Parser;

use rusty_table::app::{run_once, ScriptInput, Session};
use rusty_table::cli::Args;
use rusty_table::repl::Repl;
use rusty_table::state::SessionState;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    if args.interactive {
        run_interactive(&args)
    } else {
        run_once(&args, &mut io::stdout().lock())?;
        Ok(())
    }
}

/// Line editing on a terminal; plain line reads when stdin is piped.
fn run_interactive(args: &Args) -> Result<()> {
    let state = SessionState::open(&args.file, args.source_format())?;
    let mut session = Session::new(state);
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    if io::stdin().is_terminal() {
        let mut repl = Repl::new()?.with_history(&Repl::default_history_path());
        session.run(&mut repl, &mut stdout, &mut stderr)?;
    } else {
        let mut input = ScriptInput::new(io::stdin().lock());
        session.run(&mut input, &mut stdout, &mut stderr)?;
    }
    Ok(())
}
