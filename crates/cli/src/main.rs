use std::fs::File;
use std::io::{self, BufReader, Write};

use anyhow::Context;
use clap::Parser;

use retailsim_cli::{CliArgs, Interpreter, run_script};

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    retailsim_observability::init(args.log_format);

    let mut interpreter = Interpreter::new();
    if args.emit_events {
        interpreter = interpreter.with_event_feed();
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut stderr = io::stderr();
    let events: Option<&mut dyn Write> = if args.emit_events {
        Some(&mut stderr)
    } else {
        None
    };

    match &args.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open scenario file {}", path.display()))?;
            tracing::info!(path = %path.display(), "running scenario file");
            run_script(&mut interpreter, BufReader::new(file), &mut out, events)?;
        }
        None => {
            writeln!(out, "Please enter command")?;
            out.flush()?;
            run_script(&mut interpreter, io::stdin().lock(), &mut out, events)?;
        }
    }

    Ok(())
}
