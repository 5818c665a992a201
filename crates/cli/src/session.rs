//! Interpreter session: parses lines, runs them against one engine and
//! renders the response.

use std::io::{self, BufRead, Write};

use serde_json::Value as JsonValue;

use retailsim_events::{EventEnvelope, Subscription};
use retailsim_infra::RetailEngine;

use crate::command::{Command, CommandError};
use crate::render;

/// Command that ends an interactive session.
pub const EXIT: &str = "exit";

/// One simulation session driven by text commands.
#[derive(Debug)]
pub struct Interpreter {
    engine: RetailEngine,
    events: Option<Subscription<EventEnvelope<JsonValue>>>,
}

impl Interpreter {
    pub fn new() -> Self {
        Self {
            engine: RetailEngine::in_memory(),
            events: None,
        }
    }

    /// Also collect every published event, for `drain_events`.
    pub fn with_event_feed(mut self) -> Self {
        self.events = Some(self.engine.subscribe());
        self
    }

    pub fn engine(&self) -> &RetailEngine {
        &self.engine
    }

    /// Run one tokenized command and return its response line.
    pub fn run(&mut self, args: &[&str]) -> Result<String, CommandError> {
        let command = Command::parse(args)?;
        tracing::debug!(command = command.name(), "running command");
        self.execute(command)
    }

    /// Run one raw input line. Blank lines yield `None`.
    pub fn run_line(&mut self, line: &str) -> Option<Result<String, CommandError>> {
        let args: Vec<&str> = line.split_whitespace().collect();
        if args.is_empty() {
            return None;
        }
        Some(self.run(&args))
    }

    /// Events published since the last call, oldest first.
    pub fn drain_events(&self) -> Vec<EventEnvelope<JsonValue>> {
        self.events
            .as_ref()
            .map(Subscription::drain)
            .unwrap_or_default()
    }

    fn execute(&mut self, command: Command) -> Result<String, CommandError> {
        let engine = &mut self.engine;
        let line = match command {
            Command::CreateProduct { code, price, stock } => {
                render::product_created(&engine.create_product(&code, price, stock)?)
            }
            Command::GetProductInfo { code } => {
                render::product_info(&engine.get_product_info(&code)?)
            }
            Command::CreateOrder { code, quantity } => {
                render::order_created(&engine.place_order(&code, quantity)?)
            }
            Command::CreateCampaign {
                name,
                code,
                duration,
                limit,
                target_sales_count,
            } => render::campaign_created(&engine.create_campaign(
                &name,
                &code,
                duration,
                limit,
                target_sales_count,
            )?),
            Command::GetCampaignInfo { name } => {
                render::campaign_info(&engine.get_campaign_info(&name)?)
            }
            Command::IncreaseTime { hours } => render::time(&engine.advance_time(hours)?),
        };
        Ok(line)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Feed every line of `input` to `interpreter`, writing one response per
/// command to `out`. Failures are written as `Error: <message>` and the run
/// continues. Stops early at an `exit` line.
///
/// When `events` is given, the envelopes published by each command are
/// written to it as JSON lines right after the response.
pub fn run_script<R, W>(
    interpreter: &mut Interpreter,
    input: R,
    out: &mut W,
    mut events: Option<&mut dyn Write>,
) -> io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        if line.trim() == EXIT {
            break;
        }
        let Some(result) = interpreter.run_line(&line) else {
            continue;
        };
        match result {
            Ok(msg) => writeln!(out, "{msg}")?,
            Err(err) => writeln!(out, "Error: {err}")?,
        }
        out.flush()?;

        if let Some(sink) = events.as_deref_mut() {
            for envelope in interpreter.drain_events() {
                let json = serde_json::to_string(&envelope).map_err(io::Error::other)?;
                writeln!(sink, "{json}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        let mut interpreter = Interpreter::new();
        assert!(interpreter.run_line("   ").is_none());
    }

    #[test]
    fn engine_errors_surface_their_message() {
        let mut interpreter = Interpreter::new();
        let err = interpreter.run(&["get_product_info", "P1"]).unwrap_err();
        assert_eq!(err.to_string(), "Product not found");
    }

    #[test]
    fn event_feed_is_opt_in() {
        let mut plain = Interpreter::new();
        plain.run(&["create_product", "P1", "1", "1"]).unwrap();
        assert!(plain.drain_events().is_empty());

        let mut fed = Interpreter::new().with_event_feed();
        fed.run(&["create_product", "P1", "1", "1"]).unwrap();
        let events = fed.drain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), "products.product.created");
    }

    #[test]
    fn script_writes_events_after_each_response() {
        let mut interpreter = Interpreter::new().with_event_feed();
        let mut out = Vec::new();
        let mut events = Vec::new();

        run_script(
            &mut interpreter,
            "create_product P1 10 5\nbogus\n".as_bytes(),
            &mut out,
            Some(&mut events),
        )
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(
            out,
            "Product created; code P1, price 10.0, stock 5\nError: Command not found\n"
        );
        let events = String::from_utf8(events).unwrap();
        assert_eq!(events.lines().count(), 1);
        assert!(events.contains("products.product.created"));
    }
}
