use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tap_chess::config::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
use tap_chess::{
    Advisor, AdvisorConfig, HttpAdvisor, Notification, Phase, PromotionPiece, RandomAdvisor, Session, Square,
};

/// Play chess against a remote engine by tapping squares.
#[derive(Debug, Parser)]
#[command(name = "tap-chess", version)]
struct Args {
    /// Advisor endpoint that accepts {"fen": ...} and answers {"move": ...}
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Give up on the advisor after this many milliseconds
    #[arg(
        long,
        default_value_t = DEFAULT_TIMEOUT.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_ms: u64,

    /// Play against a local random mover instead of the remote advisor
    #[arg(long)]
    offline: bool,
}

const HELP: &str = "\
commands:
  <square>         tap a square, e.g. e2 then e4
  promote q|r|b|n  choose the promotion piece
  board            redraw the board
  history          list moves played
  fen              print the current position
  reset            start a new game
  quit";

struct Frontend<A: Advisor> {
    session: Session<A>,
}

impl<A: Advisor> Frontend<A> {
    fn new(session: Session<A>) -> Self {
        Self { session }
    }

    /// Runs one command line and returns what should be printed.
    fn handle_command(&mut self, line: &str) -> String {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&command) = parts.first() else {
            return String::new();
        };

        match command {
            "help" => format!("{}\n", HELP),
            "board" => self.session.view().to_string(),
            "fen" => format!("{}\n", self.session.position().to_fen()),
            "history" => self
                .session
                .history()
                .iter()
                .map(|entry| format!("{}\n", entry))
                .collect(),
            "reset" => {
                self.session.reset();
                self.session.view().to_string()
            }
            "promote" => match parts.get(1).and_then(|p| p.chars().next()).and_then(PromotionPiece::from_letter) {
                Some(choice) => {
                    let notes = self.session.choose_promotion(choice);
                    self.after_input(notes)
                }
                None => format!("choose one of: {}\n", promotion_menu()),
            },
            text => match text.parse::<Square>() {
                Ok(square) => {
                    let notes = self.session.tap(square);
                    self.after_input(notes)
                }
                Err(e) => format!("{} (type 'help')\n", e),
            },
        }
    }

    fn after_input(&self, notes: Vec<Notification>) -> String {
        let mut out = String::new();
        for note in &notes {
            out.push_str(&format!("** {}\n", note));
        }
        match self.session.phase() {
            Phase::AwaitingDestination { origin } => {
                out.push_str(&format!("selected {}\n", origin));
            }
            Phase::PromotionPending { .. } => {
                out.push_str(&format!("Choose your promotion: {}\n", promotion_menu()));
            }
            _ => out.push_str(&self.session.view().to_string()),
        }
        out
    }
}

fn promotion_menu() -> String {
    PromotionPiece::ALL
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn run<A: Advisor>(mut frontend: Frontend<A>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    write!(stdout, "{}", frontend.session.view())?;
    writeln!(stdout, "{}", HELP)?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim() == "quit" {
            break;
        }
        write!(stdout, "{}", frontend.handle_command(&line))?;
        stdout.flush()?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.offline {
        tracing::info!("playing against the local random advisor");
        return run(Frontend::new(Session::new(RandomAdvisor::new())));
    }

    let config = AdvisorConfig::new(args.endpoint, Duration::from_millis(args.timeout_ms));
    tracing::info!(endpoint = %config.endpoint, timeout = ?config.timeout, "using remote advisor");
    let advisor = HttpAdvisor::new(config).context("failed to build HTTP client")?;
    run(Frontend::new(Session::new(advisor)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plays_a_turn_through_commands() {
        let mut frontend = Frontend::new(Session::new(RandomAdvisor::seeded(3)));
        assert_eq!(frontend.handle_command("e2"), "selected e2\n");
        frontend.handle_command("e4");

        let history = frontend.handle_command("history");
        let lines: Vec<&str> = history.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Player: e2e4");
        assert!(lines[1].starts_with("Opponent: "));
    }

    #[test]
    fn test_timeout_must_be_positive() {
        assert!(Args::try_parse_from(["tap-chess", "--timeout-ms", "0"]).is_err());

        let args = Args::try_parse_from(["tap-chess", "--timeout-ms", "250"]).unwrap();
        assert_eq!(args.timeout_ms, 250);

        let args = Args::try_parse_from(["tap-chess"]).unwrap();
        assert_eq!(Duration::from_millis(args.timeout_ms), DEFAULT_TIMEOUT);
        assert_eq!(args.endpoint, DEFAULT_ENDPOINT);
        assert!(!args.offline);
    }

    #[test]
    fn test_reports_bad_input() {
        let mut frontend = Frontend::new(Session::new(RandomAdvisor::seeded(3)));
        assert!(frontend.handle_command("z9").contains("invalid square"));
        assert!(frontend.handle_command("promote").starts_with("choose one of"));
        assert_eq!(frontend.handle_command("   "), "");

        frontend.handle_command("e2");
        assert!(frontend.handle_command("e5").contains("This move is not allowed."));
    }
}
