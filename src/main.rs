//! Cooldown CLI
//!
//! Usage:
//!   cooldown                                  # Interactive quiz (percentage scale)
//!   cooldown --preset points                  # Interactive quiz, 0-5 point scale
//!   cooldown --config quiz.json               # Interactive quiz from a config file
//!   cooldown --answers yynny --decision skip  # Scripted run
//!   cooldown --answers yynny --json           # Scripted run, JSON frames + summary

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cooldown::core::{CutInTicket, CutInTimer, EngineEvent, Presenter, QuizEngine};
use cooldown::types::{Answer, QuizConfig, RenderFrame, Screen};
use cooldown::VERSION;

#[derive(Parser, Debug)]
#[command(
    name = "cooldown",
    version = VERSION,
    about = "Cooldown - a short calm-down quiz before you buy",
    long_about = "Cooldown asks a few yes/no questions before a purchase.\n\n\
                  Calm answers raise your score; crossing a threshold levels\n\
                  up your character with a short cut-in. At the end you decide:\n\
                  buy, or walk away.\n\n\
                  Keys:\n  \
                  y / n / ?   answer (yes / no / unsure)\n  \
                  b / s       buy / skip on the final screen\n  \
                  r           back to home\n  \
                  q           quit"
)]
struct Args {
    /// Quiz config JSON file (overrides --preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in quiz to use when no config file is given
    #[arg(short, long, value_enum, default_value_t = Preset::Percentage)]
    preset: Preset,

    /// Scripted mode: answers in order, e.g. "yyn?y"
    #[arg(short, long)]
    answers: Option<String>,

    /// Scripted mode: decision on the final screen
    #[arg(short, long, value_enum)]
    decision: Option<Decision>,

    /// Output frames as JSON lines
    #[arg(long)]
    json: bool,

    /// Disable colors in output
    #[arg(long)]
    no_color: bool,

    /// Seed for cut-in flavor selection
    #[arg(long)]
    seed: Option<u64>,

    /// Override the cut-in delay (milliseconds)
    #[arg(long)]
    cutin_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// 0-100 score, stages at 30 and 65
    Percentage,
    /// 0-5 points, stages at 2 and 4
    Points,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Decision {
    Buy,
    Skip,
}

/// Terminal presenter: prints frames, runs cut-ins on a tokio timer
struct TerminalPresenter {
    timer: CutInTimer,
    json: bool,
    no_color: bool,
}

impl Presenter for TerminalPresenter {
    fn render(&mut self, frame: &RenderFrame) {
        print_frame(frame, self.json, self.no_color);
    }

    fn schedule_cutin(&mut self, ticket: CutInTicket, delay: Duration) {
        self.timer.schedule(ticket, delay);
    }

    fn cancel_cutin(&mut self, _ticket: CutInTicket) {
        self.timer.cancel();
    }
}

type Engine = QuizEngine<TerminalPresenter>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };

    let (timer, events) = CutInTimer::new();
    let presenter = TerminalPresenter {
        timer,
        json: args.json,
        no_color: args.no_color,
    };
    let engine = match args.seed {
        Some(seed) => QuizEngine::with_seed(config, presenter, seed),
        None => QuizEngine::new(config, presenter),
    };
    let engine = match engine {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match args.answers {
        Some(ref answers) => run_scripted(engine, events, answers, &args).await,
        None => {
            run_interactive(engine, events, &args).await;
            Ok(())
        }
    };

    if let Err(e) = outcome {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout stays clean for frames and JSON
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cooldown=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(args: &Args) -> Result<QuizConfig, cooldown::core::ConfigError> {
    let mut config = match args.config {
        Some(ref path) => QuizConfig::from_json_file(path)?,
        None => match args.preset {
            Preset::Percentage => QuizConfig::percentage(),
            Preset::Points => QuizConfig::points(),
        },
    };
    if let Some(ms) = args.cutin_ms {
        config.cutin_delay_ms = ms;
    }
    Ok(config)
}

/// Run a fixed answer sequence to the end
async fn run_scripted(
    mut engine: Engine,
    mut events: UnboundedReceiver<EngineEvent>,
    answers: &str,
    args: &Args,
) -> Result<(), String> {
    let answers = answers
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| {
            Answer::parse(&c.to_string())
                .ok_or_else(|| format!("Unknown answer '{}' (use y, n or ?)", c))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = engine.config().question_count();
    if answers.len() != count {
        return Err(format!("Expected {} answers, got {}", count, answers.len()));
    }

    engine.start();
    for answer in answers {
        wait_for_cutin(&mut engine, &mut events).await;
        engine.respond(answer);
    }
    wait_for_cutin(&mut engine, &mut events).await;

    if let Some(decision) = args.decision {
        engine.finish(decision == Decision::Buy);
        if args.json {
            if let Some(summary) = engine.summary() {
                match serde_json::to_string_pretty(&summary) {
                    Ok(json) => println!("{}", json),
                    Err(e) => return Err(format!("Failed to serialize summary: {}", e)),
                }
            }
        }
    }
    Ok(())
}

/// Block until a playing cut-in has elapsed
async fn wait_for_cutin(engine: &mut Engine, events: &mut UnboundedReceiver<EngineEvent>) {
    while engine.screen() == Screen::CutIn {
        match events.recv().await {
            Some(EngineEvent::CutInElapsed(ticket)) => {
                engine.cutin_elapsed(ticket);
            }
            None => break,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Run the interactive quiz
async fn run_interactive(
    mut engine: Engine,
    mut events: UnboundedReceiver<EngineEvent>,
    args: &Args,
) {
    print_header(args.no_color);
    print_frame(&engine.current_frame(), args.json, args.no_color);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print_prompt(engine.screen());

        tokio::select! {
            Some(event) = events.recv() => match event {
                EngineEvent::CutInElapsed(ticket) => {
                    engine.cutin_elapsed(ticket);
                }
            },
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) | Err(_) => break,
                };
                if handle_line(&mut engine, line.trim()) == Flow::Quit {
                    println!("\nBye.");
                    break;
                }
            }
        }
    }
}

/// Apply one line of user input to the engine
fn handle_line(engine: &mut Engine, input: &str) -> Flow {
    let lower = input.to_ascii_lowercase();
    match lower.as_str() {
        "q" | "quit" | "exit" => return Flow::Quit,
        "r" | "reset" | "home" => {
            engine.reset();
            return Flow::Continue;
        }
        _ => {}
    }

    match engine.screen() {
        Screen::Home => match lower.as_str() {
            "" | "s" | "start" => {
                engine.start();
            }
            _ => print_hint("Press Enter to start."),
        },
        Screen::Quiz => match Answer::parse(&lower) {
            Some(answer) => {
                engine.respond(answer);
            }
            None if lower.is_empty() => {}
            None => print_hint("Answer with y, n or ? (unsure)."),
        },
        Screen::CutIn => print_hint("Hold on..."),
        Screen::Final => match lower.as_str() {
            "b" | "buy" => {
                engine.finish(true);
            }
            "s" | "skip" | "n" | "no" => {
                engine.finish(false);
            }
            _ => print_hint("b = buy, s = skip"),
        },
        Screen::Result => {
            engine.reset();
        }
    }
    Flow::Continue
}

/// Print one frame in the selected format
fn print_frame(frame: &RenderFrame, json: bool, no_color: bool) {
    if json {
        match serde_json::to_string(frame) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("Failed to serialize frame: {}", e),
        }
    } else if no_color {
        println!("{}", frame.to_parseable_string());
    } else {
        println!("{}", frame.to_terminal_string());
        if frame.screen == Screen::Result {
            if let Some(ref verdict) = frame.verdict {
                println!("  {}", verdict.dimmed());
            }
        }
    }
}

fn print_header(no_color: bool) {
    let title = format!("Cooldown v{} - think before you buy", VERSION);
    if no_color {
        println!("========================================");
        println!("  {}", title);
        println!("========================================");
    } else {
        println!("{}", "╔════════════════════════════════════════╗".bold());
        println!("{}", format!("  {}", title).bold());
        println!("{}", "╚════════════════════════════════════════╝".bold());
    }
    println!();
}

fn print_prompt(screen: Screen) {
    let keys = match screen {
        Screen::Home => "Enter=start q=quit",
        Screen::Quiz => "y/n/? r=home",
        Screen::CutIn => "...",
        Screen::Final => "b=buy s=skip",
        Screen::Result => "Enter=home",
    };
    print!("[{}] > ", keys);
    let _ = std::io::stdout().flush();
}

fn print_hint(msg: &str) {
    println!("  {}", msg.yellow());
}
