use crate::backend::{Backend, ScenarioBackend};
use crate::session::{Session, SubmitError};
use crate::time::Time;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tabled::Tabled;
use tabled::settings::Style;
use tracing_subscriber::EnvFilter;

mod aircraft;
mod backend;
mod draft;
mod flight;
mod parking;
mod planner;
mod schedule;
mod session;
mod time;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,
    /// Day shown on the timeline (YYYY-MM-DD, UTC), today if omitted
    #[arg(short, long, value_name = "DATE")]
    date: Option<NaiveDate>,
    /// Shift of the day boundary from UTC midnight, in hours
    #[arg(
        long,
        value_name = "HOURS",
        default_value_t = 0,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i64).range(-23..=23)
    )]
    day_offset: i64,
    /// Log filter used when RUST_LOG is not set
    #[arg(long, value_name = "FILTER", default_value = "parking_planner=warn")]
    log: String,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, _pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: format!("{} ", cmd),
            })
            .collect();

        Ok((0, candidates))
    }
}

fn paginate(content: &str) -> std::io::Result<()> {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())?;

    if let Some(mut stdin) = pager.stdin.take() {
        if let Err(e) = stdin.write_all(content.as_bytes()) {
            // Broken pipe is common if the user quits the pager early
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
    }

    pager.wait()?;
    Ok(())
}

fn print_table<T: Tabled>(items: &[T], empty: &str) {
    if items.is_empty() {
        println!("{}", empty);
        return;
    }
    let mut table = tabled::Table::new(items);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    let content = table.to_string();
    if items.len() > 20 {
        if let Err(e) = paginate(&content) {
            tracing::warn!(error = %e, "pager unavailable");
            println!("{}", content);
        }
    } else {
        println!("{}", content);
    }
}

fn report(err: SubmitError) {
    match err {
        SubmitError::Rejected(rejection) => println!("{} {}", "Rejected:".red().bold(), rejection),
        SubmitError::Backend(e) => println!("{} {}", "Backend error:".red().bold(), e),
        other => println!("{} {}", "Incomplete:".yellow().bold(), other),
    }
}

fn list<B: Backend>(session: &Session<B>, what: Option<&str>) {
    match what {
        Some("areas") => {
            session.schedule.areas.iter().for_each(|area| {
                println!("{}", area.name.bold());
                let spots = area.parking_spots.as_deref().unwrap_or_default();
                print_table(spots, "  (no parking spots)");
            });
        }
        Some("flights") => print_table(&session.schedule.flights, "No flights."),
        Some(spot) => {
            let projection = session.schedule.project_day(session.day);
            let Some(intervals) = projection.get(spot) else {
                println!("Unknown parking spot '{}'", spot);
                return;
            };
            println!("{} on {}", spot.bold(), session.day.date);
            if intervals.is_empty() {
                println!("  (nothing parked)");
            }
            for interval in intervals {
                let label = interval
                    .flight
                    .aircraft
                    .as_ref()
                    .map_or_else(|| "unknown aircraft".to_string(), |a| a.to_string());
                println!("  {} - {}  {}  ({})", interval.start, interval.end, label, interval.flight.id);
            }
        }
        None => {
            println!("Parking plan for {}", session.day.date.to_string().bold());
            print_table(&session.rows(), "No parking spots.");
        }
    }
}

fn spots<B: Backend>(session: &Session<B>, args: &[&str]) {
    let availability = match args {
        [start, end, sqm] => {
            let window = match (start.parse::<Time>(), end.parse::<Time>()) {
                (Ok(start), Ok(end)) => (start, end),
                (Err(e), _) | (_, Err(e)) => {
                    println!("{}", e);
                    return;
                }
            };
            let Ok(sqm) = sqm.parse::<f64>() else {
                println!("Footprint must be a number, got '{}'", sqm);
                return;
            };
            let editing = session.state.selected_flight_id().cloned();
            session
                .schedule
                .availability(&window, sqm, editing.as_deref())
        }
        [] => match session.availability() {
            Ok(availability) => availability,
            Err(e) => {
                println!("{}. Complete the draft, or use: spots <start> <end> <m2>", e);
                return;
            }
        },
        _ => {
            println!("Usage: spots [<start> <end> <m2>]");
            return;
        }
    };
    print_table(&availability, "No parking spots.");
}

fn usage<B: Backend>(session: &Session<B>, args: &[&str]) {
    let [spot, start, end] = args else {
        println!("Usage: usage <spot> <start> <end>");
        return;
    };
    let Some(parking_spot) = session.schedule.catalog.get(spot) else {
        println!("Unknown parking spot '{}'", spot);
        return;
    };
    match (start.parse::<Time>(), end.parse::<Time>()) {
        (Ok(start), Ok(end)) => {
            let used = session.schedule.used_footprint(spot, start, end);
            println!(
                "{}: {}m2 of {}m2 used between {} and {}",
                parking_spot.name.bold(),
                used,
                parking_spot.footprint_sqm,
                start,
                end
            );
        }
        (Err(e), _) | (_, Err(e)) => println!("{}", e),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log)),
        )
        .with_writer(std::io::stderr)
        .init();

    let backend = ScenarioBackend::load(&args.scenario)?;
    let date = args.date.unwrap_or_else(|| Utc::now().date_naive());
    let mut session = Session::open(backend, date, args.day_offset)?;
    if session.schedule.catalog.is_empty() {
        tracing::warn!(scenario = %args.scenario.display(), "scenario defines no parking spots");
    }
    println!(
        "Parking planner ready. {} spots, {} flights loaded from {}",
        session.schedule.catalog.len(),
        session.schedule.flights.len(),
        args.scenario.display()
    );

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: [
            "ls", "day", "spots", "usage", "select", "set", "draft", "submit", "delete", "clear",
            "refresh", "help", "exit",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => list(&session, parts.get(1).copied()),
                    "day" => match parts.get(1).map(|d| d.parse::<NaiveDate>()) {
                        Some(Ok(date)) => {
                            session.set_date(date);
                            list(&session, None);
                        }
                        Some(Err(e)) => println!("Invalid date: {}", e),
                        None => println!("Usage: day <YYYY-MM-DD>"),
                    },
                    "spots" => spots(&session, &parts[1..]),
                    "usage" => usage(&session, &parts[1..]),
                    "select" => match parts.get(1).and_then(|r| r.parse::<usize>().ok()) {
                        Some(row) => match session.select_row(row) {
                            Some(flight) => {
                                let id = flight.id.clone();
                                println!("Selected flight {}", id);
                                println!("{}", session.draft);
                            }
                            None => println!("Row {} has no flight.", row),
                        },
                        None => println!("Usage: select <row>"),
                    },
                    "set" => {
                        if let (Some(field), true) = (parts.get(1), parts.len() > 2) {
                            match session.draft.set(field, &parts[2..].join(" ")) {
                                Ok(()) => println!("{}", session.draft),
                                Err(e) => println!("{}", e),
                            }
                        } else {
                            println!("Usage: set <reg|type|footprint|spot|start|end> <value>");
                        }
                    }
                    "draft" => {
                        match session.state.selected_flight_id() {
                            Some(id) => println!("Editing flight {}", id),
                            None => println!("New flight"),
                        }
                        println!("{}", session.draft);
                        match session.check_draft() {
                            Ok(accepted) => println!(
                                "{} {}m2 free on the spot",
                                "Fits.".green().bold(),
                                accepted.remaining_sqm
                            ),
                            Err(e) => report(e),
                        }
                    }
                    "submit" => match session.submit() {
                        Ok(flight) => println!("{} flight {}", "Saved".green().bold(), flight.id),
                        Err(e) => report(e),
                    },
                    "delete" => match session.delete() {
                        Ok(id) => println!("{} flight {}", "Deleted".green().bold(), id),
                        Err(e) => report(e),
                    },
                    "clear" => {
                        session.clear();
                        println!("Form cleared.");
                    }
                    "refresh" => match session.refresh() {
                        Ok(()) => println!("{} flights loaded.", session.schedule.flights.len()),
                        Err(e) => println!("{} {}", "Backend error:".red().bold(), e),
                    },
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [areas|flights|<spot>] - Show the parking plan of the selected day, list areas / all flights, or one spot's day");
                        println!("  day <YYYY-MM-DD>         - Select the day shown on the plan");
                        println!("  spots [<start> <end> <m2>] - Free capacity per spot for the draft, or for a window given as 2024-05-01T10:00");
                        println!("  usage <spot> <start> <end> - Footprint committed to a spot during a window");
                        println!("  select <row>             - Load the flight on plan row <row> into the form");
                        println!("  set <field> <value>      - Set a form field: reg, type, footprint, spot, start, end");
                        println!("  draft                    - Show the form and whether it fits");
                        println!("  submit                   - Create the flight, or update the selected one");
                        println!("  delete                   - Delete the selected flight");
                        println!("  clear                    - Clear the form and selection");
                        println!("  refresh                  - Refetch flights");
                        println!("  help / ?                 - Show this help menu");
                        println!("  exit / quit              - Exit the planner\n");
                    }
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
