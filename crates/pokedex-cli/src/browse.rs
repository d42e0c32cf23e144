//! Interactive next/previous browsing on stdin.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};

use pokedex_runtime::view::{error_line, roster_line, LOADING};
use pokedex_runtime::{AudioTicket, RuntimeError, ShowOutcome};

use crate::cli::{parse_position, AppSession};
use crate::error::CliError;

const HELP: &str = "n: next  p: previous  <number>|<name>: jump  l: list  q: quit";

/// Run the browse loop until `q` or end of input.
///
/// Audio lookups run in spawned tasks so the prompt stays responsive; a
/// lookup that finishes after the user has moved on prints nothing.
pub async fn run(session: Arc<AppSession>) -> Result<(), CliError> {
    eprintln!("{LOADING}");
    let first = session.start().await?;
    let count = session.snapshot().await.roster.len();
    println!("{count} entries. {HELP}");

    if let Some(ticket) = first {
        render(&session).await;
        spawn_audio(session.clone(), ticket);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        let result = match input {
            "" => continue,
            "q" | "quit" => break,
            "h" | "help" | "?" => {
                println!("{HELP}");
                continue;
            }
            "l" | "list" => {
                for (index, entry) in session.snapshot().await.roster.iter().enumerate() {
                    println!("{}", roster_line(index, entry));
                }
                continue;
            }
            "n" | "next" => session.next().await,
            "p" | "prev" | "previous" => session.previous().await,
            other => match parse_position(other) {
                Some(index) => session.show(index).await.map(Some),
                None => session.select_by_name(other).await.map(Some),
            },
        };

        match result {
            Ok(Some(ShowOutcome::Displayed(ticket))) => {
                render(&session).await;
                spawn_audio(session.clone(), ticket);
            }
            Ok(Some(ShowOutcome::Superseded)) => {}
            Ok(None) => println!("(end of list)"),
            Err(e @ RuntimeError::ListFetch(_)) => return Err(e.into()),
            Err(e) => println!("{}", error_line(&e)),
        }
    }
    Ok(())
}

async fn render(session: &AppSession) {
    let state = session.snapshot().await;
    if let Some(detail) = state.detail {
        println!();
        print!("{detail}");
        println!("{}", state.audio);
    }
}

fn spawn_audio(session: Arc<AppSession>, ticket: AudioTicket) {
    tokio::spawn(async move {
        if let Some(slot) = session.resolve_audio(ticket).await {
            println!("{slot}");
        }
    });
}
