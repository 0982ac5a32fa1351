use anyhow::Result;
use std::io::{self, Write};

use crate::assistant::TurnConfig;
use crate::core::citation::CitationStyle;
use crate::core::session::{Session, DEFAULT_SESSION_TITLE};

use super::{output, App};

pub async fn run(app: App, resume_session: Option<String>, mut turn_config: TurnConfig) -> Result<()> {
    println!("\x1b[1mrefscout\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
    println!(
        "Citation style: \x1b[36m{}\x1b[0m | papers per reply: \x1b[36m{}\x1b[0m",
        turn_config.citation_style, turn_config.paper_count
    );
    println!("Type \x1b[33m/help\x1b[0m for commands, \x1b[33mCtrl-D\x1b[0m to exit.\n");

    let mut session = super::resolve_session(&app, resume_session).await?;

    loop {
        eprint!("\x1b[32;1mrefscout>\x1b[0m ");
        io::stderr().flush().ok();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                // EOF (Ctrl-D)
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Input error: {e}");
                break;
            }
        }

        let input = input.trim().to_string();
        if input.is_empty() {
            continue;
        }

        if input.starts_with('/') {
            match handle_command(&input, &app, &mut session, &mut turn_config).await {
                Ok(true) => continue,
                Ok(false) => break,
                Err(e) => {
                    eprintln!("\x1b[31mCommand error: {e}\x1b[0m");
                    continue;
                }
            }
        }

        match app
            .orchestrator
            .handle_turn(&session.id, &input, &turn_config)
            .await
        {
            Ok(outcome) => {
                output::print_keywords(&outcome);
                if outcome.papers_found == 0 {
                    println!("\x1b[33mNo results for this search.\x1b[0m");
                }
                println!("{}\n", outcome.reply);
                if let Some(title) = outcome.auto_title {
                    session.title = title.clone();
                    println!("\x1b[90mSession titled: {title}\x1b[0m");
                }
            }
            Err(e) => {
                eprintln!("\x1b[31mTurn failed: {e}\x1b[0m");
            }
        }
    }

    Ok(())
}

async fn handle_command(
    input: &str,
    app: &App,
    session: &mut Session,
    turn_config: &mut TurnConfig,
) -> Result<bool> {
    let (cmd, arg) = match input.split_once(' ') {
        Some((c, a)) => (c, a.trim()),
        None => (input, ""),
    };

    match cmd {
        "/help" | "/h" => {
            println!("\x1b[1mCommands:\x1b[0m");
            println!("  /help             Show this help");
            println!("  /sessions         List sessions");
            println!("  /new [title]      Start a new session");
            println!("  /open <id>        Switch to a session (id prefix is enough)");
            println!("  /rename <title>   Rename the current session");
            println!("  /delete [id]      Delete a session (current if omitted)");
            println!("  /history          Show the current conversation");
            println!("  /find <keyword>   Search all conversations");
            println!("  /style [name]     Show or set the citation style");
            println!("  /papers [n]       Show or set papers per reply");
            println!("  /exit             Exit");
            Ok(true)
        }
        "/exit" | "/quit" | "/q" => {
            println!("Goodbye!");
            Ok(false)
        }
        "/sessions" | "/s" => {
            let sessions = app.db.sessions().list().await?;
            output::print_sessions(&sessions, &session.id);
            Ok(true)
        }
        "/new" => {
            let title = if arg.is_empty() {
                DEFAULT_SESSION_TITLE.to_string()
            } else {
                arg.to_string()
            };
            let s = Session::new(title);
            app.db.sessions().create(&s).await?;
            println!("Started session \x1b[90m{}\x1b[0m", &s.id[..8]);
            *session = s;
            Ok(true)
        }
        "/open" => {
            if arg.is_empty() {
                eprintln!("Usage: /open <id>");
                return Ok(true);
            }
            let sessions = app.db.sessions().list().await?;
            match sessions.into_iter().find(|s| s.id.starts_with(arg)) {
                Some(s) => {
                    let messages = app.db.messages().list(&s.id).await?;
                    println!("\x1b[1m{}\x1b[0m", s.title);
                    output::print_messages(&messages);
                    *session = s;
                }
                None => eprintln!("No session matching '{arg}'."),
            }
            Ok(true)
        }
        "/rename" => {
            if arg.is_empty() {
                eprintln!("Usage: /rename <title>");
                return Ok(true);
            }
            app.db.sessions().rename(&session.id, arg).await?;
            session.title = arg.to_string();
            println!("Renamed to '{arg}'.");
            Ok(true)
        }
        "/delete" => {
            let target = if arg.is_empty() {
                session.id.clone()
            } else {
                arg.to_string()
            };
            let deleting_current = target == session.id;
            app.db.sessions().delete(&target).await?;
            println!("Deleted session \x1b[90m{}\x1b[0m", &target[..target.len().min(8)]);
            if deleting_current {
                let s = Session::new(DEFAULT_SESSION_TITLE.into());
                app.db.sessions().create(&s).await?;
                *session = s;
            }
            Ok(true)
        }
        "/history" => {
            let messages = app.db.messages().list(&session.id).await?;
            if messages.is_empty() {
                println!("No messages yet.");
            } else {
                output::print_messages(&messages);
            }
            Ok(true)
        }
        "/find" => {
            if arg.is_empty() {
                eprintln!("Usage: /find <keyword>");
                return Ok(true);
            }
            let hits = app.db.messages().search(arg).await?;
            output::print_hits(&hits);
            Ok(true)
        }
        "/style" => {
            if arg.is_empty() {
                output::print_styles(turn_config.citation_style);
            } else {
                match CitationStyle::parse(arg) {
                    Some(style) => {
                        turn_config.citation_style = style;
                        println!("Citation style: {style}");
                    }
                    None => eprintln!("Unknown style '{arg}'. Try /style to list options."),
                }
            }
            Ok(true)
        }
        "/papers" => {
            if arg.is_empty() {
                println!("Papers per reply: {}", turn_config.paper_count);
            } else {
                match arg.parse::<usize>() {
                    Ok(n) if n > 0 => {
                        turn_config.paper_count = n;
                        println!("Papers per reply: {n}");
                    }
                    _ => eprintln!("Expected a positive number."),
                }
            }
            Ok(true)
        }
        _ => {
            eprintln!("Unknown command: {cmd}. Type /help for available commands.");
            Ok(true)
        }
    }
}
