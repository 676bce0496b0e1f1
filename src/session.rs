//! Interactive terminal session
//!
//! A rustyline loop over the application controller: slash commands drive
//! task tracking and the day cycle, anything else goes straight to the
//! coach. This is presentation only; every state rule lives in `app`.

use crate::app::App;
use crate::error::Result;
use crate::model::{VoiceGender, APP_NAME, COACH_NAME};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Run the interactive session until the user quits
pub async fn run(mut app: App) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("{}", APP_NAME.bold().blue());
    if !app.is_logged_in() {
        onboard(&mut app, &mut editor).await?;
    } else if let Some(user) = app.user() {
        println!("Welcome back, {}", user.name.bold());
    }
    println!("Type {} for commands, or just talk to {}.", "/help".cyan(), COACH_NAME);

    loop {
        let prompt = if app.focus_mode() {
            format!("{} ", "[focus]>".purple())
        } else {
            "elevate> ".to_string()
        };

        match editor.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                editor.add_history_entry(line).ok();

                if let Some(command) = line.strip_prefix('/') {
                    if !handle_command(&mut app, command).await? {
                        break;
                    }
                } else {
                    chat(&mut app, line).await;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("Goodbye.");
    Ok(())
}

/// Prompt for a display name until login succeeds
async fn onboard(app: &mut App, editor: &mut DefaultEditor) -> Result<()> {
    loop {
        let name = editor.readline("What should we call you? ")?;
        match app.login(name.trim()).await {
            Ok(()) => {
                if let Some(welcome) = app.chat().first() {
                    println!("{} {}", COACH_NAME.green().bold(), welcome.text);
                }
                return Ok(());
            }
            Err(e) => println!("{} {}", "!".red(), e),
        }
    }
}

/// Dispatch a slash command; returns false when the session should end
async fn handle_command(app: &mut App, command: &str) -> Result<bool> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or("");
    let args: Vec<&str> = parts.collect();

    match name {
        "help" => print_help(),
        "tasks" => print_tasks(app),
        "add" => add_task(app, &args),
        "log" => log_progress(app, &args).await,
        "end" => end_day(app).await,
        "history" => print_history(app),
        "theme" => match app.toggle_theme() {
            Ok(theme) => println!("Theme is now {:?}", theme),
            Err(e) => println!("{} {}", "!".red(), e),
        },
        "voice" => set_voice(app, &args),
        "notify" => match app.toggle_notifications() {
            Ok(enabled) => println!(
                "Notifications {}",
                if enabled { "on".green() } else { "off".red() }
            ),
            Err(e) => println!("{} {}", "!".red(), e),
        },
        "focus" => {
            let active = !app.focus_mode();
            app.set_focus(active);
            if active {
                println!("{}", "FOCUS MODE. Distractions are hidden.".purple().bold());
            } else {
                println!("Focus mode off.");
            }
        }
        "logout" => {
            app.logout()?;
            println!("Logged out. All state cleared.");
            return Ok(false);
        }
        "quit" | "exit" => return Ok(false),
        other => println!("Unknown command: /{} (try /help)", other),
    }
    Ok(true)
}

async fn chat(app: &mut App, text: &str) {
    println!("{}", "thinking...".dimmed());
    match app.send_message(text).await {
        Ok(reply) => println!("{} {}", COACH_NAME.green().bold(), reply.text),
        Err(e) => println!("{} {}", "!".red(), e),
    }
}

fn add_task(app: &mut App, args: &[&str]) {
    // /add <goal> <unit> <title words...>
    if args.len() < 3 {
        println!("Usage: /add <goal> <unit> <title>");
        return;
    }
    let Ok(goal) = args[0].parse::<u32>() else {
        println!("Goal must be a number");
        return;
    };
    let unit = args[1];
    let title = args[2..].join(" ");
    match app.add_task(&title, goal, unit) {
        Ok(task) => println!("Added {} ({} {})", task.title.bold(), task.goal, task.unit),
        Err(e) => println!("{} {}", "!".red(), e),
    }
}

async fn log_progress(app: &mut App, args: &[&str]) {
    // /log <task number> <amount>
    let (Some(index), Some(amount)) = (
        args.first().and_then(|s| s.parse::<usize>().ok()),
        args.get(1).and_then(|s| s.parse::<u32>().ok()),
    ) else {
        println!("Usage: /log <task number> <amount>");
        return;
    };

    let Some(task) = app.tasks().get(index.wrapping_sub(1)) else {
        println!("No task number {} (see /tasks)", index);
        return;
    };
    let id = task.id.clone();

    match app.record_progress(&id, amount).await {
        Ok(()) => print_tasks(app),
        Err(e) => println!("{} {}", "!".red(), e),
    }
}

async fn end_day(app: &mut App) {
    match app.end_day().await {
        Ok(Some(rate)) => {
            println!("Day archived at {}% completion.", rate.to_string().bold());
            if let Some(judgment) = app.chat().last() {
                println!("{} {}", COACH_NAME.green().bold(), judgment.text);
            }
        }
        Ok(None) => println!("No tasks to archive yet. Add one with /add."),
        Err(e) => println!("{} {}", "!".red(), e),
    }
}

fn set_voice(app: &mut App, args: &[&str]) {
    let Some(choice) = args.first() else {
        println!("Usage: /voice <female|male>");
        return;
    };
    match VoiceGender::parse_str(choice) {
        Ok(voice) => match app.set_voice(voice) {
            Ok(()) => println!("Voice set to {}", voice.as_str()),
            Err(e) => println!("{} {}", "!".red(), e),
        },
        Err(e) => println!("{} {}", "!".red(), e),
    }
}

fn print_tasks(app: &App) {
    if app.tasks().is_empty() {
        println!("No tasks yet. Add one with /add.");
        return;
    }
    for (i, task) in app.tasks().iter().enumerate() {
        let marker = if task.is_done() {
            "done".green()
        } else {
            "    ".normal()
        };
        println!(
            "{:>2}. [{}] {} {}/{} {}",
            i + 1,
            marker,
            task.title.bold(),
            task.completed,
            task.goal,
            task.unit
        );
    }
}

fn print_history(app: &App) {
    if app.history().is_empty() {
        println!("No history available yet.");
        return;
    }
    for log in app.history() {
        println!(
            "{}  {:>3}%  {} goals tracked",
            log.date.dimmed(),
            log.completion_rate,
            log.tasks.len()
        );
    }
}

fn print_help() {
    println!("Commands:");
    println!("  {}                      show today's tasks", "/tasks".cyan());
    println!("  {}   add a task", "/add <goal> <unit> <title>".cyan());
    println!("  {}       record progress", "/log <number> <amount>".cyan());
    println!("  {}                        archive the day and reset", "/end".cyan());
    println!("  {}                    past day logs", "/history".cyan());
    println!("  {}                      toggle light/dark", "/theme".cyan());
    println!("  {}        voice preference", "/voice <female|male>".cyan());
    println!("  {}                     toggle completion voice notes", "/notify".cyan());
    println!("  {}                      toggle focus mode", "/focus".cyan());
    println!("  {}                     clear everything and leave", "/logout".cyan());
    println!("  {}                       leave the session", "/quit".cyan());
    println!("Anything else is sent to {}.", COACH_NAME);
}
