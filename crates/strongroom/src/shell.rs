// SPDX-FileCopyrightText: 2026 Strongroom Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `strongroom shell` command implementation.
//!
//! An interactive REPL over the vault client: register, login, list, add,
//! show, and delete entries. Secrets are read without echo via `rpassword`
//! and only ever touch process memory. The prompt color tracks the session
//! state, and a revealed secret hides itself after thirty seconds even if
//! the user does nothing.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use secrecy::{ExposeSecret, SecretString};
use strongroom_client::{
    EntryRegistry, RevealController, SessionManager, VaultTransport, REVEAL_TTL,
};
use strongroom_config::StrongroomConfig;
use strongroom_core::validation::{validate_registration, SecretStrength};
use strongroom_core::{EntryId, VaultError};
use tracing::debug;

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Register,
    Login(String),
    Logout,
    List,
    Add,
    Show(EntryId),
    Hide,
    Delete(EntryId),
    Whoami,
    Help,
    Quit,
}

/// Parses a trimmed input line into a command.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(verb) = parts.next() else {
        return Err("empty command".to_string());
    };
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("too many arguments for '{verb}'"));
    }

    match (verb, arg) {
        ("register", None) => Ok(ShellCommand::Register),
        ("login", Some(username)) => Ok(ShellCommand::Login(username.to_string())),
        ("login", None) => Err("usage: login <username>".to_string()),
        ("logout", None) => Ok(ShellCommand::Logout),
        ("list", None) => Ok(ShellCommand::List),
        ("add", None) => Ok(ShellCommand::Add),
        ("show", Some(id)) => parse_entry_id(id).map(ShellCommand::Show),
        ("show", None) => Err("usage: show <id>".to_string()),
        ("hide", None) => Ok(ShellCommand::Hide),
        ("delete", Some(id)) => parse_entry_id(id).map(ShellCommand::Delete),
        ("delete", None) => Err("usage: delete <id>".to_string()),
        ("whoami", None) => Ok(ShellCommand::Whoami),
        ("help", None) => Ok(ShellCommand::Help),
        ("quit" | "exit", None) => Ok(ShellCommand::Quit),
        (verb, Some(_)) => Err(format!("'{verb}' takes no argument")),
        (verb, None) => Err(format!("unknown command '{verb}', try 'help'")),
    }
}

fn parse_entry_id(raw: &str) -> Result<EntryId, String> {
    raw.parse::<i64>()
        .map(EntryId)
        .map_err(|_| format!("'{raw}' is not an entry id"))
}

/// Renders the strength checklist for a rejected secret.
pub fn render_strength(strength: SecretStrength) -> String {
    fn item(ok: bool, label: &str) -> String {
        if ok {
            format!("  {} {label}", "ok".green())
        } else {
            format!("  {} {label}", "--".red())
        }
    }
    [
        item(strength.min_length, "at least 8 characters"),
        item(strength.has_upper_case, "an upper-case letter"),
        item(strength.has_lower_case, "a lower-case letter"),
        item(strength.has_number, "a digit"),
        item(strength.has_special_char, "a special character"),
    ]
    .join("\n")
}

/// Runs the interactive vault shell.
pub async fn run_shell(config: StrongroomConfig) -> Result<(), VaultError> {
    let session = SessionManager::new();
    let transport = VaultTransport::new(&config.api, session.reader())?;
    let registry = EntryRegistry::new();
    let reveal = RevealController::new();

    let mut rl = DefaultEditor::new()
        .map_err(|e| VaultError::Internal(format!("failed to initialize readline: {e}")))?;

    println!("{}", "strongroom shell".bold().green());
    println!("Vault at {}. Type {} for commands.\n", config.api.base_url, "help".yellow());

    loop {
        let prompt = match session.current_username() {
            Some(username) => format!("{}> ", username.green()),
            None => format!("{}> ", "anonymous".dimmed()),
        };
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let command = match parse_command(trimmed) {
                    Ok(command) => command,
                    Err(message) => {
                        eprintln!("{}: {message}", "error".red());
                        continue;
                    }
                };
                if command == ShellCommand::Quit {
                    break;
                }
                if let Err(e) = handle_command(
                    command, &mut rl, &session, &transport, &registry, &reveal,
                )
                .await
                {
                    if matches!(e, VaultError::SessionExpired) {
                        // A stale token means everything derived from it goes.
                        session.invalidate();
                        registry.clear();
                        reveal.close();
                    }
                    eprintln!("{}: {e}", "error".red());
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    // Dropping the controller discards any still-revealed plaintext.
    reveal.close();
    session.logout();
    println!("{}", "goodbye".dimmed());
    Ok(())
}

async fn handle_command(
    command: ShellCommand,
    rl: &mut DefaultEditor,
    session: &SessionManager,
    transport: &VaultTransport,
    registry: &EntryRegistry,
    reveal: &RevealController,
) -> Result<(), VaultError> {
    match command {
        ShellCommand::Register => register(rl, session, transport).await,
        ShellCommand::Login(username) => {
            let login_secret = read_secret("login password: ")?;
            session.login(transport, &username, &login_secret).await?;
            println!("signed in as {}", username.green());
            Ok(())
        }
        ShellCommand::Logout => {
            reveal.close();
            registry.clear();
            session.logout();
            println!("signed out");
            Ok(())
        }
        ShellCommand::List => {
            let count = registry.refresh(transport).await?;
            if count == 0 {
                println!("the vault is empty");
                return Ok(());
            }
            for entry in registry.entries() {
                println!(
                    "{:>4}  {:<24} {:<24} {}",
                    entry.id,
                    entry.app_name,
                    entry.app_username,
                    entry.masked_secret.dimmed(),
                );
            }
            Ok(())
        }
        ShellCommand::Add => add_entry(rl, transport, registry).await,
        ShellCommand::Show(id) => show_entry(id, transport, registry, reveal).await,
        ShellCommand::Hide => {
            reveal.close();
            println!("hidden");
            Ok(())
        }
        ShellCommand::Delete(id) => {
            registry.delete(transport, id).await?;
            println!("entry {id} deleted");
            Ok(())
        }
        ShellCommand::Whoami => {
            match session.current_username() {
                Some(username) => println!("{}", username.green()),
                None => println!("{}", "anonymous".dimmed()),
            }
            Ok(())
        }
        ShellCommand::Help => {
            print_help();
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    }
}

async fn register(
    rl: &mut DefaultEditor,
    session: &SessionManager,
    transport: &VaultTransport,
) -> Result<(), VaultError> {
    let username = read_line(rl, "username: ")?;
    let login_secret = read_secret("login password: ")?;
    let master_secret = read_secret("master password: ")?;
    let confirmation = read_secret("confirm master password: ")?;

    // All four checks run locally before anything touches the network.
    if let Err(e) = validate_registration(
        &username,
        login_secret.expose_secret(),
        master_secret.expose_secret(),
        confirmation.expose_secret(),
    ) {
        use strongroom_core::validation::ValidationError::*;
        match &e {
            WeakLoginSecret(strength) | WeakMasterSecret(strength) => {
                eprintln!("{}", render_strength(*strength));
            }
            _ => {}
        }
        return Err(VaultError::Validation(e));
    }

    session
        .register(transport, &username, &login_secret, &master_secret)
        .await?;
    println!("registered and signed in as {}", username.green());
    Ok(())
}

async fn add_entry(
    rl: &mut DefaultEditor,
    transport: &VaultTransport,
    registry: &EntryRegistry,
) -> Result<(), VaultError> {
    let app_name = read_line(rl, "application: ")?;
    let app_username = read_line(rl, "account username: ")?;
    let plaintext = read_secret("password to store: ")?;
    let master_secret = read_secret("master password: ")?;

    registry
        .add(transport, &app_name, &app_username, &plaintext, &master_secret)
        .await?;
    println!("stored {}", app_name.green());
    Ok(())
}

async fn show_entry(
    id: EntryId,
    transport: &VaultTransport,
    registry: &EntryRegistry,
    reveal: &RevealController,
) -> Result<(), VaultError> {
    // Resolve against the cache so a typo'd id fails without a prompt.
    let entry = match registry.find(id) {
        Some(entry) => entry,
        None => {
            registry.refresh(transport).await?;
            registry.find(id).ok_or(VaultError::NotFound)?
        }
    };

    loop {
        reveal.open(entry.id);
        let attempt = read_secret("master password (empty to cancel): ")?;
        if attempt.expose_secret().is_empty() {
            reveal.close();
            println!("cancelled");
            return Ok(());
        }
        match reveal.submit(transport, &attempt).await {
            Ok(true) => break,
            Ok(false) => {
                // The reveal slot moved on while the request was in flight.
                return Ok(());
            }
            Err(VaultError::Decryption) => {
                // A failed attempt closes the modal; prompting again is an
                // explicit user retry, never an automatic one.
                eprintln!("{}: wrong master password, try again", "error".red());
            }
            Err(e) => {
                reveal.close();
                return Err(e);
            }
        }
    }

    if let Some(plaintext) = reveal.revealed_plaintext() {
        debug!(entry_id = %entry.id, "displaying revealed secret");
        println!(
            "{} / {}: {}",
            entry.app_name,
            entry.app_username,
            plaintext.expose_secret().bold(),
        );
        println!(
            "{}",
            format!(
                "hides automatically in {}s, or type 'hide'",
                REVEAL_TTL.as_secs()
            )
            .dimmed()
        );
    }
    Ok(())
}

fn read_line(rl: &mut DefaultEditor, prompt: &str) -> Result<String, VaultError> {
    let line = rl
        .readline(prompt)
        .map_err(|e| VaultError::Internal(format!("input aborted: {e}")))?;
    Ok(line.trim().to_string())
}

fn read_secret(prompt: &str) -> Result<SecretString, VaultError> {
    let raw = rpassword::prompt_password(prompt)
        .map_err(|e| VaultError::Internal(format!("failed to read secret: {e}")))?;
    Ok(SecretString::from(raw))
}

fn print_help() {
    println!("  register          create an account and sign in");
    println!("  login <username>  sign in");
    println!("  logout            sign out and clear the entry list");
    println!("  list              refresh and print the vault entries");
    println!("  add               store a new credential");
    println!("  show <id>         reveal one secret for {}s", REVEAL_TTL.as_secs());
    println!("  hide              hide the revealed secret now");
    println!("  delete <id>       delete an entry permanently");
    println!("  whoami            print the signed-in username");
    println!("  quit              leave the shell");
}
