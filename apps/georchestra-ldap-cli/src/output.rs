//! Terminal output helpers for consistent CLI formatting

use georchestra_ldap::{MembershipAttempt, Outcome};
use serde::Serialize;

use crate::error::CliResult;

/// How a command ended when no error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Applied, or nothing to do.
    Done,
    /// Applied, but a follow-up membership write failed.
    Partial,
    /// The target was missing, or the entry to create already existed.
    Unchanged,
}

impl Status {
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Done => 0,
            Status::Partial => 1,
            Status::Unchanged => 2,
        }
    }

    /// Downgrade `Done` to `Partial` when `partial` holds.
    pub fn partial_if(self, partial: bool) -> Self {
        match self {
            Status::Done if partial => Status::Partial,
            other => other,
        }
    }
}

impl<T> From<&Outcome<T>> for Status {
    fn from(outcome: &Outcome<T>) -> Self {
        match outcome {
            Outcome::Applied { .. } | Outcome::NoOp { .. } => Status::Done,
            Outcome::NotFound | Outcome::AlreadyExists { .. } => Status::Unchanged,
        }
    }
}

fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message (green checkmark)
pub fn print_success(message: &str) {
    if use_color() {
        println!("\x1b[32m✓\x1b[0m {}", message);
    } else {
        println!("OK: {}", message);
    }
}

/// Print a warning message (yellow)
pub fn print_warning(message: &str) {
    if use_color() {
        eprintln!("\x1b[33mWarning:\x1b[0m {}", message);
    } else {
        eprintln!("Warning: {}", message);
    }
}

/// Print an info message (blue)
pub fn print_info(message: &str) {
    if use_color() {
        println!("\x1b[34mℹ\x1b[0m {}", message);
    } else {
        println!("Info: {}", message);
    }
}

/// Print a key-value pair with consistent formatting
pub fn print_key_value(key: &str, value: &str) {
    if use_color() {
        println!("  \x1b[1m{}:\x1b[0m {}", key, value);
    } else {
        println!("  {}: {}", key, value);
    }
}

pub fn print_list(key: &str, values: &[String]) {
    if values.is_empty() {
        print_key_value(key, "(none)");
        return;
    }
    print_key_value(key, &values[0]);
    let indent = " ".repeat(key.len() + 4);
    for value in &values[1..] {
        println!("{indent}{value}");
    }
}

/// One line per membership write; failures go to stderr.
pub fn print_attempts(label: &str, attempts: &[MembershipAttempt]) {
    for attempt in attempts {
        match &attempt.error {
            None => print_key_value(label, &attempt.dn),
            Some(error) => print_warning(&format!("{label} {} failed: {error}", attempt.dn)),
        }
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an outcome, rendering the applied result with `render`.
pub fn report<T, F>(outcome: &Outcome<T>, json: bool, render: F) -> CliResult<Status>
where
    T: Serialize,
    F: FnOnce(&T),
{
    if json {
        print_json(outcome)?;
    } else {
        match outcome {
            Outcome::Applied { result } => render(result),
            Outcome::NotFound => print_warning("Not found"),
            Outcome::AlreadyExists { dn } => print_info(&format!("Already exists: {dn}")),
            Outcome::NoOp { dn } => print_info(&format!("Nothing to do for {dn}")),
        }
    }
    Ok(Status::from(outcome))
}
