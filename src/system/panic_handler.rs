//! Panic hook
//!
//! Server mode prints a colored report with backtrace; command mode prints a
//! one-line message. Both append a report to `crash.log`.

use std::any::Any;
use std::fs::OpenOptions;
use std::io::Write;
use std::panic;

use chrono::Utc;

const CRASH_LOG: &str = "crash.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Server,
    Command,
}

pub fn install_panic_hook(mode: RunMode) {
    panic::set_hook(Box::new(move |panic_info| {
        let message = panic_message(panic_info.payload());
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_else(|| "Unknown location".to_string());

        let backtrace = std::backtrace::Backtrace::force_capture();
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

        if let Err(e) = write_crash_log(&timestamp, &message, &location, &backtrace) {
            eprintln!("Failed to write crash log: {}", e);
        }

        match mode {
            RunMode::Server => display_server_panic(&message, &location, &backtrace),
            RunMode::Command => {
                eprintln!("Program panicked: {}", message);
                eprintln!("Details saved to {}", CRASH_LOG);
            }
        }
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

fn display_server_panic(message: &str, location: &str, backtrace: &std::backtrace::Backtrace) {
    use colored::Colorize;

    let rule = "═══════════════════════════════════════════════════";
    eprintln!();
    eprintln!("{}", rule.red().bold());
    eprintln!("{}", "PANIC".red().bold());
    eprintln!("{}", rule.red().bold());
    eprintln!("{} {}", "Reason:".yellow().bold(), message.white());
    eprintln!("{} {}", "Location:".yellow().bold(), location.white());
    eprintln!("{}", "Backtrace:".yellow().bold());
    eprintln!("{}", format!("{:?}", backtrace).dimmed());
    eprintln!("{}", format!("Details saved to {}", CRASH_LOG).cyan());
    eprintln!("{}", rule.red().bold());
}

fn write_crash_log(
    timestamp: &str,
    message: &str,
    location: &str,
    backtrace: &std::backtrace::Backtrace,
) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(CRASH_LOG)?;

    writeln!(file, "==========================================")?;
    writeln!(file, "Crash Report - {}", timestamp)?;
    writeln!(file, "Message: {}", message)?;
    writeln!(file, "Location: {}", location)?;
    writeln!(file, "\nBacktrace:\n{:?}", backtrace)?;
    writeln!(file, "==========================================\n")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_from_str_and_string() {
        let s: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(s.as_ref()), "boom");

        let s: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(s.as_ref()), "owned boom");

        let s: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(s.as_ref()), "Unknown panic");
    }
}
