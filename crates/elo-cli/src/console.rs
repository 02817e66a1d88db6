//! Terminal console: styled output, prompts and fake progress

use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;

use colored::{ColoredString, Colorize};
use elo_core::{CredentialPrompt, EloError, Level, LoginInput, Reporter, SecretString};
use indicatif::{ProgressBar, ProgressStyle};

use crate::render::{render_panel, render_rule};

const RULE_WIDTH: usize = 60;

/// Everything the menu needs from the terminal
pub trait Console: Reporter + CredentialPrompt {
    /// Print a line as-is
    fn print(&self, text: &str);

    fn rule(&self, title: &str);

    fn panel(&self, title: &str, text: &str);

    /// One numbered entry of a menu
    fn option(&self, key: &str, label: &str);

    /// Ask for one line of input, trimmed. End of input is an error.
    fn ask(&self, label: &str) -> io::Result<String>;

    fn pause(&self) -> io::Result<()>;

    /// Cosmetic progress bar shown before listings
    fn loading(&self, message: &str);

    fn clear(&self);
}

fn blue(s: &str) -> ColoredString {
    s.truecolor(137, 207, 240)
}

fn lilac(s: &str) -> ColoredString {
    s.truecolor(205, 164, 222)
}

fn pink(s: &str) -> ColoredString {
    s.truecolor(249, 198, 211)
}

fn aqua(s: &str) -> ColoredString {
    s.truecolor(174, 238, 238)
}

fn cream(s: &str) -> ColoredString {
    s.truecolor(255, 253, 208)
}

/// Console bound to stdin/stdout
#[derive(Debug)]
pub struct TerminalConsole {
    progress_step: Duration,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self {
            progress_step: Duration::from_millis(200),
        }
    }

    fn read_line(&self) -> io::Result<String> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for TerminalConsole {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::Info => {
                tracing::info!("{}", message);
                println!("ℹ {}", blue(message).italic());
            }
            Level::Success => {
                tracing::info!("[SUCCESS] {}", message);
                println!("✔ {}", aqua(message).bold());
            }
            Level::Warning => {
                tracing::warn!("{}", message);
                println!("⚠ {}", pink(message).bold());
            }
            Level::Error => {
                tracing::error!("{}", message);
                println!("✘ {}", format!(" {} ", message).white().on_red().bold());
            }
            Level::Critical => {
                tracing::error!("[CRITICAL] {}", message);
                for line in render_panel("CRITICAL", message) {
                    eprintln!("{}", line.red().bold());
                }
            }
        }
    }
}

impl CredentialPrompt for TerminalConsole {
    fn prompt_login(&self) -> elo_core::Result<LoginInput> {
        println!();
        println!("{}", "--- Database login ---".cyan().bold());

        let username = self
            .ask("Database username")
            .map_err(|e| EloError::PromptError(e.to_string()))?;
        let password = rpassword::prompt_password(format!(
            "{} ",
            lilac("Database password (hidden):")
        ))
        .map_err(|e| EloError::PromptError(e.to_string()))?;

        Ok(LoginInput {
            username,
            password: SecretString::new(password),
        })
    }
}

impl Console for TerminalConsole {
    fn print(&self, text: &str) {
        println!("{}", text);
    }

    fn rule(&self, title: &str) {
        println!("{}", lilac(&render_rule(title, RULE_WIDTH)));
    }

    fn panel(&self, title: &str, text: &str) {
        let lines = render_panel(title, text);
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            if i == 0 || i == last {
                println!("{}", lilac(line));
            } else {
                println!("{}", cream(line));
            }
        }
    }

    fn option(&self, key: &str, label: &str) {
        println!("{} {}", pink(&format!("[{}]", key)), cream(label));
    }

    fn ask(&self, label: &str) -> io::Result<String> {
        print!("{} ", lilac(&format!("{}:", label)));
        io::stdout().flush()?;
        self.read_line()
    }

    fn pause(&self) -> io::Result<()> {
        println!();
        println!("{}", cream("Press Enter to continue..."));
        self.read_line().map(|_| ())
    }

    fn loading(&self, message: &str) {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg} {wide_bar}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(pink(message).to_string());

        while bar.position() < 100 {
            bar.inc(20);
            std::thread::sleep(self.progress_step);
        }
        bar.finish_and_clear();
    }

    fn clear(&self) {
        if io::stdout().is_terminal() {
            print!("\x1B[2J\x1B[1;1H");
            let _ = io::stdout().flush();
        }
    }
}
