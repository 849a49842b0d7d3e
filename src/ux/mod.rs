use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use crate::wire::{Fallback, GeneratedDocument};

/// Line that ends a pasted multi-line block.
pub const END_MARKER: &str = ".";

pub fn title(text: &str) {
    println!("\n{}", text.bold().underline());
}

pub fn show_document(heading: &str, doc: &GeneratedDocument) {
    println!("\n{}", format!("=== {heading} ===").bold());
    println!("{}", doc.text);
    match &doc.fallback {
        Some(Fallback::EmptyResponse) => println!("{}", "(the model returned no content)".dimmed()),
        Some(Fallback::ServiceError(reason)) => println!("{}", format!("(generation failed: {reason})").dimmed()),
        None => {}
    }
    println!();
}

pub fn warning(msg: &str) {
    eprintln!("{} {}", "⚠️".yellow(), msg.yellow());
}

pub fn error(msg: &str) {
    eprintln!("{} {}", "❌".red(), msg.red().bold());
}

pub fn saved(label: &str, path: &Path, mime: &str) {
    println!("{} {} ({})", format!("⬇️  {label}:").green().bold(), path.display(), mime);
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

pub fn ask(label: &str) -> String {
    print!("{}: ", label.bold());
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_err() {
        return String::new();
    }
    s.trim_end_matches(['\r', '\n']).to_string()
}

/// Reads lines until a line holding only `END_MARKER`, or EOF. Line endings are kept.
pub fn read_block<R: BufRead>(mut input: R) -> String {
    let mut out = String::new();
    let mut line = String::new();
    loop {
        line.clear();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line.trim_end_matches(['\r', '\n']) == END_MARKER => break,
            Ok(_) => out.push_str(&line),
        }
    }
    out
}

pub fn ask_block(label: &str) -> String {
    println!("{} {}", label.bold(), format!("(finish with a line containing only '{END_MARKER}')").dimmed());
    read_block(io::stdin().lock())
}

/// 1-based pick from a numbered list; blank input takes the default.
pub fn parse_choice(input: &str, len: usize, default: usize) -> Option<usize> {
    let t = input.trim();
    if t.is_empty() {
        return Some(default);
    }
    match t.parse::<usize>() {
        Ok(n) if (1..=len).contains(&n) => Some(n - 1),
        _ => None,
    }
}

pub fn choose<T: Copy + Display>(label: &str, options: &[T], default: usize) -> T {
    for (i, o) in options.iter().enumerate() {
        let marker = if i == default { "*" } else { " " };
        println!("  {marker}{}. {o}", i + 1);
    }
    loop {
        let answer = ask(&format!("{label} [{}]", default + 1));
        match parse_choice(&answer, options.len(), default) {
            Some(i) => return options[i],
            None => warning(&format!("Pick a number between 1 and {}.", options.len())),
        }
    }
}

pub fn confirm(prompt: &str, default_yes: bool) -> bool {
    let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
    print!("{} {}: ", prompt, hint);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        match s.trim().to_lowercase().as_str() {
            "" => default_yes,
            ans => ans == "y" || ans == "yes",
        }
    } else {
        false
    }
}
