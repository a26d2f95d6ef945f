use std::io::{self, BufRead, Write};

use colored::Colorize;

use crate::core::{
    ActivityKind, ActivityRecord, ChatMessage, SessionState, LOCAL_EXPERT, TRAVEL_PLANNER,
};

pub fn render_thread_header() {
    println!();
    println!("{}", "=== Agent Chat Thread ===".bold());
}

/// Print every record from `from` onwards; returns the new cursor so a
/// polling caller only prints what it has not shown yet.
pub fn render_activity_thread(records: &[ActivityRecord], from: usize) -> usize {
    for record in &records[from.min(records.len())..] {
        display_activity(record);
    }
    records.len()
}

fn display_activity(record: &ActivityRecord) {
    let styled = match record.kind {
        ActivityKind::Error => record.content.red().to_string(),
        ActivityKind::Success => record.content.green().to_string(),
        ActivityKind::Info if record.content.to_lowercase().contains("output") => {
            // Intermediate output chunks keep each agent's color.
            if record.agent.contains(TRAVEL_PLANNER) {
                record.content.blue().to_string()
            } else if record.agent.contains(LOCAL_EXPERT) {
                record.content.green().to_string()
            } else {
                record.content.clone()
            }
        }
        ActivityKind::Info => record.content.clone(),
    };
    println!("[{}] {}", record.agent.to_lowercase().bold(), styled);
}

pub fn render_final_plan(messages: &[ChatMessage]) {
    if messages.is_empty() {
        return;
    }
    println!();
    println!("{}", "=== Final Travel Plan ===".bold());
    for message in messages {
        println!("[{}]", message.role.bold());
        println!("{}", message.content);
        println!();
    }
}

/// Ask for a 1-5 rating after the plan renders. Skipped silently when
/// there is no plan, stdin is closed, or the line is empty.
pub fn prompt_feedback(session: &mut SessionState) {
    if session.messages().is_empty() {
        return;
    }

    print!("Rate the plan (1-5), or press Enter to skip: ");
    let _ = io::stdout().flush();

    let mut rating_line = String::new();
    if io::stdin().lock().read_line(&mut rating_line).unwrap_or(0) == 0 {
        return;
    }
    let trimmed = rating_line.trim();
    if trimmed.is_empty() {
        return;
    }
    let rating: u8 = match trimmed.parse() {
        Ok(value) => value,
        Err(_) => {
            println!("Not a number, skipping feedback.");
            return;
        }
    };

    print!("Any comments? ");
    let _ = io::stdout().flush();
    let mut comment = String::new();
    let _ = io::stdin().lock().read_line(&mut comment);

    match session.add_feedback(rating, comment.trim()) {
        Ok(()) => println!("{}", "Thank you for your feedback!".green()),
        Err(err) => println!("{err}"),
    }
}
