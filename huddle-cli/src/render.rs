use colored::*;
use huddle_client::{ConnectionStatus, NegotiationState, RoomSnapshot};
use tokio::sync::watch;
use tracing::debug;

/// Prints what changed between consecutive snapshots until the coordinator
/// goes away.
pub async fn follow(mut rx: watch::Receiver<RoomSnapshot>) {
    let mut previous = rx.borrow_and_update().clone();

    while rx.changed().await.is_ok() {
        let current = rx.borrow_and_update().clone();
        print_changes(&previous, &current);
        previous = current;
    }

    debug!("Snapshot stream ended");
}

fn print_changes(previous: &RoomSnapshot, current: &RoomSnapshot) {
    if previous.status != current.status {
        let status = match current.status {
            ConnectionStatus::Connecting => "connecting".yellow(),
            ConnectionStatus::Connected => "connected".green(),
            ConnectionStatus::Reconnecting => "reconnecting".yellow(),
            ConnectionStatus::Closed => "closed".red(),
        };
        println!("[{}]", status);
    }

    for p in &current.participants {
        if previous.participant(p.id.as_str()).is_none() {
            println!("{} {} ({})", "+".green(), display_name(&p.display_name), p.id);
        }
    }
    for p in &previous.participants {
        if current.participant(p.id.as_str()).is_none() {
            println!("{} {} ({})", "-".red(), display_name(&p.display_name), p.id);
        }
    }

    for message in current.chat.iter().skip(previous.chat.len()) {
        let author = if message.author.id == current.local.id {
            "you".bold()
        } else {
            display_name(&message.author.user_name).bold()
        };
        println!("{} {}: {}", message.time.dimmed(), author, message.text);
    }

    if current.last_error != previous.last_error {
        if let Some(error) = &current.last_error {
            println!("{} {}", "Server:".red().bold(), error);
        }
    }
}

pub fn print_roster(snapshot: &RoomSnapshot) {
    if snapshot.participants.is_empty() {
        println!("{}", "Nobody else is here.".dimmed());
        return;
    }

    for p in &snapshot.participants {
        let state = snapshot
            .sessions
            .iter()
            .find(|s| s.remote == p.id)
            .map(|s| s.state);
        let link = match state {
            Some(NegotiationState::Connected) => "connected".green(),
            Some(NegotiationState::Offering | NegotiationState::Answering) => {
                "negotiating".yellow()
            }
            _ => "no media".dimmed(),
        };

        let mut flags = Vec::new();
        if p.pinned {
            flags.push("pinned");
        }
        if !p.audio_enabled {
            flags.push("audio off");
        }
        if !p.video_enabled {
            flags.push("video off");
        }

        println!(
            "  {} ({}) [{}] {}",
            display_name(&p.display_name).bold(),
            p.id,
            link,
            flags.join(", ").dimmed()
        );
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() { "Anonymous" } else { name }
}
