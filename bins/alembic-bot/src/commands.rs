//! Chat command routing and reply text.
//!
//! [`respond`] is the whole conversation logic: it takes one incoming text,
//! updates the chat's session, calls the calculation core and returns the
//! reply. Transport concerns live in `routes` and `telegram`.

use tracing::{debug, info, warn};

use alembic_core::fractions::{calculate_fractions, validate_batch};
use alembic_core::report::BatchReport;
use alembic_core::settings::{SettingsStore, UserConstants, UserId};
use alembic_core::speed::calculate_speed;
use alembic_core::strength::distillate_strength;

use crate::input::parse_numbers;
use crate::session::{Pending, Sessions};

/// Bot commands with the descriptions registered in the Telegram menu.
pub const COMMANDS: &[(&str, &str)] = &[
    ("start", "Show the main menu"),
    ("alcohol_calculation", "Distillate strength from temperatures"),
    ("fractions", "Heads, body, pre-tails and tails volumes"),
    ("speed", "Recommended collection rate"),
    ("constants", "Show your constants"),
    ("set_constants", "Change your constants"),
    ("report", "Batch report from your constants"),
    ("cancel", "Cancel the current input"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Strength,
    Fractions,
    Speed,
    Constants,
    SetConstants,
    Report,
    Cancel,
}

impl Command {
    /// Parse a `/command` or `/command@BotName`, ignoring trailing text.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let name = word.split('@').next().unwrap_or(word);
        match name {
            "start" | "help" => Some(Self::Start),
            "alcohol_calculation" | "strength" => Some(Self::Strength),
            "fractions" => Some(Self::Fractions),
            "speed" => Some(Self::Speed),
            "constants" => Some(Self::Constants),
            "set_constants" => Some(Self::SetConstants),
            "report" => Some(Self::Report),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }
}

/// Whether `text` is a command explicitly addressed to a bot other than
/// `bot_username`, as in `/start@OtherBot` in a group chat. Without a known
/// username every command is taken as ours.
pub fn addressed_elsewhere(text: &str, bot_username: Option<&str>) -> bool {
    let Some(ours) = bot_username else {
        return false;
    };
    let Some(word) = text.split_whitespace().next().and_then(|w| w.strip_prefix('/')) else {
        return false;
    };
    match word.split_once('@') {
        Some((_, target)) => !target.eq_ignore_ascii_case(ours),
        None => false,
    }
}

const UNKNOWN: &str = "Unknown command. Send /start to see what I can do.";

pub fn main_menu() -> String {
    let mut menu = String::from(
        "This bot plans fractional distillation runs. Choose a function:\n",
    );
    for (name, description) in COMMANDS.iter().skip(1) {
        menu.push_str(&format!("/{name} - {description}\n"));
    }
    menu
}

fn prompt(pending: Pending) -> &'static str {
    match pending {
        Pending::Strength => {
            "Enter the cube, vapor and distillate temperatures separated by spaces (e.g. 84.8 82.2 15):"
        }
        Pending::Fractions => {
            "Enter the batch volume (L) and its strength (%) separated by a space (e.g. 47 29):"
        }
        Pending::Speed => "Enter the raw spirit volume charged into the cube (L) (e.g. 47):",
        Pending::SetConstants => {
            "Enter the new values separated by spaces:\n\
             cube_volume head_% body_% pre_tail_% tail_% average_head_strength\n\
             Example: 50 5 20 2 10 81.5"
        }
    }
}

/// Handle one incoming message from `user` and return the reply.
pub fn respond(
    sessions: &mut Sessions,
    store: &dyn SettingsStore,
    user: UserId,
    text: &str,
) -> String {
    let text = text.trim();

    if text.starts_with('/') {
        let Some(command) = Command::parse(text) else {
            return UNKNOWN.to_string();
        };
        debug!(%user, ?command, "command");
        return run_command(sessions, store, user, command);
    }

    match sessions.current(user) {
        Some(pending) => {
            let reply = match pending {
                Pending::Strength => strength_input(text),
                Pending::Fractions => fractions_input(store, user, text),
                Pending::Speed => speed_input(store, user, text),
                Pending::SetConstants => set_constants_input(store, user, text),
            };
            match reply {
                Ok(reply) => {
                    sessions.finish(user);
                    reply
                }
                // Stay in the awaiting state so the user can retry.
                Err(error) => error,
            }
        }
        None => UNKNOWN.to_string(),
    }
}

fn run_command(
    sessions: &mut Sessions,
    store: &dyn SettingsStore,
    user: UserId,
    command: Command,
) -> String {
    let await_input = |sessions: &mut Sessions, pending: Pending| {
        sessions.begin(user, pending);
        prompt(pending).to_string()
    };

    match command {
        Command::Strength => await_input(sessions, Pending::Strength),
        Command::Fractions => await_input(sessions, Pending::Fractions),
        Command::Speed => await_input(sessions, Pending::Speed),
        Command::SetConstants => await_input(sessions, Pending::SetConstants),
        Command::Cancel => match sessions.finish(user) {
            Some(_) => "Cancelled.".to_string(),
            None => "Nothing to cancel.".to_string(),
        },
        Command::Start => {
            sessions.finish(user);
            main_menu()
        }
        Command::Constants => {
            sessions.finish(user);
            show_constants(store, user)
        }
        Command::Report => {
            sessions.finish(user);
            report(store, user)
        }
    }
}

fn strength_input(text: &str) -> Result<String, String> {
    let [cube, vapor, distillate] =
        parse_numbers::<3>(text).map_err(|e| format!("Input error: {e}."))?;
    let reading =
        distillate_strength(cube, vapor, distillate).map_err(|e| format!("Error: {e}."))?;
    Ok(format!("Strength at 20 °C: {:.2}%", reading.corrected_pct))
}

fn fractions_input(store: &dyn SettingsStore, user: UserId, text: &str) -> Result<String, String> {
    let [volume, strength] = parse_numbers::<2>(text).map_err(|e| format!("Input error: {e}."))?;
    validate_batch(volume, strength).map_err(|e| format!("Error: {e}."))?;
    let f = calculate_fractions(volume, strength, &store.resolve(user));
    Ok(format!(
        "Absolute alcohol: {:.2} L\n\
         Heads (by volume): {:.2} L\n\
         Heads (by absolute alcohol): {:.2} L\n\
         Body: {:.2} L\n\
         Pre-tails: {:.2} L\n\
         Tails: {:.2} L",
        f.absolute_alcohol, f.heads_by_volume, f.heads_by_alcohol, f.body, f.pre_tails, f.tails
    ))
}

fn speed_input(store: &dyn SettingsStore, user: UserId, text: &str) -> Result<String, String> {
    let [raw_spirit] = parse_numbers::<1>(text).map_err(|e| format!("Input error: {e}."))?;
    let cube_volume = store.resolve(user).cube_volume;
    let (min, max) =
        calculate_speed(cube_volume, raw_spirit).map_err(|e| format!("Error: {e}."))?;
    Ok(format!(
        "Minimum collection rate: {min:.2} L/h\nMaximum collection rate: {max:.2} L/h"
    ))
}

fn set_constants_input(
    store: &dyn SettingsStore,
    user: UserId,
    text: &str,
) -> Result<String, String> {
    let values = parse_numbers::<6>(text).map_err(|e| format!("Input error: {e}."))?;
    let constants = UserConstants::from_values(values).map_err(|e| format!("Input error: {e}."))?;
    match store.save(user, constants) {
        Ok(()) => {
            info!(%user, "constants updated");
            Ok("Constants updated!".to_string())
        }
        Err(e) => {
            warn!(%user, error = %e, "constants not persisted");
            Ok("Constants updated for now, but could not be saved permanently.".to_string())
        }
    }
}

fn format_constants(c: &UserConstants) -> String {
    format!(
        "Cube volume: {} L\n\
         Heads: {}%\n\
         Body: {}%\n\
         Pre-tails: {}%\n\
         Tails: {}%\n\
         Average head strength: {}%",
        c.cube_volume,
        c.head_percentage,
        c.body_percentage,
        c.pre_tail_percentage,
        c.tail_percentage,
        c.average_head_strength
    )
}

fn show_constants(store: &dyn SettingsStore, user: UserId) -> String {
    match store.load(user) {
        Some(constants) => format!("Current constants:\n{}", format_constants(&constants)),
        None => format!(
            "You have no saved constants yet; the defaults are used.\nCurrent constants:\n{}",
            format_constants(&store.resolve(user))
        ),
    }
}

fn report(store: &dyn SettingsStore, user: UserId) -> String {
    let Some(constants) = store.load(user) else {
        return "You have no saved constants yet. Set them with /set_constants.".to_string();
    };
    match BatchReport::build(&constants) {
        Ok(r) => format!(
            "Batch report:\n\
             Cube volume: {} L\n\
             Raw spirit: {:.2} L\n\
             Heads: {:.2} L ({}%)\n\
             Body: {:.2} L ({}%)\n\
             Pre-tails: {:.2} L ({}%)\n\
             Tails: {:.2} L ({}%)\n\
             Average head strength: {}%\n\
             Minimum collection rate: {:.2} L/h\n\
             Maximum collection rate: {:.2} L/h",
            r.constants.cube_volume,
            r.raw_spirit_volume,
            r.heads,
            r.constants.head_percentage,
            r.body,
            r.constants.body_percentage,
            r.pre_tails,
            r.constants.pre_tail_percentage,
            r.tails,
            r.constants.tail_percentage,
            r.constants.average_head_strength,
            r.min_rate,
            r.max_rate,
        ),
        Err(e) => format!("Error: {e}."),
    }
}
