//! Error display for the CLI.

use colored::Colorize;
use nimble_id::IdError;

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    if let Some(id_err) = err.downcast_ref::<IdError>() {
        match id_err {
            IdError::InvalidLength { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: Slugs end in a 26-character identifier, e.g. `goblin-2n1t201rmv87aae5j4csam8000`."
                        .yellow()
                );
            }
            IdError::InvalidCharacter { character, .. } if character.is_ascii_uppercase() => {
                eprintln!("\n{}", "Hint: Identifiers are lowercase.".yellow());
            }
            IdError::Overflow { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: The first identifier character must be 0-7.".yellow()
                );
            }
            _ => {}
        }
    }
}
