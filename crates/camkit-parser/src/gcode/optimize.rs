//! Redundant word and command removal

use super::command::{ParsedCommand, AXIS_LETTERS};
use super::modal::ModalState;

/// Remove redundant commands and words
///
/// - A command whose modal code and parameters repeat the previous kept
///   command exactly is dropped.
/// - Axis words (X Y Z A B C) equal to the previous kept command's value are
///   dropped.
/// - Neither rule applies under incremental distance mode, where a repeated
///   value is a real move.
/// - A command left without parameters that repeats the previous code is
///   dropped.
///
/// Running it twice gives the same result as running it once.
pub fn optimize(commands: &[ParsedCommand]) -> Vec<ParsedCommand> {
    let mut optimized: Vec<ParsedCommand> = Vec::with_capacity(commands.len());

    for command in commands {
        let Some(previous) = optimized.last() else {
            optimized.push(command.clone());
            continue;
        };

        let code = command.code();
        let same_code = code == previous.code();
        let incremental = command.modal.is_incremental();
        if !incremental
            && same_code
            && code.is_some_and(|c| ModalState::is_modal(&c))
            && command.params == previous.params
        {
            continue;
        }

        let mut filtered = command.clone();
        if !incremental {
            filtered.params.retain(|letter, value| {
                !(AXIS_LETTERS.contains(letter) && previous.params.get(letter) == Some(value))
            });
        }

        if filtered.params.is_empty() && same_code {
            continue;
        }
        optimized.push(filtered);
    }

    optimized
}
