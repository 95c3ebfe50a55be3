use anyhow::{Result, bail};
use penmaze_core::Direction;

/// Largest repeat count accepted in front of a run of keys.
pub const MAX_REPEAT: usize = 1000;

/// One scripted key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ScriptStep {
    Move(Direction),
    Reset,
}

/// Parses a move script such as `"ddr"`, `"down, right"` or `"7d 7r x"`.
///
/// Tokens are separated by commas or whitespace. A token is a word (`up`, `reset`), or a run
/// of single-letter keys (`u`, `d`, `l`, `r`, `x` for reset), optionally prefixed with a
/// repeat count.
pub fn parse_script(script: &str) -> Result<Vec<ScriptStep>> {
    let mut steps = Vec::new();
    for token in script.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }

        let digits = token.len() - token.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let (count, keys) = token.split_at(digits);
        let count = if count.is_empty() { 1 } else { count.parse::<usize>()? };
        if count > MAX_REPEAT {
            bail!("repeat count {count} in {token:?} exceeds {MAX_REPEAT}");
        }
        if keys.is_empty() {
            bail!("repeat count without keys in {token:?}");
        }

        let run = match word(keys) {
            Some(step) => vec![step],
            None => keys.chars().map(|key| letter(key, token)).collect::<Result<_>>()?,
        };
        for _ in 0..count {
            steps.extend_from_slice(&run);
        }
    }
    Ok(steps)
}

fn word(token: &str) -> Option<ScriptStep> {
    if token.eq_ignore_ascii_case("reset") {
        return Some(ScriptStep::Reset);
    }
    match Direction::from_token(token) {
        Some(direction) if token.len() > 1 => Some(ScriptStep::Move(direction)),
        _ => None,
    }
}

fn letter(key: char, token: &str) -> Result<ScriptStep> {
    if key.eq_ignore_ascii_case(&'x') {
        return Ok(ScriptStep::Reset);
    }
    match Direction::from_token(key.encode_utf8(&mut [0; 4])) {
        Some(direction) => Ok(ScriptStep::Move(direction)),
        None => bail!("unknown key {key:?} in {token:?}"),
    }
}
