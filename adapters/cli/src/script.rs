//! Text scripts that drive a headless session.

use std::{num::ParseIntError, str::FromStr, time::Duration};

use bomber_core::Direction;
use bomber_system_controls::ControlsInput;
use thiserror::Error;

/// Single scripted action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Presses the bomb key for one frame.
    Bomb,
    /// Presses the restart key for one frame.
    Restart,
    /// Lets time pass without input.
    Wait(Duration),
    /// Holds a direction key.
    Walk {
        /// Heading held for the whole duration.
        direction: Direction,
        /// How long the key stays down.
        duration: Duration,
    },
}

impl Step {
    /// Simulated time the step spans. Key presses take a zero-length frame.
    pub(crate) fn duration(&self) -> Duration {
        match self {
            Self::Bomb | Self::Restart => Duration::ZERO,
            Self::Wait(duration) | Self::Walk { duration, .. } => *duration,
        }
    }

    /// Input held while the step runs.
    pub(crate) fn input(&self) -> ControlsInput {
        let mut input = ControlsInput::default();
        match self {
            Self::Bomb => input.place_bomb = true,
            Self::Restart => input.restart = true,
            Self::Wait(_) => {}
            Self::Walk { direction, .. } => match direction {
                Direction::North => input.up = true,
                Direction::East => input.right = true,
                Direction::South => input.down = true,
                Direction::West => input.left = true,
            },
        }
        input
    }
}

impl FromStr for Step {
    type Err = ScriptError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let (action, argument) = match token.split_once(':') {
            Some((action, argument)) => (action, Some(argument)),
            None => (token, None),
        };

        let duration = || -> Result<Duration, ScriptError> {
            let millis = argument.ok_or_else(|| ScriptError::MissingDuration(token.to_owned()))?;
            let millis = millis
                .parse::<u64>()
                .map_err(|source| ScriptError::InvalidDuration {
                    token: token.to_owned(),
                    source,
                })?;
            Ok(Duration::from_millis(millis))
        };
        let walk = |direction| -> Result<Self, ScriptError> {
            Ok(Self::Walk {
                direction,
                duration: duration()?,
            })
        };

        match action {
            "bomb" if argument.is_none() => Ok(Self::Bomb),
            "restart" if argument.is_none() => Ok(Self::Restart),
            "wait" => Ok(Self::Wait(duration()?)),
            "up" => walk(Direction::North),
            "right" => walk(Direction::East),
            "down" => walk(Direction::South),
            "left" => walk(Direction::West),
            _ => Err(ScriptError::UnknownAction(token.to_owned())),
        }
    }
}

/// Parses whitespace separated steps such as `right:200 bomb wait:4000`.
pub(crate) fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    script.split_whitespace().map(str::parse).collect()
}

/// Reasons a script fails to parse.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The token named no known action.
    #[error("unknown script action `{0}`")]
    UnknownAction(String),
    /// A timed action was written without `:<milliseconds>`.
    #[error("script action `{0}` needs a duration in milliseconds")]
    MissingDuration(String),
    /// The duration was not a whole number of milliseconds.
    #[error("script action `{token}` has an invalid duration")]
    InvalidDuration {
        /// Offending token.
        token: String,
        /// Parser failure.
        #[source]
        source: ParseIntError,
    },
}
