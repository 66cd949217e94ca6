use rand::Rng;
use serde::{Deserialize, Serialize};

/// How the frozen output walks through the captured history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreezeMode {
    #[default]
    Random,
    Loop,
    BackAndForth,
}

/// Playback direction, only meaningful for [`FreezeMode::BackAndForth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Next frame to display out of `count` loaded frames.
///
/// Pure apart from the single draw from `rng` in random mode.
pub fn next_frame<R: Rng + ?Sized>(
    mode: FreezeMode,
    count: usize,
    prev: usize,
    direction: Direction,
    rng: &mut R,
) -> (usize, Direction) {
    if count <= 1 {
        return (0, direction);
    }

    let last = count - 1;
    // selection and buffer size may disagree for one tick after a resize
    let prev = prev.min(last);

    match mode {
        FreezeMode::Random => (rng.gen_range(0..count), direction),
        FreezeMode::Loop => {
            if prev < last {
                (prev + 1, direction)
            } else {
                (0, direction)
            }
        }
        FreezeMode::BackAndForth => match direction {
            Direction::Backward if prev > 0 => (prev - 1, Direction::Backward),
            Direction::Backward => (1, Direction::Forward),
            Direction::Forward if prev < last => (prev + 1, Direction::Forward),
            Direction::Forward => (last - 1, Direction::Backward),
        },
    }
}
