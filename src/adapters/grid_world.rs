//! Stochastic grid world used to expose maximization bias
//!
//! The agent starts in the bottom-left cell and must reach the top-right
//! goal. Every step that does not reach the goal pays -12 or +10 with equal
//! probability (expected -1); entering the goal pays +5 and ends the episode.
//! Noisy rewards make `max` over noisy estimates overshoot, which is exactly
//! what Double and Weighted Q-Learning correct.

use rand::{Rng, rngs::StdRng};

use crate::{
    Error, Result,
    ports::{Environment, StepOutcome},
    types::{ActionSpace, MdpInfo},
    utils::build_rng,
};

pub const UP: usize = 0;
pub const DOWN: usize = 1;
pub const LEFT: usize = 2;
pub const RIGHT: usize = 3;

/// Grid world with cells indexed row-major from the top-left corner.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    start: usize,
    goal: usize,
    goal_reward: f64,
    step_rewards: (f64, f64),
    current: usize,
    mdp_info: MdpInfo,
    rng: StdRng,
}

impl GridWorld {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the grid is empty or the
    /// start or goal cell lies outside it.
    pub fn new(
        width: usize,
        height: usize,
        start: usize,
        goal: usize,
        gamma: f64,
        seed: Option<u64>,
    ) -> Result<Self> {
        let cells = width * height;
        if cells == 0 || start >= cells || goal >= cells {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "grid {width}x{height} cannot hold start {start} and goal {goal}"
                ),
            });
        }
        Ok(Self {
            width,
            height,
            start,
            goal,
            goal_reward: 5.0,
            step_rewards: (-12.0, 10.0),
            current: start,
            mdp_info: MdpInfo::new(gamma, ActionSpace::discrete(4)?)?,
            rng: build_rng(seed),
        })
    }

    /// The 3x3 layout with `gamma = 0.95`.
    pub fn three_by_three(seed: Option<u64>) -> Result<Self> {
        Self::new(3, 3, 6, 2, 0.95, seed)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn goal(&self) -> usize {
        self.goal
    }

    /// Every cell index.
    pub fn states(&self) -> Vec<usize> {
        (0..self.width * self.height).collect()
    }

    /// Cell reached by `action` from `cell`; walls keep the agent in place.
    pub fn neighbour(&self, cell: usize, action: usize) -> Result<usize> {
        let (row, col) = (cell / self.width, cell % self.width);
        let (row, col) = match action {
            UP => (row.saturating_sub(1), col),
            DOWN => ((row + 1).min(self.height - 1), col),
            LEFT => (row, col.saturating_sub(1)),
            RIGHT => (row, (col + 1).min(self.width - 1)),
            _ => return Err(Error::InvalidAction { action }),
        };
        Ok(row * self.width + col)
    }
}

impl Environment<usize> for GridWorld {
    fn mdp_info(&self) -> &MdpInfo {
        &self.mdp_info
    }

    fn reset(&mut self) -> usize {
        self.current = self.start;
        self.current
    }

    fn step(&mut self, action: usize) -> Result<StepOutcome<usize>> {
        let next = self.neighbour(self.current, action)?;
        self.current = next;

        if next == self.goal {
            return Ok(StepOutcome {
                next_state: next,
                reward: self.goal_reward,
                absorbing: true,
            });
        }

        let reward = if self.rng.random_bool(0.5) {
            self.step_rewards.0
        } else {
            self.step_rewards.1
        };
        Ok(StepOutcome {
            next_state: next,
            reward,
            absorbing: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walls_keep_agent_in_place() {
        let env = GridWorld::three_by_three(Some(0)).unwrap();
        assert_eq!(env.neighbour(6, LEFT).unwrap(), 6);
        assert_eq!(env.neighbour(6, DOWN).unwrap(), 6);
        assert_eq!(env.neighbour(6, UP).unwrap(), 3);
        assert_eq!(env.neighbour(6, RIGHT).unwrap(), 7);
        assert_eq!(env.neighbour(2, UP).unwrap(), 2);
        assert!(env.neighbour(0, 4).is_err());
    }

    #[test]
    fn test_shortest_path_reaches_goal() {
        let mut env = GridWorld::three_by_three(Some(3)).unwrap();
        assert_eq!(env.reset(), 6);
        for action in [UP, UP, RIGHT] {
            let outcome = env.step(action).unwrap();
            assert!(!outcome.absorbing);
            assert!(outcome.reward == -12.0 || outcome.reward == 10.0);
        }
        let last = env.step(RIGHT).unwrap();
        assert_eq!(last.next_state, 2);
        assert!(last.absorbing);
        assert_eq!(last.reward, 5.0);
    }

    #[test]
    fn test_step_rewards_are_balanced() {
        let mut env = GridWorld::three_by_three(Some(11)).unwrap();
        env.reset();
        let mut wins = 0;
        for _ in 0..2000 {
            // Bumping into the bottom wall never reaches the goal
            if env.step(DOWN).unwrap().reward > 0.0 {
                wins += 1;
            }
        }
        assert!((800..1200).contains(&wins));
    }

    #[test]
    fn test_invalid_layout_rejected() {
        assert!(GridWorld::new(3, 3, 9, 2, 0.9, None).is_err());
        assert!(GridWorld::new(0, 3, 0, 0, 0.9, None).is_err());
    }
}
