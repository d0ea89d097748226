//! Output formatting and progress bars for CLI

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Error, Result,
    pipeline::ComparisonRow,
    ports::{Agent, Observer},
    types::Transition,
};

/// Create a progress bar counting experiment steps
pub fn create_progress(total_steps: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total_steps);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} steps ({msg})")
            .map_err(|e| Error::ProgressBarTemplate {
                message: e.to_string(),
            })?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Observer driving a progress bar; shows finished episodes and the running reward.
#[derive(Default)]
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    episodes: usize,
    total_reward: f64,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self::default()
    }

    fn message(&self) -> String {
        format!("episodes: {} reward: {:.1}", self.episodes, self.total_reward)
    }
}

impl<S> Observer<S> for ProgressObserver {
    fn on_experiment_start(&mut self, n_steps: usize) -> Result<()> {
        self.progress_bar = Some(create_progress(n_steps as u64)?);
        Ok(())
    }

    fn on_step(
        &mut self,
        step: usize,
        transition: &Transition<S>,
        _agent: &dyn Agent<S>,
    ) -> Result<()> {
        self.total_reward += transition.reward;
        if let Some(pb) = &self.progress_bar {
            pb.set_position(step as u64 + 1);
            // Redrawing the message every step dominates short runs
            if step % 100 == 0 {
                pb.set_message(self.message());
            }
        }
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize) -> Result<()> {
        self.episodes = episode;
        Ok(())
    }

    fn on_experiment_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print the comparison rows as an aligned table
pub fn print_comparison_table(rows: &[ComparisonRow]) {
    println!(
        "{:<20} {:>6} {:>14} {:>12} {:>14} {:>12}",
        "algorithm", "runs", "max Q mean", "max Q std", "reward mean", "reward std"
    );
    println!("{}", "-".repeat(83));
    for row in rows {
        println!(
            "{:<20} {:>6} {:>14.4} {:>12.4} {:>14.4} {:>12.4}",
            row.algorithm,
            row.runs,
            row.max_q_mean,
            row.max_q_std,
            row.reward_mean,
            row.reward_std
        );
    }
}
