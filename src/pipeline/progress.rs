// file: src/pipeline/progress.rs
// description: progress bars and run statistics for the study pipeline
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    pub page_count: usize,
    pub question_chunks: usize,
    pub answer_chunks: usize,
    pub questions_generated: usize,
    pub questions_answered: usize,
    pub questions_failed: usize,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn questions_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.questions_answered as f64 / self.duration_secs as f64
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.questions_answered + self.questions_failed;
        if total == 0 {
            return 0.0;
        }
        (self.questions_answered as f64 / total as f64) * 100.0
    }
}

/// Tracks the answer loop: one tick per question, answered or failed.
pub struct ProgressTracker {
    bar: ProgressBar,
    answered: usize,
    failed: usize,
}

impl ProgressTracker {
    pub fn new(total_questions: usize) -> Self {
        Self::with_bar(step_bar(total_questions as u64, "Answering"))
    }

    pub fn hidden() -> Self {
        Self::with_bar(ProgressBar::hidden())
    }

    fn with_bar(bar: ProgressBar) -> Self {
        Self {
            bar,
            answered: 0,
            failed: 0,
        }
    }

    pub fn start_question(&self, ordinal: usize, total: usize) {
        self.bar
            .set_message(format!("Answering question {} of {}", ordinal, total));
    }

    pub fn inc_answered(&mut self) {
        self.answered += 1;
        self.bar.inc(1);
    }

    pub fn inc_failed(&mut self) {
        self.failed += 1;
        self.bar.inc(1);
    }

    pub fn answered(&self) -> usize {
        self.answered
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Bar for a known number of sequential provider calls.
pub fn step_bar(total: u64, prefix: &str) -> ProgressBar {
    let bar = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("\t{spinner:.green} {prefix} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
    {
        bar.set_style(style.progress_chars("█▓▒░"));
    }
    bar.set_prefix(prefix.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_calculations() {
        let mut stats = PipelineStats::new();
        stats.questions_answered = 9;
        stats.questions_failed = 1;
        stats.duration_secs = 3;

        assert_eq!(stats.questions_per_second(), 3.0);
        assert!((stats.success_rate() - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_pipeline_stats_zero_duration() {
        let stats = PipelineStats::new();
        assert_eq!(stats.questions_per_second(), 0.0);
        assert_eq!(stats.success_rate(), 0.0);
    }

    #[test]
    fn test_progress_tracker_counts() {
        let mut tracker = ProgressTracker::hidden();

        tracker.start_question(1, 3);
        tracker.inc_answered();
        tracker.inc_answered();
        tracker.inc_failed();

        assert_eq!(tracker.answered(), 2);
        assert_eq!(tracker.failed(), 1);
    }
}
