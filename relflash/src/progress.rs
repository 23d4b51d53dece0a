use indicatif::{ProgressBar, ProgressStyle};
use relflash_lib::ProgressCallback;

/// Flash progress rendered as one indicatif bar per file.
pub struct FlashProgress {
    bar: Option<ProgressBar>,
    current_file: Option<usize>,
}

impl FlashProgress {
    pub fn new() -> Self {
        Self {
            bar: None,
            current_file: None,
        }
    }
}

impl ProgressCallback for FlashProgress {
    fn progress(&mut self, file_index: usize, written: u64, total: u64) {
        if self.current_file != Some(file_index) {
            if let Some(bar) = self.bar.take() {
                bar.finish();
            }
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template("{prefix:>8} [{bar:40}] {percent:>3}%")
                    .unwrap()
                    .progress_chars("=> "),
            );
            bar.set_prefix(format!("file {file_index}"));
            self.bar = Some(bar);
            self.current_file = Some(file_index);
        }

        if let Some(bar) = &self.bar {
            bar.set_length(total);
            bar.set_position(written.min(total));
        }
    }
}

impl Drop for FlashProgress {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}
