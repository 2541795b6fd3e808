use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

// "█▉▊▋▌▍▎▏  ·"
const PROGRES_CHARS: &str =
    "\u{2588}\u{2589}\u{258a}\u{258b}\u{258c}\u{258d}\u{258e}\u{258f}  \u{b7}";

const PROGRES_CHARS_SPINNER: &[&str] = &[
    "\u{2801}", "\u{2802}", "\u{2804}", "\u{2840}", "\u{2880}", "\u{2820}", "\u{2810}", "\u{2808}",
    "",
];

#[derive(Default, Debug)]
pub struct Bar {
    pub progress: Option<ProgressBar>,
}

impl Bar {
    /// Byte progress of an upload, nothing when `quiet`.
    #[must_use]
    pub fn new(file_size: u64, quiet: bool) -> Self {
        if quiet {
            return Self::default();
        }

        let pb = ProgressBar::new(file_size);

        let style_result = ProgressStyle::default_bar().template(
            "[{elapsed_precise}] {msg:8} {bar:50.green/blue} {bytes}/{total_bytes} ({bytes_per_sec} - {eta})",
        );

        let style = match style_result {
            Ok(style) => style,
            Err(err) => {
                eprintln!("Error creating progress bar style: {err}");
                return Self { progress: None };
            }
        };

        pb.set_style(style.progress_chars(PROGRES_CHARS));

        Self { progress: Some(pb) }
    }

    /// Spinner shown while waiting on an output.
    #[must_use]
    pub fn new_spinner(quiet: bool) -> Self {
        if quiet {
            return Self::default();
        }

        let pb = ProgressBar::new_spinner();

        pb.enable_steady_tick(Duration::from_millis(200));

        let style_result = ProgressStyle::default_spinner()
            .tick_strings(PROGRES_CHARS_SPINNER)
            .template("[{elapsed_precise}] {msg} {spinner:.green}");

        let style = match style_result {
            Ok(s) => s,
            Err(err) => {
                eprintln!("Error creating spinner style: {err}");
                return Self { progress: None };
            }
        };

        pb.set_style(style);

        Self { progress: Some(pb) }
    }

    pub fn set_message(&self, msg: String) {
        if let Some(pb) = &self.progress {
            pb.set_message(msg);
        }
    }

    pub fn finish(&self) {
        if let Some(pb) = &self.progress {
            pb.finish();
        }
    }

    pub fn finish_and_clear(&self) {
        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_has_no_bar() {
        assert!(Bar::new(10, true).progress.is_none());
        assert!(Bar::new_spinner(true).progress.is_none());
    }

    #[test]
    fn test_bar_length() {
        let bar = Bar::new(1024, false);
        let pb = bar.progress.as_ref();
        assert!(pb.is_some());
        assert_eq!(pb.and_then(ProgressBar::length), Some(1024));
        bar.finish_and_clear();
    }
}
