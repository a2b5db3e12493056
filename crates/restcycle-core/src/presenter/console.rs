//! In-terminal banner transport.

use super::{PresentError, Presenter};

/// Prints a bordered banner to stderr with a BEL so a terminal left in
/// the background still chirps. Always available; this is the floor the
/// chain degrades to.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl Presenter for ConsolePresenter {
    fn name(&self) -> &str {
        "console"
    }

    fn present(&self, title: &str, body: &str, require_ack: bool) -> Result<(), PresentError> {
        eprintln!();
        eprintln!("\x07========================================");
        eprintln!("  {title}");
        eprintln!("  {body}");
        if require_ack {
            eprintln!("  Run `restcycle rest` to start resting.");
        }
        eprintln!("========================================");
        Ok(())
    }
}
