use crate::config::Config;
use crate::events::PanelEvent;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::console_panel::{forward_input, ConsolePanel};

/// Trait for the command input panel
pub trait Panel: Send {
    /// Bring the panel to front and clear its input
    fn activate(&mut self);

    /// Show the current match list
    fn show_matches(&mut self, matches: &[String]);
}

/// Factory function: creates the console panel and starts forwarding stdin to it.
///
/// Must be called from within a tokio runtime.
pub fn create_panel(config: Arc<Config>) -> (Box<dyn Panel>, UnboundedReceiver<PanelEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let panel = ConsolePanel::stdout(config.panel.clone());

    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        forward_input(stdin, tx).await;
    });

    (Box::new(panel), rx)
}
