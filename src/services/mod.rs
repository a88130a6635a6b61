pub mod builtin;
pub mod chord_detector;
pub mod completion;
pub mod controller;
pub mod executable_index;
pub mod key_event_source;
pub mod launcher;
pub mod panel;

pub use chord_detector::ChordDetector;
pub use completion::CompletionEngine;
pub use controller::LauncherController;
pub use executable_index::ExecutableIndex;
pub use key_event_source::create_key_event_source;
pub use launcher::create_process_launcher;
pub use panel::create_panel;
