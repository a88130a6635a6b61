pub mod keyboard;

pub use keyboard::{KeyEvent, KeyId, KeyState};

/// Сигнал детектора: все клавиши аккорда удерживаются одновременно
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordTriggered;

/// События панели ввода, поступающие в контроллер
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    QueryChanged(String),
    Commit,
}
