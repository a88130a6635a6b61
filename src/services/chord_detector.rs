use crate::config::ChordConfig;
use crate::debug_if_enabled;
use crate::events::{KeyEvent, KeyId, KeyState};
use smallvec::SmallVec;
use tracing::info;

/// Детектор глобального аккорда.
///
/// Копит различные нажатые клавиши аккорда; когда удерживаются все,
/// срабатывает один раз и сбрасывает состояние. Отпускание клавиши аккорда
/// убирает из состояния только её.
#[derive(Debug)]
pub struct ChordDetector {
    chord: SmallVec<[KeyId; 4]>,
    held: SmallVec<[KeyId; 4]>,
}

impl ChordDetector {
    pub fn new(config: &ChordConfig) -> Self {
        let chord = config.key_ids();
        info!("Аккорд активации: {}", config.keys.join("+"));
        Self {
            chord,
            held: SmallVec::new(),
        }
    }

    /// Обрабатывает событие; `true` - аккорд сработал
    pub fn process(&mut self, event: &KeyEvent) -> bool {
        if !self.chord.contains(&event.key_id) {
            return false;
        }

        match event.state {
            KeyState::Pressed => {
                // Автоповтор уже удерживаемой клавиши ничего не меняет
                if self.held.contains(&event.key_id) {
                    return false;
                }
                self.held.push(event.key_id);
                debug_if_enabled!(
                    "Клавиша аккорда {} нажата ({}/{})",
                    event.logical_name,
                    self.held.len(),
                    self.chord.len()
                );

                if self.held.len() == self.chord.len() {
                    self.held.clear();
                    info!("Аккорд сработал");
                    return true;
                }
                false
            }
            KeyState::Released => {
                if let Some(pos) = self.held.iter().position(|k| *k == event.key_id) {
                    self.held.remove(pos);
                    debug_if_enabled!("Клавиша аккорда {} отпущена", event.logical_name);
                }
                false
            }
        }
    }

    #[allow(dead_code)]
    pub fn is_idle(&self) -> bool {
        self.held.is_empty()
    }

    #[allow(dead_code)]
    pub fn held(&self) -> &[KeyId] {
        &self.held
    }
}
