use crate::mappings::KeyNames;
use std::fmt;

/// Состояние клавиши
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Код клавиши (evdev коды)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyId(pub u16);

impl KeyId {
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KEY_{}", self.0)
    }
}

/// Событие клавиатуры, полученное от глобального источника.
///
/// Неизменяемо и потребляется ровно один раз.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub state: KeyState,
    pub key_id: KeyId,
    pub logical_name: String,
}

impl KeyEvent {
    pub fn new(state: KeyState, key_id: KeyId) -> Self {
        Self {
            state,
            key_id,
            logical_name: KeyNames::name_of(key_id),
        }
    }

    pub fn press(key_id: KeyId) -> Self {
        Self::new(KeyState::Pressed, key_id)
    }

    pub fn release(key_id: KeyId) -> Self {
        Self::new(KeyState::Released, key_id)
    }

    /// Трансляция сырого EV_KEY значения evdev.
    ///
    /// 1 - нажатие, 0 - отпускание, 2 - автоповтор (считается нажатием).
    /// Прочие значения - аномалия протокола, событие отбрасывается.
    pub fn from_raw(code: u16, value: i32) -> Option<Self> {
        let state = match value {
            0 => KeyState::Released,
            1 | 2 => KeyState::Pressed,
            _ => return None,
        };
        Some(Self::new(state, KeyId(code)))
    }

    #[allow(dead_code)]
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Pressed
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}) {:?}", self.logical_name, self.key_id, self.state)
    }
}
