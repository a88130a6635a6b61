use crate::events::KeyId;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Таблица evdev код -> символьное имя (в нотации X keysym).
///
/// Строится один раз при первом обращении; никакого перебора констант
/// во время работы.
static CODE_TO_NAME: &[(u16, &str)] = &[
    // Служебные клавиши
    (1, "Escape"),
    (14, "BackSpace"),
    (15, "Tab"),
    (28, "Return"),
    (57, "space"),
    (58, "Caps_Lock"),
    (69, "Num_Lock"),
    (70, "Scroll_Lock"),
    // Цифровые клавиши (верхний ряд)
    (2, "1"),
    (3, "2"),
    (4, "3"),
    (5, "4"),
    (6, "5"),
    (7, "6"),
    (8, "7"),
    (9, "8"),
    (10, "9"),
    (11, "0"),
    (12, "minus"),
    (13, "equal"),
    // Буквенные клавиши
    (16, "q"),
    (17, "w"),
    (18, "e"),
    (19, "r"),
    (20, "t"),
    (21, "y"),
    (22, "u"),
    (23, "i"),
    (24, "o"),
    (25, "p"),
    (26, "bracketleft"),
    (27, "bracketright"),
    (30, "a"),
    (31, "s"),
    (32, "d"),
    (33, "f"),
    (34, "g"),
    (35, "h"),
    (36, "j"),
    (37, "k"),
    (38, "l"),
    (39, "semicolon"),
    (40, "apostrophe"),
    (41, "grave"),
    (43, "backslash"),
    (44, "z"),
    (45, "x"),
    (46, "c"),
    (47, "v"),
    (48, "b"),
    (49, "n"),
    (50, "m"),
    (51, "comma"),
    (52, "period"),
    (53, "slash"),
    // Модификаторы
    (29, "Control_L"),
    (97, "Control_R"),
    (42, "Shift_L"),
    (54, "Shift_R"),
    (56, "Alt_L"),
    (100, "Alt_R"),
    (125, "Super_L"),
    (126, "Super_R"),
    (127, "Menu"),
    // Функциональные клавиши
    (59, "F1"),
    (60, "F2"),
    (61, "F3"),
    (62, "F4"),
    (63, "F5"),
    (64, "F6"),
    (65, "F7"),
    (66, "F8"),
    (67, "F9"),
    (68, "F10"),
    (87, "F11"),
    (88, "F12"),
    // Навигация
    (102, "Home"),
    (103, "Up"),
    (104, "Prior"),
    (105, "Left"),
    (106, "Right"),
    (107, "End"),
    (108, "Down"),
    (109, "Next"),
    (110, "Insert"),
    (111, "Delete"),
    (55, "KP_Multiply"),
];

static BY_CODE: Lazy<HashMap<u16, &'static str>> =
    Lazy::new(|| CODE_TO_NAME.iter().copied().collect());

static BY_NAME: Lazy<HashMap<&'static str, u16>> =
    Lazy::new(|| CODE_TO_NAME.iter().map(|&(code, name)| (name, code)).collect());

/// Маппинг между кодами evdev и символьными именами клавиш
pub struct KeyNames;

impl KeyNames {
    /// Символьное имя клавиши; для неизвестных кодов - `[код]`
    pub fn name_of(key: KeyId) -> String {
        match BY_CODE.get(&key.value()) {
            Some(name) => (*name).to_string(),
            None => format!("[{}]", key.value()),
        }
    }

    /// Код клавиши по имени (имена чувствительны к регистру, как в X keysym)
    pub fn id_of(name: &str) -> Option<KeyId> {
        BY_NAME.get(name).copied().map(KeyId)
    }

    pub fn is_known(name: &str) -> bool {
        BY_NAME.contains_key(name)
    }
}
