use access_shared::KeyId;
use heapless::Vec;

/// Keys with a control meaning outside of digit entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlKey {
    /// Pressed as the first key after power-up to open enrollment.
    Enroll,
    /// Enroll another code after one was saved.
    Repeat,
    /// Leave enrollment and start verifying codes.
    Finish,
}

const CONTROL_KEYS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Binding {
    control: ControlKey,
    key: KeyId,
}

/// Map from control actions to keypad symbols.
///
/// Controls are only consulted in the state where they apply, so the enroll
/// key may share a symbol with repeat or finish. During code entry every key,
/// bound or not, is taken as a code symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Keymap {
    bindings: Vec<Binding, CONTROL_KEYS>,
}

impl Default for Keymap {
    fn default() -> Self {
        let mut map = Self {
            bindings: Vec::new(),
        };
        map.bind(ControlKey::Enroll, KeyId::STAR);
        map.bind(ControlKey::Repeat, KeyId::A);
        map.bind(ControlKey::Finish, KeyId::B);
        map
    }
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `control` to `key`, replacing its previous binding.
    pub fn bind(&mut self, control: ControlKey, key: KeyId) {
        if let Some(existing) = self
            .bindings
            .iter_mut()
            .find(|binding| binding.control == control)
        {
            existing.key = key;
        } else {
            // one binding per control, so capacity is never exceeded
            let _ = self.bindings.push(Binding { control, key });
        }
    }

    /// Key currently bound to `control`.
    pub fn key_for(&self, control: ControlKey) -> Option<KeyId> {
        self.bindings
            .iter()
            .find(|binding| binding.control == control)
            .map(|binding| binding.key)
    }

    /// Whether `key` triggers `control`.
    pub fn is(&self, control: ControlKey, key: KeyId) -> bool {
        self.key_for(control) == Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_uses_star_and_letters() {
        let keymap = Keymap::default();
        assert!(keymap.is(ControlKey::Enroll, KeyId::STAR));
        assert!(keymap.is(ControlKey::Repeat, KeyId::A));
        assert!(keymap.is(ControlKey::Finish, KeyId::B));
        assert!(!keymap.is(ControlKey::Finish, KeyId::A));
    }

    #[test]
    fn rebinding_replaces_previous_key() {
        let mut keymap = Keymap::default();
        let one = KeyId::digit(1).unwrap();
        keymap.bind(ControlKey::Repeat, one);

        assert!(keymap.is(ControlKey::Repeat, one));
        assert!(!keymap.is(ControlKey::Repeat, KeyId::A));
        assert_eq!(keymap.key_for(ControlKey::Enroll), Some(KeyId::STAR));
    }

    #[test]
    fn enroll_may_share_a_key_with_confirm_controls() {
        let mut keymap = Keymap::default();
        keymap.bind(ControlKey::Finish, KeyId::STAR);

        assert!(keymap.is(ControlKey::Enroll, KeyId::STAR));
        assert!(keymap.is(ControlKey::Finish, KeyId::STAR));
    }
}
