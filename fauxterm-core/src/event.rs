use bitflags::bitflags;

/// Handle of a console owned by a [`Context`](crate::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsoleId(pub(crate) u32);

impl ConsoleId {
    /// The raw handle value.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Backend-neutral key code.
///
/// Printable keys use their uppercase ASCII value; everything else sits
/// at 256 and above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(pub u16);

#[rustfmt::skip]
#[allow(missing_docs)]
impl Key {
    pub const SPACE: Key         = Key(32);
    pub const APOSTROPHE: Key    = Key(39);
    pub const COMMA: Key         = Key(44);
    pub const MINUS: Key         = Key(45);
    pub const PERIOD: Key        = Key(46);
    pub const SLASH: Key         = Key(47);
    pub const NUM_0: Key         = Key(48);
    pub const NUM_1: Key         = Key(49);
    pub const NUM_2: Key         = Key(50);
    pub const NUM_3: Key         = Key(51);
    pub const NUM_4: Key         = Key(52);
    pub const NUM_5: Key         = Key(53);
    pub const NUM_6: Key         = Key(54);
    pub const NUM_7: Key         = Key(55);
    pub const NUM_8: Key         = Key(56);
    pub const NUM_9: Key         = Key(57);
    pub const SEMICOLON: Key     = Key(59);
    pub const EQUAL: Key         = Key(61);
    pub const A: Key             = Key(65);
    pub const B: Key             = Key(66);
    pub const C: Key             = Key(67);
    pub const D: Key             = Key(68);
    pub const E: Key             = Key(69);
    pub const F: Key             = Key(70);
    pub const G: Key             = Key(71);
    pub const H: Key             = Key(72);
    pub const I: Key             = Key(73);
    pub const J: Key             = Key(74);
    pub const K: Key             = Key(75);
    pub const L: Key             = Key(76);
    pub const M: Key             = Key(77);
    pub const N: Key             = Key(78);
    pub const O: Key             = Key(79);
    pub const P: Key             = Key(80);
    pub const Q: Key             = Key(81);
    pub const R: Key             = Key(82);
    pub const S: Key             = Key(83);
    pub const T: Key             = Key(84);
    pub const U: Key             = Key(85);
    pub const V: Key             = Key(86);
    pub const W: Key             = Key(87);
    pub const X: Key             = Key(88);
    pub const Y: Key             = Key(89);
    pub const Z: Key             = Key(90);
    pub const LEFT_BRACKET: Key  = Key(91);
    pub const BACKSLASH: Key     = Key(92);
    pub const RIGHT_BRACKET: Key = Key(93);
    pub const GRAVE_ACCENT: Key  = Key(96);
    pub const WORLD_1: Key       = Key(161);
    pub const WORLD_2: Key       = Key(162);

    pub const ESCAPE: Key        = Key(256);
    pub const ENTER: Key         = Key(257);
    pub const TAB: Key           = Key(258);
    pub const BACKSPACE: Key     = Key(259);
    pub const INSERT: Key        = Key(260);
    pub const DELETE: Key        = Key(261);
    pub const RIGHT: Key         = Key(262);
    pub const LEFT: Key          = Key(263);
    pub const DOWN: Key          = Key(264);
    pub const UP: Key            = Key(265);
    pub const PAGE_UP: Key       = Key(266);
    pub const PAGE_DOWN: Key     = Key(267);
    pub const HOME: Key          = Key(268);
    pub const END: Key           = Key(269);
    pub const CAPS_LOCK: Key     = Key(280);
    pub const SCROLL_LOCK: Key   = Key(281);
    pub const NUM_LOCK: Key      = Key(282);
    pub const PRINT_SCREEN: Key  = Key(283);
    pub const PAUSE: Key         = Key(284);
    pub const F1: Key            = Key(290);
    pub const F25: Key           = Key(314);
    pub const KP_0: Key          = Key(320);
    pub const KP_9: Key          = Key(329);
    pub const KP_DECIMAL: Key    = Key(330);
    pub const KP_DIVIDE: Key     = Key(331);
    pub const KP_MULTIPLY: Key   = Key(332);
    pub const KP_SUBTRACT: Key   = Key(333);
    pub const KP_ADD: Key        = Key(334);
    pub const KP_ENTER: Key      = Key(335);
    pub const KP_EQUAL: Key      = Key(336);
    pub const LEFT_SHIFT: Key    = Key(340);
    pub const LEFT_CONTROL: Key  = Key(341);
    pub const LEFT_ALT: Key      = Key(342);
    pub const LEFT_SUPER: Key    = Key(343);
    pub const RIGHT_SHIFT: Key   = Key(344);
    pub const RIGHT_CONTROL: Key = Key(345);
    pub const RIGHT_ALT: Key     = Key(346);
    pub const RIGHT_SUPER: Key   = Key(347);
    pub const MENU: Key          = Key(348);
}

impl Key {
    /// Highest key code.
    pub const LAST: Key = Key::MENU;

    /// Function key `F<n>`, for `n` in `1..=25`.
    #[must_use]
    pub const fn function(n: u8) -> Option<Key> {
        match n {
            1..=25 => Some(Key(Key::F1.0 + n as u16 - 1)),
            _ => None,
        }
    }

    /// Keypad digit key, for `digit` in `0..=9`.
    #[must_use]
    pub const fn keypad(digit: u8) -> Option<Key> {
        match digit {
            0..=9 => Some(Key(Key::KP_0.0 + digit as u16)),
            _ => None,
        }
    }

    /// The key producing a printable ASCII character. Letters map to their
    /// uppercase code regardless of case.
    #[must_use]
    pub fn from_ascii(c: char) -> Option<Key> {
        matches!(c, ' '..='~').then(|| Key(c.to_ascii_uppercase() as u16))
    }
}

/// Mouse button index; up to eight buttons are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MouseButton(pub u8);

impl MouseButton {
    /// Primary button
    pub const LEFT: MouseButton = MouseButton(0);
    /// Secondary button
    pub const RIGHT: MouseButton = MouseButton(1);
    /// Wheel button
    pub const MIDDLE: MouseButton = MouseButton(2);
    /// Highest tracked button
    pub const LAST: MouseButton = MouseButton(7);
    /// Number of tracked buttons
    pub const COUNT: usize = 8;
}

bitflags! {
    /// Modifier keys held during a key or mouse button event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT     = 0x01;
        const CONTROL   = 0x02;
        const ALT       = 0x04;
        const SUPER     = 0x08;
        const CAPS_LOCK = 0x10;
        const NUM_LOCK  = 0x20;
    }
}

/// Key or button transition. Key repeat is reported as a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Action {
    /// Released, or not held
    #[default]
    Release,
    /// Pressed or repeated
    Press,
}

/// Payload of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventKind {
    /// A key changed state.
    Key {
        /// Key code
        key: Key,
        /// Platform scancode, 0 where unavailable
        scancode: i32,
        /// Transition
        action: Action,
        /// Held modifiers
        mods: Modifiers,
    },
    /// A mouse button changed state.
    MouseButton {
        /// Button index
        button: MouseButton,
        /// Transition
        action: Action,
        /// Held modifiers
        mods: Modifiers,
    },
    /// The cursor moved.
    CursorPos {
        /// Position in window pixels
        viewport_xy: (f64, f64),
        /// Position in console tiles
        tile_xy: (f64, f64),
    },
    /// Scroll wheel or trackpad motion.
    Scroll {
        /// Offset along each axis
        xy: (f64, f64),
    },
    /// The console grid changed size.
    Resize {
        /// New size in tiles
        tile_wh: (usize, usize),
    },
    /// The user asked to close the console.
    Close,
}

/// A normalized input event, tagged with its originating console.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Originating console
    pub console: ConsoleId,
    /// What happened
    pub kind: EventKind,
}

const INITIAL_CAPACITY: usize = 32;

/// FIFO ring buffer of events.
///
/// The buffer doubles when full and never drops an event: entries are
/// moved to the front of the new buffer in FIFO order.
#[derive(Debug)]
pub struct EventQueue {
    slots: Vec<Option<Event>>,
    head: usize,
    len: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    /// Creates an empty queue with room for 32 events.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![None; INITIAL_CAPACITY],
            head: 0,
            len: 0,
        }
    }

    /// Appends an event, growing the buffer when full.
    pub fn push(&mut self, event: Event) {
        if self.len == self.slots.len() {
            self.grow();
        }

        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = Some(event);
        self.len += 1;
    }

    fn grow(&mut self) {
        let capacity = self.slots.len();
        let mut slots = vec![None; capacity * 2];
        for (i, slot) in slots.iter_mut().take(self.len).enumerate() {
            *slot = self.slots[(self.head + i) % capacity].take();
        }

        self.slots = slots;
        self.head = 0;
    }

    /// Removes and returns the oldest event.
    pub fn pop(&mut self) -> Option<Event> {
        if self.len == 0 {
            return None;
        }

        let event = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        event
    }

    /// Number of queued events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no event is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of events the buffer holds before growing.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

/// Write end of the event queue handed to a backend while it polls,
/// tagging everything pushed with the polling console's id.
#[derive(Debug)]
pub struct EventSink<'a> {
    console: ConsoleId,
    queue: &'a mut EventQueue,
}

impl<'a> EventSink<'a> {
    pub(crate) fn new(console: ConsoleId, queue: &'a mut EventQueue) -> Self {
        Self { console, queue }
    }

    /// Id of the console being polled.
    #[must_use]
    pub fn console(&self) -> ConsoleId {
        self.console
    }

    /// Queues an event from the polled console.
    pub fn push(&mut self, kind: EventKind) {
        self.queue.push(Event { console: self.console, kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resize(n: usize) -> Event {
        Event {
            console: ConsoleId(1),
            kind: EventKind::Resize { tile_wh: (n, n) },
        }
    }

    #[test]
    fn test_fifo_order() {
        let mut queue = EventQueue::new();
        for i in 0..10 {
            queue.push(resize(i));
        }
        for i in 0..10 {
            assert_eq!(queue.pop(), Some(resize(i)));
        }
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_growth_keeps_order() {
        let mut queue = EventQueue::new();
        assert_eq!(queue.capacity(), 32);

        for i in 0..100 {
            queue.push(resize(i));
        }
        assert_eq!(queue.len(), 100);
        assert_eq!(queue.capacity(), 128);

        for i in 0..100 {
            assert_eq!(queue.pop(), Some(resize(i)));
        }
        assert!(queue.is_empty());
    }

    #[test]
    fn test_growth_with_wrapped_head() {
        let mut queue = EventQueue::new();
        for i in 0..20 {
            queue.push(resize(i));
        }
        for i in 0..15 {
            assert_eq!(queue.pop(), Some(resize(i)));
        }

        // 5 queued, head at 15; fill until the ring wraps and then grows
        for i in 20..60 {
            queue.push(resize(i));
        }
        assert_eq!(queue.capacity(), 64);

        let drained: Vec<Event> = std::iter::from_fn(|| queue.pop()).collect();
        assert_eq!(drained, (15..60).map(resize).collect::<Vec<_>>());
    }

    #[test]
    fn test_sink_tags_console() {
        let mut queue = EventQueue::new();
        let mut sink = EventSink::new(ConsoleId(7), &mut queue);
        sink.push(EventKind::Close);

        let event = queue.pop().unwrap();
        assert_eq!(event.console, ConsoleId(7));
        assert_eq!(event.kind, EventKind::Close);
    }

    #[test]
    fn test_key_helpers() {
        assert_eq!(Key::function(1), Some(Key::F1));
        assert_eq!(Key::function(25), Some(Key::F25));
        assert_eq!(Key::function(26), None);
        assert_eq!(Key::keypad(9), Some(Key::KP_9));
        assert_eq!(Key::from_ascii('a'), Some(Key::A));
        assert_eq!(Key::from_ascii('Z'), Some(Key::Z));
        assert_eq!(Key::from_ascii(' '), Some(Key::SPACE));
        assert_eq!(Key::from_ascii('\t'), None);
    }
}
