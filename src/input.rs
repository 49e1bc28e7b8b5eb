use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use log::{trace, warn};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;

/// left-hand side of a qwerty keyboard laid out like the COSMAC VIP keypad:
///   1 2 3 4      1 2 3 C
///   q w e r  =>  4 5 6 D
///   a s d f      7 8 9 E
///   z x c v      A 0 B F
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// things the user asks of the emulator itself rather than of the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    TogglePause,
}

/// reads keypresses
pub trait Input {
    /// take in everything the user did since the last poll; keypad presses
    /// are buffered, and the first emulator command found is returned
    fn poll(&mut self) -> Result<Option<Command>, io::Error>;

    /// get a list of all the mapped keys that have been pressed recently,
    /// without flushing them from the buffer
    fn peek_keys(&self) -> &[u8];

    /// flush all the keypresses from the buffer
    fn flush_keys(&mut self);
}

/// terminal keyboard via crossterm; only key-down events are available, so
/// the runner decides how long a press counts as held
pub struct TermInput {
    buffer: Vec<u8>,
    keymap: HashMap<char, u8>,
}

impl TermInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            buffer: Vec::new(),
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
        })
    }

    fn translate(&mut self, evt: KeyEvent) -> Option<Command> {
        match evt.code {
            KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            KeyCode::Esc => Some(Command::Quit),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::TogglePause),
            KeyCode::Char(key) => {
                match self.keymap.get(&key.to_ascii_lowercase()) {
                    Some(mapped_key) => self.buffer.push(*mapped_key),
                    None => warn!("can't map {:?} to a COSMAC key", key),
                }
                None
            }
            other => {
                trace!("ignoring key {:?}", other);
                None
            }
        }
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for TermInput {
    fn poll(&mut self) -> Result<Option<Command>, io::Error> {
        while poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = read()? {
                if let Some(cmd) = self.translate(evt) {
                    return Ok(Some(cmd));
                }
            }
        }
        Ok(None)
    }

    fn peek_keys(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    fn flush_keys(&mut self) {
        self.buffer.clear();
    }
}

/// dummy Input implementation for testing; keys stay pressed until flushed,
/// commands come out one per poll
#[derive(Debug, Default)]
pub struct DummyInput {
    keys: Vec<u8>,
    commands: VecDeque<Command>,
}

impl DummyInput {
    pub fn new(keys: &[u8]) -> Self {
        DummyInput {
            keys: Vec::from(keys),
            commands: VecDeque::new(),
        }
    }

    pub fn with_commands(mut self, commands: &[Command]) -> Self {
        self.commands.extend(commands.iter().copied());
        self
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<Option<Command>, io::Error> {
        Ok(self.commands.pop_front())
    }

    fn peek_keys(&self) -> &[u8] {
        self.keys.as_slice()
    }

    fn flush_keys(&mut self) {
        self.keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keymap_covers_every_key_once() {
        let mut keys: Vec<u8> = CHIP8_CONVENTIONAL_KEYMAP.iter().map(|(_, k)| *k).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..16).collect::<Vec<u8>>());
    }

    #[test]
    fn test_dummy_input_replays_script() -> Result<(), io::Error> {
        let mut input = DummyInput::new(&[0x1, 0xf]).with_commands(&[Command::TogglePause]);
        assert_eq!(input.poll()?, Some(Command::TogglePause));
        assert_eq!(input.poll()?, None);
        assert_eq!(input.peek_keys(), &[0x1, 0xf]);
        input.flush_keys();
        assert!(input.peek_keys().is_empty());
        Ok(())
    }
}
