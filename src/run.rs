//! The driver: paces the interpreter against the wall clock, counts the
//! timers down at 60Hz and shuttles keys in and frames out.
use crate::display::Display;
use crate::error::Result;
use crate::input::{Command, Input};
use crate::interpreter::Chip8Interpreter;
use crate::keypad::CHIP8_KEY_COUNT;
use log::{error, info};
use std::time::{Duration, Instant};

/// roughly what a COSMAC VIP managed
pub const DEFAULT_INSTRUCTIONS_PER_SECOND: u32 = 700;
pub const DEFAULT_TIMER_HZ: u32 = 60;

/// terminals only report key-down (plus autorepeat), so a press is held for
/// this many timer ticks
const KEY_HOLD_TICKS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub instructions_per_second: u32,
    pub timer_hz: u32,
    /// stop cleanly after this many instructions
    pub max_steps: Option<u64>,
    /// wait for the user to start the program
    pub start_paused: bool,
    /// sleep between ticks; off for headless runs
    pub paced: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            instructions_per_second: DEFAULT_INSTRUCTIONS_PER_SECOND,
            timer_hz: DEFAULT_TIMER_HZ,
            max_steps: None,
            start_paused: true,
            paced: true,
        }
    }
}

impl RunConfig {
    /// no terminal, no waiting: run `steps` instructions as fast as possible
    pub fn headless(steps: u64) -> Self {
        RunConfig {
            max_steps: Some(steps),
            start_paused: false,
            paced: false,
            ..RunConfig::default()
        }
    }

    fn steps_per_tick(&self) -> u32 {
        (self.instructions_per_second / self.timer_hz.max(1)).max(1)
    }

    fn tick_length(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.timer_hz.max(1) as f64)
    }
}

/// why a run ended without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Quit,
    StepLimit,
}

pub struct Runner<'a> {
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    config: RunConfig,
    paused: bool,
    buzzing: bool,
    steps: u64,
    held: [u8; CHIP8_KEY_COUNT],
}

impl<'a> Runner<'a> {
    pub fn new(
        interpreter: Chip8Interpreter,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        config: RunConfig,
    ) -> Self {
        Runner {
            interpreter,
            display,
            input,
            paused: config.start_paused,
            config,
            buzzing: false,
            steps: 0,
            held: [0; CHIP8_KEY_COUNT],
        }
    }

    /// main loop; one iteration per timer tick
    pub fn run(&mut self) -> Result<StopReason> {
        info!("starting run with {:?}", self.config);
        self.refresh_status();
        self.display.draw(self.interpreter.framebuffer())?;

        loop {
            let tick_start = Instant::now();

            match self.input.poll()? {
                Some(Command::Quit) => {
                    info!("quit after {} steps", self.steps);
                    return Ok(StopReason::Quit);
                }
                Some(Command::TogglePause) => {
                    self.paused = !self.paused;
                    self.refresh_status();
                    self.display.draw(self.interpreter.framebuffer())?;
                }
                None => {}
            }

            if !self.paused {
                if let Some(reason) = self.tick()? {
                    return Ok(reason);
                }
            }

            if self.config.paced {
                spin_sleep::sleep(self.config.tick_length().saturating_sub(tick_start.elapsed()));
            }
        }
    }

    /// one 60th of a second of machine time
    fn tick(&mut self) -> Result<Option<StopReason>> {
        self.feed_keys()?;

        for _ in 0..self.config.steps_per_tick() {
            if self.config.max_steps.map_or(false, |max| self.steps >= max) {
                info!("stopping at step limit {}", self.steps);
                self.display.draw(self.interpreter.framebuffer())?;
                return Ok(Some(StopReason::StepLimit));
            }
            if let Err(e) = self.interpreter.step() {
                error!("halted after {} steps: {}", self.steps, e);
                self.display.set_status(&format!("halted: {}", e));
                self.display.draw(self.interpreter.framebuffer())?;
                return Err(e);
            }
            self.steps += 1;
        }
        self.interpreter.tick_timers();

        let buzzing = self.interpreter.sound_timer() > 0;
        let mut redraw = self.interpreter.take_redraw();
        if buzzing != self.buzzing {
            self.buzzing = buzzing;
            self.refresh_status();
            redraw = true;
        }
        if redraw {
            self.display.draw(self.interpreter.framebuffer())?;
        }
        Ok(None)
    }

    /// keys pressed since the last tick go down; keys not seen for a while go up
    fn feed_keys(&mut self) -> Result<()> {
        for key in self.input.peek_keys() {
            if let Some(hold) = self.held.get_mut(*key as usize) {
                *hold = KEY_HOLD_TICKS;
            }
        }
        self.input.flush_keys();

        for (key, hold) in self.held.iter_mut().enumerate() {
            if *hold > 0 {
                self.interpreter.key_down(key as u8)?;
                *hold -= 1;
            } else {
                self.interpreter.key_up(key as u8)?;
            }
        }
        Ok(())
    }

    fn refresh_status(&mut self) {
        let status = match (self.paused, self.buzzing) {
            (true, _) if self.steps == 0 => "press enter to start, esc to quit",
            (true, _) => "paused",
            (false, true) => "running *beep*",
            (false, false) => "running",
        };
        self.display.set_status(status);
    }

    pub fn interpreter(&self) -> &Chip8Interpreter {
        &self.interpreter
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
