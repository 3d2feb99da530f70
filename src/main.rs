mod display;

use std::collections::HashMap;
use std::io::{self, stdout, BufWriter, Stdout, Write};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{cursor, execute, terminal};
use rand::rngs::StdRng;
use rand::SeedableRng;

use boss_fight::assets::{SilentAudio, SpriteCatalog};
use boss_fight::compute::{init_ai_game, init_human_game, tick, Game, PlayerInput};
use boss_fight::config::{MatchConfig, DEFAULT_CONFIG_PATH};
use boss_fight::error::GameError;
use boss_fight::match_phase::MatchPhase;

/// Fixed step the tunings were written against (about 60 ticks a second).
const FRAME: Duration = Duration::from_millis(16);

/// Frames a press stays live without a repeat. Terminals that never report
/// releases still repeat at 15 Hz or more, which refreshes it in time.
const HOLD_WINDOW: u64 = 8;

const LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const JUMP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const PICK: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const THROW: &[KeyCode] = &[KeyCode::Char(' ')];

fn game_error(e: GameError) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Raw-mode alternate screen, restored on drop even if the match errors out.
struct Terminal {
    out: BufWriter<Stdout>,
    enhanced: bool,
}

impl Terminal {
    fn open() -> io::Result<Self> {
        let mut out = BufWriter::new(stdout());
        terminal::enable_raw_mode()?;
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        // Release events are only reported with the enhancement flags.
        let enhanced =
            execute!(out, PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES))
                .is_ok();
        Ok(Terminal { out, enhanced })
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(self.out, PopKeyboardEnhancementFlags);
        }
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Blocking reads run on their own thread so a frame never waits on input.
fn spawn_reader() -> Receiver<Event> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });
    rx
}

// ── Keys ──────────────────────────────────────────────────────────────────────

/// Frame of the last press or repeat for every key still down.
#[derive(Default)]
struct HeldKeys {
    seen: HashMap<KeyCode, u64>,
}

impl HeldKeys {
    fn press(&mut self, code: KeyCode, frame: u64) {
        self.seen.insert(code, frame);
    }

    fn release(&mut self, code: KeyCode) {
        self.seen.remove(&code);
    }

    fn any(&self, keys: &[KeyCode], frame: u64) -> bool {
        keys.iter().any(|k| {
            self.seen.get(k).is_some_and(|&at| frame.saturating_sub(at) <= HOLD_WINDOW)
        })
    }

    fn input(&self, frame: u64) -> PlayerInput {
        PlayerInput {
            left: self.any(LEFT, frame),
            right: self.any(RIGHT, frame),
            jump: self.any(JUMP, frame),
            pick: self.any(PICK, frame),
            throw: self.any(THROW, frame),
        }
    }
}

// ── Match loop ────────────────────────────────────────────────────────────────

enum Exit {
    Menu,
    Quit,
}

fn wait_for_choice(rx: &Receiver<Event>) -> Option<display::MenuChoice> {
    for ev in rx.iter() {
        if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = ev {
            match code {
                KeyCode::Char('1') => return Some(display::MenuChoice::Play),
                KeyCode::Char('2') => return Some(display::MenuChoice::Watch),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return None,
                _ => {}
            }
        }
    }
    None
}

fn play<W: Write>(out: &mut W, game: &mut Game, rx: &Receiver<Event>) -> io::Result<Exit> {
    let sprites = SpriteCatalog::standard();
    let mut audio = SilentAudio;
    let mut keys = HeldKeys::default();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let started = Instant::now();
        frame += 1;

        for ev in rx.try_iter() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Release => keys.release(code),
                KeyEventKind::Repeat => keys.press(code, frame),
                KeyEventKind::Press => {
                    keys.press(code, frame);
                    match code {
                        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(Exit::Quit),
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(Exit::Quit)
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') if game.phase() == MatchPhase::Pause => {
                            return Ok(Exit::Menu)
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            game.resume().map_err(game_error)?;
                        }
                        _ => {}
                    }
                }
            }
        }
        game.input = keys.input(frame);

        let now = Instant::now();
        let elapsed_ms = now.duration_since(last).as_secs_f32() * 1000.0;
        last = now;
        tick(game, elapsed_ms, &sprites, &mut audio).map_err(game_error)?;

        let (width, height) = terminal::size()?;
        display::render(out, game, width, height)?;

        if let Some(rest) = FRAME.checked_sub(started.elapsed()) {
            thread::sleep(rest);
        }
    }
}

fn main() -> io::Result<()> {
    // Logs go to stderr; run with RUST_LOG=debug 2>match.log to keep them.
    let _ = env_logger::Builder::from_default_env().try_init();
    let config = MatchConfig::load_or_default(DEFAULT_CONFIG_PATH);

    let mut term = Terminal::open()?;
    let rx = spawn_reader();

    loop {
        let (width, height) = terminal::size()?;
        display::draw_menu(&mut term.out, width, height)?;
        let Some(choice) = wait_for_choice(&rx) else {
            break;
        };

        let rng = Box::new(StdRng::from_entropy());
        let mut game = match choice {
            display::MenuChoice::Play => init_human_game(config.clone(), rng),
            display::MenuChoice::Watch => init_ai_game(config.clone(), rng),
        };
        log::info!("match started ({})", choice.label());

        if let Exit::Quit = play(&mut term.out, &mut game, &rx)? {
            break;
        }
    }
    Ok(())
}
