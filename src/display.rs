/// Rendering layer. All terminal output lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// match. No game logic is performed; this module only translates world
/// coordinates into terminal cells and queues crossterm commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use boss_fight::compute::{Controller, Game};
use boss_fight::entities::{CollisionBox, Entity};
use boss_fight::match_phase::MatchPhase;
use boss_fight::projectile::ProjectileState;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD_PLAYER: Color = Color::Red;
const C_HUD_BOSS: Color = Color::Magenta;
const C_PLAYER: Color = Color::White;
const C_PLAYER_HURT: Color = Color::DarkRed;
const C_BOSS: Color = Color::Magenta;
const C_PROJECTILE: Color = Color::Yellow;
const C_PROJECTILE_SPENT: Color = Color::DarkYellow;
const C_PLATFORM: Color = Color::Green;
const C_GROUND: Color = Color::DarkGreen;
const C_HINT: Color = Color::DarkGrey;
const C_BANNER: Color = Color::Cyan;

/// Maps world pixels onto the cells inside the border (rows 2 .. height-3).
struct Viewport {
    width: u16,
    height: u16,
    sx: f32,
    sy: f32,
}

impl Viewport {
    fn new(game: &Game, width: u16, height: u16) -> Self {
        let world = &game.world.config.world;
        let inner_w = width.saturating_sub(2).max(1) as f32;
        let inner_h = height.saturating_sub(4).max(1) as f32;
        Viewport { width, height, sx: inner_w / world.width, sy: inner_h / world.height }
    }

    /// Terminal cell for a world point, or `None` if it falls outside.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let col = (x * self.sx).floor() as i32 + 1;
        let row = (y * self.sy).floor() as i32 + 2;
        let inside = col >= 1
            && col < self.width as i32 - 1
            && row >= 2
            && row < self.height as i32 - 2;
        inside.then_some((col as u16, row as u16))
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    Play,
    Watch,
}

impl MenuChoice {
    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Play => "human",
            MenuChoice::Watch => "ai",
        }
    }
}

const MENU_ROWS: [(char, MenuChoice, &str, Color); 2] = [
    ('1', MenuChoice::Play, "Catch Birdo's eggs and throw them back", Color::Green),
    ('2', MenuChoice::Watch, "Watch the decision tree play Mario", Color::Yellow),
];

/// Title screen asking who controls the player.
pub fn draw_menu<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let left = (width / 2).saturating_sub(20);
    let top = (height / 2).saturating_sub(5);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let title = "MARIO vs BIRDO";
    out.queue(cursor::MoveTo((width / 2).saturating_sub(title.len() as u16 / 2), top))?;
    out.queue(style::SetForegroundColor(C_BANNER))?;
    out.queue(Print(title))?;

    for (i, (key, choice, blurb, color)) in MENU_ROWS.iter().enumerate() {
        out.queue(cursor::MoveTo(left, top + 3 + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{key}) {:<6}", choice.label())))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(blurb))?;
    }

    out.queue(cursor::MoveTo(left, top + 7))?;
    out.queue(Print("Land on a flying egg, S lifts it, SPACE throws. Q quits."))?;
    out.queue(style::ResetColor)?;
    out.flush()
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, game: &Game, width: u16, height: u16) -> std::io::Result<()> {
    let view = Viewport::new(game, width, height);
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, &view)?;
    draw_hud(out, game, &view)?;
    draw_ground(out, game, &view)?;

    for platform in &game.world.platforms {
        draw_box(out, &view, &platform.collision_box(), '=', C_PLATFORM)?;
    }
    for projectile in &game.world.projectiles {
        let glyph = projectile.appearance().map_or('o', |a| a.glyph);
        let color = match projectile.state() {
            ProjectileState::Collided | ProjectileState::Dropped => C_PROJECTILE_SPENT,
            _ => C_PROJECTILE,
        };
        draw_box(out, &view, &projectile.collision_box(), glyph, color)?;
    }

    let boss = &game.world.boss;
    draw_box(out, &view, &boss.collision_box(), boss.appearance().map_or('B', |a| a.glyph), C_BOSS)?;

    let player = &game.world.player;
    let color = if player.damage().is_some() { C_PLAYER_HURT } else { C_PLAYER };
    draw_box(out, &view, &player.collision_box(), player.appearance().map_or('M', |a| a.glyph), color)?;

    draw_controls_hint(out, game, &view)?;
    if game.phase() != MatchPhase::Fighting {
        draw_banner(out, game.phase(), &view)?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, view: &Viewport) -> std::io::Result<()> {
    let w = view.width as usize;
    let h = view.height;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(view.width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, game: &Game, view: &Viewport) -> std::io::Result<()> {
    let world = &game.world;

    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_PLAYER))?;
    out.queue(Print(format!("Mario {}", "♥".repeat(world.player.lives as usize))))?;

    let phase = format!("[ {} ]", world.phase());
    let px = (view.width / 2).saturating_sub(phase.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(px, 0))?;
    out.queue(style::SetForegroundColor(C_BANNER))?;
    out.queue(Print(&phase))?;

    let boss_str = format!("{} Birdo", "♥".repeat(world.boss.lives as usize));
    let bx = view.width.saturating_sub(boss_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(bx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_BOSS))?;
    out.queue(Print(&boss_str))?;

    Ok(())
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_ground<W: Write>(out: &mut W, game: &Game, view: &Viewport) -> std::io::Result<()> {
    let ground_y = game.world.config.world.ground_y;
    let Some((_, row)) = view.cell(0.0, ground_y) else {
        return Ok(());
    };
    out.queue(style::SetForegroundColor(C_GROUND))?;
    out.queue(cursor::MoveTo(1, row))?;
    out.queue(Print("▀".repeat(view.width.saturating_sub(2) as usize)))?;
    Ok(())
}

/// Fills the cells covered by a box with one glyph. Cells outside the
/// viewport are skipped, so entities can walk or fall off-screen.
fn draw_box<W: Write>(
    out: &mut W,
    view: &Viewport,
    bbox: &CollisionBox,
    glyph: char,
    color: Color,
) -> std::io::Result<()> {
    let first = view.cell(bbox.x, bbox.y);
    let last = view.cell(bbox.right() - 0.01, bbox.bottom() - 0.01);
    out.queue(style::SetForegroundColor(color))?;
    match (first, last) {
        (Some((c0, r0)), Some((c1, r1))) => {
            for row in r0..=r1 {
                out.queue(cursor::MoveTo(c0, row))?;
                out.queue(Print(glyph.to_string().repeat((c1 - c0 + 1) as usize)))?;
            }
        }
        (Some((col, row)), None) | (None, Some((col, row))) => {
            out.queue(cursor::MoveTo(col, row))?;
            out.queue(Print(glyph))?;
        }
        (None, None) => {}
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, game: &Game, view: &Viewport) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, view.height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    let hint = match game.controller {
        Controller::Human => "← → / A D : Move   W : Jump   S : Pick up   SPACE : Throw   Q : Quit",
        Controller::Ai(_) => "Watching the AI   Q : Quit",
    };
    out.queue(Print(hint))?;
    Ok(())
}

// ── Phase banner ──────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(out: &mut W, phase: MatchPhase, view: &Viewport) -> std::io::Result<()> {
    let text = phase.banner();
    let inner = format!("  {text}  ");
    let bar = "═".repeat(inner.chars().count());
    let lines = [format!("╔{bar}╗"), format!("║{inner}║"), format!("╚{bar}╝")];

    let cx = view.width / 2;
    let start_row = (view.height / 2).saturating_sub(lines.len() as u16 / 2);
    out.queue(style::SetForegroundColor(C_BANNER))?;
    for (i, line) in lines.iter().enumerate() {
        let col = cx.saturating_sub(line.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}
