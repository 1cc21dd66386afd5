//! Layout and drawing: menu, board, sidebar, pause, quit menu, game over, explosion effects.

use crate::animation::{Animations, CellFx};
use crate::app::{GameOverOption, MENU_ENTRIES, MenuState, QuitOption, Screen};
use crate::board::{Cell, PlayerId, Position};
use crate::engine::EngineState;
use crate::event::WinKind;
use crate::game::{GameState, Win};
use crate::theme::{Theme, mix};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::collections::HashMap;
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Terminal cells per board cell (border included).
const CELL_WIDTH: u16 = 8;
const CELL_HEIGHT: u16 = 3;
const SIDEBAR_WIDTH: u16 = 26;

const ORB: &str = "●";

/// Flash on an exploded cell, faded out by tachyonfx.
pub struct ExplosionFx {
    pos: Position,
    player: PlayerId,
    fade_ms: u32,
    /// Built on first render, when the cell's screen rect is known.
    effect: Option<Effect>,
}

impl ExplosionFx {
    pub fn new(pos: Position, player: PlayerId, fade_ms: u32) -> Self {
        Self {
            pos,
            player,
            fade_ms,
            effect: None,
        }
    }

    pub fn done(&self) -> bool {
        self.effect.as_ref().is_some_and(|e| e.done())
    }
}

/// Board block size (border + grid) for a size×size grid.
fn board_pixel_size(size: usize) -> (u16, u16) {
    let n = size as u16;
    (n * CELL_WIDTH + 2, n * CELL_HEIGHT + 2)
}

/// Board + sidebar, centred in `area`. Matches `draw_game`.
fn game_rect(area: Rect, size: usize) -> Rect {
    let (pw, ph) = board_pixel_size(size);
    let total_w = pw + SIDEBAR_WIDTH;
    Rect {
        x: area.x + area.width.saturating_sub(total_w) / 2,
        y: area.y + area.height.saturating_sub(ph) / 2,
        width: total_w.min(area.width),
        height: ph.min(area.height),
    }
}

/// Grid rect (inside the board border) for the given frame area.
pub fn board_inner_rect(area: Rect, size: usize) -> Rect {
    let outer = game_rect(area, size);
    let n = size as u16;
    Rect {
        x: outer.x + 1,
        y: outer.y + 1,
        width: (n * CELL_WIDTH).min(outer.width.saturating_sub(2)),
        height: (n * CELL_HEIGHT).min(outer.height.saturating_sub(2)),
    }
}

/// Screen rect of one board cell, clipped to the grid.
pub fn cell_rect(board: Rect, pos: Position) -> Rect {
    Rect {
        x: board.x + pos.col as u16 * CELL_WIDTH,
        y: board.y + pos.row as u16 * CELL_HEIGHT,
        width: CELL_WIDTH,
        height: CELL_HEIGHT,
    }
    .intersection(board)
}

/// Map a terminal position (mouse) to the board cell under it.
pub fn cell_at(board: Rect, size: usize, x: u16, y: u16) -> Option<Position> {
    if x < board.x || y < board.y || x >= board.x + board.width || y >= board.y + board.height {
        return None;
    }
    let col = ((x - board.x) / CELL_WIDTH) as usize;
    let row = ((y - board.y) / CELL_HEIGHT) as usize;
    (row < size && col < size).then(|| Position::new(row, col))
}

fn cell_center(board: Rect, pos: Position) -> (f32, f32) {
    (
        board.x as f32 + pos.col as f32 * CELL_WIDTH as f32 + CELL_WIDTH as f32 / 2.0,
        board.y as f32 + pos.row as f32 * CELL_HEIGHT as f32 + CELL_HEIGHT as f32 / 2.0,
    )
}

fn popup_rect(area: Rect, w: u16, h: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w.min(area.width),
        height: h.min(area.height),
    }
}

/// Draw current screen. While playing, runs the explosion fades in `explosion_fx`.
#[allow(clippy::too_many_arguments)]
pub fn draw(
    frame: &mut Frame,
    screen: Screen,
    state: &GameState,
    theme: &Theme,
    animations: &Animations,
    paused: bool,
    last_win: Option<Win>,
    menu_state: &MenuState,
    quit_selected: QuitOption,
    game_over_selected: GameOverOption,
    explosion_fx: &mut [ExplosionFx],
    fx_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let area = frame.area();
    frame
        .buffer_mut()
        .set_style(area, Style::default().bg(theme.bg));
    match screen {
        Screen::Menu => draw_menu(frame, theme, menu_state, area, now),
        Screen::Playing => {
            draw_game(frame, state, theme, animations, area);
            apply_explosion_effects(frame, state, theme, area, explosion_fx, fx_process_time, now);
            if paused {
                draw_pause_overlay(frame, theme, area);
            }
        }
        Screen::QuitMenu => {
            draw_game(frame, state, theme, animations, area);
            draw_quit_menu(frame, theme, quit_selected);
        }
        Screen::GameOver => {
            draw_game(frame, state, theme, animations, area);
            draw_game_over(frame, state, theme, last_win, game_over_selected, area);
        }
    }
}

/// Create pending fades and advance every explosion effect by the frame delta.
fn apply_explosion_effects(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    area: Rect,
    explosion_fx: &mut [ExplosionFx],
    fx_process_time: &mut Option<Instant>,
    now: Instant,
) {
    let delta = fx_process_time
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *fx_process_time = Some(now);

    let board = board_inner_rect(area, state.board().size());
    for fx_entry in explosion_fx.iter_mut() {
        let rect = cell_rect(board, fx_entry.pos);
        let effect = fx_entry.effect.get_or_insert_with(|| {
            fx::fade_to(
                theme.player_color(fx_entry.player),
                theme.bg,
                (fx_entry.fade_ms, Interpolation::Linear),
            )
            .with_area(rect)
        });
        frame.render_effect(effect, rect, TfxDuration::from_millis(delta_ms));
    }
}

fn draw_menu(frame: &mut Frame, theme: &Theme, menu_state: &MenuState, area: Rect, now: Instant) {
    let popup = popup_rect(area, 48, 20);

    // Row of orbs cycling through the player colours.
    let phase = (now.duration_since(menu_state.animation_start).as_millis() / 250) as usize;
    let orbs: Vec<Span> = (0..8)
        .map(|i| {
            Span::styled(
                format!("{ORB} "),
                Style::default().fg(theme.player_color(i + phase)),
            )
        })
        .collect();

    let title = Line::from(vec![
        Span::styled(" Chain ", Style::default().fg(theme.player_color(0)).bold()),
        Span::styled(" Reaction ", Style::default().fg(theme.main_fg).bold()),
    ]);

    let highlight_style = Style::default()
        .fg(theme.bg)
        .bg(theme.title)
        .add_modifier(Modifier::BOLD);
    let normal_style = Style::default().fg(theme.main_fg);

    let mut lines = vec![
        Line::from(""),
        title,
        Line::from(orbs),
        Line::from(""),
        Line::from(Span::styled(
            " Place orbs. Overload a cell and it explodes, ",
            Style::default().fg(theme.inactive_fg),
        )),
        Line::from(Span::styled(
            " capturing its neighbours. Chains follow. ",
            Style::default().fg(theme.inactive_fg),
        )),
        Line::from(Span::styled(
            " Last player with orbs wins. ",
            Style::default().fg(theme.inactive_fg),
        )),
        Line::from(""),
    ];
    for (i, entry) in MENU_ENTRIES.iter().enumerate() {
        let label = match entry {
            Some(n) => format!(" {n} Players "),
            None => " Quit ".to_string(),
        };
        let style = if i == menu_state.selected {
            highlight_style
        } else {
            normal_style
        };
        lines.push(Line::from(Span::styled(label, style)));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![
        Span::styled(" ↕ ", Style::default().fg(theme.title)),
        Span::from("SELECT   "),
        Span::styled(" 2-4 ", Style::default().fg(theme.title)),
        Span::from("QUICK START   "),
        Span::styled(" ENTER ", Style::default().fg(theme.title)),
        Span::from("PLAY"),
    ]));

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );

    // Startup animation: slide in from bottom
    let elapsed = now.duration_since(menu_state.animation_start).as_millis() as u32;
    let t = (elapsed as f32 / 500.0).min(1.0);
    // Ease out cubic
    let offset_t = 1.0 - (1.0 - t).powi(3);
    let mut anim_popup = popup;
    anim_popup.y += ((1.0 - offset_t) * 10.0) as u16;
    anim_popup = anim_popup.intersection(area);

    p.render(anim_popup, frame.buffer_mut());
}

fn draw_pause_overlay(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = popup_rect(area, 28, 5);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            " Paused ",
            Style::default().fg(Color::Black).bg(theme.title),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " P Resume    Q Quit ",
            Style::default().fg(theme.main_fg),
        )),
    ];
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    p.render(popup, frame.buffer_mut());
}

fn draw_game_over(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    win: Option<Win>,
    selected: GameOverOption,
    area: Rect,
) {
    let popup = popup_rect(area, 34, 13);
    let (headline, color, how) = match win {
        Some(Win { winner, kind }) => (
            format!(" Player {} Wins! ", winner + 1),
            theme.player_color(winner),
            match kind {
                WinKind::Elimination => "every opponent eliminated",
                WinKind::Domination => "owns every occupied cell",
            },
        ),
        None => (" Game Over ".to_string(), theme.title, ""),
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            headline,
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(how, Style::default().fg(theme.inactive_fg))),
        Line::from(Span::styled(
            format!(" {} moves ", state.move_count()),
            Style::default().fg(theme.main_fg),
        )),
        Line::from(""),
    ];
    let options = [
        (GameOverOption::PlayAgain, " Play Again "),
        (GameOverOption::MainMenu, " Main Menu "),
        (GameOverOption::Quit, " Quit "),
    ];
    for (opt, label) in options {
        let style = if opt == selected {
            Style::default()
                .fg(theme.bg)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        lines.push(Line::from(Span::styled(label, style)));
        lines.push(Line::from(""));
    }

    frame.buffer_mut().set_style(popup, Style::default().bg(theme.bg));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color).bg(theme.bg))
            .title(Span::styled(" Chain Reaction ", theme.title)),
    );
    p.render(popup, frame.buffer_mut());
}

/// Draw game: board + sidebar; use full area and center the board.
fn draw_game(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    animations: &Animations,
    area: Rect,
) {
    let (pw, _) = board_pixel_size(state.board().size());
    let active_area = game_rect(area, state.board().size());

    let (board_area, sidebar_area) = {
        let inner = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
            .split(active_area);
        (inner[0], inner[1])
    };

    draw_board(frame, state, theme, animations, board_area);
    draw_sidebar(frame, state, theme, sidebar_area);
}

fn draw_board(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    animations: &Animations,
    area: Rect,
) {
    // Border takes the colour of the player to move.
    let turn_color = theme.player_color(state.current_player());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(turn_color).bg(theme.bg))
        .title(Span::styled(
            board_title(state),
            Style::default().fg(turn_color).add_modifier(Modifier::BOLD),
        ));
    let board = block.inner(area);
    block.render(area, frame.buffer_mut());

    let fx = animations.cell_states();
    let hovered = state.board().hovered();
    for cell in state.board().cells() {
        draw_cell(frame, state, theme, &fx, board, cell, hovered == Some(cell.position()));
    }

    // Orbs in flight between cells.
    let buf = frame.buffer_mut();
    for (from, to, player, t) in animations.orb_flights() {
        let (fx0, fy0) = cell_center(board, from);
        let (fx1, fy1) = cell_center(board, to);
        let x = (fx0 + (fx1 - fx0) * t) as u16;
        let y = (fy0 + (fy1 - fy0) * t) as u16;
        if x >= board.x && y >= board.y && x < board.x + board.width && y < board.y + board.height {
            buf[(x, y)]
                .set_symbol(ORB)
                .set_style(Style::default().fg(theme.player_color(player)));
        }
    }
}

/// Board title: whose turn it is, and whether a chain is still resolving.
fn board_title(state: &GameState) -> String {
    let player = state.current_player() + 1;
    if state.is_processing() {
        format!(" Player {player} · chain reacting ")
    } else {
        format!(" Player {player} ")
    }
}

/// Orb glyphs for a cell; spaced out while they fit.
fn orb_label(count: usize, inner_width: u16) -> String {
    let spaced = (count * 2).saturating_sub(1);
    if spaced <= inner_width as usize {
        vec![ORB; count].join(" ")
    } else if count <= inner_width as usize {
        ORB.repeat(count)
    } else {
        format!("{ORB}x{count}")
    }
}

fn draw_cell(
    frame: &mut Frame,
    state: &GameState,
    theme: &Theme,
    fx: &HashMap<Position, CellFx>,
    board: Rect,
    cell: &Cell,
    hovered: bool,
) {
    let pos = cell.position();
    let rect = cell_rect(board, pos);
    if rect.is_empty() {
        return;
    }
    let queued = state.engine().is_queued(pos);
    let owner_color = cell.owner().map(|p| theme.player_color(p));

    let mut border = Style::default().fg(theme.div_line).bg(theme.bg);
    let mut fill = Style::default().bg(theme.bg);
    match fx.get(&pos) {
        Some(CellFx::Exploding { player, .. }) => {
            let c = theme.player_color(*player);
            border = border.fg(c).bg(c);
            fill = fill.bg(c);
        }
        Some(CellFx::Incoming { player }) => {
            border = border.fg(mix(theme.div_line, theme.player_color(*player), 0.6));
        }
        None => {}
    }
    if queued {
        if let Some(c) = owner_color {
            border = border.fg(mix(theme.div_line, c, 0.8));
        }
    }
    if hovered {
        border = border.fg(theme.title).add_modifier(Modifier::BOLD);
    }

    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(rect);
    frame.buffer_mut().set_style(rect, fill);
    block.render(rect, frame.buffer_mut());

    let label = match fx.get(&pos) {
        Some(CellFx::Exploding { player, progress }) => {
            let glyph = if *progress < 0.5 { "✸" } else { "✶" };
            Span::styled(
                glyph,
                Style::default()
                    .fg(theme.bg)
                    .bg(theme.player_color(*player))
                    .add_modifier(Modifier::BOLD),
            )
        }
        _ => match owner_color {
            Some(c) => {
                let mut style = Style::default().fg(c).bg(theme.bg);
                // One orb short of exploding.
                if cell.orb_count() + 1 >= cell.critical_mass() {
                    style = style.add_modifier(Modifier::BOLD);
                }
                Span::styled(orb_label(cell.orb_count(), inner.width), style)
            }
            None => Span::styled(
                cell.critical_mass().to_string(),
                Style::default()
                    .fg(theme.inactive_fg)
                    .add_modifier(Modifier::DIM),
            ),
        },
    };
    Paragraph::new(Line::from(label))
        .alignment(Alignment::Center)
        .render(inner, frame.buffer_mut());
}

fn sidebar_block_style(theme: &Theme) -> Style {
    Style::default().fg(theme.div_line).bg(theme.bg)
}

fn draw_sidebar(frame: &mut Frame, state: &GameState, theme: &Theme, area: Rect) {
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);
    let dim_style = Style::default().fg(theme.inactive_fg);
    let border_style = sidebar_block_style(theme);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Players (border + title + up to 4 rows)
            Constraint::Length(5), // Stats (border + moves, chain, next)
            Constraint::Length(8), // Controls
        ])
        .split(area);

    // --- Players ---
    let board = state.board();
    let mut player_lines = vec![Line::from(Span::styled("Players", title_style))];
    for p in 0..state.num_players() {
        let color = theme.player_color(p);
        let orbs = board.orbs_of(p);
        let out = state.game_started() && state.players_who_have_moved().contains(&p) && orbs == 0;
        let marker = if p == state.current_player() && state.winner().is_none() {
            "▶ "
        } else {
            "  "
        };
        let status = if out {
            Span::styled(" out", dim_style)
        } else {
            Span::styled(format!(" {orbs:>3}"), fg_style)
        };
        player_lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(color)),
            Span::styled(format!("{ORB} "), Style::default().fg(color)),
            Span::styled(
                format!("Player {:<6}", p + 1),
                if out { dim_style } else { fg_style },
            ),
            status,
        ]));
    }
    let players_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);
    Paragraph::new(player_lines)
        .block(players_block)
        .render(chunks[0], frame.buffer_mut());

    // --- Stats ---
    let engine = state.engine();
    let chain = match engine.state() {
        EngineState::Idle if state.is_animating() => "settling".to_string(),
        EngineState::Idle => "idle".to_string(),
        EngineState::Queued => "primed".to_string(),
        EngineState::Draining => format!("{} queued", engine.pending_len()),
    };
    let next = if state.reset_pending() {
        Span::styled("reset pending", Style::default().fg(theme.title))
    } else {
        match engine.pending().next() {
            Some(pos) => Span::styled(format!("next {pos}"), dim_style),
            None => Span::styled("", dim_style),
        }
    };
    let stats_lines = vec![
        Line::from(vec![
            Span::styled("Moves: ", title_style),
            Span::styled(state.move_count().to_string(), fg_style),
        ]),
        Line::from(vec![
            Span::styled("Chain: ", title_style),
            Span::styled(chain, fg_style),
        ]),
        Line::from(next),
    ];
    Paragraph::new(stats_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .render(chunks[1], frame.buffer_mut());

    // --- Controls ---
    let key = |k: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("{k:<12}"), title_style),
            Span::styled(what, fg_style),
        ])
    };
    let controls = vec![
        key("←↑↓→ hjkl", "move"),
        key("Enter Space", "place"),
        key("Click", "place"),
        key("R", "reset"),
        key("P", "pause"),
        key("Q Esc", "quit"),
    ];
    Paragraph::new(controls)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        )
        .render(chunks[2], frame.buffer_mut());
}

pub fn draw_quit_menu(frame: &mut Frame, theme: &Theme, selected: QuitOption) {
    let area = frame.area();
    let quit_rect = popup_rect(area, 24, 8);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.title))
        .title(" Quit? ");

    // Clear background
    frame
        .buffer_mut()
        .set_style(quit_rect, Style::default().bg(theme.bg));

    let inner = block.inner(quit_rect);
    block.render(quit_rect, frame.buffer_mut());

    let options = [
        (QuitOption::Resume, " Resume "),
        (QuitOption::MainMenu, " Main Menu "),
        (QuitOption::Exit, " Exit "),
    ];

    for (i, (opt, label)) in options.iter().enumerate() {
        let style = if *opt == selected {
            Style::default()
                .fg(theme.bg)
                .bg(theme.title)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.title)
        };
        let rx = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        let ry = inner.y + 1 + i as u16 * 2;
        if ry < inner.y + inner.height {
            frame.buffer_mut().set_string(rx, ry, label, style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::GRID_SIZE;

    fn screen() -> Rect {
        Rect::new(0, 0, 100, 30)
    }

    #[test]
    fn board_is_centred_with_sidebar() {
        let board = board_inner_rect(screen(), GRID_SIZE);
        let (pw, ph) = board_pixel_size(GRID_SIZE);
        assert_eq!(board.width, GRID_SIZE as u16 * CELL_WIDTH);
        assert_eq!(board.height, GRID_SIZE as u16 * CELL_HEIGHT);
        assert_eq!(board.x, (100 - (pw + SIDEBAR_WIDTH)) / 2 + 1);
        assert_eq!(board.y, (30 - ph) / 2 + 1);
    }

    #[test]
    fn mouse_maps_to_cell_under_it() {
        let board = board_inner_rect(screen(), GRID_SIZE);
        let pos = Position::new(2, 4);
        let rect = cell_rect(board, pos);
        assert_eq!(cell_at(board, GRID_SIZE, rect.x, rect.y), Some(pos));
        assert_eq!(
            cell_at(board, GRID_SIZE, rect.x + CELL_WIDTH - 1, rect.y + CELL_HEIGHT - 1),
            Some(pos)
        );
        assert_eq!(cell_at(board, GRID_SIZE, board.x - 1, board.y), None);
        assert_eq!(
            cell_at(board, GRID_SIZE, board.x, board.y + board.height),
            None
        );
    }

    #[test]
    fn title_shows_running_chain() {
        let mut state = GameState::new(2).unwrap();
        assert_eq!(board_title(&state), " Player 1 ");
        state.cell_activated(Position::new(0, 0));
        state.cell_activated(Position::new(5, 5));
        state.cell_activated(Position::new(0, 0));
        assert_eq!(board_title(&state), " Player 2 · chain reacting ");
    }

    #[test]
    fn orb_labels_shrink_to_fit() {
        assert_eq!(orb_label(1, 6), "●");
        assert_eq!(orb_label(3, 6), "● ● ●");
        assert_eq!(orb_label(5, 6), "●●●●●");
        assert_eq!(orb_label(9, 6), "●x9");
    }

    #[test]
    fn draws_every_screen_without_panicking() {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut state = GameState::new(3).unwrap();
        state.cell_activated(Position::new(0, 0));
        let theme = Theme::default();
        let anims = Animations::new(1.0, true);
        let menu = MenuState {
            selected: 0,
            animation_start: Instant::now(),
        };
        let mut fx = vec![ExplosionFx::new(Position::new(0, 0), 0, 300)];
        let mut t = None;
        for screen in [
            Screen::Menu,
            Screen::Playing,
            Screen::QuitMenu,
            Screen::GameOver,
        ] {
            terminal
                .draw(|f| {
                    draw(
                        f,
                        screen,
                        &state,
                        &theme,
                        &anims,
                        true,
                        None,
                        &menu,
                        QuitOption::Resume,
                        GameOverOption::PlayAgain,
                        &mut fx,
                        &mut t,
                        Instant::now(),
                    );
                })
                .unwrap();
        }
        assert!(fx[0].effect.is_some());
    }
}
