//! App: terminal init, main loop, tick and input handling.

use crate::animation::{Animations, EXPLOSION_SECS};
use crate::board::Position;
use crate::game::{GameResult, GameState, TickOutcome, Win};
use crate::input::{Action, key_to_action};
use crate::theme::Theme;
use crate::ui::ExplosionFx;
use crate::{Args, GameConfig};
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::DefaultTerminal;
use ratatui::layout::Rect;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    Playing,
    GameOver,
    QuitMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuitOption {
    Resume,
    MainMenu,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverOption {
    PlayAgain,
    MainMenu,
    Quit,
}

/// Main menu entries: 2, 3 or 4 players, then Quit.
pub const MENU_ENTRIES: [Option<usize>; 4] = [Some(2), Some(3), Some(4), None];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuState {
    /// Index into MENU_ENTRIES.
    pub selected: usize,
    pub animation_start: Instant,
}

impl MenuState {
    fn new(players: usize) -> Self {
        let selected = MENU_ENTRIES
            .iter()
            .position(|e| *e == Some(players))
            .unwrap_or(0);
        Self {
            selected,
            animation_start: Instant::now(),
        }
    }
}

pub struct App {
    config: GameConfig,
    theme: Theme,
    state: GameState,
    animations: Animations,
    screen: Screen,
    paused: bool,
    /// Keyboard cursor; mouse hover moves it too.
    cursor: Position,
    last_tick: Instant,
    last_frame: Instant,
    /// tachyonfx flashes for exploded cells (created lazily by the renderer).
    explosion_fx: Vec<ExplosionFx>,
    fx_process_time: Option<Instant>,
    menu_state: MenuState,
    quit_selected: QuitOption,
    game_over_selected: GameOverOption,
    last_win: Option<Win>,
    /// Frame area from the last draw; used to map mouse positions to cells.
    last_area: Rect,
}

impl App {
    pub fn new(args: &Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let state = GameState::new(config.players)?;
        let screen = if args.no_menu {
            Screen::Playing
        } else {
            Screen::Menu
        };
        let now = Instant::now();
        let center = state.board().size() / 2;
        Ok(Self {
            animations: Animations::new(config.animation_speed, config.animations),
            menu_state: MenuState::new(config.players),
            config,
            theme,
            state,
            screen,
            paused: false,
            cursor: Position::new(center, center),
            last_tick: now,
            last_frame: now,
            explosion_fx: Vec::new(),
            fx_process_time: None,
            quit_selected: QuitOption::Resume,
            game_over_selected: GameOverOption::PlayAgain,
            last_win: None,
            last_area: Rect::default(),
        })
    }

    fn new_game(&mut self, players: usize) -> Result<()> {
        self.config.players = players;
        self.state = GameState::new(players)?;
        self.animations.clear();
        self.explosion_fx.clear();
        self.fx_process_time = None;
        let center = self.state.board().size() / 2;
        self.cursor = Position::new(center, center);
        self.state.set_hover(Some(self.cursor));
        self.screen = Screen::Playing;
        self.paused = false;
        self.last_win = None;
        self.last_tick = Instant::now();
        log::info!("new game with {players} players");
        Ok(())
    }

    /// React to the end of a session. Returns false when the app should exit.
    fn end_session(&mut self, result: Option<GameResult>) -> bool {
        log::info!("session result: {result:?}");
        match result {
            Some(GameResult::Winner(_)) => {
                self.last_win = self.state.winner();
                self.game_over_selected = GameOverOption::PlayAgain;
                self.screen = Screen::GameOver;
            }
            Some(GameResult::Reset) => {
                if self.state.request_reset() {
                    self.absorb_events();
                }
                self.paused = false;
            }
            Some(GameResult::Close) => {
                self.menu_state = MenuState::new(self.config.players);
                self.screen = Screen::Menu;
            }
            None => return false,
        }
        true
    }

    /// Feed drained game events to the animation layer.
    fn absorb_events(&mut self) {
        for event in self.state.drain_events() {
            if matches!(event, crate::event::GameEvent::GameReset) {
                self.explosion_fx.clear();
            }
            if let Some((pos, player)) = self.animations.observe(&event) {
                let fade_ms = (EXPLOSION_SECS * 1000.0 / self.config.animation_speed.max(0.01)) as u32;
                self.explosion_fx.push(ExplosionFx::new(pos, player, fade_ms));
            }
        }
        self.state.set_animating(self.animations.is_active());
    }

    fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let last = self.state.board().size() as isize - 1;
        let row = (self.cursor.row as isize + d_row).clamp(0, last) as usize;
        let col = (self.cursor.col as isize + d_col).clamp(0, last) as usize;
        self.cursor = Position::new(row, col);
        self.state.set_hover(Some(self.cursor));
    }

    fn activate(&mut self, pos: Position) {
        let result = self.state.cell_activated(pos);
        if !result.accepted() {
            log::trace!("activation at {pos} ignored: {result:?}");
        }
        self.absorb_events();
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
        };

        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        if self.screen == Screen::Playing {
            self.new_game(self.config.players)?;
        }
        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = Duration::from_secs_f64(1.0 / self.config.frame_rate);
        let tick_interval = Duration::from_secs_f64(1.0 / self.config.tick_rate);

        loop {
            let now = Instant::now();
            let dt = now.duration_since(self.last_frame).as_secs_f32();
            self.last_frame = now;

            let running = self.screen == Screen::Playing && !self.paused;
            if running {
                self.animations.update(dt);
                self.state.set_animating(self.animations.is_active());
            }

            terminal.draw(|f| {
                self.last_area = f.area();
                crate::ui::draw(
                    f,
                    self.screen,
                    &self.state,
                    &self.theme,
                    &self.animations,
                    self.paused,
                    self.last_win,
                    &self.menu_state,
                    self.quit_selected,
                    self.game_over_selected,
                    &mut self.explosion_fx,
                    &mut self.fx_process_time,
                    now,
                );
            })?;
            self.explosion_fx.retain(|fx| !fx.done());

            // One core tick: at most one explosion step.
            if running && self.last_tick.elapsed() >= tick_interval {
                self.last_tick = Instant::now();
                match self.state.tick() {
                    TickOutcome::Idle | TickOutcome::Stepped => {}
                    TickOutcome::ChainCompleted(win) => {
                        log::debug!("chain settled, winner: {win:?}");
                    }
                    TickOutcome::Reset => {
                        self.paused = false;
                    }
                }
                self.absorb_events();
            }

            // Let the last explosion finish on screen before showing the result.
            if self.screen == Screen::Playing && !self.animations.is_active() {
                if let Some(win) = self.state.winner() {
                    self.end_session(Some(GameResult::Winner(win.winner)));
                }
            }

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    let keep_running = match event::read()? {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            self.handle_action(key_to_action(key))?
                        }
                        Event::Mouse(mouse) => {
                            self.handle_mouse(mouse);
                            true
                        }
                        _ => true,
                    };
                    if !keep_running {
                        return Ok(());
                    }
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.screen != Screen::Playing || self.paused {
            return;
        }
        let board = crate::ui::board_inner_rect(self.last_area, self.state.board().size());
        let Some(pos) = crate::ui::cell_at(board, self.state.board().size(), mouse.column, mouse.row)
        else {
            return;
        };
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.cursor = pos;
                self.state.set_hover(Some(pos));
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.cursor = pos;
                self.state.set_hover(Some(pos));
                self.activate(pos);
            }
            _ => {}
        }
    }

    /// Returns Ok(false) when the app should exit.
    fn handle_action(&mut self, action: Action) -> Result<bool> {
        match self.screen {
            Screen::Menu => {
                let len = MENU_ENTRIES.len();
                match action {
                    Action::Quit => return Ok(false),
                    Action::Up | Action::Left => {
                        self.menu_state.selected = (self.menu_state.selected + len - 1) % len;
                    }
                    Action::Down | Action::Right => {
                        self.menu_state.selected = (self.menu_state.selected + 1) % len;
                    }
                    Action::Digit(n @ 2..=4) => self.new_game(usize::from(n))?,
                    Action::Activate => match MENU_ENTRIES[self.menu_state.selected] {
                        Some(players) => self.new_game(players)?,
                        None => return Ok(false),
                    },
                    _ => {}
                }
            }
            Screen::Playing => {
                if self.paused {
                    match action {
                        Action::Pause => self.paused = false,
                        Action::Quit => {
                            self.screen = Screen::QuitMenu;
                            self.quit_selected = QuitOption::Resume;
                        }
                        _ => {}
                    }
                    return Ok(true);
                }
                match action {
                    Action::Up => self.move_cursor(-1, 0),
                    Action::Down => self.move_cursor(1, 0),
                    Action::Left => self.move_cursor(0, -1),
                    Action::Right => self.move_cursor(0, 1),
                    Action::Activate => self.activate(self.cursor),
                    Action::Reset => {
                        self.end_session(Some(GameResult::Reset));
                    }
                    Action::Pause => self.paused = true,
                    Action::Quit => {
                        self.screen = Screen::QuitMenu;
                        self.quit_selected = QuitOption::Resume;
                    }
                    Action::Digit(_) | Action::None => {}
                }
            }
            Screen::QuitMenu => match action {
                Action::Down | Action::Right => {
                    self.quit_selected = match self.quit_selected {
                        QuitOption::Resume => QuitOption::MainMenu,
                        QuitOption::MainMenu => QuitOption::Exit,
                        QuitOption::Exit => QuitOption::Resume,
                    };
                }
                Action::Up | Action::Left => {
                    self.quit_selected = match self.quit_selected {
                        QuitOption::Resume => QuitOption::Exit,
                        QuitOption::MainMenu => QuitOption::Resume,
                        QuitOption::Exit => QuitOption::MainMenu,
                    };
                }
                Action::Activate => match self.quit_selected {
                    QuitOption::Resume => self.screen = Screen::Playing,
                    QuitOption::MainMenu => {
                        self.end_session(Some(GameResult::Close));
                    }
                    QuitOption::Exit => return Ok(self.end_session(None)),
                },
                Action::Pause | Action::Quit => self.screen = Screen::Playing,
                _ => {}
            },
            Screen::GameOver => match action {
                Action::Down | Action::Right => {
                    self.game_over_selected = match self.game_over_selected {
                        GameOverOption::PlayAgain => GameOverOption::MainMenu,
                        GameOverOption::MainMenu => GameOverOption::Quit,
                        GameOverOption::Quit => GameOverOption::PlayAgain,
                    };
                }
                Action::Up | Action::Left => {
                    self.game_over_selected = match self.game_over_selected {
                        GameOverOption::PlayAgain => GameOverOption::Quit,
                        GameOverOption::MainMenu => GameOverOption::PlayAgain,
                        GameOverOption::Quit => GameOverOption::MainMenu,
                    };
                }
                Action::Reset => self.new_game(self.config.players)?,
                Action::Quit => {
                    self.end_session(Some(GameResult::Close));
                }
                Action::Activate => match self.game_over_selected {
                    GameOverOption::PlayAgain => self.new_game(self.config.players)?,
                    GameOverOption::MainMenu => {
                        self.end_session(Some(GameResult::Close));
                    }
                    GameOverOption::Quit => return Ok(false),
                },
                _ => {}
            },
        }
        Ok(true)
    }
}
