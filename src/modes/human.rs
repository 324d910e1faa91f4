use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::game::{Command, CommandOutcome, GameConfig, GameEngine, GameState, WormId};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Two players (or one) sharing a keyboard
pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Title screen shown until the first key press
    waiting: bool,
    /// Commands received since the last tick, in arrival order
    pending: Vec<(WormId, Command)>,
    last_tick: Instant,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let input_handler = InputHandler::new(config.ruleset);
        let mut engine = GameEngine::new(config).context("Invalid game configuration")?;
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler,
            should_quit: false,
            waiting: true,
            pending: Vec::new(),
            last_tick: Instant::now(),
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!(ruleset = ?self.engine.config().ruleset, "session started");

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        info!(games = self.metrics.games_played, "session ended");
        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        let mut tick_timer = interval(self.engine.config().tick_interval());

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        self.last_tick = Instant::now();

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    self.update_game();
                }

                // Render frame
                _ = render_timer.tick() => {
                    if self.waiting {
                        terminal.draw(|frame| self.renderer.render_start(frame))
                            .context("Failed to draw frame")?;
                    } else {
                        self.metrics.update();
                        let scene = self.engine.scene(&self.state);
                        terminal.draw(|frame| {
                            self.renderer.render(frame, &scene, &self.metrics);
                        }).context("Failed to draw frame")?;
                    }
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            let action = self.input_handler.handle_key_event(key);

            let quitting = matches!(action, KeyAction::Quit | KeyAction::Worm(_, Command::Quit));
            if self.waiting && !quitting {
                self.start_game();
                return;
            }

            match action {
                // Quitting does not wait for the next tick
                KeyAction::Worm(worm, Command::Quit) => {
                    if self.engine.apply_command(&mut self.state, worm, Command::Quit)
                        == CommandOutcome::Quit
                    {
                        self.should_quit = true;
                    }
                }
                KeyAction::Worm(worm, command) => {
                    self.pending.push((worm, command));
                }
                KeyAction::Restart => {
                    self.reset_game();
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    /// Drain queued commands in arrival order, then advance one tick
    fn update_game(&mut self) {
        if self.waiting {
            return;
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;

        for (worm, command) in self.pending.drain(..) {
            self.engine.apply_command(&mut self.state, worm, command);
        }

        if self.state.game_over {
            return;
        }

        let result = self.engine.step(&mut self.state, elapsed);

        // Track game over
        if result.terminated {
            let scene = self.engine.scene(&self.state);
            self.metrics.on_game_over(&scene);
        }
    }

    /// Leave the title screen; the clock starts now
    fn start_game(&mut self) {
        self.waiting = false;
        self.metrics.on_game_start();
        self.last_tick = Instant::now();
        info!("game started");
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.pending.clear();
        self.last_tick = Instant::now();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Ruleset};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// A session past the title screen
    fn started(config: GameConfig) -> HumanMode {
        let mut mode = HumanMode::new(config).unwrap();
        mode.handle_event(key(KeyCode::Char(' ')));
        mode
    }

    #[test]
    fn test_game_initialization() {
        let mode = HumanMode::new(GameConfig::default().with_seed(3)).unwrap();
        assert_eq!(mode.state.worms.len(), 2);
        assert!(mode.state.worms.iter().all(|w| w.alive));
        assert!(!mode.state.game_over);
        assert!(mode.waiting);
    }

    #[test]
    fn test_invalid_config() {
        assert!(HumanMode::new(GameConfig::new(0, 0)).is_err());
    }

    #[test]
    fn test_title_screen_waits_for_key() {
        let mut mode = HumanMode::new(GameConfig::default().with_seed(3)).unwrap();

        mode.update_game();
        assert_eq!(mode.state.steps, 0);

        // The key that dismisses the title is not a command
        mode.handle_event(key(KeyCode::Char('d')));
        assert!(!mode.waiting);
        assert!(mode.pending.is_empty());

        mode.update_game();
        assert_eq!(mode.state.steps, 1);
        assert_eq!(mode.state.worms[0].direction, Direction::Up);
    }

    #[test]
    fn test_quit_from_title_screen() {
        let mut mode = HumanMode::new(GameConfig::default().with_seed(3)).unwrap();
        mode.handle_event(key(KeyCode::Char('q')));
        assert!(mode.should_quit);
    }

    #[test]
    fn test_commands_wait_for_tick() {
        let mut mode = started(GameConfig::default().with_seed(3));

        mode.handle_event(key(KeyCode::Char('d')));
        mode.handle_event(key(KeyCode::Left));
        assert_eq!(mode.state.worms[0].direction, Direction::Up);
        assert_eq!(mode.pending.len(), 2);

        mode.update_game();
        assert!(mode.pending.is_empty());
        assert_eq!(mode.state.worms[0].direction, Direction::Right);
        assert_eq!(mode.state.worms[1].direction, Direction::Left);
        assert_eq!(mode.state.steps, 1);
    }

    #[test]
    fn test_quit_key_skips_queue() {
        let mut mode = started(GameConfig::solo().with_seed(3));
        mode.handle_event(key(KeyCode::Up));
        mode.handle_event(key(KeyCode::Esc));

        assert!(mode.should_quit);
        assert_eq!(mode.pending.len(), 1);
        assert_eq!(mode.state.steps, 0);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = started(GameConfig::duel().with_seed(3));
        mode.state.game_over = true;
        mode.state.steps = 40;
        mode.pending.push((WormId(0), Command::Bite));

        mode.handle_event(key(KeyCode::Char('r')));

        assert!(!mode.state.game_over);
        assert_eq!(mode.state.steps, 0);
        assert!(mode.pending.is_empty());
        assert_eq!(mode.state.ruleset, Ruleset::Duel);
    }
}
