//! Team predictor TUI - thin client over the predictor's push channel

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders},
    Frame, Terminal,
};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use teamtui::action::Action;
use teamtui::channel::{Channel, PREDICTOR_PORT};
use teamtui::components::{
    Component, GenerationHeader, GenerationHeaderProps, PredictedPanel, PredictedPanelProps,
    TeamPanel, TeamPanelProps, ACCENT, ACCENT_ALT, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use teamtui::effect::Effect;
use teamtui::reducer::reducer;
use teamtui::state::{AppState, FocusArea, MAX_TEAM_SIZE};

#[derive(Parser, Debug)]
#[command(name = "teamtui")]
#[command(about = "Pokemon team predictor client")]
struct Args {
    /// Predictor host to connect to
    #[arg(long, default_value = "localhost")]
    host: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum TeamComponentId {
    Header,
    Team,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum TeamContext {
    Header,
    Team,
}

impl EventRoutingState<TeamComponentId, TeamContext> for AppState {
    fn focused(&self) -> Option<TeamComponentId> {
        match self.focus {
            FocusArea::Generation => Some(TeamComponentId::Header),
            FocusArea::Team => Some(TeamComponentId::Team),
        }
    }

    fn modal(&self) -> Option<TeamComponentId> {
        None
    }

    fn binding_context(&self, id: TeamComponentId) -> TeamContext {
        match id {
            TeamComponentId::Header => TeamContext::Header,
            TeamComponentId::Team => TeamContext::Team,
        }
    }

    fn default_context(&self) -> TeamContext {
        TeamContext::Team
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        host,
        debug: debug_args,
    } = Args::parse();

    let debug = DebugSession::new(debug_args);

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let channel = match Channel::connect(&host).await {
        Ok(channel) => Arc::new(channel),
        Err(error) => {
            eprintln!("Error: could not reach the predictor at {host}:{PREDICTOR_PORT}.");
            eprintln!("Details: {error}");
            std::process::exit(1);
        }
    };

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, channel).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct TeamUi {
    header: GenerationHeader,
    team: TeamPanel,
    predicted: PredictedPanel,
    status_bar: StatusBar,
}

impl TeamUi {
    fn new() -> Self {
        Self {
            header: GenerationHeader,
            team: TeamPanel,
            predicted: PredictedPanel,
            status_bar: StatusBar::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        _render_ctx: RenderContext,
        event_ctx: &mut EventContext<TeamComponentId>,
    ) {
        let base = Block::default().style(Style::default().bg(BG_BASE));
        frame.render_widget(base, area);
        let layout = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

        event_ctx.set_component_area(TeamComponentId::Header, layout[0]);
        self.header.render(
            frame,
            layout[0],
            GenerationHeaderProps {
                generation: &state.generation,
                capabilities: state.capabilities(),
                is_focused: state.focus == FocusArea::Generation,
            },
        );

        let body = Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)])
            .split(layout[1]);

        event_ctx.set_component_area(TeamComponentId::Team, body[0]);
        self.team.render(
            frame,
            body[0],
            TeamPanelProps {
                state,
                is_focused: state.focus == FocusArea::Team,
            },
        );

        self.predicted.render(
            frame,
            body[1],
            PredictedPanelProps {
                predicted: state.predicted.as_deref(),
            },
        );

        render_footer(frame, layout[2], state, &mut self.status_bar);
    }

    fn handle_header_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = GenerationHeaderProps {
            generation: &state.generation,
            capabilities: state.capabilities(),
            is_focused: true,
        };
        let actions: Vec<_> = self.header.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }

    fn handle_team_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let props = TeamPanelProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self.team.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    channel: Arc<Channel>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(TeamUi::new()));
    let mut bus: EventBus<AppState, Action, TeamComponentId, TeamContext> = EventBus::new();
    let keybindings: Keybindings<TeamContext> = Keybindings::new();

    let ui_header = Rc::clone(&ui);
    bus.register(TeamComponentId::Header, move |event, state| {
        ui_header
            .borrow_mut()
            .handle_header_event(&event.kind, state)
    });

    let ui_team = Rc::clone(&ui);
    bus.register(TeamComponentId::Team, move |event, state| {
        ui_team.borrow_mut().handle_team_event(&event.kind, state)
    });

    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Tab => HandlerResponse::action(Action::FocusNext),
            crossterm::event::KeyCode::BackTab => HandlerResponse::action(Action::FocusPrev),
            crossterm::event::KeyCode::Enter => HandlerResponse::action(Action::PredictRandom),
            crossterm::event::KeyCode::Char('r') => HandlerResponse::action(Action::PredictRandom),
            crossterm::event::KeyCode::Char('m') => {
                HandlerResponse::action(Action::PredictMostLikely)
            }
            crossterm::event::KeyCode::Char('a') => HandlerResponse::action(Action::SlotAdd),
            crossterm::event::KeyCode::Char('c') => HandlerResponse::action(Action::TeamClear),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&channel)),
        )
        .await
}

/// Bridge effects onto the channel: sends go straight out, a listen
/// parks one task on the next inbound frame.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, channel: Arc<Channel>) {
    match effect {
        Effect::Send { request } => channel.send(&request),
        Effect::Listen => {
            ctx.tasks().spawn("channel", async move {
                match channel.recv().await {
                    Some(push) => Action::ChannelDidLoad(push),
                    None => Action::ChannelDidClose,
                }
            });
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let (left_hints, center_hints) = status_hints(state);
    let count = format!("team {}/{}", state.team.len(), MAX_TEAM_SIZE);
    let count_span = Span::styled(count.as_str(), Style::default().fg(ACCENT_ALT));
    let count_items = [StatusBarItem::span(count_span)];
    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: None,
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };
    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&count_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    let left = match state.focus {
        FocusArea::Generation => vec![StatusBarHint::new("h/l", "Generation")],
        FocusArea::Team => vec![
            StatusBarHint::new("j/k", "Row"),
            StatusBarHint::new("h/l", "Edit"),
            StatusBarHint::new("Shift+h/l", "Fast"),
            StatusBarHint::new("a", "Add"),
            StatusBarHint::new("c", "Clear"),
        ],
    };
    let center = vec![
        StatusBarHint::new("Tab", "Focus"),
        StatusBarHint::new("r", "Random"),
        StatusBarHint::new("m", "Most likely"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}
