use std::fmt;

use tracing::debug;

use crate::models::TaskId;
use crate::screens::{self, CreateScreen, DetailScreen, ListScreen, Outcome, ScreenScope};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    NewTask,
    TaskDetails { id: TaskId },
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::NewTask => "NewTask",
            Route::TaskDetails { .. } => "TaskDetails",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::TaskDetails { id } => write!(f, "{}({})", self.name(), id),
            _ => f.write_str(self.name()),
        }
    }
}

/// A mounted screen.
pub enum Screen {
    List(ListScreen),
    Create(CreateScreen),
    Detail(DetailScreen),
}

impl Screen {
    fn mount(app: &AppState, route: Route) -> Self {
        match route {
            Route::Home => Screen::List(ListScreen::new(app.clone())),
            Route::NewTask => Screen::Create(CreateScreen::new(app.clone())),
            Route::TaskDetails { id } => Screen::Detail(DetailScreen::new(app.clone(), id)),
        }
    }

    pub fn route(&self) -> Route {
        match self {
            Screen::List(_) => Route::Home,
            Screen::Create(_) => Route::NewTask,
            Screen::Detail(screen) => Route::TaskDetails {
                id: screen.task_id(),
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Screen::List(_) => screens::list::TITLE,
            Screen::Create(_) => screens::create::TITLE,
            Screen::Detail(_) => screens::detail::TITLE,
        }
    }

    pub fn scope(&self) -> &ScreenScope {
        match self {
            Screen::List(screen) => screen.scope(),
            Screen::Create(screen) => screen.scope(),
            Screen::Detail(screen) => screen.scope(),
        }
    }

    /// Work a screen does when it becomes the active route.
    async fn activate(&mut self, first_mount: bool) -> Outcome {
        match self {
            Screen::List(screen) => screen.on_focus().await,
            Screen::Detail(screen) if first_mount => screen.load().await,
            _ => Outcome::Ignored,
        }
    }
}

/// Stack of mounted screens. `Home` sits at the bottom and is never popped.
pub struct Navigator {
    app: AppState,
    stack: Vec<Screen>,
}

impl Navigator {
    /// Mounts `Home` and runs its first fetch.
    pub async fn start(app: AppState) -> Self {
        let mut navigator = Self {
            stack: vec![Screen::mount(&app, Route::Home)],
            app,
        };
        navigator.current_mut().activate(true).await;
        navigator
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    pub fn current(&self) -> &Screen {
        // The stack always holds Home.
        &self.stack[self.stack.len() - 1]
    }

    pub fn current_mut(&mut self) -> &mut Screen {
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }

    pub fn route(&self) -> Route {
        self.current().route()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn can_go_back(&self) -> bool {
        self.stack.len() > 1
    }

    pub async fn navigate(&mut self, route: Route) -> Outcome {
        debug!("navigate {} -> {}", self.route(), route);
        self.stack.push(Screen::mount(&self.app, route));
        self.current_mut().activate(true).await
    }

    /// Pops the active screen, cancels whatever it still had in flight, and
    /// re-activates the screen underneath.
    pub async fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        if let Some(screen) = self.stack.pop() {
            screen.scope().close();
            debug!("back from {} to {}", screen.route(), self.route());
        }
        self.current_mut().activate(false).await;
        true
    }

    /// Follows up on what a screen action returned.
    pub async fn apply(&mut self, outcome: Outcome) -> Outcome {
        if outcome == Outcome::Exit {
            self.go_back().await;
        }
        outcome
    }
}
