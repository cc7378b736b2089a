use std::io;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::models::{TaskId, TaskStatus};
use crate::navigation::{Navigator, Route, Screen};
use crate::render;
use crate::screens::Outcome;
use crate::state::AppState;

/// Line-oriented front-end over the navigator.
pub struct Shell {
    nav: Navigator,
}

impl Shell {
    pub async fn start(app: AppState) -> Self {
        Self {
            nav: Navigator::start(app).await,
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub async fn run(&mut self, base_url: &str) -> io::Result<()> {
        render::banner(base_url);
        self.redraw();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            render::prompt(&self.nav);
            let Some(line) = lines.next_line().await? else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if self.handle(line).await {
                break;
            }
            self.redraw();
        }
        Ok(())
    }

    fn redraw(&self) {
        render::notices(&self.nav.app().snackbar.drain());
        render::screen(&self.nav);
    }

    /// Runs one command line. Returns `true` when the user asked to quit.
    pub async fn handle(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").to_lowercase();
        let rest = parts.next().unwrap_or("").trim();
        debug!("command {:?} on {}", cmd, self.nav.route());

        match cmd.as_str() {
            "quit" | "exit" => return true,
            "help" => {
                render::help();
                return false;
            }
            "back" => {
                if !self.nav.go_back().await {
                    render::info("already on the first screen");
                }
                return false;
            }
            _ => {}
        }

        match self.dispatch(&cmd, rest).await {
            Some(outcome) => {
                let outcome = self.nav.apply(outcome).await;
                report(outcome);
            }
            None => render::info("unknown command, type help"),
        }
        false
    }

    async fn dispatch(&mut self, cmd: &str, rest: &str) -> Option<Outcome> {
        match (self.nav.route(), cmd) {
            (Route::Home, "new") => return Some(self.nav.navigate(Route::NewTask).await),
            (Route::Home, "open") => {
                let id = parse_id(rest)?;
                return Some(self.nav.navigate(Route::TaskDetails { id }).await);
            }
            _ => {}
        }

        let outcome = match self.nav.current_mut() {
            Screen::List(list) => match cmd {
                "refresh" => list.refresh().await,
                "retry" => list.retry().await,
                "toggle" => list.toggle_status(parse_id(rest)?).await,
                _ => return None,
            },
            Screen::Create(create) => match cmd {
                "title" => {
                    create.set_title(rest);
                    Outcome::Done
                }
                "desc" => {
                    create.set_description(rest);
                    Outcome::Done
                }
                "submit" => create.submit().await,
                _ => return None,
            },
            Screen::Detail(detail) => match cmd {
                "edit" => applied(detail.begin_edit()),
                "cancel" => applied(detail.cancel_edit()),
                "title" => applied(detail.set_title(rest)),
                "desc" => applied(detail.set_description(rest)),
                "status" => match rest.parse::<TaskStatus>() {
                    Ok(status) => applied(detail.set_status(status)),
                    Err(e) => {
                        render::error(&e);
                        Outcome::Ignored
                    }
                },
                "save" => detail.save().await,
                "delete" => detail.delete().await,
                "retry" => detail.retry().await,
                _ => return None,
            },
        };
        Some(outcome)
    }
}

fn applied(changed: bool) -> Outcome {
    if changed {
        Outcome::Done
    } else {
        Outcome::Ignored
    }
}

fn parse_id(raw: &str) -> Option<TaskId> {
    match raw.trim().parse::<TaskId>() {
        Ok(id) => Some(id),
        Err(_) => {
            render::error("expected a task id");
            None
        }
    }
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Invalid => render::error("please fix the highlighted fields"),
        Outcome::Ignored => render::info("nothing to do here"),
        Outcome::Cancelled => debug!("action cancelled"),
        Outcome::Done | Outcome::Failed | Outcome::Exit => {}
    }
}
