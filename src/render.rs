use std::io::{self, Write};

use crate::form::FieldErrors;
use crate::models::TaskStatus;
use crate::navigation::{Navigator, Screen};
use crate::screens::detail::EditBusy;
use crate::screens::{list, CreateScreen, DetailMode, DetailScreen, ListScreen, ListView};
use crate::snackbar::{Notice, NoticeKind};

pub fn banner(base_url: &str) {
    println!("Task list client");
    println!("API: {}", base_url);
    println!("Type help for commands.");
}

pub fn prompt(nav: &Navigator) {
    print!("{}> ", nav.route().name());
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  help                   Show commands");
    println!("  quit | exit            Exit");
    println!("  back                   Return to the previous screen");
    println!("Task List:");
    println!("  refresh                Reload the list");
    println!("  retry                  Retry after a failed load");
    println!("  toggle <id>            Mark a task done / to do");
    println!("  open <id>              Show task details");
    println!("  new                    Add a task");
    println!("New Task:");
    println!("  title <text>           Set the title");
    println!("  desc <text>            Set the description");
    println!("  submit                 Add the task");
    println!("Task Details:");
    println!("  edit | cancel          Enter / leave edit mode");
    println!("  title <text>           Set the title (edit mode)");
    println!("  desc <text>            Set the description (edit mode)");
    println!("  status <status>        to_do | in_progress | done (edit mode)");
    println!("  save                   Save changes");
    println!("  delete                 Delete the task");
    println!("  retry                  Retry after a failed load");
}

pub fn screen(nav: &Navigator) {
    let screen = nav.current();
    println!();
    println!("== {} ==", screen.title());
    match screen {
        Screen::List(list) => list_screen(list),
        Screen::Create(create) => create_screen(create),
        Screen::Detail(detail) => detail_screen(detail),
    }
}

fn list_screen(screen: &ListScreen) {
    for line in list_lines(screen) {
        println!("{}", line);
    }
}

fn list_lines(screen: &ListScreen) -> Vec<String> {
    let mut lines = Vec::new();
    if screen.is_refreshing() {
        lines.push("refreshing...".to_string());
    }
    match screen.view() {
        ListView::Loading => lines.push("loading...".to_string()),
        ListView::Error(message) => {
            lines.push(message.to_string());
            lines.push("(retry)".to_string());
        }
        ListView::Empty => lines.push(list::EMPTY_MESSAGE.to_string()),
        ListView::Rows(tasks) => {
            for task in tasks {
                let mark = if task.status == TaskStatus::Done {
                    "x"
                } else {
                    " "
                };
                let mut line = format!("[{}] {:>4}  {}", mark, task.id, task.title);
                if screen.is_row_updating(task.id) {
                    line.push_str("  updating...");
                }
                lines.push(line);
            }
        }
    }
    lines
}

fn create_screen(screen: &CreateScreen) {
    let draft = screen.draft();
    println!("Title:       {}", draft.title);
    println!("Description: {}", draft.description);
    field_errors(screen.errors());
    if screen.is_submitting() {
        println!("adding...");
    }
}

fn detail_screen(screen: &DetailScreen) {
    match screen.mode() {
        DetailMode::Loading => println!("loading..."),
        DetailMode::Failed { message } => {
            println!("Error fetching task: {}", message);
            println!("(retry)");
        }
        DetailMode::Viewing { deleting, .. } => {
            for (label, value) in screen.details() {
                println!("{:<14}{}", label, value);
            }
            if *deleting {
                println!("deleting...");
            }
        }
        DetailMode::Editing {
            form, errors, busy, ..
        } => {
            println!("Title:       {}", form.draft.title);
            println!("Description: {}", form.draft.description);
            println!("Task status: {}", form.status.label());
            field_errors(errors);
            match busy {
                EditBusy::Saving => println!("saving..."),
                EditBusy::Deleting => println!("deleting..."),
                EditBusy::Idle => {}
            }
        }
        DetailMode::Deleted => println!("deleted"),
    }
}

fn field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        println!("  ! {}: {}", field, message);
    }
}

pub fn notices(notices: &[Notice]) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Info => println!("* {}", notice.message),
            NoticeKind::Error => eprintln!("error: {}", notice.message),
        }
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
