use crate::config::Paths;
use crate::error::AppError;
use crate::models::todo::{self, CompleteOutcome, Task};
use crate::store::{DB, load_db, save_db};

pub const EMPTY_HINT: &str = "You have no tasks! Add one with 'personalcli todo add \"my task\"'";

pub struct TodoService;

impl TodoService {
    pub fn add(paths: &Paths, words: &[String]) -> Result<Task, AppError> {
        let description = words.join(" ").trim().to_string();
        if description.is_empty() {
            return Err(AppError::input("Task description cannot be empty."));
        }
        let path = paths.tasks_file();
        let mut db: DB<Task> = load_db(&path)?;
        let task = todo::create_task(&mut db, &description)?;
        save_db(&path, &db)?;
        tracing::debug!(id = task.id, "task added");
        Ok(task)
    }

    pub fn list(paths: &Paths) -> Result<Vec<Task>, AppError> {
        Ok(load_db(&paths.tasks_file())?)
    }

    pub fn done(paths: &Paths, id: &str) -> Result<u32, AppError> {
        let id = parse_task_id(id)?;
        let path = paths.tasks_file();
        let mut db: DB<Task> = load_db(&path)?;
        match todo::complete_task(&mut db, id) {
            CompleteOutcome::NotFound => Err(AppError::NotFound("Task ID not found.".to_string())),
            CompleteOutcome::AlreadyCompleted => {
                tracing::debug!(id, "task was already completed");
                Ok(id)
            }
            CompleteOutcome::Completed => {
                save_db(&path, &db)?;
                Ok(id)
            }
        }
    }

    pub fn clear(paths: &Paths) -> Result<(), AppError> {
        save_db::<Task>(&paths.tasks_file(), &[])?;
        Ok(())
    }
}

pub fn parse_task_id(raw: &str) -> Result<u32, AppError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| AppError::input("Invalid task ID. Please provide a number."))
}

pub fn render_tasks(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return EMPTY_HINT.to_string();
    }
    let mut body = String::from("Your tasks:");
    for task in tasks {
        let status = if task.completed { "✔" } else { " " };
        body.push_str(&format!("\n[{}] {}: {}", status, task.id, task.description));
    }
    body
}
