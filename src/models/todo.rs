use serde::{Deserialize, Serialize};

use crate::store::{DB, DBError, next_id};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub description: String,
    pub completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompleteOutcome {
    Completed,
    AlreadyCompleted,
    NotFound,
}

pub fn create_task(db: &mut DB<Task>, description: &str) -> Result<Task, DBError> {
    let task = Task {
        id: next_id(db, |task| task.id)?,
        description: description.to_string(),
        completed: false,
    };
    db.push(task.clone());
    Ok(task)
}

pub fn complete_task(db: &mut DB<Task>, id: u32) -> CompleteOutcome {
    match db.iter_mut().find(|task| task.id == id) {
        Some(task) if task.completed => CompleteOutcome::AlreadyCompleted,
        Some(task) => {
            task.completed = true;
            CompleteOutcome::Completed
        }
        None => CompleteOutcome::NotFound,
    }
}
