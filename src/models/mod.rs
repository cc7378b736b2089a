pub mod task;

pub use task::{NewTaskRequest, Task, TaskId, TaskStatus, UpdateTaskRequest};
