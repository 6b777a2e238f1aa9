use crate::domain::todo::Todo;

/// Renders a todo as a single line of text for humans: log lines and the
/// terminal client. It never shapes an HTTP response.
pub trait ShowService: Send + Sync + 'static {
    fn show(&self, todo: &Todo) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainShowService;

impl ShowService for PlainShowService {
    fn show(&self, todo: &Todo) -> String {
        let mark = if todo.completed { "[x]" } else { "[ ]" };
        format!("#{} {} {} (order {})", todo.id, mark, todo.title, todo.order)
    }
}
