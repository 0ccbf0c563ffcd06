use serde::Serialize;
use tera::{Context, Tera};

use crate::core::{Todo, TodoError};

/// Server-rendered pages. Templates are compiled into the binary and
/// autoescaped since every name ends in `.html`.
pub struct Views {
    tera: Tera,
}

#[derive(Serialize)]
struct TodoRow<'a> {
    #[serde(flatten)]
    todo: &'a Todo,
    description_text: &'a str,
    created_display: String,
}

impl<'a> From<&'a Todo> for TodoRow<'a> {
    fn from(todo: &'a Todo) -> Self {
        Self {
            todo,
            description_text: todo.description.as_deref().unwrap_or_default(),
            created_display: todo.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

impl Views {
    pub fn new() -> Result<Self, TodoError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", include_str!("../../../templates/base.html")),
            ("index.html", include_str!("../../../templates/index.html")),
            ("edit.html", include_str!("../../../templates/edit.html")),
        ])?;
        Ok(Self { tera })
    }

    pub fn index(&self, todos: &[Todo]) -> Result<String, TodoError> {
        let rows: Vec<TodoRow<'_>> = todos.iter().map(TodoRow::from).collect();
        let mut context = Context::new();
        context.insert("todos", &rows);
        Ok(self.tera.render("index.html", &context)?)
    }

    pub fn edit(&self, todo: &Todo) -> Result<String, TodoError> {
        let mut context = Context::new();
        context.insert("todo", &TodoRow::from(todo));
        Ok(self.tera.render("edit.html", &context)?)
    }
}
