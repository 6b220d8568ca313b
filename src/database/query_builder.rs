use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, Postgres};

use crate::database::models::ContentPatch;

/// Columns returned by every content statement
pub const CONTENT_COLUMNS: &str = "id, name, search_text, image_url, display_order, is_active, \
                                   created_at, updated_at, created_by, updated_by";

/// Content columns a caller may change. Column names in generated SQL come
/// only from this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentColumn {
    Name,
    SearchText,
    ImageUrl,
    DisplayOrder,
    IsActive,
}

impl ContentColumn {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentColumn::Name => "name",
            ContentColumn::SearchText => "search_text",
            ContentColumn::ImageUrl => "image_url",
            ContentColumn::DisplayOrder => "display_order",
            ContentColumn::IsActive => "is_active",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i32),
    Bool(bool),
}

/// `UPDATE ... SET` built from whichever fields were supplied.
///
/// The audit stamp (`updated_by`, `updated_at`) is always the first assignment,
/// so the stamp and the field changes commit in one statement. Parameters are
/// positional: `$1` is the actor, then one per assignment, then the row id.
#[derive(Debug, Clone)]
pub struct UpdateStatement {
    table: &'static str,
    id: i32,
    actor: i32,
    assignments: Vec<(ContentColumn, BindValue)>,
}

impl UpdateStatement {
    pub fn new(table: &'static str, id: i32, actor: i32) -> Self {
        Self {
            table,
            id,
            actor,
            assignments: Vec::new(),
        }
    }

    pub fn from_patch(table: &'static str, id: i32, actor: i32, patch: ContentPatch) -> Self {
        let mut statement = Self::new(table, id, actor);
        if let Some(name) = patch.name {
            statement.set(ContentColumn::Name, BindValue::Text(name));
        }
        if let Some(search_text) = patch.search_text {
            statement.set(ContentColumn::SearchText, BindValue::Text(search_text));
        }
        if let Some(image_url) = patch.image_url {
            statement.set(ContentColumn::ImageUrl, BindValue::Text(image_url));
        }
        if let Some(display_order) = patch.display_order {
            statement.set(ContentColumn::DisplayOrder, BindValue::Int(display_order));
        }
        if let Some(is_active) = patch.is_active {
            statement.set(ContentColumn::IsActive, BindValue::Bool(is_active));
        }
        statement
    }

    /// Assign a column, replacing an earlier assignment to the same column.
    pub fn set(&mut self, column: ContentColumn, value: BindValue) -> &mut Self {
        match self.assignments.iter_mut().find(|(existing, _)| *existing == column) {
            Some(slot) => slot.1 = value,
            None => self.assignments.push((column, value)),
        }
        self
    }

    pub fn assignments(&self) -> &[(ContentColumn, BindValue)] {
        &self.assignments
    }

    pub fn sql(&self) -> String {
        let mut sql = format!(
            "UPDATE \"{}\" SET updated_by = $1, updated_at = NOW()",
            self.table
        );

        let mut position = 2;
        for (column, _) in &self.assignments {
            sql.push_str(&format!(", {} = ${}", column.as_str(), position));
            position += 1;
        }

        sql.push_str(&format!(
            " WHERE id = ${} RETURNING {}",
            position, CONTENT_COLUMNS
        ));
        sql
    }

    /// Bind parameters onto a query prepared from [`UpdateStatement::sql`].
    pub fn bind<'q, O>(
        &'q self,
        query: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    ) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        let mut query = query.bind(self.actor);
        for (_, value) in &self.assignments {
            query = bind_value(query, value);
        }
        query.bind(self.id)
    }
}

fn bind_value<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q BindValue,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        BindValue::Text(s) => q.bind(s.as_str()),
        BindValue::Int(i) => q.bind(*i),
        BindValue::Bool(b) => q.bind(*b),
    }
}
