//! Table definitions, per backend dialect

/// SQL dialect of the live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Map sqlx's `backend_name()` onto a dialect
    pub fn from_backend(name: &str) -> Option<Self> {
        match name {
            "PostgreSQL" => Some(Dialect::Postgres),
            "SQLite" => Some(Dialect::Sqlite),
            _ => None,
        }
    }

    fn id_column(self) -> &'static str {
        match self {
            Dialect::Postgres => "id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY",
            Dialect::Sqlite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
        }
    }

    fn float_type(self) -> &'static str {
        match self {
            Dialect::Postgres => "DOUBLE PRECISION",
            Dialect::Sqlite => "REAL",
        }
    }

    /// `CREATE TABLE IF NOT EXISTS` statements in dependency order
    pub fn create_statements(self) -> Vec<String> {
        vec![
            format!(
                "CREATE TABLE IF NOT EXISTS users (
                    {id},
                    name TEXT NOT NULL,
                    role TEXT NOT NULL,
                    email TEXT NOT NULL
                )",
                id = self.id_column()
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS neighborhoods (
                    {id},
                    name TEXT NOT NULL,
                    risk_area_ratio {float} NOT NULL,
                    population_density {float} NOT NULL
                )",
                id = self.id_column(),
                float = self.float_type()
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS incidents (
                    {id},
                    title TEXT NOT NULL,
                    description TEXT NOT NULL,
                    category TEXT NOT NULL,
                    date TEXT NOT NULL,
                    status TEXT NOT NULL,
                    location TEXT NOT NULL,
                    user_id BIGINT NOT NULL REFERENCES users(id),
                    neighborhood_id BIGINT NOT NULL REFERENCES neighborhoods(id)
                )",
                id = self.id_column()
            ),
        ]
    }
}
