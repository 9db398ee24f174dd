use rusqlite::types::Value;
use staffdb_store::model::{Department, Employee};
use staffdb_store::{Handle, RawRow, Session};

/// Fresh in-memory session with no tables
#[allow(dead_code)]
pub fn setup_session() -> Session {
    Session::open_in_memory().unwrap()
}

/// Fresh in-memory session with all three tables created
#[allow(dead_code)]
pub fn setup_session_with_tables() -> Session {
    let mut session = setup_session();
    session.create_tables().unwrap();
    session
}

#[allow(dead_code)]
pub fn payroll(session: &mut Session) -> Handle<Department> {
    session
        .departments()
        .create(Department::new("Payroll", "Building A, 5th Floor"))
        .unwrap()
}

#[allow(dead_code)]
pub fn hire(session: &mut Session, name: &str, title: &str, department_id: i64) -> Handle<Employee> {
    session
        .employees()
        .create(Employee::new(name, title, department_id))
        .unwrap()
}

/// First row of `SELECT * FROM <table>` as a raw row
#[allow(dead_code)]
pub fn first_raw_row(session: &Session, table: &str) -> RawRow {
    let sql = format!("SELECT * FROM {} ORDER BY id LIMIT 1", table);
    session
        .connection()
        .query_row(&sql, [], |row| {
            let width = row.as_ref().column_count();
            RawRow::from_sql_row(row, width)
        })
        .unwrap()
}

#[allow(dead_code)]
pub fn table_exists(session: &Session, table: &str) -> bool {
    session
        .connection()
        .query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
        > 0
}

#[allow(dead_code)]
pub fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}
