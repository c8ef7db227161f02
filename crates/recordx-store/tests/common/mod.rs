use recordx_core::prelude::*;
use recordx_store::{db, migrations, SqliteRepo};
use rusqlite::Connection;
use std::path::Path;
use std::rc::Rc;

/// In-memory database with migrations applied and a `User { name, age }` type
#[allow(dead_code)]
pub fn setup_db() -> Rc<Connection> {
    let mut conn = db::open_in_memory().expect("open in-memory database");
    prepare(&mut conn);
    Rc::new(conn)
}

/// On-disk database at `path`, prepared like [`setup_db`]
#[allow(dead_code)]
pub fn setup_file_db(path: &Path) -> Rc<Connection> {
    let mut conn = db::open(path).expect("open database file");
    db::configure(&conn).expect("configure connection");
    prepare(&mut conn);
    Rc::new(conn)
}

fn prepare(conn: &mut Connection) {
    migrations::apply_migrations(conn).expect("apply migrations");
    SqliteRepo::define_type(conn, "User", &["name", "age"]).expect("define User");
}

/// Form object updating one user row through the repository
#[allow(dead_code)]
pub struct UserForm {
    conn: Rc<Connection>,
    id: EntityId,
    values: Vec<(&'static str, Value)>,
}

#[allow(dead_code)]
impl UserForm {
    pub fn new(conn: &Rc<Connection>, id: EntityId) -> Self {
        Self {
            conn: Rc::clone(conn),
            id,
            values: Vec::new(),
        }
    }

    pub fn set(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.values.push((name, value.into()));
        self
    }
}

impl Delegate for UserForm {
    type Output = recordx_core::Result<()>;

    fn execute(&mut self) -> Self::Output {
        SqliteRepo::update_attributes(&self.conn, "User", &self.id, self.values.iter().cloned())
    }
}

/// Service object deleting one user row
#[allow(dead_code)]
pub struct DestroyUser {
    conn: Rc<Connection>,
    id: EntityId,
}

#[allow(dead_code)]
impl DestroyUser {
    pub fn new(conn: &Rc<Connection>, id: EntityId) -> Self {
        Self {
            conn: Rc::clone(conn),
            id,
        }
    }
}

impl Delegate for DestroyUser {
    type Output = recordx_core::Result<()>;

    fn execute(&mut self) -> Self::Output {
        SqliteRepo::delete_record(&self.conn, "User", &self.id)
    }
}
