use recordx_core::prelude::*;

/// Store with a `User { name, age }` table
#[allow(dead_code)]
pub fn users_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.define("User", &["name", "age"]);
    store
}

/// Insert `Sophia`, aged 20
#[allow(dead_code)]
pub fn sophia(store: &MemoryStore) -> MemoryRecord {
    store
        .insert(
            "User",
            [("name", Value::from("Sophia")), ("age", Value::from(20))],
        )
        .expect("insert Sophia")
}

/// Form object writing a set of attributes to one user row
#[allow(dead_code)]
pub struct UserForm {
    store: MemoryStore,
    id: EntityId,
    values: Vec<(&'static str, Value)>,
}

#[allow(dead_code)]
impl UserForm {
    pub fn new(store: &MemoryStore, id: EntityId) -> Self {
        Self {
            store: store.clone(),
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
        self.store
            .update("User", &self.id, self.values.iter().cloned())
    }
}

/// Form object with the same shape as [`UserForm`], never designated
#[allow(dead_code)]
pub struct AdminForm(pub UserForm);

impl Delegate for AdminForm {
    type Output = recordx_core::Result<()>;

    fn execute(&mut self) -> Self::Output {
        self.0.execute()
    }
}

/// Service object deleting one user row
#[allow(dead_code)]
pub struct DestroyUser {
    store: MemoryStore,
    id: EntityId,
}

#[allow(dead_code)]
impl DestroyUser {
    pub fn new(store: &MemoryStore, id: EntityId) -> Self {
        Self {
            store: store.clone(),
            id,
        }
    }
}

impl Delegate for DestroyUser {
    type Output = recordx_core::Result<()>;

    fn execute(&mut self) -> Self::Output {
        self.store.delete("User", &self.id)
    }
}
