use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Student {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateStudent {
    pub name: String,
}

/// Students keyed by id, so listings come back in creation order.
#[derive(Debug)]
pub struct Store {
    next_id: i64,
    students: BTreeMap<i64, Student>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            students: BTreeMap::new(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/students/", get(list_students).post(create_student))
        .route("/students", get(list_students).post(create_student))
        .route("/students/{id}", delete(delete_student))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_students(State(db): State<Db>) -> Json<Vec<Student>> {
    let store = db.read().await;
    Json(store.students.values().cloned().collect())
}

async fn create_student(
    State(db): State<Db>,
    Json(input): Json<CreateStudent>,
) -> Result<(StatusCode, Json<Student>), StatusCode> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }
    let mut store = db.write().await;
    let student = Student {
        id: store.next_id,
        name: name.to_string(),
    };
    store.next_id += 1;
    store.students.insert(student.id, student.clone());
    tracing::info!(id = student.id, name = %student.name, "created student");
    Ok((StatusCode::CREATED, Json(student)))
}

async fn delete_student(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut store = db.write().await;
    let removed = store.students.remove(&id);
    tracing::info!(id, found = removed.is_some(), "delete student");
    removed.map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
