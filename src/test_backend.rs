//! In-process stand-in for the student backend, used by the HTTP-level tests.

use crate::{
    api::AlumnosApi,
    config::{ApiConfig, DEFAULT_APP_NAME, Environment, RuntimeConfiguration},
    data::{
        ApiMessage, CourseCount, HealthStatus, LevelCount, ServiceInfo, Statistics, Student,
        StudentCreate, StudentUpdate,
    },
    state::AlumnosState,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use tokio::net::TcpListener;

#[derive(Debug)]
struct FakeDb {
    students: Vec<Student>,
    next_id: i32,
}

#[derive(Clone, Debug)]
struct FakeState {
    db: Arc<Mutex<FakeDb>>,
    fail_statistics: Arc<AtomicBool>,
}

pub struct FakeBackend {
    pub base_url: String,
    state: FakeState,
}

impl FakeBackend {
    pub async fn spawn() -> Self {
        let now = jiff::Zoned::now().datetime();
        let seed = |id, nombre: &str, apellido: &str, details: [&str; 3], activo| {
            let [telefono, curso, nivel] = details;
            Student {
                id,
                nombre: nombre.into(),
                apellido: apellido.into(),
                email: format!("{}@email.com", nombre.to_lowercase()),
                telefono: Some(telefono.into()),
                fecha_nacimiento: None,
                curso: Some(curso.into()),
                nivel: Some(nivel.into()),
                activo,
                fecha_registro: now,
            }
        };

        let state = FakeState {
            db: Arc::new(Mutex::new(FakeDb {
                students: vec![
                    seed(1, "Juan", "Pérez", ["123456789", "Matemáticas", "Beginner"], true),
                    seed(2, "María", "García", ["987654321", "Ciencias", "Intermediate"], true),
                    seed(3, "Carlos", "López", ["555666777", "Historia", "Advanced"], false),
                ],
                next_id: 4,
            })),
            fail_statistics: Arc::new(AtomicBool::new(false)),
        };

        let router = Router::new()
            .route("/", get(root))
            .route("/health", get(health))
            .route("/alumnos", get(list).post(create))
            .route("/alumnos/{id}", get(get_one).put(update).delete(delete))
            .route("/alumnos/{id}/desactivar", patch(deactivate))
            .route("/alumnos/{id}/activar", patch(activate))
            .route("/estadisticas", get(statistics))
            .with_state(state.clone());

        Self {
            base_url: spawn_router(router).await,
            state,
        }
    }

    pub fn set_fail_statistics(&self, fail: bool) {
        self.state.fail_statistics.store(fail, Ordering::SeqCst);
    }

    pub fn student(&self, id: i32) -> Option<Student> {
        self.state
            .db
            .lock()
            .expect("fake db lock")
            .students
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }
}

pub async fn spawn_router(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fake backend serves");
    });
    format!("http://{addr}")
}

///a backend that accepts every request and never answers the student or statistics calls
pub async fn hung_backend_url() -> String {
    async fn hang() -> StatusCode {
        std::future::pending().await
    }

    let router = Router::new()
        .route("/alumnos", get(hang))
        .route("/alumnos/{id}", get(hang).put(hang).delete(hang))
        .route("/alumnos/{id}/desactivar", patch(hang))
        .route("/alumnos/{id}/activar", patch(hang))
        .route("/estadisticas", get(hang));
    spawn_router(router).await
}

///a URL nothing is listening on
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn api_for_environment(base_url: &str, environment: Environment) -> AlumnosApi {
    let config = ApiConfig::from_parts(base_url, environment, DEFAULT_APP_NAME)
        .expect("valid config");
    AlumnosApi::new(Arc::new(config)).expect("client builds")
}

pub fn api_for(base_url: &str) -> AlumnosApi {
    api_for_environment(base_url, Environment::Development)
}

pub fn state_for_environment(base_url: &str, environment: Environment) -> AlumnosState {
    let config = ApiConfig::from_parts(base_url, environment, DEFAULT_APP_NAME)
        .expect("valid config");
    AlumnosState::new(RuntimeConfiguration::from_api_config(config)).expect("state builds")
}

pub fn state_for(base_url: &str) -> AlumnosState {
    state_for_environment(base_url, Environment::Development)
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Alumno no encontrado"})),
    )
        .into_response()
}

async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "API Gestión de Alumnos - API funcionando".into(),
        status: "healthy".into(),
        environment: Some("development".into()),
        version: Some("1.0.0".into()),
        docs: Some("/docs".into()),
    })
}

async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".into(),
        environment: Some("development".into()),
        version: Some("1.0.0".into()),
        timestamp: Some(jiff::Zoned::now().datetime().to_string()),
    })
}

#[derive(Deserialize)]
struct ListQuery {
    activo: Option<bool>,
    curso: Option<String>,
    nivel: Option<String>,
}

fn same_text(field: Option<&String>, wanted: Option<&String>) -> bool {
    match (field, wanted) {
        (_, None) => true,
        (Some(field), Some(wanted)) => field.to_lowercase() == wanted.to_lowercase(),
        (None, Some(_)) => false,
    }
}

async fn list(State(state): State<FakeState>, Query(q): Query<ListQuery>) -> Json<Vec<Student>> {
    let db = state.db.lock().expect("fake db lock");
    Json(
        db.students
            .iter()
            .filter(|s| q.activo.is_none_or(|a| s.activo == a))
            .filter(|s| same_text(s.curso.as_ref(), q.curso.as_ref()))
            .filter(|s| same_text(s.nivel.as_ref(), q.nivel.as_ref()))
            .cloned()
            .collect(),
    )
}

async fn get_one(State(state): State<FakeState>, Path(id): Path<i32>) -> Response {
    let db = state.db.lock().expect("fake db lock");
    db.students
        .iter()
        .find(|s| s.id == id)
        .map_or_else(not_found, |s| Json(s.clone()).into_response())
}

async fn create(State(state): State<FakeState>, Json(new): Json<StudentCreate>) -> Response {
    let mut db = state.db.lock().expect("fake db lock");
    if db.students.iter().any(|s| s.email == new.email) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "El email ya está registrado"})),
        )
            .into_response();
    }

    let student = Student {
        id: db.next_id,
        nombre: new.nombre,
        apellido: new.apellido,
        email: new.email,
        telefono: new.telefono,
        fecha_nacimiento: new.fecha_nacimiento,
        curso: new.curso,
        nivel: new.nivel,
        activo: true,
        fecha_registro: jiff::Zoned::now().datetime(),
    };
    db.next_id += 1;
    db.students.push(student.clone());
    Json(student).into_response()
}

async fn update(
    State(state): State<FakeState>,
    Path(id): Path<i32>,
    Json(patch): Json<StudentUpdate>,
) -> Response {
    let mut db = state.db.lock().expect("fake db lock");
    let Some(student) = db.students.iter_mut().find(|s| s.id == id) else {
        return not_found();
    };

    let StudentUpdate {
        nombre,
        apellido,
        email,
        telefono,
        fecha_nacimiento,
        curso,
        nivel,
    } = patch;
    if let Some(v) = nombre {
        student.nombre = v;
    }
    if let Some(v) = apellido {
        student.apellido = v;
    }
    if let Some(v) = email {
        student.email = v;
    }
    if telefono.is_some() {
        student.telefono = telefono;
    }
    if fecha_nacimiento.is_some() {
        student.fecha_nacimiento = fecha_nacimiento;
    }
    if curso.is_some() {
        student.curso = curso;
    }
    if nivel.is_some() {
        student.nivel = nivel;
    }

    Json(student.clone()).into_response()
}

async fn delete(State(state): State<FakeState>, Path(id): Path<i32>) -> Response {
    let mut db = state.db.lock().expect("fake db lock");
    let before = db.students.len();
    db.students.retain(|s| s.id != id);
    if db.students.len() == before {
        return not_found();
    }
    Json(ApiMessage {
        message: "Alumno eliminado exitosamente".into(),
    })
    .into_response()
}

fn set_active(state: &FakeState, id: i32, activo: bool, message: &str) -> Response {
    let mut db = state.db.lock().expect("fake db lock");
    let Some(student) = db.students.iter_mut().find(|s| s.id == id) else {
        return not_found();
    };
    student.activo = activo;
    Json(ApiMessage {
        message: message.into(),
    })
    .into_response()
}

async fn deactivate(State(state): State<FakeState>, Path(id): Path<i32>) -> Response {
    set_active(&state, id, false, "Alumno desactivado exitosamente")
}

async fn activate(State(state): State<FakeState>, Path(id): Path<i32>) -> Response {
    set_active(&state, id, true, "Alumno activado exitosamente")
}

async fn statistics(State(state): State<FakeState>) -> Response {
    if state.fail_statistics.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Error al obtener estadísticas"})),
        )
            .into_response();
    }

    let db = state.db.lock().expect("fake db lock");
    let total = u32::try_from(db.students.len()).expect("few students");
    let active = db.students.iter().filter(|s| s.activo).count();
    let active = u32::try_from(active).expect("few students");

    let mut por_curso: Vec<CourseCount> = Vec::new();
    let mut por_nivel: Vec<LevelCount> = Vec::new();
    for student in &db.students {
        let curso = student.curso.clone().unwrap_or_default();
        match por_curso.iter_mut().find(|c| c.curso == curso) {
            Some(c) => c.cantidad += 1,
            None => por_curso.push(CourseCount { curso, cantidad: 1 }),
        }
        let nivel = student.nivel.clone().unwrap_or_default();
        match por_nivel.iter_mut().find(|l| l.nivel == nivel) {
            Some(l) => l.cantidad += 1,
            None => por_nivel.push(LevelCount { nivel, cantidad: 1 }),
        }
    }

    Json(Statistics {
        total_alumnos: total,
        alumnos_activos: active,
        alumnos_inactivos: total - active,
        por_curso,
        por_nivel,
    })
    .into_response()
}
