use crate::{
    api::AlumnosApi,
    dashboard::{SharedDashboard, StudentEvent},
    data::{Statistics, StudentFilters},
    maud_conveniences::{Toast, close_modal, subtitle},
    routes::student_list::render_student_list,
    state::{AlumnosState, ClientDashboard},
};
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

pub const STUDENTS_CHANGED: &str = "students-changed";
pub const RELOAD_FAILED: &str = "Error al cargar los datos. Por favor, intenta más tarde.";

///filter bar values, straight from the form - empty means "any"
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DashboardQuery {
    pub activo: String,
    pub curso: String,
    pub nivel: String,
    pub q: String,
}

impl DashboardQuery {
    pub fn filters(&self) -> StudentFilters {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());

        StudentFilters {
            activo: match self.activo.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            curso: non_empty(&self.curso),
            nivel: non_empty(&self.nivel),
        }
    }
}

pub async fn internal_get_dashboard(
    State(state): State<AlumnosState>,
    ClientDashboard(dashboard): ClientDashboard,
    Query(query): Query<DashboardQuery>,
) -> Markup {
    let toast = match dashboard.refresh(query.filters(), state.api()).await {
        Ok(()) => None,
        Err(e) => {
            warn!(?e, "Unable to reload dashboard");
            Some(Toast::error(RELOAD_FAILED))
        }
    };

    let dashboard = dashboard.lock().await;
    html! {
        (render_statistics(dashboard.statistics()))
        (render_student_list(&dashboard.search(&query.q)))
        @if let Some(toast) = toast {
            (toast.out_of_band())
        }
    }
}

pub fn render_statistics(statistics: Option<&Statistics>) -> Markup {
    let Some(statistics) = statistics else {
        return html! {
            div class="w-full bg-gray-800 rounded p-4 mb-6 text-gray-400 italic" {"Sin estadísticas"}
        };
    };

    let card = |label: &str, value: u32, colour: &str| {
        html! {
            div class="bg-gray-800 rounded shadow-md p-4 text-center" {
                p class="text-sm text-gray-400" {(label)}
                p class={"text-3xl font-bold " (colour)} {(value)}
            }
        }
    };

    html! {
        div class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-4" {
            (card("Total de alumnos", statistics.total_alumnos, "text-white"))
            (card("Activos", statistics.alumnos_activos, "text-green-400"))
            (card("Inactivos", statistics.alumnos_inactivos, "text-red-400"))
        }
        div class="w-full grid grid-cols-1 md:grid-cols-2 gap-4 mb-6" {
            div class="bg-gray-800 rounded shadow-md p-4" {
                (subtitle("Por curso"))
                ul {
                    @for entry in &statistics.por_curso {
                        li class="flex justify-between text-gray-200" {
                            span {(entry.curso)}
                            span class="font-semibold" {(entry.cantidad)}
                        }
                    }
                }
            }
            div class="bg-gray-800 rounded shadow-md p-4" {
                (subtitle("Por nivel"))
                ul {
                    @for entry in &statistics.por_nivel {
                        li class="flex justify-between text-gray-200" {
                            span {(entry.nivel)}
                            span class="font-semibold" {(entry.cantidad)}
                        }
                    }
                }
            }
        }
    }
}

///applies a child's mutation, reloads, and tells the page to re-render the dashboard
pub async fn reconcile_mutation(
    dashboard: &SharedDashboard,
    event: StudentEvent,
    api: &AlumnosApi,
    success: Toast,
) -> Response {
    let reload_failed = match dashboard.reconcile(event, api).await {
        Ok(()) => None,
        Err(e) => {
            warn!(?e, "Unable to reload after mutation");
            Some(Toast::error(RELOAD_FAILED))
        }
    };

    (
        [("HX-Trigger", STUDENTS_CHANGED)],
        html! {
            (success)
            @if let Some(toast) = reload_failed {
                (toast)
            }
            (close_modal())
        },
    )
        .into_response()
}

///failure path of a mutation: tell the user, change nothing
pub fn toast_only(toast: &Toast) -> Response {
    html! { (toast) }.into_response()
}
