use crate::{
    api::AlumnosApi,
    dashboard::{SharedDashboard, StudentEvent},
    data::Student,
    error::{AlumnosResult, MissingStudentSnafu},
    maud_conveniences::{Toast, close_modal, modal, title},
    routes::dashboard::{reconcile_mutation, toast_only},
    state::{AlumnosState, ClientDashboard},
};
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

pub const TOGGLE_FAILED: &str = "Error al cambiar el estado del alumno";

///the dashboard's copy if it has one, otherwise the backend's
pub async fn find_student(
    dashboard: &SharedDashboard,
    api: &AlumnosApi,
    id: i32,
) -> AlumnosResult<Student> {
    let local = dashboard.lock().await.student(id).cloned();
    if let Some(student) = local {
        return Ok(student);
    }

    match api.get(id).await {
        Err(e) if e.is_not_found() => MissingStudentSnafu { id }.fail(),
        other => other,
    }
}

pub fn render_student_list(students: &[&Student]) -> Markup {
    if students.is_empty() {
        return html! {
            div class="w-full bg-gray-800 rounded shadow-md p-8 text-center text-gray-400" {
                p class="text-lg" {"No hay alumnos para mostrar"}
                p class="text-sm" {"Prueba con otros filtros o registra un nuevo alumno."}
            }
        };
    }

    html! {
        div class="w-full grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4" {
            @for student in students {
                (render_student_card(student))
            }
        }
    }
}

fn render_student_card(student: &Student) -> Markup {
    let id = student.id;

    html! {
        div id={"student-" (id)} class="rounded-lg shadow-md p-4 bg-gray-800 flex flex-col space-y-2" {
            div class="flex flex-row items-center justify-between" {
                h3 class="text-lg font-semibold" {(student.full_name())}
                @if student.activo {
                    span class="text-xs font-bold px-2 py-1 rounded bg-green-700" {"Activo"}
                } @else {
                    span class="text-xs font-bold px-2 py-1 rounded bg-red-700" {"Inactivo"}
                }
            }
            p class="text-gray-300" {(student.email)}
            @if let Some(telefono) = &student.telefono {
                p class="text-gray-400 text-sm" {"Tel: " (telefono)}
            }
            @if let Some(fecha_nacimiento) = student.fecha_nacimiento {
                p class="text-gray-400 text-sm" {"Nacimiento: " (fecha_nacimiento.strftime("%d/%m/%Y").to_string())}
            }
            div class="flex flex-row space-x-2" {
                @if let Some(curso) = &student.curso {
                    span class="text-xs px-2 py-1 rounded bg-blue-800" {(curso)}
                }
                @if let Some(nivel) = &student.nivel {
                    span class="text-xs px-2 py-1 rounded bg-purple-800" {(nivel)}
                }
            }
            p class="text-gray-500 text-xs" {"Registrado: " (student.fecha_registro.strftime("%d/%m/%Y %H:%M").to_string())}
            div class="flex flex-row space-x-2 pt-2" {
                button class="bg-slate-600 hover:bg-slate-800 font-bold py-1 px-3 rounded" hx-get={"/internal/students/" (id) "/edit"} hx-target="#modal" {
                    "Editar"
                }
                button class="bg-yellow-700 hover:bg-yellow-900 font-bold py-1 px-3 rounded" hx-post={"/internal/students/" (id) "/toggle"} hx-target="#toasts" hx-swap="beforeend" hx-disabled-elt="this" {
                    @if student.activo { "Desactivar" } @else { "Activar" }
                }
                button class="bg-red-600 hover:bg-red-800 font-bold py-1 px-3 rounded" hx-get={"/internal/students/" (id) "/confirm_delete"} hx-target="#modal" {
                    "Eliminar"
                }
            }
        }
    }
}

pub async fn internal_post_toggle_student(
    State(state): State<AlumnosState>,
    ClientDashboard(dashboard): ClientDashboard,
    Path(id): Path<i32>,
) -> AlumnosResult<Response> {
    let api = state.api();
    let current = find_student(&dashboard, api, id).await?;

    let result = if current.activo {
        api.deactivate(id).await
    } else {
        api.activate(id).await
    };

    Ok(match result {
        Ok(confirmation) => {
            info!(id, activo = !current.activo, "Toggled student");
            reconcile_mutation(
                &dashboard,
                StudentEvent::Updated(current.toggled()),
                api,
                Toast::success(confirmation.message),
            )
            .await
        }
        Err(e) => {
            warn!(?e, id, "Unable to toggle student");
            toast_only(&Toast::error(TOGGLE_FAILED))
        }
    })
}

pub async fn internal_get_confirm_delete(
    State(state): State<AlumnosState>,
    ClientDashboard(dashboard): ClientDashboard,
    Path(id): Path<i32>,
) -> AlumnosResult<Markup> {
    let student = find_student(&dashboard, state.api(), id).await?;

    Ok(modal(html! {
        (title("¿Eliminar alumno?"))
        p class="text-gray-300 mb-6" {
            "Se eliminará a "
            span class="font-semibold" {(student.full_name())}
            " de forma permanente. Esta acción no se puede deshacer."
        }
        div class="flex flex-row justify-end space-x-4" {
            button type="button" class="bg-gray-600 hover:bg-gray-700 font-bold py-2 px-4 rounded" "hx-on:click"="document.getElementById('modal').innerHTML = ''" {
                "Cancelar"
            }
            button class="bg-red-600 hover:bg-red-800 font-bold py-2 px-4 rounded" hx-delete={"/internal/students/" (id)} hx-target="#toasts" hx-swap="beforeend" hx-disabled-elt="this" {
                span class="when-idle" {"Eliminar"}
                span class="when-busy" {"Eliminando..."}
            }
        }
    }))
}

pub async fn internal_delete_student(
    State(state): State<AlumnosState>,
    ClientDashboard(dashboard): ClientDashboard,
    Path(id): Path<i32>,
) -> Response {
    let api = state.api();

    match api.delete(id).await {
        Ok(confirmation) => {
            info!(id, "Deleted student");
            reconcile_mutation(
                &dashboard,
                StudentEvent::Deleted(id),
                api,
                Toast::success(confirmation.message),
            )
            .await
        }
        Err(e) => {
            warn!(?e, id, "Unable to delete student");
            html! {
                (Toast::error(format!("Error al eliminar el alumno: {e}")))
                (close_modal())
            }
            .into_response()
        }
    }
}
