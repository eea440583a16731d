use crate::{
    data::student::{COURSES, LEVELS},
    maud_conveniences::select_element,
    routes::dashboard::STUDENTS_CHANGED,
    state::AlumnosState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn get_index_route(State(state): State<AlumnosState>) -> Markup {
    // every page load is a new tab with nothing loaded yet
    let (dashboard_id, _) = state.new_dashboard().await;
    debug!(dashboard_id, "New page");

    let dashboard_trigger = format!("load, {STUDENTS_CHANGED} from:body");

    state.render(dashboard_id, html! {
        div class="w-full max-w-6xl flex flex-col space-y-4" {
            form id="filters" hx-get="/internal/dashboard" hx-target="#dashboard" hx-trigger="change, input changed delay:300ms from:#q" class="bg-gray-800 p-4 rounded shadow-md grid grid-cols-1 md:grid-cols-5 gap-4 items-end" {
                (select_element("activo", "Estado", "Todos", [("true", "Activos"), ("false", "Inactivos")], ""))
                (select_element("curso", "Curso", "Todos", COURSES.iter().map(|c| (*c, *c)), ""))
                (select_element("nivel", "Nivel", "Todos", LEVELS.iter().map(|l| (*l, *l)), ""))
                div class="mb-4" {
                    label for="q" class="block text-sm font-bold mb-2 text-gray-300" {"Buscar"}
                    input type="search" id="q" name="q" placeholder="Nombre, email o curso" class="shadow appearance-none border rounded w-full py-2 px-3 leading-tight focus:outline-none focus:shadow-outline bg-gray-700 border-gray-600" {}
                }
                div class="mb-4" {
                    button type="button" class="w-full bg-blue-600 hover:bg-blue-800 font-bold py-2 px-4 rounded" hx-get="/internal/students/new" hx-target="#modal" {
                        "Nuevo alumno"
                    }
                }
            }
            div id="dashboard" hx-get="/internal/dashboard" hx-trigger=(dashboard_trigger) hx-include="#filters" {
                p class="text-gray-400 italic" {"Cargando..."}
            }
        }
    })
}
