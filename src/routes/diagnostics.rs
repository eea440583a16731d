use crate::{
    maud_conveniences::{modal, subtitle, title},
    state::AlumnosState,
};
use axum::extract::State;
use maud::{Markup, html};

pub async fn internal_get_diagnostics(State(state): State<AlumnosState>) -> Markup {
    let api = state.api();
    let config = api.config();
    let (connection, health) = tokio::join!(api.test_connection(), api.health_check());

    modal(html! {
        (title("Estado del servidor"))
        div class="space-y-4" {
            div {
                (subtitle("Configuración"))
                p class="text-gray-300" {"API: " span class="font-mono" {(config.base_url())}}
                p class="text-gray-300" {"Entorno: " (config.environment().to_string())}
            }
            div {
                (subtitle("Conexión"))
                @match &connection {
                    Ok(info) => {
                        p class="text-green-400" {(info.message)}
                        @if let Some(version) = &info.version {
                            p class="text-gray-400 text-sm" {"Versión: " (version)}
                        }
                    },
                    Err(e) => p class="text-red-400" {(e.to_string())},
                }
            }
            div {
                (subtitle("Salud"))
                @match &health {
                    Ok(status) => {
                        p class="text-green-400" {(status.status)}
                        @if let Some(timestamp) = &status.timestamp {
                            p class="text-gray-400 text-sm" {(timestamp)}
                        }
                    },
                    Err(e) => p class="text-red-400" {(e.to_string())},
                }
            }
        }
    })
}
