use crate::{
    api::AlumnosApi,
    config::RuntimeConfiguration,
    dashboard::SharedDashboard,
    error::AlumnosResult,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::{
    collections::{HashMap, VecDeque},
    convert::Infallible,
    sync::Arc,
};
use tokio::sync::Mutex;

//4xx/5xx bodies are toasts, so htmx has to swap them too
const HTMX_CONFIG: &str = r#"{"responseHandling":[{"code":"204","swap":false},{"code":"[23]..","swap":true},{"code":"[45]..","swap":true,"error":true}]}"#;

const BUSY_STYLE: &str = ".when-busy{display:none}.htmx-request .when-busy,.htmx-request.when-busy{display:inline}.htmx-request .when-idle{display:none}";

///sent by every htmx request from a page, naming the dashboard that page owns
pub const DASHBOARD_HEADER: &str = "X-Dashboard";

///oldest tabs are forgotten past this; they get a fresh dashboard on their next request
pub const MAX_DASHBOARDS: usize = 256;

#[derive(Debug)]
struct Dashboards {
    next_id: u64,
    by_id: HashMap<u64, SharedDashboard>,
    order: VecDeque<u64>,
}

impl Dashboards {
    fn new() -> Self {
        //start from the clock so ids handed out before a restart don't collide with new ones
        let next_id = u64::try_from(jiff::Timestamp::now().as_millisecond()).unwrap_or_default();

        Self {
            next_id,
            by_id: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    fn insert(&mut self, id: u64, dashboard: SharedDashboard) {
        if self.by_id.insert(id, dashboard).is_some() {
            return;
        }

        self.order.push_back(id);
        while self.order.len() > MAX_DASHBOARDS {
            if let Some(evicted) = self.order.pop_front() {
                debug!(evicted, "Forgetting dashboard");
                self.by_id.remove(&evicted);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct AlumnosState {
    config: RuntimeConfiguration,
    api: AlumnosApi,
    dashboards: Arc<Mutex<Dashboards>>,
}

impl AlumnosState {
    pub fn new(config: RuntimeConfiguration) -> AlumnosResult<Self> {
        let api = AlumnosApi::new(config.api_config())?;

        Ok(Self {
            config,
            api,
            dashboards: Arc::new(Mutex::new(Dashboards::new())),
        })
    }

    pub const fn api(&self) -> &AlumnosApi {
        &self.api
    }

    ///a dashboard for a freshly loaded page
    pub async fn new_dashboard(&self) -> (u64, SharedDashboard) {
        let mut dashboards = self.dashboards.lock().await;
        let id = dashboards.next_id;
        dashboards.next_id = dashboards.next_id.wrapping_add(1);

        let dashboard = SharedDashboard::default();
        dashboards.insert(id, dashboard.clone());
        (id, dashboard)
    }

    ///the dashboard a page was given, or a new empty one under the same id if it has been forgotten
    pub async fn dashboard(&self, id: u64) -> SharedDashboard {
        let mut dashboards = self.dashboards.lock().await;
        if let Some(dashboard) = dashboards.by_id.get(&id) {
            return dashboard.clone();
        }

        debug!(id, "Unknown dashboard, starting a new one");
        let dashboard = SharedDashboard::default();
        dashboards.insert(id, dashboard.clone());
        dashboard
    }

    pub fn render(&self, dashboard_id: u64, markup: Markup) -> Markup {
        let api_config = self.config.api_config();
        let app_name = api_config.app_name();
        let hx_headers = format!(r#"{{"{DASHBOARD_HEADER}": "{dashboard_id}"}}"#);

        html! {
            (DOCTYPE)
            html lang="es" {
                head {
                    meta charset="UTF-8" {}
                    meta name="viewport" content="width=device-width, initial-scale=1.0" {}
                    meta name="htmx-config" content=(HTMX_CONFIG) {}
                    script src="https://unpkg.com/htmx.org@2.0.4" integrity="sha384-HGfztofotfshcF7+8n44JQL2oJmowVChPTg48S+jvZoztPfvwD79OC/LTtG6dMp+" crossorigin="anonymous" {}
                    script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4" {}
                    style { (PreEscaped(BUSY_STYLE)) }
                    title { (app_name) }
                }
                body class="bg-gray-900 min-h-screen flex flex-col items-center text-white p-8" hx-headers=(hx_headers) {
                    header class="w-full max-w-6xl flex flex-row items-center justify-between mb-6" {
                        a href="/" class="text-3xl font-bold" {(app_name)}
                        button class="bg-gray-700 hover:bg-gray-600 text-gray-300 font-bold py-2 px-4 rounded" hx-get="/internal/diagnostics" hx-target="#modal" {
                            "Estado del servidor"
                        }
                    }
                    (markup)
                    div id="modal" {}
                    div id="toasts" class="fixed bottom-4 right-4 z-50 flex flex-col items-end" {}
                }
            }
        }
    }
}

///the calling tab's dashboard, found through [`DASHBOARD_HEADER`]
///
///requests without the header get a throwaway dashboard of their own
#[derive(Debug, Clone)]
pub struct ClientDashboard(pub SharedDashboard);

impl FromRequestParts<AlumnosState> for ClientDashboard {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AlumnosState,
    ) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(DASHBOARD_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());

        Ok(Self(match id {
            Some(id) => state.dashboard(id).await,
            None => {
                debug!("Request without a dashboard id");
                SharedDashboard::default()
            }
        }))
    }
}
