use crate::error::{AlumnosResult, BadEnvVarSnafu, InvalidBaseUrlSnafu};
use dotenvy::var;
use snafu::ResultExt;
use std::{env::VarError, fmt::Display, sync::Arc};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_ENVIRONMENT: &str = "development";
pub const DEFAULT_APP_NAME: &str = "Gestión Alumnos";
pub const DEFAULT_SERVER_IP: &str = "127.0.0.1:3000";

pub const UNREACHABLE_MESSAGE: &str =
    "No se puede conectar al servidor. Por favor, intenta más tarde.";

#[derive(Clone, Debug)]
pub struct RuntimeConfiguration {
    api_config: Arc<ApiConfig>,
    server_ip: Arc<str>,
}

impl RuntimeConfiguration {
    pub fn new() -> AlumnosResult<Self> {
        Ok(Self {
            server_ip: env_or_default("SERVER_IP", DEFAULT_SERVER_IP)?.into(),
            ..Self::from_api_config(ApiConfig::new()?)
        })
    }

    pub fn from_api_config(api_config: ApiConfig) -> Self {
        Self {
            api_config: Arc::new(api_config),
            server_ip: DEFAULT_SERVER_IP.into(),
        }
    }

    pub fn api_config(&self) -> Arc<ApiConfig> {
        self.api_config.clone()
    }

    pub fn server_ip(&self) -> &str {
        &self.server_ip
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Other(String),
}

impl From<String> for Environment {
    fn from(value: String) -> Self {
        if value == DEFAULT_ENVIRONMENT {
            Self::Development
        } else {
            Self::Other(value)
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "{DEFAULT_ENVIRONMENT}"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug)]
pub struct ApiConfig {
    base_url: String,
    environment: Environment,
    app_name: String,
}

impl ApiConfig {
    pub fn new() -> AlumnosResult<Self> {
        Self::from_parts(
            env_or_default("API_URL", DEFAULT_API_URL)?,
            env_or_default("ENVIRONMENT", DEFAULT_ENVIRONMENT)?.into(),
            env_or_default("APP_NAME", DEFAULT_APP_NAME)?,
        )
    }

    pub fn from_parts(
        base_url: impl Into<String>,
        environment: Environment,
        app_name: impl Into<String>,
    ) -> AlumnosResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        snafu::ensure!(
            reqwest::Url::parse(&base_url).is_ok(),
            InvalidBaseUrlSnafu { url: base_url }
        );

        Ok(Self {
            base_url,
            environment,
            app_name: app_name.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub const fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    ///what the user sees when the backend can't be reached at all
    pub fn unreachable_message(&self, url: &str) -> String {
        if self.is_development() {
            format!(
                "No se puede conectar al servidor en {url}. Verifica que el backend esté ejecutándose en {}. \
                 Posibles causas: el servidor no está iniciado, la URL configurada en API_URL es incorrecta \
                 o el puerto está ocupado. Para iniciarlo: `uvicorn main:app --reload --host 0.0.0.0 --port 8000`",
                self.base_url
            )
        } else {
            UNREACHABLE_MESSAGE.to_string()
        }
    }

    pub fn default_log_directives(&self) -> &'static str {
        if self.is_development() {
            "alumnos=debug,tower_http=debug,info"
        } else {
            "info"
        }
    }
}

fn env_or_default(name: &'static str, default: &str) -> AlumnosResult<String> {
    match var(name) {
        Ok(value) => Ok(value),
        Err(dotenvy::Error::EnvVar(VarError::NotPresent)) => Ok(default.to_string()),
        Err(source) => Err(source).context(BadEnvVarSnafu { name }),
    }
}
