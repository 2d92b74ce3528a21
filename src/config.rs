use serde::Deserialize;
use std::sync::OnceLock;
use url::Url;

fn def_http_port() -> u16 {
    3000
}

fn def_is_development() -> bool {
    false
}

fn def_frontend_url() -> Url {
    Url::parse("http://localhost:5173").expect("[CFG] invalid value for env var FRONTEND_URL")
}

fn def_speed_limit_kmh() -> f64 {
    40.0
}

fn def_dispatch_speed_kmh() -> f64 {
    20.0
}

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    /// if the application is running in `development` mode, enables demo
    /// fleet seeding on startup
    #[serde(default = "def_is_development")]
    pub is_development: bool,

    /// http port the api will listen for requests on
    #[serde(default = "def_http_port")]
    pub http_port: u16,

    /// frontend url allowed by CORS, eg: https://fleet.campus.example for
    /// deployed environments
    #[serde(default = "def_frontend_url")]
    pub frontend_url: Url,

    /// campus wide speed limit in km/h, pings and scans above it raise
    /// offences (buses and student vehicles, ambulances are exempt)
    #[serde(default = "def_speed_limit_kmh")]
    pub speed_limit_kmh: f64,

    /// assumed average ambulance speed in km/h used for pickup ETAs
    #[serde(default = "def_dispatch_speed_kmh")]
    pub dispatch_speed_kmh: f64,
}

impl AppConfig {
    /// loads the config from the environment variables
    ///
    /// # PANICS
    /// panics if the environment variables could not be loaded, such as when a string value
    /// cannot be parsed to the desired data type, eg:
    ///
    /// ENV_VAR_THAT_SHOULD_BE_BOOL=not_a_bool
    pub fn from_env() -> AppConfig {
        match envy::from_env::<AppConfig>() {
            Ok(config) => config,
            Err(error) => {
                panic!("[CFG] failed to load application config, {:#?}", error)
            }
        }
    }
}

/// returns a global read only reference to the app configuration
pub fn app_config() -> &'static AppConfig {
    static INSTANCE: OnceLock<AppConfig> = OnceLock::new();
    INSTANCE.get_or_init(AppConfig::from_env)
}
