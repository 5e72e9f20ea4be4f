use clap::Parser;

#[derive(Parser, Clone)]
pub struct Config {
    #[clap(env, long)]
    pub environment: String,

    /// Comma-separated list of allowed CORS origins.
    #[clap(env, long)]
    pub origin_urls: String,

    #[clap(env, long)]
    pub database_url: String,

    /// Base URL of the spaces service. When unset the canned fixture
    /// catalog is served instead.
    #[clap(env, long)]
    pub places_base_url: Option<String>,

    /// Base URL of the geocoding service. When unset the fixture
    /// completer is used.
    #[clap(env, long)]
    pub geocoder_base_url: Option<String>,

    /// Base URL of the directions service. When unset routes degrade to
    /// a straight origin-destination line.
    #[clap(env, long)]
    pub directions_base_url: Option<String>,

    #[clap(env, long, default_value_t = 10)]
    pub catalog_load_timeout_secs: u64,

    /// Artificial delay for the fixture catalog, imitating a slow fetch.
    #[clap(env, long, default_value_t = 2)]
    pub fixture_load_delay_secs: u64,
}
