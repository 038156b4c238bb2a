#[derive(Debug, Clone)]
pub struct RatingSettings {
    pub provisional_k: f64,
    /// K stays at `provisional_k` while a player has played at most this many games
    pub provisional_games: i32,
    pub standard_k: f64,
    pub master_k: f64,
    pub master_threshold: f64,
    pub elo_scale: f64,
}

impl Default for RatingSettings {
    fn default() -> Self {
        Self {
            provisional_k: 40.0,
            provisional_games: 30,
            standard_k: 20.0,
            master_k: 10.0,
            master_threshold: 2400.0,
            elo_scale: 400.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PairingSettings {
    /// Upper bound on candidate checks during the Swiss backtracking search
    pub max_search_steps: u64,
}

impl Default for PairingSettings {
    fn default() -> Self {
        Self {
            max_search_steps: 1_000_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "tournament_engine.db".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rating: RatingSettings,
    pub pairing: PairingSettings,
    pub database: DatabaseSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            rating: RatingSettings::default(),
            pairing: PairingSettings::default(),
            database: DatabaseSettings::default(),
        }
    }

    pub fn with_database_path(mut self, path: Option<String>) -> Self {
        if let Some(path) = path {
            self.database.path = path;
        }
        self
    }
}
