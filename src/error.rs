//! Типы ошибок генератора

/// Ошибки загрузки и проверки конфигурации
///
/// Возникают до создания первого тайла: некорректный конфиг не доходит до генерации.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("map radius must be positive, got {0}")]
    InvalidRadius(i32),

    #[error("seed must lie in [0, 1), got {0}")]
    InvalidSeed(f64),

    #[error("height decay factor must be positive, got {0}")]
    InvalidDecay(f32),

    #[error("`{0}` must be a finite number")]
    NotFinite(&'static str),

    #[error("blob biome policy needs a non-empty palette")]
    EmptyBlobPalette,

    #[error("seed search needs at least one attempt")]
    InvalidSeedSearch,

    #[error("town placement needs at least one retry per radius shrink")]
    InvalidTownRetries,
}

/// Ошибки генерации карты
#[derive(Debug, thiserror::Error)]
pub enum MapGenError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Строгий поиск сида не нашёл подходящего кандидата
    #[error("no seed satisfied the origin predicate after {attempts} attempts")]
    SeedSearchExhausted { attempts: usize },
}

/// Ошибки экспорта карты (PNG-превью, JSON)
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preview image would be empty")]
    EmptyImage,

    #[error("hex cell size {0} is too small for the preview (minimum {min})", min = crate::preview::MIN_CELL_SIZE)]
    CellTooSmall(f32),
}
