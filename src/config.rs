// src/config.rs
//! Конфигурация генерации карты
//!
//! Этот модуль определяет все параметры, управляющие процедурной генерацией гексагональной карты:
//! - Размер карты, уровень воды, число городов
//! - Параметры поля высот (масштаб шума, затухание к краю)
//! - Пороги биомов и политика «пятен» биомов
//! - Параметры расстановки городов и поиска сида
//!
//! Все структуры поддерживают сериализацию в TOML/JSON для удобной настройки через конфигурационные файлы.

use crate::biome::Biome;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Основные параметры генерации карты
///
/// Полная конфигурация для генерации одной карты. Поддерживает загрузку из TOML-файлов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapConfig {
    /// Радиус гексагонального диска в тайлах (строго больше нуля)
    pub radius: i32,

    /// Вертикальный масштаб высот для рендера (на генерацию не влияет)
    #[serde(default = "default_depth_scale")]
    pub depth_scale: f32,

    /// Сколько городов нужно расставить
    #[serde(default)]
    pub total_towns: usize,

    /// Тайлы с высотой `<= water_level` считаются водой
    #[serde(default = "default_water_level")]
    pub water_level: f32,

    /// Сид из `[0, 1)`. Если не задан — подбирается перебором (см. [`SeedSearchSettings`])
    #[serde(default)]
    pub seed: Option<f64>,

    /// `false` — все клочки суши, не связанные с центром карты, затапливаются
    #[serde(default = "default_archipelago")]
    pub archipelago: bool,

    #[serde(default)]
    pub height: HeightSettings,

    #[serde(default)]
    pub biomes: BiomeSettings,

    #[serde(default)]
    pub towns: TownSettings,

    #[serde(default)]
    pub seed_search: SeedSearchSettings,

    /// Отладочные флаги для рендера
    #[serde(default)]
    pub debug: DebugFlags,
}

fn default_depth_scale() -> f32 {
    5.0
}
fn default_water_level() -> f32 {
    -0.4
}
fn default_archipelago() -> bool {
    true
}

impl MapConfig {
    /// Конфигурация по умолчанию для заданного радиуса
    #[must_use]
    pub fn with_radius(radius: i32) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    /// Загружает параметры из TOML-файла
    ///
    /// # Пример
    /// ```toml
    /// # map.toml
    /// radius = 40
    /// total_towns = 12
    /// archipelago = false
    ///
    /// [biomes]
    /// policy = "Blobs"
    /// ```
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(ConfigError::Parse)
    }

    /// Проверяет структурную корректность конфигурации
    ///
    /// Вызывается генератором до построения сетки.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.radius <= 0 {
            return Err(ConfigError::InvalidRadius(self.radius));
        }
        if !self.water_level.is_finite() {
            return Err(ConfigError::NotFinite("water_level"));
        }
        if !self.depth_scale.is_finite() {
            return Err(ConfigError::NotFinite("depth_scale"));
        }
        if let Some(seed) = self.seed {
            if !(0.0..1.0).contains(&seed) {
                return Err(ConfigError::InvalidSeed(seed));
            }
        }
        self.height.validate()?;
        self.biomes.validate()?;
        if self.towns.retries_per_shrink == 0 {
            return Err(ConfigError::InvalidTownRetries);
        }
        if self.seed_search.max_attempts == 0 {
            return Err(ConfigError::InvalidSeedSearch);
        }
        Ok(())
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            radius: 25,
            depth_scale: 5.0,
            total_towns: 0,
            water_level: -0.4,
            seed: None,
            archipelago: true,
            height: HeightSettings::default(),
            biomes: BiomeSettings::default(),
            towns: TownSettings::default(),
            seed_search: SeedSearchSettings::default(),
            debug: DebugFlags::default(),
        }
    }
}

/// Параметры поля высот
///
/// `scale = radius / scale_radius_step * scale_per_step + scale_base` —
/// размер деталей рельефа растёт вместе с картой.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeightSettings {
    #[serde(default = "default_scale_base")]
    pub scale_base: f32,

    #[serde(default = "default_scale_per_step")]
    pub scale_per_step: f32,

    #[serde(default = "default_scale_radius_step")]
    pub scale_radius_step: f32,

    /// Коэффициент затухания к краю: высота уменьшается на `distance / (radius * decay)`
    #[serde(default = "default_decay")]
    pub decay: f32,

    /// Нижняя граница высоты. `None` — без ограничения
    #[serde(default)]
    pub floor: Option<f32>,
}

fn default_scale_base() -> f32 {
    6.0
}
fn default_scale_per_step() -> f32 {
    1.5
}
fn default_scale_radius_step() -> f32 {
    25.0
}
fn default_decay() -> f32 {
    0.95
}

impl HeightSettings {
    /// Масштаб шума для карты заданного радиуса
    #[must_use]
    pub fn noise_scale(&self, radius: i32) -> f32 {
        (radius as f32 / self.scale_radius_step) * self.scale_per_step + self.scale_base
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.decay.is_nan() || self.decay <= 0.0 {
            return Err(ConfigError::InvalidDecay(self.decay));
        }
        if !(self.scale_radius_step.is_finite() && self.scale_radius_step != 0.0) {
            return Err(ConfigError::NotFinite("height.scale_radius_step"));
        }
        if !(self.scale_base.is_finite() && self.scale_per_step.is_finite()) {
            return Err(ConfigError::NotFinite("height.scale_base"));
        }
        if self.floor.is_some_and(|f| !f.is_finite()) {
            return Err(ConfigError::NotFinite("height.floor"));
        }
        Ok(())
    }
}

impl Default for HeightSettings {
    fn default() -> Self {
        Self {
            scale_base: 6.0,
            scale_per_step: 1.5,
            scale_radius_step: 25.0,
            decay: 0.95,
            floor: None,
        }
    }
}

/// Способ назначения биомов суше
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BiomePolicy {
    /// Пояса высот: горы, снежные вершины, равнины
    #[default]
    Elevation,
    /// Пояса высот плюс «пятна» особых биомов, выращенные заливкой
    Blobs,
}

/// Пороги и палитра биомов
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BiomeSettings {
    #[serde(default)]
    pub policy: BiomePolicy,

    /// Выше этой высоты — `MountainSnow`
    #[serde(default = "default_snow_threshold")]
    pub snow_threshold: f32,

    /// Выше этой высоты (но не выше снежной) — `Mountain`
    #[serde(default = "default_mountain_threshold")]
    pub mountain_threshold: f32,

    /// Тайл становится затравкой пятна, если его оценка (`0.0..=1.0`, `0.0` на пиках
    /// вторичного шума) ниже порога. Малый порог — редкие пятна.
    #[serde(default = "default_blob_threshold")]
    pub blob_threshold: f32,

    /// Частота вторичного шума пятен (низкая — крупные пятна)
    #[serde(default = "default_blob_frequency")]
    pub blob_frequency: f32,

    /// Биомы, из которых выбирается метка очередного пятна
    #[serde(default = "default_blob_palette")]
    pub blob_palette: Vec<Biome>,
}

fn default_snow_threshold() -> f32 {
    0.2
}
fn default_mountain_threshold() -> f32 {
    0.0
}
fn default_blob_threshold() -> f32 {
    0.05
}
fn default_blob_frequency() -> f32 {
    0.08
}
fn default_blob_palette() -> Vec<Biome> {
    vec![Biome::Forest, Biome::Desert, Biome::Swamp]
}

impl BiomeSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("biomes.snow_threshold", self.snow_threshold),
            ("biomes.mountain_threshold", self.mountain_threshold),
            ("biomes.blob_threshold", self.blob_threshold),
            ("biomes.blob_frequency", self.blob_frequency),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite(name));
            }
        }
        if self.policy == BiomePolicy::Blobs && self.blob_palette.is_empty() {
            return Err(ConfigError::EmptyBlobPalette);
        }
        Ok(())
    }
}

impl Default for BiomeSettings {
    fn default() -> Self {
        Self {
            policy: BiomePolicy::Elevation,
            snow_threshold: 0.2,
            mountain_threshold: 0.0,
            blob_threshold: 0.05,
            blob_frequency: 0.08,
            blob_palette: default_blob_palette(),
        }
    }
}

/// Параметры расстановки городов
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TownSettings {
    /// Начальный радиус исключения не больше этого значения (и не больше радиуса карты)
    #[serde(default = "default_exclusion_radius_cap")]
    pub exclusion_radius_cap: i32,

    /// Сколько безрезультатных раундов подряд до уменьшения радиуса на 1
    #[serde(default = "default_retries_per_shrink")]
    pub retries_per_shrink: u32,

    /// Жёсткий предел числа раундов
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,

    /// Биомы, на которых может стоять город
    #[serde(default = "default_eligible_biomes")]
    pub eligible_biomes: Vec<Biome>,
}

fn default_exclusion_radius_cap() -> i32 {
    10
}
fn default_retries_per_shrink() -> u32 {
    3
}
fn default_max_rounds() -> usize {
    10_000
}
fn default_eligible_biomes() -> Vec<Biome> {
    vec![Biome::Coastline, Biome::Grassland]
}

impl Default for TownSettings {
    fn default() -> Self {
        Self {
            exclusion_radius_cap: 10,
            retries_per_shrink: 3,
            max_rounds: 10_000,
            eligible_biomes: default_eligible_biomes(),
        }
    }
}

/// Параметры подбора сида, когда он не задан явно
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeedSearchSettings {
    /// Предел числа кандидатов
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,

    /// Каким должен быть биом центрального тайла. `None` — подходит первый же кандидат
    #[serde(default = "default_origin_biome")]
    pub origin_biome: Option<Biome>,

    /// `true` — исчерпание попыток является ошибкой, иначе берётся последний кандидат
    #[serde(default)]
    pub strict: bool,
}

fn default_max_attempts() -> usize {
    1_000
}
fn default_origin_biome() -> Option<Biome> {
    Some(Biome::MountainSnow)
}

impl Default for SeedSearchSettings {
    fn default() -> Self {
        Self {
            max_attempts: 1_000,
            origin_biome: Some(Biome::MountainSnow),
            strict: false,
        }
    }
}

/// Отладочные флаги (на генерацию не влияют)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DebugFlags {
    #[serde(default)]
    pub show_coords: bool,
    #[serde(default)]
    pub visualize_biomes: bool,
}
