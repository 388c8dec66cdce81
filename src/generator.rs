// src/generator.rs
//! Генерация карты целиком
//!
//! Порядок этапов фиксирован, каждый опирается на результат предыдущего:
//!
//! 1. Проверка конфигурации и подбор сида (если не задан)
//! 2. Поле высот по всему диску
//! 3. Биомы тайлов
//! 4. Вырезание центрального острова (если `archipelago == false`)
//! 5. Расстановка городов
//!
//! Вся случайность внутри генерации идёт из `ChaCha8Rng`, выведенного из итогового сида,
//! поэтому при явном сиде результат полностью воспроизводим.

use crate::biome::{Biome, BiomeClassifier};
use crate::config::MapConfig;
use crate::error::{ConfigError, MapGenError};
use crate::heightmap::{HeightField, Heightmap};
use crate::hex::{self, AxialCoord};
use crate::island::{CarveReport, carve_island};
use crate::map::{MapDefinition, Tile, TileMap};
use crate::towns::{PlacementReport, TownPlacer};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

/// Поток ГСЧ для выбора биомов пятен
const BLOB_STREAM: u64 = 1;
/// Поток ГСЧ для расстановки городов
const TOWN_STREAM: u64 = 2;

/// Детерминированный ГСЧ для заданного сида и потока
#[must_use]
pub fn seeded_rng(seed: f64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed.to_bits());
    rng.set_stream(stream);
    rng
}

/// Как был получен сид
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeedResolution {
    pub seed: f64,
    /// Сколько кандидатов проверено (0 — сид задан в конфигурации)
    pub attempts: usize,
    /// `false` — ни один кандидат не подошёл, взят последний
    pub satisfied: bool,
}

/// Подбирает сид перебором случайных кандидатов из `[0, 1)`
///
/// Явный сид из конфигурации возвращается как есть. Иначе кандидаты проверяются
/// предикатом `accept`, не более `max_attempts` раз. Если ни один не подошёл,
/// возвращается последний кандидат с `satisfied == false`.
pub fn resolve_seed<R, P>(
    explicit: Option<f64>,
    rng: &mut R,
    max_attempts: usize,
    mut accept: P,
) -> SeedResolution
where
    R: Rng + ?Sized,
    P: FnMut(f64) -> bool,
{
    if let Some(seed) = explicit {
        return SeedResolution {
            seed,
            attempts: 0,
            satisfied: true,
        };
    }

    let mut candidate = 0.0;
    for attempt in 1..=max_attempts {
        candidate = rng.gen_range(0.0..1.0);
        if accept(candidate) {
            return SeedResolution {
                seed: candidate,
                attempts: attempt,
                satisfied: true,
            };
        }
    }

    tracing::warn!(
        attempts = max_attempts,
        seed = candidate,
        "no seed candidate satisfied the origin predicate, using the last one"
    );
    SeedResolution {
        seed: candidate,
        attempts: max_attempts,
        satisfied: false,
    }
}

/// Биом центрального тайла для данного сида (новый классификатор на каждый вызов)
#[must_use]
pub fn origin_biome(config: &MapConfig, seed: f64) -> Biome {
    let field = HeightField::new(seed, config.radius, &config.height);
    let mut classifier = BiomeClassifier::new(
        &field,
        config.water_level,
        &config.biomes,
        seeded_rng(seed, BLOB_STREAM),
    );
    classifier.classify(AxialCoord::ORIGIN)
}

/// Сводка по этапам генерации
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationReport {
    pub seed: SeedResolution,
    /// `None` — архипелаг, вырезание не выполнялось
    pub carve: Option<CarveReport>,
    pub placement: PlacementReport,
    /// Сколько пятен биомов выращено
    pub blobs: usize,
}

#[derive(Debug, Clone)]
pub struct GeneratedMap {
    pub definition: MapDefinition,
    pub report: GenerationReport,
}

/// Генератор карты по проверенной конфигурации
#[derive(Debug, Clone)]
pub struct MapGenerator {
    config: MapConfig,
}

impl MapGenerator {
    pub fn new(config: MapConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Генерация с предикатом сида из конфигурации (`seed_search.origin_biome`)
    ///
    /// `rng` нужен только для подбора сида; при явном сиде он не используется.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedMap, MapGenError> {
        let wanted = self.config.seed_search.origin_biome;
        self.generate_with(rng, |config, seed| {
            wanted.is_none_or(|biome| origin_biome(config, seed) == biome)
        })
    }

    /// Генерация с собственным предикатом приёмки сида
    pub fn generate_with<R, P>(
        &self,
        rng: &mut R,
        mut accept: P,
    ) -> Result<GeneratedMap, MapGenError>
    where
        R: Rng + ?Sized,
        P: FnMut(&MapConfig, f64) -> bool,
    {
        let config = &self.config;
        let search = &config.seed_search;

        let seed = resolve_seed(config.seed, rng, search.max_attempts, |candidate| {
            accept(config, candidate)
        });
        if !seed.satisfied && search.strict {
            return Err(MapGenError::SeedSearchExhausted {
                attempts: seed.attempts,
            });
        }
        tracing::info!(seed = seed.seed, attempts = seed.attempts, "seed resolved");

        let field = HeightField::new(seed.seed, config.radius, &config.height);
        let heights = Heightmap::build(&field);

        let mut classifier = BiomeClassifier::new(
            &field,
            config.water_level,
            &config.biomes,
            seeded_rng(seed.seed, BLOB_STREAM),
        )
        .with_heightmap(&heights);
        let mut tiles: TileMap = hex::disc(config.radius)
            .into_iter()
            .map(|c| (c, Tile::new(c, classifier.classify(c))))
            .collect();
        let blobs = classifier.blobs_grown();
        assert_eq!(tiles.len(), hex::disc_size(config.radius));
        tracing::info!(tiles = tiles.len(), blobs, "terrain generated");

        let carve = if config.archipelago {
            None
        } else {
            let report = carve_island(&mut tiles, &heights, config.water_level);
            tracing::info!(
                connected = report.connected_land,
                culled = report.culled,
                "outlying islands culled"
            );
            Some(report)
        };

        let placement = TownPlacer::new(&config.towns, config.radius).place(
            &mut tiles,
            config.total_towns,
            &mut seeded_rng(seed.seed, TOWN_STREAM),
        );
        tracing::info!(
            placed = placement.placed,
            requested = placement.requested,
            rounds = placement.rounds,
            "towns placed"
        );

        Ok(GeneratedMap {
            definition: MapDefinition::new(config.clone(), seed.seed, tiles, heights),
            report: GenerationReport {
                seed,
                carve,
                placement,
                blobs,
            },
        })
    }
}

/// Проверяет конфигурацию и генерирует карту
pub fn generate_map<R: Rng + ?Sized>(
    config: MapConfig,
    rng: &mut R,
) -> Result<GeneratedMap, MapGenError> {
    MapGenerator::new(config)?.generate(rng)
}
