use crate::config::{BiomePolicy, BiomeSettings};
use crate::flood_fill::flood_fill;
use crate::heightmap::{HeightField, Heightmap, NoiseSource, OpenSimplexNoise};
use crate::hex::AxialCoord;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    Water,
    Grassland,
    Coastline,
    MountainSnow,
    Mountain,
    Forest,
    Desert,
    Swamp,
}

/// Материал тайла для рендера
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Material {
    Plastic,
    Grass,
    Sand,
    Slate,
    Snow,
    Mud,
    Neon,
}

/// Внешний вид биома: цвет и материал
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeSkin {
    pub color: [u8; 3],
    pub material: Material,
}

/// Вид тайла с городом (перекрывает биом)
pub const TOWN_SKIN: BiomeSkin = BiomeSkin {
    color: [255, 255, 0],
    material: Material::Neon,
};

impl Biome {
    pub const ALL: [Biome; 8] = [
        Biome::Water,
        Biome::Grassland,
        Biome::Coastline,
        Biome::MountainSnow,
        Biome::Mountain,
        Biome::Forest,
        Biome::Desert,
        Biome::Swamp,
    ];

    pub fn skin(&self) -> BiomeSkin {
        let (color, material) = match self {
            Biome::Water => ([51, 88, 130], Material::Plastic),
            Biome::Grassland => ([39, 70, 45], Material::Grass),
            Biome::Coastline => ([253, 234, 141], Material::Sand),
            Biome::MountainSnow => ([242, 243, 243], Material::Snow),
            Biome::Mountain => ([99, 95, 98], Material::Slate),
            Biome::Forest => ([24, 92, 40], Material::Grass),
            Biome::Desert => ([214, 180, 110], Material::Sand),
            Biome::Swamp => ([74, 88, 52], Material::Mud),
        };
        BiomeSkin { color, material }
    }

    pub fn to_rgb(&self) -> [u8; 3] {
        self.skin().color
    }

    pub fn is_water(&self) -> bool {
        *self == Biome::Water
    }
}

/// Таблица внешнего вида биомов для рендера
///
/// Отсутствующая запись — не ошибка: рендер получает `None` и предупреждение в лог.
#[derive(Debug, Clone)]
pub struct BiomeSkins {
    skins: HashMap<Biome, BiomeSkin>,
}

impl BiomeSkins {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            skins: HashMap::new(),
        }
    }

    pub fn insert(&mut self, biome: Biome, skin: BiomeSkin) {
        self.skins.insert(biome, skin);
    }

    pub fn remove(&mut self, biome: Biome) -> Option<BiomeSkin> {
        self.skins.remove(&biome)
    }

    #[must_use]
    pub fn lookup(&self, biome: Biome) -> Option<BiomeSkin> {
        let skin = self.skins.get(&biome).copied();
        if skin.is_none() {
            tracing::warn!(?biome, "no biome skin");
        }
        skin
    }
}

impl Default for BiomeSkins {
    fn default() -> Self {
        Self {
            skins: Biome::ALL.iter().map(|&b| (b, b.skin())).collect(),
        }
    }
}

/// Назначает биомы тайлам по высоте и (опционально) «пятнам»
///
/// Базовая политика:
/// 1. `height <= water_level` → `Water`
/// 2. есть водный сосед → `Coastline`
/// 3. `height > snow_threshold` → `MountainSnow`, `height > mountain_threshold` → `Mountain`
/// 4. иначе → `Grassland`
///
/// Политика `Blobs` добавляет шаг между 2 и 3: внутренний тайл суши с высокой оценкой
/// вторичного шума становится частью связного пятна, которому выбирается один биом из палитры.
/// Пятна кэшируются: повторный запрос любого тайла пятна — O(1).
///
/// Один экземпляр — на один прогон генерации; кэш никогда не сбрасывается.
pub struct BiomeClassifier<'a, N = OpenSimplexNoise> {
    field: &'a HeightField<N>,
    heights: Option<&'a Heightmap>,
    water_level: f32,
    settings: &'a BiomeSettings,
    blob_noise: OpenSimplexNoise,
    blob_cache: HashMap<AxialCoord, Biome>,
    blobs_grown: usize,
    rng: ChaCha8Rng,
}

impl<'a, N: NoiseSource> BiomeClassifier<'a, N> {
    pub fn new(
        field: &'a HeightField<N>,
        water_level: f32,
        settings: &'a BiomeSettings,
        rng: ChaCha8Rng,
    ) -> Self {
        Self {
            field,
            heights: None,
            water_level,
            settings,
            blob_noise: OpenSimplexNoise::new(1, settings.blob_frequency),
            blob_cache: HashMap::new(),
            blobs_grown: 0,
            rng,
        }
    }

    /// Использовать заранее посчитанные высоты диска
    #[must_use]
    pub fn with_heightmap(mut self, heights: &'a Heightmap) -> Self {
        self.heights = Some(heights);
        self
    }

    pub fn height(&self, axial: AxialCoord) -> f32 {
        self.heights
            .and_then(|h| h.get(axial))
            .unwrap_or_else(|| self.field.height(axial))
    }

    pub fn is_water(&self, axial: AxialCoord) -> bool {
        self.height(axial) <= self.water_level
    }

    pub fn is_coastline(&self, axial: AxialCoord) -> bool {
        axial.neighbors().into_iter().any(|n| self.is_water(n))
    }

    pub fn classify(&mut self, axial: AxialCoord) -> Biome {
        if self.is_water(axial) {
            return Biome::Water;
        }
        if self.is_coastline(axial) {
            return Biome::Coastline;
        }
        if self.settings.policy == BiomePolicy::Blobs {
            if let Some(biome) = self.blob_biome(axial) {
                return biome;
            }
        }

        let height = self.height(axial);
        if height > self.settings.snow_threshold {
            Biome::MountainSnow
        } else if height > self.settings.mountain_threshold {
            Biome::Mountain
        } else {
            Biome::Grassland
        }
    }

    /// Оценка вторичного шума, `0.0..=1.0`: расстояние от вершины шума
    ///
    /// `0.0` на пиках шума, `1.0` во впадинах.
    pub fn blob_score(&self, axial: AxialCoord) -> f32 {
        let n = self
            .blob_noise
            .sample(axial.x as f32, axial.z as f32, self.field.seed());
        ((1.0 - n) * 0.5).clamp(0.0, 1.0)
    }

    /// Может ли тайл быть частью пятна
    pub fn qualifies(&self, axial: AxialCoord) -> bool {
        axial.distance() <= self.field.radius()
            && !self.is_water(axial)
            && !self.is_coastline(axial)
            && self.blob_score(axial) < self.settings.blob_threshold
    }

    fn blob_biome(&mut self, axial: AxialCoord) -> Option<Biome> {
        if let Some(&biome) = self.blob_cache.get(&axial) {
            return Some(biome);
        }
        if !self.qualifies(axial) {
            return None;
        }

        let blob = flood_fill(
            axial,
            AxialCoord::neighbors,
            |c| self.qualifies(c),
            Some(self.field.radius()),
        );
        let biome = *self.settings.blob_palette.choose(&mut self.rng)?;
        tracing::debug!(start = ?axial, size = blob.len(), ?biome, "biome blob grown");

        for coord in blob.reached {
            let previous = self.blob_cache.insert(coord, biome);
            debug_assert!(previous.is_none(), "тайл {coord:?} уже принадлежит пятну");
        }
        self.blobs_grown += 1;
        Some(biome)
    }

    /// Сколько пятен выращено за прогон
    pub fn blobs_grown(&self) -> usize {
        self.blobs_grown
    }

    /// Сколько тайлов уже в кэше пятен
    pub fn cached_tiles(&self) -> usize {
        self.blob_cache.len()
    }
}
