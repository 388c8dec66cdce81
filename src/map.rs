// src/map.rs
//! Сгенерированная карта
//!
//! [`MapDefinition`] — единственный результат генерации. После возврата из генератора
//! карта только читается: поля закрыты, доступ через методы.
//!
//! Тайлы хранятся в упорядоченной карте `AxialCoord → Tile`, поэтому обход
//! (а значит, и выборка кандидатов в города) детерминирован.

use crate::biome::{Biome, BiomeSkin, BiomeSkins, TOWN_SKIN};
use crate::config::MapConfig;
use crate::heightmap::Heightmap;
use crate::hex::AxialCoord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: AxialCoord,
    pub biome: Biome,
    pub has_town: bool,
}

impl Tile {
    #[must_use]
    pub fn new(position: AxialCoord, biome: Biome) -> Self {
        Self {
            position,
            biome,
            has_town: false,
        }
    }
}

/// Все тайлы карты
pub type TileMap = BTreeMap<AxialCoord, Tile>;

/// Готовая карта: итоговая конфигурация (сид всегда задан) и тайлы
#[derive(Debug, Clone)]
pub struct MapDefinition {
    config: MapConfig,
    seed: f64,
    tiles: TileMap,
    heights: Heightmap,
}

/// Тайл, подготовленный для рендера
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderTile {
    pub position: AxialCoord,
    /// Центр тайла в мировых координатах `[x, y, z]`
    pub world: [f32; 3],
    pub biome: Biome,
    pub has_town: bool,
    /// `None` — для биома нет записи в таблице внешнего вида
    pub skin: Option<BiomeSkin>,
}

impl MapDefinition {
    pub(crate) fn new(mut config: MapConfig, seed: f64, tiles: TileMap, heights: Heightmap) -> Self {
        config.seed = Some(seed);
        Self {
            config,
            seed,
            tiles,
            heights,
        }
    }

    #[must_use]
    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    #[must_use]
    pub fn seed(&self) -> f64 {
        self.seed
    }

    #[must_use]
    pub fn radius(&self) -> i32 {
        self.config.radius
    }

    #[must_use]
    pub fn tiles(&self) -> &TileMap {
        &self.tiles
    }

    #[must_use]
    pub fn tile(&self, axial: AxialCoord) -> Option<&Tile> {
        self.tiles.get(&axial)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Координаты всех городов
    #[must_use]
    pub fn towns(&self) -> Vec<AxialCoord> {
        self.tiles
            .values()
            .filter(|t| t.has_town)
            .map(|t| t.position)
            .collect()
    }

    #[must_use]
    pub fn count_biome(&self, biome: Biome) -> usize {
        self.tiles.values().filter(|t| t.biome == biome).count()
    }

    /// Сырая высота тайла из поля высот
    #[must_use]
    pub fn raw_height(&self, axial: AxialCoord) -> Option<f32> {
        self.heights.get(axial)
    }

    /// Высота для рендера: вода всегда на уровне `water_level`
    #[must_use]
    pub fn surface_height(&self, axial: AxialCoord) -> Option<f32> {
        let tile = self.tiles.get(&axial)?;
        if tile.biome.is_water() {
            Some(self.config.water_level)
        } else {
            self.heights.get(axial)
        }
    }

    /// Тайлы с мировыми позициями и внешним видом
    ///
    /// `outer_radius` — радиус описанной окружности гекса в мировых единицах.
    /// Города получают [`TOWN_SKIN`] независимо от биома.
    #[must_use]
    pub fn render_tiles(&self, skins: &BiomeSkins, outer_radius: f32) -> Vec<RenderTile> {
        self.tiles
            .values()
            .map(|tile| {
                let (x, z) = tile.position.to_world(outer_radius);
                let y = self.surface_height(tile.position).unwrap_or(self.config.water_level)
                    * self.config.depth_scale;
                let skin = if tile.has_town {
                    Some(TOWN_SKIN)
                } else {
                    skins.lookup(tile.biome)
                };
                RenderTile {
                    position: tile.position,
                    world: [x, y, z],
                    biome: tile.biome,
                    has_town: tile.has_town,
                    skin,
                }
            })
            .collect()
    }
}
