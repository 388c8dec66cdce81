use crate::biome::Biome;
use crate::flood_fill::flood_fill;
use crate::heightmap::Heightmap;
use crate::hex::AxialCoord;
use crate::map::TileMap;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CarveReport {
    /// Тайлов суши, связанных с центром карты
    pub connected_land: usize,
    /// Тайлов суши, затопленных как оторванные от центра
    pub culled: usize,
}

/// Оставляет один остров: суша, не связанная с центром карты через сушу, становится водой
///
/// Заливка идёт от `(0, 0)`, допускаются тайлы с `height > water_level`.
/// Центр входит в остров всегда, даже под водой: суша вокруг затопленного центра остаётся.
pub fn carve_island(tiles: &mut TileMap, heights: &Heightmap, water_level: f32) -> CarveReport {
    let island = flood_fill(
        AxialCoord::ORIGIN,
        AxialCoord::neighbors,
        |c| c == AxialCoord::ORIGIN || heights.get(c).is_some_and(|h| h > water_level),
        Some(heights.radius),
    );

    let mut culled = 0;
    let mut connected_land = 0;
    for tile in tiles.values_mut() {
        if tile.biome.is_water() {
            continue;
        }
        if island.contains(tile.position) {
            connected_land += 1;
        } else {
            tile.biome = Biome::Water;
            culled += 1;
        }
    }

    tracing::debug!(connected = connected_land, culled, "island carved");
    CarveReport {
        connected_land,
        culled,
    }
}
