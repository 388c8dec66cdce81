// src/towns.rs
//! Расстановка городов
//!
//! Города ставятся раундами. В каждом раунде случайно (без повторов) выбирается столько
//! тайлов подходящих биомов, сколько городов ещё не хватает. Кандидат принимается, если:
//! - в радиусе исключения нет ни одного города (включая сам тайл);
//! - хотя бы один сосед — не вода.
//!
//! Принятый город сразу виден следующим кандидатам того же раунда.
//!
//! Радиус исключения начинается с `min(radius, exclusion_radius_cap)` и уменьшается на 1
//! после `retries_per_shrink` раундов подряд без единого нового города. Когда радиус
//! становится отрицательным, расстановка прекращается с недобором — это не ошибка.

use crate::biome::Biome;
use crate::config::TownSettings;
use crate::hex::AxialCoord;
use crate::map::TileMap;
use rand::Rng;
use serde::Serialize;

/// Чем закончилась расстановка
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlacementOutcome {
    /// Расставлены все города
    Complete,
    /// Радиус исключения исчерпан
    RadiusExhausted,
    /// На карте нет тайлов подходящих биомов
    NoEligibleTiles,
    /// Достигнут предел числа раундов
    RoundLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementReport {
    pub requested: usize,
    pub placed: usize,
    pub rounds: usize,
    /// Радиус исключения на момент остановки
    pub final_exclusion_radius: i32,
    pub outcome: PlacementOutcome,
    /// Города в порядке постановки
    pub towns: Vec<AxialCoord>,
}

impl PlacementReport {
    #[must_use]
    pub fn shortfall(&self) -> usize {
        self.requested - self.placed
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.outcome == PlacementOutcome::Complete
    }
}

pub struct TownPlacer<'a> {
    settings: &'a TownSettings,
    map_radius: i32,
}

impl<'a> TownPlacer<'a> {
    #[must_use]
    pub fn new(settings: &'a TownSettings, map_radius: i32) -> Self {
        Self {
            settings,
            map_radius,
        }
    }

    #[must_use]
    pub fn initial_exclusion_radius(&self) -> i32 {
        self.map_radius.min(self.settings.exclusion_radius_cap)
    }

    /// Расставляет `total` городов, отмечая `has_town` прямо в тайлах
    pub fn place<R: Rng + ?Sized>(
        &self,
        tiles: &mut TileMap,
        total: usize,
        rng: &mut R,
    ) -> PlacementReport {
        let mut exclusion_radius = self.initial_exclusion_radius();
        let mut idle_rounds = 0;
        let mut rounds = 0;
        let mut towns = Vec::with_capacity(total);

        let eligible: Vec<AxialCoord> = tiles
            .values()
            .filter(|t| !t.has_town && self.is_eligible_biome(t.biome))
            .map(|t| t.position)
            .collect();

        let outcome = loop {
            if towns.len() == total {
                break PlacementOutcome::Complete;
            }
            if eligible.is_empty() {
                break PlacementOutcome::NoEligibleTiles;
            }
            if exclusion_radius < 0 {
                break PlacementOutcome::RadiusExhausted;
            }
            if rounds >= self.settings.max_rounds {
                break PlacementOutcome::RoundLimit;
            }
            rounds += 1;

            let mut pool: Vec<AxialCoord> = eligible
                .iter()
                .copied()
                .filter(|c| tiles.get(c).is_some_and(|t| !t.has_town))
                .collect();
            let batch = (total - towns.len()).min(pool.len());

            let mut placed_this_round = false;
            for _ in 0..batch {
                let candidate = pool.swap_remove(rng.gen_range(0..pool.len()));
                if can_host_town(tiles, candidate, exclusion_radius) {
                    if let Some(tile) = tiles.get_mut(&candidate) {
                        tile.has_town = true;
                    }
                    towns.push(candidate);
                    placed_this_round = true;
                }
            }

            if placed_this_round {
                idle_rounds = 0;
            } else {
                idle_rounds += 1;
                if idle_rounds >= self.settings.retries_per_shrink {
                    exclusion_radius -= 1;
                    idle_rounds = 0;
                }
            }

            tracing::debug!(
                round = rounds,
                placed = towns.len(),
                total,
                exclusion_radius,
                "towns: {} / {}",
                towns.len(),
                total
            );
        };

        if outcome != PlacementOutcome::Complete {
            tracing::warn!(
                ?outcome,
                "failed to place {} towns, only placed {} towns",
                total,
                towns.len()
            );
        }

        PlacementReport {
            requested: total,
            placed: towns.len(),
            rounds,
            final_exclusion_radius: exclusion_radius,
            outcome,
            towns,
        }
    }

    fn is_eligible_biome(&self, biome: Biome) -> bool {
        self.settings.eligible_biomes.contains(&biome)
    }
}

/// Может ли на тайле стоять город при данном радиусе исключения
#[must_use]
pub fn can_host_town(tiles: &TileMap, axial: AxialCoord, exclusion_radius: i32) -> bool {
    let Some(tile) = tiles.get(&axial) else {
        return false;
    };
    if tile.has_town || tile.biome.is_water() {
        return false;
    }

    let crowded = axial
        .neighbors_within_range(exclusion_radius)
        .into_iter()
        .any(|c| tiles.get(&c).is_some_and(|t| t.has_town));
    if crowded {
        return false;
    }

    axial
        .neighbors()
        .into_iter()
        .any(|c| tiles.get(&c).is_some_and(|t| !t.biome.is_water()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex;
    use crate::map::Tile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn uniform_map(radius: i32, biome: Biome) -> TileMap {
        hex::disc(radius)
            .into_iter()
            .map(|c| (c, Tile::new(c, biome)))
            .collect()
    }

    fn assert_spacing(report: &PlacementReport) {
        for (i, a) in report.towns.iter().enumerate() {
            for b in &report.towns[i + 1..] {
                assert!(
                    a.distance_to(*b) > report.final_exclusion_radius,
                    "{a:?} и {b:?} ближе радиуса {}",
                    report.final_exclusion_radius
                );
            }
        }
    }

    #[test]
    fn zero_towns_runs_no_rounds() {
        let mut tiles = uniform_map(5, Biome::Grassland);
        let settings = TownSettings::default();
        let report =
            TownPlacer::new(&settings, 5).place(&mut tiles, 0, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(report.rounds, 0);
        assert_eq!(report.placed, 0);
        assert!(report.is_complete());
        assert!(tiles.values().all(|t| !t.has_town));
    }

    #[test]
    fn places_towns_with_spacing() {
        let mut tiles = uniform_map(20, Biome::Grassland);
        let settings = TownSettings::default();
        let report =
            TownPlacer::new(&settings, 20).place(&mut tiles, 6, &mut ChaCha8Rng::seed_from_u64(9));

        assert!(report.is_complete());
        assert_eq!(report.placed, 6);
        assert_eq!(report.shortfall(), 0);
        assert_eq!(tiles.values().filter(|t| t.has_town).count(), 6);
        assert_spacing(&report);
    }

    #[test]
    fn too_many_towns_reports_shortfall() {
        let mut tiles = uniform_map(3, Biome::Grassland);
        let settings = TownSettings::default();
        let report = TownPlacer::new(&settings, 3).place(
            &mut tiles,
            hex::disc_size(3) + 50,
            &mut ChaCha8Rng::seed_from_u64(3),
        );

        assert_eq!(report.outcome, PlacementOutcome::RadiusExhausted);
        assert_eq!(report.final_exclusion_radius, -1);
        assert_eq!(report.placed, hex::disc_size(3));
        assert_eq!(report.shortfall(), 50);
        assert!(tiles.values().all(|t| t.has_town));
    }

    #[test]
    fn no_eligible_tiles_stops_immediately() {
        let mut tiles = uniform_map(4, Biome::Mountain);
        let settings = TownSettings::default();
        let report =
            TownPlacer::new(&settings, 4).place(&mut tiles, 3, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(report.outcome, PlacementOutcome::NoEligibleTiles);
        assert_eq!(report.rounds, 0);
        assert_eq!(report.shortfall(), 3);
    }

    #[test]
    fn round_limit_is_enforced() {
        let mut tiles = uniform_map(3, Biome::Grassland);
        let settings = TownSettings {
            max_rounds: 2,
            ..TownSettings::default()
        };
        let report =
            TownPlacer::new(&settings, 3).place(&mut tiles, 40, &mut ChaCha8Rng::seed_from_u64(4));
        assert_eq!(report.outcome, PlacementOutcome::RoundLimit);
        assert_eq!(report.rounds, 2);
    }

    #[test]
    fn isolated_tiles_never_host_towns() {
        // Тайлы суши без соседей-суши не подходят
        let mut tiles = uniform_map(4, Biome::Water);
        for c in [AxialCoord::new(0, 0), AxialCoord::new(3, 0), AxialCoord::new(-3, 3)] {
            tiles.insert(c, Tile::new(c, Biome::Coastline));
        }
        let settings = TownSettings::default();
        let report =
            TownPlacer::new(&settings, 4).place(&mut tiles, 2, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(report.placed, 0);
        assert_eq!(report.outcome, PlacementOutcome::RadiusExhausted);
    }

    #[test]
    fn towns_need_a_land_neighbor_and_room() {
        let mut tiles = uniform_map(4, Biome::Water);
        let a = AxialCoord::new(0, 0);
        let b = AxialCoord::new(1, 0);
        tiles.insert(a, Tile::new(a, Biome::Coastline));
        tiles.insert(b, Tile::new(b, Biome::Grassland));

        assert!(can_host_town(&tiles, a, 3));
        assert!(!can_host_town(&tiles, AxialCoord::new(2, 0), 3));
        assert!(!can_host_town(&tiles, AxialCoord::new(9, 9), 0));

        tiles.get_mut(&a).unwrap().has_town = true;
        assert!(!can_host_town(&tiles, a, 0));
        assert!(!can_host_town(&tiles, b, 1));
        assert!(can_host_town(&tiles, b, 0));
    }

    #[test]
    fn placement_is_reproducible() {
        let settings = TownSettings::default();
        let run = || {
            let mut tiles = uniform_map(15, Biome::Coastline);
            TownPlacer::new(&settings, 15)
                .place(&mut tiles, 8, &mut ChaCha8Rng::seed_from_u64(77))
                .towns
        };
        assert_eq!(run(), run());
    }
}
