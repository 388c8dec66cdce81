use hexmap::biome::TOWN_SKIN;
use hexmap::flood_fill::flood_fill;
use hexmap::{
    AxialCoord, Biome, BiomePolicy, BiomeSkins, MapConfig, MapGenerator, PlacementOutcome,
    generate_map, hex,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

fn seeded(radius: i32, seed: f64) -> MapConfig {
    MapConfig {
        radius,
        seed: Some(seed),
        ..MapConfig::default()
    }
}

#[test]
fn tile_count_matches_hex_disc() {
    for radius in 1..=7 {
        let generated = generate_map(seeded(radius, 0.3), &mut rng(0)).unwrap();
        let map = &generated.definition;
        let expected = (3 * radius * radius + 3 * radius + 1) as usize;
        assert_eq!(map.len(), expected, "radius {radius}");
        for (coord, tile) in map.tiles() {
            assert_eq!(*coord, tile.position);
            assert!(coord.distance() <= radius);
        }
        for coord in hex::disc(radius + 1) {
            assert_eq!(map.tile(coord).is_some(), coord.distance() <= radius);
        }
    }
}

#[test]
fn small_map_without_towns() {
    let config = MapConfig {
        radius: 5,
        water_level: -0.5,
        total_towns: 0,
        ..MapConfig::default()
    };
    let generated = generate_map(config, &mut rng(5)).unwrap();
    assert_eq!(generated.definition.len(), 91);
    assert!(generated.definition.towns().is_empty());
    assert_eq!(generated.report.placement.rounds, 0);
    assert!(generated.report.placement.is_complete());
    assert!(generated.report.seed.attempts >= 1);
}

#[test]
fn single_island_culls_detached_land() {
    let seed = 0.137;
    let archipelago = generate_map(seeded(25, seed), &mut rng(0)).unwrap();
    let island = generate_map(
        MapConfig {
            archipelago: false,
            ..seeded(25, seed)
        },
        &mut rng(0),
    )
    .unwrap();

    let before = &archipelago.definition;
    let after = &island.definition;
    assert_eq!(before.len(), 1951);
    assert_eq!(after.len(), 1951);
    assert!(archipelago.report.carve.is_none());

    let carve = island.report.carve.expect("carving runs when archipelago is off");
    let water_before = before.count_biome(Biome::Water);
    let water_after = after.count_biome(Biome::Water);
    assert!(water_after >= water_before);
    assert_eq!(water_after, water_before + carve.culled);

    // Вся уцелевшая суша связана с центром через сушу
    let reach = flood_fill(
        AxialCoord::ORIGIN,
        AxialCoord::neighbors,
        |c| c == AxialCoord::ORIGIN || after.tile(c).is_some_and(|t| !t.biome.is_water()),
        Some(25),
    );
    for tile in after.tiles().values() {
        if !tile.biome.is_water() {
            assert!(reach.contains(tile.position), "{:?} отрезан", tile.position);
        } else if !before.tile(tile.position).unwrap().biome.is_water() {
            assert!(!reach.contains(tile.position));
        }
    }

    // Уцелевшие тайлы суши не меняют биом
    for tile in after.tiles().values().filter(|t| !t.biome.is_water()) {
        assert_eq!(before.tile(tile.position).unwrap().biome, tile.biome);
    }
}

#[test]
fn towns_respect_spacing_and_land() {
    let config = MapConfig {
        total_towns: 12,
        ..seeded(30, 0.61)
    };
    let generated = generate_map(config, &mut rng(0)).unwrap();
    let map = &generated.definition;
    let placement = &generated.report.placement;

    let towns = map.towns();
    assert_eq!(towns.len(), placement.placed);
    for &town in &towns {
        let tile = map.tile(town).unwrap();
        assert!(!tile.biome.is_water());
        assert!(
            town.neighbors()
                .into_iter()
                .any(|n| map.tile(n).is_some_and(|t| !t.biome.is_water()))
        );
    }
    for (i, a) in towns.iter().enumerate() {
        for b in &towns[i + 1..] {
            assert!(a.distance_to(*b) > placement.final_exclusion_radius);
        }
    }
}

#[test]
fn impossible_town_count_is_a_reported_shortfall() {
    let config = MapConfig {
        total_towns: 500,
        ..seeded(6, 0.42)
    };
    let generated = generate_map(config, &mut rng(0)).unwrap();
    let placement = &generated.report.placement;
    assert!(placement.placed < 500);
    assert_eq!(placement.shortfall(), 500 - placement.placed);
    assert!(matches!(
        placement.outcome,
        PlacementOutcome::RadiusExhausted | PlacementOutcome::NoEligibleTiles
    ));
    assert_eq!(generated.definition.towns().len(), placement.placed);
}

#[test]
fn explicit_seed_is_idempotent() {
    let config = MapConfig {
        total_towns: 9,
        archipelago: false,
        ..seeded(20, 0.8125)
    };
    let generator = MapGenerator::new(config).unwrap();
    let a = generator.generate(&mut rng(1)).unwrap();
    let b = generator.generate(&mut rng(999)).unwrap();
    assert_eq!(a.definition.tiles(), b.definition.tiles());
    assert_eq!(a.report, b.report);
    assert_eq!(a.definition.seed(), 0.8125);
}

#[test]
fn blob_policy_paints_interior_land_from_palette() {
    let mut config = seeded(18, 0.55);
    config.biomes.policy = BiomePolicy::Blobs;
    config.biomes.blob_threshold = 1.5;
    let palette = config.biomes.blob_palette.clone();

    let generated = generate_map(config.clone(), &mut rng(0)).unwrap();
    let map = &generated.definition;
    for tile in map.tiles().values() {
        match tile.biome {
            Biome::Water | Biome::Coastline => {}
            other => assert!(palette.contains(&other), "{other:?} вне палитры"),
        }
    }

    let again = generate_map(config, &mut rng(3)).unwrap();
    assert_eq!(map.tiles(), again.definition.tiles());
    assert_eq!(generated.report.blobs, again.report.blobs);
}

#[test]
fn render_tiles_flatten_water_and_mark_towns() {
    let config = MapConfig {
        total_towns: 4,
        depth_scale: 3.0,
        ..seeded(12, 0.27)
    };
    let generated = generate_map(config, &mut rng(0)).unwrap();
    let map = &generated.definition;
    let rendered = map.render_tiles(&BiomeSkins::default(), 1.0);
    assert_eq!(rendered.len(), map.len());

    for tile in &rendered {
        if tile.biome == Biome::Water {
            assert!((tile.world[1] - map.config().water_level * 3.0).abs() < 1e-5);
        }
        if tile.has_town {
            assert_eq!(tile.skin, Some(TOWN_SKIN));
        } else {
            assert_eq!(tile.skin, Some(tile.biome.skin()));
        }
    }
}
