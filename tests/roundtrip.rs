//! End-to-end save → load over a real directory tree.

use std::fs;

use tiled_creator::model::{Game, Room, Tile};
use tiled_creator::{Error, load_project, save_project};

fn door_script() -> String {
    "function onUse()\n  open = true\nend\n\nfunction onStep(who)\n  who.stuck = true\nend\n"
        .to_string()
}

/// Two rooms, one scripted tile, a spawn point.
fn sample_game() -> Game {
    let mut hall = Room::new("hall", 3, 2);
    let grass = hall.add_tile(Tile::new("grass", "Grass")).unwrap();
    let mut door = Tile::new("door", "Oak Door");
    door.seethrough = true;
    door.image_path = "tiles/door.png".into();
    door.script = door_script();
    door.interact_func = "onUse".into();
    door.step_func = "onStep".into();
    let door = hall.add_tile(door).unwrap();
    for row in 0..2 {
        for col in 0..3 {
            hall.set_cell(row, col, Some(grass));
        }
    }
    hall.set_cell(1, 2, Some(door));

    let mut cellar = Room::new("cellar", 2, 2);
    let stone = cellar.add_tile(Tile::new("stone", "Stone")).unwrap();
    for row in 0..2 {
        for col in 0..2 {
            cellar.set_cell(row, col, Some(stone));
        }
    }

    let mut game = Game::new();
    game.name = "Dungeon Crawl".into();
    game.project_name = "dungeon".into();
    game.description = "A damp test dungeon".into();
    game.add_room(hall).unwrap();
    game.add_room(cellar).unwrap();
    game.spawn_room = Some("hall".into());
    game.spawn_x_loc = Some(1);
    game.spawn_y_loc = Some(0);
    game
}

/// Structural equality: same rooms by name, same grids tile-name by
/// tile-name, same tile fields, same metadata and spawn. (Tileset *order*
/// may differ after a round-trip; identity is by name.)
fn assert_same_game(a: &Game, b: &Game) {
    assert_eq!(a.name, b.name);
    assert_eq!(a.project_name, b.project_name);
    assert_eq!(a.description, b.description);
    assert_eq!(a.spawn_room, b.spawn_room);
    assert_eq!(a.spawn_x_loc, b.spawn_x_loc);
    assert_eq!(a.spawn_y_loc, b.spawn_y_loc);
    assert_eq!(a.rooms.len(), b.rooms.len());

    for ra in &a.rooms {
        let rb = b.room(&ra.name).expect("room missing after round-trip");
        assert_eq!((ra.width(), ra.height()), (rb.width(), rb.height()));
        assert_eq!(ra.tileset().len(), rb.tileset().len());
        for ta in ra.tileset() {
            let tb = rb
                .tileset()
                .iter()
                .find(|t| t.name == ta.name)
                .expect("tile missing after round-trip");
            assert_eq!(ta, tb);
        }
        for row in 0..ra.height() {
            for col in 0..ra.width() {
                let name_a = ra.cell(row, col).map(|id| &ra.tile(id).unwrap().name);
                let name_b = rb.cell(row, col).map(|id| &rb.tile(id).unwrap().name);
                assert_eq!(name_a, name_b, "cell ({row}, {col}) of `{}`", ra.name);
            }
        }
    }
}

#[test]
fn save_then_load_is_structurally_identity() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("dungeon");

    let game = sample_game();
    save_project(&game, &target).unwrap();

    let loaded = load_project(&target).unwrap();
    assert_same_game(&game, &loaded);
}

#[test]
fn save_writes_the_documented_tree() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("dungeon");
    save_project(&sample_game(), &target).unwrap();

    assert!(target.join("manifest.json").is_file());
    assert!(target.join("rooms/hall.json").is_file());
    assert!(target.join("rooms/cellar.json").is_file());
    assert_eq!(
        fs::read_to_string(target.join("rooms/scripts/door_script.lua")).unwrap(),
        door_script()
    );
    // grass has no script, so no sidecar file
    assert!(!target.join("rooms/scripts/grass_script.lua").exists());

    let manifest: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(target.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["spawn"]["room_name"], "hall");
    assert_eq!(manifest["spawn"]["x_loc"], 1);
    assert_eq!(manifest["spawn"]["y_loc"], 0);
    assert_eq!(manifest["rooms"]["hall"], "rooms/hall.json");
}

#[test]
fn saving_twice_into_the_same_directory_is_fine() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("dungeon");
    let game = sample_game();
    save_project(&game, &target).unwrap();
    save_project(&game, &target).unwrap();
    assert_same_game(&game, &load_project(&target).unwrap());
}

#[test]
fn invalid_project_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("dungeon");

    let mut game = sample_game();
    game.project_name.clear();
    assert!(save_project(&game, &target).is_err());
    assert!(!target.exists());

    let mut game = sample_game();
    game.room_mut("cellar").unwrap().set_cell(0, 1, None);
    assert!(save_project(&game, &target).is_err());
    assert!(!target.exists());
}

#[test]
fn unknown_spawn_room_fails_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("dungeon");
    save_project(&sample_game(), &target).unwrap();

    let manifest_path = target.join("manifest.json");
    let patched = fs::read_to_string(&manifest_path)
        .unwrap()
        .replace("\"room_name\": \"hall\"", "\"room_name\": \"attic\"");
    fs::write(&manifest_path, patched).unwrap();

    match load_project(&target).unwrap_err() {
        Error::SpawnRoomNotFound(name) => assert_eq!(name, "attic"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn truncated_manifest_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("dungeon");
    save_project(&sample_game(), &target).unwrap();

    fs::write(target.join("manifest.json"), r#"{"name": "Dungeon Crawl"}"#).unwrap();
    assert!(matches!(
        load_project(&target).unwrap_err(),
        Error::MalformedRecord { .. }
    ));
}

#[test]
fn scripts_resolve_relative_to_the_room_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("dungeon");
    save_project(&sample_game(), &target).unwrap();

    // the loader must look under rooms/scripts, not <project>/scripts
    assert!(!target.join("scripts").exists());
    let loaded = load_project(&target).unwrap();
    let hall = loaded.room("hall").unwrap();
    let door = hall
        .tileset()
        .iter()
        .find(|t| t.name == "door")
        .unwrap();
    assert_eq!(door.script, door_script());
}
