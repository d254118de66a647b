mod common;

use cgmath::{Point3, Vector3};
use common::test_utils::*;
use flow_folio::{
    character::{Character, Direction},
    config::FolioConfig,
    data_structures::scene_graph::SceneGraph,
    raycast::{Ray, Raycaster},
    scene::SceneSets,
};

#[test]
fn partition_sorts_the_showcase() {
    let mut showcase = showcase_graph();
    let sets = SceneSets::partition(&mut showcase.graph, &FolioConfig::default());

    assert_eq!(sets.interactive, vec![showcase.project]);
    assert_eq!(sets.collision, vec![showcase.north_wall, showcase.east_wall]);
    assert_eq!(sets.character, Some(showcase.character));
}

#[test]
fn collision_meshes_are_hidden_and_the_rest_stays_visible() {
    let mut showcase = showcase_graph();
    SceneSets::partition(&mut showcase.graph, &FolioConfig::default());

    let visible = |id| showcase.graph.node(id).expect("node").visible;
    assert!(!visible(showcase.north_wall));
    assert!(!visible(showcase.east_wall));
    assert!(visible(showcase.character));
    assert!(visible(showcase.project_mesh));
    assert!(visible(showcase.decoration));
}

#[test]
fn mesh_named_like_the_collision_group_is_collision() {
    let mut graph = SceneGraph::new();
    let wall = add_box(&mut graph, "Collision", None, [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
    graph.update_world_transforms();

    let sets = SceneSets::partition(&mut graph, &FolioConfig::default());
    assert_eq!(sets.collision, vec![wall]);
    assert_eq!(sets.character, None);
}

#[test]
fn last_character_node_wins() {
    let mut graph = SceneGraph::new();
    add_group(&mut graph, "Character", None, [0.0, 0.0, 0.0]);
    let second = add_group(&mut graph, "Character", None, [5.0, 0.0, 0.0]);
    graph.update_world_transforms();

    let sets = SceneSets::partition(&mut graph, &FolioConfig::default());
    assert_eq!(sets.character, Some(second));
}

#[test]
fn interactive_owner_walks_up_to_the_project() {
    let mut showcase = showcase_graph();
    let sets = SceneSets::partition(&mut showcase.graph, &FolioConfig::default());

    assert_eq!(
        sets.interactive_owner(&showcase.graph, showcase.project_mesh),
        Some("Project_1")
    );
    assert_eq!(
        sets.interactive_owner(&showcase.graph, showcase.project),
        Some("Project_1")
    );
    assert_eq!(sets.interactive_owner(&showcase.graph, showcase.decoration), None);
}

#[test]
fn glb_loads_only_the_default_scene() {
    let graph = showcase_glb_graph();

    assert_eq!(graph.len(), 5);
    assert_eq!(graph.roots().len(), 3);
    assert!(graph.find_by_name("Unused").is_none());
    assert_eq!(graph.meshes.len(), 1);
}

#[test]
fn glb_transforms_and_geometry() {
    let graph = showcase_glb_graph();

    let wall = graph.find_by_name("Wall").expect("wall");
    let node = graph.node(wall).expect("node");
    assert_vec_close(node.world.position, Vector3::new(0.0, 1.0, -6.0));
    assert_vec_close(node.world.scale, Vector3::new(10.0, 1.0, 0.5));
    assert_eq!(graph.parent_name(wall), Some("Collision"));

    let geometry = graph.mesh_of(wall).expect("mesh");
    assert_eq!(geometry.positions.len(), 8);
    assert_eq!(geometry.indices.len(), 36);

    let screen = graph.find_by_name("Project_2_Screen").expect("screen");
    assert_vec_close(
        graph.node(screen).expect("node").world.position,
        Vector3::new(20.0, 0.0, 0.0),
    );
}

#[test]
fn glb_scene_partitions_and_blocks() {
    let mut graph = showcase_glb_graph();
    let config = FolioConfig::default();
    let sets = SceneSets::partition(&mut graph, &config);

    let project = graph.find_by_name("Project_2").expect("project");
    assert_eq!(sets.interactive, vec![project]);
    assert_eq!(sets.collision.len(), 1);
    let character_node = sets.character.expect("character");

    let ray = Ray::new(Point3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 0.0, -1.0)).expect("ray");
    let hit = Raycaster::default()
        .first_hit(&graph, &sets.collision, &ray)
        .expect("wall hit");
    assert_close(hit.distance, 5.5);

    let character =
        Character::from_graph(&graph, character_node, config.character.clone()).expect("node");
    let up = character.plan(Direction::Up).expect("idle");
    assert!(!character.can_move_to(up.target, &graph, &sets.collision, &Raycaster::default()));
    let down = character.plan(Direction::Down).expect("idle");
    assert!(character.can_move_to(down.target, &graph, &sets.collision, &Raycaster::default()));
}
