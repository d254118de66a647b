mod common;

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::{Quaternion, Rad, Rotation3, Vector3};
use common::test_utils::*;
use flow_folio::{
    character::{Character, Direction, normalize_rotation},
    config::CharacterConfig,
    data_structures::{instance::Instance, scene_graph::SceneGraph},
    raycast::Raycaster,
};

fn character(showcase: &Showcase) -> Character {
    Character::from_graph(&showcase.graph, showcase.character, CharacterConfig::default())
        .expect("character node exists")
}

fn collision(showcase: &Showcase) -> Vec<flow_folio::data_structures::scene_graph::NodeId> {
    vec![showcase.north_wall, showcase.east_wall]
}

#[test]
fn normalize_rotation_takes_the_short_way() {
    assert_close(normalize_rotation(0.0, FRAC_PI_2), FRAC_PI_2);
    assert_close(normalize_rotation(0.0, 3.0 * FRAC_PI_2), -FRAC_PI_2);
    assert_close(normalize_rotation(PI, -FRAC_PI_2), 3.0 * FRAC_PI_2);
    assert_close(normalize_rotation(-FRAC_PI_2, FRAC_PI_2), FRAC_PI_2);
    assert_close(normalize_rotation(4.0 * PI, 0.0), 4.0 * PI);
}

#[test]
fn plan_steps_one_cell_and_faces_the_direction() {
    let showcase = showcase_graph();
    let character = character(&showcase);

    let up = character.plan(Direction::Up).expect("idle character can plan");
    assert_vec_close(up.target, Vector3::new(0.0, 0.0, -5.0));
    assert_close(up.yaw, 0.0);

    let right = character.plan(Direction::Right).expect("idle character can plan");
    assert_vec_close(right.target, Vector3::new(5.0, 0.0, 0.0));
    assert_close(right.yaw, FRAC_PI_2);

    let down = character.plan(Direction::Down).expect("idle character can plan");
    assert_vec_close(down.target, Vector3::new(0.0, 0.0, 5.0));
    assert_close(down.yaw, PI);
}

#[test]
fn no_new_step_while_moving() {
    let showcase = showcase_graph();
    let mut character = character(&showcase);
    let step = character.plan(Direction::Left).expect("idle");
    character.begin_move(step);

    assert!(character.is_moving());
    assert!(character.plan(Direction::Down).is_none());
}

#[test]
fn wall_within_reach_blocks_the_step() {
    let showcase = showcase_graph();
    let character = character(&showcase);
    let step = character.plan(Direction::Up).expect("idle");

    assert!(!character.can_move_to(
        step.target,
        &showcase.graph,
        &collision(&showcase),
        &Raycaster::default()
    ));
}

#[test]
fn wall_beyond_reach_does_not_block() {
    let showcase = showcase_graph();
    let character = character(&showcase);
    let step = character.plan(Direction::Right).expect("idle");

    assert!(character.can_move_to(
        step.target,
        &showcase.graph,
        &collision(&showcase),
        &Raycaster::default()
    ));
}

#[test]
fn walls_behind_the_character_are_ignored() {
    let showcase = showcase_graph();
    let character = character(&showcase);
    for direction in [Direction::Down, Direction::Left] {
        let step = character.plan(direction).expect("idle");
        assert!(
            character.can_move_to(
                step.target,
                &showcase.graph,
                &collision(&showcase),
                &Raycaster::default()
            ),
            "{:?} should be free",
            direction
        );
    }
}

#[test]
fn every_move_is_allowed_without_collision_meshes() {
    let showcase = showcase_graph();
    let character = character(&showcase);
    let step = character.plan(Direction::Up).expect("idle");

    assert!(character.can_move_to(step.target, &showcase.graph, &[], &Raycaster::default()));
}

#[test]
fn low_wall_is_hit_by_the_lowest_ray_only() {
    let mut graph = SceneGraph::new();
    let node = add_box(&mut graph, "Character", None, [0.0, 0.0, 0.0], [0.5, 0.5, 0.5]);
    let wall = add_box(&mut graph, "Kerb", None, [0.0, 0.75, -3.0], [5.0, 0.5, 0.5]);
    graph.update_world_transforms();
    let character = Character::from_graph(&graph, node, CharacterConfig::default()).expect("node");
    let step = character.plan(Direction::Up).expect("idle");

    assert!(!character.can_move_to(step.target, &graph, &[wall], &Raycaster::default()));

    let high_rays = CharacterConfig {
        ray_heights: vec![3.0, 5.0],
        ..CharacterConfig::default()
    };
    let character = Character::from_graph(&graph, node, high_rays).expect("node");
    assert!(character.can_move_to(step.target, &graph, &[wall], &Raycaster::default()));
}

#[test]
fn advance_jumps_and_lands_on_the_target() {
    let showcase = showcase_graph();
    let mut character = character(&showcase);
    let step = character.plan(Direction::Left).expect("idle");
    character.begin_move(step);

    assert!(character.advance(0.1));
    assert!(character.is_moving());
    assert_close(character.position.y, 2.0);
    assert_close(character.position.x, -3.75);
    assert!(character.yaw() < 0.0);

    assert!(character.advance(0.15));
    assert!(!character.is_moving());
    assert_vec_close(character.position, Vector3::new(-5.0, 0.0, 0.0));
    assert_close(character.yaw(), -FRAC_PI_2);

    assert!(!character.advance(0.1));
}

#[test]
fn apply_writes_the_transform_into_the_graph() {
    let mut showcase = showcase_graph();
    let mut character = character(&showcase);
    let step = character.plan(Direction::Down).expect("idle");
    character.begin_move(step);
    character.advance(1.0);
    character.apply(&mut showcase.graph);

    let node = showcase.graph.node(showcase.character).expect("node");
    assert_vec_close(node.local.position, Vector3::new(0.0, 0.0, 5.0));
    assert_vec_close(node.world.position, Vector3::new(0.0, 0.0, 5.0));
}

#[test]
fn half_turned_character_keeps_its_heading() {
    let mut graph = SceneGraph::new();
    let local = Instance {
        rotation: Quaternion::from_angle_y(Rad(PI)),
        ..Instance::new()
    };
    let node = graph.add_node("Character", None, local, None);
    graph.update_world_transforms();

    let mut character =
        Character::from_graph(&graph, node, CharacterConfig::default()).expect("node");
    assert_close(character.yaw().abs(), PI);

    let step = character.plan(Direction::Right).expect("idle");
    let start = character.yaw();
    character.begin_move(step);
    character.advance(1.0);
    assert!((character.yaw() - start).abs() <= PI + 1e-4);
}
