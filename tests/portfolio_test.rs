mod common;

use cgmath::{Point3, Vector3};
use common::test_utils::*;
use flow_folio::{
    character::Direction,
    config::FolioConfig,
    data_structures::scene_graph::SceneGraph,
    flow::GraphicsFlow,
    input::Command,
    portfolio::{Portfolio, PortfolioEvent},
    raycast::Ray,
    render::Render,
    resources::GpuScene,
};

fn portfolio() -> (Portfolio, RecordingModal) {
    let view = RecordingModal::default();
    let showcase = showcase_graph();
    let portfolio = Portfolio::new(
        FolioConfig::default(),
        showcase.graph,
        GpuScene::default(),
        Box::new(view.clone()),
    );
    (portfolio, view)
}

fn ray_down_at(x: f32, z: f32) -> Ray {
    Ray::new(Point3::new(x, 50.0, z), Vector3::new(0.0, -1.0, 0.0)).expect("ray")
}

#[test]
fn blocked_moves_do_not_start() {
    let (mut portfolio, _) = portfolio();

    assert!(!portfolio.try_move(Direction::Up));
    assert!(!portfolio.character.as_ref().expect("character").is_moving());
    assert!(!portfolio.update(0.1));
}

#[test]
fn one_step_at_a_time() {
    let (mut portfolio, _) = portfolio();

    assert!(portfolio.try_move(Direction::Left));
    assert!(!portfolio.try_move(Direction::Down));

    assert!(portfolio.update(0.3));
    assert_vec_close(
        portfolio.character_position().expect("character"),
        Vector3::new(-5.0, 0.0, 0.0),
    );
    assert!(!portfolio.update(0.1));

    assert!(portfolio.handle_command(Command::Move(Direction::Right)));
    portfolio.update(1.0);
    assert_vec_close(
        portfolio.character_position().expect("character"),
        Vector3::new(0.0, 0.0, 0.0),
    );
}

#[test]
fn the_graph_follows_the_character() {
    let (mut portfolio, _) = portfolio();
    let node = portfolio.sets.character.expect("character node");

    portfolio.try_move(Direction::Down);
    portfolio.update(1.0);

    let world = &portfolio.graph.node(node).expect("node").world;
    assert_vec_close(world.position, Vector3::new(0.0, 0.0, 5.0));
}

#[test]
fn hover_and_click_open_the_project() {
    let (mut portfolio, view) = portfolio();

    assert_eq!(portfolio.hover(Some(&ray_down_at(30.5, 29.3))), Some("Project_1"));
    assert!(portfolio.click());

    assert!(portfolio.modal.is_open());
    assert_eq!(portfolio.modal.title(), Some("Project One"));
    assert_eq!(view.calls(), vec![ModalCall::Present("Project One".to_string())]);

    assert!(portfolio.handle_command(Command::CloseModal));
    assert!(!portfolio.modal.is_open());
    assert_eq!(view.calls().last(), Some(&ModalCall::Dismiss));
}

#[test]
fn clicking_nothing_does_nothing() {
    let (mut portfolio, view) = portfolio();

    assert_eq!(portfolio.hover(Some(&ray_down_at(-30.0, -30.0))), None);
    assert!(!portfolio.click());
    assert_eq!(portfolio.hover(None), None);
    assert!(!portfolio.click());
    assert!(view.calls().is_empty());
}

#[test]
fn collision_walls_are_not_clickable() {
    let (mut portfolio, _) = portfolio();

    assert_eq!(portfolio.hover(Some(&ray_down_at(0.0, -6.0))), None);
}

#[test]
fn moving_with_the_modal_open() {
    let (mut portfolio, _) = portfolio();
    portfolio.hover(Some(&ray_down_at(30.5, 29.3)));
    portfolio.click();

    assert!(portfolio.try_move(Direction::Left));
    assert!(portfolio.modal.is_open());
}

#[test]
fn page_keys_work_while_the_modal_is_open() {
    let (mut portfolio, view) = portfolio();
    portfolio.hover(Some(&ray_down_at(30.5, 29.3)));
    portfolio.click();

    let left = Command::from_key_name("ArrowLeft").expect("arrow key");
    assert!(portfolio.handle_event(PortfolioEvent::Key(left)));
    portfolio.update(1.0);
    assert_vec_close(
        portfolio.character_position().expect("character"),
        Vector3::new(-5.0, 0.0, 0.0),
    );

    let escape = Command::from_key_name("Escape").expect("escape key");
    assert!(portfolio.handle_event(PortfolioEvent::Key(escape)));
    assert!(!portfolio.modal.is_open());
    assert_eq!(view.calls().last(), Some(&ModalCall::Dismiss));
}

#[test]
fn dpad_and_exit_button_events() {
    let (mut portfolio, _) = portfolio();
    portfolio.hover(Some(&ray_down_at(30.5, 29.3)));
    portfolio.click();

    assert!(portfolio.handle_event(PortfolioEvent::Dpad(Direction::Down)));
    assert!(portfolio.handle_event(PortfolioEvent::CloseModal));
    assert!(!portfolio.modal.is_open());
}

#[test]
fn empty_scene_has_no_character() {
    let portfolio_view = RecordingModal::default();
    let mut portfolio = Portfolio::new(
        FolioConfig::default(),
        SceneGraph::new(),
        GpuScene::default(),
        Box::new(portfolio_view),
    );

    assert!(portfolio.character.is_none());
    assert!(!portfolio.try_move(Direction::Up));
    assert!(!portfolio.update(1.0));
    assert_eq!(portfolio.character_position(), None);
    assert!(matches!(portfolio.on_render(), Render::None));
}

#[test]
fn nothing_to_draw_without_gpu_models() {
    let (portfolio, _) = portfolio();

    assert!(matches!(portfolio.on_render(), Render::None));
}
