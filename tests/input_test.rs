mod common;

use common::test_utils::*;
use flow_folio::{
    character::Direction,
    input::{Command, pointer_to_ndc},
};
use winit::keyboard::{Key, NamedKey, SmolStr};

#[test]
fn keys_map_to_commands() {
    assert_eq!(Command::from_key_name("w"), Some(Command::Move(Direction::Up)));
    assert_eq!(Command::from_key_name("W"), Some(Command::Move(Direction::Up)));
    assert_eq!(Command::from_key_name("ArrowDown"), Some(Command::Move(Direction::Down)));
    assert_eq!(Command::from_key_name("a"), Some(Command::Move(Direction::Left)));
    assert_eq!(Command::from_key_name("arrowright"), Some(Command::Move(Direction::Right)));
    assert_eq!(Command::from_key_name("Escape"), Some(Command::CloseModal));
    assert_eq!(Command::from_key_name("q"), None);
    assert_eq!(Command::from_key_name(""), None);
}

#[test]
fn winit_keys_map_to_commands() {
    assert_eq!(
        Command::from_winit_key(&Key::Named(NamedKey::ArrowLeft)),
        Some(Command::Move(Direction::Left))
    );
    assert_eq!(
        Command::from_winit_key(&Key::Named(NamedKey::Escape)),
        Some(Command::CloseModal)
    );
    assert_eq!(
        Command::from_winit_key(&Key::Character(SmolStr::new("d"))),
        Some(Command::Move(Direction::Right))
    );
    assert_eq!(Command::from_winit_key(&Key::Named(NamedKey::Enter)), None);
}

#[test]
fn dpad_directions() {
    assert_eq!(Direction::from_dpad("up"), Some(Direction::Up));
    assert_eq!(Direction::from_dpad("down"), Some(Direction::Down));
    assert_eq!(Direction::from_dpad("left"), Some(Direction::Left));
    assert_eq!(Direction::from_dpad("right"), Some(Direction::Right));
    assert_eq!(Direction::from_dpad("sideways"), None);
}

#[test]
fn pointer_coordinates_to_ndc() {
    let top_left = pointer_to_ndc(0.0, 0.0, 800, 600);
    assert_close(top_left.x, -1.0);
    assert_close(top_left.y, 1.0);

    let bottom_right = pointer_to_ndc(800.0, 600.0, 800, 600);
    assert_close(bottom_right.x, 1.0);
    assert_close(bottom_right.y, -1.0);

    let center = pointer_to_ndc(400.0, 300.0, 800, 600);
    assert_close(center.x, 0.0);
    assert_close(center.y, 0.0);

    let degenerate = pointer_to_ndc(0.0, 0.0, 0, 0);
    assert!(degenerate.x.is_finite() && degenerate.y.is_finite());
}
