//! Integration tests for key image rendering with the bundled assets.

use image::GenericImageView;
use stroomer::config::{Button, ButtonAction};
use stroomer::device::mock::MockDeck;
use stroomer::device::{DeckOperations, DeviceModel};
use stroomer::error::StroomerError;
use stroomer::render::render_style;
use stroomer::style::{Assets, StyleName, key_style};

use crate::common::{bundled_assets, init_test_logging};

#[test]
fn test_tiles_match_deck_key_size() {
    init_test_logging();
    let assets = bundled_assets();
    for model in [DeviceModel::Mini, DeviceModel::Mk2, DeviceModel::Xl] {
        let deck = MockDeck::new(model);
        let style = key_style(&assets, deck.key_count(), 0, false, None);
        let image = render_style(deck.info(), &style).unwrap();

        let (width, height) = model.key_dimensions();
        assert_eq!(image.dimensions(), (width, height));
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let assets = bundled_assets();
    let deck = MockDeck::mk2();
    let style = key_style(&assets, 15, 3, true, None);

    let first = render_style(deck.info(), &style).unwrap();
    let second = render_style(deck.info(), &style).unwrap();

    assert_eq!(first.as_bytes(), second.as_bytes());
}

#[test]
fn test_exit_key_renders_exit_style() {
    let assets = bundled_assets();
    let deck = MockDeck::mk2();

    let released = key_style(&assets, 15, 14, false, None);
    let pressed = key_style(&assets, 15, 14, true, None);
    assert_eq!(released.name, StyleName::Exit);
    assert_ne!(
        render_style(deck.info(), &released).unwrap().as_bytes(),
        render_style(deck.info(), &pressed).unwrap().as_bytes()
    );
}

#[test]
fn test_label_band_is_dark_outside_text() {
    let assets = bundled_assets();
    let deck = MockDeck::mk2();
    let mut style = key_style(&assets, 15, 0, false, None);
    style.label = String::new();

    let image = render_style(deck.info(), &style).unwrap().to_rgb8();

    // The bottom margin is left for the label; with no label it stays black.
    for x in 0..image.width() {
        assert_eq!(image.get_pixel(x, image.height() - 1).0, [0, 0, 0]);
    }
}

#[test]
fn test_missing_icon_is_asset_error() {
    let assets = bundled_assets();
    let deck = MockDeck::mk2();
    let button = Button {
        name: "lamp".to_string(),
        key: 0,
        label: "Lamp".to_string(),
        icon: Some(assets.path("Lamp.png")),
        action: ButtonAction::Exit,
    };
    let style = key_style(&assets, 15, 0, false, Some(&button));

    let err = render_style(deck.info(), &style).unwrap_err();
    assert!(matches!(err, StroomerError::AssetNotFound { .. }));
    assert!(err.is_asset_error());
}

#[test]
fn test_missing_font_is_asset_error() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::copy(
        bundled_assets().path("Released.png"),
        dir.path().join("Released.png"),
    )
    .unwrap();
    let assets = Assets::new(dir.path());
    let deck = MockDeck::mk2();

    let style = key_style(&assets, 15, 0, false, None);
    let err = render_style(deck.info(), &style).unwrap_err();

    assert!(matches!(err, StroomerError::AssetNotFound { .. }));
}

#[test]
fn test_unreadable_font_is_font_error() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::copy(
        bundled_assets().path("Released.png"),
        dir.path().join("Released.png"),
    )
    .unwrap();
    std::fs::write(dir.path().join("DejaVuSans.ttf"), b"not a font").unwrap();
    let assets = Assets::new(dir.path());
    let deck = MockDeck::mk2();

    let style = key_style(&assets, 15, 0, false, None);
    let err = render_style(deck.info(), &style).unwrap_err();

    assert!(matches!(err, StroomerError::FontLoad { .. }));
}
