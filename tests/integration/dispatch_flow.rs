//! Integration tests driving key events from a mock deck through the watcher,
//! dispatcher and action handler.

use std::sync::Arc;

use stroomer::action::ActionOutcome;
use stroomer::action::snmp::SnmpValue;
use stroomer::config::{Config, ConfigLoader};
use stroomer::device::mock::{MockDeck, Operation};
use stroomer::device::{DeckOperations, spawn_watcher, watch};
use stroomer::dispatch::Dispatcher;

use crate::common::{PRINTER_CONFIG, RecordingClient, assets_dir, bundled_assets, init_test_logging};

fn load(content: &str) -> Config {
    ConfigLoader::new(assets_dir())
        .load_str(content)
        .unwrap()
        .config
}

fn dispatcher(config: Config) -> (Dispatcher, Arc<RecordingClient>) {
    let client = Arc::new(RecordingClient::default());
    let dispatcher = Dispatcher::new(Arc::new(config), bundled_assets(), client.clone());
    (dispatcher, client)
}

/// Press and release of a configured snmp button: one SET on press, a
/// re-render on each transition, nothing sent on release.
#[test]
fn test_snmp_button_tap() {
    init_test_logging();
    let (dispatcher, client) = dispatcher(load(PRINTER_CONFIG));
    let deck = MockDeck::mk2().close_when_drained();
    deck.queue_tap(2);

    watch(&deck, &dispatcher);

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    let (device, request) = &requests[0];
    assert_eq!(device.name, "printer1");
    assert_eq!(request.oid_text, "1.3.6.1.2.1.1.5.0");
    assert_eq!(request.value, SnmpValue::String("ON".to_string()));

    deck.assert_operations(&[
        Operation::SetKeyImage { key: 2 },
        Operation::SetKeyImage { key: 2 },
    ]);
}

#[test]
fn test_release_does_not_send() {
    let (dispatcher, client) = dispatcher(load(PRINTER_CONFIG));
    let deck = MockDeck::mk2();

    let outcome = dispatcher.dispatch(&deck, 2, false).unwrap();

    assert_eq!(outcome, None);
    assert!(client.requests().is_empty());
    assert_eq!(deck.image_writes(2), 1);
}

#[test]
fn test_repeated_presses_send_repeatedly() {
    let (dispatcher, client) = dispatcher(load(PRINTER_CONFIG));
    let deck = MockDeck::mk2().close_when_drained();
    deck.queue_tap(2);
    deck.queue_tap(2);
    deck.queue_tap(2);

    watch(&deck, &dispatcher);

    assert_eq!(client.requests().len(), 3);
    assert_eq!(deck.image_writes(2), 6);
}

#[test]
fn test_integer_value_type_is_encoded_as_integer() {
    let config = load(&PRINTER_CONFIG.replace(
        "value = ON\nvalue_type = string",
        "value = 7\nvalue_type = integer",
    ));
    let (dispatcher, client) = dispatcher(config);

    dispatcher.dispatch(&MockDeck::mk2(), 2, true).unwrap();

    assert_eq!(client.requests()[0].1.value, SnmpValue::Integer(7));
}

#[test]
fn test_bad_integer_sends_nothing_and_watcher_continues() {
    let config = load(&PRINTER_CONFIG.replace(
        "value = ON\nvalue_type = string",
        "value = seven\nvalue_type = integer",
    ));
    let (dispatcher, client) = dispatcher(config);
    let deck = MockDeck::mk2().close_when_drained();
    deck.queue_tap(2);
    deck.queue_tap(0);

    watch(&deck, &dispatcher);

    assert!(client.requests().is_empty());
    assert_eq!(deck.image_writes(2), 2);
    assert_eq!(deck.image_writes(0), 2);
}

#[test]
fn test_unknown_device_is_skipped() {
    let config = load(&PRINTER_CONFIG.replace("device = printer1", "device = printer9"));
    let (dispatcher, client) = dispatcher(config);

    let err = dispatcher.dispatch(&MockDeck::mk2(), 2, true).unwrap_err();

    assert!(err.is_configuration_error());
    assert!(client.requests().is_empty());
}

#[test]
fn test_get_command_reports_unsupported() {
    let config = load(&PRINTER_CONFIG.replace("command = set", "command = get"));
    let (dispatcher, client) = dispatcher(config);

    let outcome = dispatcher.dispatch(&MockDeck::mk2(), 2, true).unwrap();

    assert!(matches!(outcome, Some(ActionOutcome::Unsupported { .. })));
    assert!(client.requests().is_empty());
}

/// The exit button closes the deck; the watcher stops without seeing the
/// release.
#[test]
fn test_exit_button_ends_watcher() {
    let config = load(
        "\
[quit]
type = button
button_type = exit
location = 1
label = Quit
",
    );
    let (dispatcher, _) = dispatcher(config);
    let deck = MockDeck::mini();
    deck.queue_tap(0);

    watch(&deck, &dispatcher);

    assert!(deck.is_closed());
    deck.assert_operations(&[
        Operation::SetKeyImage { key: 0 },
        Operation::Reset,
        Operation::Close,
    ]);
}

#[test]
fn test_spawned_watcher_joins_after_exit() {
    let config = load(
        "\
[quit]
type = button
button_type = exit
location = 6
label = Quit
",
    );
    let (dispatcher, _) = dispatcher(config);
    let deck = Arc::new(MockDeck::mini());
    deck.queue_tap(5);

    let handle = spawn_watcher(deck.clone(), Arc::new(dispatcher)).unwrap();
    handle.join().unwrap();

    assert!(deck.is_closed());
}

/// Exit on one deck closes every open deck, so all watchers join.
#[test]
fn test_exit_on_one_deck_ends_every_watcher() {
    let config = load(
        "\
[quit]
type = button
button_type = exit
location = 1
label = Quit
",
    );
    let first = Arc::new(MockDeck::mk2());
    let second = Arc::new(MockDeck::mini());
    let decks: Vec<Arc<dyn DeckOperations>> = vec![
        Arc::clone(&first) as Arc<dyn DeckOperations>,
        Arc::clone(&second) as Arc<dyn DeckOperations>,
    ];
    let (dispatcher, _) = dispatcher(config);
    let dispatcher = Arc::new(dispatcher.with_open_decks(decks.clone().into()));

    let handles: Vec<_> = decks
        .iter()
        .map(|deck| spawn_watcher(Arc::clone(deck), dispatcher.clone()).unwrap())
        .collect();
    first.queue_tap(0);

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(first.is_closed());
    assert!(second.is_closed());
    first.assert_operations(&[
        Operation::SetKeyImage { key: 0 },
        Operation::Reset,
        Operation::Close,
    ]);
    second.assert_operations(&[Operation::Close]);
}

#[test]
fn test_render_all_then_tap_unconfigured_key() {
    let (dispatcher, client) = dispatcher(Config::default());
    let deck = MockDeck::xl().close_when_drained();

    dispatcher.render_all(&deck).unwrap();
    let initial = deck.key_image(4).unwrap();
    deck.clear_operations();

    deck.queue_states({
        let mut states = vec![false; 32];
        states[4] = true;
        states
    });
    watch(&deck, &dispatcher);

    assert!(client.requests().is_empty());
    deck.assert_operations(&[Operation::SetKeyImage { key: 4 }]);
    assert_ne!(deck.key_image(4).unwrap().as_bytes(), initial.as_bytes());
}
