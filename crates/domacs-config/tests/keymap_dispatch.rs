use domacs_config::{Config, KeyChord};
use domacs_engine::{Action, Dom, Engine, MemoryHost, Outcome, SelectionHost};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn press(
    engine: &mut Engine<MemoryHost>,
    config: &Config,
    chord: &str,
    input: Option<&str>,
) -> Option<Outcome> {
    let keymap = config.keymap().unwrap();
    let chord: KeyChord = chord.parse().unwrap();
    keymap
        .lookup(&chord)
        .map(|action| engine.dispatch(action, input))
}

#[test]
fn test_loaded_bindings_drive_the_engine() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_file,
        r#"
[bindings]
"Ctrl+j" = "search-forward"
"Alt+Space" = "set-mark"
"#,
    )
    .unwrap();
    let config = Config::load_from_path(&config_file).unwrap().unwrap();

    let dom = Dom::parse_html("<p>one <b>two</b> three</p>").unwrap();
    let mut engine = Engine::new(MemoryHost::new(dom));

    assert_eq!(
        press(&mut engine, &config, "Ctrl+j", Some("two")),
        Some(Outcome::Found(true))
    );
    assert_eq!(press(&mut engine, &config, "Alt+Space", None), Some(Outcome::Done));
    assert_eq!(press(&mut engine, &config, "Ctrl+f", None), Some(Outcome::Done));

    // Mark set after the match, selection extended one character.
    let dom = engine.host().dom();
    let two = dom.find_text(dom.root(), "two").unwrap();
    let three = dom.find_text(dom.root(), " three").unwrap();
    assert_eq!(engine.mark().map(|mark| mark.node), Some(two));
    assert_eq!(engine.host().focus().map(|focus| focus.node), Some(three));
    assert_eq!(engine.host().anchor().map(|anchor| anchor.node), Some(two));
}

#[test]
fn test_unbound_chord_does_nothing() {
    let config = Config {
        use_default_bindings: false,
        ..Config::default()
    };
    let dom = Dom::parse_html("<p>abc</p>").unwrap();
    let mut engine = Engine::new(MemoryHost::new(dom));

    assert_eq!(press(&mut engine, &config, "Ctrl+f", None), None);
    assert_eq!(
        engine.host().focus(),
        Some(domacs_engine::Position::new(engine.host().dom().root(), 0))
    );
}

#[test]
fn test_every_action_name_is_accepted_in_config() {
    let mut content = String::from("use_default_bindings = false\n[bindings]\n");
    for (i, action) in Action::ALL.iter().enumerate() {
        content.push_str(&format!("\"Ctrl+F{}\" = \"{action}\"\n", i + 1));
    }
    let config: Config = toml::from_str(&content).unwrap();
    let keymap = config.keymap().unwrap();
    assert_eq!(keymap.len(), Action::ALL.len());
    for action in Action::ALL {
        assert_eq!(keymap.chords_for(action).count(), 1);
    }
}
