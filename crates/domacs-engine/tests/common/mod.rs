use domacs_engine::{Dom, Engine, MemoryHost, NodeId};

#[allow(dead_code)]
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn engine(markup: &str) -> Engine<MemoryHost> {
    init_logging();
    Engine::new(MemoryHost::new(Dom::parse_html(markup).unwrap()))
}

/// First text leaf containing `needle`.
#[allow(dead_code)]
pub fn leaf(engine: &Engine<MemoryHost>, needle: &str) -> NodeId {
    let dom = engine.host().dom();
    dom.find_text(dom.root(), needle)
        .unwrap_or_else(|| panic!("no text leaf contains {needle:?}"))
}

#[allow(dead_code)]
pub fn html(engine: &Engine<MemoryHost>) -> String {
    let dom = engine.host().dom();
    dom.inner_html(dom.root())
}
